/// Game entity types: plain data plus the derived bounding box.
use crate::config::{
    ENEMY_BASE_SPEED, ENEMY_HEIGHT, ENEMY_WIDTH, EXPLOSION_HEIGHT, EXPLOSION_WIDTH,
    PLAYER_HEIGHT, PLAYER_WIDTH, PROJECTILE_HEIGHT, PROJECTILE_WIDTH,
};

/// Stable handle for an entity.  Ids are never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in play-field coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            top: y,
            left: x,
            bottom: y + height,
            right: x + width,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Touching edges count as an intersection.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.left > self.right
            || other.right < self.left
            || other.top > self.bottom
            || other.bottom < self.top)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Velocity {
    pub x: i32,
    pub y: i32,
}

// ── Per-kind data ─────────────────────────────────────────────────────────────

/// Which way the player ship is banking; selects the sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Neutral,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionFlavor {
    /// Enemy destroyed.
    RedShot,
    /// Player destroyed.
    GreenShot,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Player {
        velocity: Velocity,
        facing: Facing,
    },
    Projectile,
    Enemy {
        moving_right: bool,
        /// Column index counted from the right (5 = leftmost column).
        /// Sets the sweep limits.
        lane: i32,
        /// Sideways step, recomputed every tick from the surviving count.
        speed: i32,
    },
    Explosion {
        /// Tick at which the explosion disappears.
        expires_at: u64,
        flavor: ExplosionFlavor,
    },
}

/// Payload-free view of `EntityKind`, handy for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KindTag {
    Player,
    Projectile,
    Enemy,
    Explosion,
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub dead: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn player(id: EntityId, x: i32, y: i32) -> Entity {
        Entity {
            id,
            x,
            y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            dead: false,
            kind: EntityKind::Player {
                velocity: Velocity::default(),
                facing: Facing::Neutral,
            },
        }
    }

    pub fn projectile(id: EntityId, x: i32, y: i32) -> Entity {
        Entity {
            id,
            x,
            y,
            width: PROJECTILE_WIDTH,
            height: PROJECTILE_HEIGHT,
            dead: false,
            kind: EntityKind::Projectile,
        }
    }

    pub fn enemy(id: EntityId, x: i32, y: i32, lane: i32) -> Entity {
        Entity {
            id,
            x,
            y,
            width: ENEMY_WIDTH,
            height: ENEMY_HEIGHT,
            dead: false,
            kind: EntityKind::Enemy {
                moving_right: true,
                lane,
                speed: ENEMY_BASE_SPEED,
            },
        }
    }

    pub fn explosion(
        id: EntityId,
        x: i32,
        y: i32,
        expires_at: u64,
        flavor: ExplosionFlavor,
    ) -> Entity {
        Entity {
            id,
            x,
            y,
            width: EXPLOSION_WIDTH,
            height: EXPLOSION_HEIGHT,
            dead: false,
            kind: EntityKind::Explosion { expires_at, flavor },
        }
    }

    /// Bounding box, derived fresh on every call.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn tag(&self) -> KindTag {
        match self.kind {
            EntityKind::Player { .. } => KindTag::Player,
            EntityKind::Projectile => KindTag::Projectile,
            EntityKind::Enemy { .. } => KindTag::Enemy,
            EntityKind::Explosion { .. } => KindTag::Explosion,
        }
    }

    /// Explosions are purely visual.
    pub fn collides(&self) -> bool {
        self.is_alive() && self.tag() != KindTag::Explosion
    }
}
