/// Session context: score, lives, phase and the entity collection.
///
/// One `GameState` exists per process.  Bus handlers receive it by
/// mutable reference; nothing else holds game state.
use crate::audio::Cue;
use crate::config::{EXPLOSION_TICKS, START_LIVES};
use crate::entities::{Entity, EntityId, EntityKind, ExplosionFlavor, KindTag};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Assets still loading.
    NotReady,
    TitleScreen,
    Playing,
    Paused,
    Ended,
}

impl Phase {
    /// Phases in which a start request is honoured.
    pub fn can_start(&self) -> bool {
        matches!(self, Phase::TitleScreen | Phase::Ended)
    }

    /// Phases in which the title starfield animates.
    pub fn shows_starfield(&self) -> bool {
        matches!(self, Phase::TitleScreen | Phase::Ended)
    }
}

/// Centre-screen message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    Title,
    Loss,
    Win,
    Paused,
}

impl Banner {
    pub fn text(&self) -> &'static str {
        match self {
            Banner::Title => "Press [Enter] to start the game Starship Commander",
            Banner::Loss => "You died... - Press [Enter] to start the game Starship Commander",
            Banner::Win => {
                "Victory!!! Pew Pew... - Press [Enter] to start a new game Starship Commander"
            }
            Banner::Paused => "PAUSED - Press P to resume",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub score: u32,
    pub lives: u32,
    pub phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            score: 0,
            lives: START_LIVES,
            phase: Phase::NotReady,
        }
    }
}

impl Session {
    /// Take one life, never going below zero.  Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn is_damaged(&self) -> bool {
        self.lives < START_LIVES
    }
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub session: Session,
    pub entities: Vec<Entity>,
    /// Update ticks since the current session started.
    pub tick: u64,
    /// Milliseconds until the player may fire again.
    pub cooldown_ms: u32,
    pub banner: Option<Banner>,
    /// Audio requests raised by handlers, drained by the driver.
    pub cues: Vec<Cue>,
    pub width: i32,
    pub height: i32,
    next_id: u64,
}

impl GameState {
    pub fn new(width: i32, height: i32) -> GameState {
        GameState {
            session: Session::default(),
            entities: Vec::new(),
            tick: 0,
            cooldown_ms: 0,
            banner: None,
            cues: Vec::new(),
            width,
            height,
            next_id: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        if self.session.phase != phase {
            log::info!("phase {:?} -> {:?}", self.session.phase, phase);
            self.session.phase = phase;
        }
    }

    // ── Entity collection ─────────────────────────────────────────────────────

    pub fn spawn<F>(&mut self, make: F) -> EntityId
    where
        F: FnOnce(EntityId) -> Entity,
    {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(make(id));
        id
    }

    pub fn spawn_explosion(&mut self, x: i32, y: i32, flavor: ExplosionFlavor) -> EntityId {
        let expires_at = self.tick + EXPLOSION_TICKS;
        self.spawn(|id| Entity::explosion(id, x, y, expires_at, flavor))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag() == KindTag::Player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| matches!(e.kind, EntityKind::Player { .. }))
    }

    /// Living entities of one kind, in collection order.
    pub fn live(&self, tag: KindTag) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .iter()
            .filter(move |e| e.is_alive() && e.tag() == tag)
    }

    pub fn count_live(&self, tag: KindTag) -> usize {
        self.live(tag).count()
    }

    /// Drop every entity flagged dead.  Returns how many were removed.
    pub fn purge_dead(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(Entity::is_alive);
        before - self.entities.len()
    }

    // ── Side effects ──────────────────────────────────────────────────────────

    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}
