/// Image assets as opaque handles.
///
/// The game only ever sees `ImageHandle`s.  Loading is polled: the driver
/// calls `AssetQueue::poll` until every image has resolved, and only then
/// may the session leave `NotReady`.  There is no timeout.
use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(usize);

impl ImageHandle {
    pub fn new(index: usize) -> Self {
        ImageHandle(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

pub trait AssetLoader {
    /// `None` while the image is not (yet) available.
    fn load(&mut self, path: &str) -> Option<ImageHandle>;
}

pub const PLAYER: &str = "assets/png/player.png";
pub const PLAYER_LEFT: &str = "assets/png/playerLeft.png";
pub const PLAYER_RIGHT: &str = "assets/png/playerRight.png";
pub const PLAYER_DAMAGED: &str = "assets/png/playerDamaged.png";
pub const ENEMY: &str = "assets/png/enemyShip.png";
pub const LASER_RED: &str = "assets/png/laserRed.png";
pub const LASER_RED_SHOT: &str = "assets/png/laserRedShot.png";
pub const LASER_GREEN_SHOT: &str = "assets/png/laserGreenShot.png";
pub const LIFE: &str = "assets/png/life.png";

/// Load order; `Assets` fields follow it.
pub const PATHS: [&str; 9] = [
    PLAYER,
    PLAYER_LEFT,
    PLAYER_RIGHT,
    PLAYER_DAMAGED,
    ENEMY,
    LASER_RED,
    LASER_RED_SHOT,
    LASER_GREEN_SHOT,
    LIFE,
];

/// Every image the game draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assets {
    pub player: ImageHandle,
    pub player_left: ImageHandle,
    pub player_right: ImageHandle,
    pub player_damaged: ImageHandle,
    pub enemy: ImageHandle,
    pub laser_red: ImageHandle,
    pub laser_red_shot: ImageHandle,
    pub laser_green_shot: ImageHandle,
    pub life: ImageHandle,
}

/// Tracks which images have resolved so far.
#[derive(Debug, Default)]
pub struct AssetQueue {
    resolved: [Option<ImageHandle>; 9],
}

impl AssetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> usize {
        self.resolved.iter().filter(|h| h.is_none()).count()
    }

    /// Ask the loader for every outstanding image.  Returns the full set
    /// once nothing is outstanding.
    pub fn poll<L: AssetLoader>(&mut self, loader: &mut L) -> Option<Assets> {
        for (slot, path) in self.resolved.iter_mut().zip(PATHS) {
            if slot.is_none() {
                *slot = loader.load(path);
            }
        }
        match self.resolved {
            [Some(player), Some(player_left), Some(player_right), Some(player_damaged), Some(enemy), Some(laser_red), Some(laser_red_shot), Some(laser_green_shot), Some(life)] => {
                Some(Assets {
                    player,
                    player_left,
                    player_right,
                    player_damaged,
                    enemy,
                    laser_red,
                    laser_red_shot,
                    laser_green_shot,
                    life,
                })
            }
            _ => None,
        }
    }
}

// ── Terminal glyphs ──────────────────────────────────────────────────────────

/// Character art standing in for an image on a terminal.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub rows: Vec<String>,
    pub color: Color,
}

impl Glyph {
    fn new(rows: &[&str], color: Color) -> Glyph {
        Glyph {
            rows: rows.iter().map(|r| r.to_string()).collect(),
            color,
        }
    }
}

fn glyph_for(path: &str) -> Option<Glyph> {
    let glyph = match path {
        PLAYER => Glyph::new(&[" ▲ ", "/|\\"], Color::White),
        PLAYER_LEFT => Glyph::new(&[" ▲ ", "<|\\"], Color::White),
        PLAYER_RIGHT => Glyph::new(&[" ▲ ", "/|>"], Color::White),
        PLAYER_DAMAGED => Glyph::new(&[" ▲ ", "/x\\"], Color::DarkYellow),
        ENEMY => Glyph::new(&["<▼>", "[_]"], Color::Green),
        LASER_RED => Glyph::new(&["║"], Color::Red),
        LASER_RED_SHOT => Glyph::new(&["\\*/", "/*\\"], Color::Red),
        LASER_GREEN_SHOT => Glyph::new(&["\\*/", "/*\\"], Color::Green),
        LIFE => Glyph::new(&["♥"], Color::Red),
        _ => return None,
    };
    Some(glyph)
}

/// Resolves the game's image paths to terminal glyphs.
#[derive(Debug, Default)]
pub struct GlyphLoader {
    atlas: Vec<Glyph>,
}

impl GlyphLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glyphs indexed by handle, for the terminal surface.
    pub fn atlas(&self) -> Vec<Glyph> {
        self.atlas.clone()
    }
}

impl AssetLoader for GlyphLoader {
    fn load(&mut self, path: &str) -> Option<ImageHandle> {
        let glyph = glyph_for(path)?;
        self.atlas.push(glyph);
        Some(ImageHandle::new(self.atlas.len() - 1))
    }
}
