/// Game constants and environment-driven settings.
use std::path::PathBuf;
use std::time::Duration;

// ── Play field ────────────────────────────────────────────────────────────────

pub const WIDTH: i32 = 1024;
pub const HEIGHT: i32 = 768;

// ── Schedules ────────────────────────────────────────────────────────────────

/// Fixed render/update tick.
pub const TICK_MS: u64 = 100;
/// Title starfield frame, roughly one display refresh.
pub const FRAME: Duration = Duration::from_millis(16);

// ── Session ──────────────────────────────────────────────────────────────────

pub const START_LIVES: u32 = 3;
pub const SCORE_PER_ENEMY: u32 = 100;

// ── Player ───────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: i32 = 99;
pub const PLAYER_HEIGHT: i32 = 75;
pub const PLAYER_SPEED: i32 = 10;
/// Vertical step for the up/down nudge keys.
pub const PLAYER_NUDGE: i32 = 5;
pub const FIRE_COOLDOWN_MS: u32 = 500;
/// Muzzle offset relative to the player's top-left corner.
pub const MUZZLE_DX: i32 = 45;
pub const MUZZLE_DY: i32 = -30;

// ── Projectile ───────────────────────────────────────────────────────────────

pub const PROJECTILE_WIDTH: i32 = 9;
pub const PROJECTILE_HEIGHT: i32 = 33;
pub const PROJECTILE_STEP: i32 = 20;

// ── Enemy grid ───────────────────────────────────────────────────────────────

pub const ENEMY_WIDTH: i32 = 98;
pub const ENEMY_HEIGHT: i32 = 50;
pub const ENEMY_COLUMNS: i32 = 5;
pub const ENEMY_ROWS: i32 = 5;
pub const INITIAL_ENEMIES: usize = (ENEMY_COLUMNS * ENEMY_ROWS) as usize;
pub const ENEMY_BASE_SPEED: i32 = 30;
pub const ENEMY_DESCENT: i32 = 30;
/// Left sweep limit before the per-lane offset is subtracted.
pub const ENEMY_SWEEP_ORIGIN: i32 = 600;
/// Sideways step every 600 ms.
pub const ENEMY_SWEEP_EVERY: u64 = 6;
/// Downward step every 12 s.
pub const ENEMY_DESCEND_EVERY: u64 = 120;

// ── Explosion ────────────────────────────────────────────────────────────────

pub const EXPLOSION_WIDTH: i32 = 112;
pub const EXPLOSION_HEIGHT: i32 = 108;
/// Lifetime in ticks (300 ms).
pub const EXPLOSION_TICKS: u64 = 3;

// ── Audio ────────────────────────────────────────────────────────────────────

pub const AUDIO_RETRY_MS: u64 = 100;
pub const THEME_DELAY_MS: u64 = 1500;

// ── Starfield ────────────────────────────────────────────────────────────────

pub const STAR_COUNT: usize = 500;
pub const STAR_DEPTH: f32 = 1000.0;

/// Runtime settings read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub log_path: PathBuf,
    pub mute: bool,
    pub star_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_path: PathBuf::from("starship_commander.log"),
            mute: false,
            star_count: STAR_COUNT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or unparsable keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        Settings {
            log_path: lookup("STARSHIP_LOG")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
            mute: lookup("STARSHIP_MUTE")
                .map(|s| matches!(s.trim(), "1" | "true" | "yes"))
                .unwrap_or(defaults.mute),
            star_count: lookup("STARSHIP_STARS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.star_count),
        }
    }
}
