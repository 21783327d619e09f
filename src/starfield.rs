/// Title-screen starfield: perspective-projected particles flying toward
/// the viewer, plus the start/cancel control for its animation loop.
use rand::Rng;

use crate::config::STAR_DEPTH;
use crate::session::Phase;

/// Depth lost per frame.
const STAR_SPEED: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    /// Offset from the screen centre.
    pub x: f32,
    pub y: f32,
    /// Depth; reaching 0 means the star passed the viewer.
    pub z: f32,
    /// Depth on the previous frame, for the trail.
    pub pz: f32,
}

impl Star {
    pub fn random<R: Rng>(rng: &mut R, width: f32, height: f32) -> Star {
        let z = rng.gen::<f32>() * STAR_DEPTH;
        Star {
            x: rng.gen::<f32>() * width - width / 2.0,
            y: rng.gen::<f32>() * height - height / 2.0,
            z,
            pz: z,
        }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.pz = self.z;
        self.z -= STAR_SPEED;
        if self.z <= 0.0 {
            *self = Star::random(rng, width, height);
        }
    }

    /// Screen position at depth `z`.
    pub fn project_at(&self, z: f32, width: f32, height: f32) -> (f32, f32) {
        (
            self.x / z * width + width / 2.0,
            self.y / z * height + height / 2.0,
        )
    }
}

pub struct Starfield {
    stars: Vec<Star>,
    width: f32,
    height: f32,
}

impl Starfield {
    pub fn new<R: Rng>(count: usize, width: i32, height: i32, rng: &mut R) -> Starfield {
        let (w, h) = (width as f32, height as f32);
        Starfield {
            stars: (0..count).map(|_| Star::random(rng, w, h)).collect(),
            width: w,
            height: h,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        let (w, h) = (self.width, self.height);
        for star in &mut self.stars {
            star.update(rng, w, h);
        }
    }

    /// `(previous, current)` screen positions of every star.
    pub fn trails(&self) -> impl Iterator<Item = ((f32, f32), (f32, f32))> + '_ {
        self.stars.iter().map(move |s| {
            (
                s.project_at(s.pz, self.width, self.height),
                s.project_at(s.z, self.width, self.height),
            )
        })
    }
}

// ── Loop control ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopChange {
    Started,
    Cancelled,
    Unchanged,
}

/// Whether the refresh-synced starfield animation is scheduled.  It runs
/// on the title and end screens and is cancelled while a session is on
/// screen.
#[derive(Debug, Default)]
pub struct StarfieldLoop {
    running: bool,
}

impl StarfieldLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sync(&mut self, phase: Phase) -> LoopChange {
        match (self.running, phase.shows_starfield()) {
            (false, true) => {
                self.running = true;
                log::info!("starfield started");
                LoopChange::Started
            }
            (true, false) => {
                self.running = false;
                log::info!("starfield cancelled");
                LoopChange::Cancelled
            }
            _ => LoopChange::Unchanged,
        }
    }
}
