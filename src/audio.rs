/// Sound playback collaborator.
///
/// The game never talks to a backend directly: handlers push `Cue`s onto
/// the session context and the driver feeds them to an `AudioManager`.
/// Playback failures are retried once after `AUDIO_RETRY_MS`, then
/// logged and dropped.
use std::collections::HashSet;
use std::fmt;
use std::io::Write;

use crate::config::AUDIO_RETRY_MS;
use crate::timers::Deferred;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Theme,
    Laser,
    Explosion,
    GameOver,
    StageCleared,
    TitleScreen,
    Start,
}

impl Sound {
    pub const ALL: [Sound; 7] = [
        Sound::Theme,
        Sound::Laser,
        Sound::Explosion,
        Sound::GameOver,
        Sound::StageCleared,
        Sound::TitleScreen,
        Sound::Start,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sound::Theme => "theme",
            Sound::Laser => "laser",
            Sound::Explosion => "explosion",
            Sound::GameOver => "gameOver",
            Sound::StageCleared => "stageCleared",
            Sound::TitleScreen => "titleScreen",
            Sound::Start => "start",
        }
    }

    pub fn volume(&self) -> f32 {
        match self {
            Sound::Theme => 0.1,
            Sound::Laser => 0.3,
            Sound::Explosion => 0.2,
            Sound::GameOver => 0.4,
            Sound::StageCleared => 0.4,
            Sound::TitleScreen => 0.4,
            Sound::Start => 0.3,
        }
    }

    pub fn looping(&self) -> bool {
        matches!(self, Sound::Theme | Sound::TitleScreen)
    }
}

/// An audio request raised by game logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Play(Sound),
    /// Play after the given number of milliseconds.
    PlayAfter(Sound, u64),
    Pause(Sound),
    Stop(Sound),
    Resume(Sound),
    StopAll,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AudioError {
    /// The device refused to start playback.
    Rejected(String),
    Io(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Rejected(msg) => write!(f, "playback rejected: {}", msg),
            AudioError::Io(msg) => write!(f, "audio I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

impl From<std::io::Error> for AudioError {
    fn from(e: std::io::Error) -> Self {
        AudioError::Io(e.to_string())
    }
}

/// Raw playback device.  `play` restarts a sound from the beginning;
/// `resume` continues where `pause` left off.
pub trait AudioBackend {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError>;
    fn pause(&mut self, sound: Sound);
    fn stop(&mut self, sound: Sound);
    fn resume(&mut self, sound: Sound) -> Result<(), AudioError>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
        (**self).play(sound)
    }

    fn pause(&mut self, sound: Sound) {
        (**self).pause(sound)
    }

    fn stop(&mut self, sound: Sound) {
        (**self).stop(sound)
    }

    fn resume(&mut self, sound: Sound) -> Result<(), AudioError> {
        (**self).resume(sound)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Retry(Sound),
    Delayed(Sound),
}

pub struct AudioManager<B: AudioBackend> {
    backend: B,
    deferred: Deferred<Pending>,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        AudioManager {
            backend,
            deferred: Deferred::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of retries and delayed plays still waiting.
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    pub fn play(&mut self, sound: Sound, now_ms: u64) {
        if let Err(e) = self.backend.play(sound) {
            log::warn!("audio play failed for {}: {}", sound.name(), e);
            self.deferred
                .schedule(now_ms + AUDIO_RETRY_MS, Pending::Retry(sound));
        }
    }

    pub fn play_after(&mut self, sound: Sound, delay_ms: u64, now_ms: u64) {
        self.deferred
            .schedule(now_ms + delay_ms, Pending::Delayed(sound));
    }

    pub fn pause(&mut self, sound: Sound) {
        self.backend.pause(sound);
    }

    pub fn stop(&mut self, sound: Sound) {
        self.backend.stop(sound);
    }

    pub fn resume(&mut self, sound: Sound) {
        if let Err(e) = self.backend.resume(sound) {
            log::warn!("audio resume failed for {}: {}", sound.name(), e);
        }
    }

    /// Stop every sound and forget pending retries and delayed plays.
    pub fn stop_all(&mut self) {
        self.deferred.clear();
        for sound in Sound::ALL {
            self.backend.stop(sound);
        }
    }

    pub fn apply(&mut self, cue: Cue, now_ms: u64) {
        match cue {
            Cue::Play(sound) => self.play(sound, now_ms),
            Cue::PlayAfter(sound, delay) => self.play_after(sound, delay, now_ms),
            Cue::Pause(sound) => self.pause(sound),
            Cue::Stop(sound) => self.stop(sound),
            Cue::Resume(sound) => self.resume(sound),
            Cue::StopAll => self.stop_all(),
        }
    }

    /// Run retries and delayed plays that have come due.
    pub fn poll(&mut self, now_ms: u64) {
        for pending in self.deferred.take_due(now_ms) {
            match pending {
                Pending::Retry(sound) => {
                    if let Err(e) = self.backend.play(sound) {
                        log::warn!("audio retry failed for {}: {}", sound.name(), e);
                    }
                }
                Pending::Delayed(sound) => self.play(sound, now_ms),
            }
        }
    }
}

// ── Backends ─────────────────────────────────────────────────────────────────

/// Accepts everything and plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn play(&mut self, _sound: Sound) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self, _sound: Sound) {}

    fn stop(&mut self, _sound: Sound) {}

    fn resume(&mut self, _sound: Sound) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Terminal backend: rings the bell for one-shot effects and only tracks
/// the looping tracks.
pub struct BellAudio<W: Write> {
    out: W,
    looping: HashSet<Sound>,
}

impl<W: Write> BellAudio<W> {
    pub fn new(out: W) -> Self {
        BellAudio {
            out,
            looping: HashSet::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn is_looping(&self, sound: Sound) -> bool {
        self.looping.contains(&sound)
    }

    fn ring(&mut self) -> Result<(), AudioError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> AudioBackend for BellAudio<W> {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
        if sound.looping() {
            self.looping.insert(sound);
            Ok(())
        } else {
            self.ring()
        }
    }

    fn pause(&mut self, sound: Sound) {
        self.looping.remove(&sound);
    }

    fn stop(&mut self, sound: Sound) {
        self.looping.remove(&sound);
    }

    fn resume(&mut self, sound: Sound) -> Result<(), AudioError> {
        if sound.looping() {
            self.looping.insert(sound);
        }
        Ok(())
    }
}
