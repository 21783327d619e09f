use std::fs::File;
use std::io::{stdout, BufWriter, IsTerminal, Stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use starship_commander::assets::{AssetQueue, Assets, GlyphLoader};
use starship_commander::audio::{AudioBackend, AudioManager, BellAudio, SilentAudio, Sound};
use starship_commander::bus::Message;
use starship_commander::config::{Settings, FRAME, HEIGHT, TICK_MS, WIDTH};
use starship_commander::display;
use starship_commander::error::GameError;
use starship_commander::game::Game;
use starship_commander::session::Banner;
use starship_commander::starfield::{LoopChange, Starfield, StarfieldLoop};
use starship_commander::surface::TerminalSurface;

/// A direction key counts as held if it was pressed or repeated within this
/// window.  Covers terminals that never report key releases: it outlasts
/// the usual OS delay before key-repeat kicks in.
const HOLD_WINDOW: Duration = Duration::from_millis(550);

// ── Input mapping ─────────────────────────────────────────────────────────────

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn key_message(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Left => Some(Message::HeroSpeedLeft),
        KeyCode::Right => Some(Message::HeroSpeedRight),
        KeyCode::Up => Some(Message::KeyUp),
        KeyCode::Down => Some(Message::KeyDown),
        KeyCode::Char(' ') => Some(Message::HeroFire),
        KeyCode::Enter => Some(Message::GameStart),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Message::GamePause),
        _ => None,
    }
}

/// Start and pause toggle once per physical press, never on repeat.
fn press_only(message: &Message) -> bool {
    matches!(message, Message::GameStart | Message::GamePause)
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to a file; stderr would draw over the alternate screen.
fn init_logging(settings: &Settings) {
    let file = match File::create(&settings.log_path) {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

// ── Main loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Two schedules share the loop: the
/// starfield advances every frame while it is running, and the game render
/// tick fires every `TICK_MS` otherwise.
fn run(
    surface: &mut TerminalSurface<BufWriter<Stdout>>,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
) -> Result<(), GameError> {
    let mut rng = thread_rng();
    let clock = Instant::now();

    let mut loader = GlyphLoader::new();
    let mut queue = AssetQueue::new();
    let mut assets: Option<Assets> = None;

    let mut game = Game::new(WIDTH, HEIGHT);
    let backend: Box<dyn AudioBackend> = if settings.mute {
        Box::new(SilentAudio)
    } else {
        Box::new(BellAudio::new(stdout()))
    };
    let mut audio = AudioManager::new(backend);

    let mut starfield = Starfield::new(settings.star_count, WIDTH, HEIGHT, &mut rng);
    let mut starfield_loop = StarfieldLoop::new();

    let mut held: Option<(KeyCode, Instant)> = None;
    let mut next_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        let now_ms = clock.elapsed().as_millis() as u64;

        // ── Drain pending input (non-blocking) ──────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if is_quit(code, modifiers) {
                            return Ok(());
                        }
                        let message = match key_message(code) {
                            Some(m) => m,
                            None => continue,
                        };
                        if kind == KeyEventKind::Repeat && press_only(&message) {
                            continue;
                        }
                        if matches!(message, Message::HeroSpeedLeft | Message::HeroSpeedRight) {
                            held = Some((code, frame_start));
                        }
                        game.publish(message);
                    }
                    KeyEventKind::Release => {
                        if held.map_or(false, |(key, _)| key == code) {
                            held = None;
                            game.publish(Message::HeroSpeedZero);
                        }
                    }
                },
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                    game.publish(Message::TitleClick);
                }
                Event::Resize(cols, rows) => surface.resize(cols, rows),
                _ => {}
            }
        }

        if let Some((_, at)) = held {
            if frame_start.duration_since(at) > HOLD_WINDOW {
                held = None;
                game.publish(Message::HeroSpeedZero);
            }
        }

        // ── Assets ──────────────────────────────────────────────────────────
        if assets.is_none() {
            if let Some(loaded) = queue.poll(&mut loader) {
                surface.set_atlas(loader.atlas());
                assets = Some(loaded);
                game.publish(Message::AssetsReady);
            }
        }

        // ── Draw ────────────────────────────────────────────────────────────
        match assets {
            None => {
                display::render_loading(surface, queue.remaining());
                surface.present()?;
            }
            Some(assets) => {
                match starfield_loop.sync(game.phase()) {
                    LoopChange::Started => audio.play(Sound::TitleScreen, now_ms),
                    LoopChange::Cancelled => audio.stop(Sound::TitleScreen),
                    LoopChange::Unchanged => {}
                }

                if starfield_loop.is_running() {
                    starfield.update(&mut rng);
                    let banner = game.state.banner.unwrap_or(Banner::Title);
                    display::render_title(surface, &starfield, banner);
                    surface.present()?;
                } else if frame_start >= next_tick {
                    game.render_tick(surface, &assets);
                    surface.present()?;
                    next_tick = frame_start + Duration::from_millis(TICK_MS);
                }
            }
        }

        // ── Audio ───────────────────────────────────────────────────────────
        for cue in game.state.take_cues() {
            audio.apply(cue, now_ms);
        }
        audio.poll(now_ms);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let settings = Settings::from_env();
    init_logging(&settings);

    // No terminal, no game: fail before any state exists.
    if !stdout().is_terminal() {
        log::error!("stdout is not a terminal");
        return Err(GameError::Surface("stdout is not a terminal".to_string()));
    }
    let (cols, rows) = terminal::size().map_err(|e| {
        log::error!("cannot read terminal size: {}", e);
        GameError::Surface(e.to_string())
    })?;

    let mut out = stdout();
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Terminals without the kitty protocol fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let mut surface = TerminalSurface::new(
        BufWriter::new(stdout()),
        cols,
        rows,
        WIDTH,
        HEIGHT,
        Vec::new(),
    );
    let result = run(&mut surface, &rx, &settings);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("{}", e);
    }
    result
}
