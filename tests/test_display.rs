use crossterm::style::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

use starship_commander::assets::{AssetLoader, AssetQueue, Assets, GlyphLoader, ImageHandle};
use starship_commander::bus::Message;
use starship_commander::config::{HEIGHT, WIDTH};
use starship_commander::display::*;
use starship_commander::entities::{Entity, EntityId, EntityKind, ExplosionFlavor, Facing, Rect};
use starship_commander::game::Game;
use starship_commander::session::Banner;
use starship_commander::starfield::Starfield;
use starship_commander::surface::*;

/// Records drawing calls instead of rasterising them.
#[derive(Default)]
struct Recording {
    calls: Vec<Call>,
}

#[derive(Debug, PartialEq)]
enum Call {
    Clear,
    Fill(Rect, f32),
    Image(ImageHandle, Rect),
    Text(String, i32, i32, Align),
    Line,
}

impl Surface for Recording {
    fn width(&self) -> i32 {
        WIDTH
    }

    fn height(&self) -> i32 {
        HEIGHT
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, _color: Color, opacity: f32) {
        self.calls.push(Call::Fill(rect, opacity));
    }

    fn draw_image(&mut self, image: ImageHandle, rect: Rect) {
        self.calls.push(Call::Image(image, rect));
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, align: Align, _color: Color) {
        self.calls.push(Call::Text(text.to_string(), x, y, align));
    }

    fn stroke_line(&mut self, _from: (f32, f32), _to: (f32, f32), _color: Color, _width: f32) {
        self.calls.push(Call::Line);
    }
}

fn load_assets() -> (Assets, GlyphLoader) {
    let mut loader = GlyphLoader::new();
    let assets = AssetQueue::new()
        .poll(&mut loader)
        .expect("glyphs resolve at once");
    (assets, loader)
}

/// 128×48 cells over the 1024×768 field: 8 units per column, 16 per row.
fn terminal(loader: &GlyphLoader) -> TerminalSurface<Vec<u8>> {
    TerminalSurface::new(Vec::new(), 128, 48, WIDTH, HEIGHT, loader.atlas())
}

// ── Assets ────────────────────────────────────────────────────────────────────

struct Slow {
    ready_after: u32,
    polls: u32,
}

impl AssetLoader for Slow {
    fn load(&mut self, path: &str) -> Option<ImageHandle> {
        if self.polls >= self.ready_after {
            Some(ImageHandle::new(path.len()))
        } else {
            None
        }
    }
}

#[test]
fn asset_queue_waits_for_every_image() {
    let mut queue = AssetQueue::new();
    let mut loader = Slow {
        ready_after: 2,
        polls: 0,
    };
    assert_eq!(queue.remaining(), 9);
    assert!(queue.poll(&mut loader).is_none());
    loader.polls = 1;
    assert!(queue.poll(&mut loader).is_none());
    loader.polls = 2;
    assert!(queue.poll(&mut loader).is_some());
    assert_eq!(queue.remaining(), 0);
}

#[test]
fn glyph_loader_rejects_unknown_paths() {
    let mut loader = GlyphLoader::new();
    assert!(loader.load("assets/png/missing.png").is_none());
    assert!(loader.atlas().is_empty());
}

// ── Sprite choice ─────────────────────────────────────────────────────────────

#[test]
fn player_sprite_follows_facing_and_damage() {
    let (assets, _) = load_assets();
    let mut player = Entity::player(EntityId(0), 0, 0);
    assert_eq!(sprite_for(&player, false, &assets), assets.player);
    assert_eq!(sprite_for(&player, true, &assets), assets.player_damaged);

    player.kind = EntityKind::Player {
        velocity: Default::default(),
        facing: Facing::Left,
    };
    assert_eq!(sprite_for(&player, true, &assets), assets.player_left);
}

#[test]
fn other_sprites() {
    let (assets, _) = load_assets();
    let enemy = Entity::enemy(EntityId(1), 0, 0, 1);
    let laser = Entity::projectile(EntityId(2), 0, 0);
    let boom = Entity::explosion(EntityId(3), 0, 0, 3, ExplosionFlavor::GreenShot);
    assert_eq!(sprite_for(&enemy, false, &assets), assets.enemy);
    assert_eq!(sprite_for(&laser, false, &assets), assets.laser_red);
    assert_eq!(sprite_for(&boom, false, &assets), assets.laser_green_shot);
}

// ── Frame composition ─────────────────────────────────────────────────────────

#[test]
fn render_draws_entities_score_and_lives() {
    let (assets, _) = load_assets();
    let mut game = Game::new(WIDTH, HEIGHT);
    game.publish(Message::AssetsReady);
    game.publish(Message::GameStart);

    let mut surface = Recording::default();
    render(&mut surface, &game.state, &assets);

    assert_eq!(surface.calls[0], Call::Clear);
    assert_eq!(surface.calls[1], Call::Fill(Rect::new(0, 0, WIDTH, HEIGHT), 1.0));
    let images = surface
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Image(..)))
        .count();
    assert_eq!(images, 26 + 3);
    assert!(surface.calls.contains(&Call::Text(
        "Score: 0".into(),
        WIDTH - 90,
        HEIGHT - 30,
        Align::Right
    )));
    assert_eq!(
        surface.calls.last(),
        Some(&Call::Image(assets.life, Rect::new(WIDTH - 180 + 105, HEIGHT - 90, 33, 26)))
    );
}

#[test]
fn render_skips_dead_entities() {
    let (assets, _) = load_assets();
    let mut game = Game::new(WIDTH, HEIGHT);
    game.publish(Message::AssetsReady);
    game.publish(Message::GameStart);
    for e in game.state.entities.iter_mut() {
        e.dead = true;
    }
    game.state.session.lives = 1;

    let mut surface = Recording::default();
    render(&mut surface, &game.state, &assets);
    let images = surface
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Image(..)))
        .count();
    assert_eq!(images, 1);
}

#[test]
fn paused_frame_is_dimmed_with_banner() {
    let (assets, _) = load_assets();
    let mut game = Game::new(WIDTH, HEIGHT);
    game.publish(Message::AssetsReady);
    game.publish(Message::GameStart);
    game.publish(Message::GamePause);

    let mut surface = Recording::default();
    render(&mut surface, &game.state, &assets);
    let n = surface.calls.len();
    assert_eq!(
        surface.calls[n - 2],
        Call::Fill(Rect::new(0, 0, WIDTH, HEIGHT), 0.5)
    );
    assert_eq!(
        surface.calls[n - 1],
        Call::Text(
            Banner::Paused.text().into(),
            WIDTH / 2,
            HEIGHT / 2,
            Align::Center
        )
    );
}

#[test]
fn render_tick_draws_then_updates() {
    let (assets, _) = load_assets();
    let mut game = Game::new(WIDTH, HEIGHT);
    let mut surface = Recording::default();
    assert!(!game.render_tick(&mut surface, &assets));
    assert_eq!(surface.calls[0], Call::Clear);

    game.publish(Message::AssetsReady);
    game.publish(Message::GameStart);
    assert!(game.render_tick(&mut surface, &assets));
    assert_eq!(game.state.tick, 1);
}

#[test]
fn title_frame_fades_then_draws_trails() {
    let field = Starfield::new(20, WIDTH, HEIGHT, &mut StdRng::seed_from_u64(1));
    let mut surface = Recording::default();
    render_title(&mut surface, &field, Banner::Title);

    assert_eq!(surface.calls.len(), 1 + 20 + 1);
    assert_eq!(surface.calls[0], Call::Fill(Rect::new(0, 0, WIDTH, HEIGHT), 0.2));
    assert!(surface.calls[1..21].iter().all(|c| *c == Call::Line));
    assert_eq!(
        surface.calls[21],
        Call::Text(Banner::Title.text().into(), WIDTH / 2, HEIGHT / 2, Align::Center)
    );
}

#[test]
fn banner_colours_differ() {
    assert_eq!(banner_color(Banner::Loss), Color::Red);
    assert_eq!(banner_color(Banner::Win), Color::Green);
    assert_ne!(banner_color(Banner::Title), banner_color(Banner::Paused));
}

// ── Terminal surface ──────────────────────────────────────────────────────────

#[test]
fn text_lands_in_the_mapped_cells() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.fill_text("Score: 0", 934, 738, Align::Right, Color::Red);

    // Anchor column 934 / 8 = 116, row 738 / 16 = 46.
    let row = term.row_text(46);
    let cols: String = row.chars().skip(108).take(8).collect();
    assert_eq!(cols, "Score: 0");
    assert_eq!(term.cell(108, 46).unwrap().fg, Color::Red);
}

#[test]
fn centred_text_straddles_anchor() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.fill_text("ABCD", 512, 0, Align::Center, Color::Blue);
    assert_eq!(term.cell(62, 0).unwrap().ch, 'A');
    assert_eq!(term.cell(65, 0).unwrap().ch, 'D');
}

#[test]
fn image_glyph_is_centred_in_its_columns() {
    let (assets, loader) = load_assets();
    let mut term = terminal(&loader);
    // 98 wide spans columns 0..12; the 3-wide glyph starts at column 4.
    term.draw_image(assets.enemy, Rect::new(0, 0, 98, 50));
    let top: String = term.row_text(0).chars().skip(4).take(3).collect();
    let bottom: String = term.row_text(1).chars().skip(4).take(3).collect();
    assert_eq!(top, "<▼>");
    assert_eq!(bottom, "[_]");
    assert_eq!(term.cell(4, 0).unwrap().fg, Color::Green);
}

#[test]
fn unknown_handle_draws_nothing() {
    let mut term = TerminalSurface::new(Vec::new(), 16, 8, WIDTH, HEIGHT, Vec::new());
    term.draw_image(ImageHandle::new(3), Rect::new(0, 0, 500, 500));
    assert!((0..8).all(|r| term.row_text(r).trim().is_empty()));
}

#[test]
fn translucent_fills_fade_then_blank() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.fill_text("*", 0, 0, Align::Left, Color::White);
    let everything = Rect::new(0, 0, WIDTH, HEIGHT);

    term.fill_rect(everything, Color::Black, 0.5);
    let cell = term.cell(0, 0).unwrap();
    assert_eq!(cell.ch, '*');
    assert_eq!(cell.fg, Color::DarkGrey);

    term.fill_rect(everything, Color::Black, 0.5);
    assert_eq!(term.cell(0, 0).unwrap().ch, ' ');
}

#[test]
fn opaque_fill_paints_background() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.fill_text("x", 0, 0, Align::Left, Color::White);
    term.fill_rect(Rect::new(0, 0, 16, 16), Color::Blue, 1.0);
    let cell = term.cell(0, 0).unwrap();
    assert_eq!(cell.ch, ' ');
    assert_eq!(cell.bg, Color::Blue);
    assert_eq!(term.cell(2, 0).unwrap().bg, Color::Black);
}

#[test]
fn lines_are_rasterised_end_to_end() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.stroke_line((0.0, 8.0), (80.0, 8.0), Color::White, 2.0);
    for col in 0..=10 {
        assert_eq!(term.cell(col, 0).unwrap().ch, '•');
    }
    assert_eq!(term.cell(11, 0).unwrap().ch, ' ');

    term.stroke_line((0.0, 40.0), (0.0, 72.0), Color::White, 1.0);
    assert_eq!(term.cell(0, 2).unwrap().ch, '·');
    assert_eq!(term.cell(0, 4).unwrap().ch, '·');
}

#[test]
fn degenerate_lines_are_ignored() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.stroke_line((f32::NAN, 0.0), (10.0, 10.0), Color::White, 2.0);
    term.stroke_line((0.0, 0.0), (f32::INFINITY, 10.0), Color::White, 2.0);
    term.stroke_line((-1.0e9, 0.0), (1.0e9, 0.0), Color::White, 2.0);
    assert!((0..48).all(|r| term.row_text(r).trim().is_empty()));
}

#[test]
fn clear_resets_every_cell() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.fill_text("hello", 0, 0, Align::Left, Color::White);
    term.clear();
    assert!(term.row_text(0).trim().is_empty());
}

#[test]
fn present_writes_the_buffer() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.fill_text("Score: 300", 400, 400, Align::Left, Color::Red);
    term.present().unwrap();
    let out = String::from_utf8_lossy(&term.into_inner()).into_owned();
    assert!(out.contains("Score: 300"));
}

#[test]
fn resize_keeps_logical_size() {
    let (_, loader) = load_assets();
    let mut term = terminal(&loader);
    term.resize(64, 24);
    assert_eq!((term.width(), term.height()), (WIDTH, HEIGHT));
    assert!(term.cell(63, 23).is_some());
    assert!(term.cell(64, 0).is_none());
}
