/// Rendering layer.
///
/// Each function receives a drawing surface and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into drawing calls.
use crossterm::style::Color;

use crate::assets::{Assets, ImageHandle};
use crate::entities::{Entity, EntityKind, ExplosionFlavor, Facing, Rect};
use crate::session::{Banner, GameState, Phase};
use crate::starfield::Starfield;
use crate::surface::{Align, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::Black;
const C_SCORE: Color = Color::Red;
const C_STAR: Color = Color::White;

const PAUSE_DIM: f32 = 0.5;
const STARFIELD_FADE: f32 = 0.2;
const STAR_LINE_WIDTH: f32 = 2.0;

const LIFE_ICON_WIDTH: i32 = 33;
const LIFE_ICON_HEIGHT: i32 = 26;
const LIFE_SPACING: i32 = 35;

pub fn banner_color(banner: Banner) -> Color {
    match banner {
        Banner::Title => Color::Blue,
        Banner::Loss => Color::Red,
        Banner::Win => Color::Green,
        Banner::Paused => Color::Yellow,
    }
}

/// Image for an entity.  The player shows damage once a life is gone.
pub fn sprite_for(entity: &Entity, damaged: bool, assets: &Assets) -> ImageHandle {
    match &entity.kind {
        EntityKind::Player { facing, .. } => match facing {
            Facing::Left => assets.player_left,
            Facing::Right => assets.player_right,
            Facing::Neutral if damaged => assets.player_damaged,
            Facing::Neutral => assets.player,
        },
        EntityKind::Projectile => assets.laser_red,
        EntityKind::Enemy { .. } => assets.enemy,
        EntityKind::Explosion { flavor, .. } => match flavor {
            ExplosionFlavor::RedShot => assets.laser_red_shot,
            ExplosionFlavor::GreenShot => assets.laser_green_shot,
        },
    }
}

fn full_screen<S: Surface>(surface: &S) -> Rect {
    Rect::new(0, 0, surface.width(), surface.height())
}

// ── Render tick ──────────────────────────────────────────────────────────────

/// Draw one complete game frame.
pub fn render<S: Surface>(surface: &mut S, state: &GameState, assets: &Assets) {
    surface.clear();
    surface.fill_rect(full_screen(surface), C_BACKGROUND, 1.0);

    let damaged = state.session.is_damaged();
    for entity in state.entities.iter().filter(|e| e.is_alive()) {
        surface.draw_image(sprite_for(entity, damaged, assets), entity.rect());
    }

    draw_score(surface, state.session.score);
    draw_lives(surface, state.session.lives, assets);

    if state.phase() == Phase::Paused {
        surface.fill_rect(full_screen(surface), C_BACKGROUND, PAUSE_DIM);
        draw_banner(surface, Banner::Paused);
    }
}

fn draw_score<S: Surface>(surface: &mut S, score: u32) {
    let x = surface.width() - 90;
    let y = surface.height() - 30;
    surface.fill_text(&format!("Score: {}", score), x, y, Align::Right, C_SCORE);
}

fn draw_lives<S: Surface>(surface: &mut S, lives: u32, assets: &Assets) {
    let start_x = surface.width() - 150 - 30;
    let y = surface.height() - 90;
    for i in 0..lives as i32 {
        let x = start_x + (i + 1) * LIFE_SPACING;
        surface.draw_image(assets.life, Rect::new(x, y, LIFE_ICON_WIDTH, LIFE_ICON_HEIGHT));
    }
}

pub fn draw_banner<S: Surface>(surface: &mut S, banner: Banner) {
    let x = surface.width() / 2;
    let y = surface.height() / 2;
    surface.fill_text(banner.text(), x, y, Align::Center, banner_color(banner));
}

// ── Title screen ─────────────────────────────────────────────────────────────

/// Draw one starfield frame: fade the previous one, draw the star trails,
/// then the banner on top.
pub fn render_title<S: Surface>(surface: &mut S, starfield: &Starfield, banner: Banner) {
    surface.fill_rect(full_screen(surface), C_BACKGROUND, STARFIELD_FADE);
    for (from, to) in starfield.trails() {
        surface.stroke_line(from, to, C_STAR, STAR_LINE_WIDTH);
    }
    draw_banner(surface, banner);
}

/// Shown while images are still loading.
pub fn render_loading<S: Surface>(surface: &mut S, remaining: usize) {
    surface.clear();
    let x = surface.width() / 2;
    let y = surface.height() / 2;
    let text = format!("Loading... ({} left)", remaining);
    surface.fill_text(&text, x, y, Align::Center, Color::DarkGrey);
}
