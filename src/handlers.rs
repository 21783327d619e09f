/// Bus subscribers that own every session-state mutation: input, collision
/// consequences and phase transitions.
use crate::audio::{Cue, Sound};
use crate::bus::{EventBus, Message, Outbox, Topic};
use crate::compute::{nudge_player, set_player_velocity, start_session};
use crate::config::{
    FIRE_COOLDOWN_MS, MUZZLE_DX, MUZZLE_DY, PLAYER_SPEED, SCORE_PER_ENEMY, THEME_DELAY_MS,
};
use crate::entities::{Entity, EntityKind, ExplosionFlavor, Facing};
use crate::session::{Banner, GameState, Phase};

/// Register every game handler on `bus`.
pub fn install(bus: &mut EventBus<GameState>) {
    bus.subscribe(Topic::AssetsReady, on_assets_ready);
    bus.subscribe(Topic::TitleClick, on_title_click);
    bus.subscribe(Topic::GameStart, on_game_start);
    bus.subscribe(Topic::GamePause, on_game_pause);
    bus.subscribe(Topic::HeroSpeedLeft, on_hero_speed);
    bus.subscribe(Topic::HeroSpeedRight, on_hero_speed);
    bus.subscribe(Topic::HeroSpeedZero, on_hero_speed);
    bus.subscribe(Topic::KeyUp, on_nudge);
    bus.subscribe(Topic::KeyDown, on_nudge);
    bus.subscribe(Topic::HeroFire, on_hero_fire);
    bus.subscribe(Topic::CollisionProjectileEnemy, on_projectile_hit);
    bus.subscribe(Topic::CollisionEnemyPlayer, on_player_hit);
    bus.subscribe(Topic::EnemyOutOfBounds, on_enemy_out_of_bounds);
    bus.subscribe(Topic::GameEndLoss, on_game_end_loss);
    bus.subscribe(Topic::GameEndWin, on_game_end_win);
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

fn on_assets_ready(_: &Message, state: &mut GameState, _: &mut Outbox) {
    if state.phase() == Phase::NotReady {
        state.banner = Some(Banner::Title);
        state.set_phase(Phase::TitleScreen);
    }
}

fn on_title_click(_: &Message, state: &mut GameState, _: &mut Outbox) {
    if state.phase().can_start() {
        state.cue(Cue::Play(Sound::TitleScreen));
    }
}

fn on_game_start(_: &Message, state: &mut GameState, _: &mut Outbox) {
    if !state.phase().can_start() {
        return;
    }
    state.cue(Cue::StopAll);
    state.cue(Cue::Play(Sound::Start));
    state.cue(Cue::PlayAfter(Sound::Theme, THEME_DELAY_MS));

    start_session(state);
    state.set_phase(Phase::Playing);
    log::info!("session started with {} entities", state.entities.len());
}

fn on_game_pause(_: &Message, state: &mut GameState, _: &mut Outbox) {
    match state.phase() {
        Phase::Playing => {
            state.cue(Cue::Pause(Sound::Theme));
            state.banner = Some(Banner::Paused);
            state.set_phase(Phase::Paused);
        }
        Phase::Paused => {
            state.cue(Cue::Resume(Sound::Theme));
            state.banner = None;
            state.set_phase(Phase::Playing);
        }
        _ => {}
    }
}

fn on_game_end_loss(_: &Message, state: &mut GameState, _: &mut Outbox) {
    if state.phase() != Phase::Playing {
        return;
    }
    state.cue(Cue::StopAll);
    state.cue(Cue::Play(Sound::GameOver));
    state.banner = Some(Banner::Loss);
    state.set_phase(Phase::Ended);
    log::info!("session lost with score {}", state.session.score);
}

fn on_game_end_win(_: &Message, state: &mut GameState, _: &mut Outbox) {
    if state.phase() != Phase::Playing {
        return;
    }
    state.cue(Cue::StopAll);
    state.cue(Cue::Play(Sound::StageCleared));
    state.banner = Some(Banner::Win);
    state.set_phase(Phase::Ended);
    log::info!("session won with score {}", state.session.score);
}

// ── Input ────────────────────────────────────────────────────────────────────

fn on_hero_speed(message: &Message, state: &mut GameState, _: &mut Outbox) {
    if state.phase() != Phase::Playing {
        return;
    }
    let (vx, facing) = match message {
        Message::HeroSpeedLeft => (-PLAYER_SPEED, Facing::Left),
        Message::HeroSpeedRight => (PLAYER_SPEED, Facing::Right),
        _ => (0, Facing::Neutral),
    };
    set_player_velocity(state, vx);
    if let Some(player) = state.player_mut() {
        if let EntityKind::Player { facing: f, .. } = &mut player.kind {
            *f = facing;
        }
    }
}

fn on_nudge(message: &Message, state: &mut GameState, _: &mut Outbox) {
    if state.phase() != Phase::Playing {
        return;
    }
    let direction = if *message == Message::KeyUp { -1 } else { 1 };
    nudge_player(state, direction);
}

fn on_hero_fire(_: &Message, state: &mut GameState, _: &mut Outbox) {
    if state.phase() != Phase::Playing || state.cooldown_ms > 0 {
        return;
    }
    let (x, y) = match state.player() {
        Some(p) if p.is_alive() => (p.x + MUZZLE_DX, p.y + MUZZLE_DY),
        _ => return,
    };
    state.cue(Cue::Play(Sound::Laser));
    state.spawn(|id| Entity::projectile(id, x, y));
    state.cooldown_ms = FIRE_COOLDOWN_MS;
}

// ── Collisions ───────────────────────────────────────────────────────────────

fn on_projectile_hit(message: &Message, state: &mut GameState, _: &mut Outbox) {
    let (projectile, enemy) = match message {
        Message::CollisionProjectileEnemy { projectile, enemy } => (*projectile, *enemy),
        _ => return,
    };
    if let Some(p) = state.entity_mut(projectile) {
        p.dead = true;
    }
    let (x, y) = match state.entity_mut(enemy) {
        Some(e) => {
            e.dead = true;
            (e.x, e.y)
        }
        None => return,
    };
    state.session.score += SCORE_PER_ENEMY;
    state.spawn_explosion(x, y, ExplosionFlavor::RedShot);
    state.cue(Cue::Play(Sound::Explosion));
}

fn on_player_hit(message: &Message, state: &mut GameState, outbox: &mut Outbox) {
    let enemy = match message {
        Message::CollisionEnemyPlayer { enemy } => *enemy,
        _ => return,
    };
    // Lives already spent: nothing further may be taken.
    if state.phase() != Phase::Playing {
        return;
    }

    let lives = state.session.lose_life();
    if lives == 0 {
        if let Some((x, y)) = state.player_mut().map(|p| {
            p.dead = true;
            (p.x, p.y)
        }) {
            state.spawn_explosion(x, y, ExplosionFlavor::GreenShot);
        }
        outbox.publish(Message::GameEndLoss);
    }

    if let Some((x, y)) = state.entity_mut(enemy).map(|e| {
        e.dead = true;
        (e.x, e.y)
    }) {
        state.spawn_explosion(x, y, ExplosionFlavor::RedShot);
    }
}

fn on_enemy_out_of_bounds(_: &Message, state: &mut GameState, outbox: &mut Outbox) {
    if state.phase() != Phase::Playing {
        return;
    }
    log::info!("enemy reached the bottom of the field");
    if let Some(player) = state.player_mut() {
        player.dead = true;
    }
    outbox.publish(Message::GameEndLoss);
}
