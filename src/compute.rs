/// Game-logic functions: session seeding, per-kind motion rules and the
/// per-tick collision & state update.
///
/// Everything here works on a `GameState` in place.  Consequences of a
/// collision are never applied directly: the update pass publishes a
/// message and the handlers in `handlers` react to it.
use crate::bus::{EventBus, Message};
use crate::config::{
    ENEMY_BASE_SPEED, ENEMY_COLUMNS, ENEMY_DESCENT, ENEMY_DESCEND_EVERY, ENEMY_HEIGHT,
    ENEMY_ROWS, ENEMY_SWEEP_EVERY, ENEMY_SWEEP_ORIGIN, ENEMY_WIDTH, INITIAL_ENEMIES,
    PLAYER_NUDGE, PROJECTILE_STEP, START_LIVES, TICK_MS,
};
use crate::entities::{Entity, EntityId, EntityKind, KindTag};
use crate::session::{GameState, Phase};

// ── Difficulty ───────────────────────────────────────────────────────────────

/// Sideways enemy step for the given number of survivors.  Every enemy
/// speeds up by one for each one destroyed.
pub fn enemy_speed(remaining: usize) -> i32 {
    ENEMY_BASE_SPEED + (INITIAL_ENEMIES as i32 - remaining as i32)
}

/// `(max_left, max_right)` sweep limits for an enemy lane.
pub fn sweep_limits(lane: i32, enemy_width: i32, field_width: i32) -> (i32, i32) {
    let max_right = field_width - enemy_width * lane;
    let max_left = ENEMY_SWEEP_ORIGIN - enemy_width * lane;
    (max_left, max_right)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh context for a `width`×`height` play field, waiting on assets.
pub fn init_state(width: i32, height: i32) -> GameState {
    GameState::new(width, height)
}

/// The 5×5 enemy grid, centred horizontally, lanes numbered 5..=1 from the
/// left.
pub fn create_enemies(state: &mut GameState) {
    let grid_width = ENEMY_COLUMNS * ENEMY_WIDTH;
    let start_x = (state.width - grid_width) / 2;

    for column in 0..ENEMY_COLUMNS {
        let x = start_x + column * ENEMY_WIDTH;
        let lane = ENEMY_COLUMNS - column;
        for row in 0..ENEMY_ROWS {
            let y = row * ENEMY_HEIGHT;
            state.spawn(|id| Entity::enemy(id, x, y, lane));
        }
    }
}

pub fn create_player(state: &mut GameState) -> EntityId {
    let x = state.width / 2;
    let y = state.height / 4 * 3;
    state.spawn(|id| Entity::player(id, x, y))
}

/// Reset score, lives and the collection for a new session.
pub fn start_session(state: &mut GameState) {
    state.session.score = 0;
    state.session.lives = START_LIVES;
    state.entities.clear();
    state.tick = 0;
    state.cooldown_ms = 0;
    state.banner = None;

    create_enemies(state);
    create_player(state);
}

// ── Input-driven movement ────────────────────────────────────────────────────

/// Set the player's horizontal velocity.
pub fn set_player_velocity(state: &mut GameState, vx: i32) {
    if let Some(player) = state.player_mut() {
        if let EntityKind::Player { velocity, .. } = &mut player.kind {
            velocity.x = vx;
            velocity.y = 0;
        }
    }
}

/// Vertical nudge; `direction` is -1 (up) or +1 (down).
pub fn nudge_player(state: &mut GameState, direction: i32) {
    let height = state.height;
    if let Some(player) = state.player_mut() {
        if direction < 0 && player.y > 0 {
            player.y -= PLAYER_NUDGE;
        } else if direction > 0 && player.y < height {
            player.y += PLAYER_NUDGE;
        }
    }
}

/// Apply the player's velocity, clamped to the play field.
pub fn apply_player_velocity(state: &mut GameState) {
    let width = state.width;
    if let Some(player) = state.player_mut() {
        if let EntityKind::Player { velocity, .. } = player.kind {
            if velocity.x != 0 {
                let max_x = (width - player.width).max(0);
                player.x = (player.x + velocity.x).clamp(0, max_x);
            }
        }
    }
}

// ── Per-kind motion ──────────────────────────────────────────────────────────

/// Advance one entity for update tick `tick`.  Returns a message when the
/// move has a consequence beyond the entity itself.
pub fn advance(
    entity: &mut Entity,
    tick: u64,
    field_width: i32,
    field_height: i32,
) -> Option<Message> {
    if entity.dead {
        return None;
    }
    match &mut entity.kind {
        // Driven by velocity in the update pass.
        EntityKind::Player { .. } => None,
        EntityKind::Projectile => {
            if entity.y > 0 {
                entity.y -= PROJECTILE_STEP;
            }
            if entity.y <= 0 {
                entity.dead = true;
            }
            None
        }
        EntityKind::Enemy {
            moving_right,
            lane,
            speed,
        } => {
            if tick % ENEMY_SWEEP_EVERY == 0 {
                let (max_left, max_right) = sweep_limits(*lane, entity.width, field_width);
                if *moving_right {
                    if entity.x + entity.width < max_right {
                        entity.x += *speed;
                    } else {
                        *moving_right = false;
                    }
                } else if entity.x > max_left {
                    entity.x -= *speed;
                } else {
                    *moving_right = true;
                }
            }
            if tick % ENEMY_DESCEND_EVERY == 0 {
                if entity.y < field_height {
                    entity.y += ENEMY_DESCENT;
                }
                if entity.y >= field_height - entity.height {
                    entity.dead = true;
                    return Some(Message::EnemyOutOfBounds { enemy: entity.id });
                }
            }
            None
        }
        EntityKind::Explosion { expires_at, .. } => {
            if tick >= *expires_at {
                entity.dead = true;
            }
            None
        }
    }
}

fn still_playing(state: &GameState) -> bool {
    state.phase() == Phase::Playing
}

fn intersecting(state: &GameState, a: EntityId, b: EntityId) -> bool {
    match (state.entity(a), state.entity(b)) {
        (Some(a), Some(b)) => a.rect().intersects(&b.rect()),
        _ => false,
    }
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// One collision & state update pass.  Does nothing unless the session is
/// `Playing`.
///
/// Collision pairs are drawn from the projectiles and enemies alive at the
/// start of the tick, whatever happens to them during it.  A projectile
/// that runs off the top this tick can still land a hit, an enemy killed
/// by a projectile can still ram the player, and one projectile
/// overlapping two enemies destroys (and scores) both.
pub fn tick(state: &mut GameState, bus: &mut EventBus<GameState>) {
    if !still_playing(state) {
        return;
    }
    state.tick += 1;

    // ── 1. Count the survivors ───────────────────────────────────────────────
    let enemies: Vec<EntityId> = state.live(KindTag::Enemy).map(|e| e.id).collect();
    let projectiles: Vec<EntityId> = state.live(KindTag::Projectile).map(|e| e.id).collect();

    // ── 2. Win / loss ────────────────────────────────────────────────────────
    let player_alive = state.player().map_or(false, Entity::is_alive);
    if !player_alive {
        bus.publish(state, Message::GameEndLoss);
    } else if enemies.is_empty() {
        bus.publish(state, Message::GameEndWin);
    }

    if still_playing(state) {
        // ── 3. Player velocity ───────────────────────────────────────────────
        apply_player_velocity(state);

        // ── 4. Difficulty ramp ───────────────────────────────────────────────
        let speed = enemy_speed(enemies.len());
        log::debug!("enemies remaining: {}, speed: {}", enemies.len(), speed);
        for entity in state.entities.iter_mut() {
            if let EntityKind::Enemy { speed: s, .. } = &mut entity.kind {
                *s = speed;
            }
        }

        // ── 5. Motion ────────────────────────────────────────────────────────
        state.cooldown_ms = state.cooldown_ms.saturating_sub(TICK_MS as u32);
        let (tick, width, height) = (state.tick, state.width, state.height);
        let raised: Vec<Message> = state
            .entities
            .iter_mut()
            .filter_map(|e| advance(e, tick, width, height))
            .collect();
        for message in raised {
            bus.publish(state, message);
        }
    }

    if still_playing(state) {
        // ── 6. Projectile ↔ enemy ────────────────────────────────────────────
        for &projectile in &projectiles {
            for &enemy in &enemies {
                if intersecting(state, projectile, enemy) {
                    bus.publish(state, Message::CollisionProjectileEnemy { projectile, enemy });
                }
            }
        }

        // ── 7. Enemy ↔ player ────────────────────────────────────────────────
        for &enemy in &enemies {
            if !still_playing(state) {
                break;
            }
            let player = match state.player() {
                Some(p) if p.is_alive() => p.id,
                _ => break,
            };
            if intersecting(state, enemy, player) {
                bus.publish(state, Message::CollisionEnemyPlayer { enemy });
            }
        }
    }

    // ── 8. Purge ─────────────────────────────────────────────────────────────
    state.purge_dead();
}
