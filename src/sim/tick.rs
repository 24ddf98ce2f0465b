//! Top-level per-tick state machine.
//!
//! Within `playing` the order is fixed and load-bearing: player update and
//! block interaction, entity updates, interaction resolution, flag scan,
//! timer, then the purge. Reordering changes observable outcomes.

use super::blocks;
use super::entity;
use super::interact;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::{GRAVITY, TILE, VIEW_W};
use crate::tile_index;

/// Per-tick snapshot of boolean input intents. Device mapping is an
/// external concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub run: bool,
    pub down: bool,
}

/// Ticks of unmanaged death fall before the respawn/game-over branch.
pub const DYING_TICKS: u32 = 120;
/// Scripted walk-off duration after the flag.
pub const LEVEL_COMPLETE_TICKS: u32 = 120;
/// The player falls this far past the level bottom before dying.
pub const FALL_OUT_MARGIN: f32 = 50.0;

/// Enemies activate inside this camera-relative window and stay active.
const ACTIVATE_AHEAD: f32 = 100.0;
const ACTIVATE_BEHIND: f32 = 64.0;
/// Scripted descent speed down the pole.
const FLAG_SLIDE_SPEED: f32 = 3.0;
/// Walk-off speed during `levelcomplete`.
const WALK_OFF_SPEED: f32 = 2.0;

/// Advance the simulation by one fixed step.
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        // Inert; exited only by external start/reset triggers.
        GamePhase::Menu | GamePhase::GameOver | GamePhase::Win => {}
        GamePhase::Playing => tick_playing(state, input),
        GamePhase::Dying => tick_dying(state),
        GamePhase::LevelComplete => tick_level_complete(state),
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;
    let ticks = state.time_ticks;
    let mut rng = state.tick_rng();

    if state.flag_sliding {
        slide_flag(state);
        entity::update_particles(&mut state.particles);
        state.camera.follow(state.player.body.pos.x, state.grid.px_width());
        return;
    }

    let GameState {
        session,
        grid,
        player,
        entities,
        camera,
        flag_sliding,
        timer_seconds,
        timer_subtick,
        events,
        particles,
        ..
    } = &mut *state;

    // Player movement, then block interaction per head-bumped cell.
    let bumped = player.update(input, grid, ticks, events, particles, &mut rng);
    for (col, row) in bumped {
        blocks::hit_block(
            grid, col, row, player.big, session, entities, events, particles, &mut rng,
        );
    }

    if !player.dead && player.body.pos.y > grid.px_height() + FALL_OUT_MARGIN {
        player.start_death();
        events.push(GameEvent::PlayerDied);
    }

    // Entity updates, gated by camera-window activation.
    let ahead = camera.x + VIEW_W + ACTIVATE_AHEAD;
    let behind = camera.x - ACTIVATE_BEHIND;
    for entity in entities.iter_mut() {
        if entity.needs_activation() && !entity.active() {
            let x = entity.body().pos.x;
            if x < ahead && x > behind {
                entity.activate();
            }
        }
        if entity.active() && entity.alive() {
            entity.advance(grid);
        }
    }

    // Far-below-the-level fallback: marked not-alive, purged below.
    let bottom = grid.px_height();
    for entity in entities.iter_mut() {
        if entity.alive() && entity.body().pos.y > bottom + entity.purge_margin() {
            entity.kill();
        }
    }

    interact::resolve(player, entities, session, events);

    if !*flag_sliding && !player.dead && interact::touching_flag(player, grid) {
        *flag_sliding = true;
        player.body.vel.x = 0.0;
        player.body.vel.y = FLAG_SLIDE_SPEED;
        // Score scales with contact height above the base.
        let center_row = tile_index(player.body.center().y) as i64;
        session.score += (grid.rows() as i64 - center_row).max(0) as u64 * 100;
        events.push(GameEvent::FlagReached);
    }

    // Level timer: one second per 60 ticks; zero forces death.
    *timer_subtick += 1;
    if *timer_subtick >= 60 {
        *timer_subtick = 0;
        if *timer_seconds > 0 {
            *timer_seconds -= 1;
            if *timer_seconds == 0 && !player.dead {
                player.start_death();
                events.push(GameEvent::PlayerDied);
            }
        }
    }

    // Purge is last: interactions above observed everything that died
    // this tick.
    entities.retain(|e| e.alive());
    entity::update_particles(particles);
    camera.follow(player.body.pos.x, grid.px_width());

    if state.player.dead {
        state.session.lives -= 1;
        state.phase = GamePhase::Dying;
        state.phase_ticks = 0;
        log::debug!("player died, {} lives left", state.session.lives);
    }
}

/// Scripted flag descent; exclusive of normal control.
fn slide_flag(state: &mut GameState) {
    let player = &mut state.player;
    player.body.vel.x = 0.0;
    player.body.pos.y += FLAG_SLIDE_SPEED;

    let base = (state.grid.rows() as f32 - 2.0) * TILE;
    if player.body.bottom() >= base {
        player.body.pos.y = base - player.body.h;
        player.body.vel.y = 0.0;
        player.grounded = true;
        state.flag_sliding = false;
        state.phase = GamePhase::LevelComplete;
        state.phase_ticks = 0;
        state.events.push(GameEvent::LevelComplete);
        log::info!("level {} complete", state.session.level_index);
    }
}

/// Gravity-only fall at half strength, no collision; everything else is
/// suspended.
fn tick_dying(state: &mut GameState) {
    state.time_ticks += 1;
    state.phase_ticks += 1;

    state.player.body.vel.y += GRAVITY * 0.5;
    state.player.body.pos.y += state.player.body.vel.y;
    entity::update_particles(&mut state.particles);

    if state.phase_ticks >= DYING_TICKS {
        if state.session.lives > 0 {
            let index = state.session.level_index;
            if let Err(err) = state.load_level(index) {
                log::error!("respawn failed: {err}");
                state.phase = GamePhase::GameOver;
            }
        } else {
            state.phase = GamePhase::GameOver;
            log::info!("game over");
        }
    }
}

fn tick_level_complete(state: &mut GameState) {
    state.time_ticks += 1;
    state.phase_ticks += 1;

    state.player.body.pos.x += WALK_OFF_SPEED;
    state.player.dir = 1;
    entity::update_particles(&mut state.particles);
    state.camera.follow(state.player.body.pos.x, state.grid.px_width());

    if state.phase_ticks >= LEVEL_COMPLETE_TICKS {
        let next = state.session.level_index + 1;
        if next < state.levels.len() {
            if let Err(err) = state.load_level(next) {
                log::error!("level advance failed: {err}");
                state.phase = GamePhase::GameOver;
            }
        } else {
            state.phase = GamePhase::Win;
            log::info!("all levels clear");
        }
    }
}
