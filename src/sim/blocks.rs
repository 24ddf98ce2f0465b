//! Block interaction: the one-shot effect of hitting a tile from below.
//!
//! Invoked once per upward collision event with the tile's coordinates and
//! the player's size. Every tile kind has a defined outcome, most of them
//! no-ops.

use rand_pcg::Pcg32;

use super::entity::{Entity, Particle, spawn_coin_pop, spawn_debris};
use super::item::Mushroom;
use super::state::{GameEvent, Session};
use super::tile::{TileGrid, TileKind};
use crate::cell_center;
use crate::consts::TILE;

/// Enemies resting on a struck block die if their feet are strictly within
/// this many pixels of the block's top edge.
pub const KNOCK_TOLERANCE: f32 = 8.0;

/// Apply the hit protocol to the cell at (col, row). Out-of-range
/// coordinates read as empty and fall through to the no-op arm.
#[allow(clippy::too_many_arguments)]
pub fn hit_block(
    grid: &mut TileGrid,
    col: i32,
    row: i32,
    player_big: bool,
    session: &mut Session,
    entities: &mut Vec<Entity>,
    events: &mut Vec<GameEvent>,
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
) {
    let center = cell_center(col, row);
    match grid.get(col, row) {
        TileKind::Brick => {
            if player_big {
                grid.set(col, row, TileKind::Empty);
                session.score += 50;
                spawn_debris(particles, rng, center.x, center.y);
                events.push(GameEvent::BlockBroken);
            } else {
                events.push(GameEvent::BlockBumped);
            }
            knock_enemies_on_top(entities, col, row, session, events);
        }
        TileKind::QuestionCoin => {
            grid.set(col, row, TileKind::Used);
            session.coins += 1;
            session.score += 200;
            spawn_coin_pop(particles, rng, center.x, row as f32 * TILE);
            events.push(GameEvent::CoinCollected);
            knock_enemies_on_top(entities, col, row, session, events);
        }
        TileKind::QuestionMushroom => {
            grid.set(col, row, TileKind::Used);
            entities.push(Entity::Mushroom(Mushroom::new(
                col as f32 * TILE,
                row as f32 * TILE,
            )));
            events.push(GameEvent::MushroomSpawned);
            knock_enemies_on_top(entities, col, row, session, events);
        }
        TileKind::QuestionOneUp => {
            grid.set(col, row, TileKind::Used);
            session.lives += 1;
            events.push(GameEvent::OneUp);
            knock_enemies_on_top(entities, col, row, session, events);
        }
        // Ground, hard, pipes, used blocks: the bump already halted the
        // player's ascent; nothing else happens.
        _ => {}
    }
}

/// The knock-on-top rule: a live enemy whose span overlaps the struck
/// column and whose feet rest on the tile dies instantly.
fn knock_enemies_on_top(
    entities: &mut [Entity],
    col: i32,
    row: i32,
    session: &mut Session,
    events: &mut Vec<GameEvent>,
) {
    let left = col as f32 * TILE;
    let right = left + TILE;
    let top = row as f32 * TILE;

    for entity in entities.iter_mut() {
        if !entity.is_enemy() || !entity.alive() || !entity.collidable() {
            continue;
        }
        let b = entity.body();
        if b.pos.x < right && b.pos.x + b.w > left && (b.bottom() - top).abs() < KNOCK_TOLERANCE {
            entity.kill();
            session.score += 100;
            events.push(GameEvent::EnemyStomped);
        }
    }
}
