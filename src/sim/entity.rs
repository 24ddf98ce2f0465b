//! Non-player actors behind one closed tagged variant, plus the cosmetic
//! particle buffer.
//!
//! The Interaction Resolver stays a flat match over `Entity` kinds; the
//! Player is deliberately not a variant because it alone consumes input and
//! survives in-level deaths.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Goomba, Koopa};
use super::item::{Coin, Mushroom};
use super::physics::Body;
use super::tile::TileGrid;

/// Every live non-player actor in a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Goomba(Goomba),
    Koopa(Koopa),
    Mushroom(Mushroom),
    Coin(Coin),
}

impl Entity {
    pub fn body(&self) -> &Body {
        match self {
            Entity::Goomba(g) => &g.body,
            Entity::Koopa(k) => &k.body,
            Entity::Mushroom(m) => &m.body,
            Entity::Coin(c) => &c.body,
        }
    }

    pub fn alive(&self) -> bool {
        match self {
            Entity::Goomba(g) => g.alive,
            Entity::Koopa(k) => k.alive,
            Entity::Mushroom(m) => m.alive,
            Entity::Coin(c) => c.alive,
        }
    }

    /// `alive = false` is terminal; the tick purges after interactions.
    pub fn kill(&mut self) {
        match self {
            Entity::Goomba(g) => g.alive = false,
            Entity::Koopa(k) => k.alive = false,
            Entity::Mushroom(m) => m.alive = false,
            Entity::Coin(c) => c.alive = false,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, Entity::Goomba(_) | Entity::Koopa(_))
    }

    /// Whether the actor participates in overlap interactions this tick.
    /// Flattened Goombas and emerging Mushrooms are inert.
    pub fn collidable(&self) -> bool {
        match self {
            Entity::Goomba(g) => !g.squashed(),
            Entity::Koopa(_) => true,
            Entity::Mushroom(m) => !m.emerging(),
            Entity::Coin(_) => true,
        }
    }

    /// Enemies sit idle until the camera approaches; items never wait.
    pub fn needs_activation(&self) -> bool {
        self.is_enemy()
    }

    pub fn active(&self) -> bool {
        match self {
            Entity::Goomba(g) => g.active,
            Entity::Koopa(k) => k.active,
            _ => true,
        }
    }

    /// Activation is permanent: once triggered the actor is updated every
    /// tick for the rest of the level.
    pub fn activate(&mut self) {
        match self {
            Entity::Goomba(g) => g.active = true,
            Entity::Koopa(k) => k.active = true,
            _ => {}
        }
    }

    pub fn advance(&mut self, grid: &TileGrid) {
        match self {
            Entity::Goomba(g) => g.update(grid),
            Entity::Koopa(k) => k.update(grid),
            Entity::Mushroom(m) => m.update(grid),
            // Coins are static; the bob animation is presentation-side.
            Entity::Coin(_) => {}
        }
    }

    /// How far below the level bottom the actor may drift before it is
    /// marked not-alive.
    pub fn purge_margin(&self) -> f32 {
        if self.is_enemy() { 100.0 } else { 50.0 }
    }
}

/// Visual particle species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Dust,
    Debris,
    CoinPop,
}

/// Visual-only; excluded from all interaction and collision logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Maximum particles; oldest are dropped first.
pub const MAX_PARTICLES: usize = 256;

fn push_particle(particles: &mut Vec<Particle>, particle: Particle) {
    if particles.len() >= MAX_PARTICLES {
        particles.remove(0);
    }
    particles.push(particle);
}

/// Ground dust kicked up by landings, skids and fast running.
pub fn spawn_dust(particles: &mut Vec<Particle>, rng: &mut Pcg32, x: f32, y: f32, dir: f32) {
    push_particle(
        particles,
        Particle {
            pos: Vec2::new(x, y),
            vel: Vec2::new(
                dir * (0.5 + rng.random_range(0.0..0.7)),
                -rng.random_range(0.2..0.8),
            ),
            kind: ParticleKind::Dust,
            life: 1.0,
            size: 2.0 + rng.random_range(0.0..2.0),
        },
    );
}

/// Four brick chunks exploding out of a broken tile.
pub fn spawn_debris(particles: &mut Vec<Particle>, rng: &mut Pcg32, cx: f32, cy: f32) {
    for (dx, dy) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, -0.5), (1.0, -0.5_f32)] {
        push_particle(
            particles,
            Particle {
                pos: Vec2::new(cx, cy),
                vel: Vec2::new(
                    dx * (1.5 + rng.random_range(0.0..1.0)),
                    dy * (3.0 + rng.random_range(0.0..2.0)),
                ),
                kind: ParticleKind::Debris,
                life: 1.0,
                size: 6.0,
            },
        );
    }
}

/// The coin that pops out of a question block.
pub fn spawn_coin_pop(particles: &mut Vec<Particle>, rng: &mut Pcg32, cx: f32, cy: f32) {
    push_particle(
        particles,
        Particle {
            pos: Vec2::new(cx, cy),
            vel: Vec2::new(rng.random_range(-0.3..0.3), -5.0),
            kind: ParticleKind::CoinPop,
            life: 1.0,
            size: 8.0,
        },
    );
}

/// Integrate and expire the particle buffer. Runs every tick in every
/// non-inert phase; never feeds back into gameplay.
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        if matches!(p.kind, ParticleKind::Debris | ParticleKind::CoinPop) {
            p.vel.y += 0.3;
        }
        p.pos += p.vel;
        p.vel.x *= 0.95;
        p.life -= match p.kind {
            ParticleKind::Dust => 0.08,
            ParticleKind::Debris => 0.02,
            ParticleKind::CoinPop => 0.05,
        };
    }
    particles.retain(|p| p.life > 0.0);
}
