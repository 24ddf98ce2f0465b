//! Enemy behavior state machines.
//!
//! Goombas patrol and squash; Koopas cycle patrolling, shell-idle and
//! shell-moving. Both share the player's gravity and axis-separated tile
//! resolution, differing only in what a wall contact means.

use serde::{Deserialize, Serialize};

use super::physics::Body;
use super::tile::TileGrid;
use crate::consts::{ENEMY_SPEED, KOOPA_SHELL_SPEED};

pub const GOOMBA_W: f32 = 28.0;
pub const GOOMBA_H: f32 = 30.0;
pub const KOOPA_W: f32 = 21.0;
pub const KOOPA_H: f32 = 42.0;
pub const SHELL_H: f32 = 22.0;

/// Ticks a flattened Goomba lingers before being purged.
pub const FLATTEN_TICKS: u32 = 30;
/// Re-trigger guard armed by every shell transition.
pub const SHELL_COOLDOWN_TICKS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoombaState {
    Walking,
    Flattened { ticks_left: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goomba {
    pub body: Body,
    pub state: GoombaState,
    /// Patrol direction, ±1.
    pub dir: f32,
    pub active: bool,
    pub alive: bool,
}

impl Goomba {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, GOOMBA_W, GOOMBA_H),
            state: GoombaState::Walking,
            dir: -1.0,
            active: false,
            alive: true,
        }
    }

    pub fn update(&mut self, grid: &TileGrid) {
        match self.state {
            GoombaState::Flattened { ticks_left } => {
                let ticks_left = ticks_left - 1;
                if ticks_left == 0 {
                    self.alive = false;
                }
                self.state = GoombaState::Flattened { ticks_left };
            }
            GoombaState::Walking => {
                self.body.vel.x = self.dir * ENEMY_SPEED;
                self.body.apply_gravity();
                if self.body.resolve_x(grid).is_some() {
                    self.dir = -self.dir;
                    self.body.vel.x = self.dir * ENEMY_SPEED;
                }
                self.body.resolve_y(grid);
            }
        }
    }

    /// Stomp outcome: inert pancake for a fixed window, then purged.
    pub fn flatten(&mut self) {
        self.state = GoombaState::Flattened {
            ticks_left: FLATTEN_TICKS,
        };
        self.body.vel.x = 0.0;
    }

    pub fn squashed(&self) -> bool {
        matches!(self.state, GoombaState::Flattened { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KoopaState {
    Walking,
    ShellIdle { cooldown: u32 },
    ShellMoving,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Koopa {
    pub body: Body,
    pub state: KoopaState,
    /// Patrol or shell travel direction, ±1.
    pub dir: f32,
    pub active: bool,
    pub alive: bool,
}

impl Koopa {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, KOOPA_W, KOOPA_H),
            state: KoopaState::Walking,
            dir: -1.0,
            active: false,
            alive: true,
        }
    }

    pub fn update(&mut self, grid: &TileGrid) {
        match self.state {
            KoopaState::Walking => {
                self.body.vel.x = self.dir * ENEMY_SPEED;
                self.body.apply_gravity();
                if self.body.resolve_x(grid).is_some() {
                    self.dir = -self.dir;
                    self.body.vel.x = self.dir * ENEMY_SPEED;
                }
                self.body.resolve_y(grid);
            }
            KoopaState::ShellIdle { cooldown } => {
                if cooldown > 0 {
                    self.state = KoopaState::ShellIdle {
                        cooldown: cooldown - 1,
                    };
                }
                self.body.vel.x = 0.0;
                self.body.apply_gravity();
                self.body.resolve_y(grid);
            }
            KoopaState::ShellMoving => {
                self.body.vel.x = self.dir * KOOPA_SHELL_SPEED;
                self.body.apply_gravity();
                // Shells rebound off walls at full speed.
                if self.body.resolve_x(grid).is_some() {
                    self.dir = -self.dir;
                    self.body.vel.x = self.dir * KOOPA_SHELL_SPEED;
                }
                self.body.resolve_y(grid);
            }
        }
    }

    /// First stomp: tuck into the shell. The hitbox shrinks from the top so
    /// the feet stay planted.
    pub fn enter_shell(&mut self) {
        self.body.pos.y += KOOPA_H - SHELL_H;
        self.body.h = SHELL_H;
        self.body.vel.x = 0.0;
        self.state = KoopaState::ShellIdle {
            cooldown: SHELL_COOLDOWN_TICKS,
        };
    }

    /// Launch the idle shell in the given direction.
    pub fn kick(&mut self, dir: f32) {
        self.dir = dir;
        self.body.vel.x = dir * KOOPA_SHELL_SPEED;
        self.state = KoopaState::ShellMoving;
    }

    /// Stomp on a moving shell: halt it, re-arming the cooldown.
    pub fn halt(&mut self) {
        self.body.vel.x = 0.0;
        self.state = KoopaState::ShellIdle {
            cooldown: SHELL_COOLDOWN_TICKS,
        };
    }

    /// A cooling-down idle shell ignores all contact.
    pub fn cooling(&self) -> bool {
        matches!(self.state, KoopaState::ShellIdle { cooldown } if cooldown > 0)
    }
}
