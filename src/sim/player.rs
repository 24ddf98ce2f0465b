//! Player movement state machine.
//!
//! The tuned part of the whole simulation: ground/air acceleration, skid
//! braking, coyote time, jump buffering, variable-height jumps, and the
//! grow/shrink/crouch size transitions. All constants come straight from
//! the tuning table in `crate::consts`.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Particle, spawn_dust};
use super::physics::Body;
use super::state::GameEvent;
use super::tick::TickInput;
use super::tile::TileGrid;
use crate::consts::*;

pub const PLAYER_W: f32 = 24.0;
pub const SMALL_H: f32 = 30.0;
pub const BIG_H: f32 = 54.0;
pub const CROUCH_H: f32 = 36.0;

/// Physics freeze while the grow transition plays out.
pub const GROW_FREEZE_TICKS: u32 = 40;
/// Post-damage invincibility window.
pub const HURT_INVINCIBLE_TICKS: u32 = 90;
/// Minimum spacing between skid cues.
const SKID_CUE_COOLDOWN: u32 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub big: bool,
    /// Facing, +1 right / -1 left.
    pub dir: i8,
    pub grounded: bool,
    was_grounded: bool,
    /// Jump latch: holding the button cannot re-trigger until release.
    jumping: bool,
    pub crouching: bool,
    pub skidding: bool,
    skid_cue_cooldown: u32,
    pub coyote: u32,
    pub jump_buffer: u32,
    was_jump_pressed: bool,
    /// Ticks of post-damage invincibility remaining.
    pub invincible: u32,
    /// Physics suspended while nonzero (grow transition).
    pub grow_timer: u32,
    pub dead: bool,
    run_dust_timer: u32,
}

impl Player {
    /// Spawn small with feet at the given pixel position's bottom edge.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, PLAYER_W, SMALL_H),
            big: false,
            dir: 1,
            grounded: false,
            was_grounded: false,
            jumping: false,
            crouching: false,
            skidding: false,
            skid_cue_cooldown: 0,
            coyote: 0,
            jump_buffer: 0,
            was_jump_pressed: false,
            invincible: 0,
            grow_timer: 0,
            dead: false,
            run_dust_timer: 0,
        }
    }

    /// One control+physics tick. Returns the cells head-bumped this tick;
    /// the caller runs block interaction for each.
    pub fn update(
        &mut self,
        input: &TickInput,
        grid: &TileGrid,
        ticks: u64,
        events: &mut Vec<GameEvent>,
        particles: &mut Vec<Particle>,
        rng: &mut Pcg32,
    ) -> Vec<(i32, i32)> {
        if self.dead {
            return Vec::new();
        }

        // Grow transition freezes integration entirely.
        if self.grow_timer > 0 {
            self.grow_timer -= 1;
            return Vec::new();
        }

        // Crouch only while big, grounded, and not steering.
        self.crouching =
            self.big && self.grounded && input.down && !input.left && !input.right;

        let max_speed = if input.run {
            PLAYER_RUN_MAX
        } else {
            PLAYER_MAX_SPEED
        };
        let accel = if self.grounded {
            PLAYER_ACCEL
        } else {
            PLAYER_AIR_ACCEL
        };
        let friction = if self.grounded {
            PLAYER_FRICTION
        } else {
            PLAYER_AIR_FRICTION
        };

        // Skid: steering against the current velocity while moving fast.
        self.skidding = self.grounded
            && !self.crouching
            && ((input.left && self.body.vel.x > 2.0) || (input.right && self.body.vel.x < -2.0));

        if !self.crouching {
            if input.left {
                self.body.vel.x -= accel;
                if !self.skidding {
                    self.dir = -1;
                }
            } else if input.right {
                self.body.vel.x += accel;
                if !self.skidding {
                    self.dir = 1;
                }
            } else {
                self.body.vel.x *= friction;
                if self.body.vel.x.abs() < 0.1 {
                    self.body.vel.x = 0.0;
                }
            }
        } else {
            self.body.vel.x *= 0.9;
            if self.body.vel.x.abs() < 0.1 {
                self.body.vel.x = 0.0;
            }
        }

        if self.skidding {
            self.body.vel.x *= PLAYER_SKID_FRICTION;
            if ticks % 3 == 0 {
                spawn_dust(
                    particles,
                    rng,
                    self.body.pos.x + self.body.w / 2.0,
                    self.body.bottom(),
                    if self.body.vel.x > 0.0 { 1.0 } else { -1.0 },
                );
            }
            if self.skid_cue_cooldown == 0 {
                events.push(GameEvent::Skid);
                self.skid_cue_cooldown = SKID_CUE_COOLDOWN;
            }
            // Facing flips once the brake has mostly won.
            if self.body.vel.x.abs() < 1.0 {
                self.dir = if input.left { -1 } else { 1 };
            }
        }
        self.skid_cue_cooldown = self.skid_cue_cooldown.saturating_sub(1);

        self.body.vel.x = self.body.vel.x.clamp(-max_speed, max_speed);

        // Jump buffer: a press edge is remembered for a short window. The
        // press tick itself does not consume a decrement.
        if input.jump && !self.was_jump_pressed {
            self.jump_buffer = JUMP_BUFFER_TICKS;
        } else if self.jump_buffer > 0 {
            self.jump_buffer -= 1;
        }
        self.was_jump_pressed = input.jump;

        let can_jump = self.grounded || self.coyote > 0;
        if can_jump && self.jump_buffer > 0 && !self.jumping && !self.crouching {
            // Faster run, higher jump.
            let speed_factor = self.body.vel.x.abs() / PLAYER_RUN_MAX;
            let base_force = if self.big { JUMP_FORCE_BIG } else { JUMP_FORCE };
            self.body.vel.y = base_force - speed_factor * 0.8;
            self.grounded = false;
            self.coyote = 0;
            self.jump_buffer = 0;
            self.jumping = true;
            events.push(GameEvent::Jump);
            spawn_dust(particles, rng, self.body.pos.x + 4.0, self.body.bottom(), -1.0);
            spawn_dust(
                particles,
                rng,
                self.body.pos.x + self.body.w - 4.0,
                self.body.bottom(),
                1.0,
            );
        }
        if !input.jump {
            self.jumping = false;
        }

        // Variable jump height: releasing early clamps the ascent.
        if !input.jump && self.body.vel.y < -3.0 {
            self.body.vel.y = -3.0;
        }

        self.body.apply_gravity();

        self.was_grounded = self.grounded;

        // Axis-separated movement: X fully, then Y.
        let mut bumped = Vec::new();
        self.body.resolve_x(grid);
        if self.body.pos.x < 0.0 {
            self.body.pos.x = 0.0;
            self.body.vel.x = 0.0;
        }
        let contact = self.body.resolve_y(grid);
        self.grounded = contact.grounded;
        if !contact.bumped.is_empty() {
            // Head bump: a slight downward nudge instead of a clean zero so
            // the next tick separates from the ceiling.
            self.body.vel.y = 1.0;
            bumped = contact.bumped;
        }

        // Coyote grace was checked before movement, so the full window
        // stays usable after leaving the ground.
        if self.grounded {
            self.coyote = COYOTE_TICKS;
        } else if self.coyote > 0 {
            self.coyote -= 1;
        }

        self.apply_size();

        // Landing and running dust.
        if self.grounded && !self.was_grounded {
            spawn_dust(particles, rng, self.body.pos.x + 4.0, self.body.bottom(), -1.0);
            spawn_dust(
                particles,
                rng,
                self.body.pos.x + self.body.w - 4.0,
                self.body.bottom(),
                1.0,
            );
        }
        if self.grounded && self.body.vel.x.abs() > 4.5 {
            self.run_dust_timer += 1;
            if self.run_dust_timer > 4 {
                self.run_dust_timer = 0;
                let (x, d) = if self.body.vel.x > 0.0 {
                    (self.body.pos.x, -1.0)
                } else {
                    (self.body.pos.x + self.body.w, 1.0)
                };
                spawn_dust(particles, rng, x, self.body.bottom(), d);
            }
        } else {
            self.run_dust_timer = 0;
        }

        if self.invincible > 0 {
            self.invincible -= 1;
        }

        bumped
    }

    /// Hitbox follows the size mode, anchoring the feet on every change.
    fn apply_size(&mut self) {
        if self.big {
            if self.crouching {
                let old_h = self.body.h;
                self.body.h = CROUCH_H;
                if old_h > CROUCH_H {
                    self.body.pos.y += old_h - CROUCH_H;
                }
            } else {
                let old_h = self.body.h;
                self.body.h = BIG_H;
                if old_h == CROUCH_H {
                    self.body.pos.y -= BIG_H - CROUCH_H;
                }
            }
        } else {
            self.body.h = SMALL_H;
        }
    }

    /// Mushroom pickup. Size and hitbox change immediately; integration is
    /// suspended for the freeze window.
    pub fn grow(&mut self) {
        if !self.big {
            self.big = true;
            self.body.pos.y -= BIG_H - SMALL_H;
            self.body.h = BIG_H;
            self.grow_timer = GROW_FREEZE_TICKS;
        }
    }

    /// Damage: big shrinks with a grace window, small dies.
    /// Returns true when the hit was fatal.
    pub fn take_damage(&mut self) -> bool {
        if self.invincible > 0 {
            return false;
        }
        if self.big {
            self.big = false;
            self.body.h = SMALL_H;
            self.crouching = false;
            self.invincible = HURT_INVINCIBLE_TICKS;
            false
        } else {
            self.start_death();
            true
        }
    }

    /// Enter the death fall: a fixed upward hop, then gravity only.
    pub fn start_death(&mut self) {
        if !self.dead {
            self.dead = true;
            self.body.vel.y = JUMP_FORCE;
        }
    }
}
