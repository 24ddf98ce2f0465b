//! Tile Hopper - a deterministic tile platformer simulation core
//!
//! Everything gameplay-visible lives in `sim`: tile collision, the player
//! movement state machine, enemy and item behavior, and the top-level
//! level-flow state machine. Rendering, audio, and input-device mapping are
//! external collaborators; the core only exposes state snapshots, per-tick
//! input intents, and discrete events.

pub mod sim;

use glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz logic rate), in milliseconds
    pub const STEP_MS: f64 = 1000.0 / 60.0;
    /// Frame time clamp to avoid runaway catch-up after a stall
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Tile edge length in pixels
    pub const TILE: f32 = 32.0;
    /// Logical view dimensions (camera window)
    pub const VIEW_W: f32 = 768.0;
    pub const VIEW_H: f32 = 480.0;

    /// Gravity per tick, and terminal fall speed
    pub const GRAVITY: f32 = 0.55;
    pub const MAX_FALL: f32 = 12.0;

    /// Player horizontal tuning
    pub const PLAYER_ACCEL: f32 = 0.45;
    pub const PLAYER_AIR_ACCEL: f32 = 0.3;
    pub const PLAYER_FRICTION: f32 = 0.82;
    pub const PLAYER_AIR_FRICTION: f32 = 0.94;
    pub const PLAYER_SKID_FRICTION: f32 = 0.89;
    pub const PLAYER_MAX_SPEED: f32 = 4.2;
    pub const PLAYER_RUN_MAX: f32 = 6.0;

    /// Jump impulses (negative y is up)
    pub const JUMP_FORCE: f32 = -10.0;
    pub const JUMP_FORCE_BIG: f32 = -10.5;
    /// Upward bounce applied to the player after a stomp
    pub const BOUNCE_FORCE: f32 = -7.0;

    /// Grace windows, in ticks
    pub const COYOTE_TICKS: u32 = 5;
    pub const JUMP_BUFFER_TICKS: u32 = 7;

    /// Enemy tuning
    pub const ENEMY_SPEED: f32 = 1.0;
    pub const KOOPA_SHELL_SPEED: f32 = 7.0;
}

/// Snap a pixel coordinate to its tile column/row index
#[inline]
pub fn tile_index(px: f32) -> i32 {
    (px / consts::TILE).floor() as i32
}

/// Center of a tile cell in pixel coordinates
#[inline]
pub fn cell_center(col: i32, row: i32) -> Vec2 {
    Vec2::new(
        col as f32 * consts::TILE + consts::TILE / 2.0,
        row as f32 * consts::TILE + consts::TILE / 2.0,
    )
}
