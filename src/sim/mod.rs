//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG for cosmetics only; gameplay is a pure function of
//!   (level, input script)
//! - Fixed per-tick order: update all, interact, purge
//! - No rendering or platform dependencies

pub mod blocks;
pub mod clock;
pub mod enemy;
pub mod entity;
pub mod interact;
pub mod item;
pub mod level;
pub mod physics;
pub mod player;
pub mod state;
pub mod tick;
pub mod tile;

pub use clock::FixedStep;
pub use entity::{Entity, Particle, ParticleKind};
pub use level::{LevelData, LevelError, SpawnKind, SpawnMarker};
pub use physics::Body;
pub use player::Player;
pub use state::{Camera, GameEvent, GamePhase, GameState, Session};
pub use tick::{TickInput, tick};
pub use tile::{TileGrid, TileKind};
