//! Level supplier interface.
//!
//! The core does not parse level text; an external collaborator hands over
//! a finished `LevelData` (grid, spawn markers, metadata) which is validated
//! once at load. Malformed levels are fatal: the simulation refuses to enter
//! `playing` rather than substituting defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tile::TileGrid;

/// Entity species an external level supplier can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Goomba,
    Koopa,
    Coin,
}

/// A cell-anchored entity spawn marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnMarker {
    pub kind: SpawnKind,
    pub col: i32,
    pub row: i32,
}

/// Load failure reasons. All are fatal for the level.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level grid has zero extent ({cols}x{rows})")]
    EmptyGrid { cols: usize, rows: usize },
    #[error("player spawn cell ({col},{row}) outside grid")]
    PlayerSpawnOutOfRange { col: i32, row: i32 },
    #[error("{kind:?} spawn marker at ({col},{row}) outside grid")]
    MarkerOutOfRange {
        kind: SpawnKind,
        col: i32,
        row: i32,
    },
    #[error("level time limit must be nonzero")]
    ZeroTimeLimit,
    #[error("no level at index {index}")]
    NoSuchLevel { index: usize },
}

/// Everything the core consumes at level load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub grid: TileGrid,
    /// Cell the player's feet start on.
    pub player_spawn: (i32, i32),
    pub spawns: Vec<SpawnMarker>,
    /// Level timer in seconds.
    pub time_limit: u32,
}

impl LevelData {
    pub fn validate(&self) -> Result<(), LevelError> {
        let cols = self.grid.cols();
        let rows = self.grid.rows();
        if cols == 0 || rows == 0 {
            return Err(LevelError::EmptyGrid { cols, rows });
        }
        let in_range =
            |c: i32, r: i32| c >= 0 && r >= 0 && (c as usize) < cols && (r as usize) < rows;

        let (pc, pr) = self.player_spawn;
        if !in_range(pc, pr) {
            return Err(LevelError::PlayerSpawnOutOfRange { col: pc, row: pr });
        }
        for marker in &self.spawns {
            if !in_range(marker.col, marker.row) {
                return Err(LevelError::MarkerOutOfRange {
                    kind: marker.kind,
                    col: marker.col,
                    row: marker.row,
                });
            }
        }
        if self.time_limit == 0 {
            return Err(LevelError::ZeroTimeLimit);
        }
        Ok(())
    }
}
