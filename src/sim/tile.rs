//! Static tile world: per-level grid of tile kinds and solidity queries.
//!
//! The grid is immutable during a tick except for single-cell edits made by
//! the block interaction protocol (brick cleared, question block used).

use serde::{Deserialize, Serialize};

use crate::consts::TILE;

/// Every tile kind a level cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Ground,
    Brick,
    /// Question block holding a coin
    QuestionCoin,
    /// Question block holding a mushroom
    QuestionMushroom,
    /// Question block holding an extra life
    QuestionOneUp,
    Hard,
    PipeTopLeft,
    PipeTopRight,
    PipeBodyLeft,
    PipeBodyRight,
    /// Spent question block
    Used,
    FlagTop,
    FlagPole,
    FlagBase,
}

impl TileKind {
    /// Solidity is a pure function of kind.
    pub fn is_solid(self) -> bool {
        !matches!(
            self,
            TileKind::Empty | TileKind::FlagTop | TileKind::FlagPole
        )
    }

    /// Flag-pole cells trigger the end-of-level slide.
    pub fn is_flag(self) -> bool {
        matches!(self, TileKind::FlagTop | TileKind::FlagPole)
    }
}

/// A solid cell returned by a rect query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidTile {
    pub col: i32,
    pub row: i32,
    pub kind: TileKind,
}

impl SolidTile {
    /// Pixel position of the cell's top-left corner
    pub fn px(&self) -> (f32, f32) {
        (self.col as f32 * TILE, self.row as f32 * TILE)
    }
}

/// Row-major grid of tile kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    cells: Vec<TileKind>,
}

impl TileGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![TileKind::Empty; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Level width in pixels
    pub fn px_width(&self) -> f32 {
        self.cols as f32 * TILE
    }

    /// Level height in pixels
    pub fn px_height(&self) -> f32 {
        self.rows as f32 * TILE
    }

    /// Out-of-range cells read as empty.
    pub fn get(&self, col: i32, row: i32) -> TileKind {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return TileKind::Empty;
        }
        self.cells[row as usize * self.cols + col as usize]
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, col: i32, row: i32, kind: TileKind) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.cols + col as usize] = kind;
    }

    pub fn is_solid_at(&self, px: f32, py: f32) -> bool {
        self.get((px / TILE).floor() as i32, (py / TILE).floor() as i32)
            .is_solid()
    }

    /// All solid tiles whose cells the rectangle reaches.
    ///
    /// The far edges include the cell containing `x + w`, so even sub-pixel
    /// penetration is reported. A rect exactly flush with a boundary also
    /// reports the adjacent cell, with zero overlap; the resolver filters
    /// those out by requiring positive overlap before clipping.
    pub fn solid_tiles_in_rect(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<SolidTile> {
        let left = (x / TILE).floor() as i32;
        let right = ((x + w) / TILE).floor() as i32;
        let top = (y / TILE).floor() as i32;
        let bottom = ((y + h) / TILE).floor() as i32;

        let mut tiles = Vec::new();
        for row in top..=bottom {
            for col in left..=right {
                let kind = self.get(col, row);
                if kind.is_solid() {
                    tiles.push(SolidTile { col, row, kind });
                }
            }
        }
        tiles
    }
}
