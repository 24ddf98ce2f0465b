//! Axis-separated AABB collision against the tile grid.
//!
//! Every movable actor shares the same `Body` and the same resolution rule:
//! integrate and clip X fully, then integrate and clip Y. The ordering is a
//! load-bearing contract - an actor sliding along a wall keeps falling past
//! corners instead of snagging on them, and it is what makes ledge behavior
//! deterministic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tile::TileGrid;
use crate::consts::{GRAVITY, MAX_FALL, TILE};

/// Which side of the actor touched a wall during X resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// Result of Y resolution: floor contact and any head-bumped cells.
#[derive(Debug, Clone, Default)]
pub struct YContact {
    pub grounded: bool,
    /// Cells hit from below, in query order. Block interaction runs once
    /// per entry.
    pub bumped: Vec<(i32, i32)>,
}

/// Position, velocity and extents shared by all movable actors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub w: f32,
    pub h: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            w,
            h,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.w / 2.0, self.pos.y + self.h / 2.0)
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.x < other.pos.x + other.w
            && self.pos.x + self.w > other.pos.x
            && self.pos.y < other.pos.y + other.h
            && self.pos.y + self.h > other.pos.y
    }

    /// Gravity integration with terminal velocity.
    pub fn apply_gravity(&mut self) {
        self.vel.y = (self.vel.y + GRAVITY).min(MAX_FALL);
    }

    fn overlap_with_cell(&self, col: i32, row: i32) -> bool {
        let tx = col as f32 * TILE;
        let ty = row as f32 * TILE;
        let overlap_x = (self.pos.x + self.w).min(tx + TILE) - self.pos.x.max(tx);
        let overlap_y = (self.pos.y + self.h).min(ty + TILE) - self.pos.y.max(ty);
        overlap_x > 0.0 && overlap_y > 0.0
    }

    /// Integrate X, clip against solid tiles, zero vx on contact.
    pub fn resolve_x(&mut self, grid: &TileGrid) -> Option<WallSide> {
        self.pos.x += self.vel.x;

        let mut contact = None;
        for tile in grid.solid_tiles_in_rect(self.pos.x, self.pos.y, self.w, self.h) {
            if !self.overlap_with_cell(tile.col, tile.row) {
                continue;
            }
            let tx = tile.col as f32 * TILE;
            if self.vel.x > 0.0 {
                self.pos.x = tx - self.w;
                self.vel.x = 0.0;
                contact = Some(WallSide::Right);
            } else if self.vel.x < 0.0 {
                self.pos.x = tx + TILE;
                self.vel.x = 0.0;
                contact = Some(WallSide::Left);
            }
        }
        contact
    }

    /// Integrate Y, clip against solid tiles, zero vy on contact.
    ///
    /// Downward contact reports grounded; upward contact reports the bumped
    /// cells so the caller can invoke block interaction.
    pub fn resolve_y(&mut self, grid: &TileGrid) -> YContact {
        self.pos.y += self.vel.y;

        let mut contact = YContact::default();
        for tile in grid.solid_tiles_in_rect(self.pos.x, self.pos.y, self.w, self.h) {
            if !self.overlap_with_cell(tile.col, tile.row) {
                continue;
            }
            let ty = tile.row as f32 * TILE;
            if self.vel.y > 0.0 {
                self.pos.y = ty - self.h;
                self.vel.y = 0.0;
                contact.grounded = true;
            } else if self.vel.y < 0.0 {
                self.pos.y = ty + TILE;
                self.vel.y = 0.0;
                contact.bumped.push((tile.col, tile.row));
            }
        }
        contact
    }
}
