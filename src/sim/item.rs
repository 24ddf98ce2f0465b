//! Item behavior: the emerging/bouncing Mushroom and the static Coin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use super::tile::TileGrid;
use crate::consts::TILE;

pub const MUSHROOM_W: f32 = 24.0;
pub const MUSHROOM_H: f32 = 30.0;
pub const COIN_W: f32 = 12.0;
pub const COIN_H: f32 = 16.0;

/// Roaming speed once free of the block.
pub const MUSHROOM_SPEED: f32 = 2.0;
/// Rise duration out of the spawn tile, one pixel per tick.
pub const EMERGE_TICKS: u32 = TILE as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MushroomState {
    /// Rising out of the block: no gravity, no collision, not collectable.
    Emerging { ticks_left: u32 },
    Roaming,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mushroom {
    pub body: Body,
    pub state: MushroomState,
    /// Travel direction, ±1; walls reverse it instead of halting.
    pub dir: f32,
    pub alive: bool,
}

impl Mushroom {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, MUSHROOM_W, MUSHROOM_H),
            state: MushroomState::Emerging {
                ticks_left: EMERGE_TICKS,
            },
            dir: 1.0,
            alive: true,
        }
    }

    pub fn update(&mut self, grid: &TileGrid) {
        match self.state {
            MushroomState::Emerging { ticks_left } => {
                self.body.pos.y -= 1.0;
                let ticks_left = ticks_left - 1;
                if ticks_left == 0 {
                    self.state = MushroomState::Roaming;
                    self.body.vel = Vec2::new(self.dir * MUSHROOM_SPEED, -2.0);
                } else {
                    self.state = MushroomState::Emerging { ticks_left };
                }
            }
            MushroomState::Roaming => {
                self.body.vel.x = self.dir * MUSHROOM_SPEED;
                self.body.apply_gravity();
                // Bounce instead of halting against walls.
                if self.body.resolve_x(grid).is_some() {
                    self.dir = -self.dir;
                    self.body.vel.x = self.dir * MUSHROOM_SPEED;
                }
                self.body.resolve_y(grid);
            }
        }
    }

    pub fn emerging(&self) -> bool {
        matches!(self.state, MushroomState::Emerging { .. })
    }
}

/// Pre-placed floating collectible. Never subject to physics; the bob
/// animation is presentation-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub body: Body,
    pub alive: bool,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, COIN_W, COIN_H),
            alive: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::TileKind;

    const FLOOR_ROW: i32 = 7;

    fn pen() -> TileGrid {
        let mut grid = TileGrid::new(16, 8);
        for col in 0..16 {
            grid.set(col, FLOOR_ROW, TileKind::Ground);
        }
        for row in 0..8 {
            grid.set(0, row, TileKind::Hard);
            grid.set(15, row, TileKind::Hard);
        }
        grid
    }

    #[test]
    fn test_emerges_one_pixel_per_tick() {
        let grid = pen();
        let mut mushroom = Mushroom::new(5.0 * TILE + 4.0, 4.0 * TILE);
        let start_y = mushroom.body.pos.y;

        for _ in 0..EMERGE_TICKS {
            assert!(mushroom.emerging());
            mushroom.update(&grid);
        }
        assert!(!mushroom.emerging());
        assert_eq!(mushroom.body.pos.y, start_y - EMERGE_TICKS as f32);
        assert_eq!(mushroom.body.vel, Vec2::new(MUSHROOM_SPEED, -2.0));
    }

    #[test]
    fn test_roams_and_bounces_off_walls() {
        let grid = pen();
        let mut mushroom = Mushroom::new(5.0 * TILE, 4.0 * TILE);
        // Skip the emergence.
        mushroom.state = MushroomState::Roaming;

        let mut flips = 0;
        let mut last_dir = mushroom.dir;
        for _ in 0..600 {
            mushroom.update(&grid);
            assert_eq!(mushroom.body.vel.x.abs(), MUSHROOM_SPEED);
            if mushroom.dir != last_dir {
                flips += 1;
                last_dir = mushroom.dir;
            }
        }
        assert!(flips >= 2, "kept bouncing between the pen walls");
        // Settled onto the floor.
        assert_eq!(mushroom.body.bottom(), FLOOR_ROW as f32 * TILE);
    }
}
