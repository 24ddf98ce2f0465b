//! Game state and session bookkeeping.
//!
//! `GameState` is the explicit simulation context threaded through every
//! tick: grid, player, entities, session counters, camera, and the event
//! buffer. It is `Clone + Serialize`, so a completed tick can be
//! snapshotted for a presentation thread without locks.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Particle};
use super::enemy::{Goomba, Koopa};
use super::item::Coin;
use super::level::{LevelData, LevelError, SpawnKind, SpawnMarker};
use super::player::{Player, SMALL_H};
use super::tile::TileGrid;
use crate::consts::{TILE, VIEW_W};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for an external new-game trigger
    Menu,
    /// Active gameplay
    Playing,
    /// Player death fall, before the respawn/game-over branch
    Dying,
    /// Scripted walk-off after the flag
    LevelComplete,
    GameOver,
    /// All levels cleared
    Win,
}

/// Discrete per-tick notifications for the presentation sink. Buffered in
/// `GameState` and drained by the collaborator; core correctness never
/// depends on them being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    Skid,
    CoinCollected,
    EnemyStomped,
    ShellKicked,
    BlockBroken,
    BlockBumped,
    MushroomSpawned,
    PowerUp,
    OneUp,
    PlayerDamaged,
    PlayerDied,
    FlagReached,
    LevelComplete,
}

/// Session counters. Reset only by an explicit new game; a level reload
/// after death keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub coins: u32,
    pub lives: i32,
    pub level_index: usize,
}

impl Session {
    pub fn new() -> Self {
        Self {
            score: 0,
            coins: 0,
            lives: 3,
            level_index: 0,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick approach factor toward the camera target.
pub const CAMERA_SMOOTHING: f32 = 0.12;

/// Horizontal scroll window, smoothed toward a third-of-screen lead on the
/// player and clamped to the level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    pub fn follow(&mut self, player_x: f32, level_px_width: f32) {
        let max = (level_px_width - VIEW_W).max(0.0);
        let target = (player_x - VIEW_W / 3.0).clamp(0.0, max);
        self.x += (target - self.x) * CAMERA_SMOOTHING;
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed; cosmetic particle jitter derives from it, gameplay
    /// never does.
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub session: Session,
    /// Levels handed over by the external supplier at new-game
    pub levels: Vec<LevelData>,
    /// Working copy of the current level's grid; block interaction
    /// mutates single cells
    pub grid: TileGrid,
    /// Level timer, whole seconds remaining
    pub timer_seconds: u32,
    /// Tick subdivision of the timer second
    pub timer_subtick: u32,
    pub player: Player,
    pub entities: Vec<Entity>,
    pub camera: Camera,
    /// Ticks spent in the current timed phase (dying, levelcomplete)
    pub phase_ticks: u32,
    /// Scripted flag-pole descent latch; locks out normal control
    pub flag_sliding: bool,
    /// Event buffer for the presentation sink
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Menu,
            session: Session::new(),
            levels: Vec::new(),
            grid: TileGrid::new(0, 0),
            timer_seconds: 0,
            timer_subtick: 0,
            player: Player::new(0.0, 0.0),
            entities: Vec::new(),
            camera: Camera::default(),
            phase_ticks: 0,
            flag_sliding: false,
            events: Vec::new(),
            particles: Vec::new(),
        }
    }

    /// New game: validate the level list up front, reset the session, and
    /// enter `playing` at level 0. A malformed level refuses the whole
    /// list and leaves the state untouched.
    pub fn start_game(&mut self, levels: Vec<LevelData>) -> Result<(), LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoSuchLevel { index: 0 });
        }
        for level in &levels {
            level.validate()?;
        }
        self.levels = levels;
        self.session = Session::new();
        self.load_level(0)
    }

    /// (Re)load one level: fresh grid, player, and entities. Session
    /// counters persist; the caller decides whether to reset them.
    pub fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        let level = self
            .levels
            .get(index)
            .ok_or(LevelError::NoSuchLevel { index })?
            .clone();
        level.validate()?;

        self.session.level_index = index;
        self.timer_seconds = level.time_limit;
        self.timer_subtick = 0;

        let (col, row) = level.player_spawn;
        self.player = Player::new(col as f32 * TILE, row as f32 * TILE - SMALL_H);
        self.entities = level.spawns.iter().map(spawn_entity).collect();
        self.camera = Camera::default();
        self.phase_ticks = 0;
        self.flag_sliding = false;
        self.events.clear();
        self.particles.clear();

        log::info!(
            "level {index} loaded: {}x{} cells, {} spawns, {}s limit",
            level.grid.cols(),
            level.grid.rows(),
            level.spawns.len(),
            level.time_limit,
        );
        self.grid = level.grid;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// External reset trigger: back to the menu. The supplied level list
    /// stays loaded for the next `start_game`.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Menu;
        self.flag_sliding = false;
        self.entities.clear();
        self.events.clear();
        self.particles.clear();
    }

    /// Hand the tick's buffered events to the presentation sink.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fresh cosmetic RNG for one tick, derived from the seed and the tick
    /// counter so replays stay identical.
    pub fn tick_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ self.time_ticks)
    }
}

/// Pixel placement of a spawn marker, species by species.
fn spawn_entity(marker: &SpawnMarker) -> Entity {
    let cx = marker.col as f32 * TILE;
    let cy = marker.row as f32 * TILE;
    match marker.kind {
        SpawnKind::Goomba => Entity::Goomba(Goomba::new(cx + 2.0, cy)),
        SpawnKind::Koopa => Entity::Koopa(Koopa::new(cx, cy - 12.0)),
        SpawnKind::Coin => Entity::Coin(Coin::new(cx + TILE / 2.0 - 6.0, cy)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::TileKind;

    fn one_level() -> LevelData {
        let mut grid = TileGrid::new(40, 10);
        for col in 0..40 {
            grid.set(col, 9, TileKind::Ground);
        }
        LevelData {
            grid,
            player_spawn: (2, 9),
            spawns: vec![
                SpawnMarker {
                    kind: SpawnKind::Goomba,
                    col: 10,
                    row: 8,
                },
                SpawnMarker {
                    kind: SpawnKind::Coin,
                    col: 6,
                    row: 5,
                },
            ],
            time_limit: 300,
        }
    }

    #[test]
    fn test_start_game_enters_playing() {
        let mut state = GameState::new(1);
        state.start_game(vec![one_level()]).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.timer_seconds, 300);
        assert_eq!(state.entities.len(), 2);
        // Feet on the spawn cell's top edge.
        assert_eq!(state.player.body.bottom(), 9.0 * TILE);
    }

    #[test]
    fn test_malformed_level_refuses_playing() {
        let mut bad = one_level();
        bad.player_spawn = (99, 0);
        let mut state = GameState::new(1);
        assert!(state.start_game(vec![bad]).is_err());
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_empty_level_list_refused() {
        let mut state = GameState::new(1);
        assert_eq!(
            state.start_game(Vec::new()),
            Err(LevelError::NoSuchLevel { index: 0 })
        );
    }

    #[test]
    fn test_spawn_marker_placement() {
        let mut state = GameState::new(1);
        state.start_game(vec![one_level()]).unwrap();
        let Entity::Goomba(goomba) = &state.entities[0] else {
            panic!("expected goomba first");
        };
        assert_eq!(goomba.body.pos.x, 10.0 * TILE + 2.0);
        let Entity::Coin(coin) = &state.entities[1] else {
            panic!("expected coin second");
        };
        assert_eq!(coin.body.pos.x, 6.0 * TILE + TILE / 2.0 - 6.0);
    }

    #[test]
    fn test_reload_keeps_session_counters() {
        let mut state = GameState::new(1);
        state.start_game(vec![one_level()]).unwrap();
        state.session.score = 1234;
        state.session.coins = 7;
        state.load_level(0).unwrap();
        assert_eq!(state.session.score, 1234);
        assert_eq!(state.session.coins, 7);
    }

    #[test]
    fn test_camera_follows_with_clamp() {
        let mut camera = Camera::default();
        // Left clamp: target would be negative.
        camera.follow(0.0, 2000.0);
        assert_eq!(camera.x, 0.0);

        // Smoothed approach toward player - VIEW_W/3.
        camera.follow(1000.0, 2000.0);
        let expected = (1000.0 - VIEW_W / 3.0) * CAMERA_SMOOTHING;
        assert!((camera.x - expected).abs() < 1e-3);

        // Right clamp at level end.
        let mut camera = Camera { x: 1200.0 };
        camera.follow(1990.0, 2000.0);
        assert!(camera.x <= 2000.0 - VIEW_W);
    }

    #[test]
    fn test_drain_events_empties_buffer() {
        let mut state = GameState::new(1);
        state.events.push(GameEvent::Jump);
        state.events.push(GameEvent::CoinCollected);
        let drained = state.drain_events();
        assert_eq!(drained, vec![GameEvent::Jump, GameEvent::CoinCollected]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_tick_rng_is_reproducible() {
        use rand::Rng;
        let state = GameState::new(42);
        let a: u32 = state.tick_rng().random();
        let b: u32 = state.tick_rng().random();
        assert_eq!(a, b);
    }
}
