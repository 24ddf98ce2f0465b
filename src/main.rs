//! Headless demo: builds a small level programmatically, runs a scripted
//! input sequence at the fixed step, and dumps the final state snapshot as
//! JSON. Stands in for a renderer-driven frontend.

use tile_hopper::consts::TILE;
use tile_hopper::sim::{
    FixedStep, GameState, LevelData, SpawnKind, SpawnMarker, TickInput, TileGrid, TileKind, tick,
};

fn demo_level() -> LevelData {
    let cols = 80;
    let rows = 15;
    let floor = rows as i32 - 2;
    let mut grid = TileGrid::new(cols, rows);

    for col in 0..cols as i32 {
        grid.set(col, floor, TileKind::Ground);
        grid.set(col, floor + 1, TileKind::Ground);
    }

    // A short gauntlet: bricks, question blocks, a pipe, and the flag.
    grid.set(12, floor - 4, TileKind::Brick);
    grid.set(13, floor - 4, TileKind::QuestionMushroom);
    grid.set(14, floor - 4, TileKind::Brick);
    grid.set(22, floor - 4, TileKind::QuestionCoin);
    grid.set(23, floor - 4, TileKind::QuestionCoin);
    grid.set(30, floor - 4, TileKind::QuestionOneUp);
    grid.set(40, floor - 1, TileKind::PipeTopLeft);
    grid.set(41, floor - 1, TileKind::PipeTopRight);

    let flag_col = 74;
    grid.set(flag_col, 2, TileKind::FlagTop);
    for row in 3..floor {
        grid.set(flag_col, row, TileKind::FlagPole);
    }
    grid.set(flag_col, floor - 1, TileKind::FlagBase);

    LevelData {
        grid,
        player_spawn: (2, floor),
        spawns: vec![
            SpawnMarker {
                kind: SpawnKind::Coin,
                col: 17,
                row: floor - 3,
            },
            SpawnMarker {
                kind: SpawnKind::Coin,
                col: 18,
                row: floor - 3,
            },
            SpawnMarker {
                kind: SpawnKind::Goomba,
                col: 26,
                row: floor - 1,
            },
            SpawnMarker {
                kind: SpawnKind::Koopa,
                col: 48,
                row: floor - 1,
            },
        ],
        time_limit: 120,
    }
}

/// Scripted intents: run right and hop periodically.
fn scripted_input(ticks: u64) -> TickInput {
    TickInput {
        right: true,
        run: ticks % 120 > 40,
        jump: ticks % 45 < 14,
        ..Default::default()
    }
}

fn main() {
    env_logger::init();

    let mut state = GameState::new(0xC0FFEE);
    if let Err(err) = state.start_game(vec![demo_level()]) {
        eprintln!("level rejected: {err}");
        std::process::exit(1);
    }

    // 30 seconds of simulated wall time at a 60 Hz presentation rate.
    let mut clock = FixedStep::new();
    for _frame in 0..1800 {
        let steps = clock.advance(1000.0 / 60.0);
        for _ in 0..steps {
            let input = scripted_input(state.time_ticks);
            tick(&mut state, &input);
        }
        for event in state.drain_events() {
            log::debug!("tick {}: {event:?}", state.time_ticks);
        }
    }

    log::info!(
        "finished in {:?}: score {} coins {} lives {} at x {:.0} (tile {})",
        state.phase,
        state.session.score,
        state.session.coins,
        state.session.lives,
        state.player.body.pos.x,
        (state.player.body.pos.x / TILE) as i32,
    );

    match serde_json::to_string_pretty(&state) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("snapshot failed: {err}");
            std::process::exit(1);
        }
    }
}
