//! Per-tick pairwise interaction resolution.
//!
//! Runs after every actor has moved, before the purge. The player pass is
//! gated on the player being alive and not invincible; the shell sweep is
//! not. Inert actors (flattened Goombas, emerging Mushrooms, inactive
//! enemies) never pair.

use super::entity::Entity;
use super::enemy::KoopaState;
use super::physics::Body;
use super::player::Player;
use super::state::{GameEvent, Session};
use super::tile::TileGrid;
use crate::consts::BOUNCE_FORCE;
use crate::tile_index;

/// Sweep moving shells over the other enemies, then resolve the player
/// against every live entity.
pub fn resolve(
    player: &mut Player,
    entities: &mut [Entity],
    session: &mut Session,
    events: &mut Vec<GameEvent>,
) {
    // Moving shells destroy regardless of what the player is doing.
    sweep_shells(entities, session, events);

    if player.dead || player.invincible > 0 {
        return;
    }

    for entity in entities.iter_mut() {
        if !entity.alive() || !entity.active() {
            continue;
        }
        match entity {
            Entity::Coin(coin) => {
                if player.body.overlaps(&coin.body) {
                    coin.alive = false;
                    session.coins += 1;
                    session.score += 200;
                    events.push(GameEvent::CoinCollected);
                }
            }
            Entity::Mushroom(mushroom) => {
                if !mushroom.emerging() && player.body.overlaps(&mushroom.body) {
                    mushroom.alive = false;
                    session.score += 1000;
                    player.grow();
                    events.push(GameEvent::PowerUp);
                }
            }
            Entity::Goomba(goomba) => {
                if goomba.squashed() || !player.body.overlaps(&goomba.body) {
                    continue;
                }
                if stomp_hit(player, &goomba.body) {
                    goomba.flatten();
                    session.score += 100;
                    bounce(player);
                    events.push(GameEvent::EnemyStomped);
                } else {
                    hurt(player, events);
                }
            }
            Entity::Koopa(koopa) => {
                if !player.body.overlaps(&koopa.body) {
                    continue;
                }
                match koopa.state {
                    KoopaState::Walking => {
                        if stomp_hit(player, &koopa.body) {
                            koopa.enter_shell();
                            session.score += 100;
                            bounce(player);
                            events.push(GameEvent::EnemyStomped);
                        } else {
                            hurt(player, events);
                        }
                    }
                    KoopaState::ShellIdle { cooldown } => {
                        if cooldown > 0 {
                            continue;
                        }
                        // Only a stomp launches the shell, away from the
                        // player's side. The player is the only kicker.
                        if stomp_hit(player, &koopa.body) {
                            let dir = if player.body.center().x < koopa.body.center().x {
                                1.0
                            } else {
                                -1.0
                            };
                            koopa.kick(dir);
                            bounce(player);
                            events.push(GameEvent::ShellKicked);
                        } else {
                            hurt(player, events);
                        }
                    }
                    KoopaState::ShellMoving => {
                        // Halting a shell is unscored; only the state and
                        // the cooldown change.
                        if stomp_hit(player, &koopa.body) {
                            koopa.halt();
                            bounce(player);
                        } else {
                            hurt(player, events);
                        }
                    }
                }
            }
        }
    }
}

/// Moving shells destroy every other enemy they cross. Chain kills all
/// happen inside one tick's pass.
fn sweep_shells(entities: &mut [Entity], session: &mut Session, events: &mut Vec<GameEvent>) {
    let shells: Vec<(usize, Body)> = entities
        .iter()
        .enumerate()
        .filter_map(|(i, e)| match e {
            Entity::Koopa(k) if k.alive && k.state == KoopaState::ShellMoving => Some((i, k.body)),
            _ => None,
        })
        .collect();
    if shells.is_empty() {
        return;
    }

    for (j, entity) in entities.iter_mut().enumerate() {
        if !entity.is_enemy() || !entity.alive() || !entity.collidable() {
            continue;
        }
        if shells
            .iter()
            .any(|(i, shell)| *i != j && shell.overlaps(entity.body()))
        {
            entity.kill();
            session.score += 100;
            events.push(GameEvent::EnemyStomped);
        }
    }
}

/// Top-down hit test: falling, with the feet inside the target's upper
/// half.
fn stomp_hit(player: &Player, enemy: &Body) -> bool {
    player.body.vel.y > 0.0 && player.body.bottom() - enemy.pos.y < enemy.h * 0.5
}

fn bounce(player: &mut Player) {
    player.body.vel.y = BOUNCE_FORCE;
    player.grounded = false;
}

fn hurt(player: &mut Player, events: &mut Vec<GameEvent>) {
    if player.invincible > 0 {
        return;
    }
    if player.take_damage() {
        events.push(GameEvent::PlayerDied);
    } else {
        events.push(GameEvent::PlayerDamaged);
    }
}

/// Column scan for flag contact: any pole or pole-top cell in the column
/// holding the player's center.
pub fn touching_flag(player: &Player, grid: &TileGrid) -> bool {
    let col = tile_index(player.body.center().x);
    (0..grid.rows() as i32).any(|row| grid.get(col, row).is_flag())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE;
    use crate::sim::enemy::{
        GOOMBA_H, GOOMBA_W, Goomba, KOOPA_H, Koopa, SHELL_COOLDOWN_TICKS, SHELL_H,
    };
    use crate::sim::item::{Coin, Mushroom, MushroomState};
    use crate::sim::tile::TileKind;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(x, y)
    }

    fn falling_onto(enemy_top: f32, x: f32) -> Player {
        let mut player = player_at(x, enemy_top - 28.0);
        player.body.vel.y = 5.0;
        player
    }

    fn run(
        player: &mut Player,
        entities: &mut [Entity],
        session: &mut Session,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        resolve(player, entities, session, &mut events);
        events
    }

    #[test]
    fn test_stomp_flattens_and_bounces() {
        let mut session = Session::new();
        let mut goomba = Goomba::new(100.0, 200.0);
        goomba.active = true;
        let mut player = falling_onto(200.0, 100.0);
        let mut entities = [Entity::Goomba(goomba)];

        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.contains(&GameEvent::EnemyStomped));
        assert_eq!(session.score, 100);
        assert_eq!(player.body.vel.y, BOUNCE_FORCE);
        let Entity::Goomba(goomba) = &entities[0] else {
            unreachable!()
        };
        assert!(goomba.squashed());
        assert!(goomba.alive, "purge happens later, in the tick");
    }

    #[test]
    fn test_side_contact_damages() {
        let mut session = Session::new();
        let mut goomba = Goomba::new(100.0, 200.0);
        goomba.active = true;
        // Overlapping from the side, level with the enemy.
        let mut player = player_at(100.0 - 20.0, 200.0);
        let mut entities = [Entity::Goomba(goomba)];

        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.contains(&GameEvent::PlayerDied));
        assert!(player.dead);
    }

    #[test]
    fn test_flattened_goomba_is_inert() {
        let mut session = Session::new();
        let mut goomba = Goomba::new(100.0, 200.0);
        goomba.active = true;
        goomba.flatten();
        let mut player = player_at(100.0, 200.0);
        let mut entities = [Entity::Goomba(goomba)];

        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.is_empty());
        assert!(!player.dead);
    }

    #[test]
    fn test_koopa_three_stomp_cycle() {
        let mut session = Session::new();
        let mut koopa = Koopa::new(100.0, 200.0);
        koopa.active = true;
        let mut entities = [Entity::Koopa(koopa)];

        // Stomp 1: patrolling -> shell-idle.
        let mut player = falling_onto(200.0, 100.0);
        run(&mut player, &mut entities, &mut session);
        let Entity::Koopa(k) = &mut entities[0] else {
            unreachable!()
        };
        assert_eq!(k.state, KoopaState::ShellIdle {
            cooldown: SHELL_COOLDOWN_TICKS
        });

        // Stomp 2 (after the cooldown): shell-idle -> shell-moving.
        k.state = KoopaState::ShellIdle { cooldown: 0 };
        let shell_top = k.body.pos.y;
        let mut player = falling_onto(shell_top, 100.0);
        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.contains(&GameEvent::ShellKicked));
        assert_eq!(player.body.vel.y, BOUNCE_FORCE);
        let Entity::Koopa(k) = &mut entities[0] else {
            unreachable!()
        };
        assert_eq!(k.state, KoopaState::ShellMoving);

        // Stomp 3: shell-moving -> shell-idle, cooldown re-armed.
        let mut player = falling_onto(k.body.pos.y, 100.0);
        run(&mut player, &mut entities, &mut session);
        let Entity::Koopa(k) = &entities[0] else {
            unreachable!()
        };
        assert_eq!(k.state, KoopaState::ShellIdle {
            cooldown: SHELL_COOLDOWN_TICKS
        });

        // Only the first stomp scores; kicking and halting do not.
        assert_eq!(session.score, 100);
    }

    #[test]
    fn test_cooling_shell_ignores_contact() {
        let mut session = Session::new();
        let mut koopa = Koopa::new(100.0, 200.0);
        koopa.active = true;
        koopa.enter_shell();
        let shell_top = koopa.body.pos.y;
        let mut entities = [Entity::Koopa(koopa)];

        let mut player = falling_onto(shell_top, 100.0);
        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.is_empty());
        let Entity::Koopa(k) = &entities[0] else {
            unreachable!()
        };
        assert!(matches!(k.state, KoopaState::ShellIdle { .. }));
    }

    #[test]
    fn test_kick_direction_is_away_from_player() {
        for (player_x, expected_dir) in [(90.0, 1.0), (110.0, -1.0)] {
            let mut session = Session::new();
            let mut koopa = Koopa::new(100.0, 200.0);
            koopa.active = true;
            koopa.state = KoopaState::ShellIdle { cooldown: 0 };
            koopa.body.h = SHELL_H;
            let mut entities = [Entity::Koopa(koopa)];

            // Stomping off-center launches away from the player's side.
            let mut player = falling_onto(200.0, player_x);
            run(&mut player, &mut entities, &mut session);
            let Entity::Koopa(k) = &entities[0] else {
                unreachable!()
            };
            assert_eq!(k.state, KoopaState::ShellMoving);
            assert_eq!(k.dir, expected_dir, "player at {player_x}");
        }
    }

    #[test]
    fn test_side_contact_with_ready_idle_shell_damages() {
        let mut session = Session::new();
        let mut koopa = Koopa::new(100.0, 200.0);
        koopa.active = true;
        koopa.state = KoopaState::ShellIdle { cooldown: 0 };
        koopa.body.h = SHELL_H;
        let mut entities = [Entity::Koopa(koopa)];

        // Walking into the shell, no downward motion.
        let mut player = player_at(90.0, 200.0 + KOOPA_H - SHELL_H);
        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.contains(&GameEvent::PlayerDied));
        assert!(player.dead);
        let Entity::Koopa(k) = &entities[0] else {
            unreachable!()
        };
        assert_eq!(
            k.state,
            KoopaState::ShellIdle { cooldown: 0 },
            "side contact never kicks"
        );
    }

    #[test]
    fn test_halting_a_shell_is_unscored() {
        let mut session = Session::new();
        let mut koopa = Koopa::new(100.0, 200.0);
        koopa.active = true;
        koopa.enter_shell();
        koopa.kick(1.0);
        let shell_top = koopa.body.pos.y;
        let mut entities = [Entity::Koopa(koopa)];

        let mut player = falling_onto(shell_top, 100.0);
        let events = run(&mut player, &mut entities, &mut session);
        assert_eq!(session.score, 0);
        assert!(events.is_empty());
        assert_eq!(player.body.vel.y, BOUNCE_FORCE);
        let Entity::Koopa(k) = &entities[0] else {
            unreachable!()
        };
        assert_eq!(k.state, KoopaState::ShellIdle {
            cooldown: SHELL_COOLDOWN_TICKS
        });
    }

    #[test]
    fn test_moving_shell_mows_down_enemies() {
        let mut session = Session::new();
        let mut shell = Koopa::new(100.0, 200.0);
        shell.active = true;
        shell.enter_shell();
        shell.kick(1.0);
        let mut victim = Goomba::new(105.0, 200.0);
        victim.active = true;
        let mut entities = [Entity::Koopa(shell), Entity::Goomba(victim)];

        // Player far away.
        let mut player = player_at(500.0, 0.0);
        let events = run(&mut player, &mut entities, &mut session);
        assert!(!entities[1].alive());
        assert!(entities[0].alive(), "the shell itself survives");
        assert_eq!(session.score, 100);
        assert!(events.contains(&GameEvent::EnemyStomped));
    }

    #[test]
    fn test_shell_sweep_runs_while_player_invincible() {
        let mut session = Session::new();
        let mut shell = Koopa::new(100.0, 200.0);
        shell.active = true;
        shell.enter_shell();
        shell.kick(1.0);
        let mut victim = Goomba::new(105.0, 200.0);
        victim.active = true;
        let mut entities = [Entity::Koopa(shell), Entity::Goomba(victim)];

        let mut player = player_at(500.0, 0.0);
        player.invincible = 30;
        let events = run(&mut player, &mut entities, &mut session);
        assert!(!entities[1].alive(), "the sweep ignores player state");
        assert_eq!(session.score, 100);
        assert!(events.contains(&GameEvent::EnemyStomped));
    }

    #[test]
    fn test_mushroom_pickup_grows_player() {
        let mut session = Session::new();
        let mut mushroom = Mushroom::new(100.0, 200.0);
        mushroom.state = MushroomState::Roaming;
        let mut player = player_at(100.0, 200.0);
        let mut entities = [Entity::Mushroom(mushroom)];

        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.contains(&GameEvent::PowerUp));
        assert!(player.big);
        assert_eq!(session.score, 1000);
        assert!(!entities[0].alive());
    }

    #[test]
    fn test_emerging_mushroom_not_collectable() {
        let mut session = Session::new();
        let mushroom = Mushroom::new(100.0, 200.0);
        let mut player = player_at(100.0, 200.0);
        let mut entities = [Entity::Mushroom(mushroom)];

        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.is_empty());
        assert!(!player.big);
    }

    #[test]
    fn test_coin_contact_credits() {
        let mut session = Session::new();
        let coin = Coin::new(100.0, 200.0);
        let mut player = player_at(95.0, 195.0);
        let mut entities = [Entity::Coin(coin)];

        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.contains(&GameEvent::CoinCollected));
        assert_eq!(session.coins, 1);
        assert_eq!(session.score, 200);
        assert!(!entities[0].alive());
    }

    #[test]
    fn test_pass_gated_on_invincibility() {
        let mut session = Session::new();
        let mut goomba = Goomba::new(100.0, 200.0);
        goomba.active = true;
        let mut player = player_at(90.0, 200.0);
        player.invincible = 30;
        let mut entities = [Entity::Goomba(goomba)];

        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.is_empty());
        assert!(!player.dead);
    }

    #[test]
    fn test_inactive_enemy_is_inert() {
        let mut session = Session::new();
        let goomba = Goomba::new(100.0, 200.0);
        let mut player = player_at(90.0, 200.0);
        let mut entities = [Entity::Goomba(goomba)];

        let events = run(&mut player, &mut entities, &mut session);
        assert!(events.is_empty());
        assert!(!player.dead);
    }

    #[test]
    fn test_flag_column_scan() {
        let mut grid = TileGrid::new(20, 10);
        grid.set(15, 2, TileKind::FlagTop);
        for row in 3..8 {
            grid.set(15, row, TileKind::FlagPole);
        }
        grid.set(15, 8, TileKind::FlagBase);

        let clear = player_at(10.0 * TILE, 100.0);
        assert!(!touching_flag(&clear, &grid));

        // Center column 15, at any height.
        let on_pole = player_at(15.0 * TILE + 4.0, 100.0);
        assert!(touching_flag(&on_pole, &grid));
    }

    // Geometry guard for the shared stomp predicate.
    #[test]
    fn test_stomp_requires_downward_motion_and_upper_half() {
        let enemy = Body::new(100.0, 200.0, GOOMBA_W, GOOMBA_H);

        let mut player = player_at(100.0, 200.0 - 28.0);
        player.body.vel.y = 5.0;
        assert!(stomp_hit(&player, &enemy));

        player.body.vel.y = -1.0;
        assert!(!stomp_hit(&player, &enemy), "rising players never stomp");

        let mut deep = player_at(100.0, 200.0);
        deep.body.vel.y = 5.0;
        assert!(!stomp_hit(&deep, &enemy), "feet below the upper half");
    }
}
