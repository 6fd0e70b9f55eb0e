//! Per-frame simulation advancement
//!
//! One `tick` call per rendered frame. State-machine commands resolve first;
//! while Playing, the frame then runs a fixed pass order: player movement,
//! firing, bullet flight and hits, spawning, enemy contact and movement,
//! defeat check. All mutation happens here and in the methods this calls, so
//! a seeded state fed a scripted input sequence replays exactly.

use log::debug;

use super::collision::{circles_overlap, point_in_circle};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::normalize_dir;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Latest aim angle in radians; `None` keeps the previous facing
    pub aim_theta: Option<f32>,
    /// Hold-to-fire intent
    pub fire: bool,
    /// Signed weapon-cycle step (0 = keep current)
    pub cycle_weapon: i32,
    /// Begin a run from the menu
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Begin a fresh run from game over
    pub restart: bool,
    /// Back to the menu
    pub quit: bool,
}

/// Advance the game state by one frame's worth of time
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let phase_before = state.phase;
    handle_commands(state, input);

    // A phase change consumes the tick; simulation resumes next frame
    if state.phase != phase_before || state.phase != GamePhase::Playing {
        return;
    }

    state.time_ms += dt as f64 * 1000.0;
    state.tick_count += 1;
    let now_ms = state.time_ms;

    // Player movement, aim, weapon selection
    let player = &mut state.player;
    player.move_up = input.move_up;
    player.move_down = input.move_down;
    player.move_left = input.move_left;
    player.move_right = input.move_right;
    if let Some(theta) = input.aim_theta {
        player.aim_theta = theta;
    }
    if input.cycle_weapon != 0 {
        player.cycle_weapon(input.cycle_weapon);
    }
    player.advance(dt);

    // Firing
    if input.fire {
        let origin = state.player.pos;
        let aim = state.player.aim_dir();
        let shot = state
            .player
            .weapon_mut()
            .try_shoot(origin, aim, now_ms, &mut state.rng);
        if let Some(bullet) = shot {
            state.register_bullet(bullet);
        }
    }

    advance_bullets(state, dt, now_ms);

    // Spawning, capped on enemies still fighting
    if state.enemies_alive() < state.spawner.max_enemies {
        let player_pos = state.player.pos;
        let spawn = state.spawner.try_spawn(player_pos, now_ms, &mut state.rng);
        if let Some(enemy) = spawn {
            state.register_enemy(enemy);
        }
    }

    resolve_enemy_contacts(state, dt);

    // Defeat: the arena empties and the run halts until a restart
    if state.player.health <= 0 {
        state.clear_entities();
        state.set_phase(GamePhase::GameOver);
    }
}

/// Resolve state-machine commands ahead of any simulation work
fn handle_commands(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.start_run();
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.set_phase(GamePhase::Paused);
            }
        }
        GamePhase::Paused => {
            if input.pause {
                state.set_phase(GamePhase::Playing);
            } else if input.quit {
                state.clear_entities();
                state.set_phase(GamePhase::Menu);
            }
        }
        GamePhase::GameOver => {
            if input.restart {
                state.start_run();
            } else if input.quit {
                state.set_phase(GamePhase::Menu);
            }
        }
    }
}

/// Advance every bullet, resolve hits, drop expired shots.
///
/// Iterates by index and only steps forward when nothing was removed, so a
/// removal never skips the bullet that slid into the vacated slot. For each
/// bullet the first live enemy within its bounding radius wins, scanned in
/// collection order.
fn advance_bullets(state: &mut GameState, dt: f32, now_ms: f64) {
    let mut i = 0;
    while i < state.bullets.len() {
        state.bullets[i].advance(dt);
        let bullet_pos = state.bullets[i].pos;
        let bullet_damage = state.bullets[i].damage;

        let mut hit = None;
        for (j, enemy) in state.enemies.iter().enumerate() {
            if !enemy.is_dead && point_in_circle(bullet_pos, enemy.pos, enemy.bounding_radius) {
                hit = Some(j);
                break;
            }
        }

        let mut removed = false;
        if let Some(j) = hit {
            state.enemies[j].take_damage(bullet_damage);
            let enemy_id = state.enemies[j].id;
            let killed = state.enemies[j].is_dead;
            state.score += SCORE_PER_HIT;
            if killed {
                state.score += SCORE_PER_KILL;
                state.kills += 1;
                state.push_event(GameEvent::EnemyKilled { id: enemy_id });
                debug!("enemy {} down, score {}", enemy_id, state.score);
            }
            let bullet = state.bullets.remove(i);
            state.push_event(GameEvent::BulletRemoved { id: bullet.id });
            removed = true;
        } else if state.bullets[i].is_expired(now_ms) {
            let bullet = state.bullets.remove(i);
            state.push_event(GameEvent::BulletRemoved { id: bullet.id });
            removed = true;
        }

        if !removed {
            i += 1;
        }
    }
}

/// Player/enemy contact, enemy movement, and removal of the fallen.
///
/// Contact needs overlap plus an elapsed strike cooldown; it costs the player
/// one health, shoves the enemy away (which also costs the enemy one), and
/// rearms the cooldown. Every enemy then advances whether or not it struck.
fn resolve_enemy_contacts(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.bounding_radius;

    for i in 0..state.enemies.len() {
        let enemy_pos = state.enemies[i].pos;
        let enemy_radius = state.enemies[i].bounding_radius;
        let can_strike = !state.enemies[i].is_dead && state.enemies[i].hit_cooldown <= 0.0;

        if can_strike && circles_overlap(enemy_pos, enemy_radius, player_pos, player_radius) {
            state.player.take_damage(CONTACT_DAMAGE);
            state.push_event(GameEvent::PlayerDamaged {
                remaining: state.player.health,
            });
            let shove = normalize_dir(enemy_pos - player_pos);
            state.enemies[i].apply_knockback(shove, KNOCKBACK_FORCE);
            state.enemies[i].hit_cooldown = ENEMY_HIT_COOLDOWN;
        }

        state.enemies[i].advance(player_pos, dt);
    }

    // The fallen leave the field once the pass completes
    let fallen: Vec<u32> = state
        .enemies
        .iter()
        .filter(|e| e.is_dead)
        .map(|e| e.id)
        .collect();
    if !fallen.is_empty() {
        state.enemies.retain(|e| !e.is_dead);
        for id in fallen {
            state.push_event(GameEvent::EnemyRemoved { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, SpawnerConfig};
    use crate::sim::state::{Bullet, BulletKind, Enemy};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, &GameConfig::default())
    }

    /// A state one start-command past the menu, event queue flushed
    fn playing_state(seed: u64) -> GameState {
        let mut state = new_state(seed);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        state.take_events();
        state
    }

    #[test]
    fn test_start_command_leaves_menu() {
        let mut state = new_state(1);
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Menu);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_menu_does_not_advance_time() {
        let mut state = new_state(1);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }

        assert_eq!(state.time_ms, 0.0);
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = playing_state(1);
        state.register_enemy(Enemy::new(Vec2::new(300.0, 0.0)));

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen_pos = state.enemies[0].pos;
        let frozen_time = state.time_ms;
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.enemies[0].pos, frozen_pos);
        assert_eq!(state.time_ms, frozen_time);

        // Toggle back; the resume tick itself is consumed
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ms, frozen_time);

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.time_ms > frozen_time);
        assert_ne!(state.enemies[0].pos, frozen_pos);
    }

    #[test]
    fn test_movement_and_aim_follow_intents() {
        let mut state = playing_state(1);

        let input = TickInput {
            move_right: true,
            aim_theta: Some(1.25),
            ..Default::default()
        };
        tick(&mut state, &input, 1.0);

        assert!((state.player.pos.x - PLAYER_SPEED).abs() < 1e-3);
        assert_eq!(state.player.pos.y, 0.0);
        assert_eq!(state.player.aim_theta, 1.25);

        // No fresh aim intent keeps the previous facing
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.aim_theta, 1.25);
    }

    #[test]
    fn test_fire_is_gated_by_weapon_interval() {
        let mut state = playing_state(1);
        // Warm the session clock past the basic weapon's first interval
        tick(&mut state, &TickInput::default(), 0.6);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, DT);
        assert_eq!(state.bullets.len(), 1);

        // Straight away again: interval not elapsed
        tick(&mut state, &fire, DT);
        assert_eq!(state.bullets.len(), 1);

        // Half a second later it fires again
        tick(&mut state, &fire, 0.5);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_bullet_hits_first_enemy_in_collection_order() {
        let mut state = playing_state(1);
        state.register_enemy(Enemy::new(Vec2::new(50.0, 0.0)));
        state.register_enemy(Enemy::new(Vec2::new(60.0, 0.0)));
        state.register_bullet(Bullet::new(
            Vec2::new(40.0, 0.0),
            Vec2::X,
            BULLET_DAMAGE,
            BulletKind::Standard,
            state.time_ms,
        ));
        state.take_events();

        tick(&mut state, &TickInput::default(), DT);

        // One pass, one hit: the earlier-registered enemy absorbs the shot
        assert!(state.bullets.is_empty());
        assert_eq!(state.enemies[0].health, ENEMY_MAX_HEALTH - 1);
        assert_eq!(state.enemies[1].health, ENEMY_MAX_HEALTH);
        assert_eq!(state.score, SCORE_PER_HIT);
        assert_eq!(state.kills, 0);
    }

    #[test]
    fn test_killing_hit_scores_bonus_and_clears_corpse() {
        let mut state = playing_state(1);
        state.register_enemy(Enemy::new(Vec2::new(50.0, 0.0)));
        state.enemies[0].health = 1;
        let enemy_id = state.enemies[0].id;
        state.register_bullet(Bullet::new(
            Vec2::new(40.0, 0.0),
            Vec2::X,
            BULLET_DAMAGE,
            BulletKind::Standard,
            state.time_ms,
        ));
        let bullet_id = state.bullets[0].id;
        state.take_events();

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, SCORE_PER_HIT + SCORE_PER_KILL);
        assert_eq!(state.kills, 1);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(
            state.take_events(),
            vec![
                GameEvent::EnemyKilled { id: enemy_id },
                GameEvent::BulletRemoved { id: bullet_id },
                GameEvent::EnemyRemoved { id: enemy_id },
            ]
        );
    }

    #[test]
    fn test_bullet_expires_after_lifetime() {
        // Boundary: exactly at the lifetime is still alive
        let bullet = Bullet::new(Vec2::ZERO, Vec2::X, BULLET_DAMAGE, BulletKind::Standard, 0.0);
        assert!(!bullet.is_expired(BULLET_LIFETIME_MS));
        assert!(bullet.is_expired(BULLET_LIFETIME_MS + 0.1));

        let mut state = playing_state(1);
        state.register_bullet(Bullet::new(
            Vec2::ZERO,
            Vec2::X,
            BULLET_DAMAGE,
            BulletKind::Standard,
            state.time_ms,
        ));
        let bullet_id = state.bullets[0].id;
        state.take_events();

        tick(&mut state, &TickInput::default(), 3.1);

        assert!(state.bullets.is_empty());
        assert!(state
            .take_events()
            .contains(&GameEvent::BulletRemoved { id: bullet_id }));
    }

    #[test]
    fn test_spawner_fills_up_to_cap() {
        let config = GameConfig {
            spawner: SpawnerConfig {
                spawn_interval_ms: 100.0,
                max_enemies: 2,
                ..Default::default()
            },
        };
        let mut state = GameState::new(5, &config);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            DT,
        );

        for _ in 0..6 {
            tick(&mut state, &TickInput::default(), 0.2);
        }

        assert_eq!(state.enemies.len(), 2);
        let spawned = state
            .take_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
            .count();
        assert_eq!(spawned, 2);
    }

    #[test]
    fn test_contact_damages_both_sides_and_rearms_cooldown() {
        let mut state = playing_state(1);
        state.register_enemy(Enemy::new(state.player.pos));
        state.take_events();

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 1);
        assert_eq!(state.enemies[0].health, ENEMY_MAX_HEALTH - 1);
        // Shoved along the degenerate-contact fallback axis, cooldown running
        assert!(state.enemies[0].velocity.x > 0.0);
        assert!(state.enemies[0].hit_cooldown > 0.9);
        assert!(state
            .take_events()
            .contains(&GameEvent::PlayerDamaged {
                remaining: PLAYER_MAX_HEALTH - 1
            }));

        // Still overlapping, but the cooldown holds the next strike off
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 1);
    }

    #[test]
    fn test_four_contacts_end_the_run() {
        let mut state = playing_state(1);

        for _ in 0..PLAYER_MAX_HEALTH {
            assert_eq!(state.phase, GamePhase::Playing);
            state.register_enemy(Enemy::new(state.player.pos));
            tick(&mut state, &TickInput::default(), DT);
        }

        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!(state.take_events().contains(&GameEvent::PhaseChanged {
            from: GamePhase::Playing,
            to: GamePhase::GameOver
        }));

        // Halted: nothing advances after defeat
        let ticks = state.tick_count;
        let input = TickInput {
            move_right: true,
            fire: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.tick_count, ticks);
        assert_eq!(state.player.pos, Vec2::ZERO);
    }

    #[test]
    fn test_restart_resets_the_session() {
        let mut state = playing_state(1);
        state.score = 370;
        state.kills = 4;
        state.player.health = 1;
        state.register_enemy(Enemy::new(state.player.pos));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.kills, 0);
        assert_eq!(state.time_ms, 0.0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_quit_paths_lead_back_to_menu() {
        // From pause, clearing the arena
        let mut state = playing_state(1);
        state.register_enemy(Enemy::new(Vec2::new(300.0, 0.0)));
        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            DT,
        );
        tick(
            &mut state,
            &TickInput {
                quit: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.enemies.is_empty());

        // From game over
        let mut state = playing_state(2);
        state.player.health = 1;
        state.register_enemy(Enemy::new(state.player.pos));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        tick(
            &mut state,
            &TickInput {
                quit: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_cycle_step_selects_weapon() {
        let mut state = playing_state(1);

        tick(
            &mut state,
            &TickInput {
                cycle_weapon: 1,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.hud().weapon, "Auto Rifle");

        tick(
            &mut state,
            &TickInput {
                cycle_weapon: -2,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.hud().weapon, "Sniper");
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and script stay identical
        let mut state1 = new_state(99999);
        let mut state2 = new_state(99999);

        for i in 0u64..240 {
            let input = TickInput {
                start: i == 0,
                move_right: i % 3 == 0,
                move_up: i % 5 == 0,
                aim_theta: Some(i as f32 * 0.1),
                fire: i % 2 == 0,
                cycle_weapon: if i % 37 == 36 { 1 } else { 0 },
                pause: i == 120 || i == 130,
                ..Default::default()
            };
            tick(&mut state1, &input, DT);
            tick(&mut state2, &input, DT);
        }

        assert_eq!(state1.time_ms, state2.time_ms);
        assert_eq!(state1.tick_count, state2.tick_count);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.kills, state2.kills);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        for (a, b) in state1.enemies.iter().zip(state2.enemies.iter()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.health, b.health);
        }
        assert_eq!(state1.bullets.len(), state2.bullets.len());
        assert_eq!(state1.take_events(), state2.take_events());
    }
}
