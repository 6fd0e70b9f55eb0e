//! Star Swarm entry point
//!
//! Headless demo driver: runs the simulation at ~60 Hz with a small
//! autopilot standing in for a player, until defeat or the demo duration
//! elapses. The loop here plays the frame-scheduling role a renderer
//! normally would.

use std::env;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{info, warn};

use star_swarm::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use star_swarm::{FrameClock, GameConfig, HighScores, dir_to_angle};

/// Wall-clock length of one demo run before the loop gives up
const DEMO_DURATION_SECS: f64 = 120.0;
/// Frame pacing target (~60 Hz)
const FRAME: Duration = Duration::from_millis(16);

fn main() {
    env_logger::init();

    let config = load_config();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    info!("starting with seed {seed}");

    let mut state = GameState::new(seed, &config);
    let mut scores = HighScores::new();
    let mut clock = FrameClock::new();

    // Kick the run off
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, 0.0);

    let mut last_hud_ms = 0.0;
    while clock.now_ms() < DEMO_DURATION_SECS * 1000.0 {
        let dt = clock.frame_delta();
        let input = autopilot(&state);
        tick(&mut state, &input, dt);

        for event in state.take_events() {
            if let GameEvent::PhaseChanged {
                to: GamePhase::GameOver,
                ..
            } = event
            {
                info!("run over: score {} with {} kills", state.score, state.kills);
            }
        }

        if clock.now_ms() - last_hud_ms >= 1000.0 {
            last_hud_ms = clock.now_ms();
            if let Ok(json) = serde_json::to_string(&state.hud()) {
                info!("hud {json}");
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
        thread::sleep(FRAME);
    }

    if let Some(rank) = scores.add_score(state.score, state.kills) {
        info!("run ranked #{rank} this session");
    }

    let summary = serde_json::json!({
        "seed": seed,
        "score": state.score,
        "kills": state.kills,
        "ticks": state.tick_count,
        "top_score": scores.top_score(),
    });
    println!("{summary}");
}

/// Optional config path as the first CLI argument; a broken file logs a
/// warning and falls back to the defaults rather than aborting the demo.
fn load_config() -> GameConfig {
    let Some(path) = env::args().nth(1) else {
        return GameConfig::default();
    };
    match GameConfig::load(&path) {
        Ok(config) => {
            info!("loaded config from {path}");
            config
        }
        Err(err) => {
            warn!("config {path} unusable ({err}), using defaults");
            GameConfig::default()
        }
    }
}

/// Stand-in pilot: aim at the nearest live enemy, hold fire, keep a fighting
/// distance, and rotate the loadout now and then for variety.
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };

    let nearest = state.enemies.iter().filter(|e| !e.is_dead).min_by(|a, b| {
        let da = a.pos.distance_squared(state.player.pos);
        let db = b.pos.distance_squared(state.player.pos);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });

    if let Some(enemy) = nearest {
        let to_enemy = enemy.pos - state.player.pos;
        input.aim_theta = Some(dir_to_angle(to_enemy));

        // Back off when crowded, close in when the swarm hangs back
        let distance = to_enemy.length();
        if distance < 120.0 {
            input.move_left = to_enemy.x > 0.0;
            input.move_right = to_enemy.x < 0.0;
            input.move_up = to_enemy.y < 0.0;
            input.move_down = to_enemy.y > 0.0;
        } else if distance > 250.0 {
            input.move_right = to_enemy.x > 0.0;
            input.move_left = to_enemy.x < 0.0;
            input.move_up = to_enemy.y > 0.0;
            input.move_down = to_enemy.y < 0.0;
        }
    }

    // Swap weapons every ten seconds or so
    if state.tick_count > 0 && state.tick_count.is_multiple_of(600) {
        input.cycle_weapon = 1;
    }

    input
}
