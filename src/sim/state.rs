//! Game state and core simulation types
//!
//! Everything the tick mutates lives here: the phase machine, the player,
//! the live enemy/bullet collections, score, the seeded RNG, and the event
//! queue the presentation layer drains.

use glam::Vec2;
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawner::EnemySpawner;
use super::weapon::Weapon;
use crate::config::GameConfig;
use crate::consts::*;
use crate::{angle_to_dir, normalize_dir};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command; no live entities
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-run; all entity state held as-is
    Paused,
    /// Run ended; no live entities
    GameOver,
}

/// Bullet flavors the presentation layer renders distinctly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletKind {
    Standard,
    Sniper,
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Bullet {
    /// Assigned by the simulation on registration; keys the visual handle
    pub id: u32,
    pub pos: Vec2,
    /// Unit travel direction, fixed at spawn
    pub dir: Vec2,
    pub speed: f32,
    pub damage: i32,
    pub kind: BulletKind,
    pub spawn_time_ms: f64,
    pub lifetime_ms: f64,
}

impl Bullet {
    pub fn new(origin: Vec2, dir: Vec2, damage: i32, kind: BulletKind, now_ms: f64) -> Self {
        Self {
            id: 0,
            pos: origin,
            dir: normalize_dir(dir),
            speed: BULLET_SPEED,
            damage,
            kind,
            spawn_time_ms: now_ms,
            lifetime_ms: BULLET_LIFETIME_MS,
        }
    }

    /// Pure translation; bullets never accelerate or steer
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.dir * self.speed * dt;
    }

    /// True once age strictly exceeds the lifetime
    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawn_time_ms > self.lifetime_ms
    }
}

/// A seeking adversary
#[derive(Debug, Clone)]
pub struct Enemy {
    /// Assigned by the simulation on registration; keys the visual handle
    pub id: u32,
    pub pos: Vec2,
    pub bounding_radius: f32,
    pub health: i32,
    pub is_dead: bool,
    /// Base approach speed (units/second)
    pub speed: f32,
    /// Transient knockback impulse; decays by damping each update
    pub velocity: Vec2,
    /// Seconds until this enemy may strike the player again
    pub hit_cooldown: f32,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            id: 0,
            pos,
            bounding_radius: ENEMY_RADIUS,
            health: ENEMY_MAX_HEALTH,
            is_dead: false,
            speed: ENEMY_SPEED,
            velocity: Vec2::ZERO,
            hit_cooldown: 0.0,
        }
    }

    /// Advance one tick: tick the strike cooldown, then either ride out the
    /// knockback impulse or seek the player. The two movement branches are
    /// mutually exclusive within a single update.
    pub fn advance(&mut self, player_pos: Vec2, dt: f32) {
        if self.is_dead {
            return;
        }
        if self.hit_cooldown > 0.0 {
            self.hit_cooldown = (self.hit_cooldown - dt).max(0.0);
        }
        if self.velocity.length_squared() > KNOCKBACK_REST_SQ {
            self.pos += self.velocity * dt;
            self.velocity *= KNOCKBACK_DAMPING;
            if self.velocity.length_squared() <= KNOCKBACK_REST_SQ {
                self.velocity = Vec2::ZERO;
            }
        } else {
            let seek_dir = normalize_dir(player_pos - self.pos);
            self.pos += seek_dir * self.speed * dt;
        }
    }

    /// No-op once dead; death never reverts
    pub fn take_damage(&mut self, amount: i32) {
        if self.is_dead {
            return;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.is_dead = true;
        }
    }

    /// Shove the enemy along `direction` and charge it the contact toll.
    /// Slamming into the player always costs the enemy 1 health.
    pub fn apply_knockback(&mut self, direction: Vec2, force: f32) {
        if self.is_dead {
            return;
        }
        self.velocity += normalize_dir(direction) * force;
        self.take_damage(CONTACT_DAMAGE);
    }
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub bounding_radius: f32,
    pub health: i32,
    pub is_dead: bool,
    /// Movement speed per held axis (units/second)
    pub speed: f32,
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Facing in radians; bullets launch along this
    pub aim_theta: f32,
    pub weapons: Vec<Weapon>,
    pub current_weapon: usize,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            bounding_radius: PLAYER_RADIUS,
            health: PLAYER_MAX_HEALTH,
            is_dead: false,
            speed: PLAYER_SPEED,
            move_up: false,
            move_down: false,
            move_left: false,
            move_right: false,
            aim_theta: 0.0,
            weapons: vec![Weapon::basic(), Weapon::auto_rifle(), Weapon::sniper()],
            current_weapon: 0,
        }
    }

    /// Apply held movement intents. Axes are independent: each held direction
    /// contributes full speed, opposite flags cancel, diagonals stack.
    pub fn advance(&mut self, dt: f32) {
        if self.is_dead {
            return;
        }
        let mut step = Vec2::ZERO;
        if self.move_up {
            step.y += 1.0;
        }
        if self.move_down {
            step.y -= 1.0;
        }
        if self.move_left {
            step.x -= 1.0;
        }
        if self.move_right {
            step.x += 1.0;
        }
        self.pos += step * self.speed * dt;
    }

    /// No-op once dead; death never reverts
    pub fn take_damage(&mut self, amount: i32) {
        if self.is_dead {
            return;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.is_dead = true;
        }
    }

    /// Step the weapon selection by a signed amount, wrapping both ways
    pub fn cycle_weapon(&mut self, step: i32) {
        let len = self.weapons.len() as i64;
        self.current_weapon = (self.current_weapon as i64 + step as i64).rem_euclid(len) as usize;
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapons[self.current_weapon]
    }

    pub fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.current_weapon]
    }

    /// Unit vector of the current facing
    pub fn aim_dir(&self) -> Vec2 {
        angle_to_dir(self.aim_theta)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifications for the presentation layer, drained via
/// [`GameState::take_events`]. Spawn/remove pairs keep per-entity visual
/// handles in sync; the rest feed UI and audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BulletSpawned { id: u32, kind: BulletKind },
    BulletRemoved { id: u32 },
    EnemySpawned { id: u32 },
    /// A bullet kill; scored and counted. Removal follows separately.
    EnemyKilled { id: u32 },
    EnemyRemoved { id: u32 },
    PlayerDamaged { remaining: i32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Read-only per-frame summary for HUD rendering
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub health: i32,
    pub score: u64,
    pub kills: u32,
    pub phase: GamePhase,
    pub weapon: &'static str,
    pub enemies_alive: usize,
}

/// Complete simulation state - the explicit context object the frame loop
/// owns. No globals; all randomness flows through the seeded `rng`.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed, kept for reporting
    pub seed: u64,
    pub phase: GamePhase,
    /// Non-negative, monotonically increasing while Playing
    pub score: u64,
    pub kills: u32,
    /// Simulation clock in ms; the `now` weapons and the spawner see
    pub time_ms: f64,
    pub tick_count: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub spawner: EnemySpawner,
    pub rng: Pcg32,
    /// Pending notifications, in emission order
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            score: 0,
            kills: 0,
            time_ms: 0.0,
            tick_count: 0,
            player: Player::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            spawner: EnemySpawner::new(&config.spawner),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Assign an id to a freshly constructed bullet, announce it, and add it
    /// to the live collection.
    pub fn register_bullet(&mut self, mut bullet: Bullet) {
        bullet.id = self.next_entity_id();
        self.events.push(GameEvent::BulletSpawned {
            id: bullet.id,
            kind: bullet.kind,
        });
        self.bullets.push(bullet);
    }

    /// Assign an id to a freshly spawned enemy, announce it, and add it to
    /// the live collection.
    pub fn register_enemy(&mut self, mut enemy: Enemy) {
        enemy.id = self.next_entity_id();
        self.events.push(GameEvent::EnemySpawned { id: enemy.id });
        self.enemies.push(enemy);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events in emission order
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enemies still fighting (dead-but-unremoved corpses excluded)
    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| !e.is_dead).count()
    }

    /// Switch phase, announcing the transition. No-op if already there.
    pub fn set_phase(&mut self, to: GamePhase) {
        if self.phase == to {
            return;
        }
        info!("phase {:?} -> {:?}", self.phase, to);
        self.events.push(GameEvent::PhaseChanged {
            from: self.phase,
            to,
        });
        self.phase = to;
    }

    /// Remove every live entity, emitting a removal event for each so the
    /// presentation layer can drop its handles.
    pub fn clear_entities(&mut self) {
        for bullet in self.bullets.drain(..) {
            self.events.push(GameEvent::BulletRemoved { id: bullet.id });
        }
        for enemy in self.enemies.drain(..) {
            self.events.push(GameEvent::EnemyRemoved { id: enemy.id });
        }
    }

    /// Begin a fresh run: entities cleared, score and clocks zeroed, a new
    /// player with cold weapons, spawner timer rewound.
    pub fn start_run(&mut self) {
        self.clear_entities();
        self.player = Player::new();
        self.score = 0;
        self.kills = 0;
        self.time_ms = 0.0;
        self.tick_count = 0;
        self.spawner.reset();
        self.set_phase(GamePhase::Playing);
    }

    /// Build the read-only HUD summary for this frame
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            health: self.player.health,
            score: self.score,
            kills: self.kills,
            phase: self.phase,
            weapon: self.player.weapon().name(),
            enemies_alive: self.enemies_alive(),
        }
    }
}
