// Mutable entity state owned exclusively by one game simulation, plus the
// snapshot types derived from it each tick.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::math::Vec2;
use crate::domain::tuning::{EnemyKind, PlayerTuning};

pub type PlayerId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weapon {
    Pistol,
    Shotgun,
    Smg,
    Bat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perk {
    /// Extra headshot multiplier.
    Headhunter,
    /// Slower hunger decay.
    IronStomach,
    /// Slower warmth decay.
    ThickCoat,
}

/// Last received movement intent; re-applied every tick until replaced.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MoveInput {
    pub dx: f32,
    pub dz: f32,
    pub yaw: f32,
    pub pitch: f32,
}

pub struct SimPlayer {
    pub id: PlayerId,
    pub name: String,
    pub position: Vec2,
    pub yaw: f32,
    pub pitch: f32,

    pub health: f32,
    pub max_health: f32,
    // Survival stats, all clamped to 0..=100.
    pub hunger: f32,
    pub warmth: f32,
    pub energy: f32,

    pub ammo: u32,
    pub score: u32,
    pub kills: u32,

    pub alive: bool,
    pub is_downed: bool,
    /// Ticks left before an unrevived downed player dies.
    pub downed_timer: u32,

    pub weapons: [Weapon; 2],
    pub perks: HashSet<Perk>,
    pub color: String,
    pub escaped: bool,

    pub last_input: MoveInput,
    // Accumulators for periodic environmental damage.
    pub starve_tick: u32,
    pub freeze_tick: u32,
}

impl SimPlayer {
    pub fn new(id: PlayerId, name: String, position: Vec2, color: String) -> Self {
        let tuning = PlayerTuning::default();
        Self {
            id,
            name,
            position,
            yaw: 0.0,
            pitch: 0.0,
            health: tuning.max_health,
            max_health: tuning.max_health,
            hunger: 100.0,
            warmth: 100.0,
            energy: 100.0,
            ammo: tuning.starting_ammo,
            score: 0,
            kills: 0,
            alive: true,
            is_downed: false,
            downed_timer: 0,
            weapons: [Weapon::Pistol, Weapon::Bat],
            perks: HashSet::new(),
            color,
            escaped: false,
            last_input: MoveInput::default(),
            starve_tick: 0,
            freeze_tick: 0,
        }
    }

    /// True when the player can be targeted and can act.
    pub fn is_active(&self) -> bool {
        self.alive && !self.is_downed && !self.escaped
    }

    /// Applies damage and reports the resulting transition. Downed players
    /// absorb further hits; death only comes from the countdown.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive || self.escaped {
            return DamageOutcome::None;
        }
        if self.is_downed {
            return DamageOutcome::Absorbed;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        if self.health <= 0.0 {
            self.is_downed = true;
            self.downed_timer = PlayerTuning::default().downed_ticks;
            DamageOutcome::Downed
        } else {
            DamageOutcome::Absorbed
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    None,
    Absorbed,
    Downed,
}

/// Cosmetic backstory rolled deterministically at spawn.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub name: String,
    pub age: u32,
    pub net_worth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiState {
    Idle,
    Chasing,
    Attacking,
    Pathfinding,
    Patrolling,
    Waiting,
}

pub struct SimEnemy {
    pub id: u64,
    pub kind: EnemyKind,
    pub identity: Identity,
    pub position: Vec2,
    pub rotation: f32,

    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,

    pub aggro: bool,
    /// Weak reference by id; a lookup miss means "no target".
    pub target: Option<PlayerId>,
    pub state: AiState,

    pub melee_cooldown: u32,
    pub throw_cooldown: u32,
    /// Tick of the most recent path request, for the once-per-second gate.
    pub last_path_request_tick: Option<u64>,
    pub patrol_target: Option<Vec2>,
    /// Incremented when actual displacement falls well short of the
    /// attempted move. Tracked for future unstuck behavior.
    pub stuck_counter: u32,
}

pub struct SimBullet {
    pub id: u64,
    /// Weak owner reference by id.
    pub owner: PlayerId,
    pub position: Vec2,
    pub height: f32,
    pub velocity: Vec2,
    pub damage: f32,
    pub weapon: Weapon,
    pub ttl: u32,
}

pub struct SimProjectile {
    pub id: u64,
    pub owner_enemy: u64,
    pub position: Vec2,
    pub height: f32,
    pub velocity: Vec2,
    pub vertical_velocity: f32,
    pub damage: f32,
    pub ttl: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Food,
    Ammo,
    Medkit,
    Energy,
}

pub struct SimPickup {
    pub id: u64,
    pub kind: PickupKind,
    pub position: Vec2,
    /// Spin angle, advanced each tick for presentation only.
    pub rotation: f32,
}

pub struct SimPing {
    pub id: u64,
    pub player: PlayerId,
    pub position: Vec2,
    pub created_tick: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub player: PlayerId,
    pub name: String,
    pub text: String,
    pub tick: u64,
}

// Mutable flags layered over immutable map entities, keyed by entity id.

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LootContainerState {
    pub looted: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GlassZoneState {
    pub broken: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ObjectiveState {
    pub collected: bool,
}

// Snapshot types serialized into each world update.

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub position: Vec2,
    pub yaw: f32,
    pub pitch: f32,
    pub health: f32,
    pub max_health: f32,
    pub hunger: f32,
    pub warmth: f32,
    pub energy: f32,
    pub ammo: u32,
    pub score: u32,
    pub kills: u32,
    pub alive: bool,
    pub is_downed: bool,
    pub downed_timer: u32,
    pub weapons: [Weapon; 2],
    pub color: String,
    pub escaped: bool,
}

impl From<&SimPlayer> for PlayerSnapshot {
    fn from(player: &SimPlayer) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            position: player.position,
            yaw: player.yaw,
            pitch: player.pitch,
            health: player.health,
            max_health: player.max_health,
            hunger: player.hunger,
            warmth: player.warmth,
            energy: player.energy,
            ammo: player.ammo,
            score: player.score,
            kills: player.kills,
            alive: player.alive,
            is_downed: player.is_downed,
            downed_timer: player.downed_timer,
            weapons: player.weapons,
            color: player.color.clone(),
            escaped: player.escaped,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemySnapshot {
    pub id: u64,
    pub kind: EnemyKind,
    pub identity: Identity,
    pub position: Vec2,
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    pub aggro: bool,
    pub state: AiState,
}

impl From<&SimEnemy> for EnemySnapshot {
    fn from(enemy: &SimEnemy) -> Self {
        Self {
            id: enemy.id,
            kind: enemy.kind,
            identity: enemy.identity.clone(),
            position: enemy.position,
            rotation: enemy.rotation,
            health: enemy.health,
            max_health: enemy.max_health,
            aggro: enemy.aggro,
            state: enemy.state,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletSnapshot {
    pub id: u64,
    pub owner: PlayerId,
    pub position: Vec2,
    pub height: f32,
    pub velocity: Vec2,
}

impl From<&SimBullet> for BulletSnapshot {
    fn from(bullet: &SimBullet) -> Self {
        Self {
            id: bullet.id,
            owner: bullet.owner.clone(),
            position: bullet.position,
            height: bullet.height,
            velocity: bullet.velocity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub position: Vec2,
    pub height: f32,
    pub velocity: Vec2,
}

impl From<&SimProjectile> for ProjectileSnapshot {
    fn from(projectile: &SimProjectile) -> Self {
        Self {
            id: projectile.id,
            position: projectile.position,
            height: projectile.height,
            velocity: projectile.velocity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupSnapshot {
    pub id: u64,
    pub kind: PickupKind,
    pub position: Vec2,
    pub rotation: f32,
}

impl From<&SimPickup> for PickupSnapshot {
    fn from(pickup: &SimPickup) -> Self {
        Self {
            id: pickup.id,
            kind: pickup.kind,
            position: pickup.position,
            rotation: pickup.rotation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PingSnapshot {
    pub id: u64,
    pub player: PlayerId,
    pub position: Vec2,
}

impl From<&SimPing> for PingSnapshot {
    fn from(ping: &SimPing) -> Self {
        Self {
            id: ping.id,
            player: ping.player.clone(),
            position: ping.position,
        }
    }
}
