// Combat and AI constants shared across the tick systems.

/// Fixed simulation timestep at the 30 Hz external cadence.
pub const TICK_DT: f32 = 1.0 / 30.0;

/// Bullets live at most three seconds.
pub const BULLET_TTL_TICKS: u32 = 90;
pub const BULLET_SPEED: f32 = 40.0;
/// XZ radius of the per-tick bullet sweep against enemies.
pub const BULLET_HIT_RADIUS: f32 = 1.0;
/// Half-height of the headshot band around the type's head height.
pub const HEAD_BAND: f32 = 0.25;
/// Muzzle height bullets are fired from.
pub const BULLET_HEIGHT_DEFAULT: f32 = 1.6;

/// Thrown projectiles live at most five seconds.
pub const PROJECTILE_TTL_TICKS: u32 = 150;
pub const PROJECTILE_SPEED: f32 = 12.0;
pub const PROJECTILE_GRAVITY: f32 = 9.8;
pub const PROJECTILE_HIT_RADIUS: f32 = 0.9;
/// Launch height of enemy throws.
pub const PROJECTILE_LAUNCH_HEIGHT: f32 = 1.8;

/// Cosine threshold of the melee cone (~70 degree half-angle).
pub const MELEE_CONE_COS: f32 = 0.3;

pub const ENEMY_MELEE_RANGE: f32 = 1.8;
pub const ENEMY_MELEE_COOLDOWN_TICKS: u32 = 60;
/// Straight-chase distance when the enemy can see its target.
pub const ENEMY_CHASE_RANGE: f32 = 20.0;
/// Ranged enemies closer than this back away at half speed.
pub const ENEMY_BACKOFF_RANGE: f32 = 8.0;
pub const ENEMY_RADIUS: f32 = 0.45;
/// Per-instance speed jitter at spawn, +/- this fraction.
pub const ENEMY_SPEED_JITTER: f32 = 0.1;
/// Displacement below this fraction of the attempt counts as stuck.
pub const STUCK_FRACTION: f32 = 0.3;

/// A path is re-requested at most once per second.
pub const PATH_REFRESH_TICKS: u32 = 30;
/// Waypoints within this distance count as reached.
pub const WAYPOINT_RADIUS: f32 = 1.5;
/// Chance per tick that a patrolling enemy picks a new wander point.
pub const PATROL_REFRESH_CHANCE: f64 = 0.02;
pub const PATROL_RADIUS: f32 = 12.0;

pub const KILL_SCORE_HEADSHOT_BONUS: u32 = 5;
/// Chance an enemy death drops a pickup.
pub const PICKUP_DROP_CHANCE: f64 = 0.2;
/// Extra headshot multiplier granted by the Headhunter perk.
pub const HEADHUNTER_BONUS: f32 = 0.5;

/// Breaking glass wakes enemies inside this radius.
pub const GLASS_AGGRO_RADIUS: f32 = 15.0;

/// Pickup spawner cadence; the interval stretches as levels climb.
pub const PICKUP_SPAWN_BASE_TICKS: u32 = 150;
pub const PICKUP_SPAWN_PER_LEVEL_TICKS: u32 = 15;
/// Live pickup cap per player in the lobby.
pub const PICKUPS_PER_PLAYER: usize = 4;

/// Pings disappear after fifteen seconds.
pub const PING_TTL_TICKS: u32 = 450;
/// Chat history kept in the snapshot tail.
pub const CHAT_LOG_CAP: usize = 100;
/// Chat messages are clipped to this many characters.
pub const CHAT_MAX_LEN: usize = 200;
