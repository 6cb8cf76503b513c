use serde::{Deserialize, Serialize};

use crate::{FireMode, FishId, GroupId, Point, ProjectileId, Rgb, Species, Velocity};

/// Read-only description of a living fish.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FishSnapshot {
    /// Identifier of the fish.
    pub id: FishId,
    /// Species of the fish.
    pub species: Species,
    /// Current position.
    pub position: Point,
    /// Displacement applied last frame.
    pub velocity: Velocity,
    /// Collision radius.
    pub radius: f32,
    /// Remaining health.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Score awarded for a kill.
    pub score: u64,
    /// Whether the fish is a boss.
    pub boss: bool,
    /// Whether the fish currently ignores damage.
    pub invulnerable: bool,
    /// Formation the fish belongs to, if any.
    pub group: Option<GroupId>,
    /// Body color.
    pub color: Rgb,
}

/// Read-only description of an active projectile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Current position.
    pub position: Point,
    /// Heading in radians.
    pub heading: f32,
    /// Body radius, or the explosion radius once exploded.
    pub radius: f32,
    /// Tier the projectile was fired at.
    pub tier: u8,
    /// Body color.
    pub color: Rgb,
    /// Whether the projectile is exploding.
    pub exploded: bool,
    /// Explosion animation progress in `[0, 1]`.
    pub explosion_progress: f32,
    /// Recent positions, oldest first.
    pub trail: Vec<Point>,
    /// Fish the projectile is steering toward.
    pub homing_target: Option<FishId>,
    /// Whether the projectile carries the chain flag.
    pub chain_capable: bool,
}

/// Read-only description of the cannon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CannonSnapshot {
    /// Pivot position.
    pub position: Point,
    /// Current aim angle in radians.
    pub angle: f32,
    /// Current tier.
    pub tier: u8,
    /// Damage per direct hit.
    pub power: u32,
    /// Score spent per shot.
    pub cost: u64,
    /// Barrel color.
    pub color: Rgb,
    /// Whether the cannon is reloading.
    pub reloading: bool,
    /// Point the cannon is turning toward.
    pub target_point: Point,
    /// Whether auto-aim is enabled.
    pub auto_aim: bool,
    /// Fish auto-aim is tracking, if any.
    pub auto_aim_target: Option<FishId>,
}

/// Scalars presented by the display sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Score balance.
    pub score: u64,
    /// Coin balance.
    pub coins: u64,
    /// Current bet.
    pub bet: u64,
    /// Current cannon tier.
    pub tier: u8,
    /// Price of the next upgrade, if one exists.
    pub upgrade_cost: Option<u64>,
    /// Whether the next upgrade is affordable.
    pub can_upgrade: bool,
    /// Whether the coin balance covers the bet.
    pub can_attack: bool,
    /// Consecutive kills.
    pub combo: u32,
    /// Highest combo reached this session.
    pub highest_combo: u32,
    /// Shots fired.
    pub shots: u64,
    /// Scoring hits landed.
    pub hits: u64,
    /// Hits per shot as a percentage.
    pub accuracy: f32,
    /// Coins wagered on strikes.
    pub total_wagered: u64,
    /// Coins won from kills.
    pub total_won: u64,
    /// Current difficulty level.
    pub difficulty: u32,
    /// Active fire mode.
    pub fire_mode: FireMode,
    /// Whether the session is paused.
    pub paused: bool,
    /// Whether the session has ended.
    pub game_over: bool,
}

/// Visual category of a transient effect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Expanding ring.
    Pulse,
    /// Rising number.
    Floating {
        /// Value displayed.
        value: u64,
    },
    /// Chain hop spark.
    Spark,
    /// Lightning arc ending at `to`.
    Arc {
        /// End of the arc.
        to: Point,
    },
    /// Sinking remains of a dead fish.
    Sink {
        /// Species of the fish.
        species: Species,
    },
    /// Single particle of a burst.
    Particle,
}

/// Read-only description of a transient effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    /// Visual category.
    pub kind: EffectKind,
    /// Anchor position.
    pub position: Point,
    /// Size of the effect.
    pub radius: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Tint.
    pub color: Rgb,
}

/// Aggregate statistics of the fish population.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolStats {
    /// Fish spawned this session.
    pub spawned: u64,
    /// Fish removed after dying.
    pub killed: u64,
    /// Kills per species, indexed by [`Species::index`].
    pub kills_by_species: [u64; Species::COUNT],
    /// Fish currently alive.
    pub alive: usize,
    /// Current difficulty level.
    pub difficulty: u32,
    /// Whether a boss is alive.
    pub boss_alive: bool,
}
