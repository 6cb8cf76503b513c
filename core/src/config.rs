//! Static game definitions and tuning consumed read-only by the session.
//!
//! Every block implements [`Default`] with the stock arcade values and is
//! deserialisable with `#[serde(default)]`, so configuration files only need
//! to mention the values they override.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Point, Rgb, Species};

/// Seed used when a configuration does not provide one.
pub const DEFAULT_SEED: u64 = 0x0f15_4a11_7e55_e7ed;

/// Complete configuration of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed feeding every random decision made by the session.
    pub seed: u64,
    /// Dimensions of the playfield.
    pub playfield: Playfield,
    /// Species table indexed by [`Species::index`].
    pub species: Vec<SpeciesSpec>,
    /// Cannon tier table, lowest tier first.
    pub tiers: Vec<TierSpec>,
    /// Starting balances and betting rules.
    pub economy: EconomyConfig,
    /// Spawn cadence and difficulty ramp.
    pub spawning: SpawnTuning,
    /// Cannon handling.
    pub cannon: CannonTuning,
    /// Area damage, chain reactions and combos.
    pub combat: CombatTuning,
    /// Lightning strikes.
    pub lightning: LightningTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            playfield: Playfield::default(),
            species: default_species(),
            tiers: default_tiers(),
            economy: EconomyConfig::default(),
            spawning: SpawnTuning::default(),
            cannon: CannonTuning::default(),
            combat: CombatTuning::default(),
            lightning: LightningTuning::default(),
        }
    }
}

impl GameConfig {
    /// Checks the cross-field rules the session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Playfield { width, height, .. } = self.playfield;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::Playfield { width, height });
        }
        if self.species.len() != Species::COUNT {
            return Err(ConfigError::SpeciesCount {
                expected: Species::COUNT,
                found: self.species.len(),
            });
        }
        for spec in &self.species {
            let speed_ok = spec.speed.is_finite() && spec.speed >= 0.0;
            let radius_ok = spec.radius.is_finite() && spec.radius > 0.0;
            if !(speed_ok && radius_ok) {
                return Err(ConfigError::Species {
                    name: spec.name.clone(),
                });
            }
        }
        if self.tiers.is_empty() {
            return Err(ConfigError::EmptyTiers);
        }
        if self.tiers.len() > usize::from(u8::MAX) {
            return Err(ConfigError::TooManyTiers {
                found: self.tiers.len(),
            });
        }
        self.economy.validate()?;

        let spawning = &self.spawning;
        if spawning.formation_size_min == 0
            || spawning.formation_size_min > spawning.formation_size_max
        {
            return Err(ConfigError::FormationSize {
                min: spawning.formation_size_min,
                max: spawning.formation_size_max,
            });
        }
        if spawning.single_interval == 0
            || spawning.formation_interval == 0
            || spawning.boss_interval == 0
            || spawning.difficulty_interval == 0
        {
            return Err(ConfigError::ZeroInterval);
        }
        let timings = [
            ("combat.chain_start_delay", self.combat.chain_start_delay),
            ("combat.chain_hop_delay", self.combat.chain_hop_delay),
            ("combat.chain_expand_delay", self.combat.chain_expand_delay),
            ("lightning.strike_delay", self.lightning.strike_delay),
            (
                "lightning.continuous_interval_ms",
                self.lightning.continuous_interval_ms,
            ),
            ("lightning.lock_duration_ms", self.lightning.lock_duration_ms),
        ];
        if let Some((field, _)) = timings.into_iter().find(|&(_, value)| value == 0) {
            return Err(ConfigError::ZeroTiming { field });
        }
        Ok(())
    }

    /// Species definition for the provided species.
    #[must_use]
    pub fn species_spec(&self, species: Species) -> &SpeciesSpec {
        &self.species[species.index()]
    }

    /// Tier definition for the provided tier, saturating at the highest tier.
    #[must_use]
    pub fn tier_spec(&self, tier: u8) -> &TierSpec {
        let last = self.tiers.len().saturating_sub(1);
        &self.tiers[usize::from(tier).min(last)]
    }

    /// Highest tier the cannon can reach.
    #[must_use]
    pub fn max_tier(&self) -> u8 {
        u8::try_from(self.tiers.len().saturating_sub(1)).unwrap_or(u8::MAX)
    }
}

/// Errors reported by [`GameConfig::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The playfield has no area.
    #[error("playfield must have a positive size, got {width}x{height}")]
    Playfield {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// The species table does not describe every species.
    #[error("species table must contain {expected} entries, found {found}")]
    SpeciesCount {
        /// Required number of entries.
        expected: usize,
        /// Number of entries present.
        found: usize,
    },
    /// A species moves at an unusable speed or has no body.
    #[error("species `{name}` needs a finite non-negative speed and a positive radius")]
    Species {
        /// Name of the offending species.
        name: String,
    },
    /// The tier table is empty.
    #[error("tier table must contain at least one tier")]
    EmptyTiers,
    /// The tier table cannot be indexed by a tier byte.
    #[error("tier table may contain at most 255 tiers, found {found}")]
    TooManyTiers {
        /// Number of entries present.
        found: usize,
    },
    /// The bet bounds are inverted or zero.
    #[error("bet bounds {min}..={max} are invalid")]
    BetBounds {
        /// Configured minimum bet.
        min: u64,
        /// Configured maximum bet.
        max: u64,
    },
    /// A bet option lies outside the bet bounds or the list is unsorted.
    #[error("bet options must be strictly increasing and within the bet bounds")]
    BetOptions,
    /// The default bet is not one of the bet options.
    #[error("default bet {bet} is not one of the bet options")]
    DefaultBet {
        /// Configured default bet.
        bet: u64,
    },
    /// Formation sizes are empty or inverted.
    #[error("formation size bounds {min}..={max} are invalid")]
    FormationSize {
        /// Configured minimum size.
        min: u32,
        /// Configured maximum size.
        max: u32,
    },
    /// A spawn or difficulty interval is zero.
    #[error("spawn and difficulty intervals must be positive")]
    ZeroInterval,
    /// A chain, strike or lock timing is zero.
    #[error("{field} must be positive")]
    ZeroTiming {
        /// Configuration field holding the zero.
        field: &'static str,
    },
}

/// Rectangular playfield with an out-of-bounds margin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
    /// Distance outside the edges that still counts as inside.
    pub margin: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 980.0,
            height: 600.0,
            margin: 50.0,
        }
    }
}

impl Playfield {
    /// Centre of the playfield.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Reports whether the point lies within the playfield extended by the margin.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= -self.margin
            && point.x <= self.width + self.margin
            && point.y >= -self.margin
            && point.y <= self.height + self.margin
    }
}

/// Static description of a fish species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSpec {
    /// Display name.
    pub name: String,
    /// Score awarded for a kill.
    pub score: u64,
    /// Maximum speed per frame.
    pub speed: f32,
    /// Collision radius.
    pub radius: f32,
    /// Body color.
    pub color: Rgb,
    /// Multiplier applied to the base coin reward.
    pub coin_multiplier: f32,
}

impl SpeciesSpec {
    /// Health of a freshly spawned, non-boss member of the species.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        let score = self.score as f32;
        (score * 2.0).max(score + 10.0)
    }
}

fn default_species() -> Vec<SpeciesSpec> {
    let entry = |name: &str,
                 score: u64,
                 speed: f32,
                 radius: f32,
                 color: Rgb,
                 coin_multiplier: f32| SpeciesSpec {
        name: name.to_owned(),
        score,
        speed,
        radius,
        color,
        coin_multiplier,
    };
    vec![
        entry("small fish", 2, 1.0, 20.0, Rgb::from_rgb(0xff, 0xb6, 0xc1), 3.0),
        entry("medium fish", 5, 0.8, 30.0, Rgb::from_rgb(0x87, 0xce, 0xeb), 4.0),
        entry("large fish", 10, 0.6, 40.0, Rgb::from_rgb(0x98, 0xfb, 0x98), 5.0),
        entry("goldfish", 20, 0.5, 35.0, Rgb::from_rgb(0xff, 0xd7, 0x00), 6.0),
        entry("shark", 50, 0.4, 60.0, Rgb::from_rgb(0x70, 0x80, 0x90), 8.0),
        entry("whale", 100, 0.3, 80.0, Rgb::from_rgb(0x41, 0x69, 0xe1), 12.0),
    ]
}

/// Static description of a cannon tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Damage dealt by a direct hit.
    pub power: u32,
    /// Score spent per shot, and the base of the upgrade price.
    pub cost: u64,
    /// Barrel and projectile color.
    pub color: Rgb,
}

fn default_tiers() -> Vec<TierSpec> {
    [
        (1, 1, Rgb::from_rgb(0xff, 0xd7, 0x00)),
        (2, 2, Rgb::from_rgb(0xff, 0x63, 0x47)),
        (3, 3, Rgb::from_rgb(0x32, 0xcd, 0x32)),
        (4, 4, Rgb::from_rgb(0xff, 0x69, 0xb4)),
        (5, 5, Rgb::from_rgb(0x93, 0x70, 0xdb)),
    ]
    .into_iter()
    .map(|(power, cost, color): (u32, u64, Rgb)| TierSpec { power, cost, color })
    .collect()
}

/// Starting balances and betting rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Score at the start of a session.
    pub initial_score: u64,
    /// Coins at the start of a session.
    pub initial_coins: u64,
    /// Bet at the start of a session.
    pub default_bet: u64,
    /// Smallest bet accepted by `SetBet`.
    pub min_bet: u64,
    /// Largest bet accepted by `SetBet`.
    pub max_bet: u64,
    /// Bets reachable by stepping up or down, strictly increasing.
    pub bet_options: Vec<u64>,
    /// Factor applied to the next tier's cost to price an upgrade.
    pub upgrade_cost_multiplier: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_score: 10_000,
            initial_coins: 10_000,
            default_bet: 2,
            min_bet: 1,
            max_bet: 100,
            bet_options: vec![1, 2, 3, 5, 10, 20, 50],
            upgrade_cost_multiplier: 1_000,
        }
    }
}

impl EconomyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bet == 0 || self.min_bet > self.max_bet {
            return Err(ConfigError::BetBounds {
                min: self.min_bet,
                max: self.max_bet,
            });
        }
        let sorted = self.bet_options.windows(2).all(|pair| pair[0] < pair[1]);
        let bounded = self
            .bet_options
            .iter()
            .all(|bet| (self.min_bet..=self.max_bet).contains(bet));
        if self.bet_options.is_empty() || !sorted || !bounded {
            return Err(ConfigError::BetOptions);
        }
        if !self.bet_options.contains(&self.default_bet) {
            return Err(ConfigError::DefaultBet {
                bet: self.default_bet,
            });
        }
        Ok(())
    }
}

/// Spawn cadence and difficulty ramp, measured in frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Single fish spawned when the school is populated.
    pub opening_singles: u32,
    /// Formations spawned when the school is populated.
    pub opening_formations: u32,
    /// Starting population cap for single spawns.
    pub population_cap: u32,
    /// Highest value the population cap may ramp to.
    pub population_ceiling: u32,
    /// Growth of the population cap per difficulty level.
    pub population_step: u32,
    /// Frames between single spawns.
    pub single_interval: u32,
    /// Shortest single spawn interval the ramp may reach.
    pub single_interval_floor: u32,
    /// Reduction of the single spawn interval per difficulty level.
    pub single_interval_step: u32,
    /// Frames between formation spawns.
    pub formation_interval: u32,
    /// Shortest formation interval the ramp may reach.
    pub formation_interval_floor: u32,
    /// Reduction of the formation interval per difficulty level.
    pub formation_interval_step: u32,
    /// Frames between boss spawn attempts.
    pub boss_interval: u32,
    /// Shortest boss interval the ramp may reach.
    pub boss_interval_floor: u32,
    /// Reduction of the boss interval per difficulty level.
    pub boss_interval_step: u32,
    /// Frames between difficulty increases.
    pub difficulty_interval: u32,
    /// Smallest formation.
    pub formation_size_min: u32,
    /// Largest formation.
    pub formation_size_max: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            opening_singles: 40,
            opening_formations: 3,
            population_cap: 70,
            population_ceiling: 100,
            population_step: 1,
            single_interval: 40,
            single_interval_floor: 20,
            single_interval_step: 10,
            formation_interval: 200,
            formation_interval_floor: 100,
            formation_interval_step: 30,
            boss_interval: 1_800,
            boss_interval_floor: 900,
            boss_interval_step: 60,
            difficulty_interval: 3_600,
            formation_size_min: 12,
            formation_size_max: 20,
        }
    }
}

/// Cannon handling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannonTuning {
    /// Minimum time between shots at tier zero, in milliseconds.
    pub fire_interval_ms: u64,
    /// Fastest fire interval upgrades may reach, in milliseconds.
    pub fire_interval_floor_ms: u64,
    /// Fire interval reduction per upgrade, in milliseconds.
    pub fire_interval_step_ms: u64,
    /// Fraction of the remaining turn applied per frame at tier zero.
    pub aim_rate: f32,
    /// Highest aim rate upgrades may reach.
    pub aim_rate_ceiling: f32,
    /// Aim rate gained per upgrade.
    pub aim_rate_step: f32,
    /// Distance from the pivot to the barrel tip.
    pub barrel_length: f32,
    /// Distance between the pivot and the bottom edge.
    pub baseline_offset: f32,
    /// Frames of motion auto-aim leads its target by.
    pub auto_aim_lead_frames: f32,
    /// Radius searched when auto-aim picks a homing target.
    pub auto_aim_radius: f32,
}

impl Default for CannonTuning {
    fn default() -> Self {
        Self {
            fire_interval_ms: 500,
            fire_interval_floor_ms: 200,
            fire_interval_step_ms: 50,
            aim_rate: 0.1,
            aim_rate_ceiling: 0.2,
            aim_rate_step: 0.02,
            barrel_length: 60.0,
            baseline_offset: 80.0,
            auto_aim_lead_frames: 30.0,
            auto_aim_radius: 200.0,
        }
    }
}

impl CannonTuning {
    /// Fire interval at tier zero.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        Duration::from_millis(self.fire_interval_ms)
    }
}

/// Area damage, chain reaction and combo rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Area radius at tier zero.
    pub area_radius_base: f32,
    /// Area radius gained per tier.
    pub area_radius_per_tier: f32,
    /// Area damage multiplier at tier zero.
    pub area_multiplier_base: f32,
    /// Area damage multiplier gained per tier.
    pub area_multiplier_per_tier: f32,
    /// Chain trigger probability at tier zero.
    pub chain_chance_base: f32,
    /// Chain trigger probability gained per tier.
    pub chain_chance_per_tier: f32,
    /// Highest chain trigger probability.
    pub chain_chance_cap: f32,
    /// Deepest hop level a chain may reach.
    pub chain_max_depth: u32,
    /// Hops a single chain may schedule in total.
    pub chain_hop_budget: u32,
    /// Chains allowed to run at the same time.
    pub chain_max_active: u32,
    /// Search radius of the first hop level.
    pub chain_range: f32,
    /// Fraction of the search radius lost per hop level.
    pub chain_range_decay: f32,
    /// Damage factor applied per hop level.
    pub chain_damage_decay: f32,
    /// Score factor applied per hop depth.
    pub chain_score_decay: f32,
    /// Targets a single expansion may jump to.
    pub chain_branching: usize,
    /// Frames between the triggering kill and the first expansion.
    pub chain_start_delay: u64,
    /// Frames between an expansion and its hops at level zero.
    pub chain_hop_delay: u64,
    /// Extra hop delay per level.
    pub chain_hop_delay_per_level: u64,
    /// Frames between a hop kill and the next expansion.
    pub chain_expand_delay: u64,
    /// Kills needed per combo bonus.
    pub combo_bonus_every: u32,
    /// Score granted per combo bonus multiple.
    pub combo_bonus_step: u64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            area_radius_base: 80.0,
            area_radius_per_tier: 25.0,
            area_multiplier_base: 0.7,
            area_multiplier_per_tier: 0.15,
            chain_chance_base: 0.2,
            chain_chance_per_tier: 0.15,
            chain_chance_cap: 0.7,
            chain_max_depth: 8,
            chain_hop_budget: 8,
            chain_max_active: 5,
            chain_range: 150.0,
            chain_range_decay: 0.2,
            chain_damage_decay: 0.9,
            chain_score_decay: 0.5,
            chain_branching: 2,
            chain_start_delay: 12,
            chain_hop_delay: 9,
            chain_hop_delay_per_level: 3,
            chain_expand_delay: 3,
            combo_bonus_every: 5,
            combo_bonus_step: 10,
        }
    }
}

/// Lightning strike rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningTuning {
    /// Frames between paying for a strike and its impact.
    pub strike_delay: u64,
    /// Fraction of the bet dealt as damage.
    pub damage_ratio: f32,
    /// Radius searched around the aim point for a strike target.
    pub target_radius: f32,
    /// Area radius at tier zero.
    pub area_radius_base: f32,
    /// Area radius gained per tier.
    pub area_radius_per_tier: f32,
    /// Area damage multiplier at tier zero.
    pub area_multiplier_base: f32,
    /// Area damage multiplier gained per tier.
    pub area_multiplier_per_tier: f32,
    /// Smallest distance falloff applied inside the area.
    pub area_min_ratio: f32,
    /// Time between continuous strikes, in milliseconds.
    pub continuous_interval_ms: u64,
    /// Longest a continuous lock may last, in milliseconds.
    pub lock_duration_ms: u64,
}

impl Default for LightningTuning {
    fn default() -> Self {
        Self {
            strike_delay: 9,
            damage_ratio: 0.5,
            target_radius: 200.0,
            area_radius_base: 120.0,
            area_radius_per_tier: 30.0,
            area_multiplier_base: 0.8,
            area_multiplier_per_tier: 0.2,
            area_min_ratio: 0.3,
            continuous_interval_ms: 50,
            lock_duration_ms: 10_000,
        }
    }
}

impl LightningTuning {
    /// Time between continuous strikes.
    #[must_use]
    pub fn continuous_interval(&self) -> Duration {
        Duration::from_millis(self.continuous_interval_ms)
    }

    /// Longest a continuous lock may last.
    #[must_use]
    pub fn lock_duration(&self) -> Duration {
        Duration::from_millis(self.lock_duration_ms)
    }
}
