#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player cannon: smoothed aiming, reload cadence, upgrades and shot creation.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use fish_hunt_core::{
    config::{CannonTuning, GameConfig, TierSpec},
    math::wrap_angle,
    CannonSnapshot, FireMode, FishId, Point, Refusal, Rgb, Velocity,
};
use fish_hunt_system_projectiles::Launch;
use tracing::info;

/// What a successful trigger pull produced.
#[derive(Clone, Debug)]
pub enum Shot {
    /// A physical projectile leaving the barrel tip.
    Projectile(Launch),
    /// A strike charged at the cannon's tier.
    Lightning {
        /// Tier of the cannon when it fired.
        tier: u8,
    },
}

/// The player-controlled cannon.
#[derive(Clone, Debug)]
pub struct Cannon {
    position: Point,
    tiers: Vec<TierSpec>,
    tuning: CannonTuning,
    upgrade_multiplier: u64,
    tier: u8,
    angle: f32,
    target_point: Point,
    aim_rate: f32,
    fire_interval: Duration,
    since_fire: Duration,
    reloading: bool,
    auto_aim: bool,
    auto_aim_target: Option<FishId>,
}

impl Cannon {
    /// Creates a tier-zero cannon centred above the bottom edge.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let tuning = config.cannon.clone();
        let position = Point::new(
            config.playfield.width / 2.0,
            config.playfield.height - tuning.baseline_offset,
        );
        let fire_interval = tuning.fire_interval();
        Self {
            position,
            tiers: config.tiers.clone(),
            upgrade_multiplier: config.economy.upgrade_cost_multiplier,
            tier: 0,
            angle: -FRAC_PI_2,
            target_point: Point::new(position.x, 0.0),
            aim_rate: tuning.aim_rate,
            fire_interval,
            since_fire: fire_interval,
            reloading: false,
            auto_aim: false,
            auto_aim_target: None,
            tuning,
        }
    }

    fn spec(&self) -> &TierSpec {
        let last = self.tiers.len().saturating_sub(1);
        &self.tiers[usize::from(self.tier).min(last)]
    }

    /// Pivot position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current aim angle in radians.
    #[must_use]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Point the cannon is turning toward.
    #[must_use]
    pub fn target_point(&self) -> Point {
        self.target_point
    }

    /// Current tier.
    #[must_use]
    pub fn tier(&self) -> u8 {
        self.tier
    }

    /// Highest reachable tier.
    #[must_use]
    pub fn max_tier(&self) -> u8 {
        u8::try_from(self.tiers.len().saturating_sub(1)).unwrap_or(u8::MAX)
    }

    /// Damage per direct hit at the current tier.
    #[must_use]
    pub fn power(&self) -> u32 {
        self.spec().power
    }

    /// Score spent per shot at the current tier.
    #[must_use]
    pub fn cost(&self) -> u64 {
        self.spec().cost
    }

    /// Barrel color at the current tier.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.spec().color
    }

    /// Minimum time between shots.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        self.fire_interval
    }

    /// Fraction of the remaining turn applied per frame.
    #[must_use]
    pub fn aim_rate(&self) -> f32 {
        self.aim_rate
    }

    /// Whether the cannon is reloading.
    #[must_use]
    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    /// Whether a trigger pull would fire.
    #[must_use]
    pub fn can_fire(&self) -> bool {
        !self.reloading && self.since_fire >= self.fire_interval
    }

    /// Point shots leave from.
    #[must_use]
    pub fn barrel_tip(&self) -> Point {
        self.position.offset(self.angle, self.tuning.barrel_length)
    }

    /// Sets the point the cannon turns toward.
    pub fn aim_at(&mut self, point: Point) {
        self.target_point = point;
    }

    /// Whether auto-aim is enabled.
    #[must_use]
    pub fn auto_aim(&self) -> bool {
        self.auto_aim
    }

    /// Enables or disables auto-aim. Disabling forgets the tracked fish.
    pub fn set_auto_aim(&mut self, enabled: bool) {
        self.auto_aim = enabled;
        if !enabled {
            self.auto_aim_target = None;
        }
    }

    /// Fish auto-aim is tracking.
    #[must_use]
    pub fn auto_aim_target(&self) -> Option<FishId> {
        self.auto_aim_target
    }

    /// Starts tracking a fish. Ignored while auto-aim is disabled.
    pub fn track(&mut self, fish: FishId) {
        if self.auto_aim {
            self.auto_aim_target = Some(fish);
        }
    }

    /// Advances aiming and reloading by one frame.
    ///
    /// `locate` resolves a living fish to its position and velocity; a tracked
    /// fish that no longer resolves is dropped.
    pub fn tick<F>(&mut self, dt: Duration, locate: F)
    where
        F: Fn(FishId) -> Option<(Point, Velocity)>,
    {
        if let Some(fish) = self.auto_aim_target {
            match locate(fish) {
                Some((position, velocity)) => {
                    let lead = velocity.scaled(self.tuning.auto_aim_lead_frames);
                    self.target_point = position.translate(lead);
                }
                None => self.auto_aim_target = None,
            }
        }

        let desired = self.position.angle_to(self.target_point);
        self.angle += wrap_angle(desired - self.angle) * self.aim_rate;

        self.since_fire = self.since_fire.saturating_add(dt);
        if self.reloading && self.since_fire >= self.fire_interval {
            self.reloading = false;
        }
    }

    /// Pulls the trigger.
    ///
    /// In projectile mode the shot carries the launch parameters; lightning
    /// modes produce a strike instead.
    pub fn fire(&mut self, mode: FireMode) -> Result<Shot, Refusal> {
        if !self.can_fire() {
            return Err(Refusal::Reloading);
        }
        self.reloading = true;
        self.since_fire = Duration::ZERO;

        let shot = match mode {
            FireMode::Projectile => {
                Shot::Projectile(Launch {
                    origin: self.barrel_tip(),
                    angle: self.angle,
                    power: self.power(),
                    tier: self.tier,
                })
            }
            FireMode::Lightning | FireMode::ContinuousLightning => {
                Shot::Lightning { tier: self.tier }
            }
        };
        Ok(shot)
    }

    /// Score required for the next upgrade, or `None` at the highest tier.
    #[must_use]
    pub fn upgrade_cost(&self) -> Option<u64> {
        self.tiers
            .get(usize::from(self.tier) + 1)
            .map(|next| next.cost.saturating_mul(self.upgrade_multiplier))
    }

    /// Whether `score` covers the next upgrade.
    #[must_use]
    pub fn can_upgrade(&self, score: u64) -> bool {
        self.upgrade_cost().is_some_and(|cost| score >= cost)
    }

    /// Moves to the next tier. Returns `false` at the highest tier.
    pub fn upgrade(&mut self) -> bool {
        if self.tier >= self.max_tier() {
            return false;
        }
        self.tier += 1;

        let floor = Duration::from_millis(self.tuning.fire_interval_floor_ms);
        let step = Duration::from_millis(self.tuning.fire_interval_step_ms);
        self.fire_interval = self.fire_interval.saturating_sub(step).max(floor);
        self.aim_rate =
            (self.aim_rate + self.tuning.aim_rate_step).min(self.tuning.aim_rate_ceiling);

        info!(
            tier = self.tier,
            power = self.power(),
            fire_interval_ms = self.fire_interval.as_millis() as u64,
            "cannon upgraded"
        );
        true
    }

    /// Captures a read-only description of the cannon.
    #[must_use]
    pub fn snapshot(&self) -> CannonSnapshot {
        CannonSnapshot {
            position: self.position,
            angle: self.angle,
            tier: self.tier,
            power: self.power(),
            cost: self.cost(),
            color: self.color(),
            reloading: self.reloading,
            target_point: self.target_point,
            auto_aim: self.auto_aim,
            auto_aim_target: self.auto_aim_target,
        }
    }
}
