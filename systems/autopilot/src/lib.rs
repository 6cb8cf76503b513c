#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that plays the session by emitting player commands from snapshots.

use fish_hunt_core::{
    math::wrap_angle, CannonSnapshot, Command, FireMode, FishSnapshot, HudSnapshot, Point,
};

/// Frames of target motion the autopilot leads its aim by.
const LEAD_FRAMES: f32 = 20.0;

/// Tunable behaviour of the [`Autopilot`].
#[derive(Clone, Debug, PartialEq)]
pub struct AutopilotConfig {
    /// Fire mode the autopilot switches to and keeps.
    pub mode: FireMode,
    /// Score the autopilot keeps in reserve when buying upgrades.
    pub upgrade_reserve: u64,
    /// Largest angular error, in radians, at which the autopilot still fires.
    pub aim_tolerance: f32,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            mode: FireMode::Projectile,
            upgrade_reserve: 4_000,
            aim_tolerance: 0.05,
        }
    }
}

/// Autopilot that aims at the most valuable reachable fish and fires when lined up.
#[derive(Debug, Default)]
pub struct Autopilot {
    config: AutopilotConfig,
    scratch: Vec<Command>,
}

impl Autopilot {
    /// Creates an autopilot with the provided behaviour.
    #[must_use]
    pub fn new(config: AutopilotConfig) -> Self {
        Self {
            config,
            scratch: Vec::new(),
        }
    }

    /// Behaviour the autopilot was created with.
    #[must_use]
    pub fn config(&self) -> &AutopilotConfig {
        &self.config
    }

    /// Emits the commands the autopilot wants issued before the next tick.
    pub fn handle(
        &mut self,
        hud: &HudSnapshot,
        cannon: &CannonSnapshot,
        fish: &[FishSnapshot],
        out: &mut Vec<Command>,
    ) {
        if hud.paused || hud.game_over {
            return;
        }

        self.scratch.clear();

        if hud.fire_mode != self.config.mode {
            self.scratch.push(Command::SetFireMode {
                mode: self.config.mode,
            });
        }

        if let Some(cost) = hud.upgrade_cost {
            if hud.can_upgrade && hud.score >= cost.saturating_add(self.config.upgrade_reserve) {
                self.scratch.push(Command::UpgradeCannon);
            }
        }

        let lightning = self.config.mode != FireMode::Projectile;
        if lightning && !hud.can_attack {
            self.scratch.push(Command::LowerBet);
        }

        if let Some(target) = pick_target(cannon.position, fish) {
            let aim = lead(target);
            self.scratch.push(Command::AimAt { point: aim });

            let error = wrap_angle(cannon.position.angle_to(aim) - cannon.angle).abs();
            let ready = match self.config.mode {
                FireMode::Projectile => !cannon.reloading && hud.score > cannon.cost,
                FireMode::Lightning => !cannon.reloading && hud.can_attack,
                FireMode::ContinuousLightning => hud.can_attack,
            };
            if ready && error <= self.config.aim_tolerance {
                self.scratch.push(Command::Fire);
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

/// Picks the living fish with the best score per distance from the cannon.
fn pick_target(cannon: Point, fish: &[FishSnapshot]) -> Option<&FishSnapshot> {
    fish.iter()
        .filter(|candidate| candidate.health > 0.0 && candidate.position.y < cannon.y)
        .map(|candidate| {
            let distance = candidate.position.distance_to(cannon).max(1.0);
            (candidate, candidate.score as f32 / distance)
        })
        .max_by(|(a, a_value), (b, b_value)| {
            a_value.total_cmp(b_value).then_with(|| b.id.cmp(&a.id))
        })
        .map(|(candidate, _)| candidate)
}

fn lead(target: &FishSnapshot) -> Point {
    Point::new(
        target.position.x + target.velocity.dx * LEAD_FRAMES,
        target.position.y + target.velocity.dy * LEAD_FRAMES,
    )
}
