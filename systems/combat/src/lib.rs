#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat rules: splash formulas, chain reactions, deferred actions and combos.

mod chain;
mod combo;
mod scheduler;

use fish_hunt_core::config::{CombatTuning, LightningTuning};

pub use chain::{ChainRules, ChainSummary, Chains};
pub use combo::{ComboOutcome, ComboTracker};
pub use scheduler::{ScheduledAction, Scheduler};

/// Radius of the splash around a projectile hit at `tier`.
#[must_use]
pub fn area_radius(tuning: &CombatTuning, tier: u8) -> f32 {
    tuning.area_radius_base + tuning.area_radius_per_tier * f32::from(tier)
}

/// Splash damage dealt `distance` away from a projectile hit of `damage`.
///
/// Returns `None` outside the splash radius; inside it the damage is at least 1.
#[must_use]
pub fn area_damage(tuning: &CombatTuning, damage: f32, tier: u8, distance: f32) -> Option<u32> {
    let radius = area_radius(tuning, tier);
    if distance >= radius {
        return None;
    }
    let multiplier =
        tuning.area_multiplier_base + tuning.area_multiplier_per_tier * f32::from(tier);
    let falloff = 1.0 - distance / radius;
    Some(floor_at_least_one(damage * multiplier * falloff))
}

/// Radius of the splash around a lightning strike at `tier`.
#[must_use]
pub fn lightning_area_radius(tuning: &LightningTuning, tier: u8) -> f32 {
    tuning.area_radius_base + tuning.area_radius_per_tier * f32::from(tier)
}

/// Splash damage dealt `distance` away from a lightning strike of `damage`.
///
/// The falloff never drops below the configured minimum ratio.
#[must_use]
pub fn lightning_area_damage(
    tuning: &LightningTuning,
    damage: f32,
    tier: u8,
    distance: f32,
) -> Option<u32> {
    let radius = lightning_area_radius(tuning, tier);
    if distance >= radius {
        return None;
    }
    let multiplier =
        tuning.area_multiplier_base + tuning.area_multiplier_per_tier * f32::from(tier);
    let falloff = (1.0 - distance / radius).max(tuning.area_min_ratio);
    Some(floor_at_least_one(damage * multiplier * falloff))
}

/// Damage of a single lightning strike paid for with `bet` coins.
#[must_use]
pub fn lightning_damage(tuning: &LightningTuning, bet: u64) -> u32 {
    floor_at_least_one(bet as f32 * tuning.damage_ratio)
}

/// Probability that a kill at `tier` starts a chain reaction.
#[must_use]
pub fn chain_chance(tuning: &CombatTuning, tier: u8) -> f32 {
    (tuning.chain_chance_base + tuning.chain_chance_per_tier * f32::from(tier))
        .min(tuning.chain_chance_cap)
}

fn floor_at_least_one(value: f32) -> u32 {
    (value.floor() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_damage_matches_formula_inside_radius() {
        let tuning = CombatTuning::default();
        assert_eq!(area_radius(&tuning, 2), 130.0);
        // 10 * (0.7 + 0.3) * (1 - 65/130) = 5
        assert_eq!(area_damage(&tuning, 10.0, 2, 65.0), Some(5));
        assert_eq!(area_damage(&tuning, 1.0, 0, 0.0), Some(1));
    }

    #[test]
    fn area_damage_is_strict_at_the_radius() {
        let tuning = CombatTuning::default();
        assert_eq!(area_damage(&tuning, 100.0, 0, 80.0), None);
        assert_eq!(area_damage(&tuning, 100.0, 0, 200.0), None);
        assert_eq!(area_damage(&tuning, 100.0, 0, 79.99), Some(1));
    }

    #[test]
    fn lightning_area_keeps_a_minimum_falloff() {
        let tuning = LightningTuning::default();
        assert_eq!(lightning_area_radius(&tuning, 1), 150.0);
        // 10 * 1.0 * max(0.3, 1 - 140/150) = 3
        assert_eq!(lightning_area_damage(&tuning, 10.0, 1, 140.0), Some(3));
        assert_eq!(lightning_area_damage(&tuning, 10.0, 1, 150.0), None);
    }

    #[test]
    fn lightning_damage_is_half_the_bet() {
        let tuning = LightningTuning::default();
        assert_eq!(lightning_damage(&tuning, 1), 1);
        assert_eq!(lightning_damage(&tuning, 2), 1);
        assert_eq!(lightning_damage(&tuning, 5), 2);
        assert_eq!(lightning_damage(&tuning, 50), 25);
    }

    #[test]
    fn chain_chance_is_capped() {
        let tuning = CombatTuning::default();
        assert!((chain_chance(&tuning, 0) - 0.2).abs() < 1e-6);
        assert!((chain_chance(&tuning, 2) - 0.5).abs() < 1e-6);
        assert!((chain_chance(&tuning, 4) - 0.7).abs() < 1e-6);
        assert!((chain_chance(&tuning, 9) - 0.7).abs() < 1e-6);
    }
}
