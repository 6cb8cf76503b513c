#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile physics: flight, homing, splitting, penetration and explosions.

use std::{collections::VecDeque, f32::consts::FRAC_PI_4};

use fish_hunt_core::{
    config::Playfield,
    math::{angle_between, circles_overlap, distance, ease_in_out, wrap_angle},
    FishId, Point, ProjectileId, ProjectileSnapshot, Rgb, Velocity,
};

/// Frames a freshly fired projectile survives.
pub const LIFETIME: u32 = 300;

const BASE_SPEED: f32 = 8.0;
const BASE_RADIUS: f32 = 5.0;
const RADIUS_PER_TIER: f32 = 2.0;
const BASE_EXPLOSION_RADIUS: f32 = 30.0;
const EXPLOSION_RADIUS_PER_TIER: f32 = 10.0;
const EXPLOSION_FRAMES: u32 = 10;
const HOMING_STRENGTH: f32 = 0.02;
const HOMING_TIER: u8 = 2;
const PIERCING_TIER: u8 = 3;
const SPLIT_TIER: u8 = 4;
const CHAIN_TIER: u8 = 5;
const SPLIT_FAN: usize = 3;
const SPLIT_RADIUS_FACTOR: f32 = 0.8;
const SPLIT_LIFE_FACTOR: f32 = 0.6;
const EXPLOSION_DAMAGE_FACTOR: f32 = 0.7;
const TRAIL_LENGTH: usize = 10;

/// Parameters describing where and how a projectile leaves the barrel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    /// Point the projectile starts at.
    pub origin: Point,
    /// Heading in radians.
    pub angle: f32,
    /// Damage dealt by a direct hit.
    pub power: u32,
    /// Tier the projectile is fired at.
    pub tier: u8,
}

/// Child produced when a splittable projectile fans out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitChild {
    /// Launch parameters of the child.
    pub launch: Launch,
    /// Body radius of the child.
    pub radius: f32,
    /// Remaining lifetime of the child, in frames.
    pub life: u32,
}

/// A single projectile in flight or exploding.
#[derive(Clone, Debug)]
pub struct Projectile {
    id: ProjectileId,
    origin: Point,
    position: Point,
    velocity: Velocity,
    heading: f32,
    speed: f32,
    power: u32,
    tier: u8,
    color: Rgb,
    radius: f32,
    life: u32,
    max_life: u32,
    penetration: usize,
    hits: Vec<FishId>,
    exploded: bool,
    explosion_frames: u32,
    explosion_radius: f32,
    max_explosion_radius: f32,
    homing: bool,
    homing_target: Option<FishId>,
    splittable: bool,
    has_split: bool,
    chain_capable: bool,
    trail: VecDeque<Point>,
}

impl Projectile {
    /// Fires a projectile whose handling is derived from its tier.
    #[must_use]
    pub fn fire(id: ProjectileId, launch: Launch, color: Rgb) -> Self {
        let tier = launch.tier;
        let speed = BASE_SPEED + f32::from(tier);
        Self {
            id,
            origin: launch.origin,
            position: launch.origin,
            velocity: Velocity::from_polar(launch.angle, speed),
            heading: launch.angle,
            speed,
            power: launch.power,
            tier,
            color,
            radius: BASE_RADIUS + f32::from(tier) * RADIUS_PER_TIER,
            life: LIFETIME,
            max_life: LIFETIME,
            penetration: if tier >= PIERCING_TIER { 2 } else { 1 },
            hits: Vec::new(),
            exploded: false,
            explosion_frames: 0,
            explosion_radius: 0.0,
            max_explosion_radius: BASE_EXPLOSION_RADIUS
                + f32::from(tier) * EXPLOSION_RADIUS_PER_TIER,
            homing: tier >= HOMING_TIER,
            homing_target: None,
            splittable: tier >= SPLIT_TIER,
            has_split: false,
            chain_capable: tier >= CHAIN_TIER,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Creates a child from a split fan. Children never split again.
    #[must_use]
    pub fn from_split(id: ProjectileId, child: SplitChild, color: Rgb) -> Self {
        let mut projectile = Self::fire(id, child.launch, color);
        projectile.radius = child.radius;
        projectile.life = child.life;
        projectile.max_life = child.life;
        projectile.splittable = false;
        projectile
    }

    /// Identifier of the projectile.
    #[must_use]
    pub fn id(&self) -> ProjectileId {
        self.id
    }

    /// Point the projectile was fired from.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current heading in radians.
    #[must_use]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Distance travelled per frame.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Body radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Tier the projectile was fired at.
    #[must_use]
    pub fn tier(&self) -> u8 {
        self.tier
    }

    /// Remaining lifetime in frames.
    #[must_use]
    pub fn life(&self) -> u32 {
        self.life
    }

    /// Number of distinct fish the projectile may damage.
    #[must_use]
    pub fn penetration(&self) -> usize {
        self.penetration
    }

    /// Fish the projectile has damaged, in hit order.
    #[must_use]
    pub fn hits(&self) -> &[FishId] {
        &self.hits
    }

    /// Whether the projectile has entered its terminal explosion.
    #[must_use]
    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    /// Current radius of the explosion.
    #[must_use]
    pub fn explosion_radius(&self) -> f32 {
        self.explosion_radius
    }

    /// Whether the projectile steers toward an assigned target.
    #[must_use]
    pub fn is_homing(&self) -> bool {
        self.homing
    }

    /// Fish the projectile is steering toward.
    #[must_use]
    pub fn homing_target(&self) -> Option<FishId> {
        self.homing_target
    }

    /// Whether the projectile fans out past half of its lifetime.
    #[must_use]
    pub fn is_splittable(&self) -> bool {
        self.splittable
    }

    /// Whether kills by this projectile always start a chain reaction.
    #[must_use]
    pub fn is_chain_capable(&self) -> bool {
        self.chain_capable
    }

    /// Explosion animation progress in `[0, 1]`.
    #[must_use]
    pub fn explosion_progress(&self) -> f32 {
        self.explosion_frames as f32 / EXPLOSION_FRAMES as f32
    }

    /// Whether the explosion animation has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.exploded && self.explosion_frames >= EXPLOSION_FRAMES
    }

    /// Assigns a homing target. Returns `false` when the projectile cannot home.
    pub fn assign_homing_target(&mut self, target: FishId) -> bool {
        if !self.homing {
            return false;
        }
        self.homing_target = Some(target);
        true
    }

    /// Advances the projectile by one frame.
    ///
    /// `locate` resolves a fish identifier to the position of a living fish and
    /// returns `None` once the fish is gone; a homing target that no longer
    /// resolves is dropped. Returns the split fan on the frame the projectile
    /// splits.
    pub fn tick<F>(&mut self, playfield: &Playfield, locate: F) -> Option<[SplitChild; SPLIT_FAN]>
    where
        F: Fn(FishId) -> Option<Point>,
    {
        if self.exploded {
            self.explosion_frames = (self.explosion_frames + 1).min(EXPLOSION_FRAMES);
            self.explosion_radius =
                self.max_explosion_radius * ease_in_out(self.explosion_progress());
            return None;
        }

        if let Some(target) = self.homing_target {
            match locate(target) {
                Some(point) if self.homing => {
                    let desired = angle_between(self.position, point);
                    self.heading += wrap_angle(desired - self.heading) * HOMING_STRENGTH;
                    self.velocity = Velocity::from_polar(self.heading, self.speed);
                }
                _ => self.homing_target = None,
            }
        }

        self.position = self.position.translate(self.velocity);
        if self.trail.len() == TRAIL_LENGTH {
            let _ = self.trail.pop_front();
        }
        self.trail.push_back(self.position);

        self.life = self.life.saturating_sub(1);
        if self.life == 0 || !playfield.contains(self.position) {
            self.explode();
            return None;
        }

        self.split()
    }

    fn split(&mut self) -> Option<[SplitChild; SPLIT_FAN]> {
        if !self.splittable || self.has_split {
            return None;
        }
        if (self.life as f32) >= self.max_life as f32 * 0.5 {
            return None;
        }

        self.has_split = true;
        let power = self.power.saturating_sub(1).max(1);
        let tier = self.tier.saturating_sub(1);
        let radius = self.radius * SPLIT_RADIUS_FACTOR;
        let life = (self.life as f32 * SPLIT_LIFE_FACTOR).floor() as u32;
        let fan = [-1.0_f32, 0.0, 1.0].map(|offset| SplitChild {
            launch: Launch {
                origin: self.position,
                angle: self.heading + offset * FRAC_PI_4,
                power,
                tier,
            },
            radius,
            life,
        });
        Some(fan)
    }

    fn explode(&mut self) {
        if self.exploded {
            return;
        }
        self.exploded = true;
        self.explosion_frames = 0;
        self.explosion_radius = 0.0;
    }

    /// Tests whether the projectile touches a fish at `position` with `radius`.
    ///
    /// Exploding projectiles reach as far as their blast; projectiles in flight
    /// require the bodies to overlap.
    #[must_use]
    pub fn test_hit(&self, position: Point, radius: f32) -> bool {
        if self.exploded {
            distance(self.position, position) <= self.explosion_radius + radius
        } else {
            circles_overlap(self.position, self.radius, position, radius)
        }
    }

    /// Records a hit on `fish`.
    ///
    /// Returns `false` when the fish was already hit or the penetration budget
    /// is spent. Reaching the budget detonates the projectile immediately.
    pub fn register_hit(&mut self, fish: FishId) -> bool {
        if self.hits.contains(&fish) || self.hits.len() >= self.penetration {
            return false;
        }
        self.hits.push(fish);
        if !self.exploded && self.hits.len() >= self.penetration {
            self.explode();
        }
        true
    }

    /// Damage dealt by a direct hit.
    #[must_use]
    pub fn damage(&self) -> u32 {
        self.power
    }

    /// Damage dealt by the blast.
    #[must_use]
    pub fn explosion_damage(&self) -> u32 {
        ((self.power as f32 * EXPLOSION_DAMAGE_FACTOR).floor() as u32).max(1)
    }

    /// Captures a read-only description for presentation.
    #[must_use]
    pub fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            heading: self.heading,
            radius: if self.exploded {
                self.explosion_radius
            } else {
                self.radius
            },
            tier: self.tier,
            color: self.color,
            exploded: self.exploded,
            explosion_progress: self.explosion_progress(),
            trail: self.trail.iter().copied().collect(),
            homing_target: self.homing_target,
            chain_capable: self.chain_capable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(tier: u8) -> Launch {
        Launch {
            origin: Point::new(490.0, 300.0),
            angle: 0.0,
            power: u32::from(tier) + 1,
            tier,
        }
    }

    fn projectile(tier: u8) -> Projectile {
        Projectile::fire(ProjectileId::new(1), launch(tier), Rgb::from_rgb(0, 0, 0))
    }

    #[test]
    fn tier_zero_projectile_uses_base_handling() {
        let projectile = projectile(0);
        assert_eq!(projectile.speed(), 8.0);
        assert_eq!(projectile.radius(), 5.0);
        assert_eq!(projectile.penetration(), 1);
        assert_eq!(projectile.life(), LIFETIME);
        assert!(!projectile.is_homing());
        assert!(!projectile.is_splittable());
        assert!(!projectile.is_chain_capable());
    }

    #[test]
    fn tier_flags_unlock_progressively() {
        assert!(projectile(2).is_homing());
        assert_eq!(projectile(2).penetration(), 1);
        assert_eq!(projectile(3).penetration(), 2);
        assert!(projectile(4).is_splittable());
        assert!(projectile(5).is_chain_capable());
        assert_eq!(projectile(5).radius(), 15.0);
    }

    #[test]
    fn explosion_damage_has_floor_of_one() {
        assert_eq!(projectile(0).explosion_damage(), 1);
        assert_eq!(projectile(4).explosion_damage(), 3);
        assert_eq!(projectile(4).damage(), 5);
    }

    #[test]
    fn explosion_grows_then_finishes() {
        let field = Playfield::default();
        let mut projectile = projectile(0);
        assert!(projectile.register_hit(FishId::new(3)));
        assert!(projectile.is_exploded());

        let mut previous = projectile.explosion_radius();
        for _ in 0..9 {
            let _ = projectile.tick(&field, |_| None);
            assert!(projectile.explosion_radius() >= previous);
            previous = projectile.explosion_radius();
            assert!(!projectile.is_finished());
        }
        let _ = projectile.tick(&field, |_| None);
        assert!(projectile.is_finished());
        assert!((projectile.explosion_radius() - 30.0).abs() < 1e-4);
    }
}
