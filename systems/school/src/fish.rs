use std::f32::consts::TAU;

use fish_hunt_core::{
    config::{Playfield, SpeciesSpec},
    FishId, FishSnapshot, GroupId, Point, Rgb, Species, Velocity,
};
use rand::Rng;

const FRAME_SECONDS: f32 = 0.016;
const INVULNERABLE_FRAMES: u32 = 5;
const DEATH_STEP: f32 = 0.05;
const DEATH_SINK: f32 = 1.0;
const DRIFT_CHANCE: f32 = 0.001;
const DRIFT_JITTER: f32 = 0.2;
const WAVE_STRIDE: f32 = 50.0;
const WAVE_AMPLITUDE: f32 = 100.0;
const WAVE_PULL: f32 = 0.02;
const ORBIT_PULL: f32 = 0.05;
const STRAY_FRAMES: u32 = 60;
const SHARK_BURST_CHANCE: f32 = 0.005;
const SHARK_BURST_FRAMES: u32 = 60;
const WHALE_ESCORT_CHANCE: f32 = 0.001;
const WHALE_ESCORTS: usize = 3;
const ESCORT_GAP: f32 = 30.0;

/// Path a fish follows while swimming on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementPattern {
    /// Straight line with rare random drift.
    Linear,
    /// Rightward wave around the spawn point.
    Sinusoidal,
    /// Circle around the spawn point.
    Orbital,
}

/// Result of applying damage to a single fish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Damage {
    /// The fish was already dead.
    Ignored,
    /// The fish was inside its post-hit grace period.
    Deflected,
    /// The fish survived the hit.
    Wounded,
    /// The hit killed the fish.
    Killed,
}

/// A single fish swimming in the playfield.
#[derive(Clone, Debug)]
pub struct Fish {
    id: FishId,
    species: Species,
    position: Point,
    velocity: Velocity,
    base_speed: f32,
    speed: f32,
    radius: f32,
    score: u64,
    coin_multiplier: f32,
    color: Rgb,
    health: f32,
    max_health: f32,
    boss: bool,
    group: Option<GroupId>,
    invulnerable_frames: u32,
    pattern: MovementPattern,
    home: Point,
    clock: f32,
    orbit_radius: f32,
    orbit_speed: f32,
    stray_frames: u32,
    burst_frames: u32,
    held: bool,
    dead: bool,
    death_progress: f32,
}

impl Fish {
    /// Creates a fish of the provided species with a random heading and pattern.
    pub fn spawn<R: Rng>(
        id: FishId,
        species: Species,
        spec: &SpeciesSpec,
        position: Point,
        rng: &mut R,
    ) -> Self {
        let speed = spec.speed;
        let velocity = Velocity::new(
            rng.gen_range(-speed..=speed),
            rng.gen_range(-speed..=speed),
        );
        let pattern = match rng.gen_range(0..3) {
            0 => MovementPattern::Linear,
            1 => MovementPattern::Sinusoidal,
            _ => MovementPattern::Orbital,
        };
        let max_health = spec.max_health();
        Self {
            id,
            species,
            position,
            velocity,
            base_speed: speed,
            speed,
            radius: spec.radius,
            score: spec.score,
            coin_multiplier: spec.coin_multiplier,
            color: spec.color,
            health: max_health,
            max_health,
            boss: false,
            group: None,
            invulnerable_frames: 0,
            pattern,
            home: position,
            clock: 0.0,
            orbit_radius: rng.gen_range(50.0..100.0),
            orbit_speed: rng.gen_range(0.01..0.03),
            stray_frames: 0,
            burst_frames: 0,
            held: false,
            dead: false,
            death_progress: 0.0,
        }
    }

    pub(crate) fn promote_to_boss(&mut self) {
        self.boss = true;
        self.max_health *= 2.0;
        self.health = self.max_health;
    }

    pub(crate) fn join_group(&mut self, group: GroupId) {
        self.group = Some(group);
        self.pattern = MovementPattern::Linear;
    }

    pub(crate) fn steer(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    pub(crate) fn hold(&mut self) {
        self.velocity = Velocity::ZERO;
        self.pattern = MovementPattern::Linear;
        self.held = true;
    }

    /// Identifier of the fish.
    #[must_use]
    pub fn id(&self) -> FishId {
        self.id
    }

    /// Species of the fish.
    #[must_use]
    pub fn species(&self) -> Species {
        self.species
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Displacement applied last frame.
    #[must_use]
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Current top speed, doubled while a shark bursts.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Collision radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Score awarded for a kill.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Multiplier applied to the base coin reward.
    #[must_use]
    pub fn coin_multiplier(&self) -> f32 {
        self.coin_multiplier
    }

    /// Remaining health.
    #[must_use]
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Health at spawn.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Body color from the species table.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Whether the fish is a boss.
    #[must_use]
    pub fn is_boss(&self) -> bool {
        self.boss
    }

    /// Formation the fish swims in.
    #[must_use]
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Active movement pattern.
    #[must_use]
    pub fn pattern(&self) -> MovementPattern {
        self.pattern
    }

    /// Whether the fish is inside its post-hit grace period.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_frames > 0
    }

    /// Whether the fish has died.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Death animation progress in `[0, 1]`.
    #[must_use]
    pub fn death_progress(&self) -> f32 {
        self.death_progress
    }

    /// Applies damage. Dead or invulnerable fish are left untouched.
    pub fn take_damage(&mut self, amount: f32) -> Damage {
        if self.dead {
            return Damage::Ignored;
        }
        if self.invulnerable_frames > 0 {
            return Damage::Deflected;
        }

        self.health -= amount.max(0.0);
        if self.health <= 0.0 {
            self.dead = true;
            return Damage::Killed;
        }
        self.invulnerable_frames = INVULNERABLE_FRAMES;
        Damage::Wounded
    }

    /// Advances the fish by one frame.
    ///
    /// Returns the positions of escorts a whale wants to spawn this frame.
    pub fn tick<R: Rng>(
        &mut self,
        playfield: &Playfield,
        rng: &mut R,
    ) -> Option<[Point; WHALE_ESCORTS]> {
        if self.dead {
            self.death_progress = (self.death_progress + DEATH_STEP).min(1.0);
            self.position.y += DEATH_SINK;
            return None;
        }

        self.invulnerable_frames = self.invulnerable_frames.saturating_sub(1);
        self.clock += FRAME_SECONDS;
        if self.held {
            return None;
        }
        self.swim(rng);

        if playfield.contains(self.position) {
            self.stray_frames = 0;
        } else {
            self.stray_frames += 1;
            if self.stray_frames > STRAY_FRAMES {
                let heading = self.position.angle_to(playfield.center());
                self.velocity = Velocity::from_polar(heading, self.speed);
            }
        }

        self.special_behaviour(rng)
    }

    fn swim<R: Rng>(&mut self, rng: &mut R) {
        let t = self.clock;
        match self.pattern {
            MovementPattern::Linear => {
                if rng.gen::<f32>() < DRIFT_CHANCE {
                    let limit = self.speed;
                    self.velocity.dx = (self.velocity.dx
                        + rng.gen_range(-DRIFT_JITTER..DRIFT_JITTER))
                    .clamp(-limit, limit);
                    self.velocity.dy = (self.velocity.dy
                        + rng.gen_range(-DRIFT_JITTER..DRIFT_JITTER))
                    .clamp(-limit, limit);
                }
            }
            MovementPattern::Sinusoidal => {
                let crest = Point::new(
                    self.home.x + t * self.speed * WAVE_STRIDE,
                    self.home.y + (t * 2.0).sin() * WAVE_AMPLITUDE,
                );
                self.velocity = Velocity::toward(self.position, crest, WAVE_PULL);
            }
            MovementPattern::Orbital => {
                let angle = t * self.orbit_speed;
                let slot = Point::new(
                    self.home.x + angle.cos() * self.orbit_radius,
                    self.home.y + angle.sin() * self.orbit_radius,
                );
                self.velocity = Velocity::toward(self.position, slot, ORBIT_PULL);
            }
        }
        self.position = self.position.translate(self.velocity);
    }

    fn special_behaviour<R: Rng>(&mut self, rng: &mut R) -> Option<[Point; WHALE_ESCORTS]> {
        match self.species {
            Species::Shark => {
                if self.burst_frames > 0 {
                    self.burst_frames -= 1;
                    if self.burst_frames == 0 {
                        self.speed = self.base_speed;
                    }
                } else if rng.gen::<f32>() < SHARK_BURST_CHANCE {
                    self.speed = self.base_speed * 2.0;
                    self.burst_frames = SHARK_BURST_FRAMES;
                }
                None
            }
            Species::Whale => {
                (rng.gen::<f32>() < WHALE_ESCORT_CHANCE).then(|| self.escort_positions())
            }
            _ => None,
        }
    }

    /// Points around the fish where escorts appear.
    #[must_use]
    pub fn escort_positions(&self) -> [Point; WHALE_ESCORTS] {
        let distance = self.radius + ESCORT_GAP;
        std::array::from_fn(|index| {
            let angle = TAU / WHALE_ESCORTS as f32 * index as f32;
            self.position.offset(angle, distance)
        })
    }

    /// Captures a read-only description of the fish.
    #[must_use]
    pub fn snapshot(&self) -> FishSnapshot {
        FishSnapshot {
            id: self.id,
            species: self.species,
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
            health: self.health,
            max_health: self.max_health,
            score: self.score,
            boss: self.boss,
            invulnerable: self.is_invulnerable(),
            group: self.group,
            color: self.color,
        }
    }
}
