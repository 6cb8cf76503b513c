//! Short-lived presentation effects owned by the world.

use std::f32::consts::TAU;

use fish_hunt_core::{EffectKind, EffectSnapshot, Point, Rgb, Species, Velocity};
use rand::Rng;

const EFFECT_CAP: usize = 50;
const EFFECT_TRIM: usize = 25;

const PULSE_FRAMES: u32 = 20;
const FLOATING_FRAMES: u32 = 50;
const FLOATING_RISE: f32 = 1.0;
const SPARK_FRAMES: u32 = 20;
const SPARK_RADIUS: f32 = 6.0;
const ARC_FRAMES: u32 = 15;
const SINK_FRAMES: u32 = 20;
const SINK_DRIFT: f32 = 1.0;
const BURST_FRAMES: u32 = 50;
const BURST_PARTICLES: usize = 8;
const PARTICLE_RADIUS: f32 = 3.0;
const PARTICLE_GRAVITY: f32 = 0.1;

const FLOATING_COLOR: Rgb = Rgb::from_rgb(0xff, 0xff, 0xff);
const SPARK_COLOR: Rgb = Rgb::from_rgb(0xff, 0xd7, 0x00);
const ARC_COLOR: Rgb = Rgb::from_rgb(0x87, 0xce, 0xfa);

#[derive(Clone, Copy, Debug)]
pub(crate) struct Clock {
    age: u32,
    life: u32,
}

impl Clock {
    fn new(life: u32) -> Self {
        Self {
            age: 0,
            life: life.max(1),
        }
    }

    fn advance(&mut self) {
        self.age = (self.age + 1).min(self.life);
    }

    fn progress(self) -> f32 {
        self.age as f32 / self.life as f32
    }

    fn alpha(self) -> f32 {
        1.0 - self.progress()
    }

    fn done(self) -> bool {
        self.age >= self.life
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Particle {
    position: Point,
    velocity: Velocity,
}

/// Transient visual spawned by the simulation.
#[derive(Clone, Debug)]
pub(crate) enum Effect {
    /// Ring expanding over a splash area.
    Pulse {
        center: Point,
        max_radius: f32,
        color: Rgb,
        clock: Clock,
    },
    /// Rising number.
    Floating {
        position: Point,
        value: u64,
        clock: Clock,
    },
    /// Flash on a chain hop.
    Spark { position: Point, clock: Clock },
    /// Bolt from the cannon to a struck fish.
    Arc { from: Point, to: Point, clock: Clock },
    /// Visual copy of a fish playing its death animation after removal.
    Sink {
        position: Point,
        species: Species,
        radius: f32,
        color: Rgb,
        clock: Clock,
    },
    /// Particles thrown out by a kill, falling under gravity.
    Burst {
        particles: Vec<Particle>,
        color: Rgb,
        clock: Clock,
    },
}

impl Effect {
    pub(crate) fn pulse(center: Point, max_radius: f32, color: Rgb) -> Self {
        Self::Pulse {
            center,
            max_radius,
            color,
            clock: Clock::new(PULSE_FRAMES),
        }
    }

    pub(crate) fn floating(position: Point, value: u64) -> Self {
        Self::Floating {
            position,
            value,
            clock: Clock::new(FLOATING_FRAMES),
        }
    }

    pub(crate) fn spark(position: Point) -> Self {
        Self::Spark {
            position,
            clock: Clock::new(SPARK_FRAMES),
        }
    }

    pub(crate) fn arc(from: Point, to: Point) -> Self {
        Self::Arc {
            from,
            to,
            clock: Clock::new(ARC_FRAMES),
        }
    }

    pub(crate) fn sink(position: Point, species: Species, radius: f32, color: Rgb) -> Self {
        Self::Sink {
            position,
            species,
            radius,
            color,
            clock: Clock::new(SINK_FRAMES),
        }
    }

    pub(crate) fn burst<R: Rng>(position: Point, color: Rgb, rng: &mut R) -> Self {
        let particles = (0..BURST_PARTICLES)
            .map(|_| Particle {
                position,
                velocity: Velocity::from_polar(rng.gen_range(0.0..TAU), rng.gen_range(1.0..3.0)),
            })
            .collect();
        Self::Burst {
            particles,
            color,
            clock: Clock::new(BURST_FRAMES),
        }
    }

    fn clock(&self) -> Clock {
        match self {
            Self::Pulse { clock, .. }
            | Self::Floating { clock, .. }
            | Self::Spark { clock, .. }
            | Self::Arc { clock, .. }
            | Self::Sink { clock, .. }
            | Self::Burst { clock, .. } => *clock,
        }
    }

    /// Advances the effect by one frame.
    pub(crate) fn update(&mut self) {
        match self {
            Self::Pulse { clock, .. } | Self::Spark { clock, .. } | Self::Arc { clock, .. } => {
                clock.advance();
            }
            Self::Floating {
                position, clock, ..
            } => {
                position.y -= FLOATING_RISE;
                clock.advance();
            }
            Self::Sink {
                position, clock, ..
            } => {
                position.y += SINK_DRIFT;
                clock.advance();
            }
            Self::Burst {
                particles, clock, ..
            } => {
                for particle in particles.iter_mut() {
                    particle.velocity.dy += PARTICLE_GRAVITY;
                    particle.position = particle.position.translate(particle.velocity);
                }
                clock.advance();
            }
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.clock().done()
    }

    fn snapshot_into(&self, out: &mut Vec<EffectSnapshot>) {
        let clock = self.clock();
        let alpha = clock.alpha();
        match self {
            Self::Pulse {
                center,
                max_radius,
                color,
                ..
            } => out.push(EffectSnapshot {
                kind: EffectKind::Pulse,
                position: *center,
                radius: max_radius * clock.progress(),
                alpha,
                color: *color,
            }),
            Self::Floating {
                position, value, ..
            } => out.push(EffectSnapshot {
                kind: EffectKind::Floating { value: *value },
                position: *position,
                radius: 0.0,
                alpha,
                color: FLOATING_COLOR,
            }),
            Self::Spark { position, .. } => out.push(EffectSnapshot {
                kind: EffectKind::Spark,
                position: *position,
                radius: SPARK_RADIUS * alpha,
                alpha,
                color: SPARK_COLOR,
            }),
            Self::Arc { from, to, .. } => out.push(EffectSnapshot {
                kind: EffectKind::Arc { to: *to },
                position: *from,
                radius: 0.0,
                alpha,
                color: ARC_COLOR,
            }),
            Self::Sink {
                position,
                species,
                radius,
                color,
                ..
            } => out.push(EffectSnapshot {
                kind: EffectKind::Sink { species: *species },
                position: *position,
                radius: *radius,
                alpha,
                color: *color,
            }),
            Self::Burst {
                particles, color, ..
            } => out.extend(particles.iter().map(|particle| EffectSnapshot {
                kind: EffectKind::Particle,
                position: particle.position,
                radius: PARTICLE_RADIUS,
                alpha,
                color: *color,
            })),
        }
    }
}

/// Bounded list of live effects, oldest first.
#[derive(Clone, Debug, Default)]
pub(crate) struct Effects {
    list: Vec<Effect>,
}

impl Effects {
    pub(crate) fn push(&mut self, effect: Effect) {
        self.list.push(effect);
        if self.list.len() > EFFECT_CAP {
            let excess = self.list.len() - EFFECT_TRIM;
            let _ = self.list.drain(..excess);
        }
    }

    pub(crate) fn update(&mut self) {
        for effect in &mut self.list {
            effect.update();
        }
        self.list.retain(|effect| !effect.is_finished());
    }

    pub(crate) fn snapshots(&self) -> Vec<EffectSnapshot> {
        let mut out = Vec::with_capacity(self.list.len());
        for effect in &self.list {
            effect.snapshot_into(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn list_is_trimmed_to_the_newest_entries() {
        let mut effects = Effects::default();
        for value in 0..51 {
            effects.push(Effect::floating(Point::new(0.0, 0.0), value));
        }
        assert_eq!(effects.snapshots().len(), EFFECT_TRIM);
        let values: Vec<u64> = effects
            .snapshots()
            .into_iter()
            .filter_map(|snapshot| match snapshot.kind {
                EffectKind::Floating { value } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(values.first(), Some(&26));
        assert_eq!(values.last(), Some(&50));
    }

    #[test]
    fn floating_numbers_rise_and_fade_out() {
        let mut effects = Effects::default();
        effects.push(Effect::floating(Point::new(10.0, 100.0), 5));
        effects.update();
        let snapshot = &effects.snapshots()[0];
        assert_eq!(snapshot.position, Point::new(10.0, 99.0));
        assert!((snapshot.alpha - 0.98).abs() < 1e-6);

        for _ in 1..FLOATING_FRAMES {
            effects.update();
        }
        assert!(effects.snapshots().is_empty());
    }

    #[test]
    fn burst_particles_fall() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut burst = Effect::burst(Point::new(0.0, 0.0), SPARK_COLOR, &mut rng);
        let mut before = Vec::new();
        burst.snapshot_into(&mut before);
        assert_eq!(before.len(), BURST_PARTICLES);

        for _ in 0..60 {
            burst.update();
        }
        let mut after = Vec::new();
        burst.snapshot_into(&mut after);
        let mean_y: f32 = after.iter().map(|particle| particle.position.y).sum::<f32>()
            / after.len() as f32;
        assert!(mean_y > 0.0);
        assert!(burst.is_finished());
    }

    #[test]
    fn sink_plays_out_after_removal() {
        let mut sink = Effect::sink(Point::new(0.0, 0.0), Species::Gold, 35.0, SPARK_COLOR);
        for _ in 0..SINK_FRAMES - 1 {
            sink.update();
        }
        assert!(!sink.is_finished());
        sink.update();
        assert!(sink.is_finished());
    }
}
