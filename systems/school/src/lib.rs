#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Target manager owning every fish, formation, spawn timer and the
//! difficulty ramp.

mod fish;
mod formation;

use std::f32::consts::TAU;

use fish_hunt_core::{
    config::{GameConfig, Playfield, SpawnTuning, SpeciesSpec},
    Event, FishId, FishSnapshot, FormationShape, GroupId, Point, SchoolStats, Species, Velocity,
};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub use fish::{Damage, Fish, MovementPattern};
use formation::{offsets, Formation, SLOT_TOLERANCE};

const STARTING_DIFFICULTY: u32 = 1;
const MIN_COIN_BASE: u64 = 3;
const BOSS_COIN_FACTOR: f32 = 4.0;
const DIFFICULTY_COIN_STEP: f32 = 0.25;
const CONSOLATION_DIVISOR: u64 = 10;
const BOSS_SPECIES: [Species; 2] = [Species::Shark, Species::Whale];

/// Result of damaging a fish through the school.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// The fish is missing or already dead; nothing happened.
    Ignored,
    /// The fish ignored the hit during its grace period.
    Deflected,
    /// The fish survived and pays a consolation score.
    Wounded {
        /// Score awarded for the hit.
        score: u64,
    },
    /// The fish died.
    Killed {
        /// Score awarded for the kill.
        score: u64,
        /// Coins awarded for the kill.
        coins: u64,
    },
}

impl HitOutcome {
    /// Whether the hit killed the fish.
    #[must_use]
    pub fn killed(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }

    /// Score awarded by the hit.
    #[must_use]
    pub fn score(&self) -> u64 {
        match self {
            Self::Wounded { score } | Self::Killed { score, .. } => *score,
            Self::Ignored | Self::Deflected => 0,
        }
    }

    /// Coins awarded by the hit.
    #[must_use]
    pub fn coins(&self) -> u64 {
        match self {
            Self::Killed { coins, .. } => *coins,
            _ => 0,
        }
    }
}

/// Living fish near a point, as returned by [`School::alive_within`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearby {
    /// Identifier of the fish.
    pub id: FishId,
    /// Position of the fish.
    pub position: Point,
    /// Distance from the query point.
    pub distance: f32,
}

/// Authoritative collection of fish and formations.
#[derive(Debug)]
pub struct School {
    playfield: Playfield,
    species: Vec<SpeciesSpec>,
    tuning: SpawnTuning,
    rng: ChaCha8Rng,
    fishes: Vec<Fish>,
    formations: Vec<Formation>,
    next_fish: u32,
    next_group: u32,
    boss: Option<FishId>,
    difficulty: u32,
    single_interval: u32,
    formation_interval: u32,
    boss_interval: u32,
    population_cap: u32,
    single_timer: u32,
    formation_timer: u32,
    boss_timer: u32,
    difficulty_timer: u32,
    spawned: u64,
    killed: u64,
    kills_by_species: [u64; Species::COUNT],
}

impl School {
    /// Creates an empty school using the provided configuration and seed.
    #[must_use]
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let tuning = config.spawning.clone();
        Self {
            playfield: config.playfield,
            species: config.species.clone(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            fishes: Vec::new(),
            formations: Vec::new(),
            next_fish: 0,
            next_group: 0,
            boss: None,
            difficulty: STARTING_DIFFICULTY,
            single_interval: tuning.single_interval,
            formation_interval: tuning.formation_interval,
            boss_interval: tuning.boss_interval,
            population_cap: tuning.population_cap,
            single_timer: 0,
            formation_timer: 0,
            boss_timer: 0,
            difficulty_timer: 0,
            spawned: 0,
            killed: 0,
            kills_by_species: [0; Species::COUNT],
            tuning,
        }
    }

    /// Spawns the opening population of single fish and formations.
    pub fn populate(&mut self, out: &mut Vec<Event>) {
        for _ in 0..self.tuning.opening_singles {
            let _ = self.spawn_single(out);
        }
        for _ in 0..self.tuning.opening_formations {
            let _ = self.spawn_formation(out);
        }
    }

    /// Spawns one fish of a difficulty-weighted species on a random edge.
    pub fn spawn_single(&mut self, out: &mut Vec<Event>) -> FishId {
        let species = self.pick_species();
        let position = self.edge_position();
        self.insert(species, position, out)
    }

    /// Spawns a formation of 12 to 20 fish sharing one species and anchor.
    pub fn spawn_formation(&mut self, out: &mut Vec<Event>) -> GroupId {
        let shape = match self.rng.gen_range(0..3) {
            0 => FormationShape::Circle,
            1 => FormationShape::Line,
            _ => FormationShape::Vee,
        };
        let species = self.pick_species();
        let count = self
            .rng
            .gen_range(self.tuning.formation_size_min..=self.tuning.formation_size_max);
        let anchor = self.edge_position();
        let heading = self.rng.gen_range(0.0..TAU);

        let group = GroupId::new(self.next_group);
        self.next_group += 1;
        let mut formation = Formation::new(group, shape, anchor, heading);

        for offset in offsets(shape, count as usize) {
            let id = self.insert_with(species, formation.slot(offset), Some(group), out);
            formation.members.push((id, offset));
        }

        debug!(group = group.get(), ?shape, ?species, count, "formation spawned");
        out.push(Event::FormationSpawned {
            group,
            shape,
            members: count,
        });
        self.formations.push(formation);
        group
    }

    /// Spawns a shark or whale boss with doubled health.
    ///
    /// Returns `None` while another boss is alive.
    pub fn spawn_boss(&mut self, out: &mut Vec<Event>) -> Option<FishId> {
        if self.boss_alive() {
            return None;
        }

        let species = BOSS_SPECIES[self.rng.gen_range(0..BOSS_SPECIES.len())];
        let position = self.edge_position();
        let id = self.allocate_fish(species, position);
        if let Some(fish) = self.fishes.last_mut() {
            fish.promote_to_boss();
        }
        self.boss = Some(id);
        info!(fish = id.get(), ?species, "boss spawned");
        out.push(Event::FishSpawned {
            fish: id,
            species,
            boss: true,
            group: None,
        });
        Some(id)
    }

    /// Appends a fish of `species` at `position`.
    pub fn insert(&mut self, species: Species, position: Point, out: &mut Vec<Event>) -> FishId {
        self.insert_with(species, position, None, out)
    }

    fn insert_with(
        &mut self,
        species: Species,
        position: Point,
        group: Option<GroupId>,
        out: &mut Vec<Event>,
    ) -> FishId {
        let id = self.allocate_fish(species, position);
        if let (Some(group), Some(fish)) = (group, self.fishes.last_mut()) {
            fish.join_group(group);
        }
        out.push(Event::FishSpawned {
            fish: id,
            species,
            boss: false,
            group,
        });
        id
    }

    fn allocate_fish(&mut self, species: Species, position: Point) -> FishId {
        let id = FishId::new(self.next_fish);
        self.next_fish += 1;
        let fish = Fish::spawn(
            id,
            species,
            &self.species[species.index()],
            position,
            &mut self.rng,
        );
        self.fishes.push(fish);
        self.spawned += 1;
        id
    }

    /// Raises the difficulty by one level and tightens the spawn cadence.
    pub fn advance_difficulty(&mut self, out: &mut Vec<Event>) {
        let tuning = &self.tuning;
        self.difficulty += 1;
        self.single_interval = shrink(
            self.single_interval,
            tuning.single_interval_step,
            tuning.single_interval_floor,
        );
        self.formation_interval = shrink(
            self.formation_interval,
            tuning.formation_interval_step,
            tuning.formation_interval_floor,
        );
        self.boss_interval = shrink(
            self.boss_interval,
            tuning.boss_interval_step,
            tuning.boss_interval_floor,
        );
        if self.population_cap < tuning.population_ceiling {
            self.population_cap = self
                .population_cap
                .saturating_add(tuning.population_step)
                .min(tuning.population_ceiling);
        }

        info!(
            level = self.difficulty,
            single_interval = self.single_interval,
            formation_interval = self.formation_interval,
            boss_interval = self.boss_interval,
            population_cap = self.population_cap,
            "difficulty increased"
        );
        out.push(Event::DifficultyIncreased {
            level: self.difficulty,
        });
    }

    /// Advances every fish and formation by one frame, then spawns.
    pub fn tick(&mut self, out: &mut Vec<Event>) {
        let mut escorts = Vec::new();
        for fish in &mut self.fishes {
            if let Some(points) = fish.tick(&self.playfield, &mut self.rng) {
                debug!(fish = fish.id().get(), "whale called escorts");
                escorts.extend(points);
            }
        }
        for point in escorts {
            let _ = self.insert(Species::Small, point, out);
        }

        self.steer_formations();
        self.remove_dead();
        self.run_spawn_timers(out);

        self.difficulty_timer = self.difficulty_timer.saturating_add(1);
        if self.difficulty_timer >= self.tuning.difficulty_interval {
            self.difficulty_timer = 0;
            self.advance_difficulty(out);
        }
    }

    fn steer_formations(&mut self) {
        for formation in &mut self.formations {
            formation.advance();
            for &(id, offset) in &formation.members {
                let Some(fish) = self
                    .fishes
                    .iter_mut()
                    .find(|fish| fish.id() == id && !fish.is_dead())
                else {
                    continue;
                };
                let slot = formation.slot(offset);
                let gap = fish.position().distance_to(slot);
                if gap > SLOT_TOLERANCE {
                    let heading = fish.position().angle_to(slot);
                    let speed = fish.speed();
                    fish.steer(Velocity::from_polar(heading, speed));
                }
            }
        }

        let fishes = &self.fishes;
        self.formations.retain(|formation| {
            let alive = formation.members.iter().any(|(id, _)| {
                fishes
                    .iter()
                    .any(|fish| fish.id() == *id && !fish.is_dead())
            });
            if !alive {
                debug!(
                    group = formation.id.get(),
                    shape = ?formation.shape,
                    "formation dissolved"
                );
            }
            alive
        });
    }

    fn remove_dead(&mut self) {
        let before = self.fishes.len();
        for fish in self.fishes.iter().filter(|fish| fish.is_dead()) {
            self.kills_by_species[fish.species().index()] += 1;
        }
        self.fishes.retain(|fish| !fish.is_dead());
        self.killed += (before - self.fishes.len()) as u64;

        if !self.boss_alive() {
            self.boss = None;
        }
    }

    fn run_spawn_timers(&mut self, out: &mut Vec<Event>) {
        self.single_timer = self.single_timer.saturating_add(1);
        if self.single_timer >= self.single_interval
            && self.fishes.len() < self.population_cap as usize
        {
            self.single_timer = 0;
            let _ = self.spawn_single(out);
        }

        self.formation_timer = self.formation_timer.saturating_add(1);
        if self.formation_timer >= self.formation_interval {
            self.formation_timer = 0;
            let _ = self.spawn_formation(out);
        }

        self.boss_timer = self.boss_timer.saturating_add(1);
        if self.boss_timer >= self.boss_interval && self.spawn_boss(out).is_some() {
            self.boss_timer = 0;
        }
    }

    /// Applies damage to a fish and prices the result.
    pub fn damage(&mut self, id: FishId, amount: f32) -> HitOutcome {
        let difficulty = self.difficulty;
        let Some(fish) = self.fishes.iter_mut().find(|fish| fish.id() == id) else {
            return HitOutcome::Ignored;
        };

        match fish.take_damage(amount) {
            Damage::Ignored => HitOutcome::Ignored,
            Damage::Deflected => HitOutcome::Deflected,
            Damage::Wounded => HitOutcome::Wounded {
                score: fish.score() / CONSOLATION_DIVISOR,
            },
            Damage::Killed => {
                debug!(fish = id.get(), species = ?fish.species(), "fish killed");
                HitOutcome::Killed {
                    score: fish.score(),
                    coins: coin_reward(fish, difficulty),
                }
            }
        }
    }

    /// Stops a fish in place and switches it to the linear pattern.
    ///
    /// Returns `false` when no such fish exists.
    pub fn hold(&mut self, id: FishId) -> bool {
        match self.fishes.iter_mut().find(|fish| fish.id() == id) {
            Some(fish) => {
                fish.hold();
                true
            }
            None => false,
        }
    }

    /// Removes every fish and formation and restarts all counters.
    pub fn clear(&mut self) {
        self.fishes.clear();
        self.formations.clear();
        self.boss = None;
        self.difficulty = STARTING_DIFFICULTY;
        self.single_interval = self.tuning.single_interval;
        self.formation_interval = self.tuning.formation_interval;
        self.boss_interval = self.tuning.boss_interval;
        self.population_cap = self.tuning.population_cap;
        self.single_timer = 0;
        self.formation_timer = 0;
        self.boss_timer = 0;
        self.difficulty_timer = 0;
        self.spawned = 0;
        self.killed = 0;
        self.kills_by_species = [0; Species::COUNT];
    }

    /// Looks up a fish, alive or dead, that has not been removed yet.
    #[must_use]
    pub fn fish(&self, id: FishId) -> Option<&Fish> {
        self.fishes.iter().find(|fish| fish.id() == id)
    }

    /// Looks up a living fish.
    #[must_use]
    pub fn alive(&self, id: FishId) -> Option<&Fish> {
        self.fish(id).filter(|fish| !fish.is_dead())
    }

    /// Position of a living fish.
    #[must_use]
    pub fn alive_position(&self, id: FishId) -> Option<Point> {
        self.alive(id).map(Fish::position)
    }

    /// Position and velocity of a living fish.
    #[must_use]
    pub fn alive_motion(&self, id: FishId) -> Option<(Point, Velocity)> {
        self.alive(id).map(|fish| (fish.position(), fish.velocity()))
    }

    /// Iterates over every living fish.
    pub fn iter_alive(&self) -> impl Iterator<Item = &Fish> {
        self.fishes.iter().filter(|fish| !fish.is_dead())
    }

    /// Nearest living fish strictly closer than `max_radius` to `point`.
    #[must_use]
    pub fn nearest_alive(&self, point: Point, max_radius: f32) -> Option<&Fish> {
        let mut best: Option<(&Fish, f32)> = None;
        for fish in self.iter_alive() {
            let distance = fish.position().distance_to(point);
            if distance >= max_radius {
                continue;
            }
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((fish, distance));
            }
        }
        best.map(|(fish, _)| fish)
    }

    /// Living fish within `radius` of `point`, nearest first.
    #[must_use]
    pub fn alive_within(&self, point: Point, radius: f32) -> Vec<Nearby> {
        let mut nearby: Vec<Nearby> = self
            .iter_alive()
            .filter_map(|fish| {
                let distance = fish.position().distance_to(point);
                (distance <= radius).then_some(Nearby {
                    id: fish.id(),
                    position: fish.position(),
                    distance,
                })
            })
            .collect();
        nearby.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        nearby
    }

    /// Living fish with the highest score, lowest identifier first on ties.
    #[must_use]
    pub fn highest_value_alive(&self) -> Option<FishId> {
        self.iter_alive()
            .max_by(|a, b| a.score().cmp(&b.score()).then(b.id().cmp(&a.id())))
            .map(Fish::id)
    }

    /// Number of fish that have not been removed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fishes.len()
    }

    /// Whether the school holds no fish.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fishes.is_empty()
    }

    /// Number of formations still swimming.
    #[must_use]
    pub fn formation_count(&self) -> usize {
        self.formations.len()
    }

    /// Current difficulty level.
    #[must_use]
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Current cap on single spawns.
    #[must_use]
    pub fn population_cap(&self) -> u32 {
        self.population_cap
    }

    /// Current single, formation and boss spawn intervals, in frames.
    #[must_use]
    pub fn spawn_intervals(&self) -> (u32, u32, u32) {
        (
            self.single_interval,
            self.formation_interval,
            self.boss_interval,
        )
    }

    /// Whether a boss is alive.
    #[must_use]
    pub fn boss_alive(&self) -> bool {
        self.boss.and_then(|id| self.alive(id)).is_some()
    }

    /// Aggregate population statistics.
    #[must_use]
    pub fn stats(&self) -> SchoolStats {
        SchoolStats {
            spawned: self.spawned,
            killed: self.killed,
            kills_by_species: self.kills_by_species,
            alive: self.iter_alive().count(),
            difficulty: self.difficulty,
            boss_alive: self.boss_alive(),
        }
    }

    /// Snapshots of every living fish ordered by identifier.
    #[must_use]
    pub fn snapshots(&self) -> Vec<FishSnapshot> {
        let mut snapshots: Vec<FishSnapshot> = self.iter_alive().map(Fish::snapshot).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    fn pick_species(&mut self) -> Species {
        match WeightedIndex::new(species_weights(self.difficulty)) {
            Ok(distribution) => {
                Species::from_index(distribution.sample(&mut self.rng)).unwrap_or(Species::Small)
            }
            Err(error) => {
                debug!(%error, difficulty = self.difficulty, "species weights unusable");
                Species::Small
            }
        }
    }

    fn edge_position(&mut self) -> Point {
        let Playfield {
            width,
            height,
            margin,
        } = self.playfield;
        match self.rng.gen_range(0..4) {
            0 => Point::new(self.rng.gen_range(0.0..width), -margin),
            1 => Point::new(width + margin, self.rng.gen_range(0.0..height)),
            2 => Point::new(self.rng.gen_range(0.0..width), height + margin),
            _ => Point::new(-margin, self.rng.gen_range(0.0..height)),
        }
    }
}

/// Species selection weights at the provided difficulty, clamped at zero.
#[must_use]
pub fn species_weights(difficulty: u32) -> [f32; Species::COUNT] {
    let d = difficulty as f32;
    [
        40.0 - d * 2.0,
        30.0 - d,
        20.0 + d,
        7.0 + d,
        2.0 + d * 0.5,
        1.0 + d * 0.3,
    ]
    .map(|weight| weight.max(0.0))
}

/// Coins paid for killing `fish` at the provided difficulty.
#[must_use]
pub fn coin_reward(fish: &Fish, difficulty: u32) -> u64 {
    let base = (fish.score() / 3).max(MIN_COIN_BASE) as f32;
    let mut coins = (base * fish.coin_multiplier()).floor();
    if fish.is_boss() {
        coins *= BOSS_COIN_FACTOR;
    }
    let ramp = 1.0 + DIFFICULTY_COIN_STEP * difficulty.saturating_sub(1) as f32;
    (coins * ramp).floor() as u64
}

fn shrink(interval: u32, step: u32, floor: u32) -> u32 {
    if interval <= floor {
        interval
    } else {
        interval.saturating_sub(step).max(floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_never_raises_an_interval() {
        assert_eq!(shrink(40, 10, 20), 30);
        assert_eq!(shrink(25, 10, 20), 20);
        assert_eq!(shrink(15, 10, 20), 15);
    }

    #[test]
    fn weights_stay_non_negative_at_extreme_difficulty() {
        let weights = species_weights(100);
        assert!(weights.iter().all(|weight| *weight >= 0.0));
        assert_eq!(weights[0], 0.0);
        assert_eq!(weights[1], 0.0);
        assert!(weights[5] > 0.0);
    }

    #[test]
    fn hard_sessions_never_pick_exhausted_species() {
        let mut school = School::new(&GameConfig::default(), 5);
        school.difficulty = 100;
        for _ in 0..500 {
            let species = school.pick_species();
            assert!(!matches!(species, Species::Small | Species::Medium));
        }
    }

    #[test]
    fn weights_shift_toward_valuable_species() {
        let easy = species_weights(1);
        let hard = species_weights(10);
        assert!(hard[0] < easy[0]);
        assert!(hard[5] > easy[5]);
    }
}
