use fish_hunt_core::{config::GameConfig, Event, FishId, Point, Species};
use fish_hunt_system_school::{coin_reward, HitOutcome, School};

fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.spawning.opening_singles = 0;
    config.spawning.opening_formations = 0;
    config.spawning.single_interval = u32::MAX;
    config.spawning.formation_interval = u32::MAX;
    config.spawning.boss_interval = u32::MAX;
    config.spawning.difficulty_interval = u32::MAX;
    config
}

fn quiet_school(seed: u64) -> School {
    School::new(&quiet_config(), seed)
}

fn tick(school: &mut School, frames: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..frames {
        school.tick(&mut events);
    }
    events
}

#[test]
fn small_fish_pays_nine_coins_on_third_hit() {
    let mut school = quiet_school(1);
    let mut events = Vec::new();
    let fish = school.insert(Species::Small, Point::new(400.0, 300.0), &mut events);
    assert_eq!(school.fish(fish).map(|fish| fish.max_health()), Some(12.0));

    assert_eq!(school.damage(fish, 5.0), HitOutcome::Wounded { score: 0 });
    let _ = tick(&mut school, 5);
    assert_eq!(school.damage(fish, 5.0), HitOutcome::Wounded { score: 0 });
    let _ = tick(&mut school, 5);
    assert_eq!(
        school.damage(fish, 5.0),
        HitOutcome::Killed { score: 2, coins: 9 }
    );
    assert_eq!(school.fish(fish).map(|fish| fish.health()), Some(-3.0));
}

#[test]
fn damage_on_dead_or_missing_fish_is_ignored() {
    let mut school = quiet_school(2);
    let mut events = Vec::new();
    let fish = school.insert(Species::Gold, Point::new(400.0, 300.0), &mut events);

    assert!(school.damage(fish, 1_000.0).killed());
    let health = school.fish(fish).map(|fish| fish.health());
    assert_eq!(school.damage(fish, 1_000.0), HitOutcome::Ignored);
    assert_eq!(school.fish(fish).map(|fish| fish.health()), health);
    assert!(!school.damage(fish, 1.0).killed());

    assert_eq!(school.damage(FishId::new(999), 5.0), HitOutcome::Ignored);
}

#[test]
fn grace_period_deflects_follow_up_hits() {
    let mut school = quiet_school(3);
    let mut events = Vec::new();
    let fish = school.insert(Species::Large, Point::new(400.0, 300.0), &mut events);

    assert_eq!(school.damage(fish, 1.0), HitOutcome::Wounded { score: 1 });
    assert_eq!(school.damage(fish, 1.0), HitOutcome::Deflected);
    assert_eq!(HitOutcome::Deflected.score(), 0);
}

#[test]
fn dead_fish_are_removed_on_the_next_tick() {
    let mut school = quiet_school(4);
    let mut events = Vec::new();
    let fish = school.insert(Species::Medium, Point::new(400.0, 300.0), &mut events);
    let _ = school.insert(Species::Small, Point::new(100.0, 100.0), &mut events);

    assert!(school.damage(fish, 100.0).killed());
    assert!(school.alive(fish).is_none());
    assert!(school.fish(fish).is_some());
    assert_eq!(school.stats().alive, 1);

    let _ = tick(&mut school, 1);
    assert!(school.fish(fish).is_none());
    let stats = school.stats();
    assert_eq!(stats.killed, 1);
    assert_eq!(stats.kills_by_species[Species::Medium.index()], 1);
    assert_eq!(stats.spawned, 2);
}

#[test]
fn only_one_boss_swims_at_a_time() {
    let mut school = quiet_school(5);
    let mut events = Vec::new();
    let boss = school.spawn_boss(&mut events).expect("first boss spawns");
    assert!(school.spawn_boss(&mut events).is_none());

    let fish = school.fish(boss).expect("boss exists");
    assert!(fish.is_boss());
    assert!(matches!(fish.species(), Species::Shark | Species::Whale));
    let normal = GameConfig::default()
        .species_spec(fish.species())
        .max_health();
    assert_eq!(fish.max_health(), normal * 2.0);
    assert!(school.stats().boss_alive);

    assert!(school.damage(boss, 10_000.0).killed());
    let _ = tick(&mut school, 1);
    assert!(!school.stats().boss_alive);
    assert!(school.spawn_boss(&mut events).is_some());
}

#[test]
fn boss_rewards_are_quadrupled_and_ramp_with_difficulty() {
    let mut school = quiet_school(6);
    let mut events = Vec::new();
    let boss = school.spawn_boss(&mut events).expect("boss spawns");
    let fish = school.fish(boss).expect("boss exists").clone();

    let plain = ((fish.score() / 3) as f32 * fish.coin_multiplier()).floor() as u64;
    assert_eq!(coin_reward(&fish, 1), plain * 4);
    assert_eq!(coin_reward(&fish, 3), (plain as f32 * 4.0 * 1.5).floor() as u64);
}

#[test]
fn difficulty_ramp_is_monotonic_and_clamped() {
    let mut school = quiet_school(7);
    let config = GameConfig::default();
    let mut school_default = School::new(&config, 7);
    let mut events = Vec::new();

    let (mut single, mut formation, mut boss) = school_default.spawn_intervals();
    let mut cap = school_default.population_cap();
    for level in 2..=80 {
        school_default.advance_difficulty(&mut events);
        let (next_single, next_formation, next_boss) = school_default.spawn_intervals();
        assert!(next_single <= single);
        assert!(next_formation <= formation);
        assert!(next_boss <= boss);
        assert!(school_default.population_cap() >= cap);
        assert_eq!(school_default.difficulty(), level);
        single = next_single;
        formation = next_formation;
        boss = next_boss;
        cap = school_default.population_cap();
    }

    let tuning = &config.spawning;
    assert_eq!(single, tuning.single_interval_floor);
    assert_eq!(formation, tuning.formation_interval_floor);
    assert_eq!(boss, tuning.boss_interval_floor);
    assert_eq!(cap, tuning.population_ceiling);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::DifficultyIncreased { level: 80 })));

    school.advance_difficulty(&mut events);
    assert_eq!(school.difficulty(), 2);
}

#[test]
fn formations_hold_twelve_to_twenty_members() {
    for seed in 0..16 {
        let mut school = quiet_school(seed);
        let mut events = Vec::new();
        let group = school.spawn_formation(&mut events);

        let members: Vec<_> = school
            .snapshots()
            .into_iter()
            .filter(|fish| fish.group == Some(group))
            .collect();
        assert!((12..=20).contains(&members.len()), "{} members", members.len());
        assert!(members
            .windows(2)
            .all(|pair| pair[0].species == pair[1].species));
        assert_eq!(school.formation_count(), 1);
    }
}

#[test]
fn formation_dissolves_when_every_member_dies() {
    let mut school = quiet_school(8);
    let mut events = Vec::new();
    let group = school.spawn_formation(&mut events);
    let members: Vec<FishId> = school
        .snapshots()
        .into_iter()
        .filter(|fish| fish.group == Some(group))
        .map(|fish| fish.id)
        .collect();

    for id in &members {
        assert!(school.damage(*id, 10_000.0).killed());
    }
    let _ = tick(&mut school, 1);
    assert_eq!(school.formation_count(), 0);
    assert!(school.is_empty());
}

#[test]
fn nearest_alive_uses_a_strict_radius() {
    let mut school = quiet_school(9);
    let mut events = Vec::new();
    let near = school.insert(Species::Small, Point::new(100.0, 0.0), &mut events);
    let _edge = school.insert(Species::Small, Point::new(0.0, 200.0), &mut events);

    let origin = Point::new(0.0, 0.0);
    assert_eq!(school.nearest_alive(origin, 200.0).map(|fish| fish.id()), Some(near));
    assert!(school.nearest_alive(origin, 100.0).is_none());

    let within = school.alive_within(origin, 200.0);
    assert_eq!(within.len(), 2);
    assert_eq!(within[0].id, near);
    assert!((within[1].distance - 200.0).abs() < 1e-4);
}

#[test]
fn highest_value_prefers_score_then_lowest_id() {
    let mut school = quiet_school(10);
    let mut events = Vec::new();
    let _small = school.insert(Species::Small, Point::new(10.0, 10.0), &mut events);
    let gold = school.insert(Species::Gold, Point::new(20.0, 10.0), &mut events);
    let _twin = school.insert(Species::Gold, Point::new(30.0, 10.0), &mut events);
    assert_eq!(school.highest_value_alive(), Some(gold));

    assert!(school.damage(gold, 1_000.0).killed());
    assert_ne!(school.highest_value_alive(), Some(gold));
}

#[test]
fn spawn_timers_respect_interval_and_cap() {
    let mut config = quiet_config();
    config.spawning.single_interval = 10;
    config.spawning.population_cap = 2;
    let mut school = School::new(&config, 11);

    let events = tick(&mut school, 9);
    assert!(events.is_empty());
    let _ = tick(&mut school, 1);
    assert_eq!(school.len(), 1);
    let _ = tick(&mut school, 30);
    assert_eq!(school.len(), 2);
}

#[test]
fn populate_spawns_opening_population() {
    let config = GameConfig::default();
    let mut school = School::new(&config, 12);
    let mut events = Vec::new();
    school.populate(&mut events);

    assert_eq!(school.formation_count(), 3);
    assert!(school.len() >= 40 + 3 * 12);
    assert!(school.len() <= 40 + 3 * 20);
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::FishSpawned { .. }))
        .count();
    assert_eq!(spawned, school.len());
}

#[test]
fn identical_seeds_swim_identically() {
    let run = |seed| {
        let config = GameConfig::default();
        let mut school = School::new(&config, seed);
        let mut events = Vec::new();
        school.populate(&mut events);
        for _ in 0..600 {
            school.tick(&mut events);
        }
        (school.snapshots(), events)
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn held_fish_stay_put() {
    let mut school = quiet_school(13);
    let mut events = Vec::new();
    let fish = school.insert(Species::Medium, Point::new(300.0, 300.0), &mut events);
    assert!(school.hold(fish));
    assert!(!school.hold(FishId::new(404)));

    let _ = tick(&mut school, 50);
    let position = school.alive_position(fish).expect("fish is alive");
    assert_eq!(position, Point::new(300.0, 300.0));
}
