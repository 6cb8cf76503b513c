use fish_hunt_core::{
    config::GameConfig, Command, DamageSource, Event, FireMode, Point, Species, FRAME,
};
use fish_hunt_system_autopilot::{Autopilot, AutopilotConfig};
use fish_hunt_world::{self as world, query, World};

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

fn issue(world: &mut World, command: Command, log: &mut Vec<Event>) {
    world::apply(world, command, log);
}

fn advance(world: &mut World, frames: usize, log: &mut Vec<Event>) {
    for _ in 0..frames {
        issue(world, Command::Tick { dt: FRAME }, log);
    }
}

fn drive(world: &mut World, autopilot: &mut Autopilot, frames: usize) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..frames {
        let mut commands = Vec::new();
        autopilot.handle(
            &query::hud(world),
            &query::cannon(world),
            &query::fish_view(world),
            &mut commands,
        );
        commands.push(Command::Tick { dt: FRAME });
        for command in commands {
            issue(world, command, &mut log);
        }
    }
    log
}

#[test]
fn small_fish_dies_on_the_third_five_damage_hit() {
    let mut config = quiet_config();
    config.tiers[0].power = 5;
    let mut world = World::new(config, &mut Vec::new()).expect("valid configuration");
    world.clear_fish();
    let fish = world.place_fish(Species::Small, Point::new(490.0, 380.0));
    let mut log = Vec::new();

    for _ in 0..3 {
        issue(&mut world, Command::Fire, &mut log);
        advance(&mut world, 40, &mut log);
    }

    let direct: Vec<f32> = log
        .iter()
        .filter_map(|event| match event {
            Event::FishDamaged {
                fish: hit,
                damage,
                source: DamageSource::Projectile,
            } if *hit == fish => Some(*damage),
            _ => None,
        })
        .collect();
    assert_eq!(direct, vec![5.0, 5.0, 5.0]);

    let kills: Vec<&Event> = log
        .iter()
        .filter(|event| matches!(event, Event::FishKilled { .. }))
        .collect();
    assert_eq!(kills.len(), 1);
    assert!(matches!(
        kills[0],
        Event::FishKilled {
            species: Species::Small,
            score: 2,
            coins: 9,
            ..
        }
    ));

    let hud = query::hud(&world);
    assert_eq!(hud.coins, 10_009);
    assert_eq!(hud.score, 10_000 - 3 + 2);
    assert!(query::fish_view(&world).is_empty());
}

#[test]
fn autopilot_session_keeps_the_books_balanced() {
    let mut world =
        World::new(GameConfig::default(), &mut Vec::new()).expect("default configuration is valid");
    let mut autopilot = Autopilot::default();

    let log = drive(&mut world, &mut autopilot, 2_000);

    let hud = query::hud(&world);
    assert_eq!(hud.coins + hud.total_wagered, 10_000 + hud.total_won);
    assert!(hud.hits <= hud.shots);
    assert!((0.0..=100.0).contains(&hud.accuracy));

    let fired = log
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { .. }))
        .count() as u64;
    assert_eq!(fired, hud.shots);
}

#[test]
fn lightning_autopilot_never_overdraws() {
    let mut config = GameConfig::default();
    config.economy.initial_coins = 40;
    let mut world = World::new(config, &mut Vec::new()).expect("valid configuration");
    let mut autopilot = Autopilot::new(AutopilotConfig {
        mode: FireMode::Lightning,
        ..AutopilotConfig::default()
    });

    let log = drive(&mut world, &mut autopilot, 1_500);

    let hud = query::hud(&world);
    assert_eq!(hud.fire_mode, FireMode::Lightning);
    assert_eq!(hud.coins + hud.total_wagered, 40 + hud.total_won);

    let charged: u64 = log
        .iter()
        .filter_map(|event| match event {
            Event::LightningCharged { cost, .. } => Some(*cost),
            _ => None,
        })
        .sum();
    assert_eq!(charged, hud.total_wagered);
}

#[test]
fn restart_cancels_deferred_actions() {
    let mut world = World::new(quiet_config(), &mut Vec::new()).expect("valid configuration");
    let _ = world.place_fish(Species::Whale, Point::new(490.0, 100.0));
    let mut log = Vec::new();
    issue(
        &mut world,
        Command::SetFireMode {
            mode: FireMode::Lightning,
        },
        &mut log,
    );
    issue(&mut world, Command::Fire, &mut log);
    assert_eq!(query::pending_actions(&world), 1);

    log.clear();
    issue(&mut world, Command::Restart, &mut log);
    assert_eq!(query::pending_actions(&world), 0);
    assert_eq!(query::tick(&world), 0);
    assert_eq!(query::fire_mode(&world), FireMode::Projectile);

    advance(&mut world, 20, &mut log);
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::FishDamaged { .. })));
}
