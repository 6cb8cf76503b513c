use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use fish_hunt_core::{config::Playfield, FishId, Point, ProjectileId, Rgb};
use fish_hunt_system_projectiles::{Launch, Projectile, LIFETIME};

fn open_water() -> Playfield {
    Playfield {
        width: 10_000.0,
        height: 10_000.0,
        margin: 50.0,
    }
}

fn fire(tier: u8) -> Projectile {
    Projectile::fire(
        ProjectileId::new(7),
        Launch {
            origin: Point::new(5_000.0, 5_000.0),
            angle: 0.0,
            power: u32::from(tier) + 1,
            tier,
        },
        Rgb::from_rgb(0xff, 0xd7, 0x00),
    )
}

#[test]
fn penetration_budget_is_never_exceeded() {
    for tier in 0..=5 {
        let mut projectile = fire(tier);
        let budget = projectile.penetration();
        let mut recorded = 0;
        for raw in 0..6 {
            if projectile.register_hit(FishId::new(raw)) {
                recorded += 1;
            }
            assert!(projectile.hits().len() <= budget);
            assert_eq!(projectile.is_exploded(), projectile.hits().len() == budget);
        }
        assert_eq!(recorded, budget);
    }
}

#[test]
fn repeated_hits_on_same_fish_are_ignored() {
    let mut projectile = fire(3);
    assert!(projectile.register_hit(FishId::new(1)));
    assert!(!projectile.register_hit(FishId::new(1)));
    assert!(!projectile.is_exploded());
    assert_eq!(projectile.hits(), &[FishId::new(1)]);
}

#[test]
fn lifetime_expiry_detonates() {
    let field = open_water();
    let mut projectile = fire(0);
    for _ in 0..LIFETIME - 1 {
        assert!(projectile.tick(&field, |_| None).is_none());
    }
    assert_eq!(projectile.life(), 1);
    assert!(!projectile.is_exploded());

    let _ = projectile.tick(&field, |_| None);
    assert!(projectile.is_exploded());
}

#[test]
fn leaving_playfield_detonates() {
    let field = Playfield::default();
    let mut projectile = Projectile::fire(
        ProjectileId::new(1),
        Launch {
            origin: Point::new(field.width + field.margin - 1.0, 300.0),
            angle: 0.0,
            power: 1,
            tier: 0,
        },
        Rgb::from_rgb(0, 0, 0),
    );
    let _ = projectile.tick(&field, |_| None);
    assert!(projectile.is_exploded());
}

#[test]
fn splittable_projectile_fans_out_once() {
    let field = open_water();
    let mut projectile = fire(4);
    let mut fans = Vec::new();
    for frame in 1..=LIFETIME / 2 + 20 {
        if let Some(fan) = projectile.tick(&field, |_| None) {
            fans.push((frame, fan));
        }
    }

    assert_eq!(fans.len(), 1, "projectile split more than once");
    let (frame, fan) = fans[0];
    assert_eq!(frame, LIFETIME / 2 + 1);

    let heading = projectile.heading();
    for (child, offset) in fan.iter().zip([-FRAC_PI_4, 0.0, FRAC_PI_4]) {
        assert!((child.launch.angle - (heading + offset)).abs() < 1e-5);
        assert_eq!(child.launch.tier, 3);
        assert_eq!(child.launch.power, 4);
        assert!((child.radius - 13.0 * 0.8).abs() < 1e-4);
        assert_eq!(child.life, 89);
    }

    let child = Projectile::from_split(ProjectileId::new(8), fan[0], Rgb::from_rgb(0, 0, 0));
    assert!(!child.is_splittable());
    assert_eq!(child.life(), 89);
    assert_eq!(child.penetration(), 2);
}

#[test]
fn homing_steers_toward_live_target_and_drops_stale_one() {
    let field = open_water();
    let mut projectile = fire(2);
    let fish = FishId::new(11);
    assert!(projectile.assign_homing_target(fish));

    let below = Point::new(5_000.0, 5_100.0);
    let _ = projectile.tick(&field, |id| (id == fish).then_some(below));
    let expected = FRAC_PI_2 * 0.02;
    assert!((projectile.heading() - expected).abs() < 1e-4);
    assert_eq!(projectile.homing_target(), Some(fish));

    let _ = projectile.tick(&field, |_| None);
    assert_eq!(projectile.homing_target(), None);
    assert!((projectile.heading() - expected).abs() < 1e-4);
}

#[test]
fn low_tier_projectiles_refuse_homing() {
    let mut projectile = fire(1);
    assert!(!projectile.assign_homing_target(FishId::new(1)));
    assert_eq!(projectile.homing_target(), None);
}

#[test]
fn exploding_projectile_reaches_with_blast_radius() {
    let field = open_water();
    let mut projectile = fire(0);
    let fish_at = Point::new(5_040.0, 5_000.0);
    assert!(!projectile.test_hit(fish_at, 5.0));

    assert!(projectile.register_hit(FishId::new(1)));
    for _ in 0..10 {
        let _ = projectile.tick(&field, |_| None);
    }
    assert!(projectile.test_hit(fish_at, 10.0));
    assert!(!projectile.test_hit(fish_at, 9.0));
}
