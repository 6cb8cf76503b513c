use fish_hunt_core::{config::CombatTuning, FishId};
use fish_hunt_system_combat::{ChainRules, Chains};

fn crowd(count: u32) -> Vec<(FishId, f32)> {
    (1..=count).map(|id| (FishId::new(id), id as f32)).collect()
}

#[test]
fn hop_damage_decays_geometrically() {
    let rules = ChainRules::new(&CombatTuning::default());
    let base = 40.0;
    for level in 0..8 {
        let expected = base * 0.9_f32.powi(level as i32);
        assert!((rules.hop_damage(base, level) - expected).abs() < 1e-4);
        assert!(rules.hop_damage(base, level + 1) < rules.hop_damage(base, level));
    }
}

#[test]
fn hop_range_and_score_shrink_per_level() {
    let rules = ChainRules::new(&CombatTuning::default());
    assert_eq!(rules.hop_range(0), 150.0);
    assert!((rules.hop_range(2) - 90.0).abs() < 1e-4);
    assert_eq!(rules.hop_range(5), 0.0);
    assert_eq!(rules.hop_range(7), 0.0);

    assert_eq!(rules.hop_score(100, 0), 50);
    assert_eq!(rules.hop_score(100, 1), 25);
    assert_eq!(rules.hop_score(5, 2), 0);
    assert_eq!(rules.hop_delay(0), 9);
    assert_eq!(rules.hop_delay(3), 18);
}

#[test]
fn a_single_chain_never_exceeds_its_hop_budget() {
    let mut tuning = CombatTuning::default();
    tuning.chain_range = 10_000.0;
    tuning.chain_range_decay = 0.0;
    let mut chains = Chains::new(&tuning);
    let chain = chains.start(FishId::new(0), 1_000.0).expect("room for a chain");

    let mut total = 0;
    for level in 0..8 {
        for _ in 0..4 {
            total += chains.plan(chain, level, crowd(100)).len();
        }
    }
    assert_eq!(total, 8);
}

#[test]
fn expansion_branches_to_nearest_unvisited_fish() {
    let mut chains = Chains::new(&CombatTuning::default());
    let chain = chains.start(FishId::new(1), 10.0).expect("room for a chain");

    let first = chains.plan(chain, 0, crowd(5));
    assert_eq!(first, vec![FishId::new(2), FishId::new(3)]);

    let second = chains.plan(chain, 1, crowd(5));
    assert_eq!(second, vec![FishId::new(4), FishId::new(5)]);
}

#[test]
fn expansion_ignores_fish_out_of_range() {
    let mut chains = Chains::new(&CombatTuning::default());
    let chain = chains.start(FishId::new(0), 10.0).expect("room for a chain");
    let far = vec![(FishId::new(1), 150.5), (FishId::new(2), 400.0)];
    assert!(chains.plan(chain, 0, far).is_empty());
}

#[test]
fn branch_halts_once_damage_decays_below_one() {
    let mut tuning = CombatTuning::default();
    tuning.chain_range_decay = 0.0;
    let mut chains = Chains::new(&tuning);
    // 1.5 * 0.9^3 = 1.09, 1.5 * 0.9^4 = 0.98
    let chain = chains.start(FishId::new(0), 1.5).expect("room for a chain");
    assert_eq!(chains.plan(chain, 3, crowd(1)).len(), 1);
    assert!(chains.plan(chain, 4, crowd(3)).is_empty());
}

#[test]
fn depth_limit_stops_expansion() {
    let mut tuning = CombatTuning::default();
    tuning.chain_range_decay = 0.0;
    let mut chains = Chains::new(&tuning);
    let chain = chains.start(FishId::new(0), 1_000.0).expect("room for a chain");
    assert!(chains.plan(chain, 8, crowd(3)).is_empty());
}

#[test]
fn at_most_five_chains_run_at_once() {
    let mut chains = Chains::new(&CombatTuning::default());
    let started: Vec<_> = (0..7)
        .filter_map(|id| chains.start(FishId::new(id), 5.0))
        .collect();
    assert_eq!(started.len(), 5);
    assert!(!chains.can_start());

    let summary = chains.finish(started[0]).expect("chain is running");
    assert_eq!(summary.origin, FishId::new(0));
    assert!(chains.can_start());
}

#[test]
fn summary_reports_landed_hops_and_kills() {
    let mut chains = Chains::new(&CombatTuning::default());
    let chain = chains.start(FishId::new(0), 5.0).expect("room for a chain");
    chains.record_hop(chain, false, 0);
    chains.record_hop(chain, true, 12);
    let summary = chains.finish(chain).expect("chain is running");
    assert_eq!((summary.hops, summary.kills, summary.score), (2, 1, 12));
    assert!(chains.finish(chain).is_none());
}
