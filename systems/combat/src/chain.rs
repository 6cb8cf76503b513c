use std::collections::{BTreeMap, BTreeSet};

use fish_hunt_core::{config::CombatTuning, ChainId, FishId};
use tracing::debug;

/// Decay and timing rules shared by every chain reaction.
#[derive(Clone, Debug)]
pub struct ChainRules {
    max_depth: u32,
    hop_budget: u32,
    max_active: usize,
    range: f32,
    range_decay: f32,
    damage_decay: f32,
    score_decay: f32,
    branching: usize,
    start_delay: u64,
    hop_delay: u64,
    hop_delay_per_level: u64,
    expand_delay: u64,
}

impl ChainRules {
    /// Extracts the chain rules from the combat tuning block.
    #[must_use]
    pub fn new(tuning: &CombatTuning) -> Self {
        Self {
            max_depth: tuning.chain_max_depth,
            hop_budget: tuning.chain_hop_budget,
            max_active: tuning.chain_max_active as usize,
            range: tuning.chain_range,
            range_decay: tuning.chain_range_decay,
            damage_decay: tuning.chain_damage_decay,
            score_decay: tuning.chain_score_decay,
            branching: tuning.chain_branching,
            start_delay: tuning.chain_start_delay,
            hop_delay: tuning.chain_hop_delay,
            hop_delay_per_level: tuning.chain_hop_delay_per_level,
            expand_delay: tuning.chain_expand_delay,
        }
    }

    /// Damage of a hop at `level` for a chain started with `base` damage.
    #[must_use]
    pub fn hop_damage(&self, base: f32, level: u32) -> f32 {
        base * self.damage_decay.powi(level as i32)
    }

    /// Search radius of an expansion at `level`.
    #[must_use]
    pub fn hop_range(&self, level: u32) -> f32 {
        (self.range * (1.0 - self.range_decay * level as f32)).max(0.0)
    }

    /// Score paid for a hop kill at `level` on a fish worth `score`.
    #[must_use]
    pub fn hop_score(&self, score: u64, level: u32) -> u64 {
        (score as f32 * self.score_decay.powi(level as i32 + 1)).floor() as u64
    }

    /// Frames between an expansion at `level` and its hops.
    #[must_use]
    pub fn hop_delay(&self, level: u32) -> u64 {
        self.hop_delay + self.hop_delay_per_level * u64::from(level)
    }

    /// Frames between the triggering kill and the first expansion.
    #[must_use]
    pub fn start_delay(&self) -> u64 {
        self.start_delay
    }

    /// Frames between a hop kill and the next expansion.
    #[must_use]
    pub fn expand_delay(&self) -> u64 {
        self.expand_delay
    }
}

#[derive(Clone, Debug)]
struct ChainState {
    origin: FishId,
    base_damage: f32,
    visited: BTreeSet<FishId>,
    scheduled: u32,
    hops: u32,
    kills: u32,
    score: u64,
}

/// Totals reported when a chain reaction ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainSummary {
    /// Chain that ended.
    pub chain: ChainId,
    /// Fish whose death started the chain.
    pub origin: FishId,
    /// Hops that landed on a living fish.
    pub hops: u32,
    /// Fish killed by hops.
    pub kills: u32,
    /// Score awarded by hop kills.
    pub score: u64,
}

/// Book-keeping for every running chain reaction.
#[derive(Clone, Debug)]
pub struct Chains {
    rules: ChainRules,
    active: BTreeMap<ChainId, ChainState>,
    next: u32,
}

impl Chains {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(tuning: &CombatTuning) -> Self {
        Self {
            rules: ChainRules::new(tuning),
            active: BTreeMap::new(),
            next: 0,
        }
    }

    /// Decay and timing rules.
    #[must_use]
    pub fn rules(&self) -> &ChainRules {
        &self.rules
    }

    /// Number of running chains.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.len()
    }

    /// Whether another chain may start.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.active.len() < self.rules.max_active
    }

    /// Registers a chain started by the death of `origin`.
    ///
    /// Returns `None` while the concurrency limit is reached.
    pub fn start(&mut self, origin: FishId, base_damage: f32) -> Option<ChainId> {
        if !self.can_start() {
            return None;
        }
        let chain = ChainId::new(self.next);
        self.next += 1;
        let _ = self.active.insert(
            chain,
            ChainState {
                origin,
                base_damage,
                visited: BTreeSet::from([origin]),
                scheduled: 0,
                hops: 0,
                kills: 0,
                score: 0,
            },
        );
        Some(chain)
    }

    /// Damage the chain started with.
    #[must_use]
    pub fn base_damage(&self, chain: ChainId) -> Option<f32> {
        self.active.get(&chain).map(|state| state.base_damage)
    }

    /// Selects hop targets for an expansion at `level`.
    ///
    /// `candidates` lists living fish with their distance to the expansion
    /// centre, nearest first. The selection stops at the depth limit, once the
    /// hop damage decays below 1, or when the hop budget is spent. Selected
    /// fish are marked visited and count against the budget.
    pub fn plan<I>(&mut self, chain: ChainId, level: u32, candidates: I) -> Vec<FishId>
    where
        I: IntoIterator<Item = (FishId, f32)>,
    {
        let rules = &self.rules;
        let Some(state) = self.active.get_mut(&chain) else {
            return Vec::new();
        };
        if level >= rules.max_depth
            || rules.hop_damage(state.base_damage, level) < 1.0
            || state.scheduled >= rules.hop_budget
        {
            return Vec::new();
        }

        let room = (rules.hop_budget - state.scheduled) as usize;
        let range = rules.hop_range(level);
        let picked: Vec<FishId> = candidates
            .into_iter()
            .filter(|(fish, distance)| *distance <= range && !state.visited.contains(fish))
            .map(|(fish, _)| fish)
            .take(rules.branching.min(room))
            .collect();

        state.visited.extend(picked.iter().copied());
        state.scheduled += picked.len() as u32;
        debug!(chain = chain.get(), level, hops = picked.len(), "chain expanded");
        picked
    }

    /// Records a hop that landed on a living fish.
    pub fn record_hop(&mut self, chain: ChainId, killed: bool, score: u64) {
        if let Some(state) = self.active.get_mut(&chain) {
            state.hops += 1;
            if killed {
                state.kills += 1;
            }
            state.score = state.score.saturating_add(score);
        }
    }

    /// Ends a chain and reports its totals.
    pub fn finish(&mut self, chain: ChainId) -> Option<ChainSummary> {
        self.active.remove(&chain).map(|state| ChainSummary {
            chain,
            origin: state.origin,
            hops: state.hops,
            kills: state.kills,
            score: state.score,
        })
    }

    /// Forgets every running chain.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}
