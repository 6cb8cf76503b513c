#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Fish Hunt.
//!
//! The world owns the cannon, the projectiles in flight, the school of fish,
//! the economy and every deferred combat action. Adapters mutate it only through
//! [`apply`] and observe it through the [`query`] module.

mod economy;
mod effects;

use std::{collections::VecDeque, time::Duration};

use fish_hunt_core::{
    config::{ConfigError, GameConfig},
    Action, ChainId, Command, Cue, DamageSource, Event, FireMode, FishId, Notice, Point,
    ProjectileId, Refusal, Rgb, Species,
};
use fish_hunt_system_cannon::{Cannon, Shot};
use fish_hunt_system_combat::{
    self as combat, Chains, ComboOutcome, ComboTracker, ScheduledAction, Scheduler,
};
use fish_hunt_system_projectiles::Projectile;
use fish_hunt_system_school::{Fish, HitOutcome, School};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use economy::Economy;
use effects::{Effect, Effects};

/// Offset separating the combat random stream from the school's.
const COMBAT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Represents the authoritative Fish Hunt session.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    rng: ChaCha8Rng,
    tick_index: u64,
    school: School,
    cannon: Cannon,
    projectiles: Vec<Projectile>,
    next_projectile: u32,
    effects: Effects,
    economy: Economy,
    combo: ComboTracker,
    chains: Chains,
    scheduler: Scheduler,
    shots: u64,
    hits: u64,
    fire_mode: FireMode,
    paused: bool,
    game_over: bool,
    lock: Option<LightningLock>,
}

#[derive(Clone, Copy, Debug)]
struct LightningLock {
    target: FishId,
    held: Duration,
    since_strike: Duration,
}

/// Primary hit awaiting resolution.
#[derive(Clone, Copy, Debug)]
struct Strike {
    fish: FishId,
    damage: f32,
    tier: u8,
    source: DamageSource,
    guaranteed_chain: bool,
}

/// Fields of a fish captured before it is damaged.
#[derive(Clone, Copy, Debug)]
struct Victim {
    id: FishId,
    species: Species,
    boss: bool,
    position: Point,
    radius: f32,
    score: u64,
    color: Rgb,
}

impl Victim {
    fn of(fish: &Fish) -> Self {
        Self {
            id: fish.id(),
            species: fish.species(),
            boss: fish.is_boss(),
            position: fish.position(),
            radius: fish.radius(),
            score: fish.score(),
            color: fish.color(),
        }
    }
}

impl World {
    /// Creates a session populated with its opening school.
    ///
    /// Spawn events for the opening population are appended to `out_events`, the
    /// same events a restart reports.
    pub fn new(config: GameConfig, out_events: &mut Vec<Event>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = Self::fresh(config);
        world.school.populate(out_events);
        info!(
            seed = world.config.seed,
            fish = world.school.len(),
            "session started"
        );
        Ok(world)
    }

    fn fresh(config: GameConfig) -> Self {
        let seed = config.seed;
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(COMBAT_STREAM)),
            tick_index: 0,
            school: School::new(&config, seed),
            cannon: Cannon::new(&config),
            projectiles: Vec::new(),
            next_projectile: 0,
            effects: Effects::default(),
            economy: Economy::new(&config.economy),
            combo: ComboTracker::new(&config.combat),
            chains: Chains::new(&config.combat),
            scheduler: Scheduler::new(),
            shots: 0,
            hits: 0,
            fire_mode: FireMode::default(),
            paused: false,
            game_over: false,
            lock: None,
            config,
        }
    }

    fn gate(&self) -> Result<(), Refusal> {
        if self.paused {
            return Err(Refusal::Paused);
        }
        if self.game_over {
            return Err(Refusal::GameOver);
        }
        Ok(())
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.paused || self.game_over {
            return;
        }
        self.tick_index = self.tick_index.saturating_add(1);
        out.push(Event::TimeAdvanced {
            tick: self.tick_index,
            dt,
        });

        self.run_scheduled(out);
        self.steer_cannon(dt);

        let first_new = out.len();
        self.school.tick(out);
        if out[first_new..]
            .iter()
            .any(|event| matches!(event, Event::FishSpawned { boss: true, .. }))
        {
            out.push(Event::Cue {
                cue: Cue::BossSpawned,
            });
        }

        self.run_continuous_lightning(dt, out);
        self.advance_projectiles(out);
        self.effects.update();
        self.resolve_collisions(out);
        self.check_game_over(out);
    }

    fn steer_cannon(&mut self, dt: Duration) {
        if self.cannon.auto_aim() && self.cannon.auto_aim_target().is_none() {
            let nearest = self
                .school
                .nearest_alive(self.cannon.position(), self.config.cannon.auto_aim_radius)
                .map(Fish::id);
            if let Some(fish) = nearest {
                self.cannon.track(fish);
            }
        }
        if let Some(lock) = self.lock {
            if let Some(position) = self.school.alive_position(lock.target) {
                self.cannon.aim_at(position);
            }
        }

        let school = &self.school;
        self.cannon.tick(dt, |fish| school.alive_motion(fish));
    }

    fn run_scheduled(&mut self, out: &mut Vec<Event>) {
        let mut due: VecDeque<ScheduledAction> = self.scheduler.drain_due(self.tick_index).into();
        while let Some(action) = due.pop_front() {
            let chain = action.chain();
            match action {
                ScheduledAction::ChainExpand {
                    chain,
                    around,
                    level,
                } => self.expand_chain(chain, around, level),
                ScheduledAction::ChainHop {
                    chain,
                    target,
                    level,
                } => self.chain_hop(chain, target, level, out),
                ScheduledAction::LightningStrike {
                    target,
                    damage,
                    tier,
                } => self.land_strike(target, damage, tier, out),
            }

            if let Some(chain) = chain {
                let waiting = due.iter().any(|action| action.chain() == Some(chain));
                if !waiting && self.scheduler.pending_for(chain) == 0 {
                    self.finish_chain(chain, out);
                }
            }
        }
    }

    fn expand_chain(&mut self, chain: ChainId, around: Point, level: u32) {
        let range = self.chains.rules().hop_range(level);
        let candidates: Vec<(FishId, f32)> = self
            .school
            .alive_within(around, range)
            .into_iter()
            .map(|nearby| (nearby.id, nearby.distance))
            .collect();
        let targets = self.chains.plan(chain, level, candidates);
        let due = self.tick_index + self.chains.rules().hop_delay(level);
        for target in targets {
            self.scheduler.schedule(
                due,
                ScheduledAction::ChainHop {
                    chain,
                    target,
                    level,
                },
            );
        }
    }

    fn chain_hop(&mut self, chain: ChainId, target: FishId, level: u32, out: &mut Vec<Event>) {
        let Some(base) = self.chains.base_damage(chain) else {
            return;
        };
        let Some(victim) = self.school.alive(target).map(Victim::of) else {
            debug!(chain = chain.get(), fish = target.get(), "chain hop lost its target");
            return;
        };

        let damage = self.chains.rules().hop_damage(base, level);
        let outcome = self.school.damage(target, damage);
        if outcome == HitOutcome::Ignored {
            return;
        }
        debug!(chain = chain.get(), fish = target.get(), level, damage, "chain hop");
        out.push(Event::ChainHop {
            chain,
            target,
            depth: level + 1,
            damage,
        });
        self.effects.push(Effect::spark(victim.position));

        match outcome {
            HitOutcome::Ignored | HitOutcome::Deflected => {
                self.chains.record_hop(chain, false, 0);
            }
            HitOutcome::Wounded { .. } => {
                out.push(Event::FishDamaged {
                    fish: target,
                    damage,
                    source: DamageSource::Chain,
                });
                self.chains.record_hop(chain, false, 0);
            }
            HitOutcome::Killed { coins, .. } => {
                out.push(Event::FishDamaged {
                    fish: target,
                    damage,
                    source: DamageSource::Chain,
                });
                let score = self.chains.rules().hop_score(victim.score, level);
                self.record_kill(victim, score, coins, DamageSource::Chain, out);
                self.chains.record_hop(chain, true, score);
                self.scheduler.schedule(
                    self.tick_index + self.chains.rules().expand_delay(),
                    ScheduledAction::ChainExpand {
                        chain,
                        around: victim.position,
                        level: level + 1,
                    },
                );
            }
        }
    }

    fn finish_chain(&mut self, chain: ChainId, out: &mut Vec<Event>) {
        if let Some(summary) = self.chains.finish(chain) {
            debug!(
                chain = chain.get(),
                hops = summary.hops,
                kills = summary.kills,
                "chain finished"
            );
            out.push(Event::ChainFinished {
                chain,
                hops: summary.hops,
                kills: summary.kills,
                score: summary.score,
            });
        }
    }

    fn land_strike(&mut self, target: FishId, damage: f32, tier: u8, out: &mut Vec<Event>) {
        if self.school.alive(target).is_none() {
            debug!(fish = target.get(), "lightning strike lost its target");
            return;
        }
        self.resolve_hit(
            Strike {
                fish: target,
                damage,
                tier,
                source: DamageSource::Lightning,
                guaranteed_chain: false,
            },
            out,
        );
    }

    fn run_continuous_lightning(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let Some(mut lock) = self.lock else {
            return;
        };
        lock.held = lock.held.saturating_add(dt);
        if self.school.alive(lock.target).is_none()
            || lock.held >= self.config.lightning.lock_duration()
        {
            debug!(fish = lock.target.get(), "lightning lock released");
            self.lock = None;
            return;
        }

        let interval = self.config.lightning.continuous_interval();
        lock.since_strike = lock.since_strike.saturating_add(dt);
        while lock.since_strike >= interval {
            lock.since_strike -= interval;
            if self.charge_strike(lock.target, self.cannon.tier(), out).is_err() {
                debug!(fish = lock.target.get(), "lightning lock ran out of coins");
                self.lock = None;
                return;
            }
        }
        self.lock = Some(lock);
    }

    /// Charges the bet and schedules a strike on `target`.
    fn charge_strike(
        &mut self,
        target: FishId,
        tier: u8,
        out: &mut Vec<Event>,
    ) -> Result<(), Refusal> {
        let cost = match self.economy.charge_bet() {
            Ok(cost) => cost,
            Err(reason) => {
                self.refuse_funds(reason, out);
                return Err(reason);
            }
        };
        let damage = combat::lightning_damage(&self.config.lightning, cost) as f32;
        self.scheduler.schedule(
            self.tick_index + self.config.lightning.strike_delay,
            ScheduledAction::LightningStrike {
                target,
                damage,
                tier,
            },
        );
        self.shots += 1;
        if let Some(position) = self.school.alive_position(target) {
            self.effects.push(Effect::arc(self.cannon.barrel_tip(), position));
        }
        out.push(Event::LightningCharged {
            target,
            cost,
            damage,
        });
        out.push(Event::Cue {
            cue: Cue::Lightning,
        });
        Ok(())
    }

    fn refuse_funds(&self, reason: Refusal, out: &mut Vec<Event>) {
        refuse(Action::Strike, reason, out);
        out.push(Event::Notice {
            at: self.cannon.position(),
            notice: Notice::InsufficientFunds,
        });
        out.push(Event::Cue {
            cue: Cue::InsufficientFunds,
        });
    }

    fn advance_projectiles(&mut self, out: &mut Vec<Event>) {
        let playfield = self.config.playfield;
        let school = &self.school;
        let mut splits = Vec::new();
        for projectile in &mut self.projectiles {
            if let Some(fan) = projectile.tick(&playfield, |fish| school.alive_position(fish)) {
                splits.push((projectile.id(), fan));
            }
        }

        for (parent, fan) in splits {
            let mut children = Vec::with_capacity(fan.len());
            for child in fan {
                let id = self.allocate_projectile();
                let color = self.config.tier_spec(child.launch.tier).color;
                self.projectiles.push(Projectile::from_split(id, child, color));
                children.push(id);
            }
            debug!(projectile = parent.get(), "projectile split");
            out.push(Event::ProjectileSplit { parent, children });
        }

        self.projectiles.retain(|projectile| !projectile.is_finished());
    }

    fn allocate_projectile(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile += 1;
        id
    }

    fn resolve_collisions(&mut self, out: &mut Vec<Event>) {
        for index in 0..self.projectiles.len() {
            let candidates: Vec<(FishId, Point, f32)> = self
                .school
                .iter_alive()
                .map(|fish| (fish.id(), fish.position(), fish.radius()))
                .collect();

            for (fish, position, radius) in candidates {
                let projectile = &mut self.projectiles[index];
                if projectile.is_finished() {
                    break;
                }
                if !projectile.test_hit(position, radius) || self.school.alive(fish).is_none() {
                    continue;
                }
                let exploded = projectile.is_exploded();
                if !projectile.register_hit(fish) {
                    continue;
                }
                let (damage, source) = if exploded {
                    (projectile.explosion_damage(), DamageSource::Explosion)
                } else {
                    (projectile.damage(), DamageSource::Projectile)
                };
                let strike = Strike {
                    fish,
                    damage: damage as f32,
                    tier: projectile.tier(),
                    source,
                    guaranteed_chain: projectile.is_chain_capable(),
                };
                self.resolve_hit(strike, out);
            }
        }
    }

    /// Resolves a primary hit: direct damage, scoring, combo, splash and chain.
    fn resolve_hit(&mut self, strike: Strike, out: &mut Vec<Event>) {
        let Some(victim) = self.school.alive(strike.fish).map(Victim::of) else {
            return;
        };

        let outcome = self.school.damage(strike.fish, strike.damage);
        match outcome {
            HitOutcome::Ignored => return,
            HitOutcome::Deflected => {
                self.break_combo(out);
                return;
            }
            HitOutcome::Wounded { score } => {
                out.push(Event::FishDamaged {
                    fish: strike.fish,
                    damage: strike.damage,
                    source: strike.source,
                });
                out.push(Event::Cue { cue: Cue::Hit });
                if score == 0 {
                    self.break_combo(out);
                    return;
                }
                self.hits += 1;
                self.award(victim.position, score, 0, out);
            }
            HitOutcome::Killed { score, coins } => {
                out.push(Event::FishDamaged {
                    fish: strike.fish,
                    damage: strike.damage,
                    source: strike.source,
                });
                self.hits += 1;
                self.record_kill(victim, score, coins, strike.source, out);
                self.extend_combo(victim.position, out);
            }
        }

        self.splash(strike, victim.position, out);
        if outcome.killed() {
            self.roll_chain(strike, victim.position, out);
        }
    }

    fn splash(&mut self, strike: Strike, center: Point, out: &mut Vec<Event>) {
        let lightning = strike.source == DamageSource::Lightning;
        let radius = if lightning {
            combat::lightning_area_radius(&self.config.lightning, strike.tier)
        } else {
            combat::area_radius(&self.config.combat, strike.tier)
        };

        let nearby: Vec<(FishId, u32)> = self
            .school
            .alive_within(center, radius)
            .into_iter()
            .filter(|nearby| nearby.id != strike.fish)
            .filter_map(|nearby| {
                let amount = if lightning {
                    combat::lightning_area_damage(
                        &self.config.lightning,
                        strike.damage,
                        strike.tier,
                        nearby.distance,
                    )
                } else {
                    combat::area_damage(
                        &self.config.combat,
                        strike.damage,
                        strike.tier,
                        nearby.distance,
                    )
                };
                amount.map(|amount| (nearby.id, amount))
            })
            .collect();
        if nearby.is_empty() {
            return;
        }

        let color = self.config.tier_spec(strike.tier).color;
        self.effects.push(Effect::pulse(center, radius, color));
        let source = if lightning {
            DamageSource::LightningArea
        } else {
            DamageSource::Area
        };
        for (fish, amount) in nearby {
            self.secondary_hit(fish, amount as f32, source, out);
        }
    }

    fn secondary_hit(
        &mut self,
        fish: FishId,
        amount: f32,
        source: DamageSource,
        out: &mut Vec<Event>,
    ) {
        let Some(victim) = self.school.alive(fish).map(Victim::of) else {
            return;
        };
        match self.school.damage(fish, amount) {
            HitOutcome::Ignored | HitOutcome::Deflected => {}
            HitOutcome::Wounded { score } => {
                out.push(Event::FishDamaged {
                    fish,
                    damage: amount,
                    source,
                });
                if score > 0 {
                    self.award(victim.position, score, 0, out);
                }
            }
            HitOutcome::Killed { score, coins } => {
                out.push(Event::FishDamaged {
                    fish,
                    damage: amount,
                    source,
                });
                self.record_kill(victim, score, coins, source, out);
            }
        }
    }

    fn roll_chain(&mut self, strike: Strike, origin: Point, out: &mut Vec<Event>) {
        if !self.chains.can_start() {
            return;
        }
        if !strike.guaranteed_chain {
            let chance = combat::chain_chance(&self.config.combat, strike.tier);
            if self.rng.gen::<f32>() >= chance {
                return;
            }
        }
        let Some(chain) = self.chains.start(strike.fish, strike.damage) else {
            return;
        };
        debug!(chain = chain.get(), fish = strike.fish.get(), "chain triggered");
        self.scheduler.schedule(
            self.tick_index + self.chains.rules().start_delay(),
            ScheduledAction::ChainExpand {
                chain,
                around: origin,
                level: 0,
            },
        );
        out.push(Event::ChainTriggered {
            chain,
            origin: strike.fish,
        });
    }

    fn record_kill(
        &mut self,
        victim: Victim,
        score: u64,
        coins: u64,
        source: DamageSource,
        out: &mut Vec<Event>,
    ) {
        if victim.boss {
            info!(fish = victim.id.get(), species = ?victim.species, "boss defeated");
        }
        out.push(Event::FishKilled {
            fish: victim.id,
            species: victim.species,
            boss: victim.boss,
            score,
            coins,
            source,
        });
        out.push(Event::Cue {
            cue: Cue::Explosion,
        });
        self.award(victim.position, score, coins, out);
        self.effects.push(Effect::sink(
            victim.position,
            victim.species,
            victim.radius,
            victim.color,
        ));
        let burst = Effect::burst(victim.position, victim.color, &mut self.rng);
        self.effects.push(burst);
    }

    fn award(&mut self, at: Point, score: u64, coins: u64, out: &mut Vec<Event>) {
        if score > 0 {
            self.economy.add_score(score);
            self.effects.push(Effect::floating(at, score));
            out.push(Event::Notice {
                at,
                notice: Notice::Score(score),
            });
        }
        if coins > 0 {
            self.economy.earn_coins(coins);
            out.push(Event::Notice {
                at,
                notice: Notice::Coins(coins),
            });
        }
    }

    fn extend_combo(&mut self, at: Point, out: &mut Vec<Event>) {
        if let ComboOutcome::Extended { combo, bonus } = self.combo.kill() {
            if bonus > 0 {
                debug!(combo, bonus, "combo bonus");
                out.push(Event::ComboBonus { combo, bonus });
                out.push(Event::Cue { cue: Cue::Combo });
                self.award(at, bonus, 0, out);
            }
        }
    }

    fn break_combo(&mut self, out: &mut Vec<Event>) {
        if let ComboOutcome::Broken { previous } = self.combo.miss() {
            out.push(Event::ComboBroken { previous });
        }
    }

    fn check_game_over(&mut self, out: &mut Vec<Event>) {
        if self.game_over || self.economy.score() > 0 {
            return;
        }
        self.game_over = true;
        self.lock = None;
        info!(tick = self.tick_index, shots = self.shots, "game over");
        out.push(Event::GameOver {
            final_score: self.economy.score(),
        });
        out.push(Event::Cue { cue: Cue::GameOver });
    }

    fn fire(&mut self, out: &mut Vec<Event>) {
        if let Err(reason) = self.gate() {
            refuse(Action::Fire, reason, out);
            return;
        }
        match self.fire_mode {
            FireMode::Projectile => self.fire_projectile(out),
            FireMode::Lightning => self.fire_lightning(out),
            FireMode::ContinuousLightning => self.engage_lock(out),
        }
    }

    fn fire_projectile(&mut self, out: &mut Vec<Event>) {
        if self.economy.score() == 0 {
            refuse(Action::Fire, Refusal::OutOfScore, out);
            return;
        }
        let mut projectile = match self.cannon.fire(FireMode::Projectile) {
            Ok(Shot::Projectile(launch)) => {
                let id = self.allocate_projectile();
                Projectile::fire(id, launch, self.cannon.color())
            }
            Ok(Shot::Lightning { .. }) => return,
            Err(reason) => {
                refuse(Action::Fire, reason, out);
                return;
            }
        };
        let id = projectile.id();

        self.economy.spend_score(self.cannon.cost());
        self.shots += 1;
        if self.cannon.auto_aim() {
            let nearest = self
                .school
                .nearest_alive(self.cannon.position(), self.config.cannon.auto_aim_radius)
                .map(Fish::id);
            if let Some(fish) = nearest {
                let _ = projectile.assign_homing_target(fish);
            }
        }

        debug!(projectile = id.get(), tier = projectile.tier(), "projectile fired");
        out.push(Event::ProjectileFired {
            projectile: id,
            tier: projectile.tier(),
            origin: projectile.origin(),
        });
        out.push(Event::Cue { cue: Cue::Shoot });
        self.projectiles.push(projectile);
    }

    fn fire_lightning(&mut self, out: &mut Vec<Event>) {
        if !self.cannon.can_fire() {
            refuse(Action::Fire, Refusal::Reloading, out);
            return;
        }
        if let Err(reason) = self.economy.check_bet() {
            self.refuse_funds(reason, out);
            return;
        }
        let target = self
            .school
            .nearest_alive(self.cannon.target_point(), self.config.lightning.target_radius)
            .map(Fish::id);
        let Some(target) = target else {
            refuse(Action::Strike, Refusal::NoTarget, out);
            return;
        };
        match self.cannon.fire(FireMode::Lightning) {
            Ok(Shot::Lightning { tier }) => {
                let _ = self.charge_strike(target, tier, out);
            }
            Ok(Shot::Projectile(_)) => {}
            Err(reason) => refuse(Action::Fire, reason, out),
        }
    }

    fn engage_lock(&mut self, out: &mut Vec<Event>) {
        if self.lock.is_some() {
            return;
        }
        if let Err(reason) = self.economy.check_bet() {
            self.refuse_funds(reason, out);
            return;
        }
        let Some(target) = self.school.highest_value_alive() else {
            refuse(Action::Strike, Refusal::NoTarget, out);
            return;
        };
        debug!(fish = target.get(), "lightning lock engaged");
        self.lock = Some(LightningLock {
            target,
            held: Duration::ZERO,
            since_strike: self.config.lightning.continuous_interval(),
        });
    }

    fn upgrade(&mut self, out: &mut Vec<Event>) {
        if let Err(reason) = self.gate() {
            refuse(Action::Upgrade, reason, out);
            return;
        }
        let Some(cost) = self.cannon.upgrade_cost() else {
            refuse(Action::Upgrade, Refusal::MaxTier, out);
            return;
        };
        let available = self.economy.score();
        if available < cost {
            refuse(
                Action::Upgrade,
                Refusal::InsufficientScore {
                    required: cost,
                    available,
                },
                out,
            );
            return;
        }
        if !self.cannon.upgrade() {
            refuse(Action::Upgrade, Refusal::MaxTier, out);
            return;
        }
        self.economy.spend_score(cost);
        out.push(Event::CannonUpgraded {
            tier: self.cannon.tier(),
            cost,
        });
        out.push(Event::Cue { cue: Cue::Upgrade });
    }

    fn change_bet(&mut self, change: BetChange, out: &mut Vec<Event>) {
        if let Err(reason) = self.gate() {
            refuse(Action::Bet, reason, out);
            return;
        }
        let changed = match change {
            BetChange::Set(amount) => match self.economy.set_bet(amount) {
                Ok(bet) => Some(bet),
                Err(reason) => {
                    refuse(Action::Bet, reason, out);
                    return;
                }
            },
            BetChange::Raise => self.economy.raise_bet(),
            BetChange::Lower => self.economy.lower_bet(),
        };
        if let Some(bet) = changed {
            out.push(Event::BetChanged { bet });
        }
    }

    fn set_fire_mode(&mut self, mode: FireMode, out: &mut Vec<Event>) {
        if mode == self.fire_mode {
            return;
        }
        self.fire_mode = mode;
        if mode != FireMode::ContinuousLightning {
            self.lock = None;
        }
        out.push(Event::FireModeChanged { mode });
    }

    fn restart(&mut self, out: &mut Vec<Event>) {
        let config = self.config.clone();
        *self = Self::fresh(config);
        info!(seed = self.config.seed, "session restarted");
        out.push(Event::SessionRestarted);
        self.school.populate(out);
    }
}

#[derive(Clone, Copy, Debug)]
enum BetChange {
    Set(u64),
    Raise,
    Lower,
}

fn refuse(action: Action, reason: Refusal, out: &mut Vec<Event>) {
    debug!(?action, ?reason, "action refused");
    out.push(Event::ActionRefused { action, reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::AimAt { point } => world.cannon.aim_at(point),
        Command::Fire => world.fire(out_events),
        Command::UpgradeCannon => world.upgrade(out_events),
        Command::SetBet { amount } => world.change_bet(BetChange::Set(amount), out_events),
        Command::RaiseBet => world.change_bet(BetChange::Raise, out_events),
        Command::LowerBet => world.change_bet(BetChange::Lower, out_events),
        Command::SetFireMode { mode } => world.set_fire_mode(mode, out_events),
        Command::ToggleAutoAim => {
            let enabled = !world.cannon.auto_aim();
            world.cannon.set_auto_aim(enabled);
            out_events.push(Event::AutoAimChanged { enabled });
        }
        Command::TogglePause => {
            world.paused = !world.paused;
            out_events.push(Event::PauseChanged {
                paused: world.paused,
            });
        }
        Command::Restart => world.restart(out_events),
    }
}

#[cfg(any(test, feature = "scaffolding"))]
impl World {
    /// Places a stationary fish, bypassing the spawn cadence.
    pub fn place_fish(&mut self, species: Species, position: Point) -> FishId {
        let mut spawned = Vec::new();
        let fish = self.school.insert(species, position, &mut spawned);
        let _ = self.school.hold(fish);
        fish
    }

    /// Removes every fish together with projectiles and pending actions.
    pub fn clear_fish(&mut self) {
        self.school.clear();
        self.projectiles.clear();
        self.scheduler.clear();
        self.chains.clear();
        self.lock = None;
    }

    /// Overrides the score balance.
    pub fn set_score(&mut self, score: u64) {
        let current = self.economy.score();
        if score >= current {
            self.economy.add_score(score - current);
        } else {
            self.economy.spend_score(current - score);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use fish_hunt_core::{
        config::GameConfig, CannonSnapshot, EffectSnapshot, FireMode, FishId, FishSnapshot,
        HudSnapshot, ProjectileSnapshot, SchoolStats,
    };

    use super::World;

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Number of frames simulated since the session started.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Scalars shown by the heads-up display.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        let economy = &world.economy;
        let accuracy = if world.shots == 0 {
            0.0
        } else {
            world.hits as f32 / world.shots as f32 * 100.0
        };
        HudSnapshot {
            score: economy.score(),
            coins: economy.coins(),
            bet: economy.bet(),
            tier: world.cannon.tier(),
            upgrade_cost: world.cannon.upgrade_cost(),
            can_upgrade: world.cannon.can_upgrade(economy.score()),
            can_attack: economy.coins() >= economy.bet(),
            combo: world.combo.combo(),
            highest_combo: world.combo.highest(),
            shots: world.shots,
            hits: world.hits,
            accuracy,
            total_wagered: economy.wagered(),
            total_won: economy.won(),
            difficulty: world.school.difficulty(),
            fire_mode: world.fire_mode,
            paused: world.paused,
            game_over: world.game_over,
        }
    }

    /// Captures every fish that has not been removed, ordered by identifier.
    #[must_use]
    pub fn fish_view(world: &World) -> Vec<FishSnapshot> {
        world.school.snapshots()
    }

    /// Captures every projectile in flight or exploding, ordered by identifier.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures the cannon.
    #[must_use]
    pub fn cannon(world: &World) -> CannonSnapshot {
        world.cannon.snapshot()
    }

    /// Captures live effects, oldest first.
    #[must_use]
    pub fn effects(world: &World) -> Vec<EffectSnapshot> {
        world.effects.snapshots()
    }

    /// Spawn and kill statistics of the school.
    #[must_use]
    pub fn stats(world: &World) -> SchoolStats {
        world.school.stats()
    }

    /// Active fire mode.
    #[must_use]
    pub fn fire_mode(world: &World) -> FireMode {
        world.fire_mode
    }

    /// Fish the continuous lightning is locked onto.
    #[must_use]
    pub fn lightning_lock(world: &World) -> Option<FishId> {
        world.lock.map(|lock| lock.target)
    }

    /// Deferred actions still waiting in the scheduler.
    #[must_use]
    pub fn pending_actions(world: &World) -> usize {
        world.scheduler.len()
    }

    /// Chain reactions currently running.
    #[must_use]
    pub fn active_chains(world: &World) -> usize {
        world.chains.active()
    }

    /// Reports whether the session is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Reports whether the score ran out.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }
}
