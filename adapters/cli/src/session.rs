//! Headless session loop: autopilot input, world updates, cue tally and summary.

use std::{collections::BTreeMap, fmt, time::Duration};

use anyhow::{Context, Result};
use fish_hunt_core::{config::GameConfig, Command, Cue, Event, FireMode, Species};
use fish_hunt_rendering::{
    fire_mode_label, format_thousands, forward_cues, CueSink, FrameInput, Scene,
};
use fish_hunt_system_autopilot::{Autopilot, AutopilotConfig};
use fish_hunt_world::{self as world, query, World};
use serde::Serialize;

/// Counts cues by name instead of playing them.
#[derive(Debug, Default)]
struct CueTally {
    counts: BTreeMap<&'static str, u64>,
}

impl CueSink for CueTally {
    fn play(&mut self, cue: Cue) {
        *self.counts.entry(cue.name()).or_insert(0) += 1;
    }
}

/// Running session driven by the autopilot.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    autopilot: Autopilot,
    cues: CueTally,
    commands: Vec<Command>,
    events: Vec<Event>,
    frames: u64,
    bosses_defeated: u64,
    chains: u64,
    chain_kills: u64,
    refusals: u64,
}

impl Session {
    pub(crate) fn new(config: GameConfig, mode: FireMode) -> Result<Self> {
        let mut opening = Vec::new();
        let world = World::new(config, &mut opening).context("failed to start the session")?;
        let mut session = Self {
            world,
            autopilot: Autopilot::new(AutopilotConfig {
                mode,
                ..AutopilotConfig::default()
            }),
            cues: CueTally::default(),
            commands: Vec::new(),
            events: Vec::new(),
            frames: 0,
            bosses_defeated: 0,
            chains: 0,
            chain_kills: 0,
            refusals: 0,
        };
        session.record(&opening);
        session.events = opening;
        Ok(session)
    }

    /// Scene describing the current world state.
    pub(crate) fn scene(&self) -> Scene {
        let config = query::config(&self.world);
        Scene::compose(
            &config.playfield,
            config.cannon.barrel_length,
            &query::hud(&self.world),
            &query::cannon(&self.world),
            &query::fish_view(&self.world),
            &query::projectiles(&self.world),
            &query::effects(&self.world),
        )
    }

    /// Runs one frame: input and autopilot commands, then a tick.
    pub(crate) fn step(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let hud = query::hud(&self.world);
        self.commands.clear();
        input.commands(hud.fire_mode, &mut self.commands);
        self.autopilot.handle(
            &hud,
            &query::cannon(&self.world),
            &query::fish_view(&self.world),
            &mut self.commands,
        );
        self.commands.push(Command::Tick { dt });

        let mut events = std::mem::take(&mut self.events);
        events.clear();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }
        self.frames += 1;
        self.record(&events);

        scene.refresh(self.scene());
        scene.absorb_notices(&events);
        self.events = events;
    }

    fn record(&mut self, events: &[Event]) {
        forward_cues(events, &mut self.cues);
        for event in events {
            match event {
                Event::FishKilled { boss: true, .. } => self.bosses_defeated += 1,
                Event::ChainFinished { kills, .. } => {
                    self.chains += 1;
                    self.chain_kills += u64::from(*kills);
                }
                Event::ActionRefused { .. } => self.refusals += 1,
                _ => {}
            }
        }
    }

    pub(crate) fn summary(&self) -> Summary {
        let config = query::config(&self.world);
        let hud = query::hud(&self.world);
        let stats = query::stats(&self.world);
        let kills_by_species = Species::ALL
            .iter()
            .map(|species| {
                (
                    config.species_spec(*species).name.clone(),
                    stats.kills_by_species[species.index()],
                )
            })
            .collect();

        Summary {
            seed: config.seed,
            frames: self.frames,
            fire_mode: fire_mode_label(hud.fire_mode),
            score: hud.score,
            coins: hud.coins,
            tier: hud.tier,
            shots: hud.shots,
            hits: hud.hits,
            accuracy: hud.accuracy,
            highest_combo: hud.highest_combo,
            kills: stats.killed,
            kills_by_species,
            bosses_defeated: self.bosses_defeated,
            chains: self.chains,
            chain_kills: self.chain_kills,
            total_wagered: hud.total_wagered,
            total_won: hud.total_won,
            difficulty: hud.difficulty,
            refusals: self.refusals,
            game_over: hud.game_over,
            cues: self.cues.counts.clone(),
        }
    }
}

/// Totals reported when the run ends.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct Summary {
    pub(crate) seed: u64,
    pub(crate) frames: u64,
    pub(crate) fire_mode: &'static str,
    pub(crate) score: u64,
    pub(crate) coins: u64,
    pub(crate) tier: u8,
    pub(crate) shots: u64,
    pub(crate) hits: u64,
    pub(crate) accuracy: f32,
    pub(crate) highest_combo: u32,
    pub(crate) kills: u64,
    pub(crate) kills_by_species: BTreeMap<String, u64>,
    pub(crate) bosses_defeated: u64,
    pub(crate) chains: u64,
    pub(crate) chain_kills: u64,
    pub(crate) total_wagered: u64,
    pub(crate) total_won: u64,
    pub(crate) difficulty: u32,
    pub(crate) refusals: u64,
    pub(crate) game_over: bool,
    pub(crate) cues: BTreeMap<&'static str, u64>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed            {:#x}", self.seed)?;
        writeln!(f, "frames          {}", format_thousands(self.frames))?;
        writeln!(f, "fire mode       {}", self.fire_mode)?;
        writeln!(f, "score           {}", format_thousands(self.score))?;
        writeln!(f, "coins           {}", format_thousands(self.coins))?;
        writeln!(f, "cannon          Lv.{}", u32::from(self.tier) + 1)?;
        writeln!(
            f,
            "shots           {} ({} hits, {:.1}%)",
            format_thousands(self.shots),
            format_thousands(self.hits),
            self.accuracy
        )?;
        writeln!(f, "best combo      {}", self.highest_combo)?;
        writeln!(f, "kills           {}", format_thousands(self.kills))?;
        for (species, kills) in &self.kills_by_species {
            writeln!(f, "  {species:<14}{kills}")?;
        }
        writeln!(f, "bosses          {}", self.bosses_defeated)?;
        writeln!(
            f,
            "chains          {} ({} kills)",
            self.chains, self.chain_kills
        )?;
        writeln!(
            f,
            "wagered / won   {} / {}",
            format_thousands(self.total_wagered),
            format_thousands(self.total_won)
        )?;
        writeln!(f, "difficulty      {}", self.difficulty)?;
        writeln!(f, "refused         {}", self.refusals)?;
        if self.game_over {
            writeln!(f, "game over")?;
        }
        Ok(())
    }
}
