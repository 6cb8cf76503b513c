#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Fish Hunt sessions.

mod headless;
mod session;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use fish_hunt_core::{config::GameConfig, FireMode};
use fish_hunt_rendering::{Color, Presentation, RenderingBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use headless::HeadlessBackend;
use session::Session;

/// Runs a Fish Hunt session driven by the autopilot and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "fish-hunt", version, about)]
struct Args {
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Seed overriding the configured one.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding the stock configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fire mode the autopilot plays with.
    #[arg(long, value_enum, default_value_t = ModeArg::Cannon)]
    mode: ModeArg,
    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
    /// Log filter directives, overriding `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Projectiles fired from the cannon.
    Cannon,
    /// Single paid lightning strikes.
    Lightning,
    /// Locked-on lightning strikes.
    Continuous,
}

impl From<ModeArg> for FireMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Cannon => Self::Projectile,
            ModeArg::Lightning => Self::Lightning,
            ModeArg::Continuous => Self::ContinuousLightning,
        }
    }
}

/// Entry point for the Fish Hunt command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut session = Session::new(config, args.mode.into())?;
    let presentation = Presentation::new(
        "Fish Hunt",
        Color::from_rgb_u8(0x00, 0x1f, 0x3f),
        session.scene(),
    );
    HeadlessBackend::new(args.frames).run(presentation, |dt, input, scene| {
        session.step(dt, input, scene);
    })?;

    let summary = session.summary();
    info!(
        score = summary.score,
        coins = summary.coins,
        kills = summary.kills,
        "session finished"
    );
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{json}");
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!(error))
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    parse_config(&text).with_context(|| format!("in configuration {}", path.display()))
}

fn parse_config(text: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(text).context("malformed configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_configuration_keeps_defaults() {
        let config = parse_config(
            r#"
            seed = 99

            [economy]
            initial_coins = 500
            "#,
        )
        .expect("configuration parses");

        assert_eq!(config.seed, 99);
        assert_eq!(config.economy.initial_coins, 500);
        assert_eq!(config.economy.initial_score, 10_000);
    }

    #[test]
    fn inconsistent_configuration_is_rejected() {
        let error = parse_config(
            r#"
            [economy]
            default_bet = 4
            "#,
        )
        .expect_err("default bet outside the options");

        assert_eq!(error.to_string(), "invalid configuration");
        assert!(format!("{error:#}").contains("default bet 4"));
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let error = load_config(Some(Path::new("/nonexistent/fish-hunt.toml")))
            .expect_err("file does not exist");
        assert!(error.to_string().contains("/nonexistent/fish-hunt.toml"));
    }

    #[test]
    fn arguments_parse_with_defaults() {
        let args = Args::parse_from(["fish-hunt", "--mode", "continuous", "--json"]);
        assert_eq!(args.frames, 3_600);
        assert_eq!(FireMode::from(args.mode), FireMode::ContinuousLightning);
        assert!(args.json);
        assert!(args.seed.is_none());
    }
}
