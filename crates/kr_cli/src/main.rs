//! Roulette CLI
//!
//! Balance-inspection tool: dump odds tables, build reels from snapshot
//! JSON, and run whole spins offline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kr_core::{build_reel_json, odds_table, simulate_spin_json, GameMode, RouletteTuning};

#[derive(Parser)]
#[command(name = "kr_cli")]
#[command(about = "Inspect and replay the item roulette offline", long_about = None)]
#[command(version = kr_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a mode's odds table
    Odds {
        /// Game mode: race | battle | special_retro
        #[arg(long, default_value = "race")]
        mode: String,
    },

    /// Build one reel from a ReelRequest JSON file
    Reel {
        /// Input request JSON file path
        #[arg(long)]
        request: PathBuf,
    },

    /// Run one spin to commit from a SpinRequest JSON file
    Spin {
        /// Input request JSON file path
        #[arg(long)]
        request: PathBuf,
    },

    /// Print the default tuning as JSON, for use as an overlay template
    Tuning,
}

fn parse_mode(mode: &str) -> Result<GameMode> {
    match mode {
        "race" => Ok(GameMode::Race),
        "battle" => Ok(GameMode::Battle),
        "special_retro" => Ok(GameMode::SpecialRetro),
        other => anyhow::bail!("unknown mode: {other}"),
    }
}

fn print_pretty(response: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(response)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Odds { mode } => {
            let mode = parse_mode(&mode)?;
            println!("{:<20} {:>12} {:>10}", "item", "ideal_power", "tolerance");
            for entry in odds_table(mode) {
                println!(
                    "{:<20} {:>12} {:>10}",
                    entry.item.display_name(),
                    entry.ideal_power >> 16,
                    entry.dupe_tolerance
                );
            }
        }

        Commands::Reel { request } => {
            let input = std::fs::read_to_string(&request)
                .with_context(|| format!("reading {}", request.display()))?;
            let response = build_reel_json(&input).map_err(anyhow::Error::msg)?;
            print_pretty(&response)?;
        }

        Commands::Spin { request } => {
            let input = std::fs::read_to_string(&request)
                .with_context(|| format!("reading {}", request.display()))?;
            let response = simulate_spin_json(&input).map_err(anyhow::Error::msg)?;
            print_pretty(&response)?;
        }

        Commands::Tuning => {
            let json = RouletteTuning::default()
                .to_json()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("{json}");
        }
    }

    Ok(())
}
