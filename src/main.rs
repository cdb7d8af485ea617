use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use groundplan::site::SiteLoader;
use groundplan::suggest::MAX_SUGGESTIONS;
use groundplan::{SuggestedLocation, WeightedCandidate};

#[derive(Debug, Parser)]
#[command(author, version, about = "Rule-driven building placement advisor")]
struct Cli {
    /// Path to the site YAML file
    #[arg(long, default_value = "scenarios/riverside.yaml")]
    site: PathBuf,

    /// Building type to place (defaults to the top-ranked candidate)
    #[arg(long)]
    building: Option<String>,

    /// Seed for presentation jitter (omit for deterministic ranking)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the ranked suggestions to a JSON report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Report {
    site: String,
    generated_at: DateTime<Utc>,
    building: String,
    candidates: Vec<WeightedCandidate>,
    locations: Vec<SuggestedLocation>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let loader = SiteLoader::new(".");
    let mut config = loader.load(&cli.site)?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let mut planner = loader.build_planner(&cli.site, &config)?;

    let candidates = planner.evaluate()?;
    println!("Building suggestions for site '{}':", config.name);
    for candidate in candidates.iter().take(MAX_SUGGESTIONS) {
        println!("  {:>8.2}  {}", candidate.weight, candidate.building);
    }

    let building = cli
        .building
        .clone()
        .or_else(|| candidates.first().map(|c| c.building.clone()));
    let Some(building) = building else {
        println!("No building types known; nothing to place.");
        return Ok(());
    };

    let locations = planner.suggest(&building)?;
    if locations.is_empty() {
        println!("No placement suggestions for '{building}'.");
    } else {
        println!("Placement suggestions for '{building}':");
        for location in &locations {
            println!(
                "  {:>8.2}  ({:.1}, {:.1}, {:.1})",
                location.weight, location.position.x, location.position.y, location.position.z
            );
        }
    }

    if let Some(path) = &cli.report {
        let report = Report {
            site: config.name.clone(),
            generated_at: Utc::now(),
            building,
            candidates,
            locations,
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}
