use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mapgen::{GeneratorConfig, GlyphRenderer, Render, generate_map, runtime_seed};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a drunk-walk cave map", long_about = None)]
struct Args {
    /// TOML file with generator settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run seed (falls back to the config file, then to a fresh runtime seed)
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short = 'W', long)]
    width: Option<usize>,

    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Walk-then-smooth rounds
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Run every walk even after the coverage target is met
    #[arg(long)]
    no_coverage_stop: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Args {
    fn resolve_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if self.no_coverage_stop {
            config.walk.early_exit = false;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = args.resolve_config()?;
    let seed = config.seed.unwrap_or_else(runtime_seed);
    info!(seed, width = config.grid.width, height = config.grid.height, "generating map");

    let generated = generate_map(&config, seed).context("Invalid generator configuration")?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", GlyphRenderer.render(&generated.grid));
            println!("Seed: {seed}");
            println!("Rooms placed: {}", generated.rooms_placed());
            println!("Coverage: {:.1}%", generated.grid.coverage() * 100.0);
            println!("Fingerprint: {:016x}", generated.fingerprint());
        }
        OutputFormat::Json => {
            let report = json!({
                "seed": seed,
                "fingerprint": format!("{:016x}", generated.fingerprint()),
                "map": generated,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize map")?
            );
        }
    }

    Ok(())
}
