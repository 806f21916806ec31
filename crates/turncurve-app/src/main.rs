use std::path::PathBuf;

use clap::{Parser, Subcommand};

use turncurve_app::chart;
use turncurve_app::config::ViewerConfig;
use turncurve_app::dataset;
use turncurve_app::logging::init_logging;
use turncurve_app::server;
use turncurve_core::{prepare, sample_chart};

/// Interactive viewer for per-card, per-turn win rates.
#[derive(Debug, Parser)]
#[command(
    name = "turncurve",
    author,
    version,
    about = "Win-rate-by-turn random card viewer"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "viewer.yaml")]
    config: PathBuf,

    /// Override the win-rate table location.
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Override the listen address used by `serve`.
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,

    /// Exit after validating the configuration and the data file.
    #[arg(long)]
    validate_only: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the table and start the interactive viewer.
    Serve,
    /// Sample one card and write its comparison chart as a PNG.
    Render,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ViewerConfig::from_path(&cli.config)?;

    if let Some(data) = cli.data {
        config.data.path = data;
    }

    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    config.validate()?;

    let logging_guard = init_logging(&config.logging, &config.outputs.log_dir)?;
    if let Some(path) = logging_guard.structured_path.as_ref() {
        println!("Structured log: {}", path.display());
    }

    let records = dataset::load(&config.data.path)?;
    let prepared = prepare(records, &config.data.exclude);
    println!(
        "Loaded {}: {} non-land cards across {} baseline turns",
        config.data.path.display(),
        prepared.dataset.card_names().len(),
        prepared.baseline.len()
    );

    if cli.validate_only {
        println!("Validation-only mode: nothing served or rendered.");
        return Ok(());
    }

    match cli.command {
        Command::Serve => {
            println!("Serving on http://{}/", config.server.listen);
            server::run(&config.server.listen, &prepared)?;
        }
        Command::Render => {
            let mut rng = rand::thread_rng();
            let spec = sample_chart(&prepared.dataset, &prepared.baseline, &mut rng)?;
            let path = chart::render_png(&spec, &config.outputs.plots_dir)?;
            println!("Rendered '{}' to {}", spec.card_name, path.display());
        }
    }

    Ok(())
}
