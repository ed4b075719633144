//! riskcast CLI - Monte Carlo schedule risk for tracker exports.

mod report;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use riskcast_simulation::{MonteCarloEngine, SimulationConfig};
use riskcast_storage::{JsonTaskSource, TaskFilter, TaskSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "riskcast")]
#[command(about = "Monte Carlo schedule and risk forecasts for project tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation over a task export
    Simulate {
        /// JSON task export
        file: PathBuf,
        /// Only tasks of this project key
        #[arg(long)]
        project: Option<String>,
        /// Number of iterations (0 = default)
        #[arg(short = 'n', long, default_value = "10000", allow_negative_numbers = true)]
        simulations: i64,
        /// Fix the random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
        /// Skip pairwise task correlations
        #[arg(long)]
        no_correlations: bool,
        /// Leave the raw duration distribution out of the result
        #[arg(long)]
        no_distribution: bool,
        /// Sample on the calling thread only
        #[arg(long)]
        sequential: bool,
    },
    /// List tasks with their sampling parameters
    Tasks {
        /// JSON task export
        file: PathBuf,
        /// Only tasks of this project key
        #[arg(long)]
        project: Option<String>,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn filter_for(project: Option<String>) -> TaskFilter {
    match project {
        Some(key) => TaskFilter::for_project(key),
        None => TaskFilter::default(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            file,
            project,
            simulations,
            seed,
            json,
            no_correlations,
            no_distribution,
            sequential,
        } => {
            let source = JsonTaskSource::new(&file);
            let tasks = source
                .load_tasks(&filter_for(project))
                .await
                .with_context(|| format!("failed to load tasks from {}", file.display()))?;

            if tasks.is_empty() {
                bail!("no tasks to simulate in {}", file.display());
            }

            let mut config = SimulationConfig::new()
                .with_parallel(!sequential)
                .with_correlations(!no_correlations)
                .with_distribution(!no_distribution);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }

            let engine = MonteCarloEngine::new(config);
            let result = tokio::task::spawn_blocking(move || engine.run(&tasks, simulations))
                .await
                .context("simulation worker panicked")??;

            info!("Simulated project {}", result.project_key);

            if json {
                println!("{}", report::render_json(&result)?);
            } else {
                print!("{}", report::render(&result)?);
            }
        }
        Commands::Tasks { file, project } => {
            let source = JsonTaskSource::new(&file);
            let tasks = source
                .load_tasks(&filter_for(project))
                .await
                .with_context(|| format!("failed to load tasks from {}", file.display()))?;

            print!("{}", report::render_tasks(&tasks)?);
        }
    }

    Ok(())
}
