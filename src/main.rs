use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use interviewfeatures::{Config, PipelineConfig, PreprocessingPipeline, StateStore};

#[derive(Parser, Debug)]
#[command(name = "interviewfeatures")]
#[command(version = "0.1.0")]
#[command(about = "Build classifier features from candidate interview extracts")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the raw source extracts
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Intermediate joined table
    #[arg(long, global = true)]
    joined: Option<PathBuf>,

    /// Feature matrix output
    #[arg(long, global = true)]
    features: Option<PathBuf>,

    /// SQLite database holding the fitted transformer state
    #[arg(long, global = true)]
    state_db: Option<PathBuf>,

    /// What to do with categories unseen at fit time (error, ignore)
    #[arg(long, global = true)]
    unknown_categories: Option<String>,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Combine the sources, then fit and write the feature matrix
    Run,
    /// Combine the sources into the joined table only
    Combine,
    /// Fit on the joined table and write the matrix and transformer state
    Prepare,
    /// Transform a joined table with the saved transformer state
    Apply {
        /// Joined table to transform
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the resulting matrix
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the saved transformer state blobs
    State,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("interviewfeatures=info".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = apply_overrides(Config::from_env()?, &args)?;

    let store = StateStore::new(&config.state_db)?;
    let mut pipeline = PreprocessingPipeline::new(store, PipelineConfig::from(&config));

    match args.command {
        Command::Run => {
            tracing::info!("Running full preprocessing from {}", config.data_dir.display());
            let matrix = pipeline.run()?;
            println!(
                "Wrote {} rows x {} columns to {}",
                matrix.len(),
                matrix.columns.len(),
                config.features_csv.display()
            );
        }
        Command::Combine => {
            let rows = pipeline.combine()?;
            println!("Wrote {} joined rows to {}", rows.len(), config.joined_csv.display());
        }
        Command::Prepare => {
            let (matrix, state) = pipeline.prepare()?;
            println!(
                "Wrote {} rows x {} columns to {} ({} indicator columns)",
                matrix.len(),
                matrix.columns.len(),
                config.features_csv.display(),
                state.encoder.width()
            );
        }
        Command::Apply { input, output } => {
            let matrix = pipeline.apply(&input, &output)?;
            println!("Wrote {} rows to {}", matrix.len(), output.display());
        }
        Command::State => {
            let blobs = pipeline.store().list_blobs()?;
            if blobs.is_empty() {
                println!("No transformer state saved in {}", config.state_db.display());
            }
            for blob in blobs {
                println!(
                    "{:<8} {:<8} fitted {}",
                    blob.name,
                    blob.kind,
                    blob.fitted_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
        }
    }

    Ok(())
}

fn apply_overrides(mut config: Config, args: &Args) -> anyhow::Result<Config> {
    if let Some(ref dir) = args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(ref path) = args.joined {
        config.joined_csv = path.clone();
    }
    if let Some(ref path) = args.features {
        config.features_csv = path.clone();
    }
    if let Some(ref path) = args.state_db {
        config.state_db = path.clone();
    }
    if let Some(ref policy) = args.unknown_categories {
        config.unknown_category_policy = policy.parse()?;
    }
    if args.quiet {
        config.show_progress = false;
    }

    config.validate()?;
    Ok(config)
}
