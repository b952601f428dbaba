use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::process::ExitCode;

use near_deduper_core::logging::{init_logger, LOG_ENV_VAR};
use near_deduper_core::{
    Config, DeletionOutcome, HashBackend, NearDeduper, RunReport, SimilarityMode,
};

#[derive(Parser)]
#[command(name = "near-deduper")]
#[command(about = "Find near-duplicate JPEGs using an 8x8 average perceptual hash")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group visually similar JPEGs and propose deletions
    Scan {
        #[command(flatten)]
        run: RunArgs,

        /// Similarity mode: conservative (5), medium (10) or aggressive (16)
        #[arg(long)]
        mode: Option<SimilarityMode>,

        /// Override Hamming threshold (0-64)
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i32>,

        /// Fingerprint backend: auto, image or imagemagick
        #[arg(long)]
        backend: Option<HashBackend>,
    },

    /// Group byte-identical JPEGs and propose deletions
    Exact {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "near-deduper.json")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Root folder to scan (default: images)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Delete proposed duplicates (requires --yes)
    #[arg(long)]
    delete: bool,

    /// Confirm deletion when --delete is set
    #[arg(long)]
    yes: bool,

    /// Directory for review and removal manifests
    #[arg(long)]
    manifest_dir: Option<PathBuf>,

    /// Hashing threads (0 = number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Maximum directory depth to scan
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to rotating files in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl RunArgs {
    /// Load the config file (or defaults) and apply command line overrides
    fn build_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(dir) = &self.manifest_dir {
            config.manifest_dir = dir.clone();
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
        config.delete |= self.delete;
        config.confirm |= self.yes;
        if self.no_progress || self.json {
            config.show_progress = false;
        }

        Ok(config)
    }

    fn log_level(&self, config: &Config) -> LevelFilter {
        match self.verbose {
            0 => config.log_level.into(),
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn init_logging(log_dir: Option<&PathBuf>, level: LevelFilter) -> anyhow::Result<()> {
    match log_dir {
        Some(dir) => {
            init_logger(dir, level).map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_env(LOG_ENV_VAR)
                .init();
        }
    }
    Ok(())
}

/// Status lines go to stderr in JSON mode so stdout stays parseable
fn status(json: bool, message: &str) {
    if json {
        eprintln!("{}", message);
    } else {
        println!("{}", message);
    }
}

fn print_summary(report: &RunReport) {
    println!("Groups found: {}", report.group_count);
    println!(
        "Proposed deletions: {} (keeping {})",
        report.delete_count, report.keep_count
    );
    if !report.failures.is_empty() {
        println!("Hash failures: {}", report.failures.len());
    }
}

fn execute(run: &RunArgs, config: Config, exact: bool) -> anyhow::Result<()> {
    init_logging(run.log_dir.as_ref(), run.log_level(&config))?;

    let deduper = NearDeduper::new(config)?;
    let root = deduper.config().root.clone();

    let report = if exact {
        status(
            run.json,
            &format!("Scanning {} for exact duplicates…", root.display()),
        );
        deduper.scan_exact()?
    } else {
        status(
            run.json,
            &format!(
                "Hashing images under {} with 8x8 aHash (threshold={})…",
                root.display(),
                deduper.threshold()
            ),
        );
        deduper.scan()?
    };

    if run.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    let manifest = deduper
        .write_review_manifest(&report)
        .context("Failed to write review manifest")?;
    status(run.json, &format!("Review manifest: {}", manifest.display()));

    match deduper.apply(&report)? {
        DeletionOutcome::NotRequested => {}
        DeletionOutcome::Unconfirmed => {
            status(run.json, "--delete specified without --yes; skipping deletion.");
        }
        DeletionOutcome::Executed {
            removed, manifest, ..
        } => {
            status(run.json, &format!("Deleted duplicates: {}", removed));
            status(run.json, &format!("Removal manifest: {}", manifest.display()));
        }
    }

    info!("Run complete");
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Scan {
            run,
            mode,
            threshold,
            backend,
        } => {
            let mut config = run.build_config()?;
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if threshold.is_some() {
                config.threshold = threshold;
            }
            if let Some(backend) = backend {
                config.backend = backend;
            }
            execute(&run, config, false)
        }

        Commands::Exact { run } => {
            let config = run.build_config()?;
            execute(&run, config, true)
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let is_configuration = err
                .downcast_ref::<near_deduper_core::Error>()
                .map(near_deduper_core::Error::is_configuration)
                .unwrap_or(false);
            if is_configuration {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
