//! CLI interface for byteq

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::config::{self, Config};
use crate::driver::{CancelToken, Driver};
use crate::learning::Learner;
use crate::metrics::RunSummary;
use crate::sink::console::format_summary;
use crate::sink::{ConsoleReporter, History, HistorySink, JsonlSink, SinkSet};
use crate::source::{ObservationSource, ReplaySource, SimulatedSensor};
use crate::transform::{self, ByteTransforms};

#[derive(Parser)]
#[command(name = "byteq")]
#[command(about = "Q-learning loop that picks reversible byte transforms and checks their round trip", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the learning loop
    Run(RunArgs),
    /// Verify every transform round-trips over all 256 bytes
    Check {
        /// Config file (defaults to the standard location)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show or initialize configuration
    Config {
        /// Show the effective configuration
        #[arg(long)]
        show: bool,
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,
        /// Print the configuration file path
        #[arg(long)]
        path: bool,
    },
}

/// Options for a single run; flags override the config file
#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Config file (defaults to the standard location)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of iterations
    #[arg(short = 'n', long)]
    iterations: Option<u64>,
    /// Seed for exploration and the simulated sensor
    #[arg(short, long, env = "BYTEQ_SEED")]
    seed: Option<u64>,
    /// Probability of picking a random action
    #[arg(long)]
    explore_rate: Option<f64>,
    /// Step size of the value update
    #[arg(long)]
    learning_rate: Option<f64>,
    /// Weight of the bootstrapped estimate
    #[arg(long)]
    discount_factor: Option<f64>,
    /// Print a progress line every N iterations
    #[arg(long)]
    report_interval: Option<u64>,
    /// Pause after each iteration (milliseconds)
    #[arg(long)]
    step_delay_ms: Option<u64>,
    /// Comma-separated action set, e.g. "xor,add"
    #[arg(long, value_delimiter = ',')]
    actions: Option<Vec<String>>,
    /// Replay observations from the bytes of this file instead of the simulated sensor
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Write every result record to this file as JSON lines
    #[arg(long)]
    records: Option<PathBuf>,
    /// No progress bar or per-iteration reports
    #[arg(short, long)]
    quiet: bool,
    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    /// Fold command-line overrides into a loaded config
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(n) = self.iterations {
            config.run.iteration_count = n;
        }
        if let Some(seed) = self.seed {
            config.run.seed = Some(seed);
        }
        if let Some(rate) = self.explore_rate {
            config.learning.explore_rate = rate;
        }
        if let Some(rate) = self.learning_rate {
            config.learning.learning_rate = rate;
        }
        if let Some(gamma) = self.discount_factor {
            config.learning.discount_factor = gamma;
        }
        if let Some(interval) = self.report_interval {
            config.run.report_interval = interval;
        }
        if let Some(delay) = self.step_delay_ms {
            config.run.step_delay_ms = delay;
        }
        if let Some(names) = &self.actions {
            config.learning.actions = names
                .iter()
                .map(|n| n.parse())
                .collect::<Result<Vec<_>, _>>()?;
        }
        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_loop(args).await?,
        Commands::Check { config } => {
            let config = load_config(config.as_ref())?;
            check_transforms(&config)?;
        }
        Commands::Config { show, init, force, path } => {
            if path {
                println!("{}", config::config_path()?.display());
            }
            if init {
                let target = config::config_path()?;
                if target.exists() && !force {
                    anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
                }
                let written = Config::default().save()?;
                println!("Wrote default configuration to {}", written.display());
            }
            if show || (!path && !init) {
                config::show_config(&Config::load()?)?;
            }
        }
    }

    Ok(())
}

async fn run_loop(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    args.apply(&mut config)?;
    let plan = config.validate().context("Invalid configuration")?;

    let seed = plan.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);

    let cancel = CancelToken::new();
    let learner = Learner::seeded(plan.actions.clone(), plan.params, seed);
    let mut driver = Driver::from_plan(learner, &plan).with_cancel_token(cancel.clone());

    let mut source: Box<dyn ObservationSource + Send> = match &args.replay {
        Some(path) => Box::new(ReplaySource::from_file(path)?),
        None => Box::new(SimulatedSensor::seeded(seed.wrapping_add(1))),
    };

    let history_sink = HistorySink::new(plan.history_capacity);
    let history = history_sink.history();

    let mut sinks = SinkSet::new();
    if !args.quiet {
        let console = ConsoleReporter::new(plan.report_interval).with_progress(plan.iteration_count);
        // stdout carries only the JSON summary in --json mode
        let console = if args.json {
            console.with_output(std::io::stderr()).without_summary()
        } else {
            console
        };
        sinks.push("console", console);
    }
    sinks.push("history", history_sink);
    if let Some(path) = &args.records {
        sinks.push("records", JsonlSink::create(path)?);
    }

    // Ctrl+C stops the loop between iterations
    let signal_cancel = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let summary = tokio::task::spawn_blocking(move || driver.run(source.as_mut(), &mut sinks))
        .await
        .context("Learning loop stopped unexpectedly")?;
    signal_task.abort();

    print!("{}", closing_report(&summary, &history, &args)?);
    Ok(())
}

/// Output printed after the loop: the summary as JSON, or the text trailer
fn closing_report(summary: &RunSummary, history: &History, args: &RunArgs) -> Result<String> {
    if args.json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(summary)?));
    }

    let mut out = String::new();
    if args.quiet {
        out.push_str(&format!("{}\n", format_summary(summary)));
    }
    if let Some(mean) = history.mean_reward() {
        out.push_str(&format!(
            "  Mean reward over last {} iterations: {:.2}\n",
            history.len(),
            mean
        ));
    }
    if let Some(last) = history.latest() {
        out.push_str(&format!("  Last max value: {:.4}\n", last.best_value));
    }
    Ok(out)
}

/// Print a per-action invertibility report; fails if any action breaks
fn check_transforms(config: &Config) -> Result<()> {
    let plan = config.validate().context("Invalid configuration")?;
    let checks = transform::verify(&ByteTransforms, &plan.actions);

    let mut failed = 0;
    for check in &checks {
        if check.passed() {
            println!("  {:<4} ok (256/256 bytes round-trip)", check.action);
        } else {
            failed += 1;
            let preview: Vec<String> = check.failures.iter().take(8).map(|b| b.to_string()).collect();
            println!(
                "  {:<4} FAILED on {} bytes (first: {})",
                check.action,
                check.failures.len(),
                preview.join(", ")
            );
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} actions are not invertible", failed, checks.len());
    }
    println!("All {} actions are invertible.", checks.len());
    Ok(())
}
