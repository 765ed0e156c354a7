use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use trafficlight::config::Config;
use trafficlight::{BackgroundTask, Phase, RngSource, TrafficLight};

mod cli;

use cli::Cli;
use cli::commands::{Commands, TimingArgs};

/// How long a watcher waits before logging that it is still stuck at the light
const PATIENCE: Duration = Duration::from_secs(15);

/// How often `watch` samples the current phase
const SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trafficlight")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("trafficlight.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Everything passes until the configured level is known
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .parse_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Level named in the config, `info` when unset or unrecognised
fn level_filter(level: Option<&str>) -> LevelFilter {
    level.and_then(|l| l.parse().ok()).unwrap_or(LevelFilter::Info)
}

/// Narrow logging to the configured level; RUST_LOG wins when set
fn apply_log_level(level: Option<&str>) {
    if std::env::var_os("RUST_LOG").is_none() {
        log::set_max_level(level_filter(level));
    }
}

fn build_light(config: &Config, args: &TimingArgs) -> Result<TrafficLight> {
    let mut cycle = config.cycle.clone();
    if let Some(min) = args.min_seconds {
        cycle.min_seconds = min;
    }
    if let Some(max) = args.max_seconds {
        cycle.max_seconds = max;
    }
    if args.seed.is_some() {
        cycle.seed = args.seed;
    }

    let timing = cycle.timing().context("Invalid cycle settings")?;
    let light = match cycle.seed {
        Some(seed) => TrafficLight::with_source(timing, RngSource::seeded(seed)),
        None => TrafficLight::with_timing(timing),
    }
    .context("Failed to build traffic light")?;

    info!("Built light cycling every {:?} to {:?}", timing.shortest(), timing.longest());
    Ok(light)
}

fn paint(phase: Phase) -> ColoredString {
    match phase {
        Phase::Stopped => phase.to_string().to_uppercase().red(),
        Phase::Go => phase.to_string().to_uppercase().green(),
    }
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_run_command(None, None, &TimingArgs::default(), config),
        Some(Commands::Run {
            watchers,
            crossings,
            timing,
        }) => handle_run_command(*watchers, *crossings, timing, config),
        Some(Commands::Watch { duration, timing }) => handle_watch_command(*duration, timing, config),
    }
}

fn handle_run_command(
    watchers: Option<usize>,
    crossings: Option<u32>,
    timing: &TimingArgs,
    config: &Config,
) -> Result<()> {
    let watchers = watchers.unwrap_or(config.demo.watchers);
    let crossings = crossings.unwrap_or(config.demo.crossings);
    info!("Running {} watchers for {} crossings each", watchers, crossings);

    let light = Arc::new(build_light(config, timing)?);
    light.start().context("Failed to start traffic light")?;
    println!("{} light is {}", "Started:".cyan(), paint(light.get_current_phase()));

    let mut tasks = Vec::with_capacity(watchers);
    for id in 1..=watchers {
        let light = Arc::clone(&light);
        let task = BackgroundTask::spawn(format!("watcher-{}", id), move || {
            for crossing in 1..=crossings {
                while !light.wait_for_green_timeout(PATIENCE) {
                    info!("Watcher {} still waiting, light is {}", id, light.get_current_phase());
                }
                println!(
                    "{} watcher {} crossed ({}/{})",
                    paint(Phase::Go),
                    id,
                    crossing,
                    crossings
                );
            }
        })
        .context("Failed to spawn watcher")?;
        tasks.push(task);
    }

    for task in tasks {
        let name = task.name().to_string();
        task.join().with_context(|| format!("Watcher {} failed", name))?;
    }

    println!("{}", "All watchers crossed".green());
    Ok(())
}

fn handle_watch_command(duration: u64, timing: &TimingArgs, config: &Config) -> Result<()> {
    info!("Watching light for {}s", duration);

    let light = build_light(config, timing)?;
    light.start().context("Failed to start traffic light")?;

    let started = Instant::now();
    let deadline = Duration::from_secs(duration);
    let mut last = light.get_current_phase();
    println!("{:>8.1}s  {}", 0.0, paint(last));

    while started.elapsed() < deadline {
        thread::sleep(SAMPLE_INTERVAL);
        let phase = light.get_current_phase();
        if phase != last {
            println!("{:>8.1}s  {}", started.elapsed().as_secs_f64(), paint(phase));
            last = phase;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Setup logging first so config fallback warnings are recorded
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(config.log_level.as_deref());

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
