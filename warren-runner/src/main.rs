mod sweep;

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossbeam_channel::{bounded, Receiver};
use hdrhistogram::Histogram;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use warren_config::{load_config, Config};
use warren_simulation::{Simulation, DAYS_PER_WEEK, WEEKS_PER_MONTH};
use warren_transport::{
    report, BinarySerializer, FileSender, JsonSerializer, Sender, Serializer, Snapshot, StdioSender,
};

const DAYS_PER_MONTH: u64 = DAYS_PER_WEEK * WEEKS_PER_MONTH;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rabbits, foxes and grass on a grid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print a summary
    Run(RunArgs),
    /// Vary one parameter and average repeated trials
    Sweep(SweepArgs),
}

#[derive(Args, Debug)]
struct WorldArgs {
    /// Path to a TOML or JSON configuration file; built-in defaults otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured seed
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    world: WorldArgs,

    /// Months to simulate
    #[arg(short, long, default_value_t = 1)]
    months: u64,

    /// Emit a snapshot every N days (0 disables snapshots)
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,

    /// Snapshot encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Write snapshots to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    world: WorldArgs,

    /// Parameter to vary, e.g. num_foxes or plant_chance
    #[arg(short, long)]
    param: String,

    /// Comma-separated values to try
    #[arg(short, long, value_delimiter = ',', required = true)]
    values: Vec<f64>,

    /// Trials per value
    #[arg(short, long, default_value_t = 10)]
    trials: usize,

    /// Days per trial
    #[arg(short, long, default_value_t = DAYS_PER_MONTH)]
    days: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Binary,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Sweep(args) => run_sweep(args),
    }
}

fn resolve_config(args: &WorldArgs) -> Config {
    let mut config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => {
                info!("Using configuration from {}", path.display());
                config
            }
            Err(e) => {
                eprintln!("Failed to load config: {:?}", e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config
}

fn run(args: RunArgs) {
    println!("Warren Simulation Runner");

    let config = resolve_config(&args.world);
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Failed to build simulation: {}", e);
            process::exit(1);
        }
    };
    info!(
        "Starting with {} plants, {} rabbits, {} foxes",
        sim.plants().len(),
        sim.herbivores().len(),
        sim.carnivores().len()
    );

    let mut output = (args.snapshot_every > 0).then(|| {
        (
            create_serializer(args.output),
            create_sender(args.out.as_deref()),
        )
    });

    let interrupted = interrupt_channel();
    let mut day_times = match Histogram::<u64>::new(3) {
        Ok(histogram) => histogram,
        Err(e) => {
            eprintln!("Failed to create histogram: {}", e);
            process::exit(1);
        }
    };

    let total_days = args.months * DAYS_PER_MONTH;
    for _ in 0..total_days {
        if interrupted.try_recv().is_ok() {
            warn!("Interrupted after {} days", sim.day());
            break;
        }

        let started = Instant::now();
        sim.advance_day();
        let micros = started.elapsed().as_micros() as u64;
        if let Err(e) = day_times.record(micros) {
            warn!("Day time {}us not recorded: {}", micros, e);
        }

        if let Some((serializer, sender)) = output.as_mut() {
            if sim.day() % args.snapshot_every == 0 {
                emit_snapshot(&sim, serializer.as_ref(), sender.as_mut());
            }
        }

        if sim.day() % DAYS_PER_MONTH == 0 {
            info!(
                "Month {}: {} plants, {} rabbits, {} foxes",
                sim.day() / DAYS_PER_MONTH,
                sim.plants().len(),
                sim.herbivores().len(),
                sim.carnivores().len()
            );
        }
    }

    println!("{}", report(&sim));
    if !day_times.is_empty() {
        println!(
            "Day timings: mean {:.0}us, p50 {}us, p99 {}us, max {}us",
            day_times.mean(),
            day_times.value_at_quantile(0.5),
            day_times.value_at_quantile(0.99),
            day_times.max()
        );
    }
}

fn run_sweep(args: SweepArgs) {
    println!("Warren Parameter Sweep");

    let config = resolve_config(&args.world);
    match sweep::sweep(&config, &args.param, &args.values, args.trials, args.days) {
        Ok(rows) => print!("{}", sweep::format_table(&args.param, &rows)),
        Err(e) => {
            eprintln!("Sweep failed: {}", e);
            process::exit(1);
        }
    }
}

/// Ctrl+C ends the run after the current day.
fn interrupt_channel() -> Receiver<()> {
    let (tx, rx) = bounded(1);
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    }) {
        warn!("Could not install Ctrl+C handler: {}", e);
    }
    rx
}

fn emit_snapshot(sim: &Simulation, serializer: &dyn Serializer, sender: &mut dyn Sender) {
    let snapshot = Snapshot::capture(sim);
    let result = serializer
        .serialize(&snapshot)
        .and_then(|line| sender.send(line.as_bytes()));
    if let Err(e) = result {
        eprintln!("Failed to emit snapshot for day {}: {}", sim.day(), e);
        process::exit(1);
    }
}

fn create_serializer(format: OutputFormat) -> Box<dyn Serializer> {
    match format {
        OutputFormat::Json => Box::new(JsonSerializer),
        OutputFormat::Binary => Box::new(BinarySerializer),
    }
}

fn create_sender(out: Option<&Path>) -> Box<dyn Sender> {
    match out {
        Some(path) => match FileSender::create(path) {
            Ok(sender) => Box::new(sender),
            Err(e) => {
                eprintln!("Failed to open {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Box::new(StdioSender::new()),
    }
}
