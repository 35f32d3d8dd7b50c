use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ferrite_regress::tasks::{curve_fit, diamond_price};
use ferrite_regress::{CurveFitConfig, DiamondConfig, LossHistory};

/// Epochs skipped by the zoomed loss summary.
const ZOOM_FROM_EPOCH: usize = 10;

#[derive(Parser)]
#[command(name = "ferrite-regress")]
#[command(about = "Train from-scratch regression networks")]
struct Cli {
    /// Log every epoch
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit a single-hidden-layer network to y = 3x + 0.7x^2
    Curve(CurveArgs),
    /// Fit the three-hidden-layer dropout network to a diamond-price CSV
    Diamonds(DiamondArgs),
}

#[derive(Args)]
struct CurveArgs {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hidden layer size (default 64)
    #[arg(long)]
    hidden: Option<usize>,

    /// Learning rate (default 0.001)
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Number of epochs (default 10000)
    #[arg(long)]
    epochs: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct DiamondArgs {
    /// Path to the diamond CSV (header row, fixed column layout)
    #[arg(short, long)]
    data: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hidden layer sizes, comma separated (default 128,64,32)
    #[arg(long, value_delimiter = ',')]
    hidden: Option<Vec<usize>>,

    /// Learning rate (default 0.0001)
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Number of epochs (default 150)
    #[arg(long)]
    epochs: Option<usize>,

    /// Batch size (default 1024)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Dropout rate on the first hidden layer (default 0.2)
    #[arg(long)]
    dropout: Option<f64>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Curve(args) => run_curve(args),
        Command::Diamonds(args) => run_diamonds(args),
    }
}

fn run_curve(args: CurveArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => CurveFitConfig::load_json(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => CurveFitConfig::default(),
    };
    if let Some(hidden) = args.hidden {
        config.hidden_size = hidden;
    }
    if let Some(lr) = args.learning_rate {
        config.learning_rate = lr;
    }
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    info!("Hidden nodes: {}", config.hidden_size);
    info!("Learning rate: {}", config.learning_rate);
    info!("Epochs: {}", config.epochs);

    let report = curve_fit::run(&config)?;

    println!("\nTest Point Predictions:");
    println!("    x    |  Actual y  | Predicted y");
    println!("{}", "-".repeat(40));
    for probe in &report.probes {
        println!("{:8.1} | {:10.2} | {:10.2}", probe.x, probe.actual, probe.predicted);
    }
    print_loss_summary(&report.outcome.history);
    Ok(())
}

fn run_diamonds(args: DiamondArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => DiamondConfig::load_json(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => DiamondConfig::default(),
    };
    if let Some(hidden) = args.hidden {
        config.hidden_sizes = hidden;
    }
    if let Some(lr) = args.learning_rate {
        config.learning_rate = lr;
    }
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(dropout) = args.dropout {
        config.dropout_rate = dropout;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    info!("Hidden layer sizes: {:?}", config.hidden_sizes);
    info!("Learning rate: {}", config.learning_rate);
    info!("Epochs: {}", config.epochs);
    info!("Batch size: {}", config.batch_size);
    info!("Dropout rate: {}", config.dropout_rate);

    let report = diamond_price::run(&args.data, &config)
        .with_context(|| format!("training on {}", args.data.display()))?;

    println!("\nSample Predictions:");
    println!("  Actual  | Predicted");
    println!("{}", "-".repeat(25));
    for sample in &report.samples {
        println!("${:7.0} | ${:7.0}", sample.actual, sample.predicted);
    }
    println!("\nMean absolute error: ${:.2}", report.mean_absolute_error);
    print_loss_summary(&report.outcome.history);
    Ok(())
}

fn print_loss_summary(history: &LossHistory) {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        println!("\nNo epoch completed a full batch; no loss recorded.");
        return;
    };
    println!("\nLoss: first epoch {first:.6}, final epoch {last:.6}");
    let zoomed = history.tail(ZOOM_FROM_EPOCH);
    if let Some(min) = zoomed.iter().copied().reduce(f64::min) {
        println!("Lowest loss after epoch {ZOOM_FROM_EPOCH}: {min:.6}");
    }
}
