use anyhow::{bail, Context, Result};
use clap::Parser;
use seedsift::{OutputWriter, Pipeline, ReduceConfig, RunOutcome, RunReport};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "seedsift")]
#[command(about = "Reduce a fuzzing corpus to representative seeds of its coverage clusters")]
#[command(version)]
struct Args {
    /// Directory of seed files
    #[arg(short, long)]
    input: PathBuf,

    /// Directory of trace records (one per seed) or a file of keyed rows
    #[arg(short, long)]
    traces: PathBuf,

    /// Destination corpus directory (must be absent or empty)
    #[arg(short, long)]
    output: PathBuf,

    /// JSON configuration file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Feature slots per trace record
    #[arg(long)]
    width: Option<usize>,

    /// Field delimiter of trace records
    #[arg(long)]
    delimiter: Option<char>,

    /// Suffix appended to a seed name to find its trace
    #[arg(long)]
    trace_suffix: Option<String>,

    /// Vectors used to fit the projection
    #[arg(long)]
    sample_cap: Option<usize>,

    /// Vectors projected per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Neighbour quantile for bandwidth estimation
    #[arg(long)]
    quantile: Option<f64>,

    /// Divisor applied to the estimated bandwidth
    #[arg(long)]
    damping: Option<f64>,

    /// Fixed bandwidth, skips estimation
    #[arg(long)]
    bandwidth: Option<f64>,

    /// Representatives per cluster
    #[arg(long)]
    per_cluster: Option<usize>,

    /// Sample every cluster independently of earlier picks
    #[arg(long)]
    no_overlap: bool,

    /// Seed mean-shift from every point instead of grid bins
    #[arg(long)]
    no_bin_seeding: bool,

    /// Write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Compute the selection but copy nothing
    #[arg(long)]
    dry_run: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn config(&self) -> Result<ReduceConfig> {
        let mut config = match &self.config {
            Some(path) => ReduceConfig::from_json_file(path)?,
            None => ReduceConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(width) = self.width {
            config.feature_width = width;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(suffix) = &self.trace_suffix {
            config.trace_suffix = suffix.clone();
        }
        if let Some(cap) = self.sample_cap {
            config.sample_cap = cap;
        }
        if let Some(size) = self.batch_size {
            config.batch_size = size;
        }
        if let Some(q) = self.quantile {
            config.bandwidth_quantile = q;
        }
        if let Some(d) = self.damping {
            config.bandwidth_damping = d;
        }
        if let Some(b) = self.bandwidth {
            config.bandwidth = Some(b);
        }
        if let Some(n) = self.per_cluster {
            config.per_cluster = n;
        }
        if self.no_overlap {
            config.prefer_overlap = false;
        }
        if self.no_bin_seeding {
            config.bin_seeding = false;
        }

        Ok(config)
    }
}

/// The destination must not already hold a corpus
fn ensure_output_ready(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() {
        bail!("Output path {} exists and is not a directory", dir.display());
    }
    let mut entries =
        fs::read_dir(dir).context(format!("Failed to read output directory {}", dir.display()))?;
    if entries.next().is_some() {
        bail!("Output directory {} is not empty", dir.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let start_time = Instant::now();
    let config = args.config()?;
    let pipeline = Pipeline::new(config)?;

    if !args.dry_run {
        ensure_output_ready(&args.output)?;
    }

    // Step 1: Load seeds and traces
    let step1_start = Instant::now();
    let store = pipeline.load_store(&args.input, &args.traces)?;
    let step1_duration = step1_start.elapsed();

    // Step 2: Project, cluster, select
    let step2_start = Instant::now();
    let outcome = pipeline.reduce(&store)?;
    let step2_duration = step2_start.elapsed();

    let reduction = match outcome {
        RunOutcome::EmptyCorpus => {
            println!("Nothing to do: no usable seeds in {}", args.input.display());
            return Ok(());
        }
        RunOutcome::Reduced(reduction) => reduction,
    };

    // Step 3: Copy the selection
    let step3_start = Instant::now();
    if args.dry_run {
        info!("dry run, not copying seeds");
    } else {
        OutputWriter::new(&args.output).write(&store, &reduction.selection)?;
    }
    let step3_duration = step3_start.elapsed();

    if let Some(path) = &args.report {
        RunReport::build(&store, &reduction)?.write(path)?;
        info!(path = %path.display(), "wrote report");
    }

    println!("=== Reduction Statistics ===");
    println!("Usable seeds:         {}", store.len());
    println!("Skipped seeds:        {}", store.skipped().len());
    println!("Fit sample:           {}", reduction.sample_size);
    println!("Bandwidth:            {:.6}", reduction.clusters.bandwidth);
    println!(
        "Clusters:             {}{}",
        reduction.clusters.len(),
        if reduction.clusters.degenerate {
            " (degenerate)"
        } else {
            ""
        }
    );
    println!("Selected seeds:       {}", reduction.selection.len());
    println!(
        "Reduction:            {:.1}%",
        100.0 * (1.0 - reduction.selection.len() as f64 / store.len() as f64)
    );
    println!("RNG seed:             {}", reduction.rng_seed);

    let total_duration = start_time.elapsed();
    println!("\n=== Timing Breakdown ===");
    println!("Load:                 {:.3}s", step1_duration.as_secs_f64());
    println!("Reduce:               {:.3}s", step2_duration.as_secs_f64());
    println!("Write:                {:.3}s", step3_duration.as_secs_f64());
    println!("─────────────────────────────────");
    println!("Total execution:      {:.3}s", total_duration.as_secs_f64());

    Ok(())
}
