//! LumiCal batch reconstruction binary.
//!
//! Reads calibrated hits from a JSON event file, keeps the layers of the
//! selected detector, clusters every event and writes one JSON line of
//! clusters per event.

mod config;
mod input;
mod output;
mod progress;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lumi_cluster::{par_reconstruct_events, reconstruct_events, ClusterEngine};
use lumi_core::types::DetectorKind;
use tracing::{error, info, warn};

use crate::config::{LayerRange, RecoConfig};
use crate::progress::ProgressObserver;

/// LumiCal cluster reconstruction.
#[derive(Parser, Debug)]
#[command(
    name = "lumi-reco",
    version,
    about = "Tower clustering and cluster merging for LumiCal test-beam events"
)]
struct Args {
    /// JSON file with an array of events
    input: PathBuf,

    /// Write JSON lines here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Detector weighting policy ("calorimeter" or "tracker")
    #[arg(long)]
    detector: Option<DetectorKind>,

    /// Skip the cluster merge loop
    #[arg(long)]
    no_merge: bool,

    /// First layer to keep
    #[arg(long)]
    first_layer: Option<i32>,

    /// Last layer to keep
    #[arg(long)]
    last_layer: Option<i32>,

    /// Reconstruct events one at a time on the main thread
    #[arg(long)]
    sequential: bool,

    /// Add per-event summary quantities to every output line
    #[arg(long)]
    summary: bool,

    /// Log progress every N events (0 disables)
    #[arg(long)]
    progress_every: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long)]
    log_format: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut RecoConfig) {
        if let Some(detector) = self.detector {
            config.cluster.detector = detector;
        }
        if self.no_merge {
            config.cluster.merging = false;
        }
        if self.sequential {
            config.parallel = false;
        }
        if let Some(every) = self.progress_every {
            config.progress_every = every;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if self.first_layer.is_some() || self.last_layer.is_some() {
            let default = config.layer_range();
            config.layers = Some(LayerRange {
                first: self.first_layer.unwrap_or(*default.start()),
                last: self.last_layer.unwrap_or(*default.end()),
            });
        }
    }
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    };

    init_logging(&config.log_level, &config.log_format);

    if let Err(e) = run(&args, &config) {
        error!("{e:#}");
        process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<RecoConfig> {
    let mut config = RecoConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &RecoConfig) -> Result<()> {
    info!("LumiCal reco v{}", env!("CARGO_PKG_VERSION"));
    info!(
        detector = %config.cluster.detector,
        merging = config.cluster.merging,
        w0 = config.cluster.log_weight_w0,
        parallel = config.parallel,
        "configuration"
    );

    let mut events = input::read_events(&args.input)?;
    let layers = config.layer_range();
    let dropped = input::select_layers(&mut events, &layers);
    info!(
        events = events.len(),
        first_layer = *layers.start(),
        last_layer = *layers.end(),
        dropped_hits = dropped,
        "events loaded"
    );
    if events.is_empty() {
        warn!("input contains no events");
    }

    let engine = ClusterEngine::with_config(config.cluster)?;
    let progress = ProgressObserver::new(config.progress_every, events.len() as u64);
    let started = Instant::now();
    let reconstructions = if config.parallel {
        par_reconstruct_events(&engine, &events, &progress)?
    } else {
        reconstruct_events(&engine, &events, &progress)?
    };
    let n_clusters: usize = reconstructions.iter().map(|r| r.clusters.len()).sum();
    info!(
        events = progress.finished(),
        clusters = n_clusters,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "reconstruction finished"
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    output::write_records(&mut out, &reconstructions, args.summary)?;
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// `RUST_LOG` takes precedence over `level_str`. Logs go to stderr so that
/// stdout carries only reconstruction output.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .init();
    }
}
