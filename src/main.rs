use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use lpi_distance::{DEFAULT_MAX_ITER, DEFAULT_OMEGA, DEFAULT_P, Lpi, MeanConfig, Medoid, NormOrder};
use lpi_io::{Dataset, ExperimentName, ResultWriter, SequenceReader};

#[derive(Parser)]
#[command(name = "lpi")]
#[command(about = "Local permutation invariant distance, medoid and mean for load profiles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared metric parameters.
#[derive(Args, Debug, Clone, Copy)]
struct MetricArgs {
    /// Window radius: how many positions a sample may move (0 = plain Lp norm)
    #[arg(long, default_value_t = DEFAULT_OMEGA)]
    omega: usize,

    /// Norm order, at least 1
    #[arg(long, default_value_t = DEFAULT_P)]
    p: f64,
}

impl MetricArgs {
    fn lpi(self) -> Result<Lpi> {
        let norm = NormOrder::new(self.p).context("invalid --p")?;
        Ok(Lpi::new(self.omega).with_norm(norm))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compare two sequences from a CSV file
    Distance {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        /// Id of the reference sequence (the truth)
        #[arg(long)]
        reference: String,

        /// Id of the candidate sequence (the prediction)
        #[arg(long)]
        candidate: String,

        #[command(flatten)]
        metric: MetricArgs,
    },

    /// Compute the full pairwise distance matrix and the medoid
    Pairwise {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        metric: MetricArgs,
    },

    /// Approximate the mean sequence of a collection
    Mean {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Number of refinement iterations
        #[arg(long, default_value_t = DEFAULT_MAX_ITER)]
        max_iter: usize,

        /// Stop once the center moves less than this (runs all iterations if unset)
        #[arg(long)]
        tol: Option<f64>,

        #[command(flatten)]
        metric: MetricArgs,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct DistanceOutput<'a> {
    reference: &'a str,
    candidate: &'a str,
    omega: usize,
    p: f64,
    distance: f64,
    adjusted_error: f64,
    plain_error: f64,
    max_displacement: usize,
    permuted_candidate: Vec<f64>,
}

#[derive(Serialize)]
struct PairwiseOutput {
    experiment: String,
    n_sequences: usize,
    medoid: String,
    medoid_total_distance: f64,
    max_asymmetry: f64,
    artifact: PathBuf,
}

#[derive(Serialize)]
struct MeanOutput {
    experiment: String,
    n_sequences: usize,
    medoid: String,
    iterations: usize,
    converged: bool,
    final_delta: f64,
    artifact: PathBuf,
}

fn read_dataset(path: &Path) -> Result<Dataset> {
    let dataset = SequenceReader::new(path)
        .read()
        .with_context(|| format!("failed to read input CSV {}", path.display()))?;
    info!(n_sequences = dataset.len(), "dataset loaded");
    Ok(dataset)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Distance {
            data,
            reference,
            candidate,
            metric,
        } => {
            let lpi = metric.lpi()?;
            let dataset = read_dataset(&data)?;
            let y_true = dataset.get(&reference)?;
            let y_pred = dataset.get(&candidate)?;

            let comparison = lpi.compare(y_true, y_pred).context("alignment failed")?;
            info!(
                distance = %comparison.distance,
                adjusted_error = comparison.adjusted_error,
                plain_error = comparison.plain_error,
                "distance computed"
            );

            let output = DistanceOutput {
                reference: &reference,
                candidate: &candidate,
                omega: metric.omega,
                p: lpi.norm().value(),
                distance: comparison.distance.value(),
                adjusted_error: comparison.adjusted_error,
                plain_error: comparison.plain_error,
                max_displacement: comparison.assignment.max_displacement(),
                permuted_candidate: comparison.permuted.into_inner(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Pairwise {
            data,
            experiment,
            output_dir,
            metric,
        } => {
            let lpi = metric.lpi()?;
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let dataset = read_dataset(&data)?;
            let views = dataset.views();

            let matrix = lpi
                .pairwise(&views)
                .context("pairwise computation failed")?;
            let medoid =
                Medoid::from_matrix(&matrix, &views).context("medoid selection failed")?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let artifact = writer.write_pairwise(&dataset.ids, &lpi, &matrix, &medoid)?;

            let output = PairwiseOutput {
                experiment,
                n_sequences: dataset.len(),
                medoid: dataset.ids[medoid.index].to_string(),
                medoid_total_distance: medoid.total_distance,
                max_asymmetry: matrix.max_asymmetry(),
                artifact,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Mean {
            data,
            experiment,
            output_dir,
            max_iter,
            tol,
            metric,
        } => {
            let config = MeanConfig::from_lpi(metric.lpi()?)
                .with_max_iter(max_iter)
                .with_tol(tol);
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let dataset = read_dataset(&data)?;

            let result = config
                .average(&dataset.views())
                .context("mean computation failed")?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let artifact = writer.write_mean(&dataset.ids, &config, &result)?;

            let output = MeanOutput {
                experiment,
                n_sequences: dataset.len(),
                medoid: dataset.ids[result.medoid_index].to_string(),
                iterations: result.iterations,
                converged: result.converged,
                final_delta: result.final_delta,
                artifact,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
