use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use ndarray::{Array2, Axis};
use ndarray_rand::RandomExt;
use pkmeans::{points_from_rows, Clustering, KMeans, KMeansConfig, RandomSample};
use rand::distributions::Uniform;
use rand::prelude::*;
use rand_distr::Normal;
use tracing_subscriber::EnvFilter;

/// Runs serial and parallel k-means on the same points and compares them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Headerless CSV file with one point per line. Synthetic blobs are
    /// generated when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Number of clusters.
    #[arg(short, long, default_value_t = 5)]
    k: usize,

    /// Coordinates per point.
    #[arg(short, long, default_value_t = 4)]
    dimension: usize,

    /// Worker threads for the parallel run.
    #[arg(short, long, default_value_t = 7)]
    workers: usize,

    /// Convergence threshold on the summed centroid movement.
    #[arg(long, default_value_t = 1e-11)]
    min_change: f64,

    #[arg(long, default_value_t = 300)]
    max_iterations: usize,

    /// Seed for data generation and centroid sampling.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of synthetic points.
    #[arg(long, default_value_t = 100_000)]
    samples: usize,

    /// Standard deviation of synthetic points around their blob center.
    #[arg(long, default_value_t = 5.0)]
    spread: f64,
}

fn load_csv(path: &Path, dimension: usize) -> pkmeans::Result<Array2<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    points_from_rows(&rows, dimension)
}

/// Gaussian blobs around `k` random centers.
fn generate_blobs(
    rng: &mut StdRng,
    samples: usize,
    dimension: usize,
    k: usize,
    spread: f64,
) -> Result<Array2<f64>, rand_distr::NormalError> {
    let centers = Array2::random_using((k, dimension), Normal::new(50.0, 10.0)?, rng);
    let noise = Array2::random_using((samples, dimension), Normal::new(0.0, spread)?, rng);
    let blob = Uniform::new(0, k);
    let mut data = noise;
    for mut point in data.axis_iter_mut(Axis(0)) {
        point += &centers.row(blob.sample(rng));
    }
    Ok(data)
}

fn report(label: &str, result: &Clustering, elapsed: std::time::Duration) {
    tracing::info!(
        iterations = result.iterations,
        converged = result.converged,
        "k-means {label} took {elapsed:?}"
    );
    for (cluster_id, size) in result.sizes().iter().enumerate() {
        println!("Cluster {cluster_id}: {size} points");
    }
    println!("Total: {} points", result.sizes().iter().sum::<usize>());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);

    let data = match &args.input {
        Some(path) => load_csv(path, args.dimension)?,
        None => generate_blobs(&mut rng, args.samples, args.dimension, args.k, args.spread)?,
    };
    tracing::info!(
        points = data.nrows(),
        dimension = data.ncols(),
        k = args.k,
        seed,
        "dataset ready"
    );

    let config = KMeansConfig::new(args.k, args.dimension)
        .with_min_change(args.min_change)
        .with_workers(args.workers)
        .with_max_iterations(args.max_iterations);
    let init_seed = rng.gen();

    let serial = KMeans::serial(config.clone())?;
    let start = Instant::now();
    let serial_result = serial.fit(&data.view(), &mut RandomSample::seeded(init_seed))?;
    report("serial", &serial_result, start.elapsed());

    let parallel = KMeans::parallel(config)?;
    let start = Instant::now();
    let parallel_result = parallel.fit(&data.view(), &mut RandomSample::seeded(init_seed))?;
    report("parallel", &parallel_result, start.elapsed());

    if serial_result.clusters != parallel_result.clusters {
        tracing::warn!("serial and parallel memberships differ");
    }
    Ok(())
}
