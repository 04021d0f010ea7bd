use ndarray::Array2;
use pkmeans::{
    Execution, Initializer, KMeans, KMeansConfig, Provided, RandomSample, Sequential, WorkerPool,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

const POINTS: usize = 997;
const DIM: usize = 3;
const K: usize = 6;

fn random_points(seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((POINTS, DIM), |_| rng.gen_range(-100.0..100.0))
}

fn blobs(seed: u64, centers: &[[f64; 2]], per_center: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let mut data = Array2::zeros((centers.len() * per_center, 2));
    for (i, mut row) in data.rows_mut().into_iter().enumerate() {
        let center = centers[i % centers.len()];
        row[0] = center[0] + noise.sample(&mut rng);
        row[1] = center[1] + noise.sample(&mut rng);
    }
    data
}

#[test]
fn parallel_matches_serial_for_any_worker_count() {
    let data = random_points(42);
    let initial = RandomSample::seeded(7)
        .initial_centroids(&data.view(), K)
        .unwrap();
    let config = KMeansConfig::new(K, DIM).with_min_change(1e-9);

    let expected = KMeans::serial(config.clone())
        .unwrap()
        .fit(&data.view(), &mut Provided(initial.clone()))
        .unwrap();
    assert!(expected.converged);

    for workers in [1, 2, 3, 4, 7, 16, POINTS + 3] {
        let kmeans = KMeans::parallel(config.clone().with_workers(workers)).unwrap();
        let result = kmeans
            .fit(&data.view(), &mut Provided(initial.clone()))
            .unwrap();
        assert_eq!(result.clusters, expected.clusters, "workers = {workers}");
        assert_eq!(result.centroids, expected.centroids, "workers = {workers}");
        assert_eq!(result.iterations, expected.iterations, "workers = {workers}");
    }
}

#[test]
fn single_assignment_matches_serial() {
    let data = random_points(3);
    let centroids = RandomSample::seeded(5)
        .initial_centroids(&data.view(), K)
        .unwrap();
    let expected = Sequential.assign(&data.view(), &centroids.view());
    for workers in 1..=9 {
        let pool = WorkerPool::new(workers).unwrap();
        assert_eq!(pool.assign(&data.view(), &centroids.view()), expected);
    }
}

#[test]
fn every_point_is_assigned_exactly_once_per_iteration() {
    let data = random_points(11);
    let kmeans = KMeans::parallel(KMeansConfig::new(K, DIM).with_workers(5)).unwrap();
    let mut centroids = RandomSample::seeded(1)
        .initial_centroids(&data.view(), K)
        .unwrap();
    for _ in 0..10 {
        let step = kmeans.step(&data.view(), &centroids.view()).unwrap();
        let mut seen = vec![0usize; POINTS];
        for cluster in &step.clusters {
            for &idx in &cluster.members {
                seen[idx] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
        centroids = step.centroids;
    }
}

#[test]
fn inertia_never_increases() {
    let data = random_points(19);
    let kmeans = KMeans::parallel(KMeansConfig::new(K, DIM).with_workers(4)).unwrap();
    let result = kmeans
        .fit(&data.view(), &mut RandomSample::seeded(23))
        .unwrap();
    assert!(!result.history.is_empty());
    for pair in result.history.windows(2) {
        assert!(
            pair[1].inertia <= pair[0].inertia * (1.0 + 1e-12),
            "inertia went from {} to {}",
            pair[0].inertia,
            pair[1].inertia
        );
    }
    let last = result.history.last().unwrap();
    assert_eq!(last.movement, result.movement);
    assert!((last.inertia - result.inertia(&data.view())).abs() < 1e-6);
}

#[test]
fn terminal_centroids_are_a_fixed_point() {
    let centers = [[0.0, 0.0], [40.0, 0.0], [0.0, 40.0], [40.0, 40.0]];
    let data = blobs(8, &centers, 50);
    let config = KMeansConfig::new(4, 2).with_workers(3);
    let kmeans = KMeans::parallel(config).unwrap();
    let result = kmeans
        .fit(&data.view(), &mut RandomSample::seeded(2))
        .unwrap();
    assert!(result.converged);
    assert!(result.movement <= kmeans.config().min_change);

    let step = kmeans.step(&data.view(), &result.centroids.view()).unwrap();
    assert_eq!(step.movement, 0.0);
    assert_eq!(step.clusters, result.clusters);
}

#[test]
fn points_are_never_modified() {
    let data = random_points(31);
    let original = data.clone();
    let kmeans = KMeans::parallel(KMeansConfig::new(K, DIM).with_workers(6)).unwrap();
    let result = kmeans
        .fit(&data.view(), &mut RandomSample::seeded(4))
        .unwrap();
    assert_eq!(data, original);

    for (cluster, points) in result
        .clusters
        .iter()
        .zip(result.cluster_points(&data.view()))
    {
        for (&idx, row) in cluster.members.iter().zip(points.rows()) {
            assert_eq!(row, original.row(idx));
        }
    }
}

#[test]
fn same_seed_gives_same_run() {
    let data = random_points(77);
    let kmeans = KMeans::parallel(KMeansConfig::new(K, DIM).with_workers(3)).unwrap();
    let a = kmeans
        .fit(&data.view(), &mut RandomSample::seeded(9))
        .unwrap();
    let b = kmeans
        .fit(&data.view(), &mut RandomSample::seeded(9))
        .unwrap();
    assert_eq!(a.clusters, b.clusters);
    assert_eq!(a.centroids, b.centroids);
}
