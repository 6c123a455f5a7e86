#![allow(dead_code)]

use ndarray::Array2;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `n` samples per center drawn from an isotropic normal with standard
/// deviation `sd`, labelled with the index of their center.
pub fn gaussian_clusters(
    centers: &[[f64; 2]],
    n: usize,
    sd: f64,
    seed: u64,
) -> (Array2<f64>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, sd).expect("valid normal distribution");

    let mut data = Vec::with_capacity(centers.len() * n * 2);
    let mut labels = Vec::with_capacity(centers.len() * n);
    for (label, center) in centers.iter().enumerate() {
        for _ in 0..n {
            data.push(center[0] + noise.sample(&mut rng));
            data.push(center[1] + noise.sample(&mut rng));
            labels.push(label);
        }
    }
    let x = Array2::from_shape_vec((labels.len(), 2), data).expect("row-major sample matrix");
    (x, labels)
}
