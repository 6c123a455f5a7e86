//! Gaussian mixture densities and their EM estimation.
//!
//! `fit_mixture` is shared by both Bayes classifiers: the full-covariance
//! classifier fits one mixture per class, the naive variant one 1-D mixture per
//! class and feature.
pub mod em;
pub mod gaussian;
pub mod model;

pub use em::{fit_mixture, MixtureFit};
pub use gaussian::GaussianDensity;
pub use model::GaussianMixture;
