//! Dense linear algebra helpers used by the Gaussian densities.
//!
//! The covariance matrices handled here are small (features × features), so a
//! plain LU factorisation in pure Rust is enough and keeps the crate free of
//! BLAS/LAPACK system dependencies.
pub mod linalg;

pub use linalg::{LinalgError, LuDecomposition};
