//! Plotly figures for model diagnostics.
pub mod plots;
