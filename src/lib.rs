//! Process-sensor grid plots.
//!
//! Reads a GBK-encoded CSV export, cuts a row window out of it, draws one
//! line panel per variable in a two-column grid and prints descriptive
//! statistics for the window.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;

pub use error::{Error, Result};
