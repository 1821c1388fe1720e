//! SDF CLI library.
//!
//! Command-line front end for KPI evaluation and tracker creation.

pub mod cli;
pub mod commands;
