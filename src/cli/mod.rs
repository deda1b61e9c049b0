//! Command-line interface

pub mod args;
pub mod commands;
mod scan;

pub use args::{Cli, Commands};
