//! Command-line interface.
//!
//! Without a subcommand the binary launches the preview; the subcommands
//! inspect the composition without a terminal UI.

mod commands;
mod common;
pub mod completions;

pub use commands::{Cli, Commands};
pub use common::*;
