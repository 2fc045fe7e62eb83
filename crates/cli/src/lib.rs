//! CLI tool for inspecting consistent hash rings.
//!
//! Provides commands for:
//! - Resolving keys to their owning node and replica chain
//! - Inspecting ring state (nodes, weights, slot counts)
//! - Measuring how evenly sample keys spread across nodes

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, HasherKind, Topology};
