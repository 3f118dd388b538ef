//! CLI driver for the consistent hashing ring and the CAP simulator.
//!
//! Provides commands for:
//! - Inspecting a ring: positions, ownership and key distribution
//! - Replaying reads and writes through the CAP simulator in real time

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
