//! CLI module for trafficlight - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running waiting
//! watchers against a light and for sampling its phase.

pub mod commands;

pub use commands::Cli;
