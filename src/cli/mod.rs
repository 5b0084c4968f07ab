//! CLI argument parsing
//!
//! Uses clap for ergonomic CLI argument definitions.

pub mod args;

pub use args::{completions_script, generate_completions, version_string, Cli};
