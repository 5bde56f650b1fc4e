//! docs-scraper command-line front-end: argument parsing, settings, logging and dispatch.

pub mod args;
pub mod config;
pub mod logging;
pub mod run;

pub use args::{Cli, RunRequest};
pub use config::Settings;
pub use run::execute;
