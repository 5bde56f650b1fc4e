//! docs-scraper: fetch documentation pages, locate elements and tabulate the results.

pub mod cache;
pub mod constants;
pub mod fetch;
pub mod format;
pub mod locate;
pub mod progress;
pub mod routines;
pub mod types;

pub use cache::ResponseCache;
pub use fetch::{FetchOutcome, Fetcher, HttpResponse};
pub use format::{render, OutputMode};
pub use locate::{locate, TagQuery, TagTree};
pub use routines::{run_mode, Mode, RoutineOutput};
pub use types::*;
