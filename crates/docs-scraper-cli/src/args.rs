//! Command-line arguments and the validated run request built from them.

use clap::{Parser, ValueEnum};
use docs_scraper::{Mode, OutputMode};

#[derive(Parser, Debug)]
#[command(
    name = "docs-scraper",
    about = "Python documentation parser",
    version
)]
pub struct Cli {
    /// Parser mode.
    #[arg(value_enum)]
    pub mode: ModeArg,

    /// Clear the HTTP cache before running.
    #[arg(short, long)]
    pub clear_cache: bool,

    /// Additional output format (plain console lines when omitted).
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    WhatsNew,
    LatestVersions,
    Download,
    Pep,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::WhatsNew => Mode::WhatsNew,
            ModeArg::LatestVersions => Mode::LatestVersions,
            ModeArg::Download => Mode::Download,
            ModeArg::Pep => Mode::Pep,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputArg {
    Pretty,
    File,
}

/// A validated invocation. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    pub mode: Mode,
    pub output: OutputMode,
    pub clear_cache: bool,
}

impl From<Cli> for RunRequest {
    fn from(cli: Cli) -> Self {
        let output = match cli.output {
            None => OutputMode::Plain,
            Some(OutputArg::Pretty) => OutputMode::Pretty,
            Some(OutputArg::File) => OutputMode::File,
        };
        Self {
            mode: cli.mode.into(),
            output,
            clear_cache: cli.clear_cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<RunRequest, clap::Error> {
        let argv = std::iter::once("docs-scraper").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(RunRequest::from)
    }

    #[test]
    fn test_mode_names_match_library() {
        for mode in Mode::ALL {
            let request = parse(&[mode.as_str()]).unwrap();
            assert_eq!(request.mode, mode);
            assert_eq!(request.output, OutputMode::Plain);
            assert!(!request.clear_cache);
        }
    }

    #[test]
    fn test_flags() {
        let request = parse(&["pep", "-c", "-o", "file"]).unwrap();
        assert_eq!(
            request,
            RunRequest {
                mode: Mode::Pep,
                output: OutputMode::File,
                clear_cache: true,
            }
        );
        let request = parse(&["whats-new", "--output", "pretty", "--clear-cache"]).unwrap();
        assert_eq!(request.output, OutputMode::Pretty);
        assert!(request.clear_cache);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse(&["everything"]).is_err());
        assert!(parse(&["pep", "-o", "json"]).is_err());
        assert!(parse(&[]).is_err());
    }
}
