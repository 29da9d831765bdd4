// src/cli.rs
use clap::Parser;
use std::path::PathBuf;

/// Boots the podcast app shell and visits each PATH in turn.
#[derive(Debug, Parser)]
#[command(name = "podroute", version, about)]
pub struct Cli {
    /// JSON config file; values given on the command line win over it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the podcast backend
    #[arg(long)]
    pub api_url: Option<String>,

    /// Serve podcasts from a JSON fixture instead of the backend
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Document element to mount into
    #[arg(long)]
    pub mount_point: Option<String>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Locations to navigate to, in order
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_overrides() {
        let cli = Cli::try_parse_from([
            "podroute",
            "--fixture",
            "podcasts.json",
            "--log-level",
            "debug",
            "/app",
            "/app/podcast/7",
        ])
        .unwrap();

        assert_eq!(cli.fixture, Some(PathBuf::from("podcasts.json")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.paths, vec!["/app".to_string(), "/app/podcast/7".to_string()]);
        assert!(cli.api_url.is_none());
    }
}
