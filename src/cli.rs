//! CLI argument parsing module for libcheck

use clap::Parser;
use std::path::PathBuf;

/// Checks pinned library versions against the release registries
#[derive(Parser, Debug, Clone)]
#[command(
    name = "libcheck",
    version,
    about = "Checks pinned library versions against the release registries"
)]
pub struct CliArgs {
    /// Build descriptor to scan, e.g. project/MicroServiceBuild.scala
    #[arg(short, long)]
    pub file: PathBuf,

    /// Directory containing config.toml (required with --migration)
    #[arg(short, long, default_value = ".")]
    pub config: PathBuf,

    /// Highlight libraries listed for removal in config.toml
    #[arg(short, long)]
    pub migration: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Disable colored table output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["libcheck", "--file", "build.sbt"]);
        assert_eq!(args.file, PathBuf::from("build.sbt"));
        assert_eq!(args.config, PathBuf::from("."));
        assert!(!args.migration);
        assert!(!args.json);
        assert!(!args.no_color);
        assert!(!args.verbose);
    }

    #[test]
    fn test_file_is_required() {
        let result = CliArgs::try_parse_from(["libcheck"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_short_flags() {
        let args = CliArgs::parse_from(["libcheck", "-f", "build.sbt", "-c", "/etc/libcheck", "-m", "-v"]);
        assert_eq!(args.config, PathBuf::from("/etc/libcheck"));
        assert!(args.migration);
        assert!(args.verbose);
    }

    #[test]
    fn test_file_equals_syntax() {
        let args = CliArgs::parse_from(["libcheck", "--file=MicroServiceBuild.scala", "--json"]);
        assert_eq!(args.file, PathBuf::from("MicroServiceBuild.scala"));
        assert!(args.json);
    }

    #[test]
    fn test_no_color_flag() {
        let args = CliArgs::parse_from(["libcheck", "-f", "build.sbt", "--no-color"]);
        assert!(args.no_color);
    }

    #[test]
    fn test_version_flag() {
        let result = CliArgs::try_parse_from(["libcheck", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
