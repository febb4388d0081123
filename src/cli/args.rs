//! CLI argument definitions.

use super::validators::parse_radius_km;
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Cluster environmental sensors by proximity and label the clusters.
#[derive(Debug, Parser)]
#[command(name = "ecohub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "ECOHUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only print warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cluster the snapshot and print the clusters.
    Clusters(ClustersArgs),
    /// Print the next or previous sensor in the same cluster.
    Navigate(NavigateArgs),
    /// List the location names present in the snapshot.
    Locations(SourceArgs),
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Where to read the snapshot from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Snapshot file (.json, .csv) or http(s) URL (default: `snapshot.source` in config).
    #[arg(env = "ECOHUB_SOURCE")]
    pub input: Option<String>,
}

/// Clustering options shared by commands that build clusters.
#[derive(Debug, Clone, Args)]
pub struct ClusterArgs {
    /// Neighbourhood radius in kilometres.
    #[arg(long, value_parser = parse_radius_km, env = "ECOHUB_RADIUS_KM")]
    pub radius_km: Option<f64>,

    /// Minimum neighbourhood size for a core point.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..), env = "ECOHUB_MIN_POINTS")]
    pub min_points: Option<u64>,

    /// Only cluster sensors at these locations (repeatable or comma-separated).
    #[arg(short, long = "location", value_delimiter = ',', env = "ECOHUB_LOCATIONS")]
    pub locations: Option<Vec<String>>,
}

/// Arguments for the clusters command.
#[derive(Debug, Args)]
pub struct ClustersArgs {
    /// Snapshot source.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Clustering options.
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Skip reverse geocoding of cluster centroids.
    #[arg(long, env = "ECOHUB_NO_LABELS")]
    pub no_labels: bool,

    /// Output format (table, json, csv).
    #[arg(short, long, default_value_t = OutputFormat::Table, env = "ECOHUB_FORMAT")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the navigate command.
#[derive(Debug, Args)]
pub struct NavigateArgs {
    /// Snapshot source.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Clustering options.
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Module id of the currently selected sensor.
    #[arg(short, long)]
    pub sensor: String,

    /// Step backward instead of forward.
    #[arg(long)]
    pub previous: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_clusters_defaults() {
        let cli = Cli::try_parse_from(["ecohub", "clusters", "snapshot.json"]).unwrap();
        let Command::Clusters(args) = cli.command else {
            panic!("expected clusters command");
        };
        assert_eq!(args.source.input.as_deref(), Some("snapshot.json"));
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.cluster.radius_km, None);
        assert!(!args.no_labels);
    }

    #[test]
    fn test_cli_parse_clusters_with_options() {
        let cli = Cli::try_parse_from([
            "ecohub",
            "clusters",
            "snapshot.csv",
            "--radius-km",
            "0.25",
            "--min-points",
            "2",
            "--location",
            "Cabot Center,ISEC Terrace",
            "--no-labels",
            "-f",
            "json",
            "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
        let Command::Clusters(args) = cli.command else {
            panic!("expected clusters command");
        };
        assert_eq!(args.cluster.radius_km, Some(0.25));
        assert_eq!(args.cluster.min_points, Some(2));
        assert_eq!(
            args.cluster.locations,
            Some(vec!["Cabot Center".to_string(), "ISEC Terrace".to_string()])
        );
        assert!(args.no_labels);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_rejects_invalid_cluster_options() {
        assert!(Cli::try_parse_from(["ecohub", "clusters", "--radius-km", "-1"]).is_err());
        assert!(Cli::try_parse_from(["ecohub", "clusters", "--min-points", "0"]).is_err());
        assert!(Cli::try_parse_from(["ecohub", "clusters", "-f", "parquet"]).is_err());
    }

    #[test]
    fn test_cli_parse_navigate() {
        let cli =
            Cli::try_parse_from(["ecohub", "navigate", "s.json", "--sensor", "B", "--previous"])
                .unwrap();
        let Command::Navigate(args) = cli.command else {
            panic!("expected navigate command");
        };
        assert_eq!(args.sensor, "B");
        assert!(args.previous);
    }

    #[test]
    fn test_cli_navigate_requires_sensor() {
        assert!(Cli::try_parse_from(["ecohub", "navigate", "s.json"]).is_err());
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["ecohub", "config", "show", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
    }
}
