//! Ecohub - proximity clustering for environmental sensor networks.
//!
//! Groups the latest readings of geolocated air-quality sensors into
//! density-based clusters, labels each cluster through reverse geocoding
//! and answers next/previous navigation within a sensor's cluster.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod labels;
pub mod monitor;
pub mod navigation;
pub mod output;
pub mod sensor;
pub mod spatial;

use clap::Parser;
use cli::{Cli, ClusterArgs, ClustersArgs, Command, ConfigAction, NavigateArgs, SourceArgs};
use config::{
    Config, config_file_path, load_config_file, load_default_config, save_config, validate_config,
};
use futures_util::future::join_all;
use labels::{LabelEnricher, LabelStore, MapboxGeocoder};
use monitor::SensorMonitor;
use output::{ReportContext, RunSettings, write_clusters};
use sensor::{LocationFilter, SensorReading, available_locations, load_snapshot};
use spatial::ClusterParams;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use error::{Error, Result};

/// Main entry point for ecohub CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Clusters(args) => run_clusters(&args, load_config(config_path)?),
        Command::Navigate(args) => run_navigate(&args, load_config(config_path)?),
        Command::Locations(args) => run_locations(&args, &load_config(config_path)?),
        Command::Config { action } => handle_config_command(action, config_path),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // Results go to stdout; keep logs on stderr.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load and validate the config file, explicit path first.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => load_config_file(path)?,
        None => load_default_config()?,
    };
    validate_config(&config)?;
    Ok(config)
}

fn resolve_config_path(path: Option<&Path>) -> Result<PathBuf> {
    path.map_or_else(config_file_path, |p| Ok(p.to_path_buf()))
}

/// Apply CLI clustering overrides on top of the config file.
fn apply_cluster_args(config: &mut Config, args: &ClusterArgs) -> Result<()> {
    if let Some(radius) = args.radius_km {
        config.clustering.max_distance_km = radius;
    }
    if let Some(min_points) = args.min_points {
        config.clustering.min_points =
            usize::try_from(min_points).map_err(|_| Error::ConfigValidation {
                message: format!("min_points {min_points} is too large"),
            })?;
    }
    if let Some(locations) = &args.locations {
        config.filter.locations = Some(locations.clone());
    }
    validate_config(config)
}

fn snapshot_source(args: &SourceArgs, config: &Config) -> Result<String> {
    args.input
        .clone()
        .or_else(|| config.snapshot.source.clone())
        .ok_or(Error::NoSnapshotSource)
}

fn new_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("failed to create async runtime: {e}"),
    })
}

fn load_readings(runtime: &tokio::runtime::Runtime, source: &str) -> Result<Vec<SensorReading>> {
    let readings = runtime.block_on(load_snapshot(source))?;
    info!("Loaded {} sensor reading(s) from {source}", readings.len());
    Ok(readings)
}

/// Build a geocoder if labels are wanted and one can be configured.
fn label_enricher(config: &Config, no_labels: bool) -> Option<LabelEnricher> {
    if no_labels || !config.geocoding.enabled {
        debug!("Cluster labels disabled");
        return None;
    }

    match MapboxGeocoder::from_config(&config.geocoding) {
        Ok(geocoder) => Some(LabelEnricher::new(Arc::new(geocoder), LabelStore::new())),
        Err(e) => {
            warn!("Cluster labels skipped: {e}");
            None
        }
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| Error::Output {
                reason: format!("cannot create '{}': {e}", path.display()),
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

fn run_clusters(args: &ClustersArgs, mut config: Config) -> Result<()> {
    apply_cluster_args(&mut config, &args.cluster)?;
    let source = snapshot_source(&args.source, &config)?;
    let params = ClusterParams::from(config.clustering);
    let filter = LocationFilter::from_names(config.filter.locations.clone());
    let enricher = label_enricher(&config, args.no_labels);
    let labels = enricher.is_some();

    let runtime = new_runtime()?;
    let readings = load_readings(&runtime, &source)?;

    let (clusters, summary) = runtime.block_on(async move {
        let mut monitor = match enricher {
            Some(enricher) => SensorMonitor::with_enricher(params, enricher),
            None => SensorMonitor::new(params),
        };
        monitor.set_location_filter(filter);
        let handles = monitor.set_sensors(readings);
        if !handles.is_empty() {
            info!("Waiting for {} cluster label(s)", handles.len());
        }
        join_all(handles).await;
        (monitor.cluster_details_with_labels(), monitor.summary())
    });

    info!(
        "{} cluster(s) from {} located sensor(s), {} noise",
        summary.clusters, summary.located, summary.noise
    );

    let context = ReportContext {
        settings: RunSettings::new(&params, labels),
        summary,
    };
    let out = open_output(args.output.as_deref())?;
    write_clusters(out, args.format, context, &clusters)?;

    if let Some(path) = &args.output {
        info!("Wrote {} cluster(s) to {}", clusters.len(), path.display());
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn run_navigate(args: &NavigateArgs, mut config: Config) -> Result<()> {
    apply_cluster_args(&mut config, &args.cluster)?;
    let source = snapshot_source(&args.source, &config)?;
    let params = ClusterParams::from(config.clustering);

    let runtime = new_runtime()?;
    let readings = load_readings(&runtime, &source)?;

    let mut monitor = SensorMonitor::new(params);
    monitor.set_location_filter(LocationFilter::from_names(config.filter.locations));
    monitor.set_sensors(readings);
    monitor.select_sensor(args.sensor.as_str());

    let target = if args.previous {
        monitor.previous_sensor_id()
    } else {
        monitor.next_sensor_id()
    };

    match target {
        Some(id) => println!("{id}"),
        None => println!("No navigation possible for sensor {}", args.sensor),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn run_locations(args: &SourceArgs, config: &Config) -> Result<()> {
    let source = snapshot_source(args, config)?;
    let runtime = new_runtime()?;
    let readings = load_readings(&runtime, &source)?;

    for location in available_locations(&readings) {
        println!("{location}");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = resolve_config_path(path)?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nNext steps:");
                println!("  set geocoding.access_token (or MAPBOX_ACCESS_TOKEN) for cluster labels");
                println!("  set snapshot.source to your default sensor feed");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let mut config = match path {
                Some(path) => load_config_file(path)?,
                None => load_default_config()?,
            };
            if config.geocoding.access_token.is_some() {
                config.geocoding.access_token = Some("********".to_string());
            }
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = resolve_config_path(path)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
