//! CLI argument parsing.

mod args;
mod validators;

pub use args::{ClusterArgs, ClustersArgs, Cli, Command, ConfigAction, NavigateArgs, SourceArgs};
