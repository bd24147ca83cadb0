use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::E2eConfig;

#[derive(Parser, Debug)]
#[command(name = "plant-e2e")]
#[command(about = "Run map planting scenarios against a live application")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub config: E2eConfig,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenarios of a feature file or of a directory of feature files
    Run {
        #[arg(value_name = "PATH", default_value = "features")]
        input: PathBuf,

        /// Number of parallel workers, each with its own browser and maps
        #[arg(short, long, default_value_t = 1)]
        workers: usize,

        /// Write a JSON report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
}
