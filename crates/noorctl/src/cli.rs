//! Command-line surface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "noorctl")]
#[command(about = "Noor - daily prayer times, next prayer countdown and hadith of the day", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Latitude of a fixed location (requires --lon)
    #[arg(long, global = true, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of a fixed location (requires --lat)
    #[arg(long, global = true, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Calculation method (karachi, muslim_world_league, umm_al_qura, ...)
    #[arg(long, global = true)]
    pub method: Option<String>,

    /// Asr convention (shafi, hanafi)
    #[arg(long, global = true)]
    pub madhab: Option<String>,

    /// Show labels in English instead of Urdu
    #[arg(long, global = true)]
    pub english: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full-screen dashboard with live clock (default)
    Dashboard,

    /// Print today's prayer schedule
    Today {
        /// Civil date to resolve (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the next prayer and the time left
    Next {
        /// Local reference time (HH:MM), defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch and print the hadith of the day
    Reflection {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the user configuration path
    Path,
    /// Write the default configuration to the user path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
