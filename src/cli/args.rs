use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_CONTEXT_WINDOW_DAYS, DEFAULT_IQR_MULTIPLIER, DEFAULT_LOWER_PERCENTILE,
    DEFAULT_UPPER_PERCENTILE,
};

#[derive(Parser)]
#[command(name = "station-qc")]
#[command(about = "Interactive quality control for daily climate station records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an interactive review session for one station
    Review {
        #[arg(short, long, help = "Directory with the original input files")]
        input_dir: PathBuf,

        #[arg(short, long, help = "Directory for snapshots and the audit journal")]
        output_dir: PathBuf,

        #[arg(short, long, help = "Station identifier")]
        station: String,

        #[arg(short, long, help = "Record period as written in the file names")]
        period: String,

        #[arg(
            long,
            default_value = "tmax",
            help = "Variable to review statistically after the thermal pass"
        )]
        variable: String,

        #[arg(long, default_value_t = DEFAULT_LOWER_PERCENTILE)]
        lower_percentile: f64,

        #[arg(long, default_value_t = DEFAULT_UPPER_PERCENTILE)]
        upper_percentile: f64,

        #[arg(long, default_value_t = DEFAULT_IQR_MULTIPLIER)]
        iqr_multiplier: f64,

        #[arg(
            long,
            default_value_t = DEFAULT_CONTEXT_WINDOW_DAYS,
            help = "Context window half-width in days"
        )]
        window_days: i64,
    },

    /// Report flagged inconsistencies and outliers without changing anything
    Audit {
        #[arg(short, long, help = "Directory with the original input files")]
        input_dir: PathBuf,

        #[arg(short, long, help = "Directory for snapshots and the audit journal")]
        output_dir: PathBuf,

        #[arg(short, long, help = "Station identifier")]
        station: String,

        #[arg(short, long, help = "Record period as written in the file names")]
        period: String,

        #[arg(long, default_value_t = DEFAULT_LOWER_PERCENTILE)]
        lower_percentile: f64,

        #[arg(long, default_value_t = DEFAULT_UPPER_PERCENTILE)]
        upper_percentile: f64,

        #[arg(long, default_value_t = DEFAULT_IQR_MULTIPLIER)]
        iqr_multiplier: f64,
    },

    /// Print the audit journal for a station
    History {
        #[arg(short, long, help = "Directory holding the audit journal")]
        output_dir: PathBuf,

        #[arg(short, long, help = "Station identifier")]
        station: String,

        #[arg(short, long, help = "Restrict to one date (YYYY-MM-DD)")]
        date: Option<NaiveDate>,
    },
}
