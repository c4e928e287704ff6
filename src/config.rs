use std::path::PathBuf;

use clap::Parser;

/// interactive explorer for US bikeshare trip data (Chicago, New York City,
/// Washington).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct BikeshareArgs {
    /// directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,
    /// do not print how long each statistics section took
    #[arg(long)]
    pub no_timing: bool,
}
