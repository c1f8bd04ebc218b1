use clap::Parser;
use station_qc::cli::{run, Cli};
use station_qc::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
