//! RRD CLI - rainfall-risk dashboard for storm-drain chambers.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "rrd-cli",
    version,
    about = "Rainfall risk dashboard for storm-drain chambers"
)]
struct Cli {
    #[command(subcommand)]
    command: rrd_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("rrd-cli starting");
    rrd_cmd::run(cli.command)
}
