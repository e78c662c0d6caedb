//! Mean discharge river map renderer.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use discharge_map::{Args, RunConfig};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    info!(
        data = %args.dataname.display(),
        map = %args.mapname,
        figure = %args.figname,
        "Starting discharge map"
    );

    let config = RunConfig::from_args(args)?;
    let summary = discharge_map::run(&config)?;

    info!(
        output = %summary.output.display(),
        segments = summary.segments_drawn(),
        "Done"
    );
    Ok(())
}
