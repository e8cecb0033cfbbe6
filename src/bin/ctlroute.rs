use ctlroute::cli::run_cli;
use ctlroute::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    init_logging(&LogConfig::from_env())?;
    run_cli()
}
