//! CLI entry point for distsim.

use clap::Parser;
use cli::CliConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = CliConfig::parse();
    let result = config.run()?;
    print!("{}", result.output);
    Ok(())
}
