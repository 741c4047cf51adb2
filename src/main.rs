use anyhow::{Result, anyhow};
use bggen::cli::CliOptions;
use bggen::config::setup_logging;
use bggen::openai::{ImagesClient, ThreadSleeper, UreqTransport};
use bggen::pipeline;
use bggen::specs::SPECS;
use clap::Parser;

fn main() -> Result<()> {
    let cli = CliOptions::parse();

    setup_logging(cli.debug).map_err(|err| anyhow!("Logging setup failed: {err}"))?;

    let config = cli.into_config()?;
    let client = ImagesClient::from_config(&config, UreqTransport::new(), ThreadSleeper);

    // Failed images become placeholders, they don't change the exit code.
    pipeline::run(&config, SPECS, &client)?;
    Ok(())
}
