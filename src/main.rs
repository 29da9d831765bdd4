use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use podroute::cli::Cli;
use podroute::client::{HttpPodcastClient, InMemoryPodcastClient, PodcastClient};
use podroute::config::ShellConfig;
use podroute::logging::setup_logging;
use podroute::shell::{AppShell, Document};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ShellConfig::load(cli.config.as_deref())?.with_overrides(&cli);
    setup_logging(config.level_filter()?, cli.log_file.as_deref())
        .context("Failed to set up logging")?;
    if let Some(path) = &cli.config {
        info!("Loaded config from {}", path.display());
    }

    let client: Arc<dyn PodcastClient> = match &cli.fixture {
        Some(path) => Arc::new(InMemoryPodcastClient::from_fixture_file(path)?),
        None => Arc::new(HttpPodcastClient::new(&config.api_url()?, config.request_timeout())?),
    };

    let document = Document::for_config(&config);
    let shell = AppShell::mount(&document, &config, client).context("Startup failed")?;

    let paths = if cli.paths.is_empty() { vec!["/app".to_string()] } else { cli.paths };
    for path in &paths {
        match shell.navigate(path).await {
            Some(frame) => println!("{}\n", frame),
            None => warn!("Navigation to {} was superseded", path),
        }
    }

    info!("Visited {} location(s)", paths.len());
    Ok(())
}
