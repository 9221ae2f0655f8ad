mod cli;
mod config;
mod downloader;
mod extractor;
mod io;
mod logging;
mod my_regex;
mod outside;
mod pipeline;
mod ranking;
mod resolver;
mod result;
#[cfg(test)]
mod testing;
mod types;

use clap::Parser;
use miette::{Context, Result};
use tracing::{debug, info, warn};

use crate::{
    cli::Args,
    config::{Configuration, FetcherKind},
    logging::init_logging,
    outside::{ChromeFetcher, HttpClient, PageFetcher, Wayback},
    pipeline::Pipeline,
};

fn main() -> Result<()> {
    // Initialize the environment & CLI
    let args = Args::parse();
    init_logging(args.log_level)?;

    let config = Configuration::load(&args.config)?.with_args(&args);
    debug!("Configuration: {config:?}");

    let http = HttpClient::new(&config);
    let wayback = Wayback::new(&http);

    let pages = load_page_fetcher(&config, &http)?;

    info!("Looking for the archived profile of {}", args.username);
    let summary = Pipeline::new(&config, &wayback, &http)
        .run(&args.username, pages)
        .map_err(miette::Report::from)
        .wrap_err("Could not find the clips to recover")?;

    for (id, reason) in &summary.failed {
        warn!("{id}: {reason}");
    }
    info!("Done with {} clips: {summary}", summary.total());
    Ok(())
}

/// Build the component reading the profile pages.
/// For the browser, this launches it.
fn load_page_fetcher(config: &Configuration, http: &HttpClient) -> Result<Box<dyn PageFetcher>> {
    let pages: Box<dyn PageFetcher> = match config.fetcher {
        FetcherKind::Browser => Box::new(
            ChromeFetcher::launch(config)
                .map_err(miette::Report::from)
                .wrap_err("Use `--fetcher http` if Chrome is not available")?,
        ),
        FetcherKind::Http => Box::new(http.clone()),
    };
    Ok(pages)
}
