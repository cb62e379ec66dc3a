//! Postcheck - validate and autocomplete UK postcodes
//!
//! A command-line client for the postcodes.io API backed by a local on-disk
//! cache, so repeated lookups never re-query the service.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use postcheck::api::{ApiError, PostcodeClient};
use postcheck::cache::CacheStore;
use postcheck::cli::{visible_completions, Cli, Mode};
use postcheck::lookup::{LookupError, LookupService};
use postcheck::postcode::normalize;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays one fact or completion per line.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cache = match cli.cache_file {
        Some(path) => CacheStore::with_path(path),
        None => CacheStore::new()
            .ok_or("could not determine a cache directory; pass --cache-file")?,
    };
    let service = LookupService::new(PostcodeClient::new()?, cache);

    let key = normalize(&cli.postcode);

    match cli.mode {
        Mode::Validate => {
            if service.validate(&cli.postcode).await? {
                println!("{} is a valid postcode.", key);
            } else {
                println!("{} is not a valid postcode.", key);
            }
        }
        Mode::Complete => match service.complete(&cli.postcode).await {
            Ok(completions) => {
                for completion in visible_completions(&completions) {
                    println!("{}", completion);
                }
            }
            Err(LookupError::Api(ApiError::NoMatches)) => {
                println!("No matching postcodes found for {}.", key);
            }
            Err(e) => return Err(e.into()),
        },
    }

    Ok(())
}
