use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use route_optimizer::cache::RouteCache;
use route_optimizer::config::{self, Cli, DEFAULT_LOG_FILTER, StopSource};
use route_optimizer::directions::{HttpTransport, RouteProvider};
use route_optimizer::domain::StopList;
use route_optimizer::error::AppError;
use route_optimizer::report::Report;
use route_optimizer::viewer::viewer_url;

const RULE: &str = "============================================================";

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = config::load_env_file();

    // Logs go to stderr so the report on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let cache = RouteCache::new(cli.cache_config());
    cache.init()?;
    if cli.clear_cache {
        let removed = cache.clear()?;
        println!("Cleared {removed} cached response(s)");
    }

    println!("{RULE}");
    println!("Delivery Route Optimizer");
    println!("{RULE}");
    println!();

    let stops = match cli.stop_source() {
        StopSource::Arguments(addresses) => {
            println!("Using addresses from command line arguments");
            StopList::from_addresses(addresses)?
        }
        StopSource::File(path) => {
            let stops = StopList::read_file(&path)?;
            println!("Using addresses from {}", path.display());
            stops
        }
    };
    println!();

    let provider_config = cli.provider_config();
    let transport = HttpTransport::new(&provider_config)?;
    let provider = RouteProvider::new(transport, cache, provider_config);

    let addresses = stops.as_slice();
    if let Some(origin) = addresses.first() {
        println!("Starting point: {origin}");
    }
    println!(
        "Optimizing route for {} waypoint(s)...",
        stops.waypoint_count()
    );
    println!();

    let (original, optimized) = provider.optimize_route(addresses).await?;

    let url = viewer_url(optimized.addresses(), cli.viewer_style);
    let report = Report {
        inputs: addresses,
        original: &original,
        optimized: &optimized,
        fuel: cli.fuel_config(),
        viewer_url: url.as_deref(),
    };
    print!("{report}");

    Ok(())
}
