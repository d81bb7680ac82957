//! Command-line and environment configuration.
//!
//! Everything is gathered into [`Cli`] once at startup and split into the
//! per-component configs handed to constructors. Nothing is read from the
//! environment after that.
//!
//! A `.env` file, if present, is loaded into the environment before parsing
//! so the API key can live there.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::cache::CacheConfig;
use crate::directions::ProviderConfig;
use crate::metrics::{DEFAULT_CONSUMPTION_L_PER_100KM, DEFAULT_PRICE_PER_LITRE, FuelConfig};
use crate::viewer::ViewerUrlStyle;

/// Environment variable holding the directions API key.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Log filter used when `RUST_LOG` is unset. Progress from this crate,
/// such as cache hits and provider calls, is shown at `info`.
pub const DEFAULT_LOG_FILTER: &str = "warn,route_optimizer=info";

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Load a `.env` file from the working directory or one of its parents.
///
/// Variables already present in the environment are not overridden.
/// Returns the path of the file loaded, or `None` if there was none.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load a specific `.env` file, without overriding existing variables.
pub fn load_env_file_from(path: &Path) -> Result<(), dotenvy::Error> {
    dotenvy::from_path(path)
}

/// Where the stop list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopSource {
    /// Addresses given as positional arguments.
    Arguments(Vec<String>),
    /// A newline-delimited file.
    File(PathBuf),
}

/// Compare an input-order delivery route against a provider-optimized one.
#[derive(Debug, Clone, Parser)]
#[command(name = "route-optimizer", version)]
pub struct Cli {
    /// Addresses to visit; the first is the starting point. When omitted,
    /// addresses are read from the input file.
    #[arg(value_name = "ADDRESS")]
    pub addresses: Vec<String>,

    /// File with one address per line.
    #[arg(long, value_name = "path", default_value = "input.txt")]
    pub input: PathBuf,

    /// Directions API key. Also read from a `.env` file.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory for cached directions responses.
    #[arg(long, value_name = "path", default_value = ".cache")]
    pub cache_dir: PathBuf,

    /// Days before a cached response is refetched.
    #[arg(long, default_value_t = 30)]
    pub cache_ttl_days: u64,

    /// Delete all cached responses before running.
    #[arg(long)]
    pub clear_cache: bool,

    /// Vehicle fuel consumption in litres per 100 km.
    #[arg(long, default_value_t = DEFAULT_CONSUMPTION_L_PER_100KM)]
    pub fuel_consumption: f64,

    /// Fuel price per litre.
    #[arg(long, default_value_t = DEFAULT_PRICE_PER_LITRE)]
    pub fuel_price: f64,

    /// Directions request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Map link format.
    #[arg(long, value_enum, default_value_t = ViewerUrlStyle::Query)]
    pub viewer_style: ViewerUrlStyle,
}

impl Cli {
    /// Where to read stops from: arguments take priority over the file.
    pub fn stop_source(&self) -> StopSource {
        if self.addresses.is_empty() {
            StopSource::File(self.input.clone())
        } else {
            StopSource::Arguments(self.addresses.clone())
        }
    }

    /// Cache settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(&self.cache_dir).with_ttl(Duration::from_secs(
            self.cache_ttl_days.saturating_mul(SECS_PER_DAY),
        ))
    }

    /// Provider settings.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(self.api_key.clone()).with_timeout(self.timeout_secs)
    }

    /// Fuel estimate settings.
    pub fn fuel_config(&self) -> FuelConfig {
        FuelConfig::new(self.fuel_consumption, self.fuel_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("route-optimizer").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["--api-key", "k"]);
        assert_eq!(cli.stop_source(), StopSource::File(PathBuf::from("input.txt")));

        let cache = cli.cache_config();
        assert_eq!(cache.dir, PathBuf::from(".cache"));
        assert_eq!(cache.ttl, Duration::from_secs(30 * SECS_PER_DAY));

        assert_eq!(cli.fuel_config(), FuelConfig::default());
        assert_eq!(cli.viewer_style, ViewerUrlStyle::Query);
        assert!(!cli.clear_cache);

        let provider = cli.provider_config();
        assert_eq!(provider.api_key(), Some("k"));
        assert_eq!(provider.timeout_secs, 30);
    }

    #[test]
    fn positional_addresses_take_priority() {
        let cli = parse(&["--input", "stops.txt", "Depot", "Market"]);
        assert_eq!(
            cli.stop_source(),
            StopSource::Arguments(vec!["Depot".to_string(), "Market".to_string()])
        );
    }

    #[test]
    fn overrides() {
        let cli = parse(&[
            "--cache-dir",
            "/tmp/routes",
            "--cache-ttl-days",
            "7",
            "--fuel-consumption",
            "10",
            "--fuel-price",
            "2.25",
            "--timeout-secs",
            "5",
            "--viewer-style",
            "path",
            "--clear-cache",
        ]);
        assert_eq!(cli.cache_config().dir, PathBuf::from("/tmp/routes"));
        assert_eq!(cli.cache_config().ttl, Duration::from_secs(7 * SECS_PER_DAY));
        assert_eq!(cli.fuel_config(), FuelConfig::new(10.0, 2.25));
        assert_eq!(cli.provider_config().timeout_secs, 5);
        assert_eq!(cli.viewer_style, ViewerUrlStyle::Path);
        assert!(cli.clear_cache);
    }

    #[test]
    fn api_key_read_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, format!("{API_KEY_ENV}=from-dotenv\n")).unwrap();

        // A key already exported in the environment takes precedence.
        let exported = std::env::var(API_KEY_ENV).ok();
        load_env_file_from(&path).unwrap();

        let cli = parse(&["Depot", "Market"]);
        let expected = exported.as_deref().unwrap_or("from-dotenv").trim();
        assert_eq!(cli.provider_config().api_key(), Some(expected));
    }

    #[test]
    fn missing_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file_from(&dir.path().join(".env")).is_err());
    }

    #[test]
    fn default_log_filter_shows_progress() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.contains("route_optimizer=info"));
    }

    #[test]
    fn rejects_unknown_viewer_style() {
        let result = Cli::try_parse_from(["route-optimizer", "--viewer-style", "svg"]);
        assert!(result.is_err());
    }
}
