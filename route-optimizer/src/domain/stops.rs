//! Stop list input and validation.
//!
//! Stops come either from the command line or from a newline-delimited file.
//! The first stop is the origin; the rest are waypoints handed to the
//! directions provider, which accepts at most 25 of them.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Minimum number of stops: an origin and one destination.
pub const MIN_STOPS: usize = 2;

/// Maximum number of stops: one origin plus the provider's 25 waypoints.
pub const MAX_STOPS: usize = 26;

/// A pair of addresses that normalize to the same stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateStop {
    /// 1-based position of the first occurrence, blank lines skipped.
    pub first_line: usize,
    /// Address text of the first occurrence.
    pub first: String,
    /// 1-based position of the repeated occurrence.
    pub line: usize,
    /// Address text of the repeated occurrence.
    pub address: String,
}

/// Errors produced while reading or validating a stop list.
#[derive(Debug, thiserror::Error)]
pub enum StopListError {
    /// The input file does not exist.
    #[error("input file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    /// The input file exists but could not be read.
    #[error("failed to read input file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Fewer than [`MIN_STOPS`] addresses.
    #[error("at least {} addresses are required (found {found})", MIN_STOPS)]
    TooFew { found: usize },

    /// More than [`MAX_STOPS`] addresses.
    #[error(
        "no more than {} addresses are allowed (found {found}); \
         the directions API supports a maximum of 25 waypoints plus 1 origin",
        MAX_STOPS
    )]
    TooMany { found: usize },

    /// Two or more addresses refer to the same stop.
    #[error("duplicate addresses found:\n{}", DuplicateList(.0))]
    Duplicates(Vec<DuplicateStop>),
}

struct DuplicateList<'a>(&'a [DuplicateStop]);

impl fmt::Display for DuplicateList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dup) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "  - Line {}: {}", dup.first_line, dup.first)?;
            write!(f, "  - Line {}: {}", dup.line, dup.address)?;
        }
        Ok(())
    }
}

/// A validated, ordered list of stops.
///
/// Holds between [`MIN_STOPS`] and [`MAX_STOPS`] addresses, none of which
/// repeat under case-insensitive, whitespace-collapsed comparison.
///
/// # Examples
///
/// ```
/// use route_optimizer::domain::StopList;
///
/// let stops = StopList::parse("Depot\n\n  Bakery  \nMarket\n").unwrap();
/// assert_eq!(stops.as_slice(), ["Depot", "Bakery", "Market"]);
///
/// assert!(StopList::parse("Depot\ndepot").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopList(Vec<String>);

impl StopList {
    /// Validate addresses given directly (e.g. as command-line arguments).
    ///
    /// Surrounding whitespace is trimmed and empty entries are dropped.
    pub fn from_addresses<I, S>(addresses: I) -> Result<Self, StopListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stops = addresses
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self::validate(stops)
    }

    /// Parse a newline-delimited list, one address per line.
    pub fn parse(text: &str) -> Result<Self, StopListError> {
        Self::from_addresses(text.lines())
    }

    /// Read and validate a stop list file.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, StopListError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StopListError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                StopListError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&text)
    }

    fn validate(stops: Vec<String>) -> Result<Self, StopListError> {
        let found = stops.len();
        if found < MIN_STOPS {
            return Err(StopListError::TooFew { found });
        }
        if found > MAX_STOPS {
            return Err(StopListError::TooMany { found });
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for (idx, address) in stops.iter().enumerate() {
            let key = normalize(address);
            match seen.get(&key) {
                Some(&first_idx) => duplicates.push(DuplicateStop {
                    first_line: first_idx + 1,
                    first: stops[first_idx].clone(),
                    line: idx + 1,
                    address: address.clone(),
                }),
                None => {
                    seen.insert(key, idx);
                }
            }
        }

        if !duplicates.is_empty() {
            return Err(StopListError::Duplicates(duplicates));
        }

        Ok(Self(stops))
    }

    /// All stops, origin first.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of stops including the origin.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a valid list has at least [`MIN_STOPS`] entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of waypoints after the origin.
    pub fn waypoint_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

/// Lowercase and collapse runs of whitespace.
fn normalize(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
