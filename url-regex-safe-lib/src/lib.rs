//! # URL Regex Safe Library
//!
//! A configurable regular expression builder for finding URLs and bare
//! domain names in free text.
//!
//! The library assembles a single regex source from a small set of feature
//! flags and an allow-list of top-level domains, then compiles it with the
//! linear-time `regex` engine. Matching never backtracks, so hostile input
//! cannot make a search blow up.
//!
//! ## Quick Start
//!
//! ```rust
//! use url_regex_safe_lib::{build, UrlRegexOptions};
//!
//! let matcher = build(UrlRegexOptions::default().with_strict(true))?;
//! let found = matcher.find_all("Visit https://example.com/docs or example.org");
//! assert_eq!(found, vec!["https://example.com/docs"]);
//! # Ok::<(), url_regex_safe_lib::UrlRegexError>(())
//! ```
//!
//! ## Features
//!
//! - **Bare domains**: `example.com` is found without a scheme unless `strict` is set
//! - **IP literals**: IPv4 and IPv6 hosts, each toggleable
//! - **Unicode hosts**: internationalized labels and TLDs match in decoded form
//! - **Embedded TLD list**: the IANA root zone, shipped with the crate
//! - **Generator** (feature `generator`): rebuild the TLD list from IANA

// Re-export main public API types and functions
pub use config::{
    env_config_from, load_env_config, parse_timeout_string, validate_tlds, ConfigManager,
    EnvConfig, FileConfig, GenerationConfig, MatcherDefaults,
};
pub use error::UrlRegexError;
pub use matcher::{UrlMatch, UrlMatcher};
pub use pattern::{
    auth_pattern, build_pattern, domain_pattern, host_alternation, host_pattern, ipv4_pattern,
    ipv6_pattern, path_pattern, port_pattern, protocol_pattern, sort_tlds_by_length, tld_pattern,
};
pub use tlds::{default_tld_count, default_tlds, parse_tld_list, DEFAULT_TLDS_ASSET};
pub use types::{OutputFormat, UrlRegexOptions, DEFAULT_SIZE_LIMIT};

// Public modules
#[cfg(feature = "generator")]
pub mod generate;

#[cfg(feature = "generator")]
pub use generate::{generate_tlds, GenerateConfig};

// Internal modules - these are not part of the public API
mod config;
mod error;
mod matcher;
mod pattern;
mod tlds;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, UrlRegexError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Assemble and compile a matcher in one step.
///
/// Shorthand for [`UrlMatcher::new`].
pub fn build(options: UrlRegexOptions) -> Result<UrlMatcher> {
    UrlMatcher::new(options)
}

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        default_tlds: default_tld_count(),
        features: get_enabled_features(),
    }
}

/// Information about the library build and features
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub default_tlds: usize,
    pub features: Vec<&'static str>,
}

/// Get list of enabled features at compile time
#[allow(clippy::vec_init_then_push)]
fn get_enabled_features() -> Vec<&'static str> {
    let mut features = Vec::new();

    #[cfg(feature = "generator")]
    features.push("generator");

    features
}
