//! Core data types for pattern configuration.
//!
//! `UrlRegexOptions` is the immutable input of pattern assembly: a closed set
//! of feature flags plus the TLD allow-list. Every option is independent at
//! configuration time; interactions are resolved only when the pattern is
//! assembled.

use crate::tlds::default_tlds;

/// Default compiled-program budget handed to the regex engine.
///
/// The TLD alternation together with the extended Unicode host classes needs
/// more than the engine's stock limit once case folding is applied.
pub const DEFAULT_SIZE_LIMIT: usize = 32 * (1 << 20);

/// Configuration for building a URL matcher.
///
/// Defaults: `localhost`, `ipv4` and `ipv6` enabled, `tlds` set to the
/// embedded IANA list, every other flag disabled.
///
/// # Example
///
/// ```rust
/// use url_regex_safe_lib::UrlRegexOptions;
///
/// let options = UrlRegexOptions::default()
///     .with_exact(true)
///     .with_auth(true)
///     .with_tlds(vec!["com".to_string(), "onion".to_string()]);
///
/// assert!(options.exact);
/// assert!(options.localhost);
/// assert_eq!(options.tlds.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRegexOptions {
    /// Anchor the pattern so it must match the entire input
    pub exact: bool,

    /// Require a scheme (`proto://`, `//`) or `www.`, and accept any
    /// alphabetic TLD of two or more characters instead of the allow-list
    pub strict: bool,

    /// Allow an optional `user[:pass]@` prefix before the host
    pub auth: bool,

    /// Allow the literal host `localhost`
    pub localhost: bool,

    /// Let the path tail run through `)` characters
    pub parens: bool,

    /// Let the path tail run through `'` characters
    pub apostrophes: bool,

    /// Allow one `.` directly after the TLD
    pub trailing_period: bool,

    /// Allow dotted-decimal IPv4 hosts
    pub ipv4: bool,

    /// Allow bracketless IPv6 hosts with an optional `%zone`
    pub ipv6: bool,

    /// TLD allow-list used when `strict` is false.
    ///
    /// Order does not matter: entries are sorted by descending length during
    /// assembly. Entries are joined verbatim, so they must not contain regex
    /// metacharacters.
    pub tlds: Vec<String>,

    /// Upper bound on the compiled program size, in bytes
    pub size_limit: usize,
}

impl Default for UrlRegexOptions {
    fn default() -> Self {
        Self {
            exact: false,
            strict: false,
            auth: false,
            localhost: true,
            parens: false,
            apostrophes: false,
            trailing_period: false,
            ipv4: true,
            ipv6: true,
            tlds: default_tlds().to_vec(),
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

impl UrlRegexOptions {
    /// Match the whole input instead of searching inside it.
    pub fn with_exact(mut self, enabled: bool) -> Self {
        self.exact = enabled;
        self
    }

    /// Require an explicit scheme or `www.` and use the generic TLD class.
    pub fn with_strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Accept `user:pass@` credentials before the host.
    pub fn with_auth(mut self, enabled: bool) -> Self {
        self.auth = enabled;
        self
    }

    /// Accept `localhost` as a host.
    pub fn with_localhost(mut self, enabled: bool) -> Self {
        self.localhost = enabled;
        self
    }

    /// Keep `)` inside the path tail.
    pub fn with_parens(mut self, enabled: bool) -> Self {
        self.parens = enabled;
        self
    }

    /// Keep `'` inside the path tail.
    pub fn with_apostrophes(mut self, enabled: bool) -> Self {
        self.apostrophes = enabled;
        self
    }

    /// Accept a single trailing `.` after the TLD.
    pub fn with_trailing_period(mut self, enabled: bool) -> Self {
        self.trailing_period = enabled;
        self
    }

    /// Accept dotted-decimal IPv4 hosts.
    pub fn with_ipv4(mut self, enabled: bool) -> Self {
        self.ipv4 = enabled;
        self
    }

    /// Accept IPv6 hosts.
    pub fn with_ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = enabled;
        self
    }

    /// Replace the TLD allow-list.
    ///
    /// An empty list is accepted; in non-strict mode the domain branch then
    /// matches nothing while `localhost` and IP literals keep working.
    pub fn with_tlds(mut self, tlds: Vec<String>) -> Self {
        self.tlds = tlds;
        self
    }

    /// Set the compiled program budget passed to the regex engine.
    pub fn with_size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = bytes;
        self
    }
}

/// Output format for displaying matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One match per line
    #[default]
    Text,

    /// JSON array of match objects
    Json,

    /// Only the number of matches
    Count,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Count => write!(f, "count"),
        }
    }
}
