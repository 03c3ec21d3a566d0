//! Default TLD allow-list.
//!
//! The list is a static, version-controlled asset (`data/tlds.txt`) produced
//! offline by the generator in [`crate::generate`]. It is embedded at compile
//! time and parsed once on first use; matching never touches the network.

/// Raw text of the embedded asset: one lowercase, Unicode-decoded TLD per line.
pub const DEFAULT_TLDS_ASSET: &str = include_str!("../data/tlds.txt");

lazy_static::lazy_static! {
    static ref DEFAULT_TLDS: Vec<String> = parse_tld_list(DEFAULT_TLDS_ASSET);
}

/// The embedded IANA TLD list, in lexicographic order.
///
/// # Example
///
/// ```rust
/// use url_regex_safe_lib::default_tlds;
///
/// let tlds = default_tlds();
/// assert!(tlds.iter().any(|t| t == "com"));
/// ```
pub fn default_tlds() -> &'static [String] {
    &DEFAULT_TLDS
}

/// Number of entries in the embedded TLD list.
pub fn default_tld_count() -> usize {
    DEFAULT_TLDS.len()
}

/// Parse the one-per-line TLD asset format.
///
/// Blank lines and `#` comments are skipped, entries are trimmed and
/// lowercased. Order is preserved.
pub fn parse_tld_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}
