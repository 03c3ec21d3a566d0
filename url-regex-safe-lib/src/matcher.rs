//! Compiled URL matcher.
//!
//! This is the compiler boundary: the assembled pattern is handed to the
//! `regex` engine once, and the resulting matcher is immutable. A `UrlMatcher`
//! holds no per-search state, so one instance can be shared freely across
//! threads.

use crate::error::UrlRegexError;
use crate::pattern::build_pattern;
use crate::types::UrlRegexOptions;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, error};

/// A single match inside a haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UrlMatch<'t> {
    /// The matched text
    #[serde(rename = "match")]
    pub text: &'t str,

    /// Byte offset of the first matched byte
    pub start: usize,

    /// Byte offset just past the last matched byte
    pub end: usize,
}

/// Compiled matcher for URLs and bare domains.
///
/// # Example
///
/// ```rust
/// use url_regex_safe_lib::{UrlMatcher, UrlRegexOptions};
///
/// let matcher = UrlMatcher::new(UrlRegexOptions::default())?;
/// assert_eq!(
///     matcher.find_all("see example.com and http://127.0.0.1:8080/x"),
///     vec!["example.com", "http://127.0.0.1:8080/x"]
/// );
/// # Ok::<(), url_regex_safe_lib::UrlRegexError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    /// Compiled pattern
    regex: Regex,
    /// Options the pattern was assembled from
    options: UrlRegexOptions,
}

impl UrlMatcher {
    /// Assemble and compile a matcher.
    ///
    /// # Errors
    ///
    /// Returns `UrlRegexError::PatternCompile` if the regex engine rejects the
    /// assembled pattern. With the default TLD list this cannot happen; it
    /// requires TLD entries containing regex metacharacters or a
    /// `size_limit` too small for the pattern.
    pub fn new(options: UrlRegexOptions) -> Result<Self, UrlRegexError> {
        let pattern = build_pattern(&options);

        let regex = RegexBuilder::new(&pattern)
            .size_limit(options.size_limit)
            .build()
            .map_err(|e| {
                error!(error = %e, len = pattern.len(), "url pattern rejected by regex engine");
                UrlRegexError::pattern_compile(pattern.as_str(), e.to_string())
            })?;

        debug!(len = pattern.len(), "compiled url matcher");

        Ok(Self { regex, options })
    }

    /// True if the pattern matches `text`.
    ///
    /// With `exact` set the whole string must be a URL; otherwise any URL
    /// inside the text is enough.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// All non-overlapping matches, left to right.
    ///
    /// Returns an empty vector when nothing matches.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.regex.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Lazily iterate over matches together with their byte offsets.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = UrlMatch<'t>> + 'r
    where
        't: 'r,
    {
        self.regex.find_iter(text).map(|m| UrlMatch {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
    }

    /// The assembled pattern source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// The options this matcher was built from.
    pub fn options(&self) -> &UrlRegexOptions {
        &self.options
    }
}

impl std::fmt::Display for UrlMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tlds() -> Vec<String> {
        ["com", "net", "org"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_compiles_default_options() {
        let matcher = UrlMatcher::new(UrlRegexOptions::default()).unwrap();
        assert!(matcher.is_match("example.com"));
        assert_eq!(matcher.as_str(), build_pattern(matcher.options()));
    }

    #[test]
    fn test_metacharacter_tld_is_compile_error() {
        let options = UrlRegexOptions::default().with_tlds(vec!["com".into(), "(bad".into()]);
        let err = UrlMatcher::new(options).unwrap_err();
        match &err {
            UrlRegexError::PatternCompile { pattern, message } => {
                assert!(pattern.contains("(bad"));
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_tiny_size_limit_is_compile_error() {
        let options = UrlRegexOptions::default().with_size_limit(16);
        assert!(matches!(
            UrlMatcher::new(options),
            Err(UrlRegexError::PatternCompile { .. })
        ));
    }

    #[test]
    fn test_find_iter_offsets() {
        let matcher = UrlMatcher::new(UrlRegexOptions::default().with_tlds(small_tlds())).unwrap();
        let text = "a example.com b foo.net";
        let found: Vec<UrlMatch> = matcher.find_iter(text).collect();
        assert_eq!(
            found,
            vec![
                UrlMatch { text: "example.com", start: 2, end: 13 },
                UrlMatch { text: "foo.net", start: 16, end: 23 },
            ]
        );
        assert_eq!(&text[found[1].start..found[1].end], "foo.net");
    }

    #[test]
    fn test_find_all_empty_when_nothing_matches() {
        let matcher = UrlMatcher::new(UrlRegexOptions::default().with_tlds(small_tlds())).unwrap();
        assert!(matcher.find_all("no links in here").is_empty());
        assert!(matcher.find_all("").is_empty());
    }

    #[test]
    fn test_empty_tlds_still_match_literal_hosts() {
        let matcher = UrlMatcher::new(UrlRegexOptions::default().with_tlds(Vec::new())).unwrap();
        assert!(!matcher.is_match("example.com"));
        assert_eq!(
            matcher.find_all("localhost:3000 and 10.0.0.1"),
            vec!["localhost:3000", "10.0.0.1"]
        );
    }

    #[test]
    fn test_match_serializes_with_match_key() {
        let m = UrlMatch { text: "example.com", start: 0, end: 11 };
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"match":"example.com","start":0,"end":11}"#);
    }

    #[test]
    fn test_matcher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UrlMatcher>();
    }
}
