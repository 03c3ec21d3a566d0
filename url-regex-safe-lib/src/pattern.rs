//! Pattern assembly.
//!
//! The matcher's regex is built by concatenating small, independently
//! testable sub-patterns in a fixed order:
//!
//! ```text
//! protocol  auth?  (?: localhost | ipv4 | ipv6 | host domain tld )  port  path
//! ```
//!
//! Every function here is pure: the same options always produce the same
//! source string. Nothing can fail at this stage; a malformed result is only
//! detected when [`crate::UrlMatcher::new`] hands it to the regex engine.

use crate::types::UrlRegexOptions;
use tracing::{debug, trace, warn};

/// Letters, digits and the extended Unicode range admitted in host labels.
const HOST_CHARS: &str = r"a-z\x{00a1}-\x{ffff}0-9";

/// Letters and the extended Unicode range admitted in a generic TLD.
const TLD_CHARS: &str = r"a-z\x{00a1}-\x{ffff}";

/// One IPv6 group.
const V6_SEGMENT: &str = "[a-fA-F0-9]{1,4}";

/// One IPv4 octet, 0-255. Longer alternatives come first so `250` is never
/// cut short at `25`.
const V4_OCTET: &str = "(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])";

/// A class that matches no character at all.
const NEVER: &str = r"[^\x00-\x{10FFFF}]";

/// Scheme prefix, or a literal `www.`.
///
/// In strict mode `scheme://` (or a bare `//`) is mandatory unless the text
/// starts with `www.`. Otherwise the whole group may be empty, which lets
/// bare domains match anywhere in the text, including straight after `@`.
pub fn protocol_pattern(strict: bool) -> String {
    let scheme = if strict {
        "(?:(?:[a-z]+:)?//)"
    } else {
        "(?:(?:[a-z]+:)?//)?"
    };
    format!(r"(?:{}|www\.)", scheme)
}

/// Optional `user[:pass]@` credentials, or nothing when disabled.
pub fn auth_pattern(enabled: bool) -> &'static str {
    if enabled {
        r"(?:\S+(?::\S*)?@)?"
    } else {
        ""
    }
}

/// Dotted-decimal IPv4 literal.
pub fn ipv4_pattern() -> String {
    format!(r"{octet}(?:\.{octet}){{3}}", octet = V4_OCTET)
}

/// Bracketless IPv6 literal with an optional `%zone` suffix.
///
/// One alternative per position of the `::` compression, from eight full
/// groups down to a leading `::`. Alternatives that end in a group may also
/// end in an embedded IPv4 address.
pub fn ipv6_pattern() -> String {
    let seg = V6_SEGMENT;
    let v4 = ipv4_pattern();

    let alternatives = [
        // 1:2:3:4:5:6:7:8  1:2:3:4:5:6:7::
        format!("(?:{seg}:){{7}}(?:{seg}|:)"),
        // 1:2:3:4:5:6::8  1:2:3:4:5:6::  1:2:3:4:5:6:1.2.3.4
        format!("(?:{seg}:){{6}}(?:{v4}|:{seg}|:)"),
        // 1:2:3:4:5::7:8  1:2:3:4:5::  1:2:3:4:5::1.2.3.4
        format!("(?:{seg}:){{5}}(?::{v4}|(?::{seg}){{1,2}}|:)"),
        format!("(?:{seg}:){{4}}(?:(?::{seg}){{0,1}}:{v4}|(?::{seg}){{1,3}}|:)"),
        format!("(?:{seg}:){{3}}(?:(?::{seg}){{0,2}}:{v4}|(?::{seg}){{1,4}}|:)"),
        format!("(?:{seg}:){{2}}(?:(?::{seg}){{0,3}}:{v4}|(?::{seg}){{1,5}}|:)"),
        // 1::3:4:5:6:7:8  1::8  1::
        format!("(?:{seg}:){{1}}(?:(?::{seg}){{0,4}}:{v4}|(?::{seg}){{1,6}}|:)"),
        // ::2:3:4:5:6:7:8  ::8  ::1.2.3.4  ::
        format!("(?::(?:(?::{seg}){{0,5}}:{v4}|(?::{seg}){{1,7}}|:))"),
    ];

    // %eth0  %1
    format!("(?:{})(?:%[0-9a-zA-Z]{{1,}})?", alternatives.join("|"))
}

/// First label of a generic host name. `-` and `_` may appear inside but
/// never at the end.
pub fn host_pattern() -> String {
    format!("(?:(?:[{c}][-_]*)*[{c}]+)", c = HOST_CHARS)
}

/// Zero or more `.label` subdomains. `_` is not allowed here.
pub fn domain_pattern() -> String {
    format!(r"(?:\.(?:[{c}]-*)*[{c}]+)*", c = HOST_CHARS)
}

/// Order TLDs by descending length in characters, keeping the input order
/// of equal-length entries.
///
/// Alternation returns the first branch that matches, so a short TLD must
/// never be tried before a longer one sharing its prefix (`co` before `com`
/// would cut `example.com` to `example.co`).
pub fn sort_tlds_by_length<S: AsRef<str>>(tlds: &[S]) -> Vec<&str> {
    let mut sorted: Vec<&str> = tlds.iter().map(AsRef::as_ref).collect();
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    sorted
}

/// `.` followed by the TLD, plus an optional trailing `.`.
///
/// Strict mode accepts any run of two or more letters; otherwise only the
/// configured list is accepted. An empty list yields a group that can never
/// match, so the generic domain branch is effectively disabled.
pub fn tld_pattern<S: AsRef<str>>(strict: bool, tlds: &[S], trailing_period: bool) -> String {
    let body = if strict {
        format!("(?:[{}]{{2,}})", TLD_CHARS)
    } else if tlds.is_empty() {
        format!("(?:{})", NEVER)
    } else {
        format!("(?:{})", sort_tlds_by_length(tlds).join("|"))
    };

    let mut tld = format!(r"(?:\.{})", body);
    if trailing_period {
        tld.push_str(r"\.?");
    }
    tld
}

/// Optional `:` and a 2-5 digit port.
pub fn port_pattern() -> &'static str {
    "(?::[0-9]{2,5})?"
}

/// Optional path, query or fragment.
///
/// Runs until whitespace or `"`. Unless enabled, `)` and `'` also end it so
/// that prose wrapping a URL in parentheses or quotes keeps its punctuation.
pub fn path_pattern(parens: bool, apostrophes: bool) -> &'static str {
    match (parens, apostrophes) {
        (true, true) => r#"(?:[/?#][^\s"]*)?"#,
        (true, false) => r#"(?:[/?#][^\s"']*)?"#,
        (false, true) => r#"(?:[/?#][^\s"\)]*)?"#,
        (false, false) => r#"(?:[/?#][^\s"\)']*)?"#,
    }
}

/// Host alternation: `localhost`, IPv4, IPv6, then a generic domain name.
/// Branches are tried in that order.
pub fn host_alternation(options: &UrlRegexOptions) -> String {
    let mut branches: Vec<String> = Vec::with_capacity(4);

    if options.localhost {
        branches.push("localhost".to_string());
    }
    if options.ipv4 {
        branches.push(ipv4_pattern());
    }
    if options.ipv6 {
        branches.push(ipv6_pattern());
    }
    branches.push(format!(
        "{}{}{}",
        host_pattern(),
        domain_pattern(),
        tld_pattern(options.strict, &options.tlds, options.trailing_period)
    ));

    format!("(?:{})", branches.join("|"))
}

/// Assemble the complete, case-insensitive pattern source.
///
/// # Example
///
/// ```rust
/// use url_regex_safe_lib::{build_pattern, UrlRegexOptions};
///
/// let options = UrlRegexOptions::default().with_exact(true);
/// let pattern = build_pattern(&options);
/// assert!(pattern.starts_with("(?i)(?:^"));
/// assert!(pattern.ends_with("$)"));
/// ```
pub fn build_pattern(options: &UrlRegexOptions) -> String {
    if !options.strict && options.tlds.is_empty() {
        warn!("empty TLD list in non-strict mode: domain names will never match");
    }

    let body = format!(
        "{}{}{}{}{}",
        protocol_pattern(options.strict),
        auth_pattern(options.auth),
        host_alternation(options),
        port_pattern(),
        path_pattern(options.parens, options.apostrophes),
    );

    let pattern = if options.exact {
        format!("(?i)(?:^{}$)", body)
    } else {
        format!("(?i){}", body)
    };

    debug!(
        len = pattern.len(),
        tlds = options.tlds.len(),
        strict = options.strict,
        exact = options.exact,
        "assembled url pattern"
    );
    trace!(%pattern, "pattern source");

    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn anchored(pattern: &str) -> Regex {
        Regex::new(&format!("(?i)^(?:{})$", pattern)).unwrap()
    }

    #[test]
    fn test_protocol_strict_requires_scheme_or_www() {
        let strict = anchored(&protocol_pattern(true));
        assert!(strict.is_match("http://"));
        assert!(strict.is_match("//"));
        assert!(strict.is_match("www."));
        assert!(!strict.is_match(""));

        let loose = anchored(&protocol_pattern(false));
        assert!(loose.is_match(""));
        assert!(loose.is_match("ftp://"));
        assert!(!loose.is_match("ftp:"));
    }

    #[test]
    fn test_auth_pattern() {
        assert_eq!(auth_pattern(false), "");
        let auth = anchored(auth_pattern(true));
        assert!(auth.is_match("user@"));
        assert!(auth.is_match("user:pass@"));
        assert!(auth.is_match(""));
        assert!(!auth.is_match("us er@"));
    }

    #[test]
    fn test_ipv4_octets() {
        let v4 = anchored(&ipv4_pattern());
        for ok in ["0.0.0.0", "142.42.1.1", "255.255.255.255", "223.255.255.254", "10.0.99.100"] {
            assert!(v4.is_match(ok), "{} should match", ok);
        }
        for bad in ["256.1.1.1", "1.1.1", "01.1.1.1", "1.1.1.1.1", "1.1.1.300"] {
            assert!(!v4.is_match(bad), "{} should not match", bad);
        }
    }

    #[test]
    fn test_ipv6_forms() {
        let v6 = anchored(&ipv6_pattern());
        for ok in [
            "1:2:3:4:5:6:7:8",
            "1:2:3:4:5:6:7::",
            "2606:4700:4700::1111",
            "fe80::1%eth0",
            "::1",
            "::",
            "::ffff:192.0.2.128",
            "1:2:3:4:5:6:1.2.3.4",
            "FE80::ABCD",
        ] {
            assert!(v6.is_match(ok), "{} should match", ok);
        }
        for bad in ["1:2:3:4:5:6:7:8:9", "12345::", "1:2", "g::1", ":::"] {
            assert!(!v6.is_match(bad), "{} should not match", bad);
        }
    }

    #[test]
    fn test_host_and_domain_labels() {
        let name = anchored(&format!("{}{}", host_pattern(), domain_pattern()));
        for ok in ["a", "a_b", "a-b", "a.b-c", "mw1.google", "☺.damowmow", "a--b.c"] {
            assert!(name.is_match(ok), "{} should match", ok);
        }
        for bad in ["-a", "a-", "a_", "a.b_c", "a.b-", "a..b", ".a"] {
            assert!(!name.is_match(bad), "{} should not match", bad);
        }
    }

    #[test]
    fn test_sort_tlds_by_length_descending_and_stable() {
        let tlds = vec!["co", "net", "education", "com", "ws", "組織機構"];
        assert_eq!(
            sort_tlds_by_length(&tlds),
            vec!["education", "組織機構", "net", "com", "co", "ws"]
        );
    }

    #[test]
    fn test_sort_counts_characters_not_bytes() {
        // "рф" is four bytes but two characters
        let tlds = vec!["рф", "com"];
        assert_eq!(sort_tlds_by_length(&tlds), vec!["com", "рф"]);
    }

    #[test]
    fn test_tld_pattern_variants() {
        let tlds = vec!["co", "com"];
        assert_eq!(tld_pattern(false, &tlds, false), r"(?:\.(?:com|co))");
        assert_eq!(tld_pattern(false, &tlds, true), r"(?:\.(?:com|co))\.?");
        assert_eq!(
            tld_pattern(true, &tlds, false),
            r"(?:\.(?:[a-z\x{00a1}-\x{ffff}]{2,}))"
        );
    }

    #[test]
    fn test_empty_tld_list_never_matches() {
        let empty: Vec<String> = Vec::new();
        let tld = anchored(&tld_pattern(false, &empty, false));
        assert!(!tld.is_match("."));
        assert!(!tld.is_match(".com"));
    }

    #[test]
    fn test_longer_tld_wins() {
        let tlds = vec!["co", "com"];
        let re = Regex::new(&format!("example{}", tld_pattern(false, &tlds, false))).unwrap();
        assert_eq!(re.find("example.com").unwrap().as_str(), "example.com");
    }

    #[test]
    fn test_path_pattern_stops() {
        let plain = Regex::new(path_pattern(false, false)).unwrap();
        assert_eq!(plain.find("/a(b)'c").unwrap().as_str(), "/a(b");

        let parens = Regex::new(path_pattern(true, false)).unwrap();
        assert_eq!(parens.find("/a(b)'c").unwrap().as_str(), "/a(b)");

        let apostrophes = Regex::new(path_pattern(false, true)).unwrap();
        assert_eq!(apostrophes.find("/a'b)c").unwrap().as_str(), "/a'b");

        let both = Regex::new(path_pattern(true, true)).unwrap();
        assert_eq!(both.find("/a(b)'c\"d").unwrap().as_str(), "/a(b)'c");
    }

    #[test]
    fn test_port_pattern() {
        let port = anchored(port_pattern());
        assert!(port.is_match(":80"));
        assert!(port.is_match(":65535"));
        assert!(port.is_match(""));
        assert!(!port.is_match(":8"));
        assert!(!port.is_match(":123456"));
    }

    #[test]
    fn test_host_alternation_order() {
        let options = UrlRegexOptions::default().with_tlds(vec!["com".to_string()]);
        let hosts = host_alternation(&options);
        let localhost = hosts.find("localhost").unwrap();
        let v4 = hosts.find(&ipv4_pattern()).unwrap();
        let v6 = hosts.find(&ipv6_pattern()).unwrap();
        let generic = hosts.find(&host_pattern()).unwrap();
        assert!(localhost < v4 && v4 < v6 && v6 < generic);
    }

    #[test]
    fn test_disabled_hosts_are_omitted() {
        let options = UrlRegexOptions::default()
            .with_localhost(false)
            .with_ipv4(false)
            .with_ipv6(false)
            .with_tlds(vec!["com".to_string()]);
        let hosts = host_alternation(&options);
        assert!(!hosts.contains("localhost"));
        assert!(!hosts.contains(V4_OCTET));
        assert!(!hosts.contains(V6_SEGMENT));
    }

    #[test]
    fn test_build_pattern_anchoring() {
        let tlds = vec!["com".to_string()];
        let loose = build_pattern(&UrlRegexOptions::default().with_tlds(tlds.clone()));
        assert!(loose.starts_with("(?i)"));
        assert!(!loose.contains("(?:^"));
        assert!(!loose.ends_with("$)"));

        let exact = build_pattern(&UrlRegexOptions::default().with_tlds(tlds).with_exact(true));
        assert!(exact.starts_with("(?i)(?:^"));
        assert!(exact.ends_with("$)"));
    }

    #[test]
    fn test_build_pattern_is_deterministic() {
        let options = UrlRegexOptions::default().with_auth(true);
        assert_eq!(build_pattern(&options), build_pattern(&options.clone()));
    }

    #[test]
    fn test_build_pattern_does_not_reorder_caller_tlds() {
        let options = UrlRegexOptions::default().with_tlds(vec!["a".into(), "bbb".into()]);
        let _ = build_pattern(&options);
        assert_eq!(options.tlds, vec!["a".to_string(), "bbb".to_string()]);
    }
}
