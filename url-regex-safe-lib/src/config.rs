//! Configuration file parsing and management.
//!
//! This module handles loading matcher defaults and generator settings from
//! TOML files and `URL_REGEX_*` environment variables, and merging them with
//! proper precedence rules (file < environment < command line).

use crate::error::UrlRegexError;
use crate::types::UrlRegexOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [matcher]
/// strict = true
/// trailing_period = true
/// tlds = ["com", "net", "onion"]
///
/// [generator]
/// timeout = "30s"
/// concurrency = 32
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for matcher options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<MatcherDefaults>,

    /// TLD generator settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<GenerationConfig>,
}

/// Optional overrides for every matcher option.
///
/// Unset fields leave the documented defaults untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MatcherDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub localhost: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parens: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub apostrophes: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_period: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<bool>,

    /// Replacement TLD allow-list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlds: Option<Vec<String>>,
}

impl MatcherDefaults {
    /// Overlay the fields that are set onto `options`.
    pub fn apply(&self, mut options: UrlRegexOptions) -> UrlRegexOptions {
        if let Some(v) = self.exact {
            options.exact = v;
        }
        if let Some(v) = self.strict {
            options.strict = v;
        }
        if let Some(v) = self.auth {
            options.auth = v;
        }
        if let Some(v) = self.localhost {
            options.localhost = v;
        }
        if let Some(v) = self.parens {
            options.parens = v;
        }
        if let Some(v) = self.apostrophes {
            options.apostrophes = v;
        }
        if let Some(v) = self.trailing_period {
            options.trailing_period = v;
        }
        if let Some(v) = self.ipv4 {
            options.ipv4 = v;
        }
        if let Some(v) = self.ipv6 {
            options.ipv6 = v;
        }
        if let Some(tlds) = &self.tlds {
            options.tlds = tlds.clone();
        }
        options
    }

    /// Field-by-field merge; values from `higher` win.
    fn merge(self, higher: MatcherDefaults) -> MatcherDefaults {
        MatcherDefaults {
            exact: higher.exact.or(self.exact),
            strict: higher.strict.or(self.strict),
            auth: higher.auth.or(self.auth),
            localhost: higher.localhost.or(self.localhost),
            parens: higher.parens.or(self.parens),
            apostrophes: higher.apostrophes.or(self.apostrophes),
            trailing_period: higher.trailing_period.or(self.trailing_period),
            ipv4: higher.ipv4.or(self.ipv4),
            ipv6: higher.ipv6.or(self.ipv6),
            tlds: higher.tlds.or(self.tlds),
        }
    }
}

/// TLD generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Registry URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Download timeout, e.g. "30s" or "2m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Maximum number of entries decoded at the same time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

#[cfg(feature = "generator")]
impl GenerationConfig {
    /// Resolve into generator settings, falling back to defaults.
    pub fn settings(&self) -> crate::generate::GenerateConfig {
        let mut settings = crate::generate::GenerateConfig::default();
        if let Some(url) = &self.url {
            settings = settings.with_url(url.as_str());
        }
        if let Some(secs) = self.timeout.as_deref().and_then(parse_timeout_string) {
            settings = settings.with_timeout(std::time::Duration::from_secs(secs));
        }
        if let Some(concurrency) = self.concurrency {
            settings = settings.with_concurrency(concurrency);
        }
        settings
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log which files were considered
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// `FileError` if the file is missing or unreadable, `ConfigError` if it
    /// is not valid TOML or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, UrlRegexError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UrlRegexError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            UrlRegexError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            UrlRegexError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is lowest, then the global file in `$HOME`, then a local
    /// file in the working directory. Later files win field by field.
    /// Files that fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, UrlRegexError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping configuration file"),
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "highest precedence"
                } else {
                    "overridden where set above"
                };
                debug!(path = %path.display(), status, "configuration layer");
            }
        }

        Ok(merged_config)
    }

    /// Local configuration file in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./url-regex-safe.toml", "./.url-regex-safe.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Global configuration file in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".url-regex-safe.toml", "url-regex-safe.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// XDG configuration file, following the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("url-regex-safe").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` take precedence.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            matcher: match (lower.matcher, higher.matcher) {
                (Some(lower_matcher), Some(higher_matcher)) => {
                    Some(lower_matcher.merge(higher_matcher))
                }
                (lower_matcher, higher_matcher) => higher_matcher.or(lower_matcher),
            },
            generator: match (lower.generator, higher.generator) {
                (Some(mut lower_gen), Some(higher_gen)) => {
                    if higher_gen.url.is_some() {
                        lower_gen.url = higher_gen.url;
                    }
                    if higher_gen.timeout.is_some() {
                        lower_gen.timeout = higher_gen.timeout;
                    }
                    if higher_gen.concurrency.is_some() {
                        lower_gen.concurrency = higher_gen.concurrency;
                    }
                    Some(lower_gen)
                }
                (lower_gen, higher_gen) => higher_gen.or(lower_gen),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), UrlRegexError> {
        if let Some(matcher) = &config.matcher {
            if let Some(tlds) = &matcher.tlds {
                validate_tlds(tlds)?;
            }
        }

        if let Some(generator) = &config.generator {
            if let Some(concurrency) = generator.concurrency {
                if concurrency == 0 || concurrency > 256 {
                    return Err(UrlRegexError::config(
                        "Generator concurrency must be between 1 and 256",
                    ));
                }
            }

            if let Some(timeout_str) = &generator.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(UrlRegexError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Basic TLD format validation: non-empty, no dots, no whitespace.
pub fn validate_tlds(tlds: &[String]) -> Result<(), UrlRegexError> {
    for tld in tlds {
        if tld.is_empty() || tld.contains('.') || tld.chars().any(char::is_whitespace) {
            return Err(UrlRegexError::config(format!("Invalid TLD '{}'", tld)));
        }
    }
    Ok(())
}

/// Environment variable configuration that mirrors CLI options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Matcher overrides from `URL_REGEX_*` variables
    pub matcher: MatcherDefaults,
    /// Explicit configuration file from `URL_REGEX_CONFIG`
    pub config: Option<String>,
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|name| env::var(name).ok())
}

/// Build an `EnvConfig` from any variable lookup.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();
    let matcher = &mut env_config.matcher;

    read_bool(&lookup, "URL_REGEX_EXACT", &mut matcher.exact);
    read_bool(&lookup, "URL_REGEX_STRICT", &mut matcher.strict);
    read_bool(&lookup, "URL_REGEX_AUTH", &mut matcher.auth);
    read_bool(&lookup, "URL_REGEX_LOCALHOST", &mut matcher.localhost);
    read_bool(&lookup, "URL_REGEX_PARENS", &mut matcher.parens);
    read_bool(&lookup, "URL_REGEX_APOSTROPHES", &mut matcher.apostrophes);
    read_bool(&lookup, "URL_REGEX_TRAILING_PERIOD", &mut matcher.trailing_period);
    read_bool(&lookup, "URL_REGEX_IPV4", &mut matcher.ipv4);
    read_bool(&lookup, "URL_REGEX_IPV6", &mut matcher.ipv6);

    // URL_REGEX_TLDS - comma-separated TLD list
    if let Some(tld_str) = lookup("URL_REGEX_TLDS") {
        let tlds: Vec<String> = tld_str
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        match validate_tlds(&tlds) {
            Ok(()) if !tlds.is_empty() => {
                debug!("using URL_REGEX_TLDS with {} entries", tlds.len());
                env_config.matcher.tlds = Some(tlds);
            }
            Ok(()) => warn!("URL_REGEX_TLDS is set but empty, ignoring"),
            Err(e) => warn!("ignoring URL_REGEX_TLDS: {}", e),
        }
    }

    // URL_REGEX_CONFIG - explicit config file
    if let Some(config_path) = lookup("URL_REGEX_CONFIG") {
        if !config_path.trim().is_empty() {
            env_config.config = Some(config_path);
        }
    }

    env_config
}

fn read_bool<F>(lookup: &F, name: &str, slot: &mut Option<bool>)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(name) {
        match parse_bool(&val) {
            Some(flag) => {
                debug!("using {}={}", name, flag);
                *slot = Some(flag);
            }
            None => warn!("invalid {}='{}', use true/false", name, val),
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| m * 60)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(5));
        assert_eq!(parse_timeout_string("30s"), Some(30));
        assert_eq!(parse_timeout_string("2m"), Some(120));
        assert_eq!(parse_timeout_string("5"), Some(5));
        assert_eq!(parse_timeout_string("invalid"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[matcher]
strict = true
trailing_period = true
tlds = ["com", "onion"]

[generator]
timeout = "45s"
concurrency = 8
"#,
        );

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let matcher = config.matcher.unwrap();
        assert_eq!(matcher.strict, Some(true));
        assert_eq!(matcher.trailing_period, Some(true));
        assert_eq!(matcher.exact, None);
        assert_eq!(
            matcher.tlds,
            Some(vec!["com".to_string(), "onion".to_string()])
        );

        let generator = config.generator.unwrap();
        assert_eq!(generator.timeout.as_deref(), Some("45s"));
        assert_eq!(generator.concurrency, Some(8));
    }

    #[cfg(feature = "generator")]
    #[test]
    fn test_generation_config_settings() {
        let generator = GenerationConfig {
            timeout: Some("2m".to_string()),
            concurrency: Some(1000),
            ..Default::default()
        };
        let settings = generator.settings();
        assert_eq!(settings.timeout, std::time::Duration::from_secs(120));
        assert_eq!(settings.concurrency, 256);
        assert_eq!(settings.url, crate::generate::IANA_TLD_URL);
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let manager = ConfigManager::new(false);
        let result = manager.load_file("/definitely/not/here/url-regex-safe.toml");
        assert!(matches!(result, Err(UrlRegexError::FileError { .. })));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_file = write_config("[matcher\nstrict = ");
        let manager = ConfigManager::new(false);
        let result = manager.load_file(temp_file.path());
        assert!(matches!(result, Err(UrlRegexError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_generator_values() {
        let manager = ConfigManager::new(false);

        let zero = write_config("[generator]\nconcurrency = 0\n");
        assert!(manager.load_file(zero.path()).is_err());

        let bad_timeout = write_config("[generator]\ntimeout = \"soon\"\n");
        assert!(manager.load_file(bad_timeout.path()).is_err());
    }

    #[test]
    fn test_invalid_tld_entries() {
        let manager = ConfigManager::new(false);
        for bad in [r#"[""]"#, r#"["co.uk"]"#, r#"["a b"]"#] {
            let temp_file = write_config(&format!("[matcher]\ntlds = {}\n", bad));
            assert!(manager.load_file(temp_file.path()).is_err(), "{} should fail", bad);
        }
    }

    #[test]
    fn test_matcher_defaults_apply() {
        let defaults = MatcherDefaults {
            strict: Some(true),
            localhost: Some(false),
            tlds: Some(vec!["com".to_string()]),
            ..Default::default()
        };
        let options = defaults.apply(UrlRegexOptions::default());
        assert!(options.strict);
        assert!(!options.localhost);
        assert!(options.ipv4);
        assert!(!options.exact);
        assert_eq!(options.tlds, vec!["com".to_string()]);
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            matcher: Some(MatcherDefaults {
                strict: Some(true),
                auth: Some(true),
                ..Default::default()
            }),
            generator: Some(GenerationConfig {
                timeout: Some("10s".to_string()),
                concurrency: Some(4),
                ..Default::default()
            }),
        };

        let higher = FileConfig {
            matcher: Some(MatcherDefaults {
                strict: Some(false),
                ..Default::default()
            }),
            generator: Some(GenerationConfig {
                concurrency: Some(32),
                ..Default::default()
            }),
        };

        let merged = manager.merge_configs(lower, higher);
        let matcher = merged.matcher.unwrap();
        assert_eq!(matcher.strict, Some(false)); // Higher wins
        assert_eq!(matcher.auth, Some(true)); // Lower preserved

        let generator = merged.generator.unwrap();
        assert_eq!(generator.concurrency, Some(32));
        assert_eq!(generator.timeout, Some("10s".to_string()));
    }

    #[test]
    fn test_env_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("URL_REGEX_STRICT", "yes"),
            ("URL_REGEX_IPV6", "off"),
            ("URL_REGEX_AUTH", "maybe"),
            ("URL_REGEX_TLDS", " COM, net ,,"),
            ("URL_REGEX_CONFIG", "/tmp/custom.toml"),
        ]
        .into_iter()
        .collect();

        let env_config = env_config_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(env_config.matcher.strict, Some(true));
        assert_eq!(env_config.matcher.ipv6, Some(false));
        assert_eq!(env_config.matcher.auth, None); // invalid value ignored
        assert_eq!(
            env_config.matcher.tlds,
            Some(vec!["com".to_string(), "net".to_string()])
        );
        assert_eq!(env_config.config, Some("/tmp/custom.toml".to_string()));
    }

    #[test]
    fn test_env_config_rejects_bad_tlds() {
        let env_config = env_config_from(|name| {
            (name == "URL_REGEX_TLDS").then(|| "co.uk,com".to_string())
        });
        assert_eq!(env_config.matcher.tlds, None);
    }
}
