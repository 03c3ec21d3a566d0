//! URL Regex Safe CLI Application
//!
//! A command-line interface for finding URLs and bare domain names in text.
//! This CLI application provides a user-friendly interface to the
//! url-regex-safe-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url_regex_safe_lib::generate::{generate_tlds, render_tld_list};
use url_regex_safe_lib::{
    load_env_config, parse_timeout_string, sort_tlds_by_length, validate_tlds, ConfigManager,
    EnvConfig, FileConfig, OutputFormat, UrlMatch, UrlMatcher, UrlRegexOptions,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for url-regex-safe
#[derive(Parser, Debug)]
#[command(name = "url-regex-safe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find URLs and bare domain names in text")]
#[command(
    long_about = "Find URLs and bare domain names in text using a linear-time regular expression.\n\nThe pattern is assembled from feature flags and an embedded list of IANA top-level domains."
)]
#[command(styles = STYLES)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Use specific config file instead of automatic discovery
    #[arg(
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Configuration"
    )]
    pub config: Option<String>,

    /// Verbose logging (sets the log filter to debug)
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        help_heading = "Configuration"
    )]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every URL found in FILE (or stdin)
    Find {
        /// Input file; reads stdin when omitted or "-"
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output matches as a JSON array with byte offsets
        #[arg(short = 'j', long = "json", help_heading = "Output Format")]
        json: bool,

        /// Print only the number of matches
        #[arg(
            short = 'c',
            long = "count",
            conflicts_with = "json",
            help_heading = "Output Format"
        )]
        count: bool,

        #[command(flatten)]
        matcher: MatcherArgs,
    },

    /// Report whether each argument matches; exits 1 if any does not
    Check {
        /// Texts to test
        #[arg(value_name = "TEXT", required = true)]
        texts: Vec<String>,

        #[command(flatten)]
        matcher: MatcherArgs,
    },

    /// Print the assembled regular expression
    Pattern {
        #[command(flatten)]
        matcher: MatcherArgs,
    },

    /// List the effective TLDs in the order they are tried
    Tlds {
        #[command(flatten)]
        matcher: MatcherArgs,
    },

    /// Download the IANA registry and regenerate the TLD list
    GenTlds {
        /// Write the list to FILE instead of stdout
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Registry URL
        #[arg(long = "url", value_name = "URL")]
        url: Option<String>,

        /// Download timeout, e.g. 30s or 2m
        #[arg(long = "timeout", value_name = "DURATION")]
        timeout: Option<String>,

        /// Max entries decoded concurrently (1-256)
        #[arg(long = "concurrency", value_name = "N")]
        concurrency: Option<usize>,
    },
}

/// Matcher flags shared by the matching subcommands.
///
/// Boolean flags only ever switch away from the default, so an unset flag
/// leaves config file and environment values in place.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct MatcherArgs {
    /// The whole input must be a single URL
    #[arg(long = "exact", help_heading = "Matching")]
    pub exact: bool,

    /// Require a scheme or www. and accept any alphabetic TLD
    #[arg(long = "strict", help_heading = "Matching")]
    pub strict: bool,

    /// Accept user:pass@ credentials
    #[arg(long = "auth", help_heading = "Matching")]
    pub auth: bool,

    /// Do not match localhost
    #[arg(long = "no-localhost", help_heading = "Matching")]
    pub no_localhost: bool,

    /// Let paths run through closing parentheses
    #[arg(long = "parens", help_heading = "Matching")]
    pub parens: bool,

    /// Let paths run through apostrophes
    #[arg(long = "apostrophes", help_heading = "Matching")]
    pub apostrophes: bool,

    /// Accept one '.' after the TLD
    #[arg(long = "trailing-period", help_heading = "Matching")]
    pub trailing_period: bool,

    /// Do not match IPv4 hosts
    #[arg(long = "no-ipv4", help_heading = "Matching")]
    pub no_ipv4: bool,

    /// Do not match IPv6 hosts
    #[arg(long = "no-ipv6", help_heading = "Matching")]
    pub no_ipv6: bool,

    /// Replace the TLD list (comma-separated or multiple --tld flags)
    #[arg(long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Matching")]
    pub tlds: Option<Vec<String>>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.verbose);
    debug!(
        "url-regex-safe CLI v{} starting ({} embedded TLDs)",
        env!("CARGO_PKG_VERSION"),
        url_regex_safe_lib::default_tld_count()
    );

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    match run(args).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Install the stderr log subscriber.
///
/// `-v` forces `debug`; otherwise `RUST_LOG` is honoured with `warn` as the
/// fallback.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    match &args.command {
        Command::Find { matcher, .. }
        | Command::Check { matcher, .. }
        | Command::Pattern { matcher }
        | Command::Tlds { matcher } => {
            if let Some(tlds) = &matcher.tlds {
                if tlds.is_empty() {
                    return Err("--tld requires at least one TLD".to_string());
                }
                validate_tlds(tlds).map_err(|e| e.to_string())?;
            }
        }
        Command::GenTlds {
            timeout,
            concurrency,
            ..
        } => {
            if let Some(concurrency) = concurrency {
                if *concurrency == 0 || *concurrency > 256 {
                    return Err("Concurrency must be between 1 and 256".to_string());
                }
            }
            if let Some(timeout) = timeout {
                if parse_timeout_string(timeout).is_none() {
                    return Err(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Dispatch a subcommand. `Ok(false)` means "ran fine, but exit non-zero".
async fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let file_config = load_file_config(args.config.as_deref(), &env_config, args.verbose)?;

    match args.command {
        Command::Find {
            file,
            json,
            count,
            matcher,
        } => {
            let options = build_options(&matcher, &file_config, &env_config);
            let matcher = UrlMatcher::new(options)?;
            let text = read_input(file.as_deref())?;
            let format = output_format(json, count);
            display_matches(&matcher.find_iter(&text).collect::<Vec<_>>(), format)?;
            Ok(true)
        }
        Command::Check { texts, matcher } => {
            let options = build_options(&matcher, &file_config, &env_config);
            let matcher = UrlMatcher::new(options)?;
            Ok(run_check(&matcher, &texts))
        }
        Command::Pattern { matcher } => {
            let options = build_options(&matcher, &file_config, &env_config);
            let matcher = UrlMatcher::new(options)?;
            println!("{}", matcher.as_str());
            Ok(true)
        }
        Command::Tlds { matcher } => {
            let options = build_options(&matcher, &file_config, &env_config);
            for tld in sort_tlds_by_length(&options.tlds) {
                println!("{}", tld);
            }
            Ok(true)
        }
        Command::GenTlds {
            output,
            url,
            timeout,
            concurrency,
        } => {
            let mut settings = file_config.generator.unwrap_or_default();
            if url.is_some() {
                settings.url = url;
            }
            if timeout.is_some() {
                settings.timeout = timeout;
            }
            if concurrency.is_some() {
                settings.concurrency = concurrency;
            }
            run_generate(settings.settings(), output).await?;
            Ok(true)
        }
    }
}

/// Load file configuration: `--config`, then `URL_REGEX_CONFIG`, then discovery.
///
/// An explicitly named file must load; discovered files are best-effort.
fn load_file_config(
    explicit: Option<&str>,
    env_config: &EnvConfig,
    verbose: bool,
) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new(verbose);

    let explicit_path = explicit.or(env_config.config.as_deref());
    if let Some(path) = explicit_path {
        debug!("using explicit config file: {}", path);
        let file_config = config_manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?;
        return Ok(file_config);
    }

    Ok(config_manager.discover_and_load()?)
}

/// Resolve matcher options: defaults < config file < environment < CLI flags.
fn build_options(
    args: &MatcherArgs,
    file_config: &FileConfig,
    env_config: &EnvConfig,
) -> UrlRegexOptions {
    let mut options = UrlRegexOptions::default();

    if let Some(defaults) = &file_config.matcher {
        options = defaults.apply(options);
    }
    options = env_config.matcher.apply(options);

    apply_cli_args(options, args)
}

/// Apply CLI flags (highest precedence).
fn apply_cli_args(mut options: UrlRegexOptions, args: &MatcherArgs) -> UrlRegexOptions {
    if args.exact {
        options.exact = true;
    }
    if args.strict {
        options.strict = true;
    }
    if args.auth {
        options.auth = true;
    }
    if args.no_localhost {
        options.localhost = false;
    }
    if args.parens {
        options.parens = true;
    }
    if args.apostrophes {
        options.apostrophes = true;
    }
    if args.trailing_period {
        options.trailing_period = true;
    }
    if args.no_ipv4 {
        options.ipv4 = false;
    }
    if args.no_ipv6 {
        options.ipv6 = false;
    }
    if let Some(tlds) = &args.tlds {
        options.tlds = tlds.iter().map(|t| t.trim().to_lowercase()).collect();
    }
    options
}

fn output_format(json: bool, count: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if count {
        OutputFormat::Count
    } else {
        OutputFormat::Text
    }
}

/// Read the whole input from a file, or stdin for `None` / `-`.
fn read_input(file: Option<&std::path::Path>) -> Result<String, Box<dyn std::error::Error>> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            debug!(bytes = text.len(), "read input file {}", path.display());
            Ok(text)
        }
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            debug!(bytes = text.len(), "read stdin");
            Ok(text)
        }
    }
}

fn display_matches(
    matches: &[UrlMatch<'_>],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(matches)?;
            println!("{}", json);
        }
        OutputFormat::Count => println!("{}", matches.len()),
        OutputFormat::Text => {
            for m in matches {
                ui::print_match(m);
            }
        }
    }
    Ok(())
}

/// Print one verdict per input; true if all matched.
fn run_check(matcher: &UrlMatcher, texts: &[String]) -> bool {
    let mut matched = 0;
    for text in texts {
        let is_match = matcher.is_match(text);
        if is_match {
            matched += 1;
        }
        ui::print_check_result(text, is_match);
    }

    if texts.len() > 1 {
        ui::print_check_summary(texts.len(), matched);
    }

    matched == texts.len()
}

async fn run_generate(
    settings: url_regex_safe_lib::GenerateConfig,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let spinner = ui::Spinner::start(format!("Fetching {} ...", settings.url));
    let result = generate_tlds(&settings).await;
    spinner.stop().await;
    let tlds = result?;

    let rendered = render_tld_list(&tlds);
    match &output {
        Some(path) => {
            std::fs::write(path, rendered)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            info!("wrote {} TLDs to {}", tlds.len(), path.display());
        }
        None => print!("{}", rendered),
    }

    let destination = output.as_ref().map(|p| p.display().to_string());
    ui::print_generation_summary(tlds.len(), destination.as_deref(), start.elapsed());
    Ok(())
}
