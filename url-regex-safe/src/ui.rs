//! Terminal display logic for the url-regex-safe CLI.
//!
//! Match listings go to stdout and stay plain when piped; `console` drops the
//! styling automatically when stdout is not a terminal. Progress and
//! summaries go to stderr so stdout can be redirected safely.

use console::{pad_str, style, Alignment, Term};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url_regex_safe_lib::UrlMatch;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner, or a no-op one when stderr is not a terminal.
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));

        if !Term::stderr().is_term() {
            return Self {
                running,
                handle: None,
            };
        }

        let running_clone = running.clone();
        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Matches ──────────────────────────────────────────────────────────────────

/// Print one match per line.
pub fn print_match(m: &UrlMatch<'_>) {
    println!("{}", style(m.text).green());
}

/// Print the outcome of `check` for one input.
pub fn print_check_result(text: &str, matched: bool) {
    let status = if matched {
        style(pad_str("match", 8, Alignment::Left, None)).green().bold()
    } else {
        style(pad_str("no match", 8, Alignment::Left, None)).red().bold()
    };
    println!("{} {}", status, text);
}

// ── Summaries ────────────────────────────────────────────────────────────────

/// Summary line for `check`, printed to stderr when more than one input.
pub fn print_check_summary(total: usize, matched: usize) {
    let missed = total - matched;
    eprintln!(
        "{} input{}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        style("|").dim(),
        style(format!("{} matched", matched)).green(),
        if missed == 0 {
            style(format!("{} missed", missed)).dim()
        } else {
            style(format!("{} missed", missed)).red()
        },
    );
}

/// Summary line for `gen-tlds`, printed to stderr.
pub fn print_generation_summary(count: usize, destination: Option<&str>, duration: Duration) {
    let target = destination.unwrap_or("stdout");
    eprintln!(
        "{} {} TLD{} to {} in {:.1}s",
        style("Wrote").green().bold(),
        style(count).bold(),
        if count == 1 { "" } else { "s" },
        style(target).cyan(),
        duration.as_secs_f64(),
    );
}
