//! Console output for every phase of a run.
//!
//! Lines are meant for a person watching the terminal, not for parsing:
//!
//! ```text
//! Processing ./holiday
//! Creating index file ./holiday/imageme.html
//! Your images are at http://127.0.0.1:8000/imageme.html
//! User interrupted, stopping
//! Cleaning up
//! Removing ./holiday/imageme.html
//! ```
//!
//! Each line has a `format_*` function (pure, testable) and a `print_*`
//! wrapper that writes it to stdout. Diagnostics that are not part of this
//! conversation with the user go through `tracing` instead.

use crate::server::ServeOutcome;
use std::path::Path;

pub fn format_processing(dir: &Path) -> String {
    format!("Processing {}", dir.display())
}

pub fn format_creating_index(path: &Path) -> String {
    format!("Creating index file {}", path.display())
}

/// The URL announced before the server starts accepting connections.
pub fn format_serving_url(port: u16, index_file_name: &str) -> String {
    format!("Your images are at http://127.0.0.1:{port}/{index_file_name}")
}

/// Why the server stopped. A fault prints its error before the stop line.
pub fn format_stop(outcome: &ServeOutcome) -> Vec<String> {
    match outcome {
        ServeOutcome::Interrupted => vec!["User interrupted, stopping".to_string()],
        ServeOutcome::Faulted(err) => vec![
            err.to_string(),
            "Unhandled fault in server, stopping".to_string(),
        ],
    }
}

pub fn format_cleanup_start() -> String {
    "Cleaning up".to_string()
}

pub fn format_removing(path: &Path) -> String {
    format!("Removing {}", path.display())
}

pub fn print_processing(dir: &Path) {
    println!("{}", format_processing(dir));
}

pub fn print_creating_index(path: &Path) {
    println!("{}", format_creating_index(path));
}

pub fn print_serving_url(port: u16, index_file_name: &str) {
    println!("{}", format_serving_url(port, index_file_name));
}

pub fn print_stop(outcome: &ServeOutcome) {
    for line in format_stop(outcome) {
        println!("{}", line);
    }
}

pub fn print_cleanup_start() {
    println!("{}", format_cleanup_start());
}

pub fn print_removing(path: &Path) {
    println!("{}", format_removing(path));
}
