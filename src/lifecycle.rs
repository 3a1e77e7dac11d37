//! The whole run: index, serve, clean up.
//!
//! ```text
//! crawl(path)  →  Ledger
//! serve(port)  →  ServeOutcome    (blocks until shutdown or fault)
//! clean_up(&Ledger)
//! ```
//!
//! The serve phase never returns an error, so once indexing has succeeded
//! cleanup runs whichever way serving ended.

use crate::config::{self, Config, ConfigError};
use crate::crawl::{self, CrawlError};
use crate::ledger::{self, CleanupError};
use crate::server::{self, ServeOutcome};
use std::future::Future;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Indexing failed: {0}")]
    Crawl(#[from] CrawlError),
    #[error("Cleanup failed: {0}")]
    Cleanup(#[from] CleanupError),
}

/// Index `path`, serve until interrupted, then remove the generated pages.
///
/// Settings come from `path`'s `imageme.toml` if there is one, and serving
/// stops on Ctrl-C or SIGTERM.
pub fn serve_dir(path: impl AsRef<Path>) -> Result<ServeOutcome, RunError> {
    let path = path.as_ref();
    let config = config::load_config(path)?;
    serve_dir_with(path, &config, server::shutdown_signal())
}

/// Like [`serve_dir`], with explicit settings and shutdown trigger.
///
/// Serving stops when `shutdown` resolves. The returned outcome tells an
/// expected stop from a server fault; errors are reserved for indexing and
/// cleanup failures.
pub fn serve_dir_with<F>(path: &Path, config: &Config, shutdown: F) -> Result<ServeOutcome, RunError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let ledger = crawl::crawl(path, &config.gallery)?;
    tracing::info!(indexes = ledger.len(), root = %path.display(), "indexing complete");

    let outcome = server::serve(&config.gallery, &config.server, shutdown);

    ledger::clean_up(&ledger)?;
    Ok(outcome)
}
