//! # imageme
//!
//! A zero-configuration image gallery server. Point it at a directory of
//! images and it writes a browsable HTML page into every directory of the
//! tree, serves the tree over local HTTP, and removes the pages again when
//! you stop it.
//!
//! # Architecture: One Linear Run
//!
//! ```text
//! 1. Crawl     photos/   →  imageme.html in every directory  (+ Ledger of paths)
//! 2. Serve     http://127.0.0.1:8000/imageme.html            (until Ctrl-C)
//! 3. Clean up  Ledger    →  every generated page removed
//! ```
//!
//! Nothing is cached or persisted between runs: galleries are recomputed from
//! the filesystem each time and the only files ever written are the index
//! pages themselves.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Immutable run settings, defaults, optional `imageme.toml` |
//! | [`render`] | Renders one directory's index page with Maud and writes it |
//! | [`crawl`] | Walks the tree, classifies images, renders every directory |
//! | [`ledger`] | Ordered record of generated pages and their removal |
//! | [`server`] | Axum/tower-http file server with directory → index mapping |
//! | [`lifecycle`] | Crawl → serve → clean up, the embeddable entry points |
//! | [`output`] | Console progress lines |
//!
//! # Embedding
//!
//! [`serve_dir`] runs the whole thing against any directory and blocks until
//! Ctrl-C. [`serve_dir_with`] takes explicit settings and a shutdown future,
//! which is how tests stop the server without sending signals:
//!
//! ```no_run
//! use imageme::{Config, serve_dir_with};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let outcome = serve_dir_with(Path::new("photos"), &config, async {})?;
//! assert!(outcome.is_interrupted());
//! # Ok::<(), imageme::RunError>(())
//! ```

pub mod config;
pub mod crawl;
pub mod ledger;
pub mod lifecycle;
pub mod output;
pub mod render;
pub mod server;

pub use config::Config;
pub use lifecycle::{RunError, serve_dir, serve_dir_with};
pub use server::ServeOutcome;

#[cfg(test)]
pub(crate) mod test_helpers;
