//! Recursive index generation.
//!
//! Walks a directory tree top-down and writes one index page into every
//! directory it visits, including the root:
//!
//! ```text
//! photos/                  # crawl root
//! ├── imageme.html         # generated: gallery of a.jpg, b.png; link to trip/
//! ├── a.jpg
//! ├── b.png
//! ├── notes.txt            # not an image, left alone
//! └── trip/
//!     ├── imageme.html     # generated: gallery of c.jpg; link to ..
//!     └── c.jpg
//! ```
//!
//! The tree is read exactly once: [`survey`] builds every directory's listing
//! from a single walk, then [`crawl`] renders them.
//!
//! ## Ordering
//!
//! Image names and subdirectory names are sorted by byte value before
//! rendering, so `Z.gif` sorts ahead of `a.jpg`. Directories are visited
//! parent first, siblings in the same order, and the returned [`Ledger`]
//! follows the visit order.
//!
//! ## Classification
//!
//! A file is an image when its whole name matches one of the configured
//! extensions (see [`GalleryConfig::is_image`]). Hidden files get no special
//! treatment, and an index page left over from an earlier run is simply not
//! an image; it is overwritten when its directory is visited. Symlinks to
//! directories are linked to but not descended into.
//!
//! ## Unreadable directories
//!
//! A subdirectory that cannot be listed is logged and skipped along with
//! everything below it. It still shows up as a link in its parent's page.
//! Failing to read the root, or to write any index page, aborts the crawl.

use crate::config::GalleryConfig;
use crate::ledger::Ledger;
use crate::output;
use crate::render;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One directory of the tree, its entries split and sorted for rendering.
#[derive(Debug, PartialEq)]
pub struct DirectoryNode {
    pub path: PathBuf,
    pub images: Vec<String>,
    pub subdirs: Vec<String>,
}

impl DirectoryNode {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            images: Vec::new(),
            subdirs: Vec::new(),
        }
    }
}

/// Generate an index page in `root` and every directory below it.
///
/// Returns the written paths in visit order. If a page cannot be written,
/// the pages written so far are removed again before the error is returned.
pub fn crawl(root: &Path, config: &GalleryConfig) -> Result<Ledger, CrawlError> {
    let nodes = survey(root, config)?;
    let mut ledger = Ledger::new();
    for node in &nodes {
        output::print_processing(&node.path);
        match render::write_index(config, root, &node.path, &node.images, &node.subdirs) {
            Ok(index) => ledger.record(index),
            Err(err) => {
                ledger.discard();
                return Err(err.into());
            }
        }
    }
    Ok(ledger)
}

/// List every readable directory under `root` in a single walk, parents
/// first.
///
/// Entries that are neither images nor directories are left out of the
/// listings.
pub fn survey(root: &Path, config: &GalleryConfig) -> Result<Vec<DirectoryNode>, CrawlError> {
    let mut nodes: Vec<DirectoryNode> = Vec::new();
    let mut slots: HashMap<PathBuf, usize> = HashMap::new();
    let mut unreadable: HashSet<usize> = HashSet::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_fatal(&err, root) => return Err(err.into()),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                if let Some(&slot) = err.path().and_then(|path| slots.get(path)) {
                    unreadable.insert(slot);
                }
                continue;
            }
        };

        if entry.depth() > 0 {
            let parent = entry.path().parent().and_then(|path| slots.get(path));
            if let Some(&parent) = parent {
                let name = entry.file_name().to_string_lossy().into_owned();
                let is_dir = entry.file_type().is_dir()
                    || (entry.path_is_symlink() && entry.path().is_dir());
                if is_dir {
                    nodes[parent].subdirs.push(name);
                } else if config.is_image(&name) {
                    nodes[parent].images.push(name);
                }
            }
        }

        if entry.file_type().is_dir() {
            slots.insert(entry.path().to_path_buf(), nodes.len());
            nodes.push(DirectoryNode::new(entry.into_path()));
        }
    }

    Ok(nodes
        .into_iter()
        .enumerate()
        .filter(|(slot, _)| !unreadable.contains(slot))
        .map(|(_, mut node)| {
            node.images.sort();
            node.subdirs.sort();
            node
        })
        .collect())
}

/// Errors about the root itself end the walk; anything deeper is skipped.
fn is_fatal(err: &walkdir::Error, root: &Path) -> bool {
    match err.path() {
        Some(path) => path == root,
        None => err.depth() == 0,
    }
}
