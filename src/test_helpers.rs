//! Shared test utilities for the imageme test suite.
//!
//! Builds throwaway directory trees and pulls the interesting parts back out
//! of rendered index pages, so tests can assert on galleries and navigation
//! without matching whole documents.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = gallery_tree(&["a.jpg", "sub/b.png", "notes.txt"]);
//! let ledger = crawl(tmp.path(), &GalleryConfig::default()).unwrap();
//!
//! let html = read_index(tmp.path());
//! assert_eq!(gallery_images(&html), vec!["a.jpg"]);
//! assert_eq!(nav_links(&html), vec!["sub"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding the given relative files.
///
/// Entries ending in `/` become empty directories; everything else becomes a
/// small file, with parent directories created as needed.
pub fn gallery_tree(entries: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for entry in entries {
        let path = tmp.path().join(entry);
        if entry.ends_with('/') {
            fs::create_dir_all(&path).unwrap();
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, entry.as_bytes()).unwrap();
        }
    }
    tmp
}

/// Read the default-named index page of a directory. Panics if missing.
pub fn read_index(dir: &Path) -> String {
    let path = dir.join("imageme.html");
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("index {} not readable: {e}", path.display()))
}

// =========================================================================
// Index page extractors
// =========================================================================

/// Image sources in gallery order.
pub fn gallery_images(html: &str) -> Vec<&str> {
    html.split(r#"<img class="image" src=""#)
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect()
}

/// Navigation link texts in page order.
pub fn nav_links(html: &str) -> Vec<&str> {
    html.split(r#"<h3 class="header"><a href=""#)
        .skip(1)
        .filter_map(|rest| {
            let text = rest.split_once("\">")?.1;
            text.split("</a>").next()
        })
        .collect()
}

/// Number of cells in each gallery row.
pub fn row_cells(html: &str) -> Vec<usize> {
    html.split("<tr>")
        .skip(1)
        .map(|rest| {
            let row = rest.split("</tr>").next().unwrap_or_default();
            row.matches("<td>").count()
        })
        .collect()
}
