//! Index page rendering.
//!
//! Produces the single HTML document that represents one directory: a header
//! with the location and image count, navigation links to the parent (except
//! at the crawl root) and to every subdirectory, and a table of images.
//!
//! ## Layout
//!
//! ```text
//! imageMe: ./holiday [4 image(s)]
//! ───────────────────────────────
//! ..
//! beach
//! mountains
//! ───────────────────────────────
//! | a.jpg | b.jpg | c.jpg |
//! | d.jpg |
//! ```
//!
//! Images are shown as-is, scaled to their table cell, and link to the full
//! file. No thumbnails are generated and the page carries its CSS inline, so
//! one file per directory is all a run ever writes.
//!
//! Uses [maud](https://maud.lambda.xyz/) so every interpolated name is
//! HTML-escaped; link targets are additionally percent-encoded.

use crate::config::GalleryConfig;
use crate::output;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};

/// Navigation entry pointing one level up.
pub const PARENT_ENTRY: &str = "..";

/// Render the index document for `location` and write it next to its images.
///
/// Overwrites any existing index file and returns its path. Write failures
/// are returned as-is.
pub fn write_index(
    config: &GalleryConfig,
    root: &Path,
    location: &Path,
    image_files: &[String],
    subdirs: &[String],
) -> std::io::Result<PathBuf> {
    let path = config.index_path(location);
    output::print_creating_index(&path);
    let document = render_index(config, root, location, image_files, subdirs);
    fs::write(&path, document.into_string())?;
    tracing::debug!(path = %path.display(), images = image_files.len(), "wrote index");
    Ok(path)
}

/// Render the index document for `location`.
///
/// `image_files` and `subdirs` are rendered in the order given.
pub fn render_index(
    config: &GalleryConfig,
    root: &Path,
    location: &Path,
    image_files: &[String],
    subdirs: &[String],
) -> Markup {
    let header = format!(
        "imageMe: {} [{} image(s)]",
        location.display(),
        image_files.len()
    );
    let css = gallery_css(config.images_per_row);

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { "imageMe" }
                style { (PreEscaped(css)) }
            }
            body {
                div.content {
                    h2.header { (header) }
                    hr;
                    (render_nav(config, &nav_entries(root, location, subdirs)))
                    hr;
                    (render_gallery(config, image_files))
                }
            }
        }
    }
}

/// Navigation entries for a directory: `..` unless it is the crawl root,
/// then the subdirectories.
pub fn nav_entries<'a>(root: &Path, location: &Path, subdirs: &'a [String]) -> Vec<&'a str> {
    let parent = (location != root).then_some(PARENT_ENTRY);
    parent
        .into_iter()
        .chain(subdirs.iter().map(String::as_str))
        .collect()
}

fn render_nav(config: &GalleryConfig, entries: &[&str]) -> Markup {
    let index = urlencoding::encode(&config.index_file_name);
    html! {
        @for entry in entries {
            h3.header {
                a href={ (urlencoding::encode(entry)) "/" (index) } { (entry) }
            }
        }
    }
}

/// The image table: full rows of `images_per_row` cells, then one partial
/// row for any remainder.
fn render_gallery(config: &GalleryConfig, image_files: &[String]) -> Markup {
    let per_row = config.images_per_row.max(1);
    html! {
        table {
            @for row in image_files.chunks(per_row) {
                tr {
                    @for image in row {
                        @let href = urlencoding::encode(image);
                        td {
                            a href=(href) {
                                img.image src=(href) alt=(image);
                            }
                        }
                    }
                }
            }
        }
    }
}

fn gallery_css(images_per_row: usize) -> String {
    let cell_width = 100.0 / images_per_row.max(1) as f64;
    format!(
        "html, body {{margin: 0; padding: 0;}}\n\
         .header {{text-align: right;}}\n\
         .content {{padding: 3em 4em;}}\n\
         .image {{max-width: 100%; border-radius: 0.3em;}}\n\
         td {{width: {cell_width}%;}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn render(location: &str, images: &[&str], subdirs: &[&str]) -> String {
        render_index(
            &GalleryConfig::default(),
            Path::new("."),
            Path::new(location),
            &names(images),
            &names(subdirs),
        )
        .into_string()
    }

    #[test]
    fn document_is_complete_html() {
        let html = render(".", &[], &[]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>imageMe</title>"));
        assert!(html.contains("<style>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn header_counts_images_only() {
        let html = render("./holiday", &["a.jpg", "b.png"], &["x", "y", "z"]);
        assert!(html.contains("imageMe: ./holiday [2 image(s)]"));
    }

    #[test]
    fn root_has_no_parent_link() {
        let html = render(".", &[], &["sub"]);
        assert_eq!(nav_links(&html), vec!["sub"]);
        assert!(html.contains(r#"href="sub/imageme.html""#));
    }

    #[test]
    fn subdirectory_gets_parent_link_first() {
        let html = render("./sub", &[], &["deeper", "other"]);
        assert_eq!(nav_links(&html), vec!["..", "deeper", "other"]);
        assert!(html.contains(r#"href="../imageme.html""#));
    }

    #[test]
    fn nav_entries_only_prepend_parent_below_root() {
        let subdirs = names(&["a"]);
        assert_eq!(nav_entries(Path::new("r"), Path::new("r"), &subdirs), vec!["a"]);
        assert_eq!(
            nav_entries(Path::new("r"), Path::new("r/a"), &subdirs),
            vec!["..", "a"]
        );
    }

    #[test]
    fn images_link_to_originals() {
        let html = render(".", &["a.jpg"], &[]);
        assert!(html.contains(r#"<a href="a.jpg"><img class="image" src="a.jpg" alt="a.jpg"></a>"#));
    }

    #[test]
    fn three_images_fill_exactly_one_row() {
        let html = render(".", &["a.jpg", "b.jpg", "c.jpg"], &[]);
        assert_eq!(row_cells(&html), vec![3]);
        assert_eq!(html.matches("<tr>").count(), html.matches("</tr>").count());
    }

    #[test]
    fn four_images_wrap_into_a_partial_row() {
        let html = render(".", &["a.jpg", "b.jpg", "c.jpg", "d.jpg"], &[]);
        assert_eq!(row_cells(&html), vec![3, 1]);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("</tr>").count(), 2);
        assert_eq!(gallery_images(&html), vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    }

    #[test]
    fn no_images_render_an_empty_table() {
        let html = render(".", &[], &[]);
        assert!(html.contains("<table></table>"));
        assert!(row_cells(&html).is_empty());
    }

    #[test]
    fn row_width_follows_config() {
        let config = GalleryConfig {
            images_per_row: 2,
            ..GalleryConfig::default()
        };
        let html = render_index(
            &config,
            Path::new("."),
            Path::new("."),
            &names(&["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]),
            &[],
        )
        .into_string();
        assert_eq!(row_cells(&html), vec![2, 2, 1]);
        assert!(html.contains("td {width: 50%;}"));
    }

    #[test]
    fn cell_width_is_uniform_fraction() {
        let html = render(".", &["a.jpg"], &[]);
        assert!(html.contains(&format!("td {{width: {}%;}}", 100.0 / 3.0)));
    }

    #[test]
    fn names_are_escaped_and_encoded() {
        let html = render(".", &["sun & sea.jpg"], &["<b>"]);
        assert!(html.contains(r#"src="sun%20%26%20sea.jpg""#));
        assert!(html.contains(r#"alt="sun &amp; sea.jpg""#));
        assert!(html.contains(">&lt;b&gt;</a>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn custom_index_name_is_used_in_links() {
        let config = GalleryConfig {
            index_file_name: "gallery.html".to_string(),
            ..GalleryConfig::default()
        };
        let html = render_index(
            &config,
            Path::new("."),
            Path::new("./sub"),
            &[],
            &names(&["x"]),
        )
        .into_string();
        assert!(html.contains(r#"href="../gallery.html""#));
        assert!(html.contains(r#"href="x/gallery.html""#));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render("./sub", &["a.jpg", "b.jpg"], &["c"]);
        let b = render("./sub", &["a.jpg", "b.jpg"], &["c"]);
        assert_eq!(a, b);
    }

    #[test]
    fn write_index_creates_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let config = GalleryConfig::default();
        let target = tmp.path().join("imageme.html");
        std::fs::write(&target, "stale").unwrap();

        let path = write_index(&config, tmp.path(), tmp.path(), &names(&["a.jpg"]), &[]).unwrap();

        assert_eq!(path, target);
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(gallery_images(&html), vec!["a.jpg"]);
    }

    #[test]
    fn write_index_into_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        let result = write_index(&GalleryConfig::default(), tmp.path(), &missing, &[], &[]);
        assert!(result.is_err());
        assert!(!missing.exists());
    }
}
