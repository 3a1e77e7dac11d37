//! Gallery and server configuration.
//!
//! Every setting has a default, so imageme runs with no configuration at all.
//! A crawl root may carry an `imageme.toml` that overrides individual values:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! index_file_name = "imageme.html"   # Name of the generated page in every directory
//! image_extensions = ["png", "jpg", "jpeg", "tif", "tiff", "gif", "bmp"]
//! images_per_row = 3                 # Columns in the gallery table
//!
//! [server]
//! host = "0.0.0.0"                   # Listening interface
//! port = 8000                        # Overridden by the CLI argument
//! root = "."                         # Document root requests resolve against
//! ```
//!
//! The file is read once and never written back. Unknown keys are rejected to
//! catch typos early.
//!
//! A [`Config`] is an immutable value handed to the crawler, renderer and
//! server, so independent runs (tests included) never share settings.

use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional configuration file looked up in the crawl root.
pub const CONFIG_FILE_NAME: &str = "imageme.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How index pages are named and laid out.
    pub gallery: GalleryConfig,
    /// Where and what the HTTP server serves.
    pub server: ServerConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gallery.validate()
    }
}

/// Settings shared by the crawler and the index renderer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// File name of the page generated in every directory.
    pub index_file_name: String,
    /// Case-sensitive extensions (without the dot) that mark a file as an image.
    pub image_extensions: Vec<String>,
    /// Number of gallery columns per table row.
    pub images_per_row: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            index_file_name: "imageme.html".to_string(),
            image_extensions: ["png", "jpg", "jpeg", "tif", "tiff", "gif", "bmp"]
                .into_iter()
                .map(String::from)
                .collect(),
            images_per_row: 3,
        }
    }
}

impl GalleryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images_per_row == 0 {
            return Err(ConfigError::Validation(
                "gallery.images_per_row must be at least 1".into(),
            ));
        }
        let name = self.index_file_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "gallery.index_file_name must be a plain file name, got {name:?}"
            )));
        }
        if self.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.image_extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .image_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains('.'))
        {
            return Err(ConfigError::Validation(format!(
                "gallery.image_extensions entries must be bare extensions, got {bad:?}"
            )));
        }
        Ok(())
    }

    /// Whether `file_name` names an image.
    ///
    /// The whole name must be a non-empty stem, a dot, and one of the
    /// configured extensions, compared case-sensitively:
    /// - `"a.jpg"` and `"x.tar.png"` match
    /// - `".png"` (empty stem), `"a.JPG"` and `"a.jpg.txt"` do not
    pub fn is_image(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) => {
                !stem.is_empty() && self.image_extensions.iter().any(|known| known == ext)
            }
            None => false,
        }
    }

    /// Path of the index file for a directory.
    pub fn index_path(&self, location: &Path) -> PathBuf {
        location.join(&self.index_file_name)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to listen on; all interfaces by default.
    pub host: IpAddr,
    pub port: u16,
    /// Directory request paths resolve against.
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            root: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Load config from `imageme.toml` in the given directory.
///
/// Returns the defaults when the file does not exist. User values are sparse
/// overrides on top of the defaults; unknown keys are rejected and the result
/// is validated.
pub fn load_config(root: &Path) -> Result<Config, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Parse and validate a TOML config document.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
