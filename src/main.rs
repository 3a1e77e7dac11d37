use clap::Parser;
use imageme::{config, server};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imageme")]
#[command(about = "Instant image gallery for the current directory")]
#[command(long_about = "\
Instant image gallery for the current directory

Writes an imageme.html gallery page into this directory and every directory
below it, serves them at http://127.0.0.1:PORT/imageme.html, and removes the
pages again when you press Ctrl-C.

Images are files ending in .png .jpg .jpeg .tif .tiff .gif or .bmp. Settings
can be overridden with an imageme.toml in this directory.")]
#[command(version)]
struct Cli {
    /// Port to serve on [default: 8000, or the port in imageme.toml]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = Path::new(".");

    let mut config = config::load_config(root)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    imageme::serve_dir_with(root, &config, server::shutdown_signal())?;
    Ok(())
}
