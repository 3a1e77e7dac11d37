//! Local HTTP file server.
//!
//! Serves the files under a document root over plain HTTP:
//!
//! - `GET /dir/` answers with `/dir/<index file name>`
//! - `GET /dir` redirects to `/dir/` so relative links in the index resolve
//! - `GET /file.jpg` answers with the file's bytes and a content type guessed
//!   from its extension
//!
//! File serving itself is `tower-http`'s [`ServeDir`]; this module only maps
//! directory requests onto index files in front of it. Only GET and HEAD are
//! answered.
//!
//! ## Stopping
//!
//! [`serve`] blocks the calling thread on a single-threaded Tokio runtime until
//! its shutdown future resolves (by default [`shutdown_signal`]: Ctrl-C, or
//! SIGINT/SIGTERM on Unix). The future is polled once before the URL is
//! printed; if it is already complete, nothing is served. Whatever ends the serve phase, the result is reported as a
//! [`ServeOutcome`] and control returns to the caller. Embedders already
//! running Tokio can bind with [`bind_listener`] and drive [`run`] themselves.

use crate::config::{GalleryConfig, ServerConfig};
use crate::output;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware;
use axum::response::{IntoResponse, Redirect, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;
use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const LISTEN_BACKLOG: u32 = 1024;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Could not start server runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("Could not bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// How the serve phase ended.
#[derive(Debug)]
pub enum ServeOutcome {
    /// The shutdown signal arrived; the expected way to stop.
    Interrupted,
    /// The server could not start or failed while running.
    Faulted(ServerError),
}

impl ServeOutcome {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ServeOutcome::Interrupted)
    }
}

/// Serve until `shutdown` resolves or the server faults.
///
/// Prints the browsable URL once the listener is bound and a stop line when
/// serving ends. Never returns an error: faults are folded into
/// [`ServeOutcome::Faulted`].
pub fn serve<F>(gallery: &GalleryConfig, server: &ServerConfig, shutdown: F) -> ServeOutcome
where
    F: Future<Output = ()> + Send + 'static,
{
    let outcome = match serve_until(gallery, server, shutdown) {
        Ok(()) => ServeOutcome::Interrupted,
        Err(err) => {
            tracing::warn!(error = %err, "server stopped on a fault");
            ServeOutcome::Faulted(err)
        }
    };
    output::print_stop(&outcome);
    outcome
}

fn serve_until<F>(gallery: &GalleryConfig, server: &ServerConfig, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ServerError::Runtime)?;

    runtime.block_on(async {
        let listener = bind_listener(server.socket_addr())?;
        let port = listener.local_addr().map_err(ServerError::Serve)?.port();
        let mut shutdown = Box::pin(shutdown);
        // Signal handlers are installed on first poll; that has to happen
        // before the URL goes out.
        if poll_once(shutdown.as_mut()).await {
            return Ok(());
        }
        output::print_serving_url(port, &gallery.index_file_name);
        run(listener, router(&server.root, &gallery.index_file_name), shutdown).await
    })
}

/// Poll `future` a single time, reporting whether it completed.
async fn poll_once<F: Future<Output = ()>>(mut future: Pin<&mut F>) -> bool {
    std::future::poll_fn(|cx| Poll::Ready(future.as_mut().poll(cx).is_ready())).await
}

/// Bind a listener with `SO_REUSEADDR` set, so a restart does not trip over
/// the previous run's socket lingering in `TIME_WAIT`.
///
/// Must be called from within a Tokio runtime.
pub fn bind_listener(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    let bind_error = |source: std::io::Error| ServerError::Bind { addr, source };
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(bind_error)?;
    socket.set_reuseaddr(true).map_err(bind_error)?;
    socket.bind(addr).map_err(bind_error)?;
    let listener = socket.listen(LISTEN_BACKLOG).map_err(bind_error)?;
    tracing::debug!(%addr, "listener bound");
    Ok(listener)
}

/// Accept connections on `listener` until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

/// Resolves on SIGINT (Ctrl-C) or SIGTERM.
///
/// The handlers are registered synchronously the first time the future is
/// polled, before it waits on anything. [`serve`] polls it once before
/// announcing the URL, so a signal sent right after the announcement is
/// always caught.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let streams = signal(SignalKind::interrupt())
        .and_then(|interrupt| Ok((interrupt, signal(SignalKind::terminate())?)));
    match streams {
        Ok((mut interrupt, mut terminate)) => {
            tokio::select! {
                _ = interrupt.recv() => {},
                _ = terminate.recv() => {},
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not listen for SIGINT/SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

/// Resolves on Ctrl-C.
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Build the router serving `root`, with directories mapped to
/// `index_file_name`.
pub fn router(root: &Path, index_file_name: &str) -> Router {
    let site = Arc::new(Site {
        root: root.to_path_buf(),
        index_file_name: index_file_name.to_string(),
    });
    let files = ServeDir::new(root).append_index_html_on_directories(false);

    Router::new()
        .fallback_service(files)
        .layer(middleware::map_request_with_state(
            site,
            map_directory_requests,
        ))
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug)]
struct Site {
    root: PathBuf,
    index_file_name: String,
}

impl Site {
    /// Whether a request path names a directory under the root.
    ///
    /// Paths that try to leave the root are never directories here; the
    /// file service rejects them on its own.
    async fn is_directory(&self, uri_path: &str) -> bool {
        let Ok(decoded) = urlencoding::decode(uri_path) else {
            return false;
        };
        let mut resolved = self.root.clone();
        for component in Path::new(decoded.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return false,
            }
        }
        tokio::fs::metadata(&resolved)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}

/// Point directory requests at their index file.
async fn map_directory_requests(
    State(site): State<Arc<Site>>,
    mut request: Request,
) -> Result<Request, Response> {
    let path = request.uri().path().to_owned();
    if !site.is_directory(&path).await {
        return Ok(request);
    }

    let query = request
        .uri()
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();

    if !path.ends_with('/') {
        let target = format!("/{}/{query}", path.trim_start_matches('/'));
        return Err(Redirect::permanent(&target).into_response());
    }

    let rewritten = format!(
        "{path}{}{query}",
        urlencoding::encode(&site.index_file_name)
    );
    let uri: Uri = rewritten
        .parse()
        .map_err(|_| StatusCode::BAD_REQUEST.into_response())?;
    tracing::debug!(from = %path, to = %uri, "directory request mapped to index");
    *request.uri_mut() = uri;
    Ok(request)
}
