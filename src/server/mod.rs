//! Preview server with live reload
//!
//! Serves the generated site and rebuilds it whenever the post store or
//! `_config.yml` changes, telling open pages to reload over a websocket.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebouncedEvent};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::Wabisabi;

const RELOAD_PATH: &str = "/__livereload";

/// Appended before `</body>` of every served page
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Serve the public directory until interrupted
pub async fn start(app: &Wabisabi, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: app.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let router = Router::new()
        .route(RELOAD_PATH, get(livereload_handler))
        .fallback(fallback_handler)
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Edit posts with `wabisabi new` or `wabisabi edit`.");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let base_dir = app.base_dir.clone();
        let store_dir = app.store_dir.clone();
        // The debouncer blocks on a std channel
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(&base_dir, &store_dir, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn watch_and_reload(
    base_dir: &Path,
    store_dir: &Path,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    std::fs::create_dir_all(store_dir)?;
    debouncer
        .watcher()
        .watch(store_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", store_dir);

    let config_path = base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<&DebouncedEvent> =
                    events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::info!("Changed: {}", event.path.display());
                }

                // Config edits need a fresh load, not just the posts
                match Wabisabi::new(base_dir).and_then(|app| app.generate()) {
                    Ok(()) => {
                        tracing::info!("Regenerated");
                        let _ = reload_tx.send(());
                    }
                    Err(e) => tracing::error!("Generation failed: {}", e),
                }
            }
            Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
            Err(_) => break,
        }
    }

    Ok(())
}

/// Store writes go through a temp file; only the final files matter
fn is_relevant(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("yml") | Some("yaml")
    )
}

async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(()) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve pages with the reload script injected; everything else through
/// `ServeDir`
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let page = page_path(&state.public_dir, request.uri().path());

    match page {
        Some(file) if state.live_reload => match tokio::fs::read_to_string(&file).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        },
        _ => {
            let mut service =
                ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
            match service.try_call(request).await {
                Ok(response) => response.into_response(),
                Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
            }
        }
    }
}

/// The HTML file a request path resolves to, if it is a page.
/// Paths leaving the public directory resolve to nothing.
fn page_path(public_dir: &Path, uri_path: &str) -> Option<PathBuf> {
    let relative = uri_path.trim_start_matches('/');
    if relative.split('/').any(|segment| segment == "..") {
        return None;
    }

    let candidate = public_dir.join(relative);
    let file = if relative.is_empty() || candidate.is_dir() {
        candidate.join("index.html")
    } else {
        candidate
    };

    let is_html = file
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);
    is_html.then_some(file)
}

fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body><p>x</p></body></html>");
        assert!(html.contains(RELOAD_PATH));
        assert!(html.ends_with("</body>\n</html>"));
        assert!(inject_live_reload("<p>x</p>").contains("<script>"));
    }

    #[test]
    fn test_page_path() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("blog/a")).unwrap();

        assert_eq!(
            page_path(dir.path(), "/"),
            Some(dir.path().join("index.html"))
        );
        assert_eq!(
            page_path(dir.path(), "/blog/a/"),
            Some(dir.path().join("blog/a/index.html"))
        );
        assert_eq!(page_path(dir.path(), "/css/style.css"), None);
        assert_eq!(page_path(dir.path(), "/../secret.html"), None);
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("store/wabisabi_posts.json")));
        assert!(is_relevant(Path::new("_config.yml")));
        assert!(!is_relevant(Path::new("store/wabisabi_posts.json.tmp")));
    }
}
