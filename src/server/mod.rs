//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::catalog::{parse_navigation_selection, parse_page, Sections};
use crate::Blog;

/// Live reload script injected into HTML pages
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
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    /// Replaced when the config is reloaded
    sections: RwLock<Sections>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: blog.public_dir.clone(),
        sections: RwLock::new(blog.config.sections.clone()),
        reload_tx,
        live_reload: watch,
    });

    // Create router with live reload endpoint
    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    tracing::info!("Server running at {}", url);
    if watch {
        tracing::info!("Live reload enabled. Watching for changes...");
    }
    tracing::info!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    // Start file watcher if watch mode is enabled
    if watch {
        spawn_watcher(blog.clone(), state);
    }

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run the file watcher on the blocking pool.
///
/// The debounced watcher delivers on a blocking channel, so it must not sit
/// on a runtime worker.
fn spawn_watcher(blog: Blog, state: Arc<ServerState>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = watch_and_reload(blog, state) {
            tracing::error!("File watcher error: {}", e);
        }
    })
}

/// Watch for file changes, regenerate and trigger reload
fn watch_and_reload(blog: Blog, state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&blog.source_dir, &blog.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = blog.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    // Handle file change events
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant_events: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant_change(&e.path))
                    .collect();

                if relevant_events.is_empty() {
                    continue;
                }

                for event in &relevant_events {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Reopen so config edits apply
                let blog = match Blog::new(&blog.base_dir) {
                    Ok(blog) => blog,
                    Err(e) => {
                        tracing::error!("Failed to reload config: {:#}", e);
                        continue;
                    }
                };

                tracing::info!("Regenerating...");
                match blog.generate() {
                    Ok(summary) => {
                        tracing::info!(
                            "Regenerated {} posts and {} listing pages",
                            summary.posts,
                            summary.listing_pages
                        );
                        if let Ok(mut sections) = state.sections.write() {
                            *sections = blog.config.sections.clone();
                        }
                        // Notify all connected clients to reload
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Ignore editor backups and VCS noise
fn is_relevant_change(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            // Wait for reload signal
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            // Handle incoming messages (ping/pong)
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

/// Fallback handler that serves files and injects live reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path();

    // `/?section=..&category=..` style links land on the pre-rendered listing
    if path == "/" {
        if let Some(query) = request.uri().query() {
            let target = match state.sections.read() {
                Ok(sections) => listing_redirect(query, &sections, &state.public_dir),
                Err(_) => None,
            };
            if let Some(target) = target {
                return Redirect::temporary(&target).into_response();
            }
        }
    }

    if escapes_root(path) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    // Determine the file path
    let file_path = if path == "/" {
        state.public_dir.join("index.html")
    } else {
        let clean_path = path.trim_start_matches('/');
        let candidate = state.public_dir.join(clean_path);

        // If it's a directory, look for index.html
        if candidate.is_dir() {
            candidate.join("index.html")
        } else if candidate.exists() {
            candidate
        } else {
            // Try adding .html extension
            let with_html = state.public_dir.join(format!("{}.html", clean_path));
            if with_html.exists() {
                with_html
            } else {
                candidate
            }
        }
    };

    // Check if it's an HTML file that needs live reload injection
    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false)
        || file_path.ends_with("index.html");

    if is_html && state.live_reload {
        // Read and inject live reload script
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => {
                let injected = inject_live_reload(&content);
                Html(injected).into_response()
            }
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        // Serve static file using tower-http
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Where a query-string listing URL should redirect to.
///
/// Returns `None` when the query selects the plain home page. Listings that
/// were not generated, such as an empty filter combination, go to `/`.
fn listing_redirect(query: &str, sections: &Sections, public_dir: &Path) -> Option<String> {
    let selection = parse_navigation_selection(query, sections);
    let target = selection.listing_path(parse_page(query));
    if target == "/" {
        return None;
    }

    let generated = public_dir
        .join(target.trim_start_matches('/'))
        .join("index.html");
    if generated.exists() {
        Some(target)
    } else {
        tracing::debug!("No listing at {}, redirecting home", target);
        Some("/".to_string())
    }
}

/// Whether a request path tries to climb out of the public directory
fn escapes_root(path: &str) -> bool {
    Path::new(path.trim_start_matches('/'))
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        // If no </body> tag, append to end
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
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
    use crate::config::SiteConfig;
    use std::fs;

    fn public_with(paths: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for path in paths {
            let page = dir.path().join(path).join("index.html");
            fs::create_dir_all(page.parent().unwrap()).unwrap();
            fs::write(page, "<html></html>").unwrap();
        }
        dir
    }

    #[test]
    fn test_listing_redirect() {
        let public = public_with(&["", "section/data-ai/category/llm", "series/python/page/2"]);
        let sections = Sections::default();

        assert_eq!(
            listing_redirect("category=LLM", &sections, public.path()).as_deref(),
            Some("/section/data-ai/category/llm/")
        );
        assert_eq!(
            listing_redirect("series=python&page=2", &sections, public.path()).as_deref(),
            Some("/series/python/page/2/")
        );
    }

    #[test]
    fn test_listing_redirect_home() {
        let public = public_with(&[""]);
        let sections = Sections::default();

        assert_eq!(listing_redirect("", &sections, public.path()), None);
        assert_eq!(listing_redirect("section=unknown", &sections, public.path()), None);
        // Not generated
        assert_eq!(
            listing_redirect("section=data-ai&page=40", &sections, public.path()).as_deref(),
            Some("/")
        );
    }

    #[test]
    fn test_escapes_root() {
        assert!(!escapes_root("/"));
        assert!(!escapes_root("/assets/main.css"));
        assert!(escapes_root("/../secret"));
        assert!(escapes_root("/a/../../b"));
    }

    #[test]
    fn test_watcher_leaves_the_runtime_free() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("contents")).unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        let (reload_tx, _) = broadcast::channel(1);
        let state = Arc::new(ServerState {
            public_dir: blog.public_dir.clone(),
            sections: RwLock::new(Sections::default()),
            reload_tx,
            live_reload: true,
        });

        // A single thread: a watcher blocking it would stall this forever
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let finished = runtime.block_on(async {
            let _watcher = spawn_watcher(blog, state);
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            true
        });
        assert!(finished);
        runtime.shutdown_background();
    }

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body><p>hi</p></body></html>");
        assert!(html.contains("/__livereload"));
        assert!(html.ends_with("</html>"));
        assert_eq!(html.matches("</body>").count(), 1);

        let bare = inject_live_reload("<p>fragment</p>");
        assert!(bare.starts_with("<p>fragment</p>"));
        assert!(bare.contains("/__livereload"));
    }
}
