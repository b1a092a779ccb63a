use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use tower_http::{
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod flash;
mod handlers;
mod media;
mod models;
mod multipart;
mod store;
mod views;

use config::Config;
use handlers::{
    admin_handler, delete_handler, edit_form_handler, edit_handler, index_handler,
    upload_form_handler, upload_handler, video_handler,
};
use media::MediaKind;
use models::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("video_hosting={},tower_http=debug", config.log_level))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = Arc::new(AppState::new(config.clone()));

    // Ensure storage exists
    state.media.ensure_dirs().await.context("creating media directories")?;
    state.records.ensure_exists().await.context("creating data file")?;

    print_startup_info(&config);
    if config.debug {
        warn!("⚠️  Debug diagnostics are enabled, error details are sent to clients");
    }

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;

    info!("✅ Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let videos = ServeDir::new(state.media.dir(MediaKind::Video));
    let previews = ServeDir::new(state.media.dir(MediaKind::Preview));

    Router::new()
        .route("/", get(index_handler))
        .route("/upload", get(upload_form_handler).post(upload_handler))
        .route("/video/:filename", get(video_handler))
        .route("/admin", get(admin_handler))
        .route("/admin/delete/:filename", post(delete_handler))
        .route("/admin/edit/:filename", get(edit_form_handler).post(edit_handler))
        .nest_service("/media/videos", videos)
        .nest_service("/media/previews", previews)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn print_startup_info(config: &Config) {
    println!("{}", "=".repeat(60));
    println!("🚀 Video Hosting {} Starting...", env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(60));
    println!("  Listen: http://{}:{}", config.host, config.port);
    println!("  Data File: {:?}", config.data_file);
    println!("  Upload Dir: {:?}", config.upload_dir);
    println!("  Preview Dir: {:?}", config.preview_dir);
    println!("  Max File Size: {} MB", config.max_file_size / 1024 / 1024);
    println!("  Debug: {}", config.debug);
    println!("{}", "=".repeat(60));
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        eprintln!("Failed to install Ctrl+C handler: {}", err);
    }
    info!("Shutting down");
}
