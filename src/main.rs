//! CardioCheck - Heart Disease Prediction Server
//!
//! Collects patient vitals through a two-step web form, runs them through a
//! pre-trained binary classifier and offers a one-page PDF summary.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         CARDIOCHECK                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────┐   ┌────────────────────┐  │
//! │  │  Intake    │──▶│  Prediction  │──▶│  Report            │  │
//! │  │  (forms)   │   │  (classifier)│   │  (PDF + JWT check) │  │
//! │  └────────────┘   └──────┬───────┘   └────────────────────┘  │
//! │                          ▼                                   │
//! │                 ┌─────────────────┐                          │
//! │                 │ Model artifact  │  loaded once, read-only  │
//! │                 └─────────────────┘                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod classifier;
mod config;
mod error;
mod handlers;
mod models;
mod report;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("CardioCheck server starting...");

    if config.is_production() && config.uses_default_secret() {
        tracing::warn!("REPORT_SECRET is not set; report tokens use the development secret");
    }

    // Load the classifier once; handlers share it read-only
    let model = classifier::load(&config.model_path)
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;

    let views = views::Views::new().context("Failed to compile templates")?;

    // Build application state
    let state = AppState::new(model, views, config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cardiocheck=debug,tower_http=debug".into());

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn classifier::Classifier>,
    pub model_info: Arc<classifier::ModelInfo>,
    pub views: Arc<views::Views>,
    pub signer: report::ReportSigner,
    pub config: config::Config,
}

impl AppState {
    pub fn new(model: classifier::LoadedModel, views: views::Views, config: config::Config) -> Self {
        Self {
            classifier: model.classifier,
            model_info: Arc::new(model.info),
            views: Arc::new(views),
            signer: report::ReportSigner::new(&config.report_secret, config.report_token_ttl_minutes),
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/input_details", post(handlers::pages::input_details))
        .route("/predict", post(handlers::predict::predict))
        .route("/download_report", post(handlers::report::download))
        .route("/health", get(handlers::health::check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
