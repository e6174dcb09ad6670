// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BIM2GIS Server - georeferencing service for IFC models.
//!
//! This server places IFC models on the globe. It supports:
//!
//! - Georeference extraction and WGS84 pose resolution for uploads
//! - Manual placement from lon/lat or projected coordinates
//! - Point reprojection between registered CRS
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/georef` - Extract georeference and pose (multipart `file`)
//! - `POST /api/v1/reproject` - Reproject a point
//! - `POST /api/v1/pose/manual` - Pose from manual coordinates
//! - `GET /api/v1/utm-zone/:lng` - UTM zone for a longitude
//! - `GET /api/v1/crs` - Registered CRS identifiers

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use bim2gis_reproject::{CrsRegistry, PoseResolver, Reprojector};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PoseResolver>,
    pub config: Arc<Config>,
}

impl AppState {
    /// State over the default registry; the configured default CRS must be
    /// registered.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let registry = Arc::new(CrsRegistry::with_defaults());
        registry
            .get(&config.default_crs)
            .with_context(|| format!("DEFAULT_CRS {} is not registered", config.default_crs))?;

        let resolver = PoseResolver::new(Reprojector::new(registry), &config.default_crs);
        Ok(Self {
            resolver: Arc::new(resolver),
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug,bim2gis_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        max_file_size_mb = config.max_file_size_mb,
        request_timeout_secs = config.request_timeout_secs,
        default_crs = %config.default_crs,
        "Starting BIM2GIS Server"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config)?;
    tracing::info!(
        crs_count = state.resolver.reprojector().registry().len(),
        "CRS registry ready"
    );

    let app = app(state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build the router with all routes and middleware.
fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        // Georeferencing
        .route("/api/v1/georef", post(routes::georef::georef))
        .route("/api/v1/reproject", post(routes::georef::reproject))
        .route("/api/v1/pose/manual", post(routes::georef::manual_pose))
        // CRS registry
        .route("/api/v1/utm-zone/:lng", get(routes::crs::utm_zone))
        .route("/api/v1/crs", get(routes::crs::list))
        // Middleware
        .layer(DefaultBodyLimit::max(config.max_file_size_bytes()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// CORS from configured origins; "*" allows everything.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
