use crate::config::ImageConfig;
use crate::handlers;
use crate::services::{LocalStorage, Storage};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use metrics::{counter, describe_counter, Counter};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::request_id::request_id_middleware;
use service_core::observability::MetricsRegistry;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const UPLOAD_COUNTER: &str = "image_upload_total";

#[derive(Clone)]
pub struct AppState {
    pub config: ImageConfig,
    pub storage: Arc<dyn Storage>,
    pub metrics: MetricsRegistry,
    pub upload_counter: Counter,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    pub async fn build(config: ImageConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.upload_dir)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize upload directory at {}: {}",
                        config.storage.upload_dir,
                        e
                    );
                    e
                })?,
        );

        let metrics = MetricsRegistry::new().with_process_metrics();
        // Registered up front so the counter is exposed as 0 before any upload.
        let upload_counter = metrics.record(|| {
            describe_counter!(UPLOAD_COUNTER, "Total uploaded images");
            counter!(UPLOAD_COUNTER)
        });

        let state = AppState {
            config: config.clone(),
            storage,
            metrics,
            upload_counter,
        };

        let router = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.state.metrics
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.storage.max_upload_bytes;

    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route(
            "/upload",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/images/:filename", get(handlers::get_image))
        .route("/metrics", get(handlers::metrics_endpoint))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
