//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Guard the `/_cluster` routes with bearer authentication
//! - Bind server to listener and stop on the shutdown broadcast

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::auth::bearer_auth_middleware;
use crate::http::handlers;
use crate::observability::metrics;
use crate::reroute::{ClusterService, DeprecationLog};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClusterService>,
    pub deprecation_log: Arc<DeprecationLog>,
    /// `metric` applied to reroutes that do not name one.
    pub default_metric: Arc<str>,
    pub api_key: Option<Arc<str>>,
}

/// HTTP server for the reroute API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `service`.
    pub fn new(config: &ServiceConfig, service: Arc<ClusterService>) -> Self {
        let state = AppState {
            service,
            deprecation_log: Arc::new(DeprecationLog::new()),
            default_metric: Arc::from(config.render.default_metric.as_str()),
            api_key: config.admin.api_key.as_deref().map(Arc::from),
        };

        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let cluster = Router::new()
            .route("/_cluster/reroute", post(handlers::reroute))
            .route("/_cluster/state", get(handlers::cluster_state))
            .route("/_cluster/state/{metric}", get(handlers::cluster_state_metric))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                bearer_auth_middleware,
            ));

        Router::new()
            .route("/", get(handlers::root))
            .merge(cluster)
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The fully layered router, for serving on a custom listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown broadcast fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Count requests and latency per matched route.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &path, response.status().as_u16(), start);
    response
}
