//! Startup orchestration.
//!
//! # Responsibilities
//! - Seed the cluster state from validated configuration
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Logging and metrics are installed by the binary, not here, so tests
//!   can start several services in one process

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::cluster::ClusterError;
use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::reroute::ClusterService;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid cluster definition: {0}")]
    Cluster(#[from] ClusterError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A started service and the handles needed to stop it.
///
/// Sending on the shutdown channel makes the server stop accepting and
/// drain in-flight requests.
pub struct RunningService {
    pub local_addr: SocketAddr,
    pub cluster: Arc<ClusterService>,
    shutdown: broadcast::Sender<()>,
    server: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningService {
    /// A sender that stops this service, for signal handlers.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown.clone()
    }

    /// Trigger shutdown and wait for the server to drain.
    pub async fn stop(self) -> Result<(), std::io::Error> {
        let _ = self.shutdown.send(());
        self.wait().await
    }

    /// Wait for the server task to finish.
    pub async fn wait(self) -> Result<(), std::io::Error> {
        match self.server.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

/// Seed the cluster, bind the listener and spawn the HTTP server.
pub async fn start(config: &ServiceConfig) -> Result<RunningService, StartupError> {
    let initial = config.cluster.build_state()?;
    tracing::info!(
        cluster_name = %initial.cluster_name(),
        nodes = initial.nodes().len(),
        indices = initial.metadata().indices().count(),
        "Cluster state seeded"
    );
    let cluster = Arc::new(ClusterService::new(initial));

    let address = &config.listener.bind_address;
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr()?;

    let (shutdown, _) = broadcast::channel(1);
    let server = HttpServer::new(config, cluster.clone());
    let server = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Ok(RunningService {
        local_addr,
        cluster,
        shutdown,
        server,
    })
}
