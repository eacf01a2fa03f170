//! FaasGate Server - standalone HTTP host for FaasGate functions.
//!
//! This binary hosts the dispatch core behind a plain HTTP listener, serving
//! the same routes a serverless deployment would serve behind a provider
//! trigger.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:8080 faasgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use faasgate_hyper::GateHttpService;
use faasgate_router::{Dispatcher, Registry};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: GateHttpService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Read the listen address from the environment.
fn gateway_listen_addr() -> String {
    std::env::var("GATEWAY_LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
}

/// Read the log level from the environment.
fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let log = log_level();
    init_tracing(&log)?;

    // A failed route load is fatal: the process must not come up serving
    // from an empty table.
    let registry = Registry::new();
    let table = registry
        .get_or_init(routes::register)
        .context("failed to load route table")?;

    let dispatcher = Arc::new(Dispatcher::new(table));
    let service = GateHttpService::new(dispatcher);

    let listen_addr = gateway_listen_addr();
    let addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("invalid bind address: {listen_addr}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting FaasGate Server");

    serve(listener, service).await
}
