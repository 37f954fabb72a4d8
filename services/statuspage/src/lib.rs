//! Status page incident synchronization service
//!
//! Consumes service health reports, decides when to open or update incidents
//! on a remote status page, and mirrors accepted incidents locally so open
//! incidents survive a restart.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod incident;
pub mod io;
pub mod narrative;
pub mod report;
pub mod severity;
pub mod store;
pub mod tracker;

pub use config::{load_config, Config};
pub use error::{Result, StatusPageError};

use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;

use crate::api::StatusPageClient;
use crate::engine::Engine;
use crate::io::ReqwestHttpClient;
use crate::report::HealthReport;
use crate::store::{IncidentStore, SqliteStore};
use crate::tracker::new_tracker_handle;

/// Run the service with the given configuration.
///
/// Rehydrates the tracker from the store before the first report is read,
/// then feeds newline-delimited JSON health reports from stdin to the engine
/// until the stream closes or ctrl-c.
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let store: Arc<dyn IncidentStore> = Arc::new(SqliteStore::open(&config.store_path)?);
    let client = StatusPageClient::new(&config, http);
    let engine = Engine::new(config, client, store, new_tracker_handle());

    engine.load_active().await?;

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    tracing::info!("Status page engine started");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<HealthReport>(line) {
                            Ok(report) => engine.process_report(&report).await,
                            Err(e) => tracing::warn!("Ignoring malformed health report: {}", e),
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Report stream closed");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Reading report stream failed: {}", e);
                        break;
                    }
                }
            }
            _ = cancel.cancelled() => {
                break;
            }
        }
    }

    tracing::info!("Status page engine stopped");
    Ok(())
}
