//! Message-based worker boundary. The host sends correlated requests over an
//! mpsc channel; a background task maps each op onto the ticker and answers
//! with a progress message followed by a terminal completion or error.
//!
//! The worker never panics the host. Phase errors come back as
//! `WorkerResponse::Error`; whatever the batch already committed before the
//! failure stays committed, since mutations are idempotent or additive.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::SimError;
use crate::sim::WorldTicker;
use crate::store::batch::FlushStats;

/// Channel depth for both directions.
const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerOp {
    SimulateEncounters,
    ProcessMovement,
    UpdateTerritories,
    RedistributeCharacters,
    CreateNewCharacters,
    FullWorldUpdate,
    ClearCache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRequest {
    /// Correlation id echoed on every response.
    pub id: u64,
    pub op: WorkerOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerResponse {
    Progress { id: u64, percent: u8 },
    Complete { id: u64, op: WorkerOp, stats: FlushStats },
    Error { id: u64, message: String },
}

/// Client side of a spawned worker.
pub struct WorkerHandle {
    pub requests: mpsc::Sender<WorkerRequest>,
    pub responses: mpsc::Receiver<WorkerResponse>,
    pub task: JoinHandle<()>,
}

/// Spawn the worker task. It runs until the request sender is dropped.
pub fn spawn_worker(ticker: Arc<WorldTicker>) -> WorkerHandle {
    let (request_tx, mut request_rx) = mpsc::channel::<WorkerRequest>(CHANNEL_CAPACITY);
    let (response_tx, response_rx) = mpsc::channel::<WorkerResponse>(CHANNEL_CAPACITY);

    let task = tokio::spawn(async move {
        while let Some(request) = request_rx.recv().await {
            let started = response_tx
                .send(WorkerResponse::Progress {
                    id: request.id,
                    percent: 0,
                })
                .await;
            if started.is_err() {
                // Host dropped the response channel; nothing left to serve.
                return;
            }

            debug!(id = request.id, op = ?request.op, "worker op start");
            let response = match run_op(&ticker, request.op).await {
                Ok(stats) => WorkerResponse::Complete {
                    id: request.id,
                    op: request.op,
                    stats,
                },
                Err(e) => {
                    warn!(id = request.id, op = ?request.op, error = %e, "worker op failed");
                    WorkerResponse::Error {
                        id: request.id,
                        message: e.to_string(),
                    }
                }
            };
            if response_tx.send(response).await.is_err() {
                return;
            }
        }
    });

    WorkerHandle {
        requests: request_tx,
        responses: response_rx,
        task,
    }
}

async fn run_op(ticker: &WorldTicker, op: WorkerOp) -> Result<FlushStats, SimError> {
    match op {
        WorkerOp::SimulateEncounters => ticker.simulate_encounters().await,
        WorkerOp::ProcessMovement => ticker.process_movement().await,
        WorkerOp::UpdateTerritories => ticker.update_territories().await,
        WorkerOp::RedistributeCharacters => ticker.redistribute_characters().await,
        WorkerOp::CreateNewCharacters => ticker.create_new_characters().await,
        WorkerOp::FullWorldUpdate => ticker.full_world_update().await,
        WorkerOp::ClearCache => {
            ticker.clear_cache().await;
            Ok(FlushStats::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&WorkerOp::FullWorldUpdate).unwrap();
        assert_eq!(json, "\"FULL_WORLD_UPDATE\"");
        let back: WorkerOp = serde_json::from_str("\"CLEAR_CACHE\"").unwrap();
        assert_eq!(back, WorkerOp::ClearCache);
    }

    #[test]
    fn responses_tag_by_type() {
        let resp = WorkerResponse::Progress { id: 4, percent: 0 };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"type\":\"progress\""), "{json}");
    }
}
