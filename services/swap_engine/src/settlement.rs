//! Settlement backend seam
//!
//! The backend executes the swap and enforces the slippage bound atomically.
//! The engine only sees whether a request was accepted.

use crate::execution::ExecutionRequest;
use crate::log_execution;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: String,
    pub request: ExecutionRequest,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("Settlement rejected the request: {reason}")]
    Rejected { reason: String },

    #[error("Settlement backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SettlementBackend: Send + Sync {
    async fn submit(&self, request: &ExecutionRequest)
        -> Result<SubmissionReceipt, SettlementError>;
}

/// Accepts every request without executing it
#[derive(Debug, Default)]
pub struct DryRunSettlement {
    submitted: AtomicU64,
}

impl DryRunSettlement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SettlementBackend for DryRunSettlement {
    async fn submit(
        &self,
        request: &ExecutionRequest,
    ) -> Result<SubmissionReceipt, SettlementError> {
        let n = self.submitted.fetch_add(1, Ordering::Relaxed) + 1;
        log_execution!(
            "dry-run submit #{}: {} {} → {} (limit {})",
            n,
            request.amount_in,
            request.asset_in.short(),
            request.asset_out.short(),
            request.amount_limit
        );
        Ok(SubmissionReceipt {
            id: format!("dry-run-{n}"),
            request: request.clone(),
        })
    }
}
