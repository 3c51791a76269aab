//! Payment gateway seam.
//!
//! The booking workflow charges through the `PaymentGateway` trait so the
//! mock can later be swapped for a real processor. `MockGateway` simulates
//! the external call with a fixed delay and a configurable outcome; a
//! decline and a cancellation are both defined failure branches even
//! though the demo flow only ever exercises approval.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

/// Simulated processor latency, matching the demo's fixed 2s delay.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

// ─── Cancellation ─────────────────────────────────────────────────────────────

/// Create a linked cancel handle/token pair.
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Caller-side handle: signals every linked token.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Cooperative cancellation signal passed into a charge.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that can never fire, for call sites with no cancel path.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when the linked handle fires. If the handle was dropped
    /// without firing, this pends forever.
    pub async fn cancelled(mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

// ─── Gateway contract ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub amount: f64,
    /// Human-readable reference shown on the statement line.
    pub reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub amount: f64,
    /// ISO 8601 charge timestamp.
    pub charged_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("payment cancelled before completion")]
    Cancelled,
}

pub trait PaymentGateway {
    /// Charge the given amount. Must respect `cancel` while the call is
    /// in flight; once a gateway resolves, the charge is settled.
    fn charge(
        &self,
        request: ChargeRequest,
        cancel: CancelToken,
    ) -> impl Future<Output = Result<PaymentReceipt, PaymentError>> + Send;
}

// ─── Mock implementation ──────────────────────────────────────────────────────

/// Fixed-latency simulated processor. Approves everything unless built
/// with `declining`.
pub struct MockGateway {
    delay: Duration,
    decline_reason: Option<String>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            decline_reason: None,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            decline_reason: None,
        }
    }

    /// A gateway whose every charge is declined with the given reason.
    pub fn declining(reason: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            decline_reason: Some(reason.to_string()),
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentGateway for MockGateway {
    async fn charge(
        &self,
        request: ChargeRequest,
        cancel: CancelToken,
    ) -> Result<PaymentReceipt, PaymentError> {
        tokio::select! {
            _ = tokio::time::sleep(self.delay) => {
                if let Some(reason) = &self.decline_reason {
                    tracing::warn!(amount = request.amount, %reason, "Mock charge declined");
                    return Err(PaymentError::Declined(reason.clone()));
                }
                tracing::info!(amount = request.amount, reference = %request.reference, "Mock charge approved");
                Ok(PaymentReceipt {
                    transaction_id: Uuid::new_v4().to_string(),
                    amount: request.amount,
                    charged_at: chrono::Utc::now().to_rfc3339(),
                })
            }
            _ = cancel.cancelled() => Err(PaymentError::Cancelled),
        }
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
