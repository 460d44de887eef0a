use crate::domain::ports::SettlementNetwork;
use crate::domain::transaction::{SettlementOutcome, TransferRequest};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// A settlement network stand-in that answers every request with the same
/// outcome after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedSettlementNetwork {
    delay: Duration,
    outcome: SettlementOutcome,
}

impl SimulatedSettlementNetwork {
    pub fn confirming(delay: Duration) -> Self {
        Self {
            delay,
            outcome: SettlementOutcome::Confirmed,
        }
    }

    pub fn rejecting(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            delay,
            outcome: SettlementOutcome::Rejected(reason.into()),
        }
    }
}

#[async_trait]
impl SettlementNetwork for SimulatedSettlementNetwork {
    async fn submit(&self, request: TransferRequest) -> Result<SettlementOutcome> {
        info!(
            recipient = %request.masked_recipient(),
            amount = %request.settlement_amount,
            memo = %request.memo,
            delay = ?self.delay,
            "simulated transfer accepted"
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.outcome.clone())
    }
}
