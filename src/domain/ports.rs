use super::invoice::Invoice;
use super::transaction::{SettlementOutcome, TransferRequest};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Fails with `FlowError::NotFound` when no invoice carries `number`.
    async fn get_invoice(&self, number: &str) -> Result<Invoice>;
}

#[async_trait]
pub trait RateOracle: Send + Sync {
    /// Fiat units of `from_currency` per one unit of `to_asset`.
    async fn get_rate(&self, from_currency: &str, to_asset: &str) -> Result<Decimal>;
}

#[async_trait]
pub trait SettlementNetwork: Send + Sync {
    /// Submits one transfer and resolves once the network has an answer.
    ///
    /// An `Err` is treated by callers the same as a rejection.
    async fn submit(&self, request: TransferRequest) -> Result<SettlementOutcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

/// Receives user-facing messages. Implementations must return promptly.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub trait IdGenerator: Send + Sync {
    fn transaction_id(&self) -> String;
    fn network_reference(&self) -> String;
}

pub type RateOracleBox = Box<dyn RateOracle>;
pub type SettlementNetworkRef = Arc<dyn SettlementNetwork>;
pub type NotificationSinkRef = Arc<dyn NotificationSink>;
pub type IdGeneratorRef = Arc<dyn IdGenerator>;
