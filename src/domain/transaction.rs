use super::invoice::Amount;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        self != TransactionStatus::Pending
    }
}

/// What `confirm_transfer` hands to the settlement network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    pub settlement_amount: Amount,
    pub recipient_address: String,
    pub memo: String,
}

impl TransferRequest {
    /// Recipient shortened for display, e.g. `GC...ABC123`.
    pub fn masked_recipient(&self) -> String {
        let chars: Vec<char> = self.recipient_address.chars().collect();
        if chars.len() <= 8 {
            return self.recipient_address.clone();
        }
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[chars.len() - 6..].iter().collect();
        format!("{head}...{tail}")
    }
}

/// Final answer of a settlement network for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    Confirmed,
    Rejected(String),
}

/// The settlement record produced by a payment flow.
///
/// `id`, `reference`, `amount` and `created_at` never change after creation.
/// `status` moves once from `Pending` to `Confirmed` or `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub reference: String,
    pub amount: Amount,
    pub status: TransactionStatus,
    /// Why settlement failed. Only set when `status` is `Failed`.
    pub failure: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn pending(id: String, reference: String, amount: Amount) -> Self {
        Self {
            id,
            reference,
            amount,
            status: TransactionStatus::Pending,
            failure: None,
            created_at: Utc::now(),
        }
    }

    /// Marks the transaction confirmed. Returns `false` if it was already terminal.
    pub fn confirm(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TransactionStatus::Confirmed;
        true
    }

    /// Marks the transaction failed. Returns `false` if it was already terminal.
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TransactionStatus::Failed;
        self.failure = Some(reason.into());
        true
    }
}
