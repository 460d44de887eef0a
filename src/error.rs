use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("A transfer is already in progress for this flow")]
    TransferAlreadyInProgress,
    #[error("Exchange rate {from}/{to} unavailable")]
    RateUnavailable { from: String, to: String },
    #[error("Invoice {0} not found")]
    NotFound(String),
    #[error("Settlement network did not answer in time")]
    NetworkTimeout,
    #[error("Settlement failed: {0}")]
    SettlementFailed(String),
    #[error("Operation not allowed at step {0}")]
    InvalidStep(String),
    #[error("Recipient address is required")]
    MissingRecipient,
    #[error("Settlement amount deviates {deviation_bps} bps from the invoice (limit {limit_bps} bps)")]
    ReconciliationMismatch { deviation_bps: u64, limit_bps: u32 },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;
