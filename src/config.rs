use crate::error::{FlowError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

/// Settings for a payment flow.
///
/// Loaded from JSON; every field is optional and falls back to the
/// `Default` value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlowConfig {
    /// Asset code the invoice is settled in.
    pub settlement_asset: String,
    /// Fee added on top of the settlement amount, in the settlement asset.
    pub network_fee: Decimal,
    /// Longest wait for the settlement network before the transfer is failed.
    pub settlement_timeout_ms: u64,
    /// Allowed deviation between `settlement * rate` and the invoice total,
    /// in basis points. `None` disables the check.
    pub reconciliation_tolerance_bps: Option<u32>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            settlement_asset: "XLM".to_string(),
            network_fee: dec!(0.00001),
            settlement_timeout_ms: 30_000,
            reconciliation_tolerance_bps: None,
        }
    }
}

impl FlowConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: FlowConfig =
            serde_json::from_reader(reader).map_err(|e| FlowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.settlement_asset.trim().is_empty() {
            return Err(FlowError::Config(
                "settlement_asset must not be empty".to_string(),
            ));
        }
        if self.network_fee < Decimal::ZERO {
            return Err(FlowError::Config(
                "network_fee must not be negative".to_string(),
            ));
        }
        if self.settlement_timeout_ms == 0 {
            return Err(FlowError::Config(
                "settlement_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn settlement_timeout(&self) -> Duration {
        Duration::from_millis(self.settlement_timeout_ms)
    }
}
