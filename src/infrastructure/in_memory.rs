use crate::domain::invoice::Invoice;
use crate::domain::ports::{InvoiceStore, RateOracle};
use crate::error::{FlowError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store of invoices keyed by invoice number.
///
/// Uses `Arc<RwLock<HashMap<String, Invoice>>>` so clones share the same
/// invoices.
#[derive(Default, Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<String, Invoice>>>,
}

impl InMemoryInvoiceStore {
    /// Creates a new, empty in-memory invoice store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_invoices(invoices: impl IntoIterator<Item = Invoice>) -> Self {
        let invoices = invoices
            .into_iter()
            .map(|invoice| (invoice.number.clone(), invoice))
            .collect();
        Self {
            invoices: Arc::new(RwLock::new(invoices)),
        }
    }

    /// Inserts or replaces an invoice.
    pub async fn insert(&self, invoice: Invoice) {
        let mut invoices = self.invoices.write().await;
        invoices.insert(invoice.number.clone(), invoice);
    }

    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.invoices.read().await.is_empty()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn get_invoice(&self, number: &str) -> Result<Invoice> {
        let invoices = self.invoices.read().await;
        invoices
            .get(number)
            .cloned()
            .ok_or_else(|| FlowError::NotFound(number.to_string()))
    }
}

/// A rate oracle answering from a fixed table of quotes.
#[derive(Default, Clone)]
pub struct FixedRateOracle {
    rates: HashMap<(String, String), Decimal>,
}

impl FixedRateOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates.insert((from.to_string(), to.to_string()), rate);
        self
    }
}

#[async_trait]
impl RateOracle for FixedRateOracle {
    async fn get_rate(&self, from_currency: &str, to_asset: &str) -> Result<Decimal> {
        self.rates
            .get(&(from_currency.to_string(), to_asset.to_string()))
            .copied()
            .ok_or_else(|| FlowError::RateUnavailable {
                from: from_currency.to_string(),
                to: to_asset.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::Amount;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice(number: &str) -> Invoice {
        Invoice {
            number: number.to_string(),
            amount: Amount::new(dec!(89500)).unwrap(),
            currency: "NGN".to_string(),
            client: "Flutterwave".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            gst_number: "27FGHIJ5678K2L9".to_string(),
            description: "Payment Gateway Integration".to_string(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_invoice_store() {
        let store = InMemoryInvoiceStore::new();
        assert!(store.is_empty().await);
        store.insert(invoice("INV-002")).await;

        let retrieved = store.get_invoice("INV-002").await.unwrap();
        assert_eq!(retrieved, invoice("INV-002"));
        assert!(matches!(
            store.get_invoice("INV-999").await,
            Err(FlowError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_clones_share_invoices() {
        let store = InMemoryInvoiceStore::from_invoices([invoice("INV-002")]);
        let clone = store.clone();
        clone.insert(invoice("INV-003")).await;
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_fixed_rate_oracle() {
        let oracle = FixedRateOracle::new().with_rate("NGN", "XLM", dec!(858.42));
        assert_eq!(oracle.get_rate("NGN", "XLM").await.unwrap(), dec!(858.42));
        assert!(matches!(
            oracle.get_rate("USD", "XLM").await,
            Err(FlowError::RateUnavailable { .. })
        ));
    }
}
