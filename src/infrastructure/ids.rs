use crate::domain::ports::IdGenerator;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Issues `TXN-000001`, `TXN-000002`, ... and matching references.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    transactions: AtomicU64,
    references: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn transaction_id(&self) -> String {
        let n = self.transactions.fetch_add(1, Ordering::Relaxed) + 1;
        format!("TXN-{n:06}")
    }

    fn network_reference(&self) -> String {
        let n = self.references.fetch_add(1, Ordering::Relaxed) + 1;
        format!("stellar_{n:06}")
    }
}

/// Random v4 UUID based identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn transaction_id(&self) -> String {
        format!("TXN-{}", Uuid::new_v4().simple())
    }

    fn network_reference(&self) -> String {
        format!("stellar_{}", Uuid::new_v4().simple())
    }
}
