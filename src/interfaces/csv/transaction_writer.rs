use crate::domain::transaction::Transaction;
use crate::error::Result;
use std::io::Write;

/// Writes settlement records as CSV with the header
/// `id,reference,amount,status,failure,created_at`.
pub struct TransactionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TransactionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_transactions<'a>(
        &mut self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<()> {
        for transaction in transactions {
            self.writer.serialize(transaction)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
