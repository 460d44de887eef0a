use crate::domain::invoice::Invoice;
use crate::error::{FlowError, Result};
use std::io::Read;

/// Reads invoices from a CSV source.
///
/// Expects the header `number,amount,currency,client,due_date,gst_number,description`.
/// Fields are trimmed; amounts must be positive and dates use `YYYY-MM-DD`.
pub struct InvoiceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvoiceReader<R> {
    /// Creates a new `InvoiceReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes invoices.
    pub fn invoices(self) -> impl Iterator<Item = Result<Invoice>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(FlowError::from))
    }
}
