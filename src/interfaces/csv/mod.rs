pub mod invoice_reader;
pub mod transaction_writer;
