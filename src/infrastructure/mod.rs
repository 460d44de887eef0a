//! In-process adapters for the domain ports.

pub mod ids;
pub mod in_memory;
pub mod notify;
pub mod settlement;
