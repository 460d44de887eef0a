//! Domain model of the invoice payment flow and the ports it talks to.

pub mod invoice;
pub mod ports;
pub mod rate;
pub mod step;
pub mod transaction;
