//! Application layer orchestrating the payment flow.
//!
//! `PaymentFlowController` owns the step cursor and the single transaction
//! of a flow, and coordinates the ports defined in `domain::ports`.

pub mod flow;
