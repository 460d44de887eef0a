#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use payflow::application::flow::{FlowPorts, PaymentFlowController};
use payflow::config::FlowConfig;
use payflow::domain::invoice::{Amount, Invoice};
use payflow::domain::ports::SettlementNetwork;
use payflow::domain::transaction::{SettlementOutcome, TransferRequest};
use payflow::error::{FlowError, Result};
use payflow::infrastructure::ids::SequentialIdGenerator;
use payflow::infrastructure::in_memory::{FixedRateOracle, InMemoryInvoiceStore};
use payflow::infrastructure::notify::RecordingNotificationSink;
use rust_decimal_macros::dec;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

pub const INVOICES_CSV: &str = "\
number,amount,currency,client,due_date,gst_number,description
INV-001,125000,NGN,Techpoint Africa,2024-01-30,12ABCDE1234F1Z5,Software Development Services
INV-002,89500,NGN,Flutterwave,2024-02-05,27FGHIJ5678K2L9,Payment Gateway Integration
";

pub fn write_invoices(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(contents.as_bytes())
}

pub fn techpoint_invoice() -> Invoice {
    Invoice {
        number: "INV-001".to_string(),
        amount: Amount::new(dec!(125000)).unwrap(),
        currency: "NGN".to_string(),
        client: "Techpoint Africa".to_string(),
        due_date: NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
        gst_number: "12ABCDE1234F1Z5".to_string(),
        description: "Software Development Services".to_string(),
    }
}

/// A submission waiting for the test to decide its outcome.
pub struct PendingSettlement {
    pub request: TransferRequest,
    reply: oneshot::Sender<SettlementOutcome>,
}

impl PendingSettlement {
    pub fn resolve(self, outcome: SettlementOutcome) {
        let _ = self.reply.send(outcome);
    }
}

/// Settlement network whose answers are given by the test.
pub struct ManualSettlementNetwork {
    submissions: mpsc::UnboundedSender<PendingSettlement>,
}

pub fn manual_network() -> (
    Arc<ManualSettlementNetwork>,
    mpsc::UnboundedReceiver<PendingSettlement>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ManualSettlementNetwork { submissions: tx }), rx)
}

#[async_trait]
impl SettlementNetwork for ManualSettlementNetwork {
    async fn submit(&self, request: TransferRequest) -> Result<SettlementOutcome> {
        let (reply, answer) = oneshot::channel();
        self.submissions
            .send(PendingSettlement { request, reply })
            .map_err(|_| FlowError::SettlementFailed("test harness gone".to_string()))?;
        answer
            .await
            .map_err(|_| FlowError::SettlementFailed("answer dropped".to_string()))
    }
}

pub async fn start_flow(
    network: Arc<dyn SettlementNetwork>,
    config: FlowConfig,
) -> (PaymentFlowController, RecordingNotificationSink) {
    let store = InMemoryInvoiceStore::from_invoices([techpoint_invoice()]);
    let sink = RecordingNotificationSink::new();
    let ports = FlowPorts {
        rates: Box::new(FixedRateOracle::new().with_rate("NGN", "XLM", dec!(858.42))),
        network,
        notifier: Arc::new(sink.clone()),
        ids: Arc::new(SequentialIdGenerator::new()),
    };
    let flow = PaymentFlowController::start(&store, "INV-001", ports, config)
        .await
        .expect("flow should start");
    (flow, sink)
}

/// Walks a fresh or reset flow up to the transfer step.
pub fn configure(flow: &mut PaymentFlowController, amount: &str, recipient: &str) {
    flow.advance().expect("review -> configure");
    flow.set_settlement_amount(amount).expect("valid amount");
    flow.set_recipient_address(recipient);
    flow.advance().expect("configure -> transfer");
}
