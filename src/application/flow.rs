use crate::config::FlowConfig;
use crate::domain::invoice::{Amount, Invoice};
use crate::domain::ports::{
    IdGeneratorRef, InvoiceStore, Notification, NotificationSinkRef, RateOracleBox, Severity,
    SettlementNetworkRef,
};
use crate::domain::rate::ExchangeRate;
use crate::domain::step::{PaymentStep, StepView};
use crate::domain::transaction::{SettlementOutcome, Transaction, TransactionStatus, TransferRequest};
use crate::error::{FlowError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type TransactionSlot = Arc<RwLock<Option<Transaction>>>;

/// Collaborators a flow needs once the invoice has been loaded.
pub struct FlowPorts {
    pub rates: RateOracleBox,
    pub network: SettlementNetworkRef,
    pub notifier: NotificationSinkRef,
    pub ids: IdGeneratorRef,
}

/// Drives one invoice from review to a settled transaction.
///
/// The flow moves through `Review`, `Configure`, `Transfer` and `Confirm`
/// strictly in that order. Confirming the transfer creates a single
/// `Transaction` and submits it to the settlement network in a background
/// task; the outcome is written back to that transaction when it arrives.
///
/// All mutating methods take `&mut self`: one caller drives a flow at a time.
pub struct PaymentFlowController {
    invoice: Invoice,
    config: FlowConfig,
    ports: FlowPorts,
    current_step: PaymentStep,
    rate: Option<ExchangeRate>,
    settlement_amount: Option<Amount>,
    recipient_address: String,
    transaction: TransactionSlot,
    settlement_task: Option<JoinHandle<()>>,
}

impl PaymentFlowController {
    /// Loads the invoice and opens a flow at `Review`.
    ///
    /// A missing invoice aborts with `NotFound`. A failing rate oracle does
    /// not: the flow opens without a quote and cannot leave `Configure`
    /// until `refresh_rate` succeeds.
    pub async fn start(
        invoices: &dyn InvoiceStore,
        invoice_number: &str,
        ports: FlowPorts,
        config: FlowConfig,
    ) -> Result<Self> {
        config.validate()?;
        let invoice = invoices.get_invoice(invoice_number).await?;
        info!(invoice = %invoice.number, client = %invoice.client, "payment flow started");

        let mut controller = Self {
            invoice,
            config,
            ports,
            current_step: PaymentStep::Review,
            rate: None,
            settlement_amount: None,
            recipient_address: String::new(),
            transaction: Arc::new(RwLock::new(None)),
            settlement_task: None,
        };
        if let Err(e) = controller.refresh_rate().await {
            warn!(invoice = %controller.invoice.number, error = %e, "starting without exchange rate");
            controller.ports.notifier.notify(Notification {
                title: "Exchange Rate Unavailable".to_string(),
                body: format!("{e}. Payment details cannot be confirmed until a rate is available."),
                severity: Severity::Warning,
            });
        }
        Ok(controller)
    }

    /// Queries the rate oracle again. A failure keeps the previous quote.
    pub async fn refresh_rate(&mut self) -> Result<ExchangeRate> {
        let from = &self.invoice.currency;
        let to = &self.config.settlement_asset;
        match self.ports.rates.get_rate(from, to).await {
            Ok(rate) if rate > Decimal::ZERO => {
                let quote = ExchangeRate {
                    from: from.clone(),
                    to: to.clone(),
                    rate,
                };
                debug!(from = %from, to = %to, rate = %rate, "exchange rate refreshed");
                self.rate = Some(quote.clone());
                Ok(quote)
            }
            Ok(rate) => {
                warn!(from = %from, to = %to, rate = %rate, "rate oracle returned a non-positive rate");
                Err(self.rate_unavailable())
            }
            Err(e) => {
                warn!(from = %from, to = %to, error = %e, "rate oracle failed");
                Err(self.rate_unavailable())
            }
        }
    }

    /// Moves to the next step and returns the step now current.
    ///
    /// At `Confirm` this is a no-op. `Transfer` can only be left through
    /// `confirm_transfer`, and `Configure` only while a rate is held.
    pub fn advance(&mut self) -> Result<PaymentStep> {
        if self.current_step.is_terminal() {
            return Ok(self.current_step);
        }
        match self.current_step {
            PaymentStep::Transfer => {
                return Err(FlowError::InvalidStep(PaymentStep::Transfer.to_string()));
            }
            PaymentStep::Configure if self.rate.is_none() => return Err(self.rate_unavailable()),
            _ => {}
        }
        if let Some(next) = self.current_step.next() {
            self.current_step = next;
            info!(invoice = %self.invoice.number, step = %next, "payment flow advanced");
        }
        Ok(self.current_step)
    }

    /// Parses and stores the settlement amount. Invalid input leaves the
    /// previous amount in place.
    pub fn set_settlement_amount(&mut self, value: &str) -> Result<Amount> {
        let amount = Amount::parse(value)?;
        self.settlement_amount = Some(amount);
        Ok(amount)
    }

    /// Stored verbatim. Address format is the settlement network's concern.
    pub fn set_recipient_address(&mut self, value: impl Into<String>) {
        self.recipient_address = value.into();
    }

    /// Creates the transaction and submits it for settlement.
    ///
    /// Returns as soon as the transaction exists with status `Pending` and
    /// the flow is at `Confirm`. Settlement failures never surface here; they
    /// are recorded on the transaction and sent to the notification sink.
    pub async fn confirm_transfer(&mut self) -> Result<Transaction> {
        let mut slot = self.transaction.write().await;
        if slot
            .as_ref()
            .is_some_and(|tx| tx.status == TransactionStatus::Pending)
        {
            return Err(FlowError::TransferAlreadyInProgress);
        }
        if self.current_step != PaymentStep::Transfer {
            return Err(FlowError::InvalidStep(self.current_step.to_string()));
        }
        if self.recipient_address.is_empty() {
            return Err(FlowError::MissingRecipient);
        }
        let Some(amount) = self.settlement_amount else {
            return Err(FlowError::InvalidAmount(
                "no settlement amount set".to_string(),
            ));
        };
        self.check_reconciliation(amount)?;

        let transaction = Transaction::pending(
            self.ports.ids.transaction_id(),
            self.ports.ids.network_reference(),
            amount,
        );
        let request = TransferRequest {
            settlement_amount: amount,
            recipient_address: self.recipient_address.clone(),
            memo: self.invoice.transfer_memo(),
        };
        *slot = Some(transaction.clone());
        drop(slot);
        self.current_step = PaymentStep::Confirm;

        info!(
            invoice = %self.invoice.number,
            transaction = %transaction.id,
            amount = %amount,
            recipient = %request.masked_recipient(),
            "transfer submitted"
        );

        let settlement = Settlement {
            slot: Arc::downgrade(&self.transaction),
            transaction_id: transaction.id.clone(),
            asset: self.config.settlement_asset.clone(),
            timeout: self.config.settlement_timeout(),
            notifier: Arc::clone(&self.ports.notifier),
        };
        let network = Arc::clone(&self.ports.network);
        self.settlement_task = Some(tokio::spawn(settlement.run(network, request)));

        Ok(transaction)
    }

    pub async fn current_transaction(&self) -> Option<Transaction> {
        self.transaction.read().await.clone()
    }

    /// Waits for the outstanding settlement, if any, and returns the
    /// transaction as it stands afterwards.
    pub async fn await_settlement(&mut self) -> Option<Transaction> {
        if let Some(task) = self.settlement_task.take()
            && let Err(e) = task.await
        {
            warn!(invoice = %self.invoice.number, error = %e, "settlement task aborted");
        }
        self.current_transaction().await
    }

    /// Returns the flow to `Review` and forgets the transaction, amount and
    /// recipient. An outcome still in flight for the old transaction is
    /// ignored when it arrives.
    pub async fn reset(&mut self) {
        *self.transaction.write().await = None;
        self.settlement_task = None;
        self.settlement_amount = None;
        self.recipient_address.clear();
        self.current_step = PaymentStep::Review;
        info!(invoice = %self.invoice.number, "payment flow reset");
    }

    pub fn current_step(&self) -> PaymentStep {
        self.current_step
    }

    pub fn steps(&self) -> Vec<StepView> {
        PaymentStep::ALL
            .iter()
            .map(|step| StepView {
                step: *step,
                title: step.title(&self.config.settlement_asset),
                status: step.status_relative_to(self.current_step),
            })
            .collect()
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn rate(&self) -> Option<&ExchangeRate> {
        self.rate.as_ref()
    }

    pub fn settlement_amount(&self) -> Option<Amount> {
        self.settlement_amount
    }

    pub fn recipient_address(&self) -> &str {
        &self.recipient_address
    }

    pub fn network_fee(&self) -> Decimal {
        self.config.network_fee
    }

    /// Settlement amount plus network fee. `None` without an amount or on
    /// overflow.
    pub fn total_settlement_cost(&self) -> Option<Decimal> {
        self.settlement_amount?
            .value()
            .checked_add(self.config.network_fee)
    }

    /// Fiat value of the settlement amount at the held rate.
    pub fn fiat_equivalent(&self) -> Option<Decimal> {
        let amount = self.settlement_amount?;
        self.rate.as_ref()?.to_fiat(amount.value())
    }

    /// Asset amount that covers the invoice total at the held rate.
    pub fn suggested_settlement_amount(&self) -> Option<Decimal> {
        self.rate.as_ref()?.to_asset(self.invoice.amount.value())
    }

    /// The request `confirm_transfer` would submit, once amount and
    /// recipient are both set.
    pub fn transfer_request(&self) -> Option<TransferRequest> {
        if self.recipient_address.is_empty() {
            return None;
        }
        Some(TransferRequest {
            settlement_amount: self.settlement_amount?,
            recipient_address: self.recipient_address.clone(),
            memo: self.invoice.transfer_memo(),
        })
    }

    fn check_reconciliation(&self, amount: Amount) -> Result<()> {
        let Some(limit_bps) = self.config.reconciliation_tolerance_bps else {
            return Ok(());
        };
        let Some(rate) = self.rate.as_ref() else {
            return Err(self.rate_unavailable());
        };
        let invoice_total = self.invoice.amount.value();
        // Overflow means the amount is far outside any tolerance.
        let deviation = rate
            .to_fiat(amount.value())
            .and_then(|fiat| fiat.checked_sub(invoice_total))
            .and_then(|diff| diff.abs().checked_mul(Decimal::from(10_000)))
            .and_then(|scaled| scaled.checked_div(invoice_total));
        match deviation {
            Some(bps) if bps <= Decimal::from(limit_bps) => Ok(()),
            Some(bps) => Err(FlowError::ReconciliationMismatch {
                deviation_bps: bps.ceil().to_u64().unwrap_or(u64::MAX),
                limit_bps,
            }),
            None => Err(FlowError::ReconciliationMismatch {
                deviation_bps: u64::MAX,
                limit_bps,
            }),
        }
    }

    fn rate_unavailable(&self) -> FlowError {
        FlowError::RateUnavailable {
            from: self.invoice.currency.clone(),
            to: self.config.settlement_asset.clone(),
        }
    }
}

/// Background half of `confirm_transfer`.
///
/// Holds only a weak handle on the transaction slot so a dropped flow is
/// not kept alive by its pending settlement.
struct Settlement {
    slot: Weak<RwLock<Option<Transaction>>>,
    transaction_id: String,
    asset: String,
    timeout: Duration,
    notifier: NotificationSinkRef,
}

impl Settlement {
    async fn run(self, network: SettlementNetworkRef, request: TransferRequest) {
        let outcome = match tokio::time::timeout(self.timeout, network.submit(request)).await {
            Ok(Ok(SettlementOutcome::Confirmed)) => Ok(()),
            Ok(Ok(SettlementOutcome::Rejected(reason))) => Err(FlowError::SettlementFailed(reason)),
            Ok(Err(e)) => Err(FlowError::SettlementFailed(e.to_string())),
            Err(_) => Err(FlowError::NetworkTimeout),
        };

        let Some(slot) = self.slot.upgrade() else {
            debug!(transaction = %self.transaction_id, "flow dropped before settlement, outcome ignored");
            return;
        };
        let applied = {
            let mut guard = slot.write().await;
            match guard.as_mut() {
                Some(tx) if tx.id == self.transaction_id => match &outcome {
                    Ok(()) => tx.confirm(),
                    Err(e) => tx.fail(e.to_string()),
                },
                _ => false,
            }
        };
        if !applied {
            debug!(transaction = %self.transaction_id, "stale settlement outcome ignored");
            return;
        }

        let notification = match outcome {
            Ok(()) => {
                info!(transaction = %self.transaction_id, "settlement confirmed");
                Notification {
                    title: "Payment Successful!".to_string(),
                    body: format!(
                        "{} payment {} has been confirmed on the network.",
                        self.asset, self.transaction_id
                    ),
                    severity: Severity::Info,
                }
            }
            Err(e) => {
                warn!(transaction = %self.transaction_id, error = %e, "settlement failed");
                Notification {
                    title: "Payment Failed".to_string(),
                    body: format!("{} payment {} failed: {e}", self.asset, self.transaction_id),
                    severity: Severity::Error,
                }
            }
        };
        self.notifier.notify(notification);
    }
}
