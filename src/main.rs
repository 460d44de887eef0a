use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use payflow::application::flow::{FlowPorts, PaymentFlowController};
use payflow::config::FlowConfig;
use payflow::domain::ports::{InvoiceStore, SettlementNetworkRef};
use payflow::domain::transaction::TransactionStatus;
use payflow::infrastructure::ids::UuidIdGenerator;
use payflow::infrastructure::in_memory::{FixedRateOracle, InMemoryInvoiceStore};
use payflow::infrastructure::notify::TracingNotificationSink;
use payflow::infrastructure::settlement::SimulatedSettlementNetwork;
use payflow::interfaces::csv::invoice_reader::InvoiceReader;
use payflow::interfaces::csv::transaction_writer::TransactionWriter;
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Invoices CSV file
    invoices: PathBuf,

    /// Number of the invoice to pay
    #[arg(long)]
    invoice: String,

    /// Recipient wallet address
    #[arg(long)]
    recipient: String,

    /// Settlement amount in the settlement asset. Defaults to the invoice total at the current rate.
    #[arg(long)]
    amount: Option<String>,

    /// Fiat price of one unit of the settlement asset. Without it no rate is available.
    #[arg(long)]
    rate: Option<Decimal>,

    /// JSON flow configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delay before the simulated network answers
    #[arg(long, default_value_t = 3000)]
    settle_after_ms: u64,

    /// Make the simulated network reject the transfer with this reason
    #[arg(long)]
    reject: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FlowConfig::from_path(path).into_diagnostic()?,
        None => FlowConfig::default(),
    };

    // Load invoices, skipping malformed rows
    let store = InMemoryInvoiceStore::new();
    let file = File::open(&cli.invoices).into_diagnostic()?;
    for invoice in InvoiceReader::new(file).invoices() {
        match invoice {
            Ok(invoice) => store.insert(invoice).await,
            Err(e) => warn!(error = %e, "skipping invoice row"),
        }
    }
    let count = store.len().await;
    info!(count, "invoices loaded");

    let mut rates = FixedRateOracle::new();
    if let Some(rate) = cli.rate
        && let Ok(invoice) = store.get_invoice(&cli.invoice).await
    {
        rates = rates.with_rate(&invoice.currency, &config.settlement_asset, rate);
    }

    let delay = Duration::from_millis(cli.settle_after_ms);
    let network: SettlementNetworkRef = match cli.reject {
        Some(reason) => Arc::new(SimulatedSettlementNetwork::rejecting(delay, reason)),
        None => Arc::new(SimulatedSettlementNetwork::confirming(delay)),
    };
    let ports = FlowPorts {
        rates: Box::new(rates),
        network,
        notifier: Arc::new(TracingNotificationSink),
        ids: Arc::new(UuidIdGenerator),
    };

    let mut flow = PaymentFlowController::start(&store, &cli.invoice, ports, config)
        .await
        .into_diagnostic()?;
    flow.advance().into_diagnostic()?;

    match &cli.amount {
        Some(amount) => flow.set_settlement_amount(amount).into_diagnostic()?,
        None => {
            let suggested = match flow.suggested_settlement_amount() {
                Some(suggested) => suggested,
                None => {
                    let rate = flow.refresh_rate().await.into_diagnostic()?;
                    rate.to_asset(flow.invoice().amount.value())
                        .ok_or_else(|| {
                            miette!("invoice total cannot be converted at rate {}", rate.rate)
                        })?
                }
            };
            flow.set_settlement_amount(&suggested.to_string())
                .into_diagnostic()?
        }
    };
    flow.set_recipient_address(cli.recipient);
    flow.advance().into_diagnostic()?;

    if let Some(total) = flow.total_settlement_cost() {
        info!(total = %total, fee = %flow.network_fee(), "settlement cost");
    }
    flow.confirm_transfer().await.into_diagnostic()?;

    let transaction = flow
        .await_settlement()
        .await
        .ok_or_else(|| miette!("transaction disappeared before settlement"))?;

    let stdout = io::stdout();
    let mut writer = TransactionWriter::new(stdout.lock());
    writer
        .write_transactions([&transaction])
        .into_diagnostic()?;

    if transaction.status == TransactionStatus::Failed {
        return Err(miette!(
            "settlement failed: {}",
            transaction.failure.as_deref().unwrap_or("unknown reason")
        ));
    }
    Ok(())
}
