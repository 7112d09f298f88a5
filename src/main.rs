use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tempo_payroll::application::orchestrator::{BatchPaymentOrchestrator, RunState};
use tempo_payroll::application::queue::RecipientQueue;
use tempo_payroll::config::AppConfig;
use tempo_payroll::domain::ports::{TransferError, TransferExecutorRef};
use tempo_payroll::domain::token::Token;
use tempo_payroll::error::PaymentError;
use tempo_payroll::infrastructure::simulated::SimulatedTransferExecutor;
use tempo_payroll::interfaces::console::StreamSink;
use tempo_payroll::interfaces::csv::recipient_reader::RecipientReader;
use tempo_payroll::interfaces::display::{
    format_address, format_tx_hash, format_units, is_valid_tx_hash,
};
use tempo_payroll::logging::init_logging;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Recipients CSV file (name,address,amount)
    input: PathBuf,

    /// Payment token symbol or address. Defaults to the second configured token.
    #[arg(long)]
    token: Option<String>,

    /// Fee token symbol or address. Defaults to the payment token when it can pay fees.
    #[arg(long)]
    fee_token: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pause between transfers, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Block explorer base URL used for transaction links
    #[arg(long)]
    explorer_url: Option<String>,

    /// Make the simulated executor reject the Nth transfer (1-based)
    #[arg(long)]
    simulate_failure_at: Option<usize>,

    /// Start without a connected wallet session
    #[arg(long)]
    disconnected: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).into_diagnostic()?;
    if let Some(delay_ms) = cli.delay_ms {
        config.orchestrator.inter_transfer_delay_ms = delay_ms;
    }
    if let Some(explorer_url) = cli.explorer_url {
        config.network.explorer_url = explorer_url;
    }
    if !config.network.is_chain_supported(config.network.chain_id) {
        warn!(chain_id = config.network.chain_id, "configured chain is not in the supported list");
    }

    let registry = config.token_registry();
    let payment_token = match cli.token.as_deref() {
        Some(token) => registry.resolve(token),
        None => registry
            .default_payment_token()
            .ok_or_else(|| PaymentError::UnknownToken("<none configured>".to_string())),
    }
    .into_diagnostic()?
    .clone();
    let fee_token = match cli.fee_token.as_deref() {
        Some(token) => registry.resolve_fee_token(token).into_diagnostic()?.clone(),
        None => default_fee_token(&payment_token, registry.fee_tokens().next())?,
    };

    // Load the queue
    let mut queue = RecipientQueue::new();
    let file = File::open(&cli.input).into_diagnostic()?;
    for (row, candidate) in RecipientReader::new(file).candidates().enumerate() {
        match candidate {
            Ok(candidate) => {
                if let Err(errors) = queue.add(candidate) {
                    eprintln!("Rejected row {}: {}", row + 1, errors);
                }
            }
            Err(e) => {
                eprintln!("Error reading recipient: {}", e);
            }
        }
    }

    println!(
        "Network: {} (chain {}) via {}",
        config.network.name, config.network.chain_id, config.network.rpc_url
    );
    println!(
        "Payment queue: {} recipients, total {} {}",
        queue.len(),
        queue.total_amount(),
        payment_token.symbol
    );
    for recipient in queue.iter() {
        println!(
            "  #{} {} {} {}",
            recipient.id,
            recipient.name,
            format_address(recipient.address.as_str()),
            recipient.amount
        );
    }
    println!(
        "Paying with {} ({}), fees in {}",
        payment_token.symbol,
        format_address(payment_token.address.as_str()),
        fee_token.symbol
    );

    let simulated = match cli.simulate_failure_at {
        Some(position) if position > 0 => SimulatedTransferExecutor::failing_at(
            position - 1,
            TransferError::short("Simulated rejection"),
        ),
        _ => SimulatedTransferExecutor::new(),
    };
    simulated.set_connected(!cli.disconnected);
    let executor: TransferExecutorRef = Arc::new(simulated);

    let orchestrator = BatchPaymentOrchestrator::new(
        executor,
        registry.clone(),
        config.network.clone(),
        config.orchestrator.clone(),
    );

    let sink = StreamSink::new(io::stdout());
    let report = orchestrator
        .execute_batch_payment(
            &queue.snapshot(),
            Some(&payment_token.address),
            Some(&fee_token.address),
            &sink,
        )
        .await;

    for receipt in &report.transactions {
        let hash = if is_valid_tx_hash(&receipt.tx_hash) {
            format_tx_hash(&receipt.tx_hash)
        } else {
            receipt.tx_hash.clone()
        };
        println!(
            "  paid {} {} {} tx {}",
            format_address(receipt.destination.as_str()),
            format_units(receipt.scaled_amount, payment_token.decimals),
            payment_token.symbol,
            hash
        );
    }

    match report.state {
        RunState::Completed => {
            let sent: u128 = report.transactions.iter().map(|r| r.scaled_amount).sum();
            info!(transfers = report.transactions.len(), "run finished");
            println!(
                "Sent {} transfers totalling {} {}",
                report.transactions.len(),
                format_units(sent, payment_token.decimals),
                payment_token.symbol
            );
            Ok(())
        }
        RunState::Failed { index, message } => Err(miette!(
            "batch payment halted at recipient {} after {} successful transfers: {}",
            index + 1,
            report.transactions.len(),
            message
        )),
        RunState::Rejected(precondition) => Err(miette!("batch payment rejected: {}", precondition)),
        state => Err(miette!("batch payment ended in unexpected state {:?}", state)),
    }
}

fn default_fee_token(payment_token: &Token, first_fee_token: Option<&Token>) -> Result<Token> {
    if payment_token.can_be_used_for_fee {
        return Ok(payment_token.clone());
    }
    first_fee_token
        .cloned()
        .ok_or_else(|| miette!("no configured token can pay fees"))
}
