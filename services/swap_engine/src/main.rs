//! Swap quote replay binary
//!
//! Loads a market snapshot, applies one edit to a fresh trade, runs the
//! reference simulator and prints the resulting quote view and execution
//! request as JSON.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swap_config::SwapConfig;
use swap_engine::{
    DryRunSettlement, EngineSettings, ExecutionRequest, QuoteView, ReferenceSimulator,
    SimulationState, SubmissionReceipt, SwapEngine,
};
use swap_types::{AssetId, FixedPoint, MarketSnapshot};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "swap_quote")]
#[command(about = "Replay a swap quote against a market snapshot")]
struct Args {
    /// Market snapshot (JSON)
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Symbol of the asset to sell
    #[arg(long)]
    from: String,

    /// Symbol of the asset to buy
    #[arg(long)]
    to: String,

    /// Amount to sell
    #[arg(long, conflicts_with = "amount_out", required_unless_present = "amount_out")]
    amount_in: Option<String>,

    /// Amount to buy
    #[arg(long)]
    amount_out: Option<String>,

    /// Reverse direction after the edit
    #[arg(long)]
    reverse: bool,

    /// Slippage tolerance in percent (overrides config)
    #[arg(long)]
    slippage_pct: Option<Decimal>,

    /// Treat the wallet as disconnected
    #[arg(long)]
    no_wallet: bool,

    /// Submit to a dry-run settlement backend
    #[arg(long)]
    submit: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Serialize)]
struct Report {
    view: QuoteView,
    simulation: SimulationState,
    execution: Option<ExecutionRequest>,
    rejection: Option<String>,
    receipt: Option<SubmissionReceipt>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = SwapConfig::load(args.config.as_deref()).context("Failed to load swap config")?;
    init_tracing(&config.log_level, args.json_logs);

    info!("🚀 Starting swap quote replay");

    let snapshot = load_snapshot(&args.snapshot)?;
    info!(
        "📂 Loaded snapshot: {} assets, {} pools",
        snapshot.assets.len(),
        snapshot.pools.len()
    );
    let from = symbol_to_id(&snapshot, &args.from)?;
    let to = symbol_to_id(&snapshot, &args.to)?;

    let mut settings = EngineSettings::from_config(&config)?;
    if let Some(pct) = args.slippage_pct {
        if pct.is_sign_negative() || pct > Decimal::ONE_HUNDRED {
            bail!("--slippage-pct must be within [0, 100], got {}", pct);
        }
        settings.slippage = FixedPoint::from_percent(pct, config.fraction_scale)
            .context("Invalid --slippage-pct")?;
    }

    let mut engine = SwapEngine::new(Arc::new(snapshot), settings);
    engine.set_wallet_status(!args.no_wallet);
    engine.select_from(from)?;
    engine.select_to(to)?;

    match (&args.amount_in, &args.amount_out) {
        (Some(amount), _) => engine
            .edit_from(amount)
            .with_context(|| format!("Invalid --amount-in '{}'", amount))?,
        (None, Some(amount)) => engine
            .edit_to(amount)
            .with_context(|| format!("Invalid --amount-out '{}'", amount))?,
        (None, None) => bail!("one of --amount-in or --amount-out is required"),
    }
    if args.reverse {
        engine.reverse();
    }

    let simulator = ReferenceSimulator::new();
    if engine.run_simulation(&simulator).await {
        info!("✅ Simulation applied");
    }

    let (execution, rejection) = match engine.build_request() {
        Ok(request) => (Some(request), None),
        Err(rejection) => (None, Some(rejection.to_string())),
    };

    let receipt = if args.submit {
        match engine.submit(&DryRunSettlement::new()).await {
            Ok(receipt) => Some(receipt),
            Err(e) => {
                warn!("❌ Submit failed: {}", e);
                None
            }
        }
    } else {
        None
    };

    let report = Report {
        view: engine.view(),
        simulation: engine.simulation().clone(),
        execution,
        rejection,
        receipt,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to render report")?
    );
    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_snapshot(path: &Path) -> Result<MarketSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse snapshot {:?}", path))
}

fn symbol_to_id(snapshot: &MarketSnapshot, symbol: &str) -> Result<AssetId> {
    snapshot
        .asset_by_symbol(symbol)
        .map(|asset| asset.id)
        .with_context(|| format!("Unknown asset symbol '{}'", symbol))
}
