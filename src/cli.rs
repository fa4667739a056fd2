//! CLI definition and dispatch.

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{ExecutionResult, StrategyEngine};
use crate::domain::config_validation::{validate_execution_config, validate_strategy_config};
use crate::domain::error::SignalbenchError;
use crate::domain::execution::ExecutionConfig;
use crate::domain::strategy::{
    BreakoutParams, CrossoverParams, MaType, MeanReversionParams, RiskManagement, StrategyConfig,
    StrategyMetadata, StrategyVariant,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "signalbench", about = "Single-symbol strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a strategy over one symbol's price series
    Run {
        #[arg(short, long)]
        strategy: PathBuf,
        /// Directory holding <SYMBOL>.csv files
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// List symbols available in a data directory
    Symbols {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            strategy,
            data,
            symbol,
            start,
            end,
            json,
        } => run_strategy(&strategy, data, &symbol, start, end, json),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::Symbols { data } => run_symbols(data),
    }
}

fn fail(err: &SignalbenchError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SignalbenchError {
    SignalbenchError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

fn get_usize(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SignalbenchError> {
    let value = adapter.get_int(section, key, default as i64)?;
    usize::try_from(value)
        .map_err(|_| invalid(section, key, format!("must be a non-negative integer, got {value}")))
}

fn get_optional_double(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, SignalbenchError> {
    match adapter.get_string(section, key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("expected a number, got {raw:?}"))),
    }
}

fn get_timestamp(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDateTime>, SignalbenchError> {
    let Some(raw) = adapter.get_string(section, key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(ts));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| {
            invalid(
                section,
                key,
                "invalid timestamp (expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)",
            )
        })
}

fn build_variant(adapter: &dyn ConfigPort) -> Result<StrategyVariant, SignalbenchError> {
    let variant = adapter
        .get_string("strategy", "variant")
        .ok_or_else(|| SignalbenchError::ConfigMissing {
            section: "strategy".into(),
            key: "variant".into(),
        })?;

    match variant.trim().to_lowercase().replace('-', "_").as_str() {
        "crossover" => {
            let defaults = CrossoverParams::default();
            let ma_raw = adapter
                .get_string("crossover", "ma_type")
                .unwrap_or_else(|| "sma".into());
            let ma_type = MaType::parse(&ma_raw).ok_or_else(|| {
                invalid("crossover", "ma_type", format!("unknown type {ma_raw:?} (sma, ema, wma)"))
            })?;
            Ok(StrategyVariant::Crossover(CrossoverParams {
                short_period: get_usize(adapter, "crossover", "short_period", defaults.short_period)?,
                long_period: get_usize(adapter, "crossover", "long_period", defaults.long_period)?,
                ma_type,
                signal_delay: get_usize(adapter, "crossover", "signal_delay", defaults.signal_delay)?,
                trailing_stop: get_optional_double(adapter, "crossover", "trailing_stop")?,
            }))
        }
        "mean_reversion" => {
            let defaults = MeanReversionParams::default();
            Ok(StrategyVariant::MeanReversion(MeanReversionParams {
                period: get_usize(adapter, "mean_reversion", "period", defaults.period)?,
                std_dev_multiplier: adapter.get_double(
                    "mean_reversion",
                    "std_dev_multiplier",
                    defaults.std_dev_multiplier,
                )?,
                use_rsi: adapter.get_bool("mean_reversion", "use_rsi", defaults.use_rsi)?,
                rsi_period: get_usize(adapter, "mean_reversion", "rsi_period", defaults.rsi_period)?,
                oversold: adapter.get_double("mean_reversion", "oversold", defaults.oversold)?,
                overbought: adapter.get_double("mean_reversion", "overbought", defaults.overbought)?,
            }))
        }
        "breakout" => {
            let defaults = BreakoutParams::default();
            Ok(StrategyVariant::Breakout(BreakoutParams {
                period: get_usize(adapter, "breakout", "period", defaults.period)?,
                trailing_stop: adapter.get_double("breakout", "trailing_stop", defaults.trailing_stop)?,
                atr_period: get_usize(adapter, "breakout", "atr_period", defaults.atr_period)?,
            }))
        }
        other => Err(invalid(
            "strategy",
            "variant",
            format!("unknown variant {other:?} (crossover, mean_reversion, breakout)"),
        )),
    }
}

/// Read `[strategy]`, the variant's own section and `[risk]`.
///
/// The result is not validated; [`StrategyEngine::new`] does that.
pub fn build_strategy_config(adapter: &dyn ConfigPort) -> Result<StrategyConfig, SignalbenchError> {
    let variant = build_variant(adapter)?;
    let name = adapter
        .get_string("strategy", "name")
        .unwrap_or_else(|| "Unnamed".to_string());

    let risk_defaults = RiskManagement::default();
    let risk = RiskManagement {
        max_position_size: adapter.get_double(
            "risk",
            "max_position_size",
            risk_defaults.max_position_size,
        )?,
        max_drawdown: adapter.get_double("risk", "max_drawdown", risk_defaults.max_drawdown)?,
    };

    let version = adapter.get_int("strategy", "version", 1)?;
    let metadata = StrategyMetadata {
        created_at: get_timestamp(adapter, "strategy", "created_at")?,
        updated_at: get_timestamp(adapter, "strategy", "updated_at")?,
        version: u32::try_from(version)
            .map_err(|_| invalid("strategy", "version", format!("out of range: {version}")))?,
        tags: adapter
            .get_string("strategy", "tags")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
    };

    Ok(StrategyConfig {
        name,
        variant,
        risk,
        metadata,
    })
}

/// Read `[execution]`. Costs are checked with the same rule the engine applies.
pub fn build_execution_config(adapter: &dyn ConfigPort) -> Result<ExecutionConfig, SignalbenchError> {
    let config = ExecutionConfig {
        commission_per_trade: adapter.get_double("execution", "commission_per_trade", 0.0)?,
        commission_pct: adapter.get_double("execution", "commission_pct", 0.0)?,
        slippage_pct: adapter.get_double("execution", "slippage_pct", 0.0)?,
        close_at_end: adapter.get_bool("execution", "close_at_end", false)?,
    };
    validate_execution_config(&config).map_err(|e| {
        let key = e.field.strip_prefix("execution.").unwrap_or(e.field.as_str());
        invalid("execution", key, e.rule.clone())
    })?;
    Ok(config)
}

/// Config → engine → series → result, without touching stdout.
pub fn run_pipeline(
    strategy: &dyn ConfigPort,
    data: &dyn DataPort,
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<ExecutionResult, SignalbenchError> {
    let config = build_strategy_config(strategy)?;
    let execution = build_execution_config(strategy)?;
    let engine = StrategyEngine::new(config, execution)?;
    let series = data.load_series(symbol, start, end)?;
    engine.run(&series)
}

pub fn format_report(result: &ExecutionResult) -> String {
    let p = &result.performance;
    let mut out = String::new();
    let _ = writeln!(out, "Strategy:        {} ({})", result.strategy, result.variant);
    let _ = writeln!(out, "Symbol:          {} ({} bars)", result.symbol, result.bars);
    let _ = writeln!(out, "Signals:         {}", result.signals.len());
    let _ = writeln!(
        out,
        "Trades:          {} ({} won, {} lost, {:.1}% win rate)",
        p.total_trades,
        p.winning_trades,
        p.losing_trades,
        p.win_rate * 100.0
    );
    let _ = writeln!(out, "Total PnL:       {:.2}", p.total_pnl);
    let _ = writeln!(out, "Commissions:     {:.2}", p.total_commissions);
    let _ = writeln!(out, "Slippage:        {:.2}", p.total_slippage);
    let _ = writeln!(out, "Net PnL:         {:.2}", p.net_pnl);
    let _ = writeln!(out, "Avg trade size:  {:.2}", p.average_trade_size);
    let _ = writeln!(out, "Largest win:     {:.2}", p.largest_win);
    let _ = writeln!(out, "Largest loss:    {:.2}", p.largest_loss);
    let _ = writeln!(out, "Open positions:  {}", p.open_positions);

    if !result.trades.is_empty() {
        let _ = writeln!(out, "\nTrades:");
        for t in &result.trades {
            let _ = writeln!(
                out,
                "  {:<4} {:<5} {} {:>10.2} x {:<6} {}",
                t.id.to_string(),
                t.side.to_string(),
                t.date,
                t.price,
                t.quantity,
                t.position_id
            );
        }
    }
    out
}

fn run_strategy(
    strategy_path: &PathBuf,
    data_dir: PathBuf,
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    json: bool,
) -> ExitCode {
    eprintln!("Loading strategy from {}", strategy_path.display());
    let adapter = match load_config(strategy_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data = CsvAdapter::new(data_dir);

    let result = match run_pipeline(&adapter, &data, symbol, start, end) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("error: failed to serialize result: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        print!("{}", format_report(&result));
    }
    ExitCode::SUCCESS
}

fn run_validate(strategy_path: &PathBuf) -> ExitCode {
    eprintln!("Validating strategy: {}", strategy_path.display());
    let adapter = match load_config(strategy_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_strategy_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    if let Err(e) = build_execution_config(&adapter) {
        return fail(&e);
    }
    if let Err(e) = validate_strategy_config(&config) {
        return fail(&SignalbenchError::from(e));
    }

    eprintln!("\nStrategy: {} ({})", config.name, config.variant);
    eprintln!("  version: {}", config.metadata.version);
    if !config.metadata.tags.is_empty() {
        eprintln!("  tags:    {}", config.metadata.tags.join(", "));
    }
    eprintln!("\nStrategy configuration is valid.");
    ExitCode::SUCCESS
}

fn run_symbols(data_dir: PathBuf) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir);
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
        return ExitCode::SUCCESS;
    }

    for symbol in &symbols {
        match adapter.get_data_range(symbol) {
            Ok(Some((first, last, count))) => {
                println!("{symbol}\t{first}\t{last}\t{count}");
            }
            Ok(None) => println!("{symbol}\t-\t-\t0"),
            Err(e) => return fail(&e),
        }
    }
    eprintln!("{} symbols found", symbols.len());
    ExitCode::SUCCESS
}
