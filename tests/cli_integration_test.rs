//! CLI integration tests.
//!
//! Tests cover:
//! - Config parsing (build_strategy_config, build_execution_config)
//! - Real INI and CSV files on disk through the file and CSV adapters
//! - Full pipeline with MockDataPort
//! - Report and JSON output

mod common;

use chrono::NaiveDate;
use common::*;
use signalbench::adapters::csv_adapter::CsvAdapter;
use signalbench::adapters::file_config_adapter::FileConfigAdapter;
use signalbench::cli;
use signalbench::domain::error::SignalbenchError;
use signalbench::domain::strategy::{MaType, StrategyVariant};
use std::fmt::Write as _;
use std::io::Write;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn csv_for(closes: &[f64]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for bar in bars_from_closes(closes) {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }
    out
}

const CROSSOVER_INI: &str = r#"
[strategy]
name = Fast Cross
variant = crossover
version = 3
tags = trend, daily
created_at = 2024-02-01
updated_at = 2024-03-05 14:30:00

[crossover]
short_period = 5
long_period = 10
ma_type = ema
signal_delay = 1
trailing_stop = 0.08

[risk]
max_position_size = 5000
max_drawdown = 0.1

[execution]
commission_per_trade = 1.0
commission_pct = 0.05
slippage_pct = 0.02
close_at_end = true
"#;

mod config_loading {
    use super::*;

    #[test]
    fn crossover_config_full() {
        let adapter = FileConfigAdapter::from_string(CROSSOVER_INI).unwrap();
        let config = cli::build_strategy_config(&adapter).unwrap();

        assert_eq!(config.name, "Fast Cross");
        match &config.variant {
            StrategyVariant::Crossover(p) => {
                assert_eq!(p.short_period, 5);
                assert_eq!(p.long_period, 10);
                assert_eq!(p.ma_type, MaType::Ema);
                assert_eq!(p.signal_delay, 1);
                assert_eq!(p.trailing_stop, Some(0.08));
            }
            other => panic!("expected crossover, got {other:?}"),
        }
        assert!((config.risk.max_position_size - 5000.0).abs() < f64::EPSILON);
        assert!((config.risk.max_drawdown - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.metadata.version, 3);
        assert_eq!(config.metadata.tags, vec!["trend", "daily"]);
        assert_eq!(
            config.metadata.created_at,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            config.metadata.updated_at,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(14, 30, 0)
        );
    }

    #[test]
    fn execution_config_full() {
        let adapter = FileConfigAdapter::from_string(CROSSOVER_INI).unwrap();
        let execution = cli::build_execution_config(&adapter).unwrap();
        assert!((execution.commission_per_trade - 1.0).abs() < f64::EPSILON);
        assert!((execution.commission_pct - 0.05).abs() < f64::EPSILON);
        assert!((execution.slippage_pct - 0.02).abs() < f64::EPSILON);
        assert!(execution.close_at_end);
    }

    #[test]
    fn variant_defaults_apply() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nvariant = mean_reversion\n").unwrap();
        let config = cli::build_strategy_config(&adapter).unwrap();
        assert_eq!(config.name, "Unnamed");
        assert_eq!(config.metadata.version, 1);
        match config.variant {
            StrategyVariant::MeanReversion(p) => {
                assert_eq!(p.period, 20);
                assert!((p.std_dev_multiplier - 2.0).abs() < f64::EPSILON);
                assert!(!p.use_rsi);
                assert_eq!(p.rsi_period, 14);
            }
            other => panic!("expected mean reversion, got {other:?}"),
        }

        let execution = cli::build_execution_config(&adapter).unwrap();
        assert!(!execution.close_at_end);
        assert_eq!(execution.commission_pct, 0.0);
    }

    #[test]
    fn breakout_section_is_read() {
        let ini = "[strategy]\nvariant = Breakout\n[breakout]\nperiod = 55\ntrailing_stop = 0.1\natr_period = 20\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        match cli::build_strategy_config(&adapter).unwrap().variant {
            StrategyVariant::Breakout(p) => {
                assert_eq!(p.period, 55);
                assert!((p.trailing_stop - 0.1).abs() < f64::EPSILON);
                assert_eq!(p.atr_period, 20);
            }
            other => panic!("expected breakout, got {other:?}"),
        }
    }

    #[test]
    fn missing_variant() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nname = X\n").unwrap();
        let err = cli::build_strategy_config(&adapter).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigMissing { key, .. } if key == "variant"));
    }

    #[test]
    fn unknown_variant() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nvariant = momentum\n").unwrap();
        let err = cli::build_strategy_config(&adapter).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "variant"));
    }

    #[test]
    fn unknown_ma_type() {
        let ini = "[strategy]\nvariant = crossover\n[crossover]\nma_type = hull\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_strategy_config(&adapter).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "ma_type"));
    }

    #[test]
    fn negative_period() {
        let ini = "[strategy]\nvariant = breakout\n[breakout]\nperiod = -5\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_strategy_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            SignalbenchError::ConfigInvalid { section, key, .. } if section == "breakout" && key == "period"
        ));
    }

    #[test]
    fn non_numeric_trailing_stop() {
        let ini = "[strategy]\nvariant = crossover\n[crossover]\ntrailing_stop = tight\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_strategy_config(&adapter).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "trailing_stop"));
    }

    #[test]
    fn bad_timestamp() {
        let ini = "[strategy]\nvariant = breakout\ncreated_at = yesterday\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_strategy_config(&adapter).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "created_at"));
    }

    #[test]
    fn negative_costs_rejected() {
        let ini = "[execution]\nslippage_pct = -0.1\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_execution_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            SignalbenchError::ConfigInvalid { ref key, ref reason, .. }
                if key == "slippage_pct" && reason == "must be >= 0"
        ));
    }

    #[test]
    fn non_numeric_period() {
        let ini = "[strategy]\nvariant = crossover\n[crossover]\nshort_period = 5x\nlong_period = 2O\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_strategy_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            SignalbenchError::ConfigInvalid { section, key, .. }
                if section == "crossover" && key == "short_period"
        ));
    }

    #[test]
    fn non_numeric_std_dev_multiplier() {
        let ini = "[strategy]\nvariant = mean_reversion\n[mean_reversion]\nstd_dev_multiplier = two\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_strategy_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            SignalbenchError::ConfigInvalid { ref key, ref reason, .. }
                if key == "std_dev_multiplier" && reason.contains("\"two\"")
        ));
    }

    #[test]
    fn non_numeric_cost_and_flag() {
        let adapter = FileConfigAdapter::from_string("[execution]\ncommission_pct = 0.1%\n").unwrap();
        let err = cli::build_execution_config(&adapter).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "commission_pct"));

        let adapter = FileConfigAdapter::from_string("[execution]\nclose_at_end = sometimes\n").unwrap();
        let err = cli::build_execution_config(&adapter).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "close_at_end"));
    }

    #[test]
    fn blank_value_uses_default() {
        let ini = "[strategy]\nvariant = breakout\n[breakout]\nperiod =\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        match cli::build_strategy_config(&adapter).unwrap().variant {
            StrategyVariant::Breakout(p) => assert_eq!(p.period, 20),
            other => panic!("expected breakout, got {other:?}"),
        }
    }

    #[test]
    fn strategy_file_on_disk() {
        let file = write_temp_ini(CROSSOVER_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let config = cli::build_strategy_config(&adapter).unwrap();
        assert_eq!(config.variant.name(), "crossover");
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn pipeline_with_mock_data_port() {
        let adapter = FileConfigAdapter::from_string(CROSSOVER_INI).unwrap();
        let port = MockDataPort::new().with_bars("SPY", bars_from_closes(&downtrend_then_uptrend()));

        let result = cli::run_pipeline(&adapter, &port, "SPY", None, None).unwrap();
        assert_eq!(result.strategy, "Fast Cross");
        assert_eq!(result.variant, "crossover");
        assert!(!result.signals.is_empty());
        // close_at_end is set in the INI
        assert!(result.open_position().is_none());
        assert!(result.performance.total_commissions > 0.0);
        assert_run_invariants(&result);
    }

    #[test]
    fn invalid_strategy_stops_before_data() {
        let ini = "[strategy]\nvariant = crossover\n[crossover]\nshort_period = 20\nlong_period = 10\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        // the data port would fail too; validation must come first
        let port = MockDataPort::new().with_error("SPY", "should not be read");

        let err = cli::run_pipeline(&adapter, &port, "SPY", None, None).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigValidation(_)));
        assert!(err.to_string().contains("crossover.short_period"));
    }

    #[test]
    fn data_errors_surface() {
        let adapter = FileConfigAdapter::from_string(CROSSOVER_INI).unwrap();
        let port = MockDataPort::new().with_error("SPY", "feed offline");
        let err = cli::run_pipeline(&adapter, &port, "SPY", None, None).unwrap_err();
        assert!(matches!(err, SignalbenchError::Data { .. }));
    }

    #[test]
    fn nan_close_is_rejected_before_execution() {
        let ini = "[strategy]\nvariant = mean_reversion\n[mean_reversion]\nperiod = 3\n[execution]\nclose_at_end = true\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let mut bars = bars_from_closes(&[100.0, 100.0, 100.0, 100.0, 100.0, 90.0, 95.0, 99.0]);
        bars[7].close = f64::NAN;
        let port = MockDataPort::new().with_bars("SPY", bars);

        let err = cli::run_pipeline(&adapter, &port, "SPY", None, None).unwrap_err();
        assert!(matches!(err, SignalbenchError::InvalidSeries { ref reason } if reason.contains("bar 7")));
    }

    #[test]
    fn csv_files_on_disk_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("SPY.csv"), csv_for(&downtrend_then_uptrend())).unwrap();
        std::fs::write(dir.path().join("OSC.csv"), csv_for(&oscillating_closes(120))).unwrap();
        let ini = write_temp_ini(CROSSOVER_INI);

        let adapter = FileConfigAdapter::from_file(ini.path()).unwrap();
        let data = CsvAdapter::new(dir.path().to_path_buf());

        let from_disk = cli::run_pipeline(&adapter, &data, "SPY", None, None).unwrap();
        let port = MockDataPort::new().with_bars("SPY", bars_from_closes(&downtrend_then_uptrend()));
        let from_memory = cli::run_pipeline(&adapter, &port, "SPY", None, None).unwrap();
        assert_eq!(from_disk.signals, from_memory.signals);
        assert_eq!(from_disk.trades, from_memory.trades);
        assert_eq!(from_disk.performance, from_memory.performance);

        let osc = cli::run_pipeline(&adapter, &data, "OSC", None, None).unwrap();
        assert_eq!(osc.bars, 120);
        assert_run_invariants(&osc);
    }

    #[test]
    fn date_range_limits_series() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("OSC.csv"), csv_for(&oscillating_closes(120))).unwrap();
        let adapter = FileConfigAdapter::from_string(CROSSOVER_INI).unwrap();
        let data = CsvAdapter::new(dir.path().to_path_buf());

        let result = cli::run_pipeline(
            &adapter,
            &data,
            "OSC",
            Some(date(2024, 2, 1)),
            Some(date(2024, 2, 29)),
        )
        .unwrap();
        assert_eq!(result.bars, 29);
    }
}

mod output {
    use super::*;

    #[test]
    fn report_lists_summary_and_trades() {
        let adapter = FileConfigAdapter::from_string(CROSSOVER_INI).unwrap();
        let port = MockDataPort::new().with_bars("SPY", bars_from_closes(&downtrend_then_uptrend()));
        let result = cli::run_pipeline(&adapter, &port, "SPY", None, None).unwrap();

        let report = cli::format_report(&result);
        assert!(report.contains("Fast Cross (crossover)"));
        assert!(report.contains("SPY (35 bars)"));
        assert!(report.contains("Net PnL:"));
        assert!(report.contains("BUY"));
        assert!(report.contains("SELL"));
    }

    #[test]
    fn json_output_round_trips_through_serde_value() {
        let adapter = FileConfigAdapter::from_string(CROSSOVER_INI).unwrap();
        let port = MockDataPort::new().with_bars("SPY", bars_from_closes(&downtrend_then_uptrend()));
        let result = cli::run_pipeline(&adapter, &port, "SPY", None, None).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["symbol"], "SPY");
        assert_eq!(json["variant"], "crossover");
        assert_eq!(json["signals"][0]["signal_type"], "BUY");
        assert_eq!(json["trades"][0]["side"], "BUY");
        assert_eq!(json["positions"][0]["direction"], "LONG");
        assert_eq!(
            json["performance"]["total_trades"],
            result.performance.total_trades
        );
    }
}
