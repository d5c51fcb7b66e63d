use crate::core::EngineConfig;
use crate::strategy::{BatchConfig, Report};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Replay customer and transfer files through the ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-service")]
#[command(about = "Replay fund transfers between customer accounts", long_about = None)]
pub struct CliArgs {
    /// CSV file with the customers to open
    #[arg(value_name = "CUSTOMERS", help = "Path to the customers CSV file")]
    pub customers_file: PathBuf,

    /// CSV file with the transfer requests to replay
    #[arg(value_name = "TRANSFERS", help = "Path to the transfers CSV file")]
    pub transfers_file: PathBuf,

    /// Processing strategy to use for transfers
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for in-order or 'async' for concurrent replay"
    )]
    pub strategy: StrategyType,

    /// Number of transfer requests per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transfer requests per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent transfers (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of transfers executing concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// How long to wait for an account lock before aborting a transfer
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MILLIS",
        env = "LEDGER_LOCK_TIMEOUT_MS",
        default_value_t = 5000
    )]
    pub lock_timeout_ms: u64,

    /// Maximum number of decimal places accepted in amounts
    #[arg(
        long = "currency-scale",
        value_name = "DIGITS",
        env = "LEDGER_CURRENCY_SCALE",
        default_value_t = 2
    )]
    pub currency_scale: u32,

    /// Print the transfer history of this account instead of balances
    #[arg(long = "history", value_name = "ACCOUNT")]
    pub history: Option<String>,
}

/// Available strategies for replaying transfers
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced
    /// with a warning by `BatchConfig::new`.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the engine configuration from CLI arguments
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::new(
            Duration::from_millis(self.lock_timeout_ms),
            self.currency_scale,
        )
    }

    /// Report requested on the command line
    pub fn report(&self) -> Report {
        match &self.history {
            Some(account_number) => Report::History(account_number.clone()),
            None => Report::Balances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "c.csv", "t.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "c.csv", "t.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "c.csv", "t.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::all_defaults(&["program", "c.csv", "t.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "c.csv", "t.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "c.csv", "t.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "c.csv", "t.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[rstest]
    #[case::custom(&["program", "--lock-timeout-ms", "250", "--currency-scale", "4", "c.csv", "t.csv"], 250, 4)]
    #[case::invalid_scale_falls_back(&["program", "--currency-scale", "99", "--lock-timeout-ms", "10", "c.csv", "t.csv"], 10, 2)]
    fn test_engine_config_conversion(
        #[case] args: &[&str],
        #[case] expected_timeout_ms: u64,
        #[case] expected_scale: u32,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_engine_config();

        assert_eq!(config.lock_timeout, Duration::from_millis(expected_timeout_ms));
        assert_eq!(config.currency_scale, expected_scale);
    }

    #[rstest]
    #[case::balances(&["program", "c.csv", "t.csv"], Report::Balances)]
    #[case::history(&["program", "--history", "ACC-1", "c.csv", "t.csv"], Report::History("ACC-1".to_string()))]
    fn test_report_selection(#[case] args: &[&str], #[case] expected: Report) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.report(), expected);
    }

    #[rstest]
    #[case::missing_inputs(&["program"])]
    #[case::missing_transfers(&["program", "c.csv"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "c.csv", "t.csv"])]
    #[case::invalid_timeout(&["program", "--lock-timeout-ms", "soon", "c.csv", "t.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
