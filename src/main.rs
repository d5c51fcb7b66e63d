//! Rust Ledger Service CLI
//!
//! Replays transfer requests between customer accounts from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- customers.csv transfers.csv > balances.csv
//! cargo run -- --strategy sync customers.csv transfers.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 customers.csv transfers.csv
//! cargo run -- --history ACC-1 customers.csv transfers.csv > history.csv
//! ```
//!
//! Customers are loaded first, then every transfer request is run through the
//! ledger, and finally the requested report is written to stdout. Diagnostics
//! go to stderr and are filtered with `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success (individual rejected transfers do not count as errors)
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rust_ledger_service::{cli, logging, strategy};
use std::process;

fn main() {
    logging::init();

    let args = cli::parse_args();

    let strategy = {
        let batch = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, args.to_engine_config(), batch)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(
        &args.customers_file,
        &args.transfers_file,
        &args.report(),
        &mut output,
    ) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
