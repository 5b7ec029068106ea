//! Forex lot-size calculator
//!
//! Sizes positions for two accounts from capital, risk percentage and
//! stop-loss distance, with clipboard copy of the results.

mod clipboard;
mod sizing;
mod ui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::clipboard::{ClipboardBackend, ClipboardCopier, SystemClipboard};
use crate::sizing::{Calculation, RiskCalculator, RiskInputs, SizingConfig};
use crate::ui::{RegionId, ResultPanel};

/// Forex position sizing CLI.
#[derive(Parser)]
#[command(name = "lotsize")]
#[command(about = "Lot size and monetary risk for two trading accounts", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Value of one pip for one standard lot
    #[arg(long, default_value = "10", global = true)]
    pip_value: Decimal,

    /// Smallest tradeable lot
    #[arg(long, default_value = "0.01", global = true)]
    min_lot: Decimal,

    /// Currency symbol for monetary amounts
    #[arg(long, default_value = "$", global = true)]
    currency_symbol: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive calculator (default)
    Tui {
        /// Diagnostics file [default: lotsize.log in the temp directory]
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Calculate once and print the results
    Calc {
        /// Capital of account 1
        #[arg(long, default_value = "")]
        capital1: String,

        /// Capital of account 2
        #[arg(long, default_value = "")]
        capital2: String,

        /// Risk per trade in percent
        #[arg(short, long, default_value = "")]
        risk: String,

        /// Stop loss distance in pips
        #[arg(short, long, default_value = "")]
        stop_loss: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Copy one result region to the clipboard
        #[arg(long, value_enum)]
        copy: Option<RegionId>,
    },

    /// Show current configuration
    Config {
        /// Print the configuration as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SizingConfig {
        pip_value: cli.pip_value,
        min_lot: cli.min_lot,
        currency_symbol: cli.currency_symbol.clone(),
    };

    let command = cli.command.unwrap_or(Commands::Tui { log_file: None });

    // The terminal UI owns the screen, so its diagnostics go to a file
    let log_level = parse_level(&cli.log_level);
    match &command {
        Commands::Tui { log_file } => {
            let path = log_file.clone().unwrap_or_else(default_log_file);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(log_level)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        _ => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(log_level)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    config.validate().context("invalid sizing configuration")?;
    let calculator = RiskCalculator::new(config);

    match command {
        Commands::Tui { .. } => {
            let clipboard: Arc<dyn ClipboardBackend> = Arc::new(SystemClipboard::new());
            ui::run_tui(calculator, clipboard).await?;
        }

        Commands::Calc {
            capital1,
            capital2,
            risk,
            stop_loss,
            json,
            copy,
        } => {
            let inputs = RiskInputs::from_text(&capital1, &capital2, &risk, &stop_loss)?;
            info!(
                capital_1 = %inputs.capital_account_1,
                capital_2 = %inputs.capital_account_2,
                risk_pct = %inputs.risk_percent,
                stop_loss = %inputs.stop_loss_pips,
                "Calculating position sizes"
            );

            // Zero stop-loss or out-of-range input surfaces as the process error
            let calc = calculator.calculate(&inputs)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&calc)?);
            } else {
                print_calculation(&calc);
            }

            if let Some(region) = copy {
                let mut panel = ResultPanel::default();
                panel.apply(&calc);
                let text = panel.region(region).text.clone();

                let clipboard = SystemClipboard::one_shot();
                if cfg!(target_os = "linux") && clipboard.holds_until_replaced() {
                    println!("\nHolding {} on the clipboard until another application copies something...", text);
                }

                let copier = ClipboardCopier::new(Arc::new(clipboard));
                if copier.copy(text.clone()).await.is_ok() {
                    println!("\nCopied to clipboard: {}", text);
                }
            }
        }

        Commands::Config { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(calculator.config())?);
            } else {
                println!("\n{}", calculator.config());
            }
        }
    }

    Ok(())
}

fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("lotsize.log")
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn print_calculation(calc: &Calculation) {
    for (label, result) in [
        (&calc.label_account_1, &calc.account_1),
        (&calc.label_account_2, &calc.account_2),
    ] {
        println!("\n=== {} ===", label);
        println!(
            "Lot Size:  {}{}",
            result.display_lot,
            if result.below_minimum { "  (below minimum lot, risk exceeds target)" } else { "" }
        );
        println!("Risk:      {}", result.display_risk);
        println!("Raw Lot:   {}", result.raw_lot_size.round_dp(6));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_logs_to_temp_dir_by_default() {
        let cli = Cli::parse_from(["lotsize"]);
        assert!(cli.command.is_none());

        let path = default_log_file();
        assert_eq!(path.parent(), Some(std::env::temp_dir().as_path()));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("lotsize.log"));
    }

    #[test]
    fn test_calc_accepts_copy_region() {
        let cli = Cli::parse_from(["lotsize", "calc", "--stop-loss", "20", "--copy", "risk2"]);
        match cli.command {
            Some(Commands::Calc { stop_loss, copy, .. }) => {
                assert_eq!(stop_loss, "20");
                assert_eq!(copy, Some(RegionId::Risk2));
            }
            _ => panic!("expected calc command"),
        }
    }
}
