// src/cli.rs
use crate::config::DatabaseSettings;
use crate::database::postgres::PostgresManager;
use crate::indicators::bands::BandParams;
use crate::indicators::{analyze_patterns, classify_signals, compute_bands};
use crate::processor::job::CalculationJob;
use crate::processor::runner::{BatchRunner, PairOutcome};
use crate::utils::utils::format_time;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "bollinger-band-calculator")]
#[command(about = "Bollinger Band indicator calculator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate and persist Bollinger Band indicators for symbol/timeframe pairs
    Calculate {
        /// Symbols to process
        #[arg(short, long, num_args = 1.., default_values_t = default_symbols())]
        symbols: Vec<String>,

        /// Timeframes to process
        #[arg(short, long, num_args = 1.., default_values_t = default_timeframes())]
        timeframes: Vec<String>,

        /// Period for the moving average and standard deviation
        #[arg(short, long, default_value_t = 20)]
        window: usize,

        /// Standard deviation multiplier for the outer bands
        #[arg(short = 'k', long, default_value_t = 2.0)]
        std_multiplier: f64,
    },

    /// Analyze the latest point of one pair without persisting anything
    Analyze {
        /// Symbol (e.g. "BTC/USDT")
        #[arg(short, long)]
        symbol: String,

        /// Timeframe (e.g. "4h", "1d")
        #[arg(short, long)]
        timeframe: String,

        /// Period for the moving average and standard deviation
        #[arg(short, long, default_value_t = 20)]
        window: usize,

        /// Standard deviation multiplier for the outer bands
        #[arg(short = 'k', long, default_value_t = 2.0)]
        std_multiplier: f64,

        /// Export the snapshot to a JSON file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Create database tables and indices
    InitDb,
}

fn default_symbols() -> Vec<String> {
    vec![
        "BTC/USDT".to_string(),
        "ETH/USDT".to_string(),
        "SOL/USDT".to_string(),
    ]
}

fn default_timeframes() -> Vec<String> {
    vec!["4h".to_string(), "1d".to_string()]
}

/// Connect to the database using environment settings
pub async fn create_manager() -> Result<Arc<PostgresManager>> {
    let settings = DatabaseSettings::from_env()?;

    let pg = PostgresManager::new(
        &settings.host,
        settings.port,
        &settings.user,
        &settings.password,
        &settings.dbname,
        settings.max_connections,
    )
    .await?;

    Ok(Arc::new(pg))
}

/// Execute a command from the CLI
pub async fn execute_command(command: Commands) -> Result<()> {
    let pg = create_manager().await?;

    match command {
        Commands::Calculate {
            symbols,
            timeframes,
            window,
            std_multiplier,
        } => {
            pg.init_tables().await?;

            let params = BandParams::new(window, std_multiplier);
            let mut jobs = Vec::new();
            for symbol in &symbols {
                for timeframe in &timeframes {
                    jobs.push(CalculationJob::new(
                        symbol.clone(),
                        timeframe.clone(),
                        params.clone(),
                    ));
                }
            }

            let runner = BatchRunner::new(pg);
            let outcomes = runner.run(jobs).await;

            let mut completed = 0;
            let mut skipped = 0;
            let mut failed = 0;
            for (job, outcome) in &outcomes {
                match outcome {
                    PairOutcome::Completed { rows } => {
                        completed += 1;
                        info!("{}: {} rows", job.describe(), rows);
                    }
                    PairOutcome::Skipped => skipped += 1,
                    PairOutcome::Failed { .. } => failed += 1,
                }
            }

            println!(
                "\nProcessed {} pairs: {} completed, {} skipped, {} failed",
                outcomes.len(),
                completed,
                skipped,
                failed
            );

            if !outcomes.is_empty() && failed == outcomes.len() {
                anyhow::bail!("All {} pairs failed", failed);
            }
        }

        Commands::Analyze {
            symbol,
            timeframe,
            window,
            std_multiplier,
            export,
        } => {
            let candles = pg.get_candle_data(&symbol, &timeframe).await?;

            if candles.is_empty() {
                println!("No raw data available for {} ({})", symbol, timeframe);
                return Ok(());
            }

            let params = BandParams::new(window, std_multiplier);
            let bands = compute_bands(candles, &params)?;
            let series = classify_signals(bands);

            let snapshot = match analyze_patterns(&series) {
                Some(snapshot) => snapshot,
                None => {
                    println!("No data points to analyze for {} ({})", symbol, timeframe);
                    return Ok(());
                }
            };

            let last_time = series.bands.candles.open_time[series.len() - 1];
            println!("Pair: {} - {}", symbol, timeframe.to_uppercase());
            println!("Latest candle: {}", format_time(&last_time));
            println!("Position: {}", snapshot.position);
            println!("Volatility: {}", snapshot.volatility);
            println!("Latest signal: {}", snapshot.latest_signal);
            println!("Squeeze active: {}", snapshot.squeeze_active);
            println!(
                "Close {:.4} vs bands [{:.4} / {:.4} / {:.4}], %B {:.4}",
                snapshot.close, snapshot.lower, snapshot.middle, snapshot.upper, snapshot.percent_b
            );

            if let Some(export_path) = export {
                let json = serde_json::to_string_pretty(&snapshot)?;
                std::fs::write(&export_path, json)
                    .with_context(|| format!("Failed to write {}", export_path.display()))?;
                println!("Snapshot exported successfully.");
            }
        }

        Commands::InitDb => {
            pg.init_tables().await?;
            println!("Database tables initialized.");
        }
    }

    Ok(())
}
