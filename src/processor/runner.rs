use crate::database::models::BandRecord;
use crate::database::postgres::PostgresManager;
use crate::indicators::{analyze_patterns, classify_signals, compute_bands, PatternSnapshot};
use crate::processor::job::CalculationJob;
use crate::utils::log_utils::log_to_file;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of a single (symbol, timeframe) pair. A failed pair never aborts
/// the rest of the batch.
#[derive(Debug)]
pub enum PairOutcome {
    Completed { rows: usize },
    Skipped,
    Failed { error: String },
}

pub struct BatchRunner {
    pg: Arc<PostgresManager>,
}

impl BatchRunner {
    pub fn new(pg: Arc<PostgresManager>) -> Self {
        Self { pg }
    }

    /// Process all jobs sequentially and collect per-pair outcomes.
    pub async fn run(&self, jobs: Vec<CalculationJob>) -> Vec<(CalculationJob, PairOutcome)> {
        let mut outcomes = Vec::with_capacity(jobs.len());

        for job in jobs {
            info!("Calculating Bollinger Bands for {}", job.describe());

            let outcome = match self.process_job(&job).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Failed to process {}: {:#}", job.describe(), e);
                    PairOutcome::Failed {
                        error: format!("{:#}", e),
                    }
                }
            };

            outcomes.push((job, outcome));
        }

        outcomes
    }

    async fn process_job(&self, job: &CalculationJob) -> anyhow::Result<PairOutcome> {
        let candles = self
            .pg
            .get_candle_data(&job.symbol, &job.timeframe)
            .await?;

        if candles.is_empty() {
            info!(
                "No raw data available for {} ({})",
                job.symbol, job.timeframe
            );
            return Ok(PairOutcome::Skipped);
        }

        let bands = compute_bands(candles, &job.params)?;
        let series = classify_signals(bands);

        let records = BandRecord::from_series(&series.bands);
        let rows = self.pg.upsert_band_records(&records).await?;

        if rows < records.len() {
            warn!(
                "Persisted {} of {} band rows for {}",
                rows,
                records.len(),
                job.symbol
            );
        } else {
            info!("Saved {} band rows for {}", rows, job.describe());
        }

        if let Some(snapshot) = analyze_patterns(&series) {
            report_snapshot(job, &snapshot);
        }

        if let Err(e) = log_to_file(&format!(
            "{} -> {} rows persisted",
            job.describe(),
            rows
        )) {
            warn!("Failed to write calculation audit log: {}", e);
        }

        Ok(PairOutcome::Completed { rows })
    }
}

fn report_snapshot(job: &CalculationJob, snapshot: &PatternSnapshot) {
    println!("\n[ANALYSIS] {} - {}", job.symbol, job.timeframe.to_uppercase());
    println!("[ANALYSIS] Current position: {}", snapshot.position);
    println!("[ANALYSIS] Volatility: {}", snapshot.volatility);
    println!("[ANALYSIS] Recent signal: {}", snapshot.latest_signal);
    println!("[ANALYSIS] Squeeze active: {}", snapshot.squeeze_active);
    println!(
        "[ANALYSIS] Close {:.4} vs bands [{:.4} / {:.4} / {:.4}], %B {:.4}",
        snapshot.close, snapshot.lower, snapshot.middle, snapshot.upper, snapshot.percent_b
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_carries_message() {
        let outcome = PairOutcome::Failed {
            error: "connection refused".to_string(),
        };

        match outcome {
            PairOutcome::Failed { error } => assert!(error.contains("refused")),
            _ => panic!("expected failure"),
        }
    }
}
