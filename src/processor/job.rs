use crate::indicators::bands::BandParams;
use serde::{Deserialize, Serialize};

/// One unit of work: compute bands for a single (symbol, timeframe) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationJob {
    pub symbol: String,
    pub timeframe: String,
    pub params: BandParams,
}

impl CalculationJob {
    pub fn new(symbol: String, timeframe: String, params: BandParams) -> Self {
        Self {
            symbol,
            timeframe,
            params,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{}:{} (window={}, k={})",
            self.symbol, self.timeframe, self.params.window, self.params.std_multiplier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_names_pair_and_parameters() {
        let job = CalculationJob::new(
            "BTC/USDT".to_string(),
            "4h".to_string(),
            BandParams::new(20, 2.0),
        );

        assert_eq!(job.describe(), "BTC/USDT:4h (window=20, k=2)");
    }
}
