use crate::database::models::CandleData;
use crate::indicators::rolling::{rolling_mean, rolling_std};
use crate::indicators::IndicatorError;
use serde::{Deserialize, Serialize};

/// Parameters for the Bollinger Band calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandParams {
    /// Period for the moving average and standard deviation.
    pub window: usize,
    /// Number of standard deviations between the middle and outer bands.
    pub std_multiplier: f64,
}

impl Default for BandParams {
    fn default() -> Self {
        Self {
            window: 20,
            std_multiplier: 2.0,
        }
    }
}

impl BandParams {
    pub fn new(window: usize, std_multiplier: f64) -> Self {
        Self {
            window,
            std_multiplier,
        }
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.window == 0 {
            return Err(IndicatorError::InvalidParameters(
                "window must be at least 1".to_string(),
            ));
        }
        if !self.std_multiplier.is_finite() {
            return Err(IndicatorError::InvalidParameters(
                "std_multiplier must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Candle data with aligned Bollinger Band columns.
#[derive(Debug, Clone)]
pub struct BandSeries {
    pub candles: CandleData,
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
    pub percent_b: Vec<f64>,
}

impl BandSeries {
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }
}

/// Calculate Bollinger Bands over the closing prices of `candles`.
///
/// - `middle` = rolling mean, `upper`/`lower` = middle +/- k * std
/// - `width` = (upper - lower) / middle, NaN when middle is zero
/// - `percent_b` = (close - lower) / (upper - lower), 0.5 when the bands
///   collapse to a single line (zero volatility)
///
/// Warm-up uses the expanding window of `rolling`, so every input point
/// produces an output point. An empty input yields an empty series.
pub fn compute_bands(candles: CandleData, params: &BandParams) -> Result<BandSeries, IndicatorError> {
    params.validate()?;

    if let Some(index) = candles.close.iter().position(|v| !v.is_finite()) {
        return Err(IndicatorError::NonFiniteInput {
            field: "close",
            index,
        });
    }

    let middle = rolling_mean(&candles.close, params.window);
    let std = rolling_std(&candles.close, params.window);
    let k = params.std_multiplier;

    let mut upper = Vec::with_capacity(middle.len());
    let mut lower = Vec::with_capacity(middle.len());
    let mut width = Vec::with_capacity(middle.len());
    let mut percent_b = Vec::with_capacity(middle.len());

    for i in 0..middle.len() {
        let up = middle[i] + k * std[i];
        let low = middle[i] - k * std[i];

        let w = if middle[i] == 0.0 {
            f64::NAN
        } else {
            (up - low) / middle[i]
        };

        // Midpoint default when the bands collapse; keeps downstream signal
        // classification free of NaN.
        let pb = if up == low {
            0.5
        } else {
            (candles.close[i] - low) / (up - low)
        };

        upper.push(up);
        lower.push(low);
        width.push(w);
        percent_b.push(pb);
    }

    Ok(BandSeries {
        candles,
        middle,
        upper,
        lower,
        width,
        percent_b,
    })
}
