use crate::indicators::bands::BandSeries;
use crate::indicators::rolling::rolling_quantile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trailing window for the squeeze threshold.
pub const SQUEEZE_WINDOW: usize = 20;

/// Quantile of trailing band widths below which a point counts as squeezed.
pub const SQUEEZE_QUANTILE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "hold"),
        }
    }
}

/// Band series with per-point trading signals and squeeze flags.
#[derive(Debug, Clone)]
pub struct SignalSeries {
    pub bands: BandSeries,
    pub signals: Vec<Signal>,
    pub squeeze: Vec<bool>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Classify each point of `bands` with a trading signal and a squeeze flag.
///
/// Buy when the close is at or below the lower band, or %B <= 0.2. Sell when
/// the close is at or above the upper band, or %B >= 0.8. The sell check runs
/// second and overwrites a buy when both hold (only possible on degenerate
/// data); the evaluation order is part of the contract.
///
/// A point is squeezed when its width falls strictly below the trailing
/// 25th percentile of widths. At index 0 the window is the point itself, so
/// the flag is always false there. NaN widths never compare true.
pub fn classify_signals(bands: BandSeries) -> SignalSeries {
    let len = bands.len();
    let mut signals = vec![Signal::Hold; len];

    for i in 0..len {
        let close = bands.candles.close[i];

        if close <= bands.lower[i] || bands.percent_b[i] <= 0.2 {
            signals[i] = Signal::Buy;
        }
        if close >= bands.upper[i] || bands.percent_b[i] >= 0.8 {
            signals[i] = Signal::Sell;
        }
    }

    let thresholds = rolling_quantile(&bands.width, SQUEEZE_WINDOW, SQUEEZE_QUANTILE);
    let squeeze = bands
        .width
        .iter()
        .zip(thresholds.iter())
        .map(|(width, threshold)| width < threshold)
        .collect();

    SignalSeries {
        bands,
        signals,
        squeeze,
    }
}
