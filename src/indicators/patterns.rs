use crate::indicators::signals::{Signal, SignalSeries};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trailing window used for the volatility baseline.
pub const ANALYSIS_WINDOW: usize = 20;

/// Position of the latest close relative to the bands, bucketed by %B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricePosition {
    AboveUpperBand,
    NearUpperBand,
    AboveMiddle,
    AroundMiddle,
    BelowMiddle,
    NearLowerBand,
    BelowLowerBand,
}

impl PricePosition {
    /// Bucket %B with descending thresholds, first match wins.
    pub fn from_percent_b(percent_b: f64) -> Self {
        if percent_b >= 1.0 {
            PricePosition::AboveUpperBand
        } else if percent_b >= 0.8 {
            PricePosition::NearUpperBand
        } else if percent_b >= 0.6 {
            PricePosition::AboveMiddle
        } else if percent_b >= 0.4 {
            PricePosition::AroundMiddle
        } else if percent_b >= 0.2 {
            PricePosition::BelowMiddle
        } else if percent_b > 0.0 {
            PricePosition::NearLowerBand
        } else {
            PricePosition::BelowLowerBand
        }
    }
}

impl fmt::Display for PricePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PricePosition::AboveUpperBand => "Above upper band (very overbought)",
            PricePosition::NearUpperBand => "Near upper band (overbought)",
            PricePosition::AboveMiddle => "Above middle (bullish)",
            PricePosition::AroundMiddle => "Around middle (neutral)",
            PricePosition::BelowMiddle => "Below middle (bearish)",
            PricePosition::NearLowerBand => "Near lower band (oversold)",
            PricePosition::BelowLowerBand => "Below lower band (very oversold)",
        };
        write!(f, "{}", label)
    }
}

/// Volatility regime of the latest point against its trailing baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityRegime {
    High,
    AboveAverage,
    Normal,
    BelowAverage,
    Low,
}

impl VolatilityRegime {
    /// Bucket the width ratio with descending thresholds, first match wins.
    /// NaN fails every comparison and lands in the lowest bucket.
    pub fn from_width_ratio(ratio: f64) -> Self {
        if ratio >= 1.5 {
            VolatilityRegime::High
        } else if ratio >= 1.2 {
            VolatilityRegime::AboveAverage
        } else if ratio >= 0.8 {
            VolatilityRegime::Normal
        } else if ratio >= 0.6 {
            VolatilityRegime::BelowAverage
        } else {
            VolatilityRegime::Low
        }
    }
}

impl fmt::Display for VolatilityRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VolatilityRegime::High => "High volatility (bands expanding)",
            VolatilityRegime::AboveAverage => "Above average volatility",
            VolatilityRegime::Normal => "Normal volatility",
            VolatilityRegime::BelowAverage => "Below average volatility",
            VolatilityRegime::Low => "Low volatility (potential squeeze)",
        };
        write!(f, "{}", label)
    }
}

/// Snapshot of the latest point: position, volatility regime, most recent
/// signal, and the band levels around the close. Recomputed on demand and
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PatternSnapshot {
    pub position: PricePosition,
    pub volatility: VolatilityRegime,
    pub latest_signal: Signal,
    pub squeeze_active: bool,
    pub close: f64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub percent_b: f64,
}

/// Analyze the latest point of `series` against its trailing window.
/// Returns `None` for an empty series; missing data is an expected outcome,
/// not an error.
pub fn analyze_patterns(series: &SignalSeries) -> Option<PatternSnapshot> {
    if series.is_empty() {
        return None;
    }

    let last = series.len() - 1;
    let bands = &series.bands;

    let start = series.len().saturating_sub(ANALYSIS_WINDOW);
    let recent_widths: Vec<f64> = bands.width[start..]
        .iter()
        .copied()
        .filter(|w| w.is_finite())
        .collect();
    let average_width = if recent_widths.is_empty() {
        0.0
    } else {
        recent_widths.iter().sum::<f64>() / recent_widths.len() as f64
    };

    let last_width = bands.width[last];
    let ratio = if average_width > 0.0 {
        last_width / average_width
    } else {
        1.0
    };

    Some(PatternSnapshot {
        position: PricePosition::from_percent_b(bands.percent_b[last]),
        volatility: VolatilityRegime::from_width_ratio(ratio),
        latest_signal: series.signals[last],
        squeeze_active: series.squeeze[last],
        close: bands.candles.close[last],
        upper: bands.upper[last],
        middle: bands.middle[last],
        lower: bands.lower[last],
        percent_b: bands.percent_b[last],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CandleData;
    use crate::indicators::bands::{compute_bands, BandParams};
    use crate::indicators::signals::classify_signals;
    use chrono::{DateTime, Utc};

    fn signal_series(closes: &[f64]) -> SignalSeries {
        let mut candles = CandleData::new("TEST/USDT".to_string(), "1d".to_string());
        for (i, close) in closes.iter().enumerate() {
            candles
                .open_time
                .push(DateTime::<Utc>::from_timestamp(i as i64 * 86_400, 0).unwrap());
            candles.open.push(*close);
            candles.high.push(*close);
            candles.low.push(*close);
            candles.close.push(*close);
            candles.volume.push(250.0);
        }
        classify_signals(compute_bands(candles, &BandParams::default()).unwrap())
    }

    #[test]
    fn empty_series_yields_no_snapshot() {
        let series = signal_series(&[]);
        assert!(analyze_patterns(&series).is_none());
    }

    #[test]
    fn position_buckets_match_descending_thresholds() {
        let cases = [
            (1.3, PricePosition::AboveUpperBand),
            (1.0, PricePosition::AboveUpperBand),
            (0.8, PricePosition::NearUpperBand),
            (0.7, PricePosition::AboveMiddle),
            (0.6, PricePosition::AboveMiddle),
            (0.5, PricePosition::AroundMiddle),
            (0.4, PricePosition::AroundMiddle),
            (0.3, PricePosition::BelowMiddle),
            (0.2, PricePosition::BelowMiddle),
            (0.1, PricePosition::NearLowerBand),
            (0.0, PricePosition::BelowLowerBand),
            (-0.4, PricePosition::BelowLowerBand),
        ];

        for (percent_b, expected) in cases {
            assert_eq!(PricePosition::from_percent_b(percent_b), expected);
        }
    }

    #[test]
    fn volatility_buckets_match_descending_thresholds() {
        let cases = [
            (2.0, VolatilityRegime::High),
            (1.5, VolatilityRegime::High),
            (1.3, VolatilityRegime::AboveAverage),
            (1.2, VolatilityRegime::AboveAverage),
            (1.0, VolatilityRegime::Normal),
            (0.8, VolatilityRegime::Normal),
            (0.7, VolatilityRegime::BelowAverage),
            (0.6, VolatilityRegime::BelowAverage),
            (0.3, VolatilityRegime::Low),
            (f64::NAN, VolatilityRegime::Low),
        ];

        for (ratio, expected) in cases {
            assert_eq!(VolatilityRegime::from_width_ratio(ratio), expected);
        }
    }

    #[test]
    fn zero_average_width_defaults_to_normal() {
        // Flat series: every width is zero, so the ratio guard kicks in and
        // reports a neutral baseline.
        let series = signal_series(&[100.0; 30]);
        let snapshot = analyze_patterns(&series).unwrap();

        assert_eq!(snapshot.volatility, VolatilityRegime::Normal);
    }

    #[test]
    fn rising_ramp_reports_overbought_sell() {
        let closes: Vec<f64> = (90..=109).map(|v| v as f64).collect();
        let series = signal_series(&closes);
        let snapshot = analyze_patterns(&series).unwrap();

        assert_eq!(snapshot.position, PricePosition::NearUpperBand);
        assert_eq!(snapshot.latest_signal, Signal::Sell);
        assert!(snapshot.percent_b > 0.8);
        assert!(snapshot.upper > snapshot.middle);
        assert!(snapshot.middle > snapshot.lower);
    }

    #[test]
    fn snapshot_carries_latest_band_levels() {
        let closes = vec![100.0, 102.0, 98.0, 101.0, 99.0, 103.0];
        let series = signal_series(&closes);
        let last = series.len() - 1;
        let snapshot = analyze_patterns(&series).unwrap();

        assert_eq!(snapshot.close, series.bands.candles.close[last]);
        assert_eq!(snapshot.upper, series.bands.upper[last]);
        assert_eq!(snapshot.middle, series.bands.middle[last]);
        assert_eq!(snapshot.lower, series.bands.lower[last]);
    }

    #[test]
    fn labels_read_as_human_text() {
        assert_eq!(
            PricePosition::AboveUpperBand.to_string(),
            "Above upper band (very overbought)"
        );
        assert_eq!(
            VolatilityRegime::Low.to_string(),
            "Low volatility (potential squeeze)"
        );
    }
}
