use crate::indicators::bands::BandSeries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One raw OHLCV candle as stored in the market_candles table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MarketCandle {
    pub id: i32,
    pub symbol: String,
    pub timeframe: String,
    pub open_time: DateTime<Utc>,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

/// Column-oriented candle series for a single (symbol, timeframe) pair,
/// ordered ascending by open_time.
#[derive(Debug, Clone)]
pub struct CandleData {
    pub symbol: String,
    pub timeframe: String,
    pub open_time: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl CandleData {
    pub fn new(symbol: String, timeframe: String) -> Self {
        Self {
            symbol,
            timeframe,
            open_time: Vec::new(),
            open: Vec::new(),
            high: Vec::new(),
            low: Vec::new(),
            close: Vec::new(),
            volume: Vec::new(),
        }
    }

    pub fn from_candles(candles: Vec<MarketCandle>) -> Self {
        let mut data = Self::new(candles[0].symbol.clone(), candles[0].timeframe.clone());

        for candle in candles {
            data.open_time.push(candle.open_time);
            data.open.push(candle.open_price);
            data.high.push(candle.high_price);
            data.low.push(candle.low_price);
            data.close.push(candle.close_price);
            data.volume.push(candle.volume);
        }

        data
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// One computed indicator row, keyed by (symbol, timeframe, open_time).
#[derive(Debug, Clone, Serialize)]
pub struct BandRecord {
    pub symbol: String,
    pub timeframe: String,
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub bb_middle: f64,
    pub bb_width: f64,
    pub bb_percent: f64,
}

impl BandRecord {
    /// Flatten a band series into persistence rows, one per input candle.
    pub fn from_series(series: &BandSeries) -> Vec<BandRecord> {
        let candles = &series.candles;
        let mut records = Vec::with_capacity(series.len());

        for i in 0..series.len() {
            records.push(BandRecord {
                symbol: candles.symbol.clone(),
                timeframe: candles.timeframe.clone(),
                open_time: candles.open_time[i],
                open: candles.open[i],
                high: candles.high[i],
                low: candles.low[i],
                close: candles.close[i],
                volume: candles.volume[i],
                bb_upper: series.upper[i],
                bb_lower: series.lower[i],
                bb_middle: series.middle[i],
                bb_width: series.width[i],
                bb_percent: series.percent_b[i],
            });
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::bands::{compute_bands, BandParams};

    #[test]
    fn records_align_with_series() {
        let mut candles = CandleData::new("BTC/USDT".to_string(), "4h".to_string());
        for (i, close) in [100.0, 102.0, 101.0, 99.0].iter().enumerate() {
            candles
                .open_time
                .push(DateTime::<Utc>::from_timestamp(i as i64 * 14_400, 0).unwrap());
            candles.open.push(close - 0.5);
            candles.high.push(close + 1.0);
            candles.low.push(close - 1.0);
            candles.close.push(*close);
            candles.volume.push(10.0);
        }

        let series = compute_bands(candles, &BandParams::default()).unwrap();
        let records = BandRecord::from_series(&series);

        assert_eq!(records.len(), 4);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.symbol, "BTC/USDT");
            assert_eq!(record.timeframe, "4h");
            assert_eq!(record.close, series.candles.close[i]);
            assert_eq!(record.bb_middle, series.middle[i]);
            assert_eq!(record.bb_percent, series.percent_b[i]);
        }
    }

    #[test]
    fn from_candles_preserves_order() {
        let candles = vec![
            MarketCandle {
                id: 1,
                symbol: "ETH/USDT".to_string(),
                timeframe: "1d".to_string(),
                open_time: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
                open_price: 10.0,
                high_price: 11.0,
                low_price: 9.0,
                close_price: 10.5,
                volume: 100.0,
            },
            MarketCandle {
                id: 2,
                symbol: "ETH/USDT".to_string(),
                timeframe: "1d".to_string(),
                open_time: DateTime::<Utc>::from_timestamp(86_400, 0).unwrap(),
                open_price: 10.5,
                high_price: 12.0,
                low_price: 10.0,
                close_price: 11.5,
                volume: 120.0,
            },
        ];

        let data = CandleData::from_candles(candles);
        assert_eq!(data.len(), 2);
        assert_eq!(data.symbol, "ETH/USDT");
        assert_eq!(data.close, vec![10.5, 11.5]);
        assert!(data.open_time[0] < data.open_time[1]);
    }
}
