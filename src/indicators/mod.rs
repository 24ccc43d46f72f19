pub mod bands;
pub mod patterns;
pub mod rolling;
pub mod signals;

use thiserror::Error;

// Re-export the band and signal entry points
pub use self::bands::{compute_bands, BandParams, BandSeries};
pub use self::patterns::{analyze_patterns, PatternSnapshot};
pub use self::signals::{classify_signals, Signal, SignalSeries};

/// Data and parameter errors raised by the indicator core. Degenerate market
/// conditions (zero volatility, zero middle band) are not errors; they are
/// handled by explicit policies in the band deriver.
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("invalid indicator parameters: {0}")]
    InvalidParameters(String),

    #[error("non-finite {field} value at index {index}")]
    NonFiniteInput { field: &'static str, index: usize },
}
