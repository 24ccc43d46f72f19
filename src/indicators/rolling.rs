use std::cmp::Ordering;

// Rolling window statistics with expanding-window warm-up: at index i the
// window covers the min(i + 1, window) most recent points, so the first
// window - 1 outputs are computed from the available history instead of
// being left undefined. All callers must pass window >= 1.

// Rolling arithmetic mean over the trailing window.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut results = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        let sum: f64 = slice.iter().sum();
        results.push(sum / slice.len() as f64);
    }

    results
}

// Rolling population standard deviation (denominator = count, not count - 1)
// over the trailing window. Downstream band widths depend on the exact
// magnitude of the population formula.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let mut results = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        let count = slice.len() as f64;
        let mean = slice.iter().sum::<f64>() / count;
        let variance = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        results.push(variance.sqrt());
    }

    results
}

// Rolling quantile over the trailing window, linearly interpolated between
// order statistics. A window containing a NaN yields NaN for that index.
pub fn rolling_quantile(values: &[f64], window: usize, q: f64) -> Vec<f64> {
    let mut results = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];

        if slice.iter().any(|v| v.is_nan()) {
            results.push(f64::NAN);
            continue;
        }

        let mut sorted = slice.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        results.push(quantile_sorted(&sorted, q));
    }

    results
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let position = q * (n - 1) as f64;
    let index = position.floor() as usize;
    let fraction = position - index as f64;

    if index + 1 < n {
        sorted[index] + fraction * (sorted[index + 1] - sorted[index])
    } else {
        sorted[n - 1]
    }
}
