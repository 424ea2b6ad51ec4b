use crate::analyzer::statistics::{pearson, sample_std};
use crate::model::RollingSeries;
use chrono::NaiveDate;

/// Pearson correlation over each trailing `window` rows. A window holding a
/// NaN return stays undefined.
pub fn rolling_correlation(dates: &[NaiveDate], x: &[f64], y: &[f64], window: usize) -> RollingSeries {
    let n = dates.len().min(x.len()).min(y.len());
    let values = (0..n)
        .map(|i| {
            trailing(i, window)
                .filter(|&start| complete(&x[start..=i]) && complete(&y[start..=i]))
                .and_then(|start| defined(pearson(&x[start..=i], &y[start..=i])))
        })
        .collect();

    RollingSeries {
        window,
        dates: dates[..n].to_vec(),
        values,
    }
}

/// Sample standard deviation over each trailing `window` rows. A window
/// holding a NaN return stays undefined.
pub fn rolling_volatility(dates: &[NaiveDate], values: &[f64], window: usize) -> RollingSeries {
    let n = dates.len().min(values.len());
    let out = (0..n)
        .map(|i| {
            trailing(i, window)
                .filter(|&start| complete(&values[start..=i]))
                .and_then(|start| defined(sample_std(&values[start..=i])))
        })
        .collect();

    RollingSeries {
        window,
        dates: dates[..n].to_vec(),
        values: out,
    }
}

/// Start index of the window ending at `i`, if it is full.
fn trailing(i: usize, window: usize) -> Option<usize> {
    if window == 0 || i + 1 < window {
        None
    } else {
        Some(i + 1 - window)
    }
}

fn complete(window: &[f64]) -> bool {
    window.iter().all(|v| !v.is_nan())
}

fn defined(value: f64) -> Option<f64> {
    if value.is_nan() { None } else { Some(value) }
}
