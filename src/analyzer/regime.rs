use crate::analyzer::statistics::{mean, median};
use crate::model::{RegimeSplit, RollingSeries};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Splits dates into high/low volatility around the median of the defined
/// rolling volatility values, and averages `returns` within each side.
/// Dates with undefined volatility belong to neither side.
pub fn regime_split(volatility: &RollingSeries, dates: &[NaiveDate], returns: &[f64]) -> RegimeSplit {
    let defined: Vec<(NaiveDate, f64)> = volatility.defined().collect();
    let levels: Vec<f64> = defined.iter().map(|(_, v)| *v).collect();
    let threshold = median(&levels);

    let return_by_date: HashMap<NaiveDate, f64> = dates.iter().copied().zip(returns.iter().copied()).collect();

    let mut high_vol_dates = Vec::new();
    let mut low_vol_dates = Vec::new();
    let mut high_returns = Vec::new();
    let mut low_returns = Vec::new();

    for (date, vol) in defined {
        let Some(&ret) = return_by_date.get(&date) else {
            continue;
        };
        if vol > threshold {
            high_vol_dates.push(date);
            high_returns.push(ret);
        } else {
            low_vol_dates.push(date);
            low_returns.push(ret);
        }
    }

    RegimeSplit {
        threshold,
        high_vol_dates,
        low_vol_dates,
        high_vol_mean_return: mean(&high_returns),
        low_vol_mean_return: mean(&low_returns),
    }
}
