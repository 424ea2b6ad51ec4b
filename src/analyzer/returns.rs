use crate::model::{INSTRUMENT_COUNT, Instrument, PriceTable, ReturnTable, TableError};

/// Simple daily returns `price[t] / price[t-1] - 1`. The first row has no prior
/// price and is dropped. A zero previous price yields NaN.
pub fn compute_returns(prices: &PriceTable) -> Result<ReturnTable, TableError> {
    let dates = prices.dates().iter().skip(1).copied().collect();
    let mut columns: [Vec<f64>; INSTRUMENT_COUNT] = Default::default();

    for instrument in Instrument::ALL {
        columns[instrument.index()] = pct_change(prices.column(instrument));
    }

    ReturnTable::new(dates, columns)
}

fn pct_change(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| if w[0] == 0.0 { f64::NAN } else { w[1] / w[0] - 1.0 })
        .collect()
}
