use crate::model::{INSTRUMENT_COUNT, PriceSeries, PriceTable, TableError};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Inner-joins the series on date. A date survives only if every instrument
/// has a finite close for it. No interpolation or forward-fill.
pub fn align_series(series: &[PriceSeries]) -> Result<PriceTable, TableError> {
    let mut by_date: BTreeMap<NaiveDate, [Option<f64>; INSTRUMENT_COUNT]> = BTreeMap::new();

    for s in series {
        let idx = s.instrument.index();
        for &(date, close) in s.points() {
            by_date.entry(date).or_insert([None; INSTRUMENT_COUNT])[idx] = Some(close);
        }
    }

    let mut dates = Vec::new();
    let mut columns: [Vec<f64>; INSTRUMENT_COUNT] = Default::default();

    for (date, row) in by_date {
        if let [Some(a), Some(b), Some(c)] = row {
            if a.is_finite() && b.is_finite() && c.is_finite() {
                dates.push(date);
                for (column, value) in columns.iter_mut().zip([a, b, c]) {
                    column.push(value);
                }
            }
        }
    }

    PriceTable::new(dates, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Instrument;
    use std::collections::BTreeSet;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn series(instrument: Instrument, days: &[u32]) -> PriceSeries {
        PriceSeries::from_points(instrument, days.iter().map(|&day| (d(day), 100.0 + day as f64)))
    }

    #[test]
    fn keeps_only_dates_present_everywhere() {
        let gold = series(Instrument::Gold, &[1, 2, 3, 5, 6, 7]);
        let dxy = series(Instrument::Dxy, &[2, 3, 4, 5, 7]);
        let us10y = series(Instrument::Us10y, &[1, 2, 5, 6, 7, 8]);

        let table = align_series(&[gold.clone(), dxy.clone(), us10y.clone()]).unwrap();

        let expected: BTreeSet<NaiveDate> = [&gold, &dxy, &us10y]
            .iter()
            .map(|s| s.points().iter().map(|(date, _)| *date).collect::<BTreeSet<_>>())
            .reduce(|acc, next| acc.intersection(&next).copied().collect())
            .unwrap();

        assert_eq!(table.dates(), expected.into_iter().collect::<Vec<_>>().as_slice());
        assert_eq!(table.dates(), &[d(2), d(5), d(7)]);
        assert_eq!(table.column(Instrument::Dxy), &[102.0, 105.0, 107.0]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let gold = series(Instrument::Gold, &[1, 2]);
        let dxy = series(Instrument::Dxy, &[1, 2]);
        let us10y = series(Instrument::Us10y, &[1, 2]);

        let a = align_series(&[gold.clone(), dxy.clone(), us10y.clone()]).unwrap();
        let b = align_series(&[us10y, gold, dxy]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_instrument_yields_empty_table() {
        let gold = series(Instrument::Gold, &[1, 2]);
        let dxy = series(Instrument::Dxy, &[1, 2]);
        assert_eq!(align_series(&[gold, dxy]).unwrap().len(), 0);
    }
}
