// Core structs: Instrument, series and tables, analysis results, error types
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub const INSTRUMENT_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instrument {
    Gold,
    Dxy,
    Us10y,
}

impl Instrument {
    /// Column order used by every table.
    pub const ALL: [Instrument; INSTRUMENT_COUNT] = [Instrument::Gold, Instrument::Dxy, Instrument::Us10y];

    pub fn label(self) -> &'static str {
        match self {
            Instrument::Gold => "GOLD",
            Instrument::Dxy => "DXY",
            Instrument::Us10y => "US10Y",
        }
    }

    /// Identifier of the instrument at the market-data source.
    pub fn symbol(self) -> &'static str {
        match self {
            Instrument::Gold => "GC=F",
            Instrument::Dxy => "DX-Y.NYB",
            // Quoted as yield * 10, e.g. 45.0 = 4.5%
            Instrument::Us10y => "^TNX",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Instrument::Gold => 0,
            Instrument::Dxy => 1,
            Instrument::Us10y => 2,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Daily closes of one instrument, ascending by date, one value per date.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub instrument: Instrument,
    points: Vec<(NaiveDate, f64)>,
}

impl PriceSeries {
    /// Sorts by date and keeps the last value seen for a repeated date.
    /// Non-finite closes are dropped.
    pub fn from_points(instrument: Instrument, points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let by_date: BTreeMap<NaiveDate, f64> = points
            .into_iter()
            .filter(|(_, close)| close.is_finite())
            .collect();

        Self {
            instrument,
            points: by_date.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Dates x instruments matrix. Every column has one value per date.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    dates: Vec<NaiveDate>,
    columns: [Vec<f64>; INSTRUMENT_COUNT],
}

pub type PriceTable = SeriesTable;
pub type ReturnTable = SeriesTable;

impl SeriesTable {
    pub fn new(dates: Vec<NaiveDate>, columns: [Vec<f64>; INSTRUMENT_COUNT]) -> Result<Self, TableError> {
        for (instrument, column) in Instrument::ALL.iter().zip(columns.iter()) {
            if column.len() != dates.len() {
                return Err(TableError::LengthMismatch {
                    instrument: *instrument,
                    expected: dates.len(),
                    actual: column.len(),
                });
            }
        }
        Ok(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column(&self, instrument: Instrument) -> &[f64] {
        &self.columns[instrument.index()]
    }

    pub fn row(&self, i: usize) -> Option<(NaiveDate, [f64; INSTRUMENT_COUNT])> {
        let date = *self.dates.get(i)?;
        Some((date, [self.columns[0][i], self.columns[1][i], self.columns[2][i]]))
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, [f64; INSTRUMENT_COUNT])> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }
}

/// Statistic computed over a trailing window. `None` until the window is full,
/// or where the statistic is not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSeries {
    pub window: usize,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl RollingSeries {
    pub fn defined(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates
            .iter()
            .zip(self.values.iter())
            .filter_map(|(date, value)| value.map(|v| (*date, v)))
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Last `n` defined entries, oldest first.
    pub fn tail_defined(&self, n: usize) -> Vec<(NaiveDate, f64)> {
        let defined: Vec<(NaiveDate, f64)> = self.defined().collect();
        let skip = defined.len().saturating_sub(n);
        defined.into_iter().skip(skip).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    values: [[f64; INSTRUMENT_COUNT]; INSTRUMENT_COUNT],
}

impl CorrelationMatrix {
    pub fn from_values(values: [[f64; INSTRUMENT_COUNT]; INSTRUMENT_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, a: Instrument, b: Instrument) -> f64 {
        self.values[a.index()][b.index()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSummary {
    pub instrument: Instrument,
    pub annual_return: f64,
    pub annual_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

/// GOLD returns partitioned by 30-day volatility against its median.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeSplit {
    pub threshold: f64,
    pub high_vol_dates: Vec<NaiveDate>,
    pub low_vol_dates: Vec<NaiveDate>,
    pub high_vol_mean_return: f64,
    pub low_vol_mean_return: f64,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub correlation: CorrelationMatrix,
    pub rolling_correlation: RollingSeries,
    pub rolling_volatility: [RollingSeries; INSTRUMENT_COUNT],
    pub summaries: Vec<InstrumentSummary>,
    pub regime: RegimeSplit,
}

impl AnalysisReport {
    pub fn rolling_volatility_of(&self, instrument: Instrument) -> &RollingSeries {
        &self.rolling_volatility[instrument.index()]
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No data returned for {instrument} ({symbol}).")]
    DataUnavailable { instrument: Instrument, symbol: &'static str },
    #[error("Request for {instrument} ({symbol}) timed out")]
    DataSourceTimeout { instrument: Instrument, symbol: &'static str },
    #[error("HTTP error for {symbol}: {message}")]
    Http { symbol: &'static str, message: String },
    #[error("Unexpected status {status} for {symbol}")]
    InvalidResponse { symbol: &'static str, status: u16 },
    #[error("Failed to parse payload for {symbol}: {source}")]
    Parse {
        symbol: &'static str,
        #[source]
        source: ParserError,
    },
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("source reported error: {0}")]
    SourceReported(String),
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("column {instrument} has {actual} values, expected {expected}")]
    LengthMismatch {
        instrument: Instrument,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("rendering {chart} failed: {message}")]
    Render { chart: &'static str, message: String },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("only {rows} aligned rows, at least 2 are needed to compute returns")]
    InsufficientHistory { rows: usize },
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    #[error("chart: {0}")]
    Chart(#[from] ChartError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn price_series_sorts_and_keeps_last_duplicate() {
        let series = PriceSeries::from_points(
            Instrument::Gold,
            vec![(d(3), 3.0), (d(1), 1.0), (d(3), 3.5), (d(2), f64::NAN)],
        );
        assert_eq!(series.points(), &[(d(1), 1.0), (d(3), 3.5)]);
    }

    #[test]
    fn table_rejects_ragged_columns() {
        let err = SeriesTable::new(vec![d(1), d(2)], [vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(
            err,
            TableError::LengthMismatch { instrument: Instrument::Dxy, expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn tail_defined_skips_undefined_entries() {
        let rolling = RollingSeries {
            window: 2,
            dates: vec![d(1), d(2), d(3), d(4)],
            values: vec![None, Some(0.1), None, Some(0.3)],
        };
        assert_eq!(rolling.defined_count(), 2);
        assert_eq!(rolling.tail_defined(1), vec![(d(4), 0.3)]);
        assert_eq!(rolling.tail_defined(10).len(), 2);
    }

    #[test]
    fn data_unavailable_message_names_instrument() {
        let err = SourceError::DataUnavailable {
            instrument: Instrument::Dxy,
            symbol: Instrument::Dxy.symbol(),
        };
        assert_eq!(err.to_string(), "No data returned for DXY (DX-Y.NYB).");
    }
}
