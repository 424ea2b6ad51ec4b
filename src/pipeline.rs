use crate::aligner::align_series;
use crate::analyzer::{Analyzer, AnalyzerImpl, compute_returns};
use crate::config::{AppConfig, PRICES_CSV, RETURNS_CSV};
use crate::model::{AnalysisReport, Instrument, PipelineError, PriceTable, ReturnTable, SourceError};
use crate::report::{print_report, render_charts};
use crate::source::PriceSource;
use crate::storage::write_table;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

/// Everything one run produced, kept for callers that inspect results.
pub struct PipelineOutput {
    pub prices: PriceTable,
    pub returns: ReturnTable,
    pub report: AnalysisReport,
    pub written: Vec<PathBuf>,
}

/// Fetch, align, transform, analyze, emit. Nothing is written to disk until
/// every instrument has been fetched and the analysis has completed.
pub async fn run<S: PriceSource + ?Sized>(
    source: &S,
    config: &AppConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PipelineOutput, PipelineError> {
    let mut series = Vec::with_capacity(Instrument::ALL.len());
    for instrument in Instrument::ALL {
        info!("Fetching {} ({}) from {}...", instrument, instrument.symbol(), start);
        let fetched = source.fetch_closes(instrument, start, end).await?;
        if fetched.is_empty() {
            return Err(SourceError::DataUnavailable {
                instrument,
                symbol: instrument.symbol(),
            }
            .into());
        }
        info!("{}: {} closes", instrument, fetched.len());
        series.push(fetched);
    }

    let prices = align_series(&series)?;
    info!("Aligned {} dates across {} instruments", prices.len(), series.len());
    if prices.len() < 2 {
        return Err(PipelineError::InsufficientHistory { rows: prices.len() });
    }

    let returns = compute_returns(&prices)?;
    let report = AnalyzerImpl::new().analyze(&returns);

    print_report(&prices, &returns, &report);

    let mut written = render_charts(&config.visuals_dir(), &prices, &report)?;

    let data_dir = config.data_dir();
    let prices_path = data_dir.join(PRICES_CSV);
    let returns_path = data_dir.join(RETURNS_CSV);
    write_table(&prices_path, &prices)?;
    write_table(&returns_path, &returns)?;
    written.push(prices_path);
    written.push(returns_path);

    Ok(PipelineOutput {
        prices,
        returns,
        report,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriceSeries;
    use crate::storage::read_table;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory source returning canned series.
    struct StaticSource {
        series: HashMap<Instrument, Vec<(NaiveDate, f64)>>,
        calls: Mutex<Vec<Instrument>>,
    }

    #[async_trait::async_trait]
    impl PriceSource for StaticSource {
        async fn fetch_closes(
            &self,
            instrument: Instrument,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<PriceSeries, SourceError> {
            self.calls.lock().unwrap().push(instrument);
            let points = self.series.get(&instrument).cloned().unwrap_or_default();
            Ok(PriceSeries::from_points(instrument, points))
        }
    }

    fn trading_days(n: usize) -> Vec<NaiveDate> {
        let mut day = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut days = Vec::with_capacity(n);
        while days.len() < n {
            if chrono::Datelike::weekday(&day).number_from_monday() <= 5 {
                days.push(day);
            }
            day = day.succ_opt().unwrap();
        }
        days
    }

    /// Compounds a deterministic return pattern from `base`.
    fn synthetic_prices(days: &[NaiveDate], base: f64, step: usize, scale: f64) -> Vec<(NaiveDate, f64)> {
        let mut price = base;
        days.iter()
            .enumerate()
            .map(|(i, d)| {
                if i > 0 {
                    price *= 1.0 + (((i * step) % 13) as f64 - 6.0) * scale;
                }
                (*d, price)
            })
            .collect()
    }

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            output_root: dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn end_to_end_synthetic_hundred_days() {
        let days = trading_days(100);
        let source = StaticSource {
            series: HashMap::from([
                (Instrument::Gold, synthetic_prices(&days, 1500.0, 5, 0.002)),
                (Instrument::Dxy, synthetic_prices(&days, 96.0, 3, 0.001)),
                (Instrument::Us10y, synthetic_prices(&days, 18.0, 7, 0.004)),
            ]),
            calls: Mutex::new(Vec::new()),
        };
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let output = run(&source, &config, days[0], days[99]).await.unwrap();

        assert_eq!(*source.calls.lock().unwrap(), Instrument::ALL.to_vec());
        assert_eq!(output.prices.len(), 100);
        assert_eq!(output.returns.len(), 99);

        for summary in &output.report.summaries {
            let r = output.returns.column(summary.instrument);
            let expected = r.iter().sum::<f64>() / r.len() as f64 * 252.0;
            assert!((summary.annual_return - expected).abs() < 1e-9);
            assert!(summary.max_drawdown <= 0.0);
        }

        let prices_csv = dir.path().join("data").join("prices.csv");
        let returns_csv = dir.path().join("data").join("returns.csv");
        assert_eq!(read_table(&prices_csv).unwrap(), output.prices);
        assert_eq!(read_table(&returns_csv).unwrap(), output.returns);

        assert_eq!(output.written.len(), 5);
        for name in ["gold_price.png", "rolling_correlation.png", "rolling_volatility.png"] {
            let path = dir.path().join("visuals").join(name);
            assert!(std::fs::metadata(&path).unwrap().len() > 0, "{} missing", name);
        }
    }

    #[tokio::test]
    async fn empty_series_aborts_before_writing() {
        let days = trading_days(40);
        let source = StaticSource {
            series: HashMap::from([
                (Instrument::Gold, synthetic_prices(&days, 1500.0, 5, 0.002)),
                (Instrument::Us10y, synthetic_prices(&days, 18.0, 7, 0.004)),
            ]),
            calls: Mutex::new(Vec::new()),
        };
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let err = run(&source, &config, days[0], days[39]).await.err().unwrap();

        match err {
            PipelineError::Source(SourceError::DataUnavailable { instrument, .. }) => {
                assert_eq!(instrument, Instrument::Dxy)
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(err_message(Instrument::Dxy), "No data returned for DXY (DX-Y.NYB).");
        // US10Y is never requested once DXY came back empty
        assert_eq!(*source.calls.lock().unwrap(), vec![Instrument::Gold, Instrument::Dxy]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn disjoint_dates_are_insufficient_history() {
        let days = trading_days(6);
        let source = StaticSource {
            series: HashMap::from([
                (Instrument::Gold, synthetic_prices(&days[..2], 1500.0, 5, 0.002)),
                (Instrument::Dxy, synthetic_prices(&days[2..4], 96.0, 3, 0.001)),
                (Instrument::Us10y, synthetic_prices(&days[4..], 18.0, 7, 0.004)),
            ]),
            calls: Mutex::new(Vec::new()),
        };
        let dir = tempfile::tempdir().unwrap();

        let result = run(&source, &config_in(dir.path()), days[0], days[5]).await;

        assert!(matches!(result, Err(PipelineError::InsufficientHistory { rows: 0 })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    fn err_message(instrument: Instrument) -> String {
        SourceError::DataUnavailable {
            instrument,
            symbol: instrument.symbol(),
        }
        .to_string()
    }
}
