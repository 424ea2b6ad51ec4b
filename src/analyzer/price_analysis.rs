use crate::analyzer::performance::summarize;
use crate::analyzer::regime::regime_split;
use crate::analyzer::rolling::{rolling_correlation, rolling_volatility};
use crate::analyzer::statistics::pearson;
use crate::config::{ROLLING_CORRELATION_WINDOW, ROLLING_VOLATILITY_WINDOW};
use crate::model::{AnalysisReport, CorrelationMatrix, INSTRUMENT_COUNT, Instrument, ReturnTable};
use tracing::debug;

/// Trait defining the interface for a return-table analyzer.
pub trait Analyzer {
    fn correlation_matrix(&self, returns: &ReturnTable) -> CorrelationMatrix;
    fn analyze(&self, returns: &ReturnTable) -> AnalysisReport;
}

/// Computes the fixed statistics battery over a return table.
pub struct AnalyzerImpl {
    correlation_window: usize,
    volatility_window: usize,
}

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self {
            correlation_window: ROLLING_CORRELATION_WINDOW,
            volatility_window: ROLLING_VOLATILITY_WINDOW,
        }
    }
}

impl Default for AnalyzerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for AnalyzerImpl {
    /// Pairwise Pearson correlation over the full table. Each pair is computed
    /// once and mirrored, so the matrix is exactly symmetric.
    fn correlation_matrix(&self, returns: &ReturnTable) -> CorrelationMatrix {
        let mut values = [[f64::NAN; INSTRUMENT_COUNT]; INSTRUMENT_COUNT];
        for a in Instrument::ALL {
            for b in Instrument::ALL.into_iter().filter(|b| b.index() >= a.index()) {
                let r = pearson(returns.column(a), returns.column(b));
                values[a.index()][b.index()] = r;
                values[b.index()][a.index()] = r;
            }
        }
        CorrelationMatrix::from_values(values)
    }

    fn analyze(&self, returns: &ReturnTable) -> AnalysisReport {
        let dates = returns.dates();
        let gold = returns.column(Instrument::Gold);

        let correlation = self.correlation_matrix(returns);
        let rolling_corr = rolling_correlation(
            dates,
            gold,
            returns.column(Instrument::Dxy),
            self.correlation_window,
        );
        let rolling_vol = Instrument::ALL
            .map(|instrument| rolling_volatility(dates, returns.column(instrument), self.volatility_window));
        let summaries = Instrument::ALL
            .iter()
            .map(|&instrument| summarize(instrument, returns.column(instrument)))
            .collect();
        let regime = regime_split(&rolling_vol[Instrument::Gold.index()], dates, gold);

        debug!(
            "Analysis done: {} rolling correlations, {} high-vol / {} low-vol dates",
            rolling_corr.defined_count(),
            regime.high_vol_dates.len(),
            regime.low_vol_dates.len()
        );

        AnalysisReport {
            correlation,
            rolling_correlation: rolling_corr,
            rolling_volatility: rolling_vol,
            summaries,
            regime,
        }
    }
}
