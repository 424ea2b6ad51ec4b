use crate::analyzer::statistics::{mean, sample_std};
use crate::config::TRADING_DAYS_PER_YEAR;
use crate::model::{Instrument, InstrumentSummary};

// NaN returns (from a zero price) are skipped by every metric here.

pub fn annualized_return(returns: &[f64]) -> f64 {
    mean(returns) * TRADING_DAYS_PER_YEAR
}

pub fn annualized_volatility(returns: &[f64]) -> f64 {
    sample_std(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Zero risk-free rate. Zero volatility follows IEEE division (inf or NaN).
pub fn sharpe_ratio(annual_return: f64, annual_volatility: f64) -> f64 {
    annual_return / annual_volatility
}

/// Most negative decline of the compounded wealth curve from its running peak.
/// Always <= 0; exactly 0 for a curve that never falls.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut wealth = 1.0;
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0f64;

    for r in returns.iter().filter(|r| !r.is_nan()) {
        wealth *= 1.0 + r;
        peak = peak.max(wealth);
        let drawdown = (wealth - peak) / peak;
        if drawdown < worst {
            worst = drawdown;
        }
    }

    worst
}

pub fn summarize(instrument: Instrument, returns: &[f64]) -> InstrumentSummary {
    let annual_return = annualized_return(returns);
    let annual_volatility = annualized_volatility(returns);

    InstrumentSummary {
        instrument,
        annual_return,
        annual_volatility,
        sharpe_ratio: sharpe_ratio(annual_return, annual_volatility),
        max_drawdown: max_drawdown(returns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawdown_of_rise_fall_recover() {
        // wealth: 1.1, 0.88, 0.968 -> peak 1.1, worst (0.88 - 1.1) / 1.1 = -0.2
        let dd = max_drawdown(&[0.1, -0.2, 0.1]);
        assert!((dd + 0.2).abs() < 1e-12);
    }

    #[test]
    fn drawdown_curve_starts_at_first_compounded_point() {
        let dd = max_drawdown(&[-0.5, 0.0]);
        assert_eq!(dd, 0.0);
        let dd = max_drawdown(&[0.0, -0.5]);
        assert!((dd + 0.5).abs() < 1e-12);
    }

    #[test]
    fn monotone_curve_has_zero_drawdown() {
        assert_eq!(max_drawdown(&[0.01, 0.0, 0.02, 0.03]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn annualization_and_sharpe() {
        let returns = [0.01, -0.005, 0.002, 0.003];
        let summary = summarize(Instrument::Gold, &returns);
        assert!((summary.annual_return - mean(&returns) * 252.0).abs() < 1e-12);
        assert!((summary.annual_volatility - sample_std(&returns) * 252f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.sharpe_ratio, summary.annual_return / summary.annual_volatility);
    }

    #[test]
    fn nan_return_is_skipped_consistently() {
        let with_gap = [0.01, f64::NAN, -0.02, 0.005];
        let without = [0.01, -0.02, 0.005];
        assert_eq!(summarize(Instrument::Gold, &with_gap), summarize(Instrument::Gold, &without));
        assert!(summarize(Instrument::Gold, &with_gap).sharpe_ratio.is_finite());
    }

    #[test]
    fn zero_volatility_sharpe_is_not_finite() {
        let summary = summarize(Instrument::Dxy, &[0.0, 0.0, 0.0]);
        assert_eq!(summary.annual_volatility, 0.0);
        assert!(summary.sharpe_ratio.is_nan());
        assert!(sharpe_ratio(0.0, 0.0).is_nan());
        assert_eq!(sharpe_ratio(0.5, 0.0), f64::INFINITY);
    }
}
