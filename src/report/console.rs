// Human-readable stdout dump of tables and summaries
use crate::config::{HEAD_ROWS, ROLLING_CORRELATION_TAIL, ROLLING_VOLATILITY_TAIL};
use crate::model::{AnalysisReport, InstrumentSummary, Instrument, SeriesTable};
use crate::utils::format_value;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

/// Prints the run's results in a fixed narrative order.
pub fn print_report(prices: &SeriesTable, returns: &SeriesTable, report: &AnalysisReport) {
    for section in render_sections(prices, returns, report) {
        println!("\n=== {} ===", section.0);
        println!("{}", section.1);
    }
}

/// Titled sections in print order.
pub fn render_sections(
    prices: &SeriesTable,
    returns: &SeriesTable,
    report: &AnalysisReport,
) -> Vec<(&'static str, String)> {
    vec![
        ("Price head", head_table(prices, HEAD_ROWS).to_string()),
        ("Return head", head_table(returns, HEAD_ROWS).to_string()),
        ("Correlation (returns)", correlation_table(report).to_string()),
        ("Rolling Corr (GOLD vs DXY) last 10", rolling_correlation_table(report).to_string()),
        ("Rolling Vol (30d) last 5", rolling_volatility_table(report).to_string()),
        ("Annualized Return", summary_table(&report.summaries, |s| s.annual_return).to_string()),
        ("Annualized Volatility", summary_table(&report.summaries, |s| s.annual_volatility).to_string()),
        ("Sharpe Ratio", summary_table(&report.summaries, |s| s.sharpe_ratio).to_string()),
        ("Maximum Drawdown", summary_table(&report.summaries, |s| s.max_drawdown).to_string()),
        ("Regime (GOLD 30d vol vs median)", regime_table(report).to_string()),
    ]
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn instrument_header(first: &str) -> Vec<String> {
    std::iter::once(first.to_string())
        .chain(Instrument::ALL.iter().map(|i| i.label().to_string()))
        .collect()
}

fn head_table(data: &SeriesTable, n: usize) -> Table {
    let mut table = new_table(instrument_header("Date"));
    for (date, values) in data.rows().take(n) {
        let mut row = vec![date.to_string()];
        row.extend(values.iter().map(|v| format_value(Some(*v))));
        table.add_row(row);
    }
    table
}

fn correlation_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(instrument_header(""));
    for a in Instrument::ALL {
        let mut row = vec![a.label().to_string()];
        row.extend(Instrument::ALL.iter().map(|&b| format_value(Some(report.correlation.get(a, b)))));
        table.add_row(row);
    }
    table
}

fn rolling_correlation_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(vec!["Date".to_string(), "GOLD~DXY".to_string()]);
    for (date, value) in report.rolling_correlation.tail_defined(ROLLING_CORRELATION_TAIL) {
        table.add_row(vec![date.to_string(), format_value(Some(value))]);
    }
    table
}

fn rolling_volatility_table(report: &AnalysisReport) -> Table {
    let mut table = new_table(instrument_header("Date"));
    let gold = report.rolling_volatility_of(Instrument::Gold);
    let skip = gold.dates.len().saturating_sub(ROLLING_VOLATILITY_TAIL);

    for (i, date) in gold.dates.iter().enumerate().skip(skip) {
        let mut row = vec![date.to_string()];
        row.extend(
            Instrument::ALL
                .iter()
                .map(|&inst| format_value(report.rolling_volatility_of(inst).values.get(i).copied().flatten())),
        );
        table.add_row(row);
    }
    table
}

fn summary_table(summaries: &[InstrumentSummary], pick: impl Fn(&InstrumentSummary) -> f64) -> Table {
    let mut table = new_table(vec!["Instrument".to_string(), "Value".to_string()]);
    for summary in summaries {
        table.add_row(vec![summary.instrument.label().to_string(), format_value(Some(pick(summary)))]);
    }
    table
}

fn regime_table(report: &AnalysisReport) -> Table {
    let regime = &report.regime;
    let mut table = new_table(vec![
        "Regime".to_string(),
        "Days".to_string(),
        "Value".to_string(),
    ]);
    table.add_row(vec![
        "High vol".to_string(),
        regime.high_vol_dates.len().to_string(),
        format_value(Some(regime.high_vol_mean_return)),
    ]);
    table.add_row(vec![
        "Low vol".to_string(),
        regime.low_vol_dates.len().to_string(),
        format_value(Some(regime.low_vol_mean_return)),
    ]);
    table.add_row(vec![
        "Median vol".to_string(),
        String::new(),
        format_value(Some(regime.threshold)),
    ]);
    table
}
