// Yahoo chart payload parsing
use crate::model::{Instrument, ParserError, PriceSeries};
use crate::utils::timestamp_to_date;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorBody {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Extracts daily closes from a `/v8/finance/chart` response.
///
/// Adjusted closes are preferred when present. Bars with a null close are skipped,
/// and an empty chart yields an empty series rather than an error.
pub fn parse_chart(instrument: Instrument, body: &str) -> Result<PriceSeries, ParserError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(err) = envelope.chart.error {
        let message = match (err.code, err.description) {
            (Some(code), Some(desc)) => format!("{}: {}", code, desc),
            (Some(code), None) => code,
            (None, Some(desc)) => desc,
            (None, None) => "unknown error".to_string(),
        };
        return Err(ParserError::SourceReported(message));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ParserError::SourceReported("empty result".to_string()))?;

    if result.timestamp.is_empty() {
        return Ok(PriceSeries::from_points(instrument, Vec::new()));
    }

    let gmt_offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let indicators = result.indicators.ok_or(ParserError::MissingField("indicators"))?;

    let closes = match indicators.adjclose.into_iter().next() {
        Some(adj) if !adj.adjclose.is_empty() => adj.adjclose,
        _ => indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .ok_or(ParserError::MissingField("indicators.quote"))?,
    };

    let points = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| Some((timestamp_to_date(ts, gmt_offset)?, close?)));

    Ok(PriceSeries::from_points(instrument, points))
}
