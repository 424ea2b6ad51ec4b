// PNG charts: price level, rolling correlation, rolling volatility overlay
use crate::config::{GOLD_PRICE_CHART, ROLLING_CORRELATION_CHART, ROLLING_VOLATILITY_CHART};
use crate::model::{AnalysisReport, ChartError, Instrument, PriceTable, RollingSeries};
use chrono::NaiveDate;
use plotters::prelude::*;
use plotters::style::register_font;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const FONT_FAMILY: &str = "sans-serif";

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

struct Line<'a> {
    label: &'a str,
    color: RGBColor,
    points: Vec<(f64, f64)>,
}

struct ChartLayout<'a> {
    name: &'static str,
    title: &'a str,
    y_desc: &'a str,
    dates: &'a [NaiveDate],
    lines: Vec<Line<'a>>,
    reference: Option<f64>,
}

fn color_of(instrument: Instrument) -> RGBColor {
    match instrument {
        Instrument::Gold => RGBColor(212, 160, 23),
        Instrument::Dxy => RGBColor(31, 119, 180),
        Instrument::Us10y => RGBColor(214, 39, 40),
    }
}

/// Renders the three charts under `dir`, creating it if needed.
pub fn render_charts(dir: &Path, prices: &PriceTable, report: &AnalysisReport) -> Result<Vec<PathBuf>, ChartError> {
    fs::create_dir_all(dir)?;

    let gold_points = prices
        .column(Instrument::Gold)
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, *p))
        .collect();
    let gold_path = dir.join(GOLD_PRICE_CHART);
    draw_line_chart(
        &gold_path,
        ChartLayout {
            name: GOLD_PRICE_CHART,
            title: "Gold Price",
            y_desc: "Close",
            dates: prices.dates(),
            lines: vec![Line {
                label: "Gold",
                color: color_of(Instrument::Gold),
                points: gold_points,
            }],
            reference: None,
        },
    )?;

    let corr = &report.rolling_correlation;
    let corr_title = format!("Rolling {}-day Correlation: GOLD vs DXY", corr.window);
    let vol_title = format!(
        "Rolling {}-day Volatility",
        report.rolling_volatility_of(Instrument::Gold).window
    );
    let corr_path = dir.join(ROLLING_CORRELATION_CHART);
    draw_line_chart(
        &corr_path,
        ChartLayout {
            name: ROLLING_CORRELATION_CHART,
            title: &corr_title,
            y_desc: "Correlation",
            dates: &corr.dates,
            lines: vec![Line {
                label: "GOLD~DXY",
                color: color_of(Instrument::Dxy),
                points: indexed_points(corr),
            }],
            reference: Some(0.0),
        },
    )?;

    let vol_path = dir.join(ROLLING_VOLATILITY_CHART);
    draw_line_chart(
        &vol_path,
        ChartLayout {
            name: ROLLING_VOLATILITY_CHART,
            title: &vol_title,
            y_desc: "Std of daily returns",
            dates: &report.rolling_volatility_of(Instrument::Gold).dates,
            lines: Instrument::ALL
                .iter()
                .map(|&instrument| Line {
                    label: instrument.label(),
                    color: color_of(instrument),
                    points: indexed_points(report.rolling_volatility_of(instrument)),
                })
                .collect(),
            reference: None,
        },
    )?;

    Ok(vec![gold_path, corr_path, vol_path])
}

fn indexed_points(series: &RollingSeries) -> Vec<(f64, f64)> {
    series
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|v| v.is_finite()).map(|v| (i as f64, v)))
        .collect()
}

fn draw_line_chart(path: &Path, layout: ChartLayout<'_>) -> Result<(), ChartError> {
    let name = layout.name;
    let with_text = fonts_available();

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(name, e))?;

    let x_max = layout.dates.len().saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = value_range(
        layout.lines
            .iter()
            .flat_map(|line| line.points.iter().map(|p| p.1))
            .chain(layout.reference),
    );

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if with_text {
        builder
            .caption(layout.title, (FONT_FAMILY, 28))
            .x_label_area_size(40)
            .y_label_area_size(70);
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(|e| render_error(name, e))?;

    if with_text {
        let dates = layout.dates;
        let label_date = |x: &f64| {
            dates
                .get(x.round() as usize)
                .map(|d| d.format("%Y-%m").to_string())
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&label_date)
            .y_desc(layout.y_desc)
            .draw()
            .map_err(|e| render_error(name, e))?;
    }

    if let Some(level) = layout.reference {
        chart
            .draw_series(LineSeries::new(vec![(0.0, level), (x_max, level)], BLACK.mix(0.4)))
            .map_err(|e| render_error(name, e))?;
    }

    for line in &layout.lines {
        let color = line.color;
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))
            .map_err(|e| render_error(name, e))?
            .label(line.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if with_text {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| render_error(name, e))?;
    }

    root.present().map_err(|e| render_error(name, e))?;
    info!("Saved chart {}", path.display());
    Ok(())
}

/// Finite min/max padded by 5%, with a fallback for empty or flat data.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { min.abs().max(1.0) * 0.05 };
    (min - pad, max + pad)
}

/// Registers the first readable system font. Text is skipped when none is found.
fn fonts_available() -> bool {
    *FONT_READY.get_or_init(|| {
        for candidate in FONT_CANDIDATES {
            let Ok(bytes) = fs::read(candidate) else {
                continue;
            };
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
                debug!("Chart font: {}", candidate);
                return true;
            }
        }
        warn!("No usable TrueType font found, charts are rendered without text");
        false
    })
}

fn render_error(chart: &'static str, err: impl Display) -> ChartError {
    ChartError::Render {
        chart,
        message: err.to_string(),
    }
}
