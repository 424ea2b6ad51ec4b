use crate::config::AppConfig;
use crate::model::{Instrument, ParserError, PriceSeries, SourceError};
use crate::parser::yahoo_chart::parse_chart;
use crate::source::traits::PriceSource;
use crate::utils::to_unix_timestamp;
use chrono::NaiveDate;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use urlencoding::encode;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub struct YahooSource {
    client: Client,
    base_url: String,
}

impl YahooSource {
    pub fn new(config: &AppConfig) -> Result<Self, SourceError> {
        Self::with_base_url(config, CHART_URL)
    }

    /// Same client setup, pointed at another chart endpoint.
    pub fn with_base_url(config: &AppConfig, base_url: &str) -> Result<Self, SourceError> {
        let client = client_builder(config).build().map_err(|e| SourceError::Http {
            symbol: "-",
            message: e.to_string(),
        })?;
        Ok(Self::from_parts(client, base_url))
    }

    fn from_parts(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, instrument: Instrument) -> String {
        // Symbols such as ^TNX and GC=F must be escaped in the path
        format!("{}/{}", self.base_url, encode(instrument.symbol()))
    }

    async fn fetch_raw(
        &self,
        instrument: Instrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, SourceError> {
        let symbol = instrument.symbol();
        let url = self.build_url(instrument);
        // period2 is exclusive, so ask for the whole end day
        let period1 = to_unix_timestamp(start);
        let period2 = to_unix_timestamp(end) + 86_400;

        debug!("GET {} period1={} period2={}", url, period1, period2);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| classify(instrument, e))?;

        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse {
                symbol,
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| classify(instrument, e))
    }
}

fn client_builder(config: &AppConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_seconds))
}

fn classify(instrument: Instrument, err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::DataSourceTimeout {
            instrument,
            symbol: instrument.symbol(),
        }
    } else {
        SourceError::Http {
            symbol: instrument.symbol(),
            message: err.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl PriceSource for YahooSource {
    async fn fetch_closes(
        &self,
        instrument: Instrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError> {
        let body = self.fetch_raw(instrument, start, end).await?;
        match parse_chart(instrument, &body) {
            Ok(series) => Ok(series),
            Err(ParserError::SourceReported(message)) => {
                warn!("{} ({}): source reported: {}", instrument, instrument.symbol(), message);
                Err(SourceError::DataUnavailable {
                    instrument,
                    symbol: instrument.symbol(),
                })
            }
            Err(source) => Err(SourceError::Parse {
                symbol: instrument.symbol(),
                source,
            }),
        }
    }
}
