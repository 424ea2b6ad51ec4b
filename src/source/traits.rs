use crate::model::{Instrument, PriceSeries, SourceError};
use chrono::NaiveDate;

/// Daily closing prices for one instrument between two dates, inclusive.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_closes(
        &self,
        instrument: Instrument,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError>;
}
