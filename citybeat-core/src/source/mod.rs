//! Source adapters: each turns one native listing format into `EventRecord`s.

pub mod manual;
pub mod ticketing;

use chrono::NaiveDateTime;

use crate::error::CityBeatResult;
use crate::record::{EventRecord, Source};

pub use manual::ManualTextAdapter;
pub use ticketing::TicketingAdapter;

pub enum SourceAdapter {
    Ticketing(TicketingAdapter),
    Manual(ManualTextAdapter),
}

impl SourceAdapter {
    pub fn source(&self) -> Source {
        match self {
            SourceAdapter::Ticketing(_) => Source::TicketingApi,
            SourceAdapter::Manual(_) => Source::Manual,
        }
    }

    /// Produce this source's records. Only the ticketing variant can fail (source
    /// unreachable or timed out); zero records is a normal outcome for both.
    pub async fn collect(&self, now: NaiveDateTime) -> CityBeatResult<Vec<EventRecord>> {
        match self {
            SourceAdapter::Ticketing(adapter) => adapter.fetch(now).await,
            SourceAdapter::Manual(adapter) => Ok(adapter.records()),
        }
    }
}
