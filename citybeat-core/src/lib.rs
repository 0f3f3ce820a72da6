//! Core library for citybeat.
//!
//! Listings arrive from a ticketing API and from hand-pasted text, are normalized into
//! [`EventRecord`]s, appended to an [`EventStore`], and queried back by date window and
//! tag through the [`FilterEngine`].

pub mod classify;
pub mod config;
pub mod date_phrase;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod record;
pub mod source;
pub mod store;

pub use classify::TagClassifier;
pub use config::CityBeatConfig;
pub use error::{CityBeatError, CityBeatResult};
pub use filter::{DateWindow, EventQuery, FilterEngine, TagMatch};
pub use record::{EventRecord, Source};
pub use source::{ManualTextAdapter, SourceAdapter, TicketingAdapter};
pub use store::{EventStore, JsonlStore, MemoryStore};
