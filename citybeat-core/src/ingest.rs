//! One ingestion run: collect from every adapter in turn, then store the results.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::error::{CityBeatError, CityBeatResult};
use crate::record::{EventRecord, Source};
use crate::source::SourceAdapter;
use crate::store::{EventStore, upsert_by_identity};

#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Abort the run on the first unreachable source instead of skipping it.
    pub strict: bool,
    /// Skip records whose identity is already stored.
    pub dedupe: bool,
}

/// A source that could not be asked, as opposed to one that had no events.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: Source,
    pub error: CityBeatError,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub collected: usize,
    pub stored: usize,
    pub failures: Vec<SourceFailure>,
}

/// Collect from `adapters` in order. Non-strict runs record failing sources and keep going.
pub async fn collect_all(
    adapters: &[SourceAdapter],
    now: NaiveDateTime,
    strict: bool,
) -> CityBeatResult<(Vec<EventRecord>, Vec<SourceFailure>)> {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for adapter in adapters {
        match adapter.collect(now).await {
            Ok(batch) => {
                info!(source = %adapter.source(), count = batch.len(), "collected records");
                records.extend(batch);
            }
            Err(error) if strict => return Err(error),
            Err(error) => {
                warn!(source = %adapter.source(), %error, "skipping source");
                failures.push(SourceFailure {
                    source: adapter.source(),
                    error,
                });
            }
        }
    }

    Ok((records, failures))
}

pub async fn ingest<S: EventStore + ?Sized>(
    adapters: &[SourceAdapter],
    store: &mut S,
    now: NaiveDateTime,
    options: IngestOptions,
) -> CityBeatResult<IngestReport> {
    let (records, failures) = collect_all(adapters, now, options.strict).await?;

    let stored = if options.dedupe {
        upsert_by_identity(store, &records)?
    } else {
        store.append(&records)?;
        records.len()
    };

    Ok(IngestReport {
        collected: records.len(),
        stored,
        failures,
    })
}
