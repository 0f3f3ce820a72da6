//! Durable collection of records.
//!
//! The store is append-only and keeps insertion order. It does not deduplicate;
//! [`upsert_by_identity`] layers identity-based skipping on top for callers that want
//! repeat ingestion runs to be idempotent.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{CityBeatError, CityBeatResult};
use crate::record::EventRecord;

pub trait EventStore {
    fn append(&mut self, records: &[EventRecord]) -> CityBeatResult<()>;
    fn read_all(&self) -> CityBeatResult<Vec<EventRecord>>;
}

/// Append only the records whose identity isn't stored yet (or seen earlier in the same
/// batch). Returns how many were appended.
pub fn upsert_by_identity<S: EventStore + ?Sized>(
    store: &mut S,
    records: &[EventRecord],
) -> CityBeatResult<usize> {
    let mut known: HashSet<String> = store.read_all()?.iter().map(EventRecord::identity).collect();

    let fresh: Vec<EventRecord> = records
        .iter()
        .filter(|r| known.insert(r.identity()))
        .cloned()
        .collect();

    debug!(
        offered = records.len(),
        appended = fresh.len(),
        "upserting records by identity"
    );

    store.append(&fresh)?;
    Ok(fresh.len())
}

/// One JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonlStore { path: path.into() }
    }
}

impl EventStore for JsonlStore {
    fn append(&mut self, records: &[EventRecord]) -> CityBeatResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CityBeatError::Store(format!("Could not create {}: {e}", parent.display()))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                CityBeatError::Store(format!("Could not open {}: {e}", self.path.display()))
            })?;

        let mut writer = BufWriter::new(file);
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|e| CityBeatError::Serialization(e.to_string()))?;
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;

        debug!(path = %self.path.display(), count = records.len(), "appended records");
        Ok(())
    }

    /// A missing file is an empty store. Lines that don't deserialize are skipped.
    fn read_all(&self) -> CityBeatResult<Vec<EventRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CityBeatError::Store(format!(
                    "Could not read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let records = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match serde_json::from_str::<EventRecord>(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "skipping unreadable record"
                    );
                    None
                }
            })
            .collect();

        Ok(records)
    }
}

/// In-memory store, for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<EventRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EventStore for MemoryStore {
    fn append(&mut self, records: &[EventRecord]) -> CityBeatResult<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn read_all(&self) -> CityBeatResult<Vec<EventRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Source;
    use chrono::NaiveDate;

    fn event(title: &str, day: u32) -> EventRecord {
        EventRecord::new(title, Source::Manual)
            .unwrap()
            .with_date(NaiveDate::from_ymd_opt(2024, 7, day))
            .with_location("Somewhere")
            .with_tags(["culture"])
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("events.jsonl"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn append_then_read_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(dir.path().join("nested").join("events.jsonl"));

        store.append(&[event("First", 5), event("Second", 1)]).unwrap();
        store.append(&[event("Third", 3)]).unwrap();

        let titles: Vec<_> = store
            .read_all()
            .unwrap()
            .iter()
            .map(|r| r.title().to_string())
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn append_does_not_deduplicate() {
        let mut store = MemoryStore::new();
        store.append(&[event("Same", 5)]).unwrap();
        store.append(&[event("Same", 5)]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unreadable_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let good = serde_json::to_string(&event("Good", 5)).unwrap();
        std::fs::write(
            &path,
            format!("{good}\nnot json\n\n{{\"title\":\"\",\"source\":\"manual\"}}\n"),
        )
        .unwrap();

        let records = JsonlStore::new(&path).read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title(), "Good");
    }

    #[test]
    fn stored_records_roundtrip_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(dir.path().join("events.jsonl"));
        let original = event("Night Market", 5)
            .with_time("18:00")
            .with_link("https://example.com")
            .with_description("Food stalls");

        store.append(std::slice::from_ref(&original)).unwrap();
        assert_eq!(store.read_all().unwrap(), vec![original]);
    }

    #[test]
    fn upsert_skips_known_identities() {
        let mut store = MemoryStore::new();
        store.append(&[event("Night Market", 5)]).unwrap();

        let appended = upsert_by_identity(
            &mut store,
            &[
                event("night  market", 5),
                event("Coffee Festival", 10),
                event("Coffee Festival", 10),
            ],
        )
        .unwrap();

        assert_eq!(appended, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut store = MemoryStore::new();
        let batch = [event("A", 1), event("B", 2)];

        assert_eq!(upsert_by_identity(&mut store, &batch).unwrap(), 2);
        assert_eq!(upsert_by_identity(&mut store, &batch).unwrap(), 0);
        assert_eq!(store.len(), 2);
    }
}
