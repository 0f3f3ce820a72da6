//! Adapter for the structured ticketing API (Eventbrite's event search).
//!
//! One request per call, bounded by a timeout. The whole call fails when the API can't be
//! reached or answers with something that isn't an event listing; individual events with
//! missing or oddly-typed fields degrade to empty strings instead.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::CityBeatConfig;
use crate::error::{CityBeatError, CityBeatResult};
use crate::record::{EventRecord, Source};

pub const DEFAULT_BASE_URL: &str = "https://www.eventbriteapi.com/v3";
pub const DEFAULT_PROVENANCE_TAG: &str = "eventbrite";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct TicketingAdapter {
    client: reqwest::Client,
    base_url: String,
    city: String,
    token: Option<String>,
    request_timeout: Duration,
    provenance_tag: String,
}

impl TicketingAdapter {
    pub fn new(base_url: &str, city: &str) -> Self {
        TicketingAdapter {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            city: city.to_string(),
            token: None,
            request_timeout: DEFAULT_TIMEOUT,
            provenance_tag: DEFAULT_PROVENANCE_TAG.to_string(),
        }
    }

    pub fn from_config(config: &CityBeatConfig) -> Self {
        TicketingAdapter::new(&config.api_base_url, &config.city)
            .with_token(config.api_token.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
            .with_provenance_tag(&config.provenance_tag)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_provenance_tag(mut self, tag: &str) -> Self {
        self.provenance_tag = tag.to_string();
        self
    }

    /// Query events in the configured city starting after `now`.
    pub async fn fetch(&self, now: NaiveDateTime) -> CityBeatResult<Vec<EventRecord>> {
        let body = timeout(self.request_timeout, self.fetch_raw(now))
            .await
            .map_err(|_| CityBeatError::SourceTimeout(self.request_timeout.as_secs()))??;

        let records = records_from_response(&body, &self.provenance_tag)?;
        info!(city = %self.city, count = records.len(), "fetched ticketing events");
        Ok(records)
    }

    async fn fetch_raw(&self, now: NaiveDateTime) -> CityBeatResult<Value> {
        let url = format!("{}/events/search/", self.base_url);
        let range_start = now.format("%Y-%m-%dT%H:%M:%S").to_string();
        debug!(%url, city = %self.city, %range_start, "querying ticketing API");

        let mut request = self.client.get(&url).query(&[
            ("location.address", self.city.as_str()),
            ("sort_by", "date"),
            ("expand", "venue"),
            ("start_date.range_start", range_start.as_str()),
        ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(unreachable_err)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(unreachable_err(format!("HTTP {}: {}", status, error_text.trim())));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| unreachable_err(format!("response is not valid JSON: {e}")))
    }
}

fn unreachable_err(reason: impl ToString) -> CityBeatError {
    CityBeatError::unreachable(Source::TicketingApi.as_str(), reason)
}

/// Convert a search response body into records.
///
/// A body that isn't a JSON object is a protocol failure. A missing `events` array is an
/// empty listing. Events without a usable title are dropped.
pub fn records_from_response(
    body: &Value,
    provenance_tag: &str,
) -> CityBeatResult<Vec<EventRecord>> {
    let Some(object) = body.as_object() else {
        return Err(unreachable_err("response body is not a JSON object"));
    };

    let Some(events) = object.get("events").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let records = events
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let record = record_from_raw(raw, provenance_tag);
            if record.is_none() {
                warn!(index, "dropping ticketing event without a title");
            }
            record
        })
        .collect();

    Ok(records)
}

fn record_from_raw(raw: &Value, provenance_tag: &str) -> Option<EventRecord> {
    let (date, time) = split_local_start(text_at(raw, "/start/local"));

    let record = EventRecord::new(text_at(raw, "/name/text"), Source::TicketingApi)
        .ok()?
        .with_date(date)
        .with_time(time)
        .with_location(text_at(raw, "/venue/address/localized_address_display"))
        .with_tags([provenance_tag])
        .with_link(text_at(raw, "/url"))
        .with_description(text_at(raw, "/description/text"));

    Some(record)
}

/// "2024-07-05T19:30:00" → (2024-07-05, "19:30"). The time is the first five characters
/// after the `T`, without timezone conversion.
fn split_local_start(local: &str) -> (Option<NaiveDate>, String) {
    let (date_part, time_part) = local.split_once('T').unwrap_or((local, ""));
    let date = NaiveDate::parse_from_str(date_part.trim(), "%Y-%m-%d").ok();
    let time = time_part.chars().take(5).collect();
    (date, time)
}

/// String at a JSON pointer, or "" when absent or not a string.
fn text_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}
