use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use citybeat_core::{CityBeatError, Source, TicketingAdapter};
use mockito::{Matcher, Server};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

const TWO_EVENTS: &str = r#"{
  "pagination": { "object_count": 3 },
  "events": [
    {
      "name": { "text": "Warriors Summer League" },
      "start": { "local": "2024-07-06T18:30:00", "timezone": "America/Los_Angeles" },
      "url": "https://www.eventbrite.com/e/111",
      "description": { "text": "Hoops" },
      "venue": { "address": { "localized_address_display": "1 Warriors Way, San Francisco, CA" } }
    },
    {
      "name": { "text": null },
      "start": { "local": "2024-07-07T10:00:00" }
    },
    {
      "name": { "text": "Outdoor Yoga" },
      "start": { "local": "2024-07-07T08:00:00" },
      "url": "https://www.eventbrite.com/e/222",
      "venue": null
    }
  ]
}"#;

#[tokio::test]
async fn fetches_and_maps_events() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/events/search/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("location.address".into(), "San Francisco".into()),
            Matcher::UrlEncoded("sort_by".into(), "date".into()),
            Matcher::UrlEncoded("expand".into(), "venue".into()),
            Matcher::UrlEncoded("start_date.range_start".into(), "2024-07-01T09:30:00".into()),
        ]))
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_EVENTS)
        .create_async()
        .await;

    let adapter = TicketingAdapter::new(&server.url(), "San Francisco")
        .with_token(Some("secret-token".to_string()));
    let records = adapter.fetch(now()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 2, "untitled event should be dropped");

    let first = &records[0];
    assert_eq!(first.title(), "Warriors Summer League");
    assert_eq!(first.date(), NaiveDate::from_ymd_opt(2024, 7, 6));
    assert_eq!(first.time(), "18:30");
    assert_eq!(first.location(), "1 Warriors Way, San Francisco, CA");
    assert_eq!(first.source(), Source::TicketingApi);
    assert_eq!(first.tags().iter().collect::<Vec<_>>(), vec!["eventbrite"]);

    let second = &records[1];
    assert_eq!(second.title(), "Outdoor Yoga");
    assert_eq!(second.location(), "");
    assert_eq!(second.description(), "");
}

#[tokio::test]
async fn empty_listing_is_not_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/events/search/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"events": []}"#)
        .create_async()
        .await;

    let adapter = TicketingAdapter::new(&server.url(), "San Francisco");
    assert!(adapter.fetch(now()).await.unwrap().is_empty());
}

#[tokio::test]
async fn server_error_is_source_unreachable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/events/search/")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let adapter = TicketingAdapter::new(&server.url(), "San Francisco");
    let err = adapter.fetch(now()).await.unwrap_err();

    match err {
        CityBeatError::SourceUnreachable { source_name, reason } => {
            assert_eq!(source_name, "ticketing-api");
            assert!(reason.contains("500"), "reason was: {reason}");
        }
        other => panic!("Expected SourceUnreachable, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_body_is_source_unreachable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/events/search/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let adapter = TicketingAdapter::new(&server.url(), "San Francisco");
    let err = adapter.fetch(now()).await.unwrap_err();
    assert!(matches!(err, CityBeatError::SourceUnreachable { .. }));
}

#[tokio::test]
async fn refused_connection_is_source_unreachable() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let adapter = TicketingAdapter::new(&format!("http://127.0.0.1:{port}"), "San Francisco");
    let err = adapter.fetch(now()).await.unwrap_err();
    assert!(matches!(err, CityBeatError::SourceUnreachable { .. }));
}

#[tokio::test]
async fn silent_server_times_out() {
    // Accepts the connection (via the backlog) but never answers
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let adapter = TicketingAdapter::new(&format!("http://127.0.0.1:{port}"), "San Francisco")
        .with_timeout(Duration::from_millis(200));
    let err = adapter.fetch(now()).await.unwrap_err();

    assert!(matches!(err, CityBeatError::SourceTimeout(_)));
    drop(listener);
}
