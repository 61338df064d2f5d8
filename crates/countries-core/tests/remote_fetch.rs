#![cfg(feature = "fetch")]

use countries_core::config::Endpoints;
use countries_core::{
    CountrySource, EtlError, Fetch, JsonCache, MemoryConnector, MemoryDatabase, Pipeline,
    RawCountry, RecordSource, RemoteSource, SqlAssets,
};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Canned response for one path.
#[derive(Clone)]
struct Route {
    path: &'static str,
    status: &'static str,
    body: &'static str,
}

const PRIMARY: &str = r#"[
    {"name": {"common": "Chad", "official": "Republic of Chad"}, "capital": ["N'Djamena"], "idd": {"root": "+2", "suffixes": ["35"]}, "population": 16425859},
    {"name": {"common": "Mali"}, "area": 1240192.0}
]"#;

const SECONDARY: &str = r#"[
    {"independent": true, "unMember": true, "startOfWeek": "monday"},
    {"independent": true, "unMember": false, "startOfWeek": "monday"}
]"#;

/// Serves `routes` on 127.0.0.1 until the test process exits.
/// Returns the base URL and a request counter.
fn serve(routes: Vec<Route>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            counter.fetch_add(1, Ordering::SeqCst);
            respond(stream, &routes);
        }
    });
    (base, hits)
}

fn respond(mut stream: TcpStream, routes: &[Route]) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
            break;
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (status, body) = routes
        .iter()
        .find(|r| r.path == path)
        .map(|r| (r.status, r.body))
        .unwrap_or(("404 Not Found", ""));
    write!(
        stream,
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .unwrap();
    stream.flush().unwrap();
}

fn ok(path: &'static str, body: &'static str) -> Route {
    Route {
        path,
        status: "200 OK",
        body,
    }
}

fn remote(base: &str) -> RemoteSource {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    RemoteSource::with_client(
        client,
        Endpoints {
            primary: format!("{base}/primary"),
            secondary: format!("{base}/secondary"),
        },
    )
}

fn assets(dir: &Path) -> SqlAssets {
    let ddl = dir.join("create.sql");
    let dml = dir.join("insert.sql");
    std::fs::write(&ddl, "CREATE TABLE IF NOT EXISTS countries ()").unwrap();
    std::fs::write(&dml, "INSERT INTO countries VALUES ($1)").unwrap();
    SqlAssets::new(ddl, dml)
}

fn labels(records: &[RawCountry]) -> Vec<&str> {
    records.iter().map(RawCountry::label).collect()
}

#[test]
fn fetch_merges_both_endpoints_by_position() {
    let (base, _) = serve(vec![ok("/primary", PRIMARY), ok("/secondary", SECONDARY)]);

    let records = remote(&base).fetch().unwrap();
    assert_eq!(labels(&records), ["Chad", "Mali"]);
    assert_eq!(
        records[1].get("unMember"),
        Some(&serde_json::Value::Bool(false))
    );
    assert_eq!(
        records[0].get("startOfWeek").and_then(|v| v.as_str()),
        Some("monday")
    );
}

#[test]
fn non_array_body_is_invalid_data() {
    let (base, _) = serve(vec![
        ok("/primary", r#"{"status": 400, "message": "Bad Request"}"#),
        ok("/secondary", SECONDARY),
    ]);

    assert!(matches!(
        remote(&base).fetch(),
        Err(EtlError::InvalidData(_))
    ));
}

#[test]
fn error_status_is_a_fetch_failure() {
    let (base, _) = serve(vec![
        ok("/primary", PRIMARY),
        Route {
            path: "/secondary",
            status: "500 Internal Server Error",
            body: "oops",
        },
    ]);

    match remote(&base).fetch() {
        Err(EtlError::Fetch { url, .. }) => assert!(url.ends_with("/secondary")),
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[test]
fn failed_fetch_leaves_no_cache_behind() {
    let dir = tempfile::tempdir().unwrap();
    let (base, _) = serve(vec![ok("/primary", "[1, 2, 3]"), ok("/secondary", "[]")]);
    let source = CountrySource::new(JsonCache::new(dir.path().join("raw.json")), remote(&base));

    assert!(source.load(true).is_empty());
    assert!(!source.cache().path().exists());
}

#[test]
fn unreachable_api_aborts_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let base = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let source = CountrySource::new(JsonCache::new(dir.path().join("raw.json")), remote(&base));
    let pipeline = Pipeline::new(source, MemoryConnector::default(), assets(dir.path()), true);

    assert!(matches!(pipeline.run(), Err(EtlError::SourceUnavailable)));
    assert_eq!(pipeline.connector().attempts(), 0);
}

#[test]
fn second_run_is_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let (base, hits) = serve(vec![ok("/primary", PRIMARY), ok("/secondary", SECONDARY)]);
    let db = MemoryDatabase::new();
    let source = CountrySource::new(JsonCache::new(dir.path().join("raw.json")), remote(&base));
    let pipeline = Pipeline::new(
        source,
        MemoryConnector::new(db.clone()),
        assets(dir.path()),
        true,
    );

    let first = pipeline.run().unwrap();
    assert_eq!(first.fetched, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(pipeline.source().cache().path().exists());

    let second = pipeline.run().unwrap();
    assert_eq!(second.fetched, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    let rows = db.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].calling_codes, "+235");
    assert_eq!(rows[0].capital_cities, "N'Djamena");
    assert_eq!(rows[0].population, 16425859);
    assert_eq!(rows[1].un_member, Some(false));
    assert_eq!(rows[1].capital_cities, "Unknown");
}
