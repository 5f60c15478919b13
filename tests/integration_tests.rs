//! End-to-end tests for the relay acquisition pipeline
//!
//! These run the real stack (reqwest transport, TCP probe) against loopback
//! listeners: a canned HTTP directory server and a plain TCP listener
//! standing in for a relay.

use relayscout::directory::DirectoryFetcher;
use relayscout::filter::RelayFilter;
use relayscout::probe::TcpProbe;
use relayscout::{Config, Error, Pipeline};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal HTTP server answering every request with the same canned
/// response. Good enough for a client that sends one GET per connection.
async fn spawn_http_server(status: u16, body: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Loopback listener standing in for a reachable relay port.
async fn spawn_relay_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            drop(socket);
        }
    });

    addr
}

fn config_for(directory_addr: SocketAddr, count: usize) -> Config {
    Config {
        directory_url: format!("http://{}/details", directory_addr),
        count,
        fetch_timeout: Duration::from_secs(5),
        probe_timeout: Duration::from_secs(2),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let relay_addr = spawn_relay_listener().await;
    let body = format!(
        r#"{{"relays": [{{"fingerprint": "ABC", "or_addresses": ["{}"]}}]}}"#,
        relay_addr
    );
    let http_addr = spawn_http_server(200, body).await;

    let pipeline = Pipeline::new(config_for(http_addr, 5));
    let output = pipeline.run().await.unwrap();

    assert_eq!(output, format!("{} ABC", relay_addr));
}

#[tokio::test]
async fn test_pipeline_skips_unreachable_relay() {
    // Bind then drop so nothing is listening on the advertised port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = listener.local_addr().unwrap();
    drop(listener);

    let body = format!(
        r#"{{"relays": [{{"fingerprint": "ABC", "or_addresses": ["{}"]}}]}}"#,
        dead_addr
    );
    let http_addr = spawn_http_server(200, body).await;

    let pipeline = Pipeline::new(config_for(http_addr, 5));
    assert_eq!(pipeline.run().await.unwrap(), "");
}

#[tokio::test]
async fn test_pipeline_rejects_denylisted_port() {
    let body = r#"{"relays": [{"fingerprint": "ABC", "or_addresses": ["203.0.113.5:22"]}]}"#;
    let http_addr = spawn_http_server(200, body.to_string()).await;

    let pipeline = Pipeline::new(config_for(http_addr, 5));
    assert_eq!(pipeline.run().await.unwrap(), "");
}

#[tokio::test]
async fn test_pipeline_rejects_ipv6_literal() {
    let body = r#"{"relays": [{"fingerprint": "ABC", "or_addresses": ["[2001:db8::1]:9001"]}]}"#;
    let http_addr = spawn_http_server(200, body.to_string()).await;

    let pipeline = Pipeline::new(config_for(http_addr, 5));
    assert_eq!(pipeline.run().await.unwrap(), "");
}

#[tokio::test]
async fn test_pipeline_bad_status_fails() {
    let http_addr = spawn_http_server(503, String::new()).await;

    let pipeline = Pipeline::new(config_for(http_addr, 5));
    match pipeline.run().await {
        Err(Error::Fetch(msg)) => assert!(msg.contains("server response code is 503")),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pipeline_missing_relays_key_fails() {
    let http_addr = spawn_http_server(200, r#"{"version": "1.0"}"#.to_string()).await;

    let pipeline = Pipeline::new(config_for(http_addr, 5));
    match pipeline.run().await {
        Err(Error::Fetch(msg)) => assert!(msg.contains("relays not found")),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_pipeline_connection_refused_fails() {
    // Reserve a port and release it so the GET is refused
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = listener.local_addr().unwrap();
    drop(listener);

    let pipeline = Pipeline::new(config_for(dead_addr, 5));
    match pipeline.run().await {
        Err(Error::Fetch(msg)) => assert!(msg.contains("server connection error")),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetcher_multiple_relays_all_validated() {
    let relay_a = spawn_relay_listener().await;
    let relay_b = spawn_relay_listener().await;
    let body = format!(
        r#"{{"relays": [
            {{"fingerprint": "AAA", "or_addresses": ["{}"]}},
            {{"fingerprint": "BBB", "or_addresses": ["{}"]}}
        ]}}"#,
        relay_a, relay_b
    );
    let http_addr = spawn_http_server(200, body).await;
    let config = config_for(http_addr, 10);

    let fetcher = DirectoryFetcher::new(&config);
    let directory = fetcher.fetch().await.unwrap();
    assert_eq!(directory.relays.len(), 2);

    let filter = RelayFilter::new(Arc::new(TcpProbe::new(config.probe_timeout)));
    for relay in &directory.relays {
        for address in &relay.or_addresses {
            assert!(filter.accept(address).await, "{} should be accepted", address);
        }
    }
}
