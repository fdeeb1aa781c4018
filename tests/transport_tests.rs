use iw_client::services::iw::transport::ack_from_body;
use iw_client::{Ack, ClientConfig, DesireClient, DesireRequest, IdGenerator, IwError};
use std::error::Error;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

struct Recorded {
    request_line: String,
    body: String,
}

/// Serves one canned `(status, body)` reply per connection, in order, and
/// hands back what each request looked like.
async fn canned_server(replies: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in replies {
            let (mut stream, _) = listener.accept().await.unwrap();
            seen.push(read_request(&mut stream).await);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
        seen
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(stream: &mut TcpStream) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_string();
        let len = head
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        if buf.len() >= end + 4 + len {
            return Recorded {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&buf[end + 4..end + 4 + len]).to_string(),
            };
        }
    }

    Recorded {
        request_line: String::new(),
        body: String::from_utf8_lossy(&buf).to_string(),
    }
}

fn config_for(base: &str) -> ClientConfig {
    ClientConfig::default()
        .with_master_uri(base)
        .with_bind_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn test_http_submit_and_withdraw() {
    let (base, server) = canned_server(vec![
        ("200 OK", "{}"),
        ("200 OK", "{}"),
        ("200 OK", r#"{"accepted":true}"#),
        ("200 OK", ""),
    ])
    .await;

    let client = DesireClient::connect(config_for(&base), Arc::new(IdGenerator::new()))
        .await
        .expect("Canned server answers both probes");

    let id = client
        .submit_desire(DesireRequest::new("explore").with_param("a", 1))
        .await
        .unwrap();
    assert_eq!(id, "iwc_explore_1");

    let ack = client.withdraw_desire(&id).await.unwrap();
    assert!(ack.accepted, "Empty reply body counts as accepted");

    let seen = server.await.unwrap();
    assert!(seen[0].request_line.starts_with("GET /hbba/add_desires "));
    assert!(seen[1].request_line.starts_with("GET /hbba/remove_desires "));
    assert!(seen[2].request_line.starts_with("POST /hbba/add_desires "));
    assert!(seen[3].request_line.starts_with("POST /hbba/remove_desires "));

    let add: Value = serde_json::from_str(&seen[2].body).unwrap();
    let desires = add["desires"].as_array().unwrap();
    assert_eq!(desires.len(), 1);
    assert_eq!(desires[0]["id"], "iwc_explore_1");
    assert_eq!(desires[0]["type"], "explore");
    assert_eq!(desires[0]["intensity"], 1.0);
    assert_eq!(desires[0]["params"], r#"{"a":1}"#);
    assert_eq!(desires[0]["security"], false);

    let remove: Value = serde_json::from_str(&seen[3].body).unwrap();
    assert_eq!(remove, serde_json::json!({"ids": ["iwc_explore_1"]}));
}

#[tokio::test]
async fn test_http_rejection_and_server_error() {
    let (base, server) = canned_server(vec![
        ("200 OK", "{}"),
        ("200 OK", "{}"),
        ("200 OK", r#"{"accepted":false,"message":"no strategy for fly"}"#),
        ("500 Internal Server Error", ""),
    ])
    .await;

    let client = DesireClient::connect(config_for(&base), Arc::new(IdGenerator::new()))
        .await
        .unwrap();

    match client.submit_desire(DesireRequest::new("fly")).await {
        Err(IwError::Rejected { reason, .. }) => assert_eq!(reason, "no strategy for fly"),
        other => panic!("Expected rejection, got {:?}", other.map_err(|e| e.to_string())),
    }

    let err = client.withdraw_desire("iwc_fly_1").await.unwrap_err();
    assert!(matches!(err, IwError::Transport(_)), "5xx must surface as a transport failure");

    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_service_times_out() {
    // Reserve a port, then free it so nothing listens there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::default()
        .with_master_uri(format!("http://{}", addr))
        .with_bind_timeout(Duration::from_millis(300));

    let started = std::time::Instant::now();
    let result = DesireClient::connect(config, Arc::new(IdGenerator::new())).await;

    match result {
        Err(IwError::ServiceUnavailable { service, .. }) => assert_eq!(service, "/hbba/add_desires"),
        Err(other) => panic!("Expected ServiceUnavailable, got {}", other),
        Ok(_) => panic!("Nothing is listening, construction must fail"),
    }
    assert!(started.elapsed() < Duration::from_secs(3), "Binding wait must stay bounded");
}

#[tokio::test]
async fn test_http_non_object_reply_is_accepted() {
    let (base, server) = canned_server(vec![
        ("200 OK", "{}"),
        ("200 OK", "{}"),
        ("200 OK", r#""ok""#),
        ("200 OK", "ok"),
    ])
    .await;

    let client = DesireClient::connect(config_for(&base), Arc::new(IdGenerator::new()))
        .await
        .unwrap();

    let id = client
        .submit_desire(DesireRequest::new("explore"))
        .await
        .expect("A 2xx reply means the desire was sent, so its id must come back");
    assert_eq!(id, "iwc_explore_1");

    let ack = client.withdraw_desire(&id).await.unwrap();
    assert!(ack.accepted);
    assert_eq!(ack.message.as_deref(), Some("ok"));

    server.await.unwrap();
}

#[test]
fn test_ack_from_body() {
    assert_eq!(ack_from_body("  "), Ack::default());
    assert_eq!(ack_from_body("{}"), Ack::default());

    let refused = ack_from_body(r#"{"accepted":false,"message":"busy"}"#);
    assert!(!refused.accepted);
    assert_eq!(refused.message.as_deref(), Some("busy"));

    for body in [r#""ok""#, "true", "[]", "ok", r#"{"accepted":"no"}"#] {
        let ack = ack_from_body(body);
        assert!(ack.accepted, "Body {} must count as accepted", body);
        assert_eq!(ack.message.as_deref(), Some(body));
    }
}

#[tokio::test]
async fn test_unavailable_message_names_cause_once() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::default()
        .with_master_uri(format!("http://{}", addr))
        .with_bind_timeout(Duration::from_millis(200));

    let err = match DesireClient::connect(config, Arc::new(IdGenerator::new())).await {
        Err(e) => e,
        Ok(_) => panic!("Nothing is listening, construction must fail"),
    };

    assert_eq!(err.to_string(), "Could not reach IW service /hbba/add_desires");
    let cause = err.source().expect("Bind failure keeps its cause").to_string();
    assert!(!err.to_string().contains(&cause), "Cause is reported via source(), not repeated");
}
