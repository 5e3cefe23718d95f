//! Exercises the reqwest transport against an in-process HTTP listener that
//! captures the raw request and replies with a canned body.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use mae_core::{ImportError, ImporterConfig, StatementFile};
use mae_import::{HttpTransport, StatementImporter};

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Accept exactly one connection, return the raw request bytes.
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let exchange = async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }

        let reply = format!(
            "HTTP/1.1 {status} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        buf
    };
    let handle = tokio::spawn(async move {
        timeout(EXCHANGE_TIMEOUT, exchange)
            .await
            .expect("request/response exchange timed out")
    });

    (format!("http://{addr}/"), handle)
}

fn request_complete(buf: &[u8]) -> bool {
    let Some(header_end) = find(buf, b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let chunked = head
        .lines()
        .filter_map(|l| l.strip_prefix("transfer-encoding:"))
        .any(|v| v.contains("chunked"));
    match content_length {
        Some(len) => buf.len() >= header_end + 4 + len,
        None if chunked => buf.ends_with(b"0\r\n\r\n"),
        // Bodyless request such as a GET.
        None => true,
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn importer(base_url: String, mode: &str) -> StatementImporter {
    let config = ImporterConfig {
        base_url,
        mode: Some(mode.to_string()),
        fallback_mode: mode.to_string(),
        debit_mode: mode.to_string(),
        credit_mode: mode.to_string(),
        ..ImporterConfig::default()
    };
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    StatementImporter::new(config, Arc::new(HttpTransport::with_client(client))).unwrap()
}

#[tokio::test]
async fn test_multipart_request_shape() {
    let (base, server) = serve_once(
        200,
        r#"{"import_id":"x","mode":"maybank_debit","row_count":1,"rows":[{"Entry Date":"2024-02-01","Transaction Amount":12.5,"flow":"inflow"}],"errors":[]}"#,
    )
    .await;

    let file = StatementFile::new(b"%PDF-1.7\nbinary\x00\xffdata".to_vec(), "feb.pdf").unwrap();
    let result = importer(base, "maybank_debit").import(&file).await.unwrap();
    assert_eq!(result.len(), 1);
    assert!(result.transactions[0].is_credit);

    let raw = server.await.unwrap();
    let text = String::from_utf8_lossy(&raw);
    let lower = text.to_lowercase();

    assert!(text.starts_with("POST /process HTTP/1.1\r\n"), "request line: {text}");
    assert!(lower.contains("accept: application/json\r\n"));
    let boundary = lower
        .lines()
        .find_map(|l| l.strip_prefix("content-type: multipart/form-data; boundary="))
        .expect("multipart content type with boundary")
        .trim()
        .to_string();
    assert!(!boundary.is_empty());

    let mode_at = find(&raw, b"name=\"mode\"\r\n\r\nmaybank_debit\r\n").expect("mode part");
    let format_at = find(&raw, b"name=\"response_format\"\r\n\r\njson\r\n").expect("format part");
    let file_at = find(&raw, b"name=\"files\"; filename=\"feb.pdf\"").expect("file part");
    assert!(mode_at < format_at && format_at < file_at);
    assert!(lower.contains("content-type: application/pdf\r\n"));
    assert!(find(&raw, b"%PDF-1.7\nbinary\x00\xffdata").is_some(), "file bytes sent verbatim");
}

#[tokio::test]
async fn test_non_success_status_is_classified() {
    let (base, server) = serve_once(400, r#"{"detail":"Unsupported mode 'nope'. Use /modes."}"#).await;

    let file = StatementFile::new(b"%PDF".to_vec(), "a.pdf").unwrap();
    let err = importer(base, "nope").import(&file).await.unwrap_err();
    server.await.unwrap();

    assert_eq!(err, ImportError::network(400, "Unsupported mode 'nope'. Use /modes."));
}

#[tokio::test]
async fn test_connection_refused_is_swallowed() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let file = StatementFile::new(b"%PDF".to_vec(), "a.pdf").unwrap();
    let err = importer(format!("http://{addr}/"), "maybank_debit")
        .import(&file)
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::NoTransactions { last_failure: Some(_) }));
}

#[tokio::test]
async fn test_health_over_http() {
    let (base, server) = serve_once(200, r#"{"status":"ok"}"#).await;
    let status = importer(base, "maybank_debit").health().await.unwrap();
    let raw = server.await.unwrap();

    assert_eq!(status, "ok");
    assert!(String::from_utf8_lossy(&raw).starts_with("GET /health HTTP/1.1\r\n"));
}

#[tokio::test]
async fn test_list_modes_over_http() {
    let (base, server) = serve_once(200, r#"{"modes":["maybank_credit","  ","maybank_debit"]}"#).await;
    let modes = importer(base, "maybank_debit").list_modes().await.unwrap();
    let raw = server.await.unwrap();

    let names: Vec<&str> = modes.iter().map(|m| m.as_str()).collect();
    assert_eq!(names, ["maybank_credit", "maybank_debit"]);
    let text = String::from_utf8_lossy(&raw).to_lowercase();
    assert!(text.starts_with("get /modes http/1.1\r\n"));
    assert!(text.contains("accept: application/json\r\n"));
}

#[test]
fn test_request_complete_framing() {
    assert!(!request_complete(b"GET /health HTTP/1.1\r\nhost: x"));
    assert!(request_complete(b"GET /health HTTP/1.1\r\nhost: x\r\n\r\n"));
    assert!(!request_complete(b"POST /process HTTP/1.1\r\ncontent-length: 4\r\n\r\nab"));
    assert!(request_complete(b"POST /process HTTP/1.1\r\ncontent-length: 4\r\n\r\nabcd"));
    assert!(!request_complete(b"POST /process HTTP/1.1\r\ntransfer-encoding: chunked\r\n\r\n2\r\nab\r\n"));
    assert!(request_complete(
        b"POST /process HTTP/1.1\r\ntransfer-encoding: chunked\r\n\r\n2\r\nab\r\n0\r\n\r\n"
    ));
}
