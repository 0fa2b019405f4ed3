//! End-to-end tests against a live listener on a loopback port.

use docroot::config::Config;
use docroot::server::Listener;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

struct Reply {
    status_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Reply {
    fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("htdocs");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("index.html"), b"hi there!\n").unwrap();
    std::fs::write(root.join("style.css"), b"body { color: red; }\n").unwrap();
    std::fs::write(root.join("about.html"), b"<p>about</p>").unwrap();
    std::fs::write(root.join("logo.png"), (0u8..=255).collect::<Vec<u8>>()).unwrap();
    std::fs::create_dir(root.join("assets.d")).unwrap();
    std::fs::write(dir.path().join("secret.txt"), b"outside").unwrap();
    dir
}

fn config_for(root: &Path) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        doc_root: root.join("htdocs").to_string_lossy().into_owned(),
        ..Config::default()
    }
}

async fn start(config: Config) -> SocketAddr {
    let listener = Listener::bind(config).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { listener.run().await });
    addr
}

async fn exchange(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut received = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut received))
        .await
        .unwrap()
        .unwrap();
    received
}

fn split(raw: &[u8]) -> Reply {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator");
    let head = std::str::from_utf8(&raw[..end]).unwrap();
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap().to_string();
    let headers = lines
        .map(|line| {
            let (k, v) = line.split_once(": ").unwrap();
            (k.to_string(), v.to_string())
        })
        .collect();

    Reply {
        status_line,
        headers,
        body: raw[end + 4..].to_vec(),
    }
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = split(&exchange(addr, b"GET / HTTP/1.1\r\n\r\n").await);

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    let names: Vec<&str> = reply.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["Date", "Content-Type", "Content-Length", "Connection"]);
    assert!(reply.header("Date").unwrap().ends_with(" GMT"));
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    assert_eq!(reply.header("Content-Length"), Some("10"));
    assert_eq!(reply.header("Connection"), Some("close"));
    assert_eq!(reply.body, b"hi there!\n");
}

#[tokio::test]
async fn test_stylesheet_content_type() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = split(&exchange(addr, b"GET /style.css HTTP/1.1\r\n\r\n").await);

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/css"));
    assert_eq!(reply.body, b"body { color: red; }\n");
}

#[tokio::test]
async fn test_extension_is_inferred() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = split(&exchange(addr, b"GET /about HTTP/1.1\r\n\r\n").await);

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    assert_eq!(reply.body, b"<p>about</p>");
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let raw = exchange(addr, b"GET /missing.png HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        raw,
        b"HTTP/1.1 404 Not Found\r\n\
Content-Type: text/html\r\n\
\r\n\
<html><body><h1>404 Not Found</h1></body></html>"
            .to_vec()
    );
}

#[tokio::test]
async fn test_query_string_ignored() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = split(&exchange(addr, b"GET /logo.png?v=2 HTTP/1.1\r\n\r\n").await);

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("image/png"));
    assert_eq!(reply.header("Content-Length"), Some("256"));
    assert_eq!(reply.body, (0u8..=255).collect::<Vec<u8>>());
}

#[tokio::test]
async fn test_empty_request_gets_no_response() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut received = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut received))
        .await
        .unwrap()
        .unwrap();

    assert!(received.is_empty());
}

#[tokio::test]
async fn test_short_request_line_gets_no_response() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let raw = exchange(addr, b"GET /\r\n\r\n").await;

    assert!(raw.is_empty());
}

#[tokio::test]
async fn test_directory_is_404() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = split(&exchange(addr, b"GET /assets.d HTTP/1.1\r\n\r\n").await);

    assert_eq!(reply.status_line, "HTTP/1.1 404 Not Found");
}

#[tokio::test]
async fn test_parent_segments_are_not_confined() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = split(&exchange(addr, b"GET /../secret.txt HTTP/1.1\r\n\r\n").await);

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(reply.body, b"outside");
}

#[tokio::test]
async fn test_silent_client_times_out() {
    let dir = site();
    let config = Config {
        read_timeout: Duration::from_millis(200),
        ..config_for(dir.path())
    };
    let addr = start(config).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();

    let mut received = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut received))
        .await
        .expect("server kept a silent connection open")
        .unwrap();

    assert!(received.is_empty());
}

#[tokio::test]
async fn test_silent_client_does_not_block_others() {
    let dir = site();
    let config = Config {
        max_connections: 2,
        ..config_for(dir.path())
    };
    let addr = start(config).await;

    let _idle = TcpStream::connect(addr).await.unwrap();

    let reply = split(&exchange(addr, b"GET / HTTP/1.1\r\n\r\n").await);

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.body, b"hi there!\n");
}

#[tokio::test]
async fn test_sequential_requests_each_get_a_response() {
    let dir = site();
    let config = Config {
        max_connections: 1,
        ..config_for(dir.path())
    };
    let addr = start(config).await;

    for _ in 0..3 {
        let reply = split(&exchange(addr, b"GET /style.css HTTP/1.0\r\n\r\n").await);
        assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    }
}

#[tokio::test]
async fn test_bind_to_busy_port_fails() {
    let dir = site();
    let first = Listener::bind(config_for(dir.path())).await.unwrap();
    let addr = first.local_addr().unwrap();

    let config = Config {
        listen_addr: addr.to_string(),
        ..config_for(dir.path())
    };
    let err = match Listener::bind(config).await {
        Ok(_) => panic!("second bind to {} succeeded", addr),
        Err(e) => e,
    };

    assert!(err.to_string().contains("bind failed"), "{:#}", err);
    drop(first);
}
