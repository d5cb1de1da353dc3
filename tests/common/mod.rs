//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use cors_relay::config::ListenerConfig;
use cors_relay::{net, RelayConfig, RelayServer};

/// Start the relay on an ephemeral port, listening on all interfaces.
/// Returns a loopback address to reach it.
pub async fn start_relay() -> SocketAddr {
    let config = RelayConfig {
        listener: ListenerConfig::all_interfaces(0),
    };
    let listener = net::bind(&config.listener).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = RelayServer::new(config);

    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Test client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// URL that asks the relay at `relay` to fetch `target`.
pub fn relay_url(relay: SocketAddr, target: &str) -> String {
    format!("http://{}/{}", relay, target)
}

/// Serialize a raw HTTP/1.1 response with a Content-Length.
pub fn raw_response(status_line: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {}\r\n", status_line);
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    ));
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// Read until the end of the request head so the client is never reset
/// mid-write. Returns the head as text.
async fn read_request_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start an upstream that answers every connection with the same raw
/// bytes. Returns its address and a counter of requests received.
pub async fn start_upstream(response: Vec<u8>) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let response = Arc::new(response);

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let response = response.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        counter.fetch_add(1, Ordering::SeqCst);
                        let _ = socket.write_all(&response).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

/// Start an upstream that answers like `start_upstream` and records the
/// request line of every request it receives.
pub async fn start_recording_upstream(response: Vec<u8>) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let response = Arc::new(response);

    let recorder = seen.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let response = response.clone();
            let recorder = recorder.clone();
            tokio::spawn(async move {
                let head = read_request_head(&mut socket).await;
                let line = head.lines().next().unwrap_or_default().to_string();
                recorder.lock().unwrap().push(line);
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, seen)
}

/// Start an upstream that sends a chunked body one small chunk every
/// `interval` until a write fails. The receiver fires once the relay has
/// dropped the upstream connection.
pub async fn start_trickling_upstream(interval: Duration) -> (SocketAddr, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        read_request_head(&mut socket).await;

        let head = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n";
        if socket.write_all(head).await.is_err() {
            let _ = closed_tx.send(());
            return;
        }
        // Bounded so a relay that never lets go cannot hang the test forever.
        for _ in 0..1000 {
            if socket.write_all(b"5\r\ntick\n\r\n").await.is_err() {
                let _ = closed_tx.send(());
                return;
            }
            tokio::time::sleep(interval).await;
        }
    });

    (addr, closed_rx)
}

/// Send `GET <path>` to `relay` over a raw socket, so the path reaches the
/// relay byte for byte. Returns the full response text.
pub async fn raw_get(relay: SocketAddr, path: &str) -> String {
    let mut socket = TcpStream::connect(relay).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, relay
    );
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    socket.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// Start an upstream that writes `partial`, waits `pause`, then hangs up.
/// The pause lets the relay commit status and headers before the upstream
/// connection drops.
pub async fn start_truncating_upstream(partial: Vec<u8>, pause: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let partial = Arc::new(partial);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let partial = partial.clone();
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let _ = socket.write_all(&partial).await;
                let _ = socket.flush().await;
                tokio::time::sleep(pause).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start an upstream that accepts connections and never answers.
pub async fn start_stalled_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
