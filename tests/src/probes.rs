#![cfg(test)]
//! End-to-end probe checks against throwaway local servers.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use lanwatch_common::protocol::Protocol;
use lanwatch_core::probe::{FtpProber, HttpProber, Prober};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PROBE_TIMEOUT: Duration = Duration::from_millis(1_000);
const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Accepts connections and answers every request with `status_line`.
async fn spawn_http_responder(status_line: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;

                let response = format!(
                    "HTTP/1.1 {status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    port
}

/// Accepts connections and sends one FTP-style greeting line.
async fn spawn_ftp_greeter(greeting: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = stream.write_all(greeting.as_bytes()).await;
                let mut buf = [0u8; 64];
                let _ = stream.read(&mut buf).await;
            });
        }
    });

    port
}

/// Binds and immediately drops a listener, yielding a port that refuses
/// connections.
async fn refused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn http_probe_classifies_204_as_online() {
    let port = spawn_http_responder("204 No Content").await;
    let prober = HttpProber::new(Protocol::Http, port, PROBE_TIMEOUT).unwrap();

    assert!(prober.probe(LOCALHOST).await);
}

#[tokio::test]
async fn http_probe_classifies_404_as_failure() {
    let port = spawn_http_responder("404 Not Found").await;
    let prober = HttpProber::new(Protocol::Http, port, PROBE_TIMEOUT).unwrap();

    assert!(!prober.probe(LOCALHOST).await);
}

#[tokio::test]
async fn http_probe_fails_on_a_refused_connection() {
    let port = refused_port().await;
    let prober = HttpProber::new(Protocol::Http, port, PROBE_TIMEOUT).unwrap();

    assert!(!prober.probe(LOCALHOST).await);
}

#[tokio::test]
async fn ftp_probe_accepts_a_service_ready_greeting() {
    let port = spawn_ftp_greeter("220 ProFTPD Server ready.\r\n").await;
    let prober = FtpProber::new(port, PROBE_TIMEOUT);

    assert!(prober.probe(LOCALHOST).await);
}

#[tokio::test]
async fn ftp_probe_rejects_other_reply_codes() {
    let port = spawn_ftp_greeter("421 Too many connections, try later.\r\n").await;
    let prober = FtpProber::new(port, PROBE_TIMEOUT);

    assert!(!prober.probe(LOCALHOST).await);
}

#[tokio::test]
async fn ftp_probe_rejects_a_non_ftp_banner() {
    let port = spawn_ftp_greeter("SSH-2.0-OpenSSH_9.6\r\n").await;
    let prober = FtpProber::new(port, PROBE_TIMEOUT);

    assert!(!prober.probe(LOCALHOST).await);
}

#[tokio::test]
async fn ftp_probe_fails_on_a_refused_connection() {
    let port = refused_port().await;
    let prober = FtpProber::new(port, PROBE_TIMEOUT);

    assert!(!prober.probe(LOCALHOST).await);
}
