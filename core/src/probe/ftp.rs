use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::warn;

use lanwatch_protocols::ftp;

use super::{Prober, READ_TIMEOUT};

/// Probes FTP servers by connecting to the control channel and reading
/// the greeting. Only a service-ready reply (220) counts as alive.
pub struct FtpProber {
    port: u16,
    timeout: Duration,
}

impl FtpProber {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    async fn greeting_code(&self, addr: SocketAddr) -> io::Result<Option<u16>> {
        let stream: TcpStream = timeout(self.timeout, TcpStream::connect(addr)).await??;
        let mut reader = BufReader::new(stream);

        let mut greeting = String::new();
        timeout(READ_TIMEOUT, reader.read_line(&mut greeting)).await??;
        let code: Option<u16> = ftp::parse_reply_code(&greeting);

        // A failed close is logged and never changes the probe outcome.
        if let Err(e) = reader.into_inner().shutdown().await {
            warn!("could not close the control connection to {addr} cleanly: {e}");
        }

        Ok(code)
    }
}

#[async_trait]
impl Prober for FtpProber {
    async fn probe(&self, addr: IpAddr) -> bool {
        let addr = SocketAddr::new(addr, self.port);

        match self.greeting_code(addr).await {
            Ok(code) => code == Some(ftp::SERVICE_READY),
            Err(_) => false,
        }
    }
}
