use std::net::IpAddr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, redirect};

use lanwatch_common::protocol::Protocol;

use super::{Prober, READ_TIMEOUT};

/// Probes HTTP and HTTPS servers with a `HEAD` request.
///
/// One pooled client is built per daemon and reused for the whole scan.
/// Redirects are not followed: the [200, 400) success window is judged
/// on the first response, and a redirect is liveness in itself. TLS
/// verification stays on, so an untrusted certificate is a probe
/// failure like any other transport error.
pub struct HttpProber {
    client: Client,
    scheme: String,
    port: u16,
}

impl HttpProber {
    pub fn new(protocol: Protocol, port: u16, timeout: Duration) -> anyhow::Result<Self> {
        let client: Client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(READ_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()
            .context("building the pooled HTTP client")?;

        Ok(Self {
            client,
            scheme: protocol.scheme(),
            port,
        })
    }

    fn is_alive(status: StatusCode) -> bool {
        (200..400).contains(&status.as_u16())
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, addr: IpAddr) -> bool {
        let url: String = format!("{}{}:{}", self.scheme, addr, self.port);

        match self.client.head(&url).send().await {
            Ok(response) => Self::is_alive(response.status()),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_window_is_200_inclusive_to_400_exclusive() {
        assert!(HttpProber::is_alive(StatusCode::OK));
        assert!(HttpProber::is_alive(StatusCode::NO_CONTENT));
        assert!(HttpProber::is_alive(StatusCode::MOVED_PERMANENTLY));
        assert!(!HttpProber::is_alive(StatusCode::BAD_REQUEST));
        assert!(!HttpProber::is_alive(StatusCode::NOT_FOUND));
        assert!(!HttpProber::is_alive(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn builds_for_both_schemes() {
        assert!(HttpProber::new(Protocol::Http, 80, Duration::from_millis(10)).is_ok());
        assert!(HttpProber::new(Protocol::Https, 443, Duration::from_millis(10)).is_ok());
    }
}
