//! Live HTTP fetcher used for banner inspection and JSON-RPC calls.
//!
//! Device banners are served over plain http on whatever port answered,
//! so the fetcher never negotiates TLS and never rewrites the scheme.
//! Non-success statuses still carry identifying bodies (login pages,
//! error banners) and are returned as-is, not mapped to errors.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;

use lenscan_common::error::ProbeError;
use lenscan_common::probing::HttpFetcher;

pub struct HttpProbeClient {
    client: reqwest::Client,
}

impl HttpProbeClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lenscan/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

fn to_probe_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else if err.is_connect() {
        ProbeError::Connect(err.to_string())
    } else {
        ProbeError::Malformed(err.to_string())
    }
}

#[async_trait]
impl HttpFetcher for HttpProbeClient {
    async fn get(&self, host: Ipv4Addr, port: u16, timeout: Duration) -> Result<String, ProbeError> {
        let url = format!("http://{host}:{port}/");
        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(to_probe_error)?;

        tracing::debug!(url, status = response.status().as_u16(), "banner fetch");
        response.text().await.map_err(to_probe_error)
    }

    async fn post_json(
        &self,
        host: Ipv4Addr,
        port: u16,
        path: &str,
        body: &str,
        timeout: Duration,
    ) -> Result<String, ProbeError> {
        let url = format!("http://{host}:{port}{path}");
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_owned())
            .timeout(timeout)
            .send()
            .await
            .map_err(to_probe_error)?;

        response.text().await.map_err(to_probe_error)
    }
}
