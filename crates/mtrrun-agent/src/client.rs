//! Outbound HTTP transport.
//!
//! `Transport` is the seam the agent sends through; `HttpClient` is the
//! production implementation on top of `reqwest` with idle-connection pooling
//! and a per-request timeout.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use mtrrun_core::error::{MtrrunError, Result};

/// Client for sending metric requests to the collector.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request. Statuses >= 400 surface as `MtrrunError::Rejected`.
    async fn do_request(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<()>;

    /// Release pooled connections. Later requests fail with a transport error.
    fn shutdown(&self);
}

pub struct HttpClient {
    inner: RwLock<Option<reqwest::Client>>,
}

impl HttpClient {
    pub fn new(timeout: Duration, max_idle_conns: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_idle_conns)
            .build()
            .map_err(|e| MtrrunError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            inner: RwLock::new(Some(client)),
        })
    }

    // reqwest::Client is a handle; cloning it shares the pool.
    fn client(&self) -> Option<reqwest::Client> {
        // Poisoned lock means a panic elsewhere; report as closed instead of panicking.
        self.inner.read().ok().and_then(|g| g.clone())
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn do_request(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<()> {
        let client = self
            .client()
            .ok_or_else(|| MtrrunError::Transport("client is shut down".into()))?;

        let mut req = client.request(method, url);
        for (k, v) in headers {
            req = req.header(*k, *v);
        }

        let resp = req
            .body(body)
            .send()
            .await
            .map_err(|e| MtrrunError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let body = resp
                .text()
                .await
                .map_err(|e| MtrrunError::Transport(format!("read body failed: {e}")))?;
            return Err(MtrrunError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    fn shutdown(&self) {
        // Dropping the last handle closes the idle pool; in-flight requests
        // keep their own clone and finish normally.
        if let Ok(mut g) = self.inner.write() {
            g.take();
        }
    }
}
