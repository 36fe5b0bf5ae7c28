//! HTTP send pipeline
//!
//! Requests pass through an ordered pipeline: transient failures (network
//! errors, 5xx) are retried with linear backoff, then any remaining non-2xx
//! response is classified into a typed error carrying the response body.
//! Token refresh on 401 is layered on top by the client, which owns the
//! authorization state.

use crate::config::Config;
use crate::error::{B2Error, Result};
use reqwest::{header, Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, warn};

pub(crate) struct Transport {
    http: Client,
    max_retries: u32,
    retry_interval: Duration,
}

impl Transport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let user_agent = config
            .user_agent
            .parse()
            .map_err(|_| B2Error::Config(format!("invalid user agent: {}", config.user_agent)))?;
        headers.insert(header::USER_AGENT, user_agent);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(B2Error::Http)?;

        Ok(Self {
            http,
            max_retries: config.max_retries.max(1),
            retry_interval: config.retry_interval,
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Send a request, retrying transient failures.
    ///
    /// `build` is invoked once per attempt so every retry carries a fresh
    /// request. Retry delay grows linearly: attempt number times the
    /// configured base interval. Non-2xx responses other than 5xx are
    /// classified and returned immediately, never retried here.
    pub async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!("request succeeded with {}", status);
                        return Ok(response);
                    }
                    if status.is_server_error() && attempt < self.max_retries {
                        let delay = self.retry_interval * attempt;
                        warn!(
                            "server returned {} on attempt {}, retrying in {:?}",
                            status, attempt, delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    let status = status.as_u16();
                    let body = response.text().await.unwrap_or_default();
                    return Err(B2Error::classify(status, &body));
                }
                Err(err) if (err.is_timeout() || err.is_connect()) && attempt < self.max_retries => {
                    let delay = self.retry_interval * attempt;
                    warn!("transport error on attempt {}: {}, retrying in {:?}", attempt, err, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(B2Error::Http(err)),
            }
        }
    }
}
