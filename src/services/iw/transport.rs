use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::config::ClientConfig;
use crate::desire::{Ack, Desire};
use crate::error::{IwError, Result};

/// Remote-call seam between `DesireClient` and the IW runtime.
pub trait IwTransport: Send + Sync {
    /// Resolves once `service` is callable, or fails after `timeout`.
    fn wait_for_service(
        &self,
        service: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    fn add_desires(
        &self,
        service: &str,
        desires: &[Desire],
    ) -> impl Future<Output = Result<Ack>> + Send;

    fn remove_desires(
        &self,
        service: &str,
        ids: &[String],
    ) -> impl Future<Output = Result<Ack>> + Send;
}

#[derive(Serialize)]
struct AddDesiresRequest<'a> {
    desires: &'a [Desire],
}

#[derive(Serialize)]
struct RemoveDesiresRequest<'a> {
    ids: &'a [String],
}

/// JSON-over-HTTP binding: every service is a path under the master URI.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    probe_interval: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.bind_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.master_uri.trim_end_matches('/').to_string(),
            probe_interval: config.probe_interval,
        })
    }

    fn url(&self, service: &str) -> String {
        if service.starts_with('/') {
            format!("{}{}", self.base_url, service)
        } else {
            format!("{}/{}", self.base_url, service)
        }
    }

    async fn probe(&self, url: &str) -> Result<()> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(IwError::Transport(format!("{} answered {}", url, response.status())));
        }
        Ok(())
    }

    async fn call<B: Serialize>(&self, service: &str, body: &B) -> Result<Ack> {
        let url = self.url(service);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(IwError::Transport(format!(
                "{} answered {}",
                service,
                response.status()
            )));
        }

        let body = response.text().await?;
        Ok(ack_from_body(&body))
    }
}

/// Reads a 2xx reply body. The request already went through, so only an
/// object carrying `"accepted": false` counts as a refusal; any other body is
/// an acceptance with its text kept as the message.
pub fn ack_from_body(body: &str) -> Ack {
    let body = body.trim();
    if body.is_empty() {
        return Ack::default();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => match serde_json::from_value::<Ack>(value) {
            Ok(ack) => ack,
            Err(e) => {
                debug!("Reply object is not an ack ({}), treating as accepted", e);
                Ack {
                    accepted: true,
                    message: Some(body.to_string()),
                }
            }
        },
        _ => Ack {
            accepted: true,
            message: Some(body.to_string()),
        },
    }
}

impl IwTransport for HttpTransport {
    async fn wait_for_service(&self, service: &str, timeout: Duration) -> Result<()> {
        let url = self.url(service);
        let mut last_err: Option<IwError> = None;

        let waited = tokio::time::timeout(timeout, async {
            loop {
                match self.probe(&url).await {
                    Ok(()) => return,
                    Err(e) => {
                        debug!("{} not ready yet: {}", service, e);
                        last_err = Some(e);
                    }
                }
                tokio::time::sleep(self.probe_interval).await;
            }
        })
        .await;

        match waited {
            Ok(()) => Ok(()),
            Err(_) => Err(last_err.unwrap_or_else(|| IwError::Timeout {
                service: service.to_string(),
                after: timeout,
            })),
        }
    }

    async fn add_desires(&self, service: &str, desires: &[Desire]) -> Result<Ack> {
        self.call(service, &AddDesiresRequest { desires }).await
    }

    async fn remove_desires(&self, service: &str, ids: &[String]) -> Result<Ack> {
        self.call(service, &RemoveDesiresRequest { ids }).await
    }
}
