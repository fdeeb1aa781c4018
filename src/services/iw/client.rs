use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::config::ClientConfig;
use super::transport::{HttpTransport, IwTransport};
use crate::desire::validate::{check_request, id_from_value, request_from_value};
use crate::desire::{type_prefix, Ack, Desire, DesireRequest, IdGenerator};
use crate::error::{IwError, Result};

/// Thin client for the Intention Workspace add/remove desire services.
///
/// Every call is a single request/response. Nothing is retried and no record
/// of outstanding desires is kept.
pub struct DesireClient<T: IwTransport = HttpTransport> {
    transport: T,
    config: ClientConfig,
    ids: Arc<IdGenerator>,
}

impl DesireClient<HttpTransport> {
    /// Binds over HTTP using `config`.
    pub async fn connect(config: ClientConfig, ids: Arc<IdGenerator>) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(transport, config, ids).await
    }

    /// `connect` with the environment config.
    pub async fn connect_from_env(ids: Arc<IdGenerator>) -> Result<Self> {
        Self::connect(ClientConfig::from_env(), ids).await
    }
}

impl<T: IwTransport> DesireClient<T> {
    /// Waits for both IW services, each within `config.bind_timeout`.
    pub async fn with_transport(transport: T, config: ClientConfig, ids: Arc<IdGenerator>) -> Result<Self> {
        for service in [&config.add_service, &config.remove_service] {
            if let Err(e) = transport.wait_for_service(service, config.bind_timeout).await {
                warn!("IW service {} unavailable: {}", service, e);
                return Err(IwError::ServiceUnavailable {
                    service: service.clone(),
                    source: Box::new(e),
                });
            }
            debug!("Bound IW service {}", service);
        }

        info!("IW services ready ({}, {})", config.add_service, config.remove_service);
        Ok(Self { transport, config, ids })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn id_generator(&self) -> &Arc<IdGenerator> {
        &self.ids
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `desire` as-is in a one-element batch.
    pub async fn submit_raw_desire(&self, desire: Desire) -> Result<Ack> {
        debug!("Submitting desire {} ({})", desire.id, desire.desire_type);
        let service = &self.config.add_service;
        let ack = self.transport.add_desires(service, &[desire]).await?;
        accepted(service, ack)
    }

    /// Validates `request`, fills in a generated id if none was given and
    /// submits it. Returns the id the desire was sent under.
    pub async fn submit_desire(&self, request: DesireRequest) -> Result<String> {
        check_request(&request)?;

        let id = match request.explicit_id() {
            Some(id) => id.to_string(),
            None => self.ids.next_id(&type_prefix(&request.desire_type)),
        };

        let desire = Desire::new(
            id.clone(),
            request.desire_type,
            request.intensity,
            request.utility,
            &request.params,
            request.security,
        )
        .map_err(|e| IwError::invalid("params", e.to_string()))?;

        self.submit_raw_desire(desire).await?;
        Ok(id)
    }

    /// `submit_desire` for arguments received as untyped JSON.
    pub async fn submit_desire_value(&self, value: &Value) -> Result<String> {
        let request = request_from_value(value)?;
        self.submit_desire(request).await
    }

    pub async fn withdraw_desire(&self, id: &str) -> Result<Ack> {
        if id.is_empty() {
            return Err(IwError::invalid("id", "must not be empty"));
        }

        debug!("Withdrawing desire {}", id);
        let service = &self.config.remove_service;
        let ack = self.transport.remove_desires(service, &[id.to_string()]).await?;
        accepted(service, ack)
    }

    pub async fn withdraw_desire_value(&self, value: &Value) -> Result<Ack> {
        let id = id_from_value(value)?;
        self.withdraw_desire(&id).await
    }
}

fn accepted(service: &str, ack: Ack) -> Result<Ack> {
    if ack.accepted {
        return Ok(ack);
    }
    let reason = ack.message.unwrap_or_else(|| "no reason given".to_string());
    warn!("{} rejected request: {}", service, reason);
    Err(IwError::Rejected {
        service: service.to_string(),
        reason,
    })
}
