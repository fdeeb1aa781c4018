use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed parameters carried by a desire. Sent as JSON text.
pub type DesireParams = Map<String, Value>;

pub const DEFAULT_INTENSITY: f64 = 1.0;
pub const DEFAULT_UTILITY: f64 = 1.0;

/// Wire record for a single desire. Field order is transmission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Desire {
    pub id: String,
    #[serde(rename = "type")]
    pub desire_type: String,
    pub intensity: f64,
    pub utility: f64,
    /// JSON-encoded `DesireParams`.
    pub params: String,
    pub security: bool,
}

impl Desire {
    /// Builds a wire record, encoding `params` to JSON text.
    pub fn new(
        id: impl Into<String>,
        desire_type: impl Into<String>,
        intensity: f64,
        utility: f64,
        params: &DesireParams,
        security: bool,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            id: id.into(),
            desire_type: desire_type.into(),
            intensity,
            utility,
            params: serde_json::to_string(params)?,
            security,
        })
    }

    /// Decodes the `params` text back into a mapping.
    pub fn decode_params(&self) -> serde_json::Result<DesireParams> {
        serde_json::from_str(&self.params)
    }
}

/// Typed arguments for `DesireClient::submit_desire`.
#[derive(Debug, Clone, PartialEq)]
pub struct DesireRequest {
    pub desire_type: String,
    pub intensity: f64,
    pub utility: f64,
    pub params: DesireParams,
    pub security: bool,
    /// `None` (or empty) means "generate one".
    pub id: Option<String>,
}

impl DesireRequest {
    pub fn new(desire_type: impl Into<String>) -> Self {
        Self {
            desire_type: desire_type.into(),
            intensity: DEFAULT_INTENSITY,
            utility: DEFAULT_UTILITY,
            params: DesireParams::new(),
            security: false,
            id: None,
        }
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_utility(mut self, utility: f64) -> Self {
        self.utility = utility;
        self
    }

    pub fn with_params(mut self, params: DesireParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_security(mut self, security: bool) -> Self {
        self.security = security;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Explicit id, treating an empty string as omitted.
    pub fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Reply body of both IW procedures. Missing fields mean "accepted".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default = "accepted_by_default")]
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn accepted_by_default() -> bool {
    true
}

impl Default for Ack {
    fn default() -> Self {
        Self {
            accepted: true,
            message: None,
        }
    }
}
