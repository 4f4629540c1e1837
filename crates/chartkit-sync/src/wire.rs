//! JSON bodies exchanged with the drawing backend.

use chartkit_core::SyncError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{"status": "success" | "error", "message": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
        }
    }

    /// Maps an `error` status onto [`SyncError::Rejected`].
    pub fn into_result(self, symbol: &str, id: &str) -> Result<(), SyncError> {
        match self.status {
            Status::Success => Ok(()),
            Status::Error => Err(SyncError::Rejected {
                symbol: symbol.to_string(),
                id: id.to_string(),
                message: self.message.unwrap_or_else(|| "no message".to_string()),
            }),
        }
    }
}

/// Non-geometric metadata of a drawing.
///
/// Keys this type does not know are kept in `extra` and written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ShapeProperties {
    pub fn from_map(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self, SyncError> {
        serde_json::from_value(serde_json::Value::Object(map.clone())).map_err(|e| SyncError::Decode {
            reason: e.to_string(),
        })
    }

    /// Properties as the flat map stored in shape metadata.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// Body of `GET /get_shape_properties/{symbol}/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertiesResponse {
    pub status: Status,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub properties: ShapeProperties,
}

impl PropertiesResponse {
    pub fn into_result(self, symbol: &str, id: &str) -> Result<ShapeProperties, SyncError> {
        StatusResponse {
            status: self.status,
            message: self.message,
        }
        .into_result(symbol, id)?;
        Ok(self.properties)
    }
}
