// backend/envelope.rs - schema validation at the network boundary
//
// Every backend response goes through `read_envelope`, which turns HTTP status, body shape and the
// `success` flag into a typed Result before any caller looks at the payload.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::models::WirePagination;
use super::BackendError;

/// `{ success, message, data, pagination, token }` with everything optional on the wire
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub pagination: Option<WirePagination>,
    #[serde(default)]
    pub token: Option<String>,
}

impl Envelope {
    /// Decode `data` into `T`, treating absence as a schema violation
    pub fn data<T: DeserializeOwned>(&mut self) -> Result<T, BackendError> {
        let data = self
            .data
            .take()
            .ok_or_else(|| BackendError::Schema("response is missing 'data'".to_string()))?;
        serde_json::from_value(data).map_err(|e| BackendError::Schema(e.to_string()))
    }

    pub fn pagination(&mut self) -> Result<WirePagination, BackendError> {
        self.pagination
            .take()
            .ok_or_else(|| BackendError::Schema("response is missing 'pagination'".to_string()))
    }
}

pub(crate) async fn read_envelope(response: reqwest::Response) -> Result<Envelope, BackendError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    parse_envelope(status, &bytes)
}

pub(crate) fn parse_envelope(status: reqwest::StatusCode, bytes: &[u8]) -> Result<Envelope, BackendError> {
    let body: Option<Value> = serde_json::from_slice(bytes).ok();

    if !status.is_success() {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("backend responded with {}", status));
        return Err(BackendError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = body.ok_or_else(|| BackendError::Schema("response body is not JSON".to_string()))?;
    let envelope: Envelope =
        serde_json::from_value(body).map_err(|e| BackendError::Schema(e.to_string()))?;

    if envelope.success == Some(false) {
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: envelope
                .message
                .clone()
                .unwrap_or_else(|| "request failed".to_string()),
        });
    }

    Ok(envelope)
}
