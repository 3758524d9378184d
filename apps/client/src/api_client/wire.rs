//! Response decoding shared by the backend and auth clients.
//!
//! Bodies are parsed into typed results and fail closed: anything that is
//! not the expected shape becomes an error, never a partially filled value.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{ClientError, Result};

/// Keys checked, in order, for a human-readable error message.
const ERROR_KEYS: &[&str] = &["detail", "error", "msg", "error_description", "message"];

/// Pulls the first string-valued error key out of a JSON error body.
///
/// Non-string values (FastAPI's validation `detail` array, nested objects)
/// are skipped so the caller falls back to its generic message.
pub fn error_message(body: &Value) -> Option<String> {
    first_string(body, ERROR_KEYS)
}

/// First of `keys` whose value is a JSON string.
pub fn first_string(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find_map(|v| v.as_str())
        .map(str::to_string)
}

/// Turns a status code and raw body into the endpoint's result type.
///
/// - non-2xx is a failure whatever the body looks like
/// - a 2xx body with a non-null `error` field is a failure
/// - a 2xx body that does not decode as `T` is [`ClientError::MalformedResponse`]
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();

    if !(200..300).contains(&status) {
        return Err(ClientError::Server {
            status,
            message: parsed.as_ref().and_then(error_message),
        });
    }

    let value = parsed.ok_or_else(|| {
        ClientError::MalformedResponse(format!("status {status} body is not JSON"))
    })?;

    if let Some(err) = value.get("error").filter(|v| !v.is_null()) {
        return Err(ClientError::Server {
            status,
            message: err.as_str().map(str::to_string),
        });
    }

    serde_json::from_value(value).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}
