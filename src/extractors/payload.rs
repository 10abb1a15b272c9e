//! Lenient JSON body: always yields an object map so that validation, not the
//! extractor, decides what is wrong with a request.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};

/// Top-level JSON object of the request body.
///
/// A missing body, invalid JSON or a non-object document becomes an empty map.
/// String values are trimmed and empty strings become `null`.
#[derive(Clone, Debug, Default)]
pub struct JsonPayload(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(JsonPayload(parse_object(&bytes)))
    }
}

fn parse_object(bytes: &[u8]) -> Map<String, Value> {
    if bytes.is_empty() {
        return Map::new();
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map.into_iter().map(|(k, v)| (k, normalize(v))).collect(),
        Ok(_) => {
            tracing::debug!("request body is not a JSON object; treating as empty");
            Map::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, "request body is not valid JSON; treating as empty");
            Map::new()
        }
    }
}

fn normalize(v: Value) -> Value {
    match v {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else if trimmed.len() == s.len() {
                Value::String(s)
            } else {
                Value::String(trimmed.to_string())
            }
        }
        other => other,
    }
}
