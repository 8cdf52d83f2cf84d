//! Request body decoding shared by the JSON endpoints

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::Response;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::http;

/// Why a request body was rejected
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    BodyRead(String),
    #[error("malformed JSON body: {0}")]
    MalformedJson(#[source] serde_json::Error),
    /// Well-formed JSON with a missing or mistyped field
    #[error("invalid request fields: {0}")]
    InvalidField(#[source] serde_json::Error),
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::InvalidField(err),
            Category::Io | Category::Syntax | Category::Eof => Self::MalformedJson(err),
        }
    }
}

impl RequestError {
    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::BodyTooLarge { .. } => http::build_413_response(),
            _ => http::build_invalid_request_response(),
        }
    }
}

/// Collect at most `limit` bytes of `body` and decode them as `T`
pub async fn read_json<T, B>(body: B, limit: usize) -> Result<T, RequestError>
where
    T: DeserializeOwned,
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(RequestError::BodyTooLarge { limit });
        }
        Err(e) => return Err(RequestError::BodyRead(e.to_string())),
    };

    Ok(serde_json::from_slice(&bytes)?)
}
