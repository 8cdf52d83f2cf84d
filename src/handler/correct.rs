//! `/correct` endpoint

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::request::{read_json, RequestError};
use crate::config::AppState;
use crate::correction;
use crate::http;
use crate::logger;

#[derive(Debug, Deserialize)]
struct CorrectionRequest {
    name: String,
    #[serde(rename = "type", default)]
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct CorrectionResponse<'a> {
    original: &'a str,
    corrected: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    confidence: f64,
}

pub async fn handle<B>(
    body: B,
    state: &AppState,
    limit: usize,
) -> Result<Response<Full<Bytes>>, RequestError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let request: CorrectionRequest = read_json(body, limit).await?;
    let table = state.table().await;
    let result = correction::correct(&table, request.category.as_deref(), &request.name);
    if result.corrected != request.name {
        logger::log_correction(request.category.as_deref(), &request.name, &result.corrected);
    }

    Ok(http::build_json_response(
        StatusCode::OK,
        &CorrectionResponse {
            original: &request.name,
            corrected: result.corrected,
            category: request.category.as_deref(),
            confidence: result.confidence,
        },
    ))
}
