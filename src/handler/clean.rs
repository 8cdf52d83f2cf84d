//! `/clean` and `/clean/batch` endpoints

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::request::{read_json, RequestError};
use crate::clean::{clean_batch, clean_name, CleanProfile};
use crate::http;

#[derive(Debug, Deserialize)]
struct CleanRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct CleanResponse {
    cleaned_name: String,
}

#[derive(Debug, Deserialize)]
struct CleanBatchRequest {
    names: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CleanBatchResponse {
    cleaned: Vec<String>,
    cleaned_rows: usize,
}

pub async fn handle<B>(
    body: B,
    profile: CleanProfile,
    limit: usize,
) -> Result<Response<Full<Bytes>>, RequestError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let request: CleanRequest = read_json(body, limit).await?;
    let cleaned_name = clean_name(&request.name, profile);
    Ok(http::build_json_response(
        StatusCode::OK,
        &CleanResponse { cleaned_name },
    ))
}

/// Clean a list of names and drop duplicate results
pub async fn handle_batch<B>(
    body: B,
    profile: CleanProfile,
    limit: usize,
) -> Result<Response<Full<Bytes>>, RequestError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let request: CleanBatchRequest = read_json(body, limit).await?;
    let cleaned = clean_batch(&request.names, profile);
    Ok(http::build_json_response(
        StatusCode::OK,
        &CleanBatchResponse {
            cleaned_rows: cleaned.len(),
            cleaned,
        },
    ))
}
