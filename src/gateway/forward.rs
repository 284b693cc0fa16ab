//! Request forwarding to downstream services

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::GatewayState;
use crate::error::{AppError, AppResult};

/// Forward `/api/{service}` to the downstream root
pub async fn forward_root(
    State(state): State<GatewayState>,
    Path(service): Path<String>,
    request: Request,
) -> AppResult<Response> {
    forward(state, service, String::new(), request).await
}

/// Forward `/api/{service}/{path}` to the downstream sub-path
pub async fn forward_path(
    State(state): State<GatewayState>,
    Path((service, path)): Path<(String, String)>,
    request: Request,
) -> AppResult<Response> {
    forward(state, service, path, request).await
}

async fn forward(
    state: GatewayState,
    service: String,
    path: String,
    request: Request,
) -> AppResult<Response> {
    let base = state
        .resolve(&service)
        .ok_or_else(|| AppError::NotFound(format!("Unknown service: {}", service)))?
        .to_string();

    let mut url = format!("{}/{}", base.trim_end_matches('/'), path);
    if let Some(query) = request.uri().query() {
        url.push('?');
        url.push_str(query);
    }

    let method = request.method().clone();
    let headers = forwardable_headers(request.headers());
    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| AppError::Gateway(format!("Failed to read request body: {}", e)))?;

    tracing::debug!("Forwarding {} {} to {}", method, path, service);

    let upstream = state
        .client
        .request(method, &url)
        .headers(headers)
        .body(body.to_vec())
        .send()
        .await
        .map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AppError::ServiceUnavailable {
                    service: service.clone(),
                    reason: e.to_string(),
                }
            } else {
                AppError::Gateway(e.to_string())
            }
        })?;

    relay(upstream).await
}

/// Everything except hop-by-hop headers goes through; the bearer token in
/// particular is forwarded verbatim.
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        if name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        out.insert(name.clone(), value.clone());
    }
    out
}

/// Upstream headers kept on a byte-for-byte relay. Hop-by-hop headers stay
/// behind, and the length is recomputed from the relayed body.
fn relayable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        if name == header::CONNECTION
            || name == header::TRANSFER_ENCODING
            || name == header::CONTENT_LENGTH
        {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Binary report downloads are relayed byte for byte; everything else is
/// re-wrapped as JSON with the upstream status.
async fn relay(upstream: reqwest::Response) -> AppResult<Response> {
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .map_err(|e| AppError::Gateway(e.to_string()))?;
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.contains("application/pdf") || content_type.contains("spreadsheet") {
        let headers = relayable_headers(upstream.headers());
        let bytes = upstream
            .bytes()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        return Ok(response);
    }

    let text = upstream
        .text()
        .await
        .map_err(|e| AppError::Gateway(e.to_string()))?;
    let value: serde_json::Value = if text.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(&text)
            .map_err(|e| AppError::Gateway(format!("Invalid upstream JSON: {}", e)))?
    };

    Ok((status, Json(value)).into_response())
}
