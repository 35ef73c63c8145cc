//! Whole-response cache for idempotent endpoints.
//!
//! Successful `GET`/`HEAD` responses are stored in the shared cache backend
//! under `page:<METHOD>:<path?query>` for the configured page TTL. This layer
//! expires independently of the property snapshot cache beneath it.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::context::ApiContext;
use crate::error::ApiError;
use property_persistence::CacheBackendExt;

/// Stored form of a cached response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPage {
    pub status: u16,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub body: String,
}

impl IntoResponse for CachedPage {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);

        let headers = response.headers_mut();
        for (name, value) in [
            (header::CONTENT_TYPE, self.content_type),
            (header::CACHE_CONTROL, self.cache_control),
        ] {
            if let Some(value) = value.and_then(|v| HeaderValue::from_str(&v).ok()) {
                headers.insert(name, value);
            }
        }
        response
    }
}

/// Cache key for a request.
#[must_use]
pub fn page_key(method: &Method, uri: &Uri) -> String {
    let target = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());
    format!("page:{method}:{target}")
}

/// Middleware serving and storing whole responses.
///
/// Cache failures are logged and bypassed; the wrapped handler still runs.
pub async fn page_cache(State(ctx): State<ApiContext>, request: Request, next: Next) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    let key = page_key(request.method(), request.uri());

    match ctx.cache.get_json::<CachedPage>(&key).await {
        Ok(Some(page)) => {
            tracing::debug!(key = %key, "Page cache hit");
            return page.into_response();
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Page cache read failed, bypassing");
        }
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return buffer_failure(&e),
    };

    let max_age = format!("max-age={}", ctx.page_ttl.as_secs());
    if let Ok(value) = HeaderValue::from_str(&max_age) {
        parts.headers.insert(header::CACHE_CONTROL, value);
    }

    match std::str::from_utf8(&bytes) {
        Ok(text) => {
            let page = CachedPage {
                status: parts.status.as_u16(),
                content_type: header_string(&parts.headers, &header::CONTENT_TYPE),
                cache_control: Some(max_age),
                body: text.to_string(),
            };
            match ctx.cache.set_json(&key, &page, ctx.page_ttl).await {
                Ok(()) => tracing::debug!(key = %key, "Page cached"),
                Err(e) => tracing::warn!(key = %key, error = %e, "Page cache write failed"),
            }
        }
        Err(_) => tracing::debug!(key = %key, "Skipping page cache for non-UTF-8 body"),
    }

    Response::from_parts(parts, Body::from(bytes))
}

fn buffer_failure(error: &axum::Error) -> Response {
    ApiError::Internal(format!("failed to buffer response body: {error}")).into_response()
}

fn header_string(headers: &axum::http::HeaderMap, name: &header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key_includes_method_and_query() {
        let uri: Uri = "/properties/?page=2".parse().unwrap();
        assert_eq!(page_key(&Method::GET, &uri), "page:GET:/properties/?page=2");

        let uri: Uri = "/properties/".parse().unwrap();
        assert_eq!(page_key(&Method::HEAD, &uri), "page:HEAD:/properties/");
    }

    #[tokio::test]
    async fn test_buffer_failure_renders_json_error() {
        let response = buffer_failure(&axum::Error::new("connection reset"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(
            json["error"]["message"],
            "Internal server error: failed to buffer response body: connection reset"
        );
    }

    #[tokio::test]
    async fn test_cached_page_into_response() {
        let page = CachedPage {
            status: 200,
            content_type: Some("application/json".to_string()),
            cache_control: Some("max-age=900".to_string()),
            body: r#"{"count":0,"properties":[]}"#.to_string(),
        };

        let response = page.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=900");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"count":0,"properties":[]}"#);
    }
}
