use axum::http::header;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;

/// Scheme and host of the inbound request.
///
/// Stored file references are relative; the read API resolves them into
/// absolute URLs against this origin at response time, so the same record
/// renders correctly whatever name the service is reached under. Honors
/// `X-Forwarded-Proto` and `X-Forwarded-Host` for deployments behind a
/// TLS-terminating proxy.
#[derive(Debug, Clone)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    /// Resolve an absolute path (`/media/...`) into a full URL.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.host, path)
    }
}

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "http".to_string());

        let host = parts
            .headers
            .get("x-forwarded-host")
            .or_else(|| parts.headers.get(header::HOST))
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            // HTTP/2 carries the host in the :authority pseudo-header.
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .ok_or_else(|| AppError::Validation("Request has no Host header".into()))?;

        Ok(RequestOrigin { scheme, host })
    }
}
