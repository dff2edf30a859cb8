//! services/portal/src/adapters/http.rs
//!
//! The HTTP adapter shared by every remote service port. Requests go to a fixed
//! base URL and carry the session token as the raw `Authorization` header value.

use std::time::Duration;

use alumnos_core::domain::ServerNotice;
use alumnos_core::ports::{PortError, PortResult};
use regex::Regex;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// File name used when a download carries no usable `Content-Disposition`.
pub const DEFAULT_DOWNLOAD_NAME: &str = "entrega";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the remote service ports over the platform's JSON API.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Creates a new `HttpApi` for the given origin.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn get(&self, token: &str, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header(header::AUTHORIZATION, token)
    }

    pub(crate) fn post(&self, token: &str, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header(header::AUTHORIZATION, token)
    }

    pub(crate) fn put(&self, token: &str, path: &str) -> RequestBuilder {
        self.client
            .put(self.url(path))
            .header(header::AUTHORIZATION, token)
    }

    pub(crate) fn patch(&self, token: &str, path: &str) -> RequestBuilder {
        self.client
            .patch(self.url(path))
            .header(header::AUTHORIZATION, token)
    }

    /// A request for the endpoints used before a session exists.
    pub(crate) fn anonymous_post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Sends a request and turns non-success statuses into a `PortError`.
    pub(crate) async fn send(&self, request: RequestBuilder) -> PortResult<Response> {
        let request = request
            .build()
            .map_err(|e| PortError::Unexpected(format!("Failed to build request: {}", e)))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "Sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(%method, %path, %status, "Request failed");
        Err(status_error(status, &path, &body))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> PortResult<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Invalid response body: {}", e)))
    }

    /// Sends a request whose answer is an optional `{ message }` acknowledgement.
    pub(crate) async fn send_notice(&self, request: RequestBuilder) -> PortResult<ServerNotice> {
        let response = self.send(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

//=========================================================================================
// Response Helpers
//=========================================================================================

/// Maps a failed status to a port error, keeping the server's `message` when it sent one.
pub fn status_error(status: StatusCode, path: &str, body: &str) -> PortError {
    let message = serde_json::from_str::<ServerNotice>(body)
        .ok()
        .and_then(|notice| notice.message)
        .filter(|m| !m.is_empty());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
        StatusCode::NOT_FOUND => PortError::NotFound(message.unwrap_or_else(|| path.to_string())),
        _ => match message {
            Some(message) => PortError::Rejected(message),
            None => PortError::Unexpected(format!("{} answered {}", path, status)),
        },
    }
}

fn disposition_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"filename\*?=(?:UTF-8'')?"?([^";]+)"?"#).expect("static regex is valid")
    })
}

/// Extracts the file name from a `Content-Disposition` header value.
pub fn filename_from_disposition(value: Option<&str>) -> String {
    value
        .and_then(|v| disposition_pattern().captures(v))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_file_names() {
        assert_eq!(
            filename_from_disposition(Some(r#"attachment; filename="essay final.pdf""#)),
            "essay final.pdf"
        );
        assert_eq!(
            filename_from_disposition(Some("attachment; filename=notes.docx")),
            "notes.docx"
        );
        assert_eq!(
            filename_from_disposition(Some("attachment; filename*=UTF-8''tarea.png")),
            "tarea.png"
        );
        assert_eq!(filename_from_disposition(Some("inline")), DEFAULT_DOWNLOAD_NAME);
        assert_eq!(filename_from_disposition(None), DEFAULT_DOWNLOAD_NAME);
    }

    #[test]
    fn status_errors_keep_server_message() {
        let err = status_error(StatusCode::BAD_REQUEST, "/api/classes", r#"{"message":"Name taken"}"#);
        assert!(matches!(err, PortError::Rejected(m) if m == "Name taken"));

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "/api/classes", "oops");
        assert!(matches!(err, PortError::Unexpected(_)));

        let err = status_error(StatusCode::UNAUTHORIZED, "/api/user", "");
        assert!(matches!(err, PortError::Unauthorized));

        let err = status_error(StatusCode::NOT_FOUND, "/api/tasks/task/9", "");
        assert!(matches!(err, PortError::NotFound(p) if p == "/api/tasks/task/9"));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = HttpApi::with_client(Client::new(), "http://localhost:4000/");
        assert_eq!(api.url("/api/classes"), "http://localhost:4000/api/classes");
    }
}
