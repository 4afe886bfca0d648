// Hub HTTP client.
// Handles session headers and request/response processing for same-origin API calls.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, COOKIE, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::config::Config;
use crate::error::{FetchError, HubError, Result};

/// Client for the hub's JSON endpoints, authenticated by the session cookie.
#[derive(Debug, Clone)]
pub struct HubClient {
    client: Client,
    origin: String,
}

impl HubClient {
    /// Create a client for `origin`, optionally carrying a session id.
    pub fn new(origin: &str, session: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("hubnav"));

        if let Some(session) = session {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&format!("sessionid={}", session))
                    .map_err(|e| HubError::Config(format!("session id: {}", e)))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.origin, config.session.as_deref())
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.origin, endpoint)
    }

    /// Make a GET request against the hub.
    pub async fn get(&self, endpoint: &str) -> std::result::Result<Response, FetchError> {
        let url = self.url(endpoint);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        check_response(response).await
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> std::result::Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Unauthorized),
        status => Err(FetchError::Status {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_origin() {
        let client = HubClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.origin(), "http://localhost:8000");
        assert_eq!(
            client.url("/api/user/roles/"),
            "http://localhost:8000/api/user/roles/"
        );
    }

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(
            http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let response = check_response(response(200, "[]")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_statuses_are_unauthorized() {
        for status in [401, 403] {
            let result = check_response(response(status, "denied")).await;
            assert!(matches!(result, Err(FetchError::Unauthorized)), "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_other_status_keeps_body() {
        let result = check_response(response(500, "boom")).await;
        match result {
            Err(FetchError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {:?}", other.map(|r| r.status())),
        }
    }

    #[test]
    fn test_invalid_session_is_config_error() {
        let err = HubClient::new("http://localhost:8000", Some("bad\nvalue")).unwrap_err();
        assert!(matches!(err, HubError::Config(_)));
    }
}
