//! HTTP fetch capability — the only network seam of the fetch pipeline.

use crate::error::{Error, Result};
use std::time::Duration;

/// Status and body of one completed HTTP exchange
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl PageResponse {
    /// Create a new PageResponse
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Abstraction over page fetching, enabling testability.
///
/// Implementations return `Ok` for any response the server produced, whatever its
/// status, and [`Error::Transport`] when no complete response was received.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// GET `url`
    async fn fetch(&self, url: &str) -> Result<PageResponse>;
}

/// Production [`PageSource`] backed by a shared [`reqwest::Client`].
#[derive(Clone, Debug)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    /// Client with the transport's default behavior (redirects followed, no overall timeout)
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    /// Client with an overall per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config("http_client", format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<PageResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, &e))?;

        Ok(PageResponse::new(status, body.to_vec()))
    }
}

fn transport_error(url: &str, e: &reqwest::Error) -> Error {
    let message = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else if e.is_body() || e.is_decode() {
        format!("failed to read response body: {e}")
    } else {
        e.to_string()
    };
    Error::Transport {
        url: url.to_string(),
        message,
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_status_and_body_for_any_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpPageSource::new().unwrap();

        let ok = source.fetch(&format!("{}/ok", server.uri())).await.unwrap();
        assert_eq!(ok, PageResponse::new(200, "<html>hi</html>"));

        let broken = source
            .fetch(&format!("{}/broken", server.uri()))
            .await
            .unwrap();
        assert_eq!(broken.status, 503);
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is known to be closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpPageSource::new().unwrap();
        let result = source.fetch(&format!("http://{addr}/page")).await;

        match result {
            Err(Error::Transport { url, .. }) => assert!(url.ends_with("/page")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let source = HttpPageSource::with_timeout(Duration::from_millis(100)).unwrap();
        let result = source.fetch(&format!("{}/slow", server.uri())).await;

        assert!(matches!(result, Err(Error::Transport { .. })));
    }
}
