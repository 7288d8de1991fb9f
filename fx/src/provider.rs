//! Rate feed sources.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// Daily reference rates published by the European Central Bank.
pub const ECB_DAILY_FEED_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-daily.xml";

/// Trait for rate feed sources.
#[async_trait]
pub trait RateFeedSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Retrieve the raw feed document.
    async fn fetch(&self) -> FxResult<Vec<u8>>;
}

/// Fetches the feed over HTTP.
pub struct HttpFeedSource {
    url: String,
    client: reqwest::Client,
}

impl HttpFeedSource {
    /// Create a source for the given URL. Without a timeout the request
    /// waits for as long as the transport allows.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> FxResult<Self> {
        let url = url.into();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| FxError::FeedUnavailable {
            source_name: url.clone(),
            reason: format!("unable to build HTTP client: {}", e),
        })?;

        Ok(Self { url, client })
    }

    /// Create a source for the ECB daily feed.
    pub fn ecb() -> FxResult<Self> {
        Self::new(ECB_DAILY_FEED_URL, None)
    }
}

#[async_trait]
impl RateFeedSource for HttpFeedSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> FxResult<Vec<u8>> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "Rate feed request failed");
            FxError::FeedUnavailable {
                source_name: self.url.clone(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = %status, "Rate feed returned non-success status");
            return Err(FxError::FeedUnavailable {
                source_name: self.url.clone(),
                reason: format!("status {}", status),
            });
        }

        let body = response.bytes().await.map_err(|e| FxError::FeedUnavailable {
            source_name: self.url.clone(),
            reason: format!("unable to read body: {}", e),
        })?;

        debug!(url = %self.url, bytes = body.len(), "Fetched rate feed");
        Ok(body.to_vec())
    }
}

/// Serves a fixed document. Used for offline runs and tests.
pub struct StaticFeedSource {
    name: String,
    document: Option<Vec<u8>>,
}

impl StaticFeedSource {
    /// Create a source that always returns `document`.
    pub fn new(name: impl Into<String>, document: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            document: Some(document.into()),
        }
    }

    /// Create a source that always fails as if the feed were unreachable.
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: None,
        }
    }

    /// Load a document from disk.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let document = std::fs::read(path).map_err(|e| FxError::FeedUnavailable {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(path.display().to_string(), document))
    }
}

#[async_trait]
impl RateFeedSource for StaticFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> FxResult<Vec<u8>> {
        self.document.clone().ok_or_else(|| FxError::FeedUnavailable {
            source_name: self.name.clone(),
            reason: "source is offline".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one connection with a canned HTTP response.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/rates.xml", addr)
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticFeedSource::new("fixture", "<Envelope/>");
        assert_eq!(source.name(), "fixture");
        assert_eq!(source.fetch().await.unwrap(), b"<Envelope/>".to_vec());
    }

    #[tokio::test]
    async fn test_unavailable_source() {
        let source = StaticFeedSource::unavailable("offline");
        let result = source.fetch().await;
        assert!(matches!(result, Err(FxError::FeedUnavailable { .. })));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let result = StaticFeedSource::from_file("/nonexistent/rates.xml");
        assert!(matches!(result, Err(FxError::FeedUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_http_source_error_status() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let source = HttpFeedSource::new(url, Some(Duration::from_secs(5))).unwrap();

        match source.fetch().await {
            Err(FxError::FeedUnavailable { reason, .. }) => assert!(reason.contains("503"), "{reason}"),
            other => panic!("expected FeedUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_success() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: 11\r\nConnection: close\r\n\r\n<Envelope/>",
        )
        .await;
        let source = HttpFeedSource::new(url, Some(Duration::from_secs(5))).unwrap();
        assert_eq!(source.fetch().await.unwrap(), b"<Envelope/>".to_vec());
    }

    #[tokio::test]
    async fn test_http_source_transport_error() {
        // Port 9 on localhost is reserved for discard and normally closed.
        let source = HttpFeedSource::new("http://127.0.0.1:9/rates.xml", Some(Duration::from_secs(2)))
            .unwrap();
        let result = source.fetch().await;
        assert!(matches!(result, Err(FxError::FeedUnavailable { .. })));
    }
}
