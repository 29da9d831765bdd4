// src/client.rs
use crate::errors::ClientError;
use crate::podcast::Podcast;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

// ===== client seam
#[async_trait]
pub trait PodcastClient: Send + Sync {
    /// Fetches every podcast the backend knows about. No filtering, no caching.
    async fn list_all(&self) -> Result<Vec<Podcast>, ClientError>;
}

// ===== Live http client
pub struct HttpPodcastClient {
    client: Client,
    podcasts_url: Url,
}

impl HttpPodcastClient {
    pub fn new(api_base_url: &Url, timeout: Duration) -> Result<Self, ClientError> {
        const APP_USER_AGENT: &str = concat!("podroute/", env!("CARGO_PKG_VERSION"));

        let client: Client =
            reqwest::Client::builder().user_agent(APP_USER_AGENT).timeout(timeout).build()?;

        // Url::join drops the last path segment unless the base ends with '/'.
        let mut base = api_base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let podcasts_url = base.join("podcasts")?;

        Ok(Self { client, podcasts_url })
    }

    pub fn podcasts_url(&self) -> &Url {
        &self.podcasts_url
    }
}

#[async_trait]
impl PodcastClient for HttpPodcastClient {
    async fn list_all(&self) -> Result<Vec<Podcast>, ClientError> {
        info!("HttpPodcastClient: listing podcasts from {}", self.podcasts_url);
        let response = self.client.get(self.podcasts_url.clone()).send().await?;

        if !response.status().is_success() {
            warn!("HttpPodcastClient: backend answered {}", response.status());
            return Err(ClientError::BadStatus {
                status: response.status().as_u16(),
                url: self.podcasts_url.to_string(),
            });
        }

        let body = response.text().await?;
        let podcasts: Vec<Podcast> = serde_json::from_str(&body)?;
        debug!("HttpPodcastClient: received {} podcasts", podcasts.len());
        Ok(podcasts)
    }
}

// ===== In-memory client for fixtures and tests
#[derive(Default)]
pub struct InMemoryPodcastClient {
    podcasts: Mutex<Vec<Podcast>>,
    delay: Option<Duration>,
    fail_with_status: Option<u16>,
    calls: AtomicUsize,
}

impl InMemoryPodcastClient {
    pub fn new(podcasts: Vec<Podcast>) -> Self {
        Self { podcasts: Mutex::new(podcasts), ..Self::default() }
    }

    /// Loads a JSON array of podcasts, in the same shape the backend returns.
    pub fn from_fixture_file(path: &Path) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            ClientError::FixtureUnreadable { path: path.display().to_string(), source }
        })?;
        let podcasts: Vec<Podcast> = serde_json::from_str(&content)?;
        info!("InMemoryPodcastClient: loaded {} podcasts from {}", podcasts.len(), path.display());
        Ok(Self::new(podcasts))
    }

    // Builder methods
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_with_status(mut self, status: u16) -> Self {
        self.fail_with_status = Some(status);
        self
    }

    pub fn set_podcasts(&self, podcasts: Vec<Podcast>) {
        if let Ok(mut guard) = self.podcasts.lock() {
            *guard = podcasts;
        }
    }

    /// Number of `list_all` calls seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PodcastClient for InMemoryPodcastClient {
    async fn list_all(&self) -> Result<Vec<Podcast>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = self.fail_with_status {
            return Err(ClientError::BadStatus { status, url: "memory://podcasts".to_string() });
        }
        let podcasts = match self.podcasts.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Ok(podcasts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::podcast::PodcastId;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn podcast(id: i64, title: &str) -> Podcast {
        Podcast::new(PodcastId::new(id), title.to_string(), None, None, None)
    }

    /// Serves exactly one HTTP response on a local port and returns the API
    /// base URL pointing at it.
    async fn serve_once(status_line: &'static str, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            assert!(request.starts_with(b"GET /api/podcasts "));

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        Url::parse(&format!("http://{}/api", addr)).unwrap()
    }

    #[tokio::test]
    async fn http_client_decodes_podcast_array() {
        let base = serve_once("200 OK", r#"[{"id": 1, "title": "One"}, {"id": 7, "title": "Seven", "feed_url": "http://example.com/7"}]"#).await;
        let client = HttpPodcastClient::new(&base, Duration::from_secs(5)).unwrap();

        let podcasts = client.list_all().await.unwrap();

        assert_eq!(podcasts.len(), 2);
        assert_eq!(podcasts[1].id(), PodcastId::new(7));
        assert_eq!(podcasts[1].feed_url(), Some("http://example.com/7"));
    }

    #[tokio::test]
    async fn http_client_reports_non_success_status() {
        let base = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;
        let client = HttpPodcastClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.list_all().await.unwrap_err();

        match err {
            ClientError::BadStatus { status, url } => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/api/podcasts"));
            }
            other => panic!("expected BadStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_client_reports_malformed_body() {
        let base = serve_once("200 OK", r#"[{"id": "seven""#).await;
        let client = HttpPodcastClient::new(&base, Duration::from_secs(5)).unwrap();

        let result = client.list_all().await;
        assert!(matches!(result, Err(ClientError::DecodeError(_))));
    }

    #[tokio::test]
    async fn in_memory_client_returns_whole_collection_and_counts_calls() {
        let client = InMemoryPodcastClient::new(vec![podcast(1, "One"), podcast(7, "Seven")]);

        let first = client.list_all().await.unwrap();
        let second = client.list_all().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn in_memory_client_can_fail() {
        let client = InMemoryPodcastClient::new(vec![]).failing_with_status(503);

        let result = client.list_all().await;
        assert!(matches!(result, Err(ClientError::BadStatus { status: 503, .. })));
    }

    #[test]
    fn http_client_appends_podcasts_path_to_base() {
        let base = Url::parse("http://localhost:8080/api").unwrap();
        let client = HttpPodcastClient::new(&base, Duration::from_secs(1)).unwrap();
        assert_eq!(client.podcasts_url().as_str(), "http://localhost:8080/api/podcasts");

        let base = Url::parse("http://localhost:8080/api/").unwrap();
        let client = HttpPodcastClient::new(&base, Duration::from_secs(1)).unwrap();
        assert_eq!(client.podcasts_url().as_str(), "http://localhost:8080/api/podcasts");
    }

    #[test]
    fn fixture_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("podroute-fixture-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"id": 3, "title": "Three"}]"#).unwrap();

        let client = InMemoryPodcastClient::from_fixture_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let podcasts = rt.block_on(client.list_all()).unwrap();
        assert_eq!(podcasts.len(), 1);
        assert_eq!(podcasts[0].id(), PodcastId::new(3));
        assert_eq!(podcasts[0].title(), "Three");
    }
}
