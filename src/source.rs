//! Document sources: where raw Markdown text comes from.
//!
//! [`FileSource`] reads from the local filesystem and [`HttpSource`] issues a
//! GET request. [`LocationSource`] picks between the two based on the
//! [`SourceLocation`] variant, so callers only ever see one contract.

use async_trait::async_trait;
use reqwest::Client;
use std::io::ErrorKind;
use std::time::Duration;

use crate::catalog::SourceLocation;
use crate::error::DocError;

/// Timeout applied to every remote fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, location: &SourceLocation) -> Result<String, DocError>;
}

#[derive(Debug, Clone, Default)]
pub struct FileSource;

impl FileSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self, location: &SourceLocation) -> Result<String, DocError> {
        let SourceLocation::Path(path) = location else {
            return Err(DocError::fetch_failed(location, "not a filesystem location"));
        };

        tracing::debug!("Reading documentation from {}", path.display());
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(DocError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(DocError::fetch_failed(location, e)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    timeout: Duration,
}

impl HttpSource {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, location: &SourceLocation) -> Result<String, DocError> {
        let SourceLocation::Url(url) = location else {
            return Err(DocError::fetch_failed(location, "not a remote location"));
        };

        tracing::info!("Fetching documentation from: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.describe(location, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocError::fetch_failed(location, format!("HTTP status {}", status)));
        }

        response.text().await.map_err(|e| self.describe(location, e))
    }
}

impl HttpSource {
    fn describe(&self, location: &SourceLocation, err: reqwest::Error) -> DocError {
        if err.is_timeout() {
            DocError::fetch_failed(location, format!("timed out after {:?}", self.timeout))
        } else {
            DocError::fetch_failed(location, err)
        }
    }
}

/// Dispatches each location to the file or HTTP strategy.
#[derive(Debug, Clone)]
pub struct LocationSource {
    files: FileSource,
    http: HttpSource,
}

impl LocationSource {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            files: FileSource::new(),
            http: HttpSource::new()?,
        })
    }

    pub fn with_http(http: HttpSource) -> Self {
        Self {
            files: FileSource::new(),
            http,
        }
    }
}

#[async_trait]
impl DocumentSource for LocationSource {
    async fn fetch(&self, location: &SourceLocation) -> Result<String, DocError> {
        match location {
            SourceLocation::Path(_) => self.files.fetch(location).await,
            SourceLocation::Url(_) => self.http.fetch(location).await,
        }
    }
}
