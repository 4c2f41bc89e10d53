use super::fetcher::fetch_with_timeout;
use crate::models::{Records, User};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use reqwest::{Client, Url};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, timeout_at};

/// Why a single tier failed to produce records.
///
/// These never reach the consumer directly: a remote failure triggers the
/// fallback tier, and only the fallback failure is surfaced (wrapped in
/// [`AcquireError`]).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("invalid user payload: {0}")]
    Decode(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every tier has been tried and none produced records.
#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("Fallback load failed: {0}")]
    AllSourcesExhausted(#[source] SourceError),
}

/// One place user records can be loaded from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load the full record set. Each call performs a fresh attempt.
    async fn load(&self) -> Result<Vec<User>, SourceError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// Which tier produced the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Remote,
    Local,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Remote => f.write_str("remote"),
            Tier::Local => f.write_str("local"),
        }
    }
}

/// Successful result of one acquisition cycle.
#[derive(Debug)]
pub struct Acquisition {
    pub users: Records,
    pub tier: Tier,

    /// Why the remote tier was skipped, when the records came from the fallback
    pub remote_error: Option<SourceError>,
}

pub(crate) fn decode_users(body: &[u8]) -> Result<Vec<User>, SourceError> {
    serde_json::from_slice(body).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Remote API tier: GET with a timeout, 2xx required, JSON array body.
pub struct RemoteSource {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl RemoteSource {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RecordSource for RemoteSource {
    async fn load(&self) -> Result<Vec<User>, SourceError> {
        // The body read shares the request's deadline so a stalled stream
        // cannot outlive the budget.
        let deadline = Instant::now() + self.timeout;
        let response = fetch_with_timeout(&self.client, &self.endpoint, self.timeout).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status.as_u16()));
        }

        let body = timeout_at(deadline, response.bytes())
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))?
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        decode_users(&body)
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

/// Bundled dataset tier.
///
/// The file is re-read on every call; nothing is cached between cycles.
pub struct LocalSource {
    path: Utf8PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for LocalSource {
    async fn load(&self) -> Result<Vec<User>, SourceError> {
        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        decode_users(&body)
    }

    fn describe(&self) -> String {
        self.path.to_string()
    }
}

/// Try `primary` once; if it fails for any reason, try `fallback` once.
///
/// The primary failure is not surfaced as an error, but it is logged and
/// kept on [`Acquisition::remote_error`].
pub async fn first_available(
    primary: &dyn RecordSource,
    fallback: &dyn RecordSource,
) -> Result<Acquisition, AcquireError> {
    let remote_error = match primary.load().await {
        Ok(users) => {
            tracing::info!("Loaded {} users from {}", users.len(), primary.describe());
            return Ok(Acquisition {
                users: Arc::from(users),
                tier: Tier::Remote,
                remote_error: None,
            });
        }
        Err(e) => {
            tracing::warn!(
                "Remote source {} unavailable ({}), falling back to {}",
                primary.describe(),
                e,
                fallback.describe()
            );
            e
        }
    };

    match fallback.load().await {
        Ok(users) => {
            tracing::info!(
                "Loaded {} users from fallback {}",
                users.len(),
                fallback.describe()
            );
            Ok(Acquisition {
                users: Arc::from(users),
                tier: Tier::Local,
                remote_error: Some(remote_error),
            })
        }
        Err(e) => {
            tracing::error!("Fallback {} failed: {}", fallback.describe(), e);
            Err(AcquireError::AllSourcesExhausted(e))
        }
    }
}

/// Remote-first data source with a single local fallback tier.
pub struct FallbackDataSource {
    remote: Box<dyn RecordSource>,
    local: Box<dyn RecordSource>,
}

impl FallbackDataSource {
    pub fn new<R, L>(remote: R, local: L) -> Self
    where
        R: RecordSource + 'static,
        L: RecordSource + 'static,
    {
        Self {
            remote: Box::new(remote),
            local: Box::new(local),
        }
    }

    /// Run one acquisition cycle: remote, then local, each attempted exactly once.
    pub async fn acquire(&self) -> Result<Acquisition, AcquireError> {
        first_available(self.remote.as_ref(), self.local.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Company;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn user(id: u64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            username: name.to_lowercase(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_string(),
            company: Company {
                name: "Acme".to_string(),
            },
        }
    }

    fn mock_source(name: &'static str) -> MockRecordSource {
        let mut source = MockRecordSource::new();
        source.expect_describe().return_const(name.to_string());
        source
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let mut remote = mock_source("remote");
        remote
            .expect_load()
            .times(1)
            .returning(|| Ok(vec![user(1, "Amy")]));
        let mut local = mock_source("local");
        local.expect_load().times(0);

        let source = FallbackDataSource::new(remote, local);
        let acquisition = source.acquire().await.unwrap();

        assert_eq!(acquisition.tier, Tier::Remote);
        assert_eq!(acquisition.users.len(), 1);
        assert!(acquisition.remote_error.is_none());
    }

    #[tokio::test]
    async fn test_primary_failure_uses_fallback_once() {
        let mut remote = mock_source("remote");
        remote
            .expect_load()
            .times(1)
            .returning(|| Err(SourceError::Timeout(Duration::from_millis(8000))));
        let mut local = mock_source("local");
        local
            .expect_load()
            .times(1)
            .returning(|| Ok(vec![user(2, "Bob"), user(1, "Amy")]));

        let source = FallbackDataSource::new(remote, local);
        let acquisition = source.acquire().await.unwrap();

        assert_eq!(acquisition.tier, Tier::Local);
        assert_eq!(acquisition.users[0].name, "Bob");
        assert!(matches!(
            acquisition.remote_error,
            Some(SourceError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_both_tiers_fail() {
        let mut remote = mock_source("remote");
        remote
            .expect_load()
            .times(1)
            .returning(|| Err(SourceError::Transport("connection refused".to_string())));
        let mut local = mock_source("local");
        local
            .expect_load()
            .times(1)
            .returning(|| Err(SourceError::HttpStatus(404)));

        let source = FallbackDataSource::new(remote, local);
        let err = source.acquire().await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Fallback load failed: HTTP error! status: 404"
        );
    }

    #[test]
    fn test_decode_users_rejects_non_array() {
        let err = decode_users(br#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn test_local_source_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&vec![user(3, "Cat")]).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();

        let path = Utf8PathBuf::try_from(file.path().to_path_buf()).unwrap();
        let source = LocalSource::new(&path);
        let users = tokio_test::block_on(source.load()).unwrap();

        assert_eq!(users, vec![user(3, "Cat")]);
        assert_eq!(source.describe(), path.to_string());
    }

    #[test]
    fn test_local_source_rereads_on_every_call() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();
        file.flush().unwrap();

        let path = Utf8PathBuf::try_from(file.path().to_path_buf()).unwrap();
        let source = LocalSource::new(&path);
        assert!(tokio_test::block_on(source.load()).unwrap().is_empty());

        let json = serde_json::to_string(&vec![user(4, "Dan")]).unwrap();
        std::fs::write(&path, json).unwrap();
        assert_eq!(tokio_test::block_on(source.load()).unwrap().len(), 1);
    }

    #[test]
    fn test_local_source_missing_file() {
        let source = LocalSource::new("definitely/not/here.json");
        let err = tokio_test::block_on(source.load()).unwrap_err();

        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("definitely/not/here.json"));
    }
}
