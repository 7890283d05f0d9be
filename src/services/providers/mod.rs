/// Metadata source abstraction
///
/// The upstream movie metadata API is consumed through this trait so the
/// resilient fetch policy can be exercised against test doubles. Failures
/// are classified into `UpstreamError` variants at this boundary; the
/// policy layer decides per variant whether to fall back or propagate.
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::models::{Category, MovieSummary};

pub mod tmdb;

/// Classified failure from the metadata source.
///
/// Timeouts and connection errors are transient; a non-success status may
/// mean "does not exist" on single-resource lookups. Callers must be able
/// to tell these apart, so classification happens here rather than in the
/// fallback logic.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream connection failed: {0}")]
    Connect(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream body malformed: {0}")]
    Body(String),
}

impl UpstreamError {
    /// Maps a reqwest transport error onto the taxonomy.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Body(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Connect(err.to_string())
        }
    }

    /// The HTTP status for `Status` failures, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Trait for movie metadata providers
///
/// One implementation talks to the real TMDB-shaped API; tests substitute
/// mocks. All list results come back untruncated; response-size policy
/// belongs to the catalog layer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Cheap reachability check against one endpoint.
    ///
    /// Used before a category batch to avoid paying one timeout per
    /// category when the upstream is down.
    async fn probe(&self) -> Result<(), UpstreamError>;

    /// Fetch the movie listing for one category.
    async fn list_category(&self, category: Category) -> Result<Vec<MovieSummary>, UpstreamError>;

    /// Search movies by title, returning the raw response page.
    async fn search(&self, query: &str) -> Result<Value, UpstreamError>;

    /// Fetch full details for one movie, returning the raw response body.
    async fn details(&self, movie_id: u64) -> Result<Value, UpstreamError>;

    /// Fetch the upstream recommendations list for one movie.
    async fn recommendations(&self, movie_id: u64) -> Result<Vec<MovieSummary>, UpstreamError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
