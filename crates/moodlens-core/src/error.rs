//! Error types for `moodlens-core`.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors surfaced to callers of the read and write paths.
///
/// Per-comment validation failures during ingestion are not represented here;
/// they are absorbed into [`crate::ingest::IngestReport`].
#[derive(Debug, Error)]
pub enum Error {
  #[error("video not found: {0}")]
  VideoNotFound(String),

  #[error("invalid query: {0}")]
  InvalidQuery(String),

  /// The video metadata of an ingestion batch was rejected; nothing was
  /// written.
  #[error("invalid video metadata: {0}")]
  InvalidVideo(#[source] ValidationError),

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error as [`Error::StoreUnavailable`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreUnavailable(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
