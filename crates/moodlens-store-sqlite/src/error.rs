//! Error type for `moodlens-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column holds a value the domain types cannot represent.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("count {0} does not fit in an SQLite integer")]
  CountOutOfRange(u64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
