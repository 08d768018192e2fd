//! The `CommentStore` trait.
//!
//! The trait covers both durable collections, comments and videos, and is
//! implemented by storage backends (e.g. `moodlens-store-sqlite`). The
//! ingestion, aggregation and query components are generic over it.

use std::future::Future;

use serde::Serialize;

use crate::{
  comment::{Comment, NewComment},
  video::{Video, VideoMetadata},
};

/// Whether an upsert created a record or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
  Inserted,
  Updated,
}

/// Abstraction over a moodlens storage backend.
///
/// Each upsert is atomic for its own record. There is no batch transaction:
/// concurrent writers for the same video may interleave per comment, which is
/// safe because every write is keyed by a unique id.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CommentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Videos ────────────────────────────────────────────────────────────

  /// Create the video if absent, otherwise merge the supplied (`Some`) fields
  /// into the stored record. `last_analyzed` is always set to now.
  fn upsert_video<'a>(
    &'a self,
    video_id: &'a str,
    metadata: &'a VideoMetadata,
  ) -> impl Future<Output = Result<Video, Self::Error>> + Send + 'a;

  /// Retrieve a video by id. Returns `None` if not found.
  fn get_video<'a>(
    &'a self,
    video_id: &'a str,
  ) -> impl Future<Output = Result<Option<Video>, Self::Error>> + Send + 'a;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Insert the comment, or overwrite every mutable field of the existing
  /// record with the same `comment_id`. `created_at` survives an overwrite;
  /// `updated_at` and the analysis timestamp are set to now.
  fn upsert_comment(
    &self,
    comment: NewComment,
  ) -> impl Future<Output = Result<UpsertOutcome, Self::Error>> + Send + '_;

  /// Retrieve a comment by its platform id. Returns `None` if not found.
  fn get_comment<'a>(
    &'a self,
    comment_id: &'a str,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + 'a;

  /// All comments for a video, in retrieval order.
  ///
  /// Retrieval order is the order in which comment ids were first inserted.
  /// It must be stable across calls; the query engine relies on it to break
  /// sort ties.
  fn list_comments<'a>(
    &'a self,
    video_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + 'a;
}
