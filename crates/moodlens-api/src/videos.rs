//! Handlers for `/videos` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/videos/{video_id}` | 404 if not found |
//! | `POST` | `/videos/{video_id}/comments` | Body: [`IngestBody`]; returns the ingestion report |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use moodlens_core::{
  Error,
  ingest::{IngestBatch, IngestItem, IngestReport, RejectedComment, ingest_with_rejections},
  store::CommentStore,
  validate::ValidationError,
  video::{Video, VideoMetadata},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /videos/{video_id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(video_id): Path<String>,
) -> Result<Json<Video>, ApiError>
where
  S: CommentStore,
{
  let video = store
    .get_video(&video_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::from(Error::VideoNotFound(video_id.clone())))?;
  Ok(Json(video))
}

// ─── Ingest ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /videos/{video_id}/comments`.
///
/// Comments stay as raw JSON until [`IngestBody::decode_comments`], so one
/// malformed entry is reported on its own instead of failing the request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestBody {
  #[serde(default)]
  pub video:    VideoMetadata,
  #[serde(default)]
  pub comments: Vec<Value>,
}

impl IngestBody {
  /// Split the comment list into decodable items and malformed entries.
  pub fn decode_comments(comments: Vec<Value>) -> (Vec<IngestItem>, Vec<RejectedComment>) {
    let mut items = Vec::with_capacity(comments.len());
    let mut rejected = Vec::new();

    for value in comments {
      let comment_id = value
        .get("commentId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
      match serde_json::from_value::<IngestItem>(value) {
        Ok(item) => items.push(item),
        Err(e) => rejected.push(RejectedComment {
          comment_id,
          error: ValidationError::Malformed(e.to_string()),
        }),
      }
    }

    (items, rejected)
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedBody {
  pub comment_id: String,
  pub reason:     String,
}

/// Response body for an ingestion run.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
  pub inserted: usize,
  pub updated:  usize,
  pub skipped:  usize,
  pub rejected: Vec<RejectedBody>,
}

impl From<IngestReport> for IngestResponse {
  fn from(r: IngestReport) -> Self {
    IngestResponse {
      inserted: r.inserted,
      updated:  r.updated,
      skipped:  r.skipped,
      rejected: r
        .rejected
        .into_iter()
        .map(|rc| RejectedBody {
          comment_id: rc.comment_id,
          reason:     rc.error.to_string(),
        })
        .collect(),
    }
  }
}

/// `POST /videos/{video_id}/comments`: upserts the video and every valid
/// comment. Invalid or malformed comments are listed under `rejected`.
pub async fn ingest<S>(
  State(store): State<Arc<S>>,
  Path(video_id): Path<String>,
  body: Result<Json<IngestBody>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError>
where
  S: CommentStore,
{
  let Json(body) = body?;
  let (items, malformed) = IngestBody::decode_comments(body.comments);
  let batch = IngestBatch {
    video_id,
    video: body.video,
    items,
  };
  let report = ingest_with_rejections(store.as_ref(), batch, malformed).await?;
  Ok(Json(report.into()))
}
