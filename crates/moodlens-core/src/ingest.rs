//! The ingestion writer.
//!
//! Upserts a video, then validates and upserts each classified comment. A
//! comment that fails validation is skipped and reported; it never aborts the
//! rest of the batch. Store failures do abort, since nothing after them can
//! be trusted to land.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  comment::{Classification, RawComment},
  store::{CommentStore, UpsertOutcome},
  validate::{ValidationError, validate_comment, validate_video},
  video::VideoMetadata,
};

// ─── Input ───────────────────────────────────────────────────────────────────

/// One raw comment paired with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestItem {
  #[serde(flatten)]
  pub comment:        RawComment,
  pub classification: Classification,
}

/// A single analysis run for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestBatch {
  pub video_id: String,
  pub video:    VideoMetadata,
  pub items:    Vec<IngestItem>,
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// A comment that was skipped, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedComment {
  pub comment_id: String,
  pub error:      ValidationError,
}

/// Outcome counts for one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
  pub inserted: usize,
  pub updated:  usize,
  pub skipped:  usize,
  pub rejected: Vec<RejectedComment>,
}

impl IngestReport {
  fn record(&mut self, outcome: UpsertOutcome) {
    match outcome {
      UpsertOutcome::Inserted => self.inserted += 1,
      UpsertOutcome::Updated => self.updated += 1,
    }
  }

  fn reject(&mut self, comment_id: String, error: ValidationError) {
    self.skipped += 1;
    self.rejected.push(RejectedComment { comment_id, error });
  }

  /// Number of comments written, new or overwritten.
  pub fn written(&self) -> usize { self.inserted + self.updated }
}

// ─── Writer ──────────────────────────────────────────────────────────────────

/// Run one analysis batch against `store`.
pub async fn ingest<S>(store: &S, batch: IngestBatch) -> Result<IngestReport>
where
  S: CommentStore,
{
  ingest_with_rejections(store, batch, Vec::new()).await
}

/// Like [`ingest`], for callers that already turned some comments away
/// before they could become [`IngestItem`]s. Those count as skipped.
pub async fn ingest_with_rejections<S>(
  store: &S,
  batch: IngestBatch,
  rejected: Vec<RejectedComment>,
) -> Result<IngestReport>
where
  S: CommentStore,
{
  let IngestBatch { video_id, video, items } = batch;
  let mut report = IngestReport::default();
  for RejectedComment { comment_id, error } in rejected {
    warn!(video_id = %video_id, comment_id = %comment_id, %error, "skipping rejected comment");
    report.reject(comment_id, error);
  }
  ingest_items(store, &video_id, &video, items, report).await
}

async fn ingest_items<S>(
  store: &S,
  video_id: &str,
  video: &VideoMetadata,
  items: Vec<IngestItem>,
  mut report: IngestReport,
) -> Result<IngestReport>
where
  S: CommentStore,
{
  validate_video(video).map_err(Error::InvalidVideo)?;

  let stored = store.upsert_video(video_id, video).await.map_err(Error::store)?;
  debug!(video_id, last_analyzed = %stored.last_analyzed, "video upserted");

  for IngestItem { comment, classification } in items {
    let comment_id = comment.comment_id.clone();
    match validate_comment(video_id, comment, classification) {
      Ok(new_comment) => {
        let outcome = store
          .upsert_comment(new_comment)
          .await
          .map_err(Error::store)?;
        report.record(outcome);
      }
      Err(error) => {
        warn!(video_id, comment_id = %comment_id, %error, "skipping invalid comment");
        report.reject(comment_id, error);
      }
    }
  }

  info!(
    video_id,
    inserted = report.inserted,
    updated = report.updated,
    skipped = report.skipped,
    "ingestion finished"
  );
  Ok(report)
}

// ─── Classifier seam ─────────────────────────────────────────────────────────

/// The external emotion model, seen as a black box.
pub trait EmotionClassifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn classify<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Classification, Self::Error>> + Send + 'a;
}

/// Classify each comment in turn. Comments the classifier fails on are
/// returned as rejections rather than aborting the run.
pub async fn classify_batch<C>(
  classifier: &C,
  comments: Vec<RawComment>,
) -> (Vec<IngestItem>, Vec<RejectedComment>)
where
  C: EmotionClassifier,
{
  let mut items = Vec::with_capacity(comments.len());
  let mut rejected = Vec::new();

  for comment in comments {
    let result = classifier.classify(&comment.text).await;
    match result {
      Ok(classification) => items.push(IngestItem { comment, classification }),
      Err(e) => rejected.push(RejectedComment {
        comment_id: comment.comment_id,
        error:      ValidationError::ClassificationFailed(e.to_string()),
      }),
    }
  }

  (items, rejected)
}

/// Classify `comments` with `classifier` and ingest the result.
///
/// Classifier failures are counted as skipped comments in the report.
pub async fn analyze_and_ingest<S, C>(
  store: &S,
  classifier: &C,
  video_id: &str,
  video: &VideoMetadata,
  comments: Vec<RawComment>,
) -> Result<IngestReport>
where
  S: CommentStore,
  C: EmotionClassifier,
{
  let (items, failures) = classify_batch(classifier, comments).await;
  let batch = IngestBatch {
    video_id: video_id.to_owned(),
    video: video.clone(),
    items,
  };
  ingest_with_rejections(store, batch, failures).await
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("model offline")]
  struct Offline;

  /// Labels anything containing "!" as joy and fails on empty text.
  struct BangClassifier;

  impl EmotionClassifier for BangClassifier {
    type Error = Offline;

    async fn classify(&self, text: &str) -> Result<Classification, Offline> {
      if text.is_empty() {
        return Err(Offline);
      }
      let label = if text.contains('!') { "joy" } else { "neutral" };
      Ok(Classification::new(label, 0.75))
    }
  }

  fn raw(id: &str, text: &str) -> RawComment {
    RawComment { comment_id: id.into(), text: text.into(), ..RawComment::default() }
  }

  #[tokio::test]
  async fn classify_batch_splits_failures() {
    let (items, rejected) = classify_batch(
      &BangClassifier,
      vec![raw("a", "wow!"), raw("b", ""), raw("c", "fine")],
    )
    .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].classification.emotion, "joy");
    assert_eq!(items[1].classification.emotion, "neutral");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].comment_id, "b");
    assert_eq!(
      rejected[0].error,
      ValidationError::ClassificationFailed("model offline".into())
    );
  }

  #[test]
  fn item_deserialises_from_flat_json() {
    let item: IngestItem = serde_json::from_value(serde_json::json!({
      "commentId": "c1",
      "text": "hello",
      "likeCount": 3,
      "classification": { "emotion": "joy", "confidence": 0.5 }
    }))
    .unwrap();
    assert_eq!(item.comment.comment_id, "c1");
    assert_eq!(item.comment.like_count, Some(3));
    assert_eq!(item.classification.confidence, 0.5);
  }
}
