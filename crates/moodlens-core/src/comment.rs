//! Comment records: a platform comment plus its emotion classification.
//!
//! [`RawComment`] and [`Classification`] are the two halves handed to the
//! ingestion writer. [`NewComment`] is the validated write model and
//! [`Comment`] is what the store hands back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// A comment as fetched from the video platform, before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
  pub comment_id:        String,
  pub text:              String,
  #[serde(default)]
  pub author:            Option<String>,
  #[serde(default)]
  pub author_channel_id: Option<String>,
  #[serde(default)]
  pub like_count:        Option<u64>,
  #[serde(default)]
  pub published_at:      Option<DateTime<Utc>>,
}

/// Output of the external emotion classifier for one comment text.
///
/// `emotion` is kept as the classifier's raw label; it is checked against the
/// taxonomy during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
  pub emotion:           String,
  pub confidence:        f64,
  #[serde(default)]
  pub features:          Vec<f64>,
  #[serde(default)]
  pub preprocessed_text: Option<String>,
  #[serde(default)]
  pub model_version:     Option<String>,
}

impl Classification {
  pub fn new(emotion: impl Into<String>, confidence: f64) -> Self {
    Self { emotion: emotion.into(), confidence, ..Self::default() }
  }

  /// Whether the classifier supplied anything beyond the label and score.
  pub fn has_analysis(&self) -> bool {
    !self.features.is_empty()
      || self.preprocessed_text.is_some()
      || self.model_version.is_some()
  }
}

// ─── Write model ─────────────────────────────────────────────────────────────

/// Analysis metadata as supplied by the caller. `analyzed_at` is stamped by
/// the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEmotionAnalysis {
  pub preprocessed_text: Option<String>,
  pub features:          Vec<f64>,
  pub model_version:     Option<String>,
}

/// A validated comment ready to be upserted. Built by
/// [`crate::validate::validate_comment`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
  pub video_id:           String,
  pub comment_id:         String,
  pub text:               String,
  pub author:             Option<String>,
  pub author_channel_id:  Option<String>,
  pub like_count:         Option<u64>,
  pub published_at:       Option<DateTime<Utc>>,
  pub emotion:            Emotion,
  pub emotion_confidence: f64,
  pub emotion_analysis:   Option<NewEmotionAnalysis>,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// Classifier metadata persisted alongside a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
  pub preprocessed_text: Option<String>,
  /// Feature vector, in the order the classifier produced it.
  #[serde(default)]
  pub features:          Vec<f64>,
  pub model_version:     Option<String>,
  pub analyzed_at:       DateTime<Utc>,
}

impl EmotionAnalysis {
  pub fn stamped(input: NewEmotionAnalysis, analyzed_at: DateTime<Utc>) -> Self {
    Self {
      preprocessed_text: input.preprocessed_text,
      features: input.features,
      model_version: input.model_version,
      analyzed_at,
    }
  }
}

/// A stored, classified comment. Exactly one record exists per `comment_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub video_id:           String,
  pub comment_id:         String,
  pub text:               String,
  pub author:             Option<String>,
  pub author_channel_id:  Option<String>,
  pub like_count:         Option<u64>,
  pub published_at:       Option<DateTime<Utc>>,
  pub emotion:            Emotion,
  /// Always within `[0, 1]`.
  pub emotion_confidence: f64,
  pub emotion_analysis:   Option<EmotionAnalysis>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
}
