//! Field-level validation for incoming comments.
//!
//! Every rule the store enforces is checked here first, so that the ingestion
//! writer can skip a bad comment with a structured reason instead of failing
//! the whole batch on a constraint violation.

use thiserror::Error;

use crate::{
  comment::{Classification, NewComment, NewEmotionAnalysis, RawComment},
  emotion::Emotion,
  video::VideoMetadata,
};

/// Largest count a store can hold; counts are persisted as signed 64-bit.
pub const MAX_COUNT: u64 = i64::MAX as u64;

/// Why a single comment was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
  #[error("comment id is empty")]
  EmptyCommentId,

  #[error("comment text is empty")]
  EmptyText,

  #[error("unknown emotion label: {0:?}")]
  UnknownEmotion(String),

  #[error("emotion confidence {0} is outside [0, 1]")]
  ConfidenceOutOfRange(f64),

  #[error("feature {index} is not finite: {value}")]
  NonFiniteFeature { index: usize, value: f64 },

  #[error("{field} {value} exceeds the maximum count")]
  CountOutOfRange { field: &'static str, value: u64 },

  #[error("classification failed: {0}")]
  ClassificationFailed(String),

  #[error("malformed comment: {0}")]
  Malformed(String),
}

pub fn validate_comment_id(comment_id: &str) -> Result<(), ValidationError> {
  if comment_id.trim().is_empty() {
    return Err(ValidationError::EmptyCommentId);
  }
  Ok(())
}

pub fn validate_text(text: &str) -> Result<(), ValidationError> {
  if text.trim().is_empty() {
    return Err(ValidationError::EmptyText);
  }
  Ok(())
}

pub fn validate_emotion(label: &str) -> Result<Emotion, ValidationError> {
  Emotion::parse_label(label)
    .ok_or_else(|| ValidationError::UnknownEmotion(label.to_owned()))
}

/// NaN and infinities are rejected along with finite values outside the range.
pub fn validate_confidence(confidence: f64) -> Result<f64, ValidationError> {
  if confidence.is_finite() && (0.0..=1.0).contains(&confidence) {
    Ok(confidence)
  } else {
    Err(ValidationError::ConfidenceOutOfRange(confidence))
  }
}

/// Every feature must be a finite number.
pub fn validate_features(features: &[f64]) -> Result<(), ValidationError> {
  match features.iter().position(|f| !f.is_finite()) {
    Some(index) => Err(ValidationError::NonFiniteFeature { index, value: features[index] }),
    None => Ok(()),
  }
}

pub fn validate_count(field: &'static str, count: Option<u64>) -> Result<(), ValidationError> {
  match count {
    Some(value) if value > MAX_COUNT => Err(ValidationError::CountOutOfRange { field, value }),
    _ => Ok(()),
  }
}

/// Check the counts of a video metadata payload.
pub fn validate_video(video: &VideoMetadata) -> Result<(), ValidationError> {
  validate_count("viewCount", video.view_count)?;
  validate_count("likeCount", video.like_count)?;
  validate_count("commentCount", video.comment_count)
}

/// Validate one `(raw comment, classification)` pair and build the write
/// model for `video_id`.
pub fn validate_comment(
  video_id: &str,
  raw: RawComment,
  classification: Classification,
) -> Result<NewComment, ValidationError> {
  validate_comment_id(&raw.comment_id)?;
  validate_text(&raw.text)?;
  let emotion = validate_emotion(&classification.emotion)?;
  let emotion_confidence = validate_confidence(classification.confidence)?;
  validate_features(&classification.features)?;
  validate_count("likeCount", raw.like_count)?;

  let emotion_analysis = classification.has_analysis().then(|| NewEmotionAnalysis {
    preprocessed_text: classification.preprocessed_text,
    features:          classification.features,
    model_version:     classification.model_version,
  });

  Ok(NewComment {
    video_id: video_id.to_owned(),
    comment_id: raw.comment_id,
    text: raw.text,
    author: raw.author,
    author_channel_id: raw.author_channel_id,
    like_count: raw.like_count,
    published_at: raw.published_at,
    emotion,
    emotion_confidence,
    emotion_analysis,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(id: &str, text: &str) -> RawComment {
    RawComment {
      comment_id: id.into(),
      text: text.into(),
      ..RawComment::default()
    }
  }

  #[test]
  fn accepts_well_formed_comment() {
    let c = validate_comment("vid", raw("c1", "lovely"), Classification::new("Love", 0.9))
      .unwrap();
    assert_eq!(c.video_id, "vid");
    assert_eq!(c.emotion, Emotion::Love);
    assert_eq!(c.emotion_confidence, 0.9);
    assert!(c.emotion_analysis.is_none());
  }

  #[test]
  fn confidence_bounds_are_inclusive() {
    assert_eq!(validate_confidence(0.0), Ok(0.0));
    assert_eq!(validate_confidence(1.0), Ok(1.0));
    assert!(validate_confidence(1.01).is_err());
    assert!(validate_confidence(-0.1).is_err());
    assert!(validate_confidence(f64::NAN).is_err());
    assert!(validate_confidence(f64::INFINITY).is_err());
  }

  #[test]
  fn rejects_blank_text_and_id() {
    assert_eq!(
      validate_comment("vid", raw("c1", "   "), Classification::new("joy", 0.5)),
      Err(ValidationError::EmptyText)
    );
    assert_eq!(
      validate_comment("vid", raw("", "hi"), Classification::new("joy", 0.5)),
      Err(ValidationError::EmptyCommentId)
    );
  }

  #[test]
  fn rejects_labels_outside_taxonomy() {
    let err = validate_comment("vid", raw("c1", "ew"), Classification::new("disgust", 0.7))
      .unwrap_err();
    assert_eq!(err, ValidationError::UnknownEmotion("disgust".into()));
  }

  #[test]
  fn rejects_non_finite_features() {
    let mut classification = Classification::new("joy", 0.8);
    classification.features = vec![0.1, f64::NAN, 0.3];

    let err = validate_comment("vid", raw("c1", "yay"), classification).unwrap_err();
    assert!(matches!(err, ValidationError::NonFiniteFeature { index: 1, .. }));

    assert!(validate_features(&[f64::NEG_INFINITY]).is_err());
    assert!(validate_features(&[]).is_ok());
  }

  #[test]
  fn rejects_counts_beyond_store_range() {
    let mut big = raw("c1", "popular");
    big.like_count = Some(u64::MAX);
    assert_eq!(
      validate_comment("vid", big, Classification::new("joy", 0.5)),
      Err(ValidationError::CountOutOfRange { field: "likeCount", value: u64::MAX })
    );

    let mut edge = raw("c2", "popular");
    edge.like_count = Some(MAX_COUNT);
    assert!(validate_comment("vid", edge, Classification::new("joy", 0.5)).is_ok());

    let video = VideoMetadata { view_count: Some(MAX_COUNT + 1), ..VideoMetadata::default() };
    assert!(matches!(
      validate_video(&video),
      Err(ValidationError::CountOutOfRange { field: "viewCount", .. })
    ));
    assert!(validate_video(&VideoMetadata::titled("ok")).is_ok());
  }

  #[test]
  fn keeps_analysis_metadata() {
    let mut classification = Classification::new("joy", 0.8);
    classification.features = vec![0.1, 0.2, 0.3];
    classification.model_version = Some("distilroberta-base".into());

    let c = validate_comment("vid", raw("c1", "yay"), classification).unwrap();
    let analysis = c.emotion_analysis.unwrap();
    assert_eq!(analysis.features, [0.1, 0.2, 0.3]);
    assert_eq!(analysis.model_version.as_deref(), Some("distilroberta-base"));
    assert_eq!(analysis.preprocessed_text, None);
  }
}
