//! Video metadata records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one analysed video. At most one record exists per `video_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
  pub video_id:      String,
  pub title:         Option<String>,
  pub description:   Option<String>,
  pub thumbnail:     Option<String>,
  pub view_count:    Option<u64>,
  pub like_count:    Option<u64>,
  pub comment_count: Option<u64>,
  pub channel_id:    Option<String>,
  pub channel_title: Option<String>,
  pub published_at:  Option<DateTime<Utc>>,
  /// Refreshed on every analysis run; equals the creation time until then.
  pub last_analyzed: DateTime<Utc>,
}

/// The metadata payload supplied with an analysis run.
///
/// Every field is optional. On upsert, fields left as `None` keep whatever
/// value the stored record already has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoMetadata {
  pub title:         Option<String>,
  pub description:   Option<String>,
  pub thumbnail:     Option<String>,
  pub view_count:    Option<u64>,
  pub like_count:    Option<u64>,
  pub comment_count: Option<u64>,
  pub channel_id:    Option<String>,
  pub channel_title: Option<String>,
  pub published_at:  Option<DateTime<Utc>>,
}

impl VideoMetadata {
  /// Metadata carrying only a title.
  pub fn titled(title: impl Into<String>) -> Self {
    Self { title: Some(title.into()), ..Self::default() }
  }
}
