//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. The emotion analysis
//! sub-record is stored as compact JSON. Counts are stored as INTEGER and
//! must fit in an `i64`.

use chrono::{DateTime, Utc};
use moodlens_core::{
  comment::{Comment, EmotionAnalysis},
  emotion::Emotion,
  video::Video,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn encode_count(n: Option<u64>) -> Result<Option<i64>> {
  n.map(|v| i64::try_from(v).map_err(|_| Error::CountOutOfRange(v)))
    .transpose()
}

fn decode_count(n: Option<i64>) -> Result<Option<u64>> {
  n.map(|v| u64::try_from(v).map_err(|_| Error::Decode(format!("negative count: {v}"))))
    .transpose()
}

// ─── Emotion ─────────────────────────────────────────────────────────────────

pub fn encode_emotion(e: Emotion) -> &'static str { e.as_str() }

pub fn decode_emotion(s: &str) -> Result<Emotion> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown emotion: {s:?}")))
}

// ─── EmotionAnalysis ─────────────────────────────────────────────────────────

pub fn encode_analysis(a: &EmotionAnalysis) -> Result<String> {
  Ok(serde_json::to_string(a)?)
}

pub fn decode_analysis(s: &str) -> Result<EmotionAnalysis> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawVideo`]'s field order.
pub const VIDEO_COLUMNS: &str = "video_id, title, description, thumbnail, view_count, \
   like_count, comment_count, channel_id, channel_title, published_at, last_analyzed";

/// Raw values read directly from a `videos` row.
pub struct RawVideo {
  pub video_id:      String,
  pub title:         Option<String>,
  pub description:   Option<String>,
  pub thumbnail:     Option<String>,
  pub view_count:    Option<i64>,
  pub like_count:    Option<i64>,
  pub comment_count: Option<i64>,
  pub channel_id:    Option<String>,
  pub channel_title: Option<String>,
  pub published_at:  Option<String>,
  pub last_analyzed: String,
}

impl RawVideo {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      video_id:      row.get(0)?,
      title:         row.get(1)?,
      description:   row.get(2)?,
      thumbnail:     row.get(3)?,
      view_count:    row.get(4)?,
      like_count:    row.get(5)?,
      comment_count: row.get(6)?,
      channel_id:    row.get(7)?,
      channel_title: row.get(8)?,
      published_at:  row.get(9)?,
      last_analyzed: row.get(10)?,
    })
  }

  pub fn into_video(self) -> Result<Video> {
    Ok(Video {
      video_id:      self.video_id,
      title:         self.title,
      description:   self.description,
      thumbnail:     self.thumbnail,
      view_count:    decode_count(self.view_count)?,
      like_count:    decode_count(self.like_count)?,
      comment_count: decode_count(self.comment_count)?,
      channel_id:    self.channel_id,
      channel_title: self.channel_title,
      published_at:  decode_opt_dt(self.published_at)?,
      last_analyzed: decode_dt(&self.last_analyzed)?,
    })
  }
}

/// Column list matching [`RawComment`]'s field order.
pub const COMMENT_COLUMNS: &str = "video_id, comment_id, text, author, author_channel_id, \
   like_count, published_at, emotion, emotion_confidence, analysis_json, created_at, updated_at";

/// Raw values read directly from a `comments` row.
pub struct RawComment {
  pub video_id:           String,
  pub comment_id:         String,
  pub text:               String,
  pub author:             Option<String>,
  pub author_channel_id:  Option<String>,
  pub like_count:         Option<i64>,
  pub published_at:       Option<String>,
  pub emotion:            String,
  pub emotion_confidence: f64,
  pub analysis_json:      Option<String>,
  pub created_at:         String,
  pub updated_at:         String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      video_id:           row.get(0)?,
      comment_id:         row.get(1)?,
      text:               row.get(2)?,
      author:             row.get(3)?,
      author_channel_id:  row.get(4)?,
      like_count:         row.get(5)?,
      published_at:       row.get(6)?,
      emotion:            row.get(7)?,
      emotion_confidence: row.get(8)?,
      analysis_json:      row.get(9)?,
      created_at:         row.get(10)?,
      updated_at:         row.get(11)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      video_id:           self.video_id,
      comment_id:         self.comment_id,
      text:               self.text,
      author:             self.author,
      author_channel_id:  self.author_channel_id,
      like_count:         decode_count(self.like_count)?,
      published_at:       decode_opt_dt(self.published_at)?,
      emotion:            decode_emotion(&self.emotion)?,
      emotion_confidence: self.emotion_confidence,
      emotion_analysis:   self
        .analysis_json
        .as_deref()
        .map(decode_analysis)
        .transpose()?,
      created_at:         decode_dt(&self.created_at)?,
      updated_at:         decode_dt(&self.updated_at)?,
    })
  }
}
