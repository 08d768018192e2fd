//! Per-video emotion statistics.
//!
//! The aggregator produces raw `{count, avgConfidence}` pairs only.
//! Percentages and the dominant emotion are derived on demand from those
//! pairs, so the aggregate itself does not depend on which emotions a
//! consumer chooses to display.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
  Error, Result,
  comment::Comment,
  emotion::Emotion,
  store::CommentStore,
};

/// Count and mean confidence for one emotion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionStat {
  pub count:          u64,
  pub avg_confidence: f64,
}

impl EmotionStat {
  /// Ranking score used to pick the dominant emotion.
  pub fn score(&self) -> f64 { self.count as f64 * self.avg_confidence }
}

/// Emotion distribution for one video, keyed in taxonomy order.
///
/// Emotions with no comments are absent rather than present with zeroes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmotionStats(BTreeMap<Emotion, EmotionStat>);

impl EmotionStats {
  /// Aggregate a set of comments.
  pub fn from_comments<'a>(comments: impl IntoIterator<Item = &'a Comment>) -> Self {
    let mut sums: BTreeMap<Emotion, (u64, f64)> = BTreeMap::new();
    for comment in comments {
      let entry = sums.entry(comment.emotion).or_insert((0, 0.0));
      entry.0 += 1;
      entry.1 += comment.emotion_confidence;
    }

    sums
      .into_iter()
      .map(|(emotion, (count, sum))| {
        let avg_confidence = sum / count as f64;
        (emotion, EmotionStat { count, avg_confidence })
      })
      .collect()
  }

  pub fn get(&self, emotion: Emotion) -> Option<&EmotionStat> { self.0.get(&emotion) }

  pub fn iter(&self) -> impl Iterator<Item = (Emotion, &EmotionStat)> {
    self.0.iter().map(|(e, s)| (*e, s))
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  /// Sum of all per-emotion counts, i.e. the number of comments aggregated.
  pub fn total_count(&self) -> u64 { self.0.values().map(|s| s.count).sum() }

  /// Share of each emotion as `count / total * 100`.
  ///
  /// Empty when there are no comments.
  pub fn percentages(&self) -> BTreeMap<Emotion, f64> {
    let total = self.total_count();
    if total == 0 {
      return BTreeMap::new();
    }
    self
      .iter()
      .map(|(emotion, stat)| (emotion, stat.count as f64 / total as f64 * 100.0))
      .collect()
  }

  /// The emotion with the strictly greatest `count × avgConfidence`.
  ///
  /// Exact ties go to the emotion that comes first in taxonomy order. Returns
  /// `None` when there are no statistics.
  pub fn dominant(&self) -> Option<Emotion> {
    let mut best: Option<(Emotion, f64)> = None;
    for emotion in Emotion::iter() {
      let Some(stat) = self.0.get(&emotion) else { continue };
      let score = stat.score();
      match best {
        Some((_, top)) if score <= top => {}
        _ => best = Some((emotion, score)),
      }
    }
    best.map(|(emotion, _)| emotion)
  }
}

impl FromIterator<(Emotion, EmotionStat)> for EmotionStats {
  fn from_iter<I: IntoIterator<Item = (Emotion, EmotionStat)>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

/// Read every comment for `video_id` and aggregate it.
///
/// A video with no comments yields empty statistics, not an error.
pub async fn emotion_stats<S>(store: &S, video_id: &str) -> Result<EmotionStats>
where
  S: CommentStore,
{
  let comments = store.list_comments(video_id).await.map_err(Error::store)?;
  Ok(EmotionStats::from_comments(&comments))
}
