//! The emotion taxonomy.
//!
//! The set of labels a stored comment may carry is closed. The declaration
//! order of [`Emotion`] is the taxonomy order: it drives the ordering of the
//! statistics map and breaks ties when picking a dominant emotion.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::Error;

/// An emotion label attached to a classified comment.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Emotion {
  Joy,
  Sadness,
  Anger,
  Fear,
  Surprise,
  Love,
  Neutral,
}

impl Emotion {
  /// The lowercase label stored in the database and sent over the wire.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a label as produced by a classifier. Surrounding whitespace and
  /// letter case are ignored. Returns `None` for labels outside the taxonomy.
  pub fn parse_label(label: &str) -> Option<Self> {
    label.trim().to_ascii_lowercase().parse().ok()
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Restricts a comment query to a single emotion, or lets everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmotionFilter {
  #[default]
  All,
  Only(Emotion),
}

impl EmotionFilter {
  pub fn matches(self, emotion: Emotion) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => wanted == emotion,
    }
  }
}

impl FromStr for EmotionFilter {
  type Err = Error;

  /// `""` and `"all"` mean no filtering; anything else must name an emotion.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("all") {
      return Ok(Self::All);
    }
    Emotion::parse_label(s)
      .map(Self::Only)
      .ok_or_else(|| Error::InvalidQuery(format!("unknown emotion filter: {s:?}")))
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn taxonomy_order_is_declaration_order() {
    let labels: Vec<&str> = Emotion::iter().map(Emotion::as_str).collect();
    assert_eq!(
      labels,
      ["joy", "sadness", "anger", "fear", "surprise", "love", "neutral"]
    );
    assert!(Emotion::Joy < Emotion::Neutral);
  }

  #[test]
  fn parse_label_normalises_case() {
    assert_eq!(Emotion::parse_label(" Joy "), Some(Emotion::Joy));
    assert_eq!(Emotion::parse_label("SURPRISE"), Some(Emotion::Surprise));
    assert_eq!(Emotion::parse_label("disgust"), None);
    assert_eq!(Emotion::parse_label(""), None);
  }

  #[test]
  fn serde_uses_lowercase_labels() {
    assert_eq!(serde_json::to_string(&Emotion::Love).unwrap(), "\"love\"");
    let parsed: Emotion = serde_json::from_str("\"fear\"").unwrap();
    assert_eq!(parsed, Emotion::Fear);
  }

  #[test]
  fn filter_parsing() {
    assert_eq!("all".parse::<EmotionFilter>().unwrap(), EmotionFilter::All);
    assert_eq!("".parse::<EmotionFilter>().unwrap(), EmotionFilter::All);
    assert_eq!(
      "anger".parse::<EmotionFilter>().unwrap(),
      EmotionFilter::Only(Emotion::Anger)
    );
    assert!(matches!(
      "disgust".parse::<EmotionFilter>(),
      Err(Error::InvalidQuery(_))
    ));
  }

  #[test]
  fn filter_matches() {
    assert!(EmotionFilter::All.matches(Emotion::Fear));
    assert!(EmotionFilter::Only(Emotion::Fear).matches(Emotion::Fear));
    assert!(!EmotionFilter::Only(Emotion::Fear).matches(Emotion::Joy));
  }
}
