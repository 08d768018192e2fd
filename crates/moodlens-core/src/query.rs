//! The comment query engine: filter, stable sort, paginate.
//!
//! Given the same comments in the same retrieval order and the same
//! [`CommentQuery`], [`CommentQuery::apply`] always returns the same page.

use std::{cmp::Ordering, str::FromStr};

use serde::Serialize;

use crate::{
  Error, Result,
  comment::Comment,
  emotion::EmotionFilter,
  store::CommentStore,
};

/// Page size used when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

// ─── Sort key ────────────────────────────────────────────────────────────────

/// Sort key. Every order is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
  /// Newest `published_at` first; undated comments last.
  #[default]
  Date,
  /// Most liked first; a missing like count counts as zero.
  Likes,
  /// Most confident classification first.
  Confidence,
}

impl SortBy {
  fn compare(self, a: &Comment, b: &Comment) -> Ordering {
    match self {
      // `None < Some(_)`, so reversing puts undated comments at the end.
      Self::Date => b.published_at.cmp(&a.published_at),
      Self::Likes => b.like_count.unwrap_or(0).cmp(&a.like_count.unwrap_or(0)),
      Self::Confidence => b.emotion_confidence.total_cmp(&a.emotion_confidence),
    }
  }
}

impl FromStr for SortBy {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "" | "date" | "publishedAt" => Ok(Self::Date),
      "likes" | "likeCount" => Ok(Self::Likes),
      "confidence" | "emotionConfidence" => Ok(Self::Confidence),
      other => Err(Error::InvalidQuery(format!("unknown sort key: {other:?}"))),
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Options for a comment listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentQuery {
  /// Case-insensitive substring matched against the comment text.
  pub search:  Option<String>,
  pub emotion: EmotionFilter,
  pub sort_by: SortBy,
  /// 1-based page index.
  pub page:    i64,
  /// Page size. `0` returns every matching comment on a single page.
  pub limit:   i64,
}

impl Default for CommentQuery {
  fn default() -> Self {
    Self {
      search:  None,
      emotion: EmotionFilter::All,
      sort_by: SortBy::Date,
      page:    1,
      limit:   DEFAULT_PAGE_SIZE,
    }
  }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
  pub comments:    Vec<Comment>,
  pub page:        u64,
  pub total_pages: u64,
  /// Number of comments matching the filters, across all pages.
  pub total_count: u64,
}

impl CommentQuery {
  /// The unpaginated form used for full-video analysis.
  pub fn all() -> Self { Self { limit: 0, ..Self::default() } }

  pub fn is_unpaginated(&self) -> bool { self.limit == 0 }

  /// Reject out-of-range pagination parameters.
  pub fn validate(&self) -> Result<()> {
    if self.page < 1 {
      return Err(Error::InvalidQuery(format!(
        "page must be at least 1, got {}",
        self.page
      )));
    }
    if self.limit < 0 {
      return Err(Error::InvalidQuery(format!(
        "limit must not be negative, got {}",
        self.limit
      )));
    }
    Ok(())
  }

  fn needle(&self) -> Option<String> {
    self
      .search
      .as_deref()
      .filter(|s| !s.is_empty())
      .map(str::to_lowercase)
  }

  /// Run the query over `comments`, which must be in retrieval order.
  pub fn apply(&self, comments: Vec<Comment>) -> Result<CommentPage> {
    self.validate()?;

    let needle = self.needle();
    let mut matched: Vec<Comment> = comments
      .into_iter()
      .filter(|c| matches_filters(needle.as_deref(), self.emotion, c))
      .collect();

    // `sort_by` is stable: ties keep retrieval order.
    matched.sort_by(|a, b| self.sort_by.compare(a, b));

    let total_count = matched.len() as u64;

    if self.is_unpaginated() {
      return Ok(CommentPage {
        comments: matched,
        page: 1,
        total_pages: 1,
        total_count,
      });
    }

    let page = self.page as u64;
    let limit = self.limit as u64;
    let offset = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);

    Ok(CommentPage {
      comments: matched.into_iter().skip(offset).take(take).collect(),
      page,
      total_pages: total_count.div_ceil(limit),
      total_count,
    })
  }
}

fn matches_filters(needle: Option<&str>, emotion: EmotionFilter, comment: &Comment) -> bool {
  emotion.matches(comment.emotion) && needle.is_none_or(|n| text_contains(comment, n))
}

/// Case-insensitive substring test; `needle` must already be lowercase.
pub(crate) fn text_contains(comment: &Comment, needle: &str) -> bool {
  comment.text.to_lowercase().contains(needle)
}

/// Read every comment for `video_id` and run `query` over them.
pub async fn query_comments<S>(
  store: &S,
  video_id: &str,
  query: &CommentQuery,
) -> Result<CommentPage>
where
  S: CommentStore,
{
  query.validate()?;
  let comments = store.list_comments(video_id).await.map_err(Error::store)?;
  query.apply(comments)
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, TimeZone, Utc};

  use super::*;
  use crate::emotion::Emotion;

  fn at(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

  fn comment(id: &str, text: &str) -> Comment {
    Comment {
      video_id: "vid".into(),
      comment_id: id.into(),
      text: text.into(),
      author: None,
      author_channel_id: None,
      like_count: None,
      published_at: None,
      emotion: Emotion::Neutral,
      emotion_confidence: 0.5,
      emotion_analysis: None,
      created_at: at(0),
      updated_at: at(0),
    }
  }

  fn ids(page: &CommentPage) -> Vec<&str> {
    page.comments.iter().map(|c| c.comment_id.as_str()).collect()
  }

  fn numbered(n: usize) -> Vec<Comment> {
    (0..n)
      .map(|i| {
        let mut c = comment(&format!("c{i:02}"), "text");
        c.published_at = Some(at(1_000 - i as i64));
        c
      })
      .collect()
  }

  #[test]
  fn search_is_case_insensitive_substring() {
    let comments = vec![
      comment("a", "This is great!"),
      comment("b", "GREAT video"),
      comment("c", "ok"),
    ];
    let query = CommentQuery { search: Some("great".into()), ..CommentQuery::all() };
    let page = query.apply(comments).unwrap();
    assert_eq!(ids(&page), ["a", "b"]);
    assert_eq!(page.total_count, 2);
  }

  #[test]
  fn empty_search_does_not_filter() {
    let comments = vec![comment("a", "x"), comment("b", "y")];
    let query = CommentQuery { search: Some(String::new()), ..CommentQuery::all() };
    assert_eq!(query.apply(comments).unwrap().total_count, 2);
  }

  #[test]
  fn emotion_filter_is_equality() {
    let mut joyful = comment("a", "yay");
    joyful.emotion = Emotion::Joy;
    let comments = vec![joyful, comment("b", "meh")];

    let query = CommentQuery {
      emotion: EmotionFilter::Only(Emotion::Joy),
      ..CommentQuery::all()
    };
    assert_eq!(ids(&query.apply(comments).unwrap()), ["a"]);
  }

  #[test]
  fn likes_sort_is_stable() {
    let mut a = comment("a", "x");
    a.like_count = Some(5);
    let mut b = comment("b", "x");
    b.like_count = Some(5);
    let mut c = comment("c", "x");
    c.like_count = Some(1);

    let query = CommentQuery { sort_by: SortBy::Likes, ..CommentQuery::all() };
    let page = query.apply(vec![c.clone(), a.clone(), b.clone()]).unwrap();
    assert_eq!(ids(&page), ["a", "b", "c"]);

    let page = query.apply(vec![b, a, c]).unwrap();
    assert_eq!(ids(&page), ["b", "a", "c"]);
  }

  #[test]
  fn missing_likes_count_as_zero() {
    let mut a = comment("a", "x");
    a.like_count = Some(0);
    let b = comment("b", "x");
    let mut c = comment("c", "x");
    c.like_count = Some(2);

    let query = CommentQuery { sort_by: SortBy::Likes, ..CommentQuery::all() };
    assert_eq!(ids(&query.apply(vec![a, b, c]).unwrap()), ["c", "a", "b"]);
  }

  #[test]
  fn date_sort_is_newest_first_with_undated_last() {
    let mut old = comment("old", "x");
    old.published_at = Some(at(10));
    let undated = comment("undated", "x");
    let mut new = comment("new", "x");
    new.published_at = Some(at(20));

    let page = CommentQuery::all().apply(vec![old, undated, new]).unwrap();
    assert_eq!(ids(&page), ["new", "old", "undated"]);
  }

  #[test]
  fn confidence_sort_descends() {
    let mut low = comment("low", "x");
    low.emotion_confidence = 0.1;
    let mut high = comment("high", "x");
    high.emotion_confidence = 0.9;

    let query = CommentQuery { sort_by: SortBy::Confidence, ..CommentQuery::all() };
    assert_eq!(ids(&query.apply(vec![low, high]).unwrap()), ["high", "low"]);
  }

  #[test]
  fn paginates_25_by_10() {
    let query = CommentQuery { page: 1, limit: 10, ..CommentQuery::default() };
    let page = query.apply(numbered(25)).unwrap();
    assert_eq!(page.comments.len(), 10);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.comments[0].comment_id, "c00");

    let query = CommentQuery { page: 3, limit: 10, ..CommentQuery::default() };
    let page = query.apply(numbered(25)).unwrap();
    assert_eq!(page.comments.len(), 5);
    assert_eq!(page.comments[0].comment_id, "c20");
  }

  #[test]
  fn limit_zero_returns_everything() {
    let page = CommentQuery::all().apply(numbered(25)).unwrap();
    assert_eq!(page.comments.len(), 25);
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 1);
  }

  #[test]
  fn page_past_the_end_is_empty() {
    let query = CommentQuery { page: 9, limit: 10, ..CommentQuery::default() };
    let page = query.apply(numbered(25)).unwrap();
    assert!(page.comments.is_empty());
    assert_eq!(page.page, 9);
    assert_eq!(page.total_pages, 3);
  }

  #[test]
  fn no_matches_has_zero_pages() {
    let page = CommentQuery::default().apply(Vec::new()).unwrap();
    assert!(page.comments.is_empty());
    assert_eq!(page.total_pages, 0);
  }

  #[test]
  fn rejects_bad_pagination() {
    let bad_page = CommentQuery { page: 0, ..CommentQuery::default() };
    assert!(matches!(bad_page.apply(numbered(3)), Err(Error::InvalidQuery(_))));

    let bad_limit = CommentQuery { limit: -1, ..CommentQuery::default() };
    assert!(matches!(bad_limit.apply(numbered(3)), Err(Error::InvalidQuery(_))));
  }

  #[test]
  fn sort_key_parsing_accepts_field_names() {
    assert_eq!("likes".parse::<SortBy>().unwrap(), SortBy::Likes);
    assert_eq!("likeCount".parse::<SortBy>().unwrap(), SortBy::Likes);
    assert_eq!("publishedAt".parse::<SortBy>().unwrap(), SortBy::Date);
    assert_eq!("emotionConfidence".parse::<SortBy>().unwrap(), SortBy::Confidence);
    assert!("random".parse::<SortBy>().is_err());
  }
}
