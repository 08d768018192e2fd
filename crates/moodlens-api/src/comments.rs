//! Handlers for the comment read path.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/comments` | `?videoId` required; optional `limit`, `page`, `search`, `emotion`, `sortBy` |
//! | `GET`  | `/search` | `?videoId` and `?query` required |
//!
//! Query values are taken as strings and parsed here so that every malformed
//! parameter produces the same JSON `400` body.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use moodlens_core::{
  Error,
  emotion::EmotionFilter,
  facade::{CommentsRequest, CommentsResponse, SearchResponse, search_comments, video_comments},
  query::{CommentQuery, SortBy},
  store::CommentStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommentsParams {
  pub video_id: Option<String>,
  /// Page size; `0` returns every matching comment.
  pub limit:    Option<String>,
  pub page:     Option<String>,
  pub search:   Option<String>,
  /// `all` or an emotion label.
  pub emotion:  Option<String>,
  /// `date` (default), `likes` or `confidence`.
  pub sort_by:  Option<String>,
}

fn parse_int(name: &str, value: Option<&str>, default: i64) -> Result<i64, Error> {
  match value.map(str::trim) {
    None | Some("") => Ok(default),
    Some(v) => v
      .parse()
      .map_err(|_| Error::InvalidQuery(format!("{name} must be an integer, got {v:?}"))),
  }
}

impl CommentsParams {
  /// Convert raw query parameters into a facade request.
  pub fn into_request(self) -> Result<CommentsRequest, Error> {
    let video_id = self
      .video_id
      .filter(|v| !v.trim().is_empty())
      .ok_or_else(|| Error::InvalidQuery("videoId is required".into()))?;

    let defaults = CommentQuery::default();
    let query = CommentQuery {
      limit:   parse_int("limit", self.limit.as_deref(), defaults.limit)?,
      page:    parse_int("page", self.page.as_deref(), defaults.page)?,
      search:  self.search.filter(|s| !s.is_empty()),
      emotion: self
        .emotion
        .as_deref()
        .map(str::parse::<EmotionFilter>)
        .transpose()?
        .unwrap_or_default(),
      sort_by: self
        .sort_by
        .as_deref()
        .map(str::parse::<SortBy>)
        .transpose()?
        .unwrap_or_default(),
    };

    Ok(CommentsRequest { video_id, query })
  }
}

/// `GET /comments?videoId=<id>[&limit=..][&page=..][&search=..][&emotion=..][&sortBy=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<CommentsParams>,
) -> Result<Json<CommentsResponse>, ApiError>
where
  S: CommentStore,
{
  let request = params.into_request()?;
  let response = video_comments(store.as_ref(), &request).await?;
  Ok(Json(response))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  pub video_id: Option<String>,
  pub query:    Option<String>,
}

/// `GET /search?videoId=<id>&query=<text>`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError>
where
  S: CommentStore,
{
  let (Some(video_id), Some(text)) = (params.video_id, params.query) else {
    return Err(ApiError::BadRequest(
      "videoId and query are required".into(),
    ));
  };
  let response = search_comments(store.as_ref(), &video_id, &text).await?;
  Ok(Json(response))
}

#[cfg(test)]
mod tests {
  use moodlens_core::emotion::Emotion;

  use super::*;

  fn params(video_id: &str) -> CommentsParams {
    CommentsParams { video_id: Some(video_id.into()), ..CommentsParams::default() }
  }

  #[test]
  fn defaults_apply_when_absent() {
    let req = params("vid").into_request().unwrap();
    assert_eq!(req.video_id, "vid");
    assert_eq!(req.query, CommentQuery::default());
  }

  #[test]
  fn parses_every_option() {
    let req = CommentsParams {
      limit: Some("0".into()),
      page: Some("2".into()),
      search: Some("great".into()),
      emotion: Some("joy".into()),
      sort_by: Some("likes".into()),
      ..params("vid")
    }
    .into_request()
    .unwrap();

    assert_eq!(req.query.limit, 0);
    assert_eq!(req.query.page, 2);
    assert_eq!(req.query.search.as_deref(), Some("great"));
    assert_eq!(req.query.emotion, EmotionFilter::Only(Emotion::Joy));
    assert_eq!(req.query.sort_by, SortBy::Likes);
  }

  #[test]
  fn missing_video_id_is_invalid() {
    let err = CommentsParams::default().into_request().unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));
  }

  #[test]
  fn non_numeric_limit_is_invalid() {
    let err = CommentsParams { limit: Some("ten".into()), ..params("vid") }
      .into_request()
      .unwrap_err();
    assert!(matches!(err, Error::InvalidQuery(_)));
  }
}
