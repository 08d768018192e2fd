//! The query facade, the only component that knows the response shape.
//!
//! It reads a video's comments once and feeds the same snapshot to both the
//! aggregator and the query engine, so the statistics and the page always
//! describe the same data.

use serde::Serialize;

use crate::{
  Error, Result,
  comment::Comment,
  query::{CommentPage, CommentQuery, text_contains},
  stats::EmotionStats,
  store::CommentStore,
  video::Video,
};

/// A request for one page of a video's comments.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentsRequest {
  pub video_id: String,
  pub query:    CommentQuery,
}

impl CommentsRequest {
  pub fn new(video_id: impl Into<String>, query: CommentQuery) -> Self {
    Self { video_id: video_id.into(), query }
  }
}

/// Pagination metadata for a [`CommentsResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub page:        u64,
  pub total_pages: u64,
  /// Matching comments across all pages.
  pub total:       u64,
}

/// Video metadata, the requested page of comments, and emotion statistics
/// over every comment of the video (unaffected by the page's filters).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsResponse {
  pub video_info:    Video,
  pub comments:      Vec<Comment>,
  pub emotion_stats: EmotionStats,
  pub pagination:    Pagination,
}

impl CommentsResponse {
  fn assemble(video_info: Video, stats: EmotionStats, page: CommentPage) -> Self {
    Self {
      video_info,
      comments: page.comments,
      emotion_stats: stats,
      pagination: Pagination {
        page:        page.page,
        total_pages: page.total_pages,
        total:       page.total_count,
      },
    }
  }
}

/// Answer a [`CommentsRequest`].
///
/// Fails with [`Error::InvalidQuery`] before touching the store when the
/// pagination parameters are out of range, and with [`Error::VideoNotFound`]
/// when no video record exists, even if comments for that id do.
pub async fn video_comments<S>(store: &S, request: &CommentsRequest) -> Result<CommentsResponse>
where
  S: CommentStore,
{
  request.query.validate()?;

  let video = store
    .get_video(&request.video_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::VideoNotFound(request.video_id.clone()))?;

  let comments = store
    .list_comments(&request.video_id)
    .await
    .map_err(Error::store)?;

  let stats = EmotionStats::from_comments(&comments);
  let page = request.query.apply(comments)?;

  Ok(CommentsResponse::assemble(video, stats, page))
}

/// Result of a free-text search over one video's comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
  pub comments: Vec<Comment>,
}

/// Every comment of `video_id` whose text contains `text`, ignoring case, in
/// retrieval order.
pub async fn search_comments<S>(store: &S, video_id: &str, text: &str) -> Result<SearchResponse>
where
  S: CommentStore,
{
  if text.is_empty() {
    return Err(Error::InvalidQuery("search text is required".into()));
  }

  let needle = text.to_lowercase();
  let comments = store
    .list_comments(video_id)
    .await
    .map_err(Error::store)?
    .into_iter()
    .filter(|c| text_contains(c, &needle))
    .collect();

  Ok(SearchResponse { comments })
}
