//! [`SqliteStore`], the SQLite implementation of [`CommentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::info;

use moodlens_core::{
  comment::{Comment, EmotionAnalysis, NewComment},
  store::{CommentStore, UpsertOutcome},
  video::{Video, VideoMetadata},
};

use crate::{
  Result,
  encode::{
    COMMENT_COLUMNS, RawComment, RawVideo, VIDEO_COLUMNS, encode_analysis, encode_count,
    encode_dt, encode_emotion,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A moodlens store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CommentStore impl ───────────────────────────────────────────────────────

impl CommentStore for SqliteStore {
  type Error = crate::Error;

  // ── Videos ────────────────────────────────────────────────────────────────

  async fn upsert_video(&self, video_id: &str, metadata: &VideoMetadata) -> Result<Video> {
    let id_str            = video_id.to_owned();
    let title             = metadata.title.clone();
    let description       = metadata.description.clone();
    let thumbnail         = metadata.thumbnail.clone();
    let view_count        = encode_count(metadata.view_count)?;
    let like_count        = encode_count(metadata.like_count)?;
    let comment_count     = encode_count(metadata.comment_count)?;
    let channel_id        = metadata.channel_id.clone();
    let channel_title     = metadata.channel_title.clone();
    let published_at_str  = metadata.published_at.map(encode_dt);
    let now_str           = encode_dt(Utc::now());

    let raw: RawVideo = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Absent fields keep their stored value; `last_analyzed` always moves.
        tx.execute(
          "INSERT INTO videos (
             video_id, title, description, thumbnail,
             view_count, like_count, comment_count,
             channel_id, channel_title, published_at,
             created_at, last_analyzed
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
           ON CONFLICT(video_id) DO UPDATE SET
             title         = COALESCE(excluded.title,         videos.title),
             description   = COALESCE(excluded.description,   videos.description),
             thumbnail     = COALESCE(excluded.thumbnail,     videos.thumbnail),
             view_count    = COALESCE(excluded.view_count,    videos.view_count),
             like_count    = COALESCE(excluded.like_count,    videos.like_count),
             comment_count = COALESCE(excluded.comment_count, videos.comment_count),
             channel_id    = COALESCE(excluded.channel_id,    videos.channel_id),
             channel_title = COALESCE(excluded.channel_title, videos.channel_title),
             published_at  = COALESCE(excluded.published_at,  videos.published_at),
             last_analyzed = excluded.last_analyzed",
          rusqlite::params![
            id_str,
            title,
            description,
            thumbnail,
            view_count,
            like_count,
            comment_count,
            channel_id,
            channel_title,
            published_at_str,
            now_str,
          ],
        )?;
        let raw = tx.query_row(
          &format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE video_id = ?1"),
          rusqlite::params![id_str],
          RawVideo::from_row,
        )?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_video()
  }

  async fn get_video(&self, video_id: &str) -> Result<Option<Video>> {
    let id_str = video_id.to_owned();

    let raw: Option<RawVideo> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE video_id = ?1"),
            rusqlite::params![id_str],
            RawVideo::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawVideo::into_video).transpose()
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn upsert_comment(&self, comment: NewComment) -> Result<UpsertOutcome> {
    let now = Utc::now();
    let analysis_str = comment
      .emotion_analysis
      .map(|a| encode_analysis(&EmotionAnalysis::stamped(a, now)))
      .transpose()?;
    let like_count       = encode_count(comment.like_count)?;
    let published_at_str = comment.published_at.map(encode_dt);
    let emotion_str      = encode_emotion(comment.emotion);
    let now_str          = encode_dt(now);

    let NewComment {
      video_id,
      comment_id,
      text,
      author,
      author_channel_id,
      emotion_confidence,
      ..
    } = comment;

    let existed: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existed = tx
          .query_row(
            "SELECT 1 FROM comments WHERE comment_id = ?1",
            rusqlite::params![comment_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();

        // Every mutable column is overwritten; `created_at` and the rowid
        // survive.
        tx.execute(
          "INSERT INTO comments (
             comment_id, video_id, text, author, author_channel_id,
             like_count, published_at, emotion, emotion_confidence,
             analysis_json, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
           ON CONFLICT(comment_id) DO UPDATE SET
             video_id           = excluded.video_id,
             text               = excluded.text,
             author             = excluded.author,
             author_channel_id  = excluded.author_channel_id,
             like_count         = excluded.like_count,
             published_at       = excluded.published_at,
             emotion            = excluded.emotion,
             emotion_confidence = excluded.emotion_confidence,
             analysis_json      = excluded.analysis_json,
             updated_at         = excluded.updated_at",
          rusqlite::params![
            comment_id,
            video_id,
            text,
            author,
            author_channel_id,
            like_count,
            published_at_str,
            emotion_str,
            emotion_confidence,
            analysis_str,
            now_str,
          ],
        )?;
        tx.commit()?;
        Ok(existed)
      })
      .await?;

    Ok(if existed { UpsertOutcome::Updated } else { UpsertOutcome::Inserted })
  }

  async fn get_comment(&self, comment_id: &str) -> Result<Option<Comment>> {
    let id_str = comment_id.to_owned();

    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ?1"),
            rusqlite::params![id_str],
            RawComment::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn list_comments(&self, video_id: &str) -> Result<Vec<Comment>> {
    let id_str = video_id.to_owned();

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMMENT_COLUMNS} FROM comments WHERE video_id = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }
}
