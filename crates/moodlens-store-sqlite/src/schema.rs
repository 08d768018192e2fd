//! SQL schema for the moodlens SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS videos (
    video_id       TEXT PRIMARY KEY,
    title          TEXT,
    description    TEXT,
    thumbnail      TEXT,
    view_count     INTEGER CHECK (view_count    IS NULL OR view_count    >= 0),
    like_count     INTEGER CHECK (like_count    IS NULL OR like_count    >= 0),
    comment_count  INTEGER CHECK (comment_count IS NULL OR comment_count >= 0),
    channel_id     TEXT,
    channel_title  TEXT,
    published_at   TEXT,            -- ISO 8601 UTC
    created_at     TEXT NOT NULL,
    last_analyzed  TEXT NOT NULL    -- refreshed on every analysis run
);

-- One row per platform comment id. Re-ingestion overwrites in place, which
-- keeps the rowid and therefore the retrieval order.
CREATE TABLE IF NOT EXISTS comments (
    comment_id         TEXT PRIMARY KEY,
    video_id           TEXT NOT NULL,   -- not a foreign key; videos may arrive later
    text               TEXT NOT NULL CHECK (length(trim(text)) > 0),
    author             TEXT,
    author_channel_id  TEXT,
    like_count         INTEGER CHECK (like_count IS NULL OR like_count >= 0),
    published_at       TEXT,
    emotion            TEXT NOT NULL CHECK (emotion IN (
                         'joy', 'sadness', 'anger', 'fear', 'surprise', 'love', 'neutral'
                       )),
    emotion_confidence REAL NOT NULL CHECK (emotion_confidence BETWEEN 0.0 AND 1.0),
    analysis_json      TEXT,            -- JSON-encoded EmotionAnalysis or NULL
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS comments_video_emotion_idx    ON comments(video_id, emotion);
CREATE INDEX IF NOT EXISTS comments_video_published_idx  ON comments(video_id, published_at DESC);
CREATE INDEX IF NOT EXISTS comments_video_likes_idx      ON comments(video_id, like_count DESC);
CREATE INDEX IF NOT EXISTS comments_video_confidence_idx ON comments(video_id, emotion_confidence DESC);

PRAGMA user_version = 1;
";
