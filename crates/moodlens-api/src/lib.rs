//! JSON REST API for moodlens.
//!
//! Exposes an axum [`Router`] backed by any
//! [`moodlens_core::store::CommentStore`]. TLS, CORS and tracing layers are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(moodlens_api::api_router(store.clone()))
//! ```

pub mod comments;
pub mod error;
pub mod videos;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use moodlens_core::store::CommentStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CommentStore + 'static,
{
  Router::new()
    // Read path
    .route("/comments", get(comments::list::<S>))
    .route("/search", get(comments::search::<S>))
    // Videos and ingestion
    .route("/videos/{video_id}", get(videos::get_one::<S>))
    .route("/videos/{video_id}/comments", post(videos::ingest::<S>))
    .with_state(store)
}
