//! HTTP server assembly for moodlens.
//!
//! Wraps the JSON API router from `moodlens-api` with request tracing and a
//! CORS policy, and defines the configuration the server binary reads.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
};
use moodlens_core::store::CommentStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MOODLENS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  /// Browser origins allowed to call the API cross-origin.
  #[serde(default = "default_allowed_origins")]
  pub allowed_origins: Vec<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("moodlens.db") }

fn default_allowed_origins() -> Vec<String> {
  vec![
    "http://localhost:3000".to_string(),
    "http://localhost:5173".to_string(),
  ]
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            default_host(),
      port:            default_port(),
      store_path:      default_store_path(),
      allowed_origins: default_allowed_origins(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// CORS policy admitting `origins` for `GET`/`POST` with JSON bodies.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
  let allowed: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|o| match HeaderValue::from_str(o) {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(origin = %o, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(allowed))
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE])
}

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: CommentStore + 'static,
{
  moodlens_api::api_router(store)
    .layer(cors_layer(&config.allowed_origins))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
