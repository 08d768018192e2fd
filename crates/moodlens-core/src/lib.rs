//! Core types and algorithms for the moodlens comment emotion store.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the data model, the emotion taxonomy, comment validation, the
//! [`store::CommentStore`] abstraction, and the four read/write components
//! built on top of it: ingestion, aggregation, querying and the response
//! facade.

#![allow(async_fn_in_trait)]

pub mod comment;
pub mod emotion;
pub mod error;
pub mod facade;
pub mod ingest;
pub mod query;
pub mod stats;
pub mod store;
pub mod validate;
pub mod video;

pub use error::{Error, Result};
