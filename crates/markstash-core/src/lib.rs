//! markstash-core - Core library for Markstash
//!
//! This crate contains the shared models and the hosted-backend clients
//! (auth, bookmark store, realtime notifications) used by the Markstash
//! interfaces.

pub mod auth;
pub mod models;
pub mod realtime;
pub mod store;
pub mod util;

pub use models::{Bookmark, BookmarkId};
