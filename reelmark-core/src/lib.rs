//! # Reelmark Core
//!
//! Domain logic and storage ports for the Reelmark sync service: playback
//! progress with a save-worthiness gate, watch history, bookmarks, per-user
//! settings and the retention pass that keeps "continue watching" lists short.
//!
//! ## Feature Flags
//!
//! - `database`: PostgreSQL adapters and embedded migrations (SQLx)
//! - `postgres-tests`: repository tests against a live database
//!
//! ## Architecture
//!
//! - [`domain`]: identity keys, classification, validation and payload types
//! - [`database`]: repository ports plus in-memory and Postgres adapters
//! - [`application`]: services combining the two, and the unit of work
//!
//! ## Examples
//!
//! ```
//! use reelmark_core::domain::classify::{ProgressState, classify};
//!
//! assert_eq!(classify(3000, 1500), ProgressState::InProgress);
//! assert_eq!(classify(3000, 2950), ProgressState::Completed);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Application services and repository composition
pub mod application;

/// Repository ports and adapters
pub mod database;

/// Domain types and pure decision logic
pub mod domain;

/// Error types shared by the crate
pub mod error;

#[cfg(feature = "database")]
#[cfg_attr(docsrs, doc(cfg(feature = "database")))]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use application::{
    AppUnitOfWork, BookmarkService, ProgressOutcome, ProgressService, SettingsService,
    WatchHistoryService,
};
pub use error::{CoreError, Result};
