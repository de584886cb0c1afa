//! Repository ports (interfaces) grouped by entity.

pub mod bookmarks;
pub mod progress;
pub mod sessions;
pub mod settings;
pub mod watch_history;
