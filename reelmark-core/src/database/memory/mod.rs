//! Process-local adapters. State lives for as long as the adapter value.

mod bookmarks;
mod progress;
mod sessions;
mod settings;
mod watch_history;

pub use bookmarks::InMemoryBookmarkRepository;
pub use progress::InMemoryProgressRepository;
pub use sessions::InMemorySessionRepository;
pub use settings::InMemorySettingsRepository;
pub use watch_history::InMemoryWatchHistoryRepository;
