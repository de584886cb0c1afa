pub mod auth;
pub mod bookmark_handlers;
pub mod progress_handlers;
pub mod responses;
pub mod settings_handlers;
pub mod watch_history_handlers;
