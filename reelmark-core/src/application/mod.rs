//! Application services orchestrating domain logic over repository ports.

pub mod bookmark_service;
pub mod cleanup;
pub mod evaluator;
pub mod history_service;
pub mod progress_service;
pub mod settings_service;
pub mod unit_of_work;

pub use bookmark_service::BookmarkService;
pub use cleanup::plan_cleanup;
pub use evaluator::ProgressEvaluator;
pub use history_service::WatchHistoryService;
pub use progress_service::{ProgressOutcome, ProgressService};
pub use settings_service::SettingsService;
pub use unit_of_work::AppUnitOfWork;
