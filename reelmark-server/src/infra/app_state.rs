use std::{fmt, sync::Arc};

use reelmark_core::application::unit_of_work::AppUnitOfWork;
use reelmark_core::domain::clock::{Clock, SystemClock};
use reelmark_core::{
    BookmarkService, ProgressService, SettingsService, WatchHistoryService,
};

use crate::infra::config::Config;
use crate::infra::player_status::PlayerStatusStore;

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub progress: ProgressService,
    pub watch_history: WatchHistoryService,
    pub bookmarks: BookmarkService,
    pub settings: SettingsService,
    pub player_status: Arc<PlayerStatusStore>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("unit_of_work", &self.unit_of_work)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires services over `unit_of_work` using the system clock.
    pub fn new(unit_of_work: AppUnitOfWork, config: Config) -> Self {
        Self::with_clock(unit_of_work, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        unit_of_work: AppUnitOfWork,
        config: Config,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let progress =
            ProgressService::new(unit_of_work.progress.clone(), clock.clone());
        let watch_history = WatchHistoryService::new(
            unit_of_work.watch_history.clone(),
            clock.clone(),
        );
        let bookmarks =
            BookmarkService::new(unit_of_work.bookmarks.clone(), clock.clone());
        let settings = SettingsService::new(unit_of_work.settings.clone());
        let player_status = Arc::new(PlayerStatusStore::new(
            config.player_status.ttl,
            clock.clone(),
        ));

        Self {
            unit_of_work: Arc::new(unit_of_work),
            progress,
            watch_history,
            bookmarks,
            settings,
            player_status,
            clock,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
