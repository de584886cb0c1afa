//! Short-lived player status snapshots shared between watch-party members.
//!
//! Entries live in process memory only and expire after a fixed TTL. A
//! background sweeper removes them; it is owned by whoever spawns it and
//! stops when its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use reelmark_core::domain::clock::Clock;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// TMDB reference as sent by players: some send numbers, some strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentRef {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerContent {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<ContentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_id: Option<ContentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<ContentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_loading: bool,
    pub has_played_once: bool,
    pub time: f64,
    pub duration: f64,
    pub volume: f64,
    pub playback_rate: f64,
    pub buffered: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub user_id: String,
    pub room_code: String,
    #[serde(default)]
    pub is_host: bool,
    pub content: PlayerContent,
    pub player: PlayerState,
    /// Receipt time in Unix milliseconds. Assigned by the store.
    #[serde(default)]
    pub timestamp: i64,
}

type RoomKey = (String, String);

#[derive(Debug)]
pub struct PlayerStatusStore {
    entries: DashMap<RoomKey, Vec<PlayerStatus>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl PlayerStatusStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Appends a snapshot stamped with the current time. Returns the stamp.
    pub fn record(&self, mut status: PlayerStatus) -> i64 {
        let timestamp = self.clock.now().timestamp_millis();
        status.timestamp = timestamp;
        self.entries
            .entry((status.user_id.clone(), status.room_code.clone()))
            .or_default()
            .push(status);
        timestamp
    }

    /// Unexpired snapshots for one user in one room, oldest first.
    pub fn statuses(&self, user_id: &str, room_code: &str) -> Vec<PlayerStatus> {
        let cutoff = self.cutoff();
        self.entries
            .get(&(user_id.to_owned(), room_code.to_owned()))
            .map(|entry| {
                entry
                    .iter()
                    .filter(|status| status.timestamp >= cutoff)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drops expired snapshots and empty rooms. Returns how many snapshots
    /// were removed.
    pub fn sweep(&self) -> usize {
        let cutoff = self.cutoff();
        let mut removed = 0;
        self.entries.retain(|_, statuses| {
            let before = statuses.len();
            statuses.retain(|status| status.timestamp >= cutoff);
            removed += before - statuses.len();
            !statuses.is_empty()
        });
        removed
    }

    pub fn room_count(&self) -> usize {
        self.entries.len()
    }

    fn cutoff(&self) -> i64 {
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        self.clock.now().timestamp_millis().saturating_sub(ttl_ms)
    }
}

/// Runs [`PlayerStatusStore::sweep`] every `period` until `token` is
/// cancelled.
pub fn spawn_sweeper(
    store: Arc<PlayerStatusStore>,
    period: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Player status sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = store.sweep();
                    if removed > 0 {
                        debug!(removed, rooms = store.room_count(), "Swept player statuses");
                    }
                }
            }
        }
    })
}
