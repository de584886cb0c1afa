#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use reelmark_core::application::unit_of_work::AppUnitOfWork;
use reelmark_core::domain::clock::SystemClock;
use reelmark_core::domain::ids::UserId;
use reelmark_core::domain::session::{SessionRecord, hash_token};
use reelmark_server::AppState;
use reelmark_server::infra::config::Config;
use reelmark_server::routes::create_app;
use uuid::Uuid;

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_config(Config {
            dev_mode: false,
            ..Config::development()
        })
        .await
    }

    pub async fn with_config(config: Config) -> Self {
        let state = AppState::with_clock(
            AppUnitOfWork::in_memory(),
            config,
            Arc::new(SystemClock),
        );
        let server =
            TestServer::new(create_app(state.clone())).expect("test server");
        Self { server, state }
    }

    /// Stores a session for `user_id` and returns its bearer token.
    pub async fn token_for(&self, user_id: &str) -> String {
        self.session(user_id, Duration::days(1)).await
    }

    pub async fn expired_token_for(&self, user_id: &str) -> String {
        self.session(user_id, Duration::seconds(-1)).await
    }

    async fn session(&self, user_id: &str, ttl: Duration) -> String {
        let token = format!("token-{user_id}-{}", Uuid::new_v4());
        let now = Utc::now();
        self.state
            .unit_of_work
            .sessions
            .insert(SessionRecord {
                id: Uuid::new_v4(),
                user_id: UserId::new(user_id),
                token_hash: hash_token(&token),
                created_at: now,
                expires_at: now + ttl,
            })
            .await
            .expect("session stored");
        token
    }
}
