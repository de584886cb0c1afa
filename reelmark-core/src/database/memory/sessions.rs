use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::ports::sessions::SessionRepository;
use crate::domain::session::SessionRecord;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    by_hash: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>> {
        Ok(self.by_hash.read().await.get(token_hash).cloned())
    }

    async fn insert(&self, session: SessionRecord) -> Result<()> {
        self.by_hash
            .write()
            .await
            .insert(session.token_hash.clone(), session);
        Ok(())
    }
}
