use async_trait::async_trait;

use crate::domain::session::SessionRecord;
use crate::error::Result;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>>;

    async fn insert(&self, session: SessionRecord) -> Result<()>;
}
