use std::sync::Arc;

use crate::{
    clock::Clock,
    error::{AppErr, AppResult},
    model::Message,
    store::Store,
    validate::{self, MessageInput},
};

#[derive(Clone)]
pub struct MessageLog {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl MessageLog {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Posts a message on behalf of `user`, who must be a registered participant.
    pub async fn append(&self, user: &str, input: MessageInput) -> AppResult<Message> {
        let from = self.store
            .find_participant(user)
            .await?
            .map(|p| p.name)
            .unwrap_or_default();

        let draft = validate::message(&from, input, self.clock.time_of_day())?;
        let stored = self.store.insert_message(draft).await?;
        tracing::debug!(id = %stored.id, from = %stored.from, kind = stored.kind.as_str(), "message posted");
        Ok(stored)
    }

    /// Messages `requester` may see, in posting order; with `limit`, only the
    /// newest `limit` of them.
    pub async fn list(&self, requester: &str, limit: Option<usize>) -> AppResult<Vec<Message>> {
        Ok(self.store.list_messages(requester, limit).await?)
    }

    /// Removes a message; only its sender may do so.
    pub async fn delete(&self, requester: &str, id: &str) -> AppResult<()> {
        let Some(message) = self.store.find_message(id).await? else {
            return Err(AppErr::NotFound(format!("message {id}")));
        };
        if message.from != requester {
            return Err(AppErr::Unauthorized(id.to_owned()));
        }
        if !self.store.delete_message(id).await? {
            return Err(AppErr::NotFound(format!("message {id}")));
        }
        tracing::debug!(%id, by = %requester, "message deleted");
        Ok(())
    }
}
