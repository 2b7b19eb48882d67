use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Store, StoreResult};
use crate::model::{Message, NewMessage, Participant};

/// Process-local store; contents vanish on restart.
#[derive(Default)]
pub struct MemoryStore {
    participants: RwLock<Vec<Participant>>,
    messages:     RwLock<Vec<Message>>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
        Ok(self.participants.read().await.iter().find(|p| p.name == name).cloned())
    }

    async fn list_participants(&self) -> StoreResult<Vec<Participant>> {
        Ok(self.participants.read().await.clone())
    }

    async fn find_stale_participants(&self, cutoff: i64) -> StoreResult<Vec<Participant>> {
        Ok(self.participants.read().await
            .iter()
            .filter(|p| p.last_status < cutoff)
            .cloned()
            .collect())
    }

    async fn insert_participant(&self, participant: &Participant) -> StoreResult<()> {
        self.participants.write().await.push(participant.clone());
        Ok(())
    }

    async fn replace_participant(&self, participant: &Participant) -> StoreResult<bool> {
        let mut list = self.participants.write().await;
        match list.iter_mut().find(|p| p.name == participant.name) {
            Some(slot) => { *slot = participant.clone(); Ok(true) }
            None       => Ok(false),
        }
    }

    async fn delete_stale_participants(&self, cutoff: i64) -> StoreResult<u64> {
        let mut list = self.participants.write().await;
        let before = list.len();
        list.retain(|p| p.last_status >= cutoff);
        Ok((before - list.len()) as u64)
    }

    async fn find_message(&self, id: &str) -> StoreResult<Option<Message>> {
        Ok(self.messages.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn list_messages(&self, requester: &str, limit: Option<usize>) -> StoreResult<Vec<Message>> {
        let log = self.messages.read().await;
        let mut visible: Vec<&Message> = log.iter().filter(|m| m.visible_to(requester)).collect();
        if let Some(n) = limit {
            let skip = visible.len().saturating_sub(n);
            visible.drain(..skip);
        }
        Ok(visible.into_iter().cloned().collect())
    }

    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        let stored = message.with_id(new_id());
        self.messages.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn insert_messages(&self, messages: Vec<NewMessage>) -> StoreResult<()> {
        let mut log = self.messages.write().await;
        log.extend(messages.into_iter().map(|m| m.with_id(new_id())));
        Ok(())
    }

    async fn delete_message(&self, id: &str) -> StoreResult<bool> {
        let mut log = self.messages.write().await;
        let before = log.len();
        log.retain(|m| m.id != id);
        Ok(log.len() != before)
    }
}
