//! Persistence for the two collections, `participants` and `messages`.
//!
//! Every method is a single store operation and is atomic on its own;
//! callers that chain several of them get no atomicity across the chain.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::model::{Message, NewMessage, Participant};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("DB: {0}")]
    Db(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /* ---------------- participants ---------------- */
    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>>;
    async fn list_participants(&self) -> StoreResult<Vec<Participant>>;
    /// Participants whose `last_status` is strictly before `cutoff`.
    async fn find_stale_participants(&self, cutoff: i64) -> StoreResult<Vec<Participant>>;
    async fn insert_participant(&self, participant: &Participant) -> StoreResult<()>;
    /// Replaces the document with the same name; `false` if none matched.
    async fn replace_participant(&self, participant: &Participant) -> StoreResult<bool>;
    /// Deletes every participant with `last_status < cutoff`, returns the count.
    async fn delete_stale_participants(&self, cutoff: i64) -> StoreResult<u64>;

    /* ---------------- messages ---------------- */
    async fn find_message(&self, id: &str) -> StoreResult<Option<Message>>;
    /// Messages `requester` may see, in insertion order. With `limit`,
    /// only the newest `limit` of them.
    async fn list_messages(&self, requester: &str, limit: Option<usize>) -> StoreResult<Vec<Message>>;
    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message>;
    async fn insert_messages(&self, messages: Vec<NewMessage>) -> StoreResult<()>;
    /// `false` if no message had that id.
    async fn delete_message(&self, id: &str) -> StoreResult<bool>;
}
