use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use super::{Store, StoreError, StoreResult};
use crate::model::{Message, MessageKind, NewMessage, Participant};

/* `seq` keeps insertion order; `id` is the public handle. */
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS participants (
    name        TEXT    NOT NULL,
    last_status INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS messages (
    seq       INTEGER PRIMARY KEY AUTOINCREMENT,
    id        TEXT    NOT NULL UNIQUE,
    sender    TEXT    NOT NULL,
    recipient TEXT    NOT NULL,
    text      TEXT    NOT NULL,
    kind      TEXT    NOT NULL,
    time      TEXT    NOT NULL
);
"#;

type MessageRow = (String, String, String, String, String, String);

const MESSAGE_COLUMNS: &str = "id, sender, recipient, text, kind, time";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database and makes sure both tables exist.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

fn to_message((id, from, to, text, kind, time): MessageRow) -> StoreResult<Message> {
    let kind = MessageKind::parse(&kind)
        .ok_or_else(|| StoreError::Corrupt(format!("message {id} has type {kind:?}")))?;
    Ok(Message { id, from, to, text, kind, time })
}

fn to_participant((name, last_status): (String, i64)) -> Participant {
    Participant { name, last_status }
}

async fn insert_one<'e, E>(exec: E, id: &str, m: &NewMessage) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query("INSERT INTO messages (id, sender, recipient, text, kind, time) VALUES (?,?,?,?,?,?)")
        .bind(id)
        .bind(&m.from)
        .bind(&m.to)
        .bind(&m.text)
        .bind(m.kind.as_str())
        .bind(&m.time)
        .execute(exec)
        .await?;
    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name, last_status FROM participants WHERE name = ? LIMIT 1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(to_participant))
    }

    async fn list_participants(&self) -> StoreResult<Vec<Participant>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT name, last_status FROM participants ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(to_participant).collect())
    }

    async fn find_stale_participants(&self, cutoff: i64) -> StoreResult<Vec<Participant>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT name, last_status FROM participants WHERE last_status < ? ORDER BY rowid")
                .bind(cutoff)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(to_participant).collect())
    }

    async fn insert_participant(&self, p: &Participant) -> StoreResult<()> {
        sqlx::query("INSERT INTO participants (name, last_status) VALUES (?,?)")
            .bind(&p.name)
            .bind(p.last_status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_participant(&self, p: &Participant) -> StoreResult<bool> {
        let done = sqlx::query("UPDATE participants SET last_status = ? WHERE name = ?")
            .bind(p.last_status)
            .bind(&p.name)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete_stale_participants(&self, cutoff: i64) -> StoreResult<u64> {
        let done = sqlx::query("DELETE FROM participants WHERE last_status < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }

    async fn find_message(&self, id: &str) -> StoreResult<Option<Message>> {
        let row: Option<MessageRow> =
            sqlx::query_as(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(to_message).transpose()
    }

    async fn list_messages(&self, requester: &str, limit: Option<usize>) -> StoreResult<Vec<Message>> {
        // newest `limit` visible rows, handed back oldest first; LIMIT -1 is unbounded
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM (
                 SELECT seq, {MESSAGE_COLUMNS} FROM messages
                 WHERE kind <> 'private_message' OR sender = ? OR recipient = ?
                 ORDER BY seq DESC LIMIT ?
             ) ORDER BY seq"
        );
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let rows: Vec<MessageRow> = sqlx::query_as(&sql)
            .bind(requester)
            .bind(requester)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(to_message).collect()
    }

    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        let id = uuid::Uuid::new_v4().to_string();
        insert_one(&self.pool, &id, &message).await?;
        Ok(message.with_id(id))
    }

    async fn insert_messages(&self, messages: Vec<NewMessage>) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for m in &messages {
            insert_one(&mut *tx, &uuid::Uuid::new_v4().to_string(), m).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_message(&self, id: &str) -> StoreResult<bool> {
        let done = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
