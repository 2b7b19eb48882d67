use std::sync::Arc;

use crate::{
    clock::{self, Clock},
    error::{AppErr, AppResult},
    model::{NewMessage, Participant, JOIN_NOTICE},
    store::Store,
    validate::{self, ParticipantInput},
};

#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl Registry {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Adds the participant and announces the arrival to the room.
    ///
    /// The two writes are independent: if the second one fails the
    /// participant stays registered without a join notice.
    pub async fn register(&self, input: &ParticipantInput) -> AppResult<()> {
        let name = validate::participant(input)?;

        // check-then-insert; two simultaneous registrations can both get through
        if self.store.find_participant(name).await?.is_some() {
            return Err(AppErr::Conflict(name.to_owned()));
        }

        let now = self.clock.now();
        self.store
            .insert_participant(&Participant { name: name.to_owned(), last_status: now.timestamp_millis() })
            .await?;
        self.store
            .insert_message(NewMessage::status(name, JOIN_NOTICE, clock::time_of_day(&now)))
            .await?;

        tracing::info!(participant = %name, "joined");
        Ok(())
    }

    pub async fn list(&self) -> AppResult<Vec<Participant>> {
        Ok(self.store.list_participants().await?)
    }

    /// Refreshes `lastStatus` of an existing participant.
    pub async fn heartbeat(&self, name: &str) -> AppResult<()> {
        let not_found = || AppErr::NotFound(format!("participant {name:?}"));

        if self.store.find_participant(name).await?.is_none() {
            return Err(not_found());
        }
        let refreshed = Participant { name: name.to_owned(), last_status: self.clock.now_millis() };
        // swept between the lookup and the write
        if !self.store.replace_participant(&refreshed).await? {
            return Err(not_found());
        }
        tracing::debug!(participant = %name, "heartbeat");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, model::{MessageKind, BROADCAST}, store::MemoryStore};

    fn setup() -> (Registry, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(ManualClock::new(1_000_000));
        (Registry::new(store.clone(), clock.clone()), store, clock)
    }

    fn named(name: &str) -> ParticipantInput {
        ParticipantInput { name: Some(name.into()) }
    }

    #[tokio::test]
    async fn register_stores_participant_and_join_notice() {
        let (reg, store, _) = setup();
        reg.register(&named("ana")).await.unwrap();

        let ps = reg.list().await.unwrap();
        assert_eq!(ps, vec![Participant { name: "ana".into(), last_status: 1_000_000 }]);

        let msgs = store.list_messages("", None).await.unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].kind, MessageKind::Status);
        assert_eq!(msgs[0].to, BROADCAST);
        assert_eq!(msgs[0].text, JOIN_NOTICE);
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let (reg, _, _) = setup();
        reg.register(&named("ana")).await.unwrap();
        assert!(matches!(reg.register(&named("ana")).await, Err(AppErr::Conflict(_))));
        assert_eq!(reg.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_name_is_invalid() {
        let (reg, store, _) = setup();
        assert!(matches!(reg.register(&named("")).await, Err(AppErr::Invalid(_))));
        assert!(store.list_messages("", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn heartbeat_updates_last_status() {
        let (reg, _, clock) = setup();
        reg.register(&named("ana")).await.unwrap();
        clock.advance(7_000);
        reg.heartbeat("ana").await.unwrap();
        assert_eq!(reg.list().await.unwrap()[0].last_status, 1_007_000);
    }

    #[tokio::test]
    async fn heartbeat_for_unknown_is_not_found() {
        let (reg, _, _) = setup();
        assert!(matches!(reg.heartbeat("ghost").await, Err(AppErr::NotFound(_))));
        assert!(matches!(reg.heartbeat("").await, Err(AppErr::NotFound(_))));
    }
}
