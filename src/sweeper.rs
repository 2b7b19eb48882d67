use std::{sync::Arc, time::Duration};

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::{
    clock::{self, Clock},
    model::{NewMessage, LEAVE_NOTICE},
    store::{Store, StoreResult},
};

/// Evicts participants that stopped sending heartbeats.
pub struct Sweeper {
    store:  Arc<dyn Store>,
    clock:  Arc<dyn Clock>,
    cutoff: Duration,
}

impl Sweeper {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, cutoff: Duration) -> Self {
        Self { store, clock, cutoff }
    }

    /// Sweeps every `period`, forever. Each sweep finishes before the next
    /// tick is awaited, so sweeps never overlap.
    pub async fn run(self, period: Duration) {
        let mut tick = time::interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            if let Err(e) = self.sweep().await {
                tracing::error!(error = %e, "presence sweep failed");
            }
        }
    }

    /// One pass: drops stale participants and posts a leave notice for each.
    /// Returns how many were evicted.
    pub async fn sweep(&self) -> StoreResult<usize> {
        let now = self.clock.now();
        let cutoff = now.timestamp_millis() - self.cutoff.as_millis() as i64;

        let stale = self.store.find_stale_participants(cutoff).await?;
        if stale.is_empty() { return Ok(0); }

        let stamp = clock::time_of_day(&now);
        let notices: Vec<_> = stale
            .iter()
            .map(|p| NewMessage::status(&p.name, LEAVE_NOTICE, stamp.clone()))
            .collect();

        // not atomic: a failure below leaves participants gone without notices
        let deleted = self.store.delete_stale_participants(cutoff).await?;
        if deleted < stale.len() as u64 {
            // heartbeat landed between the lookup and the delete
            tracing::debug!(found = stale.len(), deleted, "some stale participants came back before eviction");
        }
        self.store.insert_messages(notices).await?;

        tracing::info!(
            evicted = stale.len(),
            names = ?stale.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            "presence sweep"
        );
        Ok(stale.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::{
        clock::ManualClock,
        model::{Message, MessageKind, Participant, BROADCAST},
        store::MemoryStore,
    };

    const START: i64 = 1_700_000_000_000;

    async fn setup() -> (Sweeper, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(ManualClock::new(START));
        for (name, at) in [("ana", START - 12_000), ("bia", START - 3_000)] {
            store.insert_participant(&Participant { name: name.into(), last_status: at }).await.unwrap();
        }
        let sweeper = Sweeper::new(store.clone(), clock.clone(), Duration::from_millis(10_000));
        (sweeper, store, clock)
    }

    #[tokio::test]
    async fn evicts_only_stale_and_announces() {
        let (sweeper, store, _) = setup().await;
        assert_eq!(sweeper.sweep().await.unwrap(), 1);

        let names: Vec<_> = store.list_participants().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["bia"]);

        let msgs = store.list_messages("", None).await.unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].from, "ana");
        assert_eq!(msgs[0].to, BROADCAST);
        assert_eq!(msgs[0].text, LEAVE_NOTICE);
        assert_eq!(msgs[0].kind, MessageKind::Status);
    }

    #[tokio::test]
    async fn nothing_stale_writes_nothing() {
        let (sweeper, store, _) = setup().await;
        sweeper.sweep().await.unwrap();
        assert_eq!(sweeper.sweep().await.unwrap(), 0);
        assert_eq!(store.list_messages("", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn later_sweep_catches_newly_stale() {
        let (sweeper, store, clock) = setup().await;
        sweeper.sweep().await.unwrap();
        clock.advance(8_000);
        assert_eq!(sweeper.sweep().await.unwrap(), 1);
        assert!(store.list_participants().await.unwrap().is_empty());
    }

    /// Every participant it reports as stale sends a heartbeat right after.
    struct HeartbeatAfterLookup(MemoryStore);

    #[async_trait]
    impl Store for HeartbeatAfterLookup {
        async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
            self.0.find_participant(name).await
        }
        async fn list_participants(&self) -> StoreResult<Vec<Participant>> {
            self.0.list_participants().await
        }
        async fn find_stale_participants(&self, cutoff: i64) -> StoreResult<Vec<Participant>> {
            let stale = self.0.find_stale_participants(cutoff).await?;
            for p in &stale {
                self.0.replace_participant(&Participant { name: p.name.clone(), last_status: START }).await?;
            }
            Ok(stale)
        }
        async fn insert_participant(&self, p: &Participant) -> StoreResult<()> {
            self.0.insert_participant(p).await
        }
        async fn replace_participant(&self, p: &Participant) -> StoreResult<bool> {
            self.0.replace_participant(p).await
        }
        async fn delete_stale_participants(&self, cutoff: i64) -> StoreResult<u64> {
            self.0.delete_stale_participants(cutoff).await
        }
        async fn find_message(&self, id: &str) -> StoreResult<Option<Message>> {
            self.0.find_message(id).await
        }
        async fn list_messages(&self, requester: &str, limit: Option<usize>) -> StoreResult<Vec<Message>> {
            self.0.list_messages(requester, limit).await
        }
        async fn insert_message(&self, m: NewMessage) -> StoreResult<Message> {
            self.0.insert_message(m).await
        }
        async fn insert_messages(&self, ms: Vec<NewMessage>) -> StoreResult<()> {
            self.0.insert_messages(ms).await
        }
        async fn delete_message(&self, id: &str) -> StoreResult<bool> {
            self.0.delete_message(id).await
        }
    }

    #[tokio::test]
    async fn heartbeat_during_sweep_keeps_participant() {
        let store = Arc::new(HeartbeatAfterLookup(MemoryStore::default()));
        store.insert_participant(&Participant { name: "ana".into(), last_status: START - 12_000 }).await.unwrap();
        let sweeper = Sweeper::new(store.clone(), Arc::new(ManualClock::new(START)), Duration::from_millis(10_000));

        assert_eq!(sweeper.sweep().await.unwrap(), 1);

        // survives the delete, but the leave notice is still written
        let names: Vec<_> = store.list_participants().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["ana"]);
        let msgs = store.list_messages("", None).await.unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].text, LEAVE_NOTICE);
    }

    #[tokio::test(start_paused = true)]
    async fn run_sweeps_after_each_period() {
        let (sweeper, store, _) = setup().await;
        let handle = tokio::spawn(sweeper.run(Duration::from_millis(15_000)));

        time::sleep(Duration::from_millis(14_000)).await;
        assert_eq!(store.list_participants().await.unwrap().len(), 2);

        time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(store.list_participants().await.unwrap().len(), 1);
        handle.abort();
    }
}
