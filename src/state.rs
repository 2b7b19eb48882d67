use std::sync::Arc;

use crate::{clock::Clock, messages::MessageLog, registry::Registry, store::Store};

/* ------------ shared by every handler ------------ */
#[derive(Clone)]
pub struct Chat {
    pub registry: Registry,
    pub log:      MessageLog,
}

impl Chat {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Registry::new(store.clone(), clock.clone()),
            log:      MessageLog::new(store, clock),
        }
    }
}
