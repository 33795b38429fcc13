//! In-memory risk storage
//!
//! A single `RiskStore` lives for the whole process and is shared by every
//! worker through `web::Data`. Reads take the shared side of the lock, `put`
//! takes the exclusive side. The lock is synchronous and is only ever held
//! for the map access itself, never across an `.await`.

use crate::models::Risk;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct RiskStore {
    risks: RwLock<HashMap<Uuid, Risk>>,
}

impl RiskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the risk stored under `id`.
    pub fn put(&self, id: Uuid, risk: Risk) {
        self.risks.write().insert(id, risk);
    }

    pub fn get(&self, id: &Uuid) -> Option<Risk> {
        self.risks.read().get(id).cloned()
    }

    /// Point-in-time copy of every stored risk. Order is unspecified.
    pub fn list_all(&self) -> Vec<Risk> {
        // Copies the whole map, cost grows with the collection.
        self.risks.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.risks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.risks.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskState;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn risk(state: RiskState) -> Risk {
        Risk::new(state, "foo".to_string(), "hello world".to_string())
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = RiskStore::new();
        assert!(store.is_empty());
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let store = RiskStore::new();
        let r = risk(RiskState::Open);
        store.put(r.id, r.clone());

        assert_eq!(store.get(&r.id), Some(r));
        assert_eq!(store.get(&Uuid::new_v4()), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let store = RiskStore::new();
        let mut r = risk(RiskState::Open);
        store.put(r.id, r.clone());

        r.state = RiskState::Closed;
        store.put(r.id, r.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&r.id).map(|r| r.state), Some(RiskState::Closed));
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        const WRITERS: usize = 4;
        const PER_WRITER: usize = 1000;

        let store = Arc::new(RiskStore::new());

        let handles: Vec<_> = RiskState::ALL
            .into_iter()
            .cycle()
            .take(WRITERS)
            .map(|state| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..PER_WRITER {
                        let r = risk(state);
                        store.put(r.id, r);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let all = store.list_all();
        assert_eq!(all.len(), WRITERS * PER_WRITER);

        let ids: HashSet<_> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), WRITERS * PER_WRITER);
        assert!(all.iter().all(|r| !r.id.is_nil() && r.title == "foo"));
    }

    #[test]
    fn test_snapshots_are_consistent_under_writes() {
        let store = Arc::new(RiskStore::new());

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..2000 {
                    let r = risk(RiskState::Accepted);
                    store.put(r.id, r);
                }
            })
        };

        // Snapshot sizes never shrink and never contain duplicate ids.
        let mut last_len = 0;
        while !writer.is_finished() {
            let snapshot = store.list_all();
            let ids: HashSet<_> = snapshot.iter().map(|r| r.id).collect();
            assert_eq!(ids.len(), snapshot.len());
            assert!(snapshot.len() >= last_len);
            last_len = snapshot.len();
        }
        writer.join().unwrap();

        assert_eq!(store.len(), 2000);
    }
}
