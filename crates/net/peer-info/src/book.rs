//! Peer book with Arc-per-peer records for callers that share peers across tasks.

use std::collections::HashMap;
use std::sync::Arc;

use libp2p::PeerId;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::identity::PeerIdentity;
use crate::info::PeerInfo;
use crate::set::AddressSetConfig;

/// A record shared between tasks. Writers serialize on the per-peer lock.
pub type SharedPeerInfo<Id = PeerId> = Arc<RwLock<PeerInfo<Id>>>;

/// Peer book configuration.
#[derive(Debug, Clone, Default)]
pub struct PeerBookConfig {
    /// Applied to every record the book creates.
    pub address_set: AddressSetConfig,
}

/// Tracks one [`PeerInfo`] per identity.
///
/// The map lock is held only long enough to clone the `Arc`; address updates
/// then lock the single record.
#[derive(Debug)]
pub struct PeerBook<Id: PeerIdentity = PeerId> {
    config: PeerBookConfig,
    peers: RwLock<HashMap<Id, SharedPeerInfo<Id>>>,
}

impl<Id: PeerIdentity> Default for PeerBook<Id> {
    fn default() -> Self {
        Self::new(PeerBookConfig::default())
    }
}

impl<Id: PeerIdentity> PeerBook<Id> {
    pub fn new(config: PeerBookConfig) -> Self {
        Self {
            config,
            peers: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &PeerBookConfig {
        &self.config
    }

    /// Insert `info`, replacing any record with the same identity.
    ///
    /// Returns the replaced record, if any.
    pub fn insert(&self, info: PeerInfo<Id>) -> Option<SharedPeerInfo<Id>> {
        let id = info.id().clone();
        let old = self
            .peers
            .write()
            .insert(id.clone(), Arc::new(RwLock::new(info)));
        debug!(?id, replaced = old.is_some(), "peer info inserted");
        old
    }

    pub fn get(&self, id: &Id) -> Option<SharedPeerInfo<Id>> {
        self.peers.read().get(id).cloned()
    }

    /// Get or create the record for `id`. New records use the book's address config.
    pub fn get_or_insert(&self, id: Id) -> SharedPeerInfo<Id> {
        if let Some(info) = self.peers.read().get(&id) {
            return Arc::clone(info);
        }

        let mut peers = self.peers.write();
        Arc::clone(peers.entry(id).or_insert_with_key(|id| {
            trace!(?id, "peer info created");
            Arc::new(RwLock::new(PeerInfo::with_config(
                id.clone(),
                self.config.address_set.clone(),
            )))
        }))
    }

    /// Stop tracking `id`. Outstanding `Arc`s stay valid until dropped.
    pub fn remove(&self, id: &Id) -> Option<SharedPeerInfo<Id>> {
        let removed = self.peers.write().remove(id);
        if removed.is_some() {
            debug!(?id, "peer info removed");
        }
        removed
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.peers.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    pub fn ids(&self) -> Vec<Id> {
        self.peers.read().keys().cloned().collect()
    }

    /// Identities whose record has an open connection.
    pub fn connected_ids(&self) -> Vec<Id> {
        self.peers
            .read()
            .iter()
            .filter(|(_, info)| info.read().is_connected())
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.peers.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    struct TestId(u64);

    #[test]
    fn test_book_basic() {
        let book: PeerBook<TestId> = PeerBook::default();
        assert!(book.is_empty());

        let info = book.get_or_insert(TestId(1));
        info.write().multiaddrs_mut().add("/ip4/127.0.0.1/tcp/1634").unwrap();

        assert_eq!(book.len(), 1);
        assert!(book.contains(&TestId(1)));

        // same Arc on second lookup
        let again = book.get_or_insert(TestId(1));
        assert!(Arc::ptr_eq(&info, &again));
        assert_eq!(again.read().multiaddrs().len(), 1);
    }

    #[test]
    fn test_book_applies_config() {
        let book: PeerBook<TestId> = PeerBook::new(PeerBookConfig {
            address_set: AddressSetConfig::bounded(1),
        });

        let info = book.get_or_insert(TestId(1));
        assert_eq!(info.read().multiaddrs().config().max_observed, Some(1));
    }

    #[test]
    fn test_book_insert_replaces() {
        let book = PeerBook::default();

        assert!(book.insert(PeerInfo::new(TestId(1))).is_none());

        let mut fresh = PeerInfo::new(TestId(1));
        fresh.multiaddrs_mut().add("/ip4/127.0.0.1/tcp/1").unwrap();
        let old = book.insert(fresh).unwrap();

        assert!(old.read().multiaddrs().is_empty());
        assert_eq!(book.get(&TestId(1)).unwrap().read().multiaddrs().len(), 1);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_book_remove() {
        let book = PeerBook::default();
        let held = book.get_or_insert(TestId(7));

        assert!(book.remove(&TestId(7)).is_some());
        assert!(book.remove(&TestId(7)).is_none());
        assert!(book.get(&TestId(7)).is_none());

        // removal does not invalidate handles already given out
        held.write().connect("/ip4/10.0.0.1/tcp/1").unwrap();
        assert!(held.read().is_connected());
    }

    #[test]
    fn test_book_connected_ids() {
        let book = PeerBook::default();
        for i in 1..=3 {
            book.get_or_insert(TestId(i));
        }
        book.get_or_insert(TestId(2))
            .write()
            .connect("/ip4/127.0.0.1/tcp/2")
            .unwrap();

        assert_eq!(book.connected_ids(), vec![TestId(2)]);
        assert_eq!(book.ids().len(), 3);

        book.clear();
        assert!(book.is_empty());
    }

    #[test]
    fn test_book_concurrent_add_safe() {
        use std::thread;

        let book: Arc<PeerBook<TestId>> = Arc::new(PeerBook::default());
        let mut handles = vec![];

        for _ in 0..2 {
            let book = Arc::clone(&book);
            handles.push(thread::spawn(move || {
                let info = book.get_or_insert(TestId(1));
                info.write()
                    .multiaddrs_mut()
                    .add_safe("/ip4/192.168.1.10/tcp/1634")
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let info = book.get(&TestId(1)).unwrap();
        assert_eq!(info.read().multiaddrs().len(), 1);
        assert!(info.read().multiaddrs().observed().is_empty());
    }
}
