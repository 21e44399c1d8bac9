//! Confirmed/observed multiaddr set with confirm-on-repeat staging.
//!
//! Addresses reported by a discovery source (identify runs on every connection)
//! go through [`AddressSet::add_safe`] and only become dialable once they have
//! been reported twice. Trusted addresses (configured, or successfully dialed)
//! go straight in with [`AddressSet::add`].
//!
//! Per-peer address lists are short, so membership is a linear scan over the
//! encoded bytes and the first match wins for removal.

use std::collections::HashSet;

use libp2p::Multiaddr;
use tracing::trace;

use crate::addr::{AddrOptions, IntoMultiaddr, IntoMultiaddrs};
use crate::error::Result;

/// Address set configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSetConfig {
    /// Maximum staged (observed, unconfirmed) addresses. None = unbounded.
    /// When full, the oldest staged address is evicted.
    pub max_observed: Option<usize>,
}

impl AddressSetConfig {
    pub fn bounded(max_observed: usize) -> Self {
        Self {
            max_observed: Some(max_observed),
        }
    }
}

/// Outcome of [`AddressSet::add_safe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// First report, held in the observed list.
    Staged,
    /// Second report, moved to the confirmed list.
    Confirmed,
    /// Already confirmed, nothing changed.
    AlreadyConfirmed,
    /// Not staged because `max_observed` is zero.
    Dropped,
}

/// Ordered, deduplicated multiaddrs for one peer.
///
/// `confirmed` and `observed` never share an address.
#[derive(Debug, Clone, Default)]
pub struct AddressSet {
    config: AddressSetConfig,
    confirmed: Vec<Multiaddr>,
    observed: Vec<Multiaddr>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AddressSetConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AddressSetConfig {
        &self.config
    }

    /// Append `addr` to the confirmed list unless an equal address is present.
    ///
    /// Returns `true` if the address was appended.
    pub fn add(&mut self, addr: impl IntoMultiaddr) -> Result<bool> {
        let addr = addr.into_multiaddr()?;
        Ok(self.insert_confirmed(addr))
    }

    /// Stage `addr` on first sighting, confirm it on the second.
    ///
    /// With `max_observed = Some(0)` nothing is ever staged and the result is
    /// [`Sighting::Dropped`].
    pub fn add_safe(&mut self, addr: impl IntoMultiaddr) -> Result<Sighting> {
        let addr = addr.into_multiaddr()?;

        if self.contains(&addr) {
            return Ok(Sighting::AlreadyConfirmed);
        }

        if let Some(pos) = self.observed.iter().position(|m| *m == addr) {
            self.observed.remove(pos);
            trace!(%addr, "observed address confirmed");
            self.insert_confirmed(addr);
            return Ok(Sighting::Confirmed);
        }

        if let Some(max) = self.config.max_observed {
            while !self.observed.is_empty() && self.observed.len() >= max {
                let evicted = self.observed.remove(0);
                trace!(addr = %evicted, "evicted oldest observed address");
            }
            if max == 0 {
                trace!(%addr, "observed address dropped, staging disabled");
                return Ok(Sighting::Dropped);
            }
        }

        trace!(%addr, "observed address staged");
        self.observed.push(addr);
        Ok(Sighting::Staged)
    }

    /// Remove the first confirmed address equal to `addr`.
    ///
    /// Returns `true` if an address was removed. Staged addresses are untouched.
    pub fn remove(&mut self, addr: impl IntoMultiaddr) -> Result<bool> {
        let addr = addr.into_multiaddr()?;
        Ok(self.remove_confirmed(&addr))
    }

    /// Remove every address in `existing`, then add every address in `fresh`.
    ///
    /// Both arguments are parsed before the set is touched.
    pub fn replace(
        &mut self,
        existing: impl IntoMultiaddrs,
        fresh: impl IntoMultiaddrs,
    ) -> Result<()> {
        let existing = existing.into_multiaddrs()?;
        let fresh = fresh.into_multiaddrs()?;

        for addr in &existing {
            self.remove_confirmed(addr);
        }
        for addr in fresh {
            self.insert_confirmed(addr);
        }
        Ok(())
    }

    /// Drop all confirmed addresses. Staged addresses are kept.
    pub fn clear(&mut self) {
        self.confirmed.clear();
    }

    /// Membership test against the confirmed list.
    pub fn has(&self, addr: impl IntoMultiaddr) -> Result<bool> {
        let addr = addr.into_multiaddr()?;
        Ok(self.contains(&addr))
    }

    pub fn contains(&self, addr: &Multiaddr) -> bool {
        self.confirmed.contains(addr)
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Multiaddr> {
        self.confirmed.iter()
    }

    pub fn as_slice(&self) -> &[Multiaddr] {
        &self.confirmed
    }

    pub fn to_vec(&self) -> Vec<Multiaddr> {
        self.confirmed.clone()
    }

    /// Staged addresses awaiting a second sighting, oldest first.
    pub fn observed(&self) -> &[Multiaddr] {
        &self.observed
    }

    /// At most one confirmed address per `(port, transport)`, first seen wins.
    ///
    /// Addresses that differ only by IP family collapse into one entry.
    pub fn distinct(&self) -> Vec<Multiaddr> {
        let mut seen = HashSet::new();
        self.confirmed
            .iter()
            .filter(|addr| seen.insert(AddrOptions::from_multiaddr(addr).distinct_key()))
            .cloned()
            .collect()
    }

    fn insert_confirmed(&mut self, addr: Multiaddr) -> bool {
        if let Some(pos) = self.observed.iter().position(|m| *m == addr) {
            self.observed.remove(pos);
        }
        if self.contains(&addr) {
            return false;
        }
        self.confirmed.push(addr);
        true
    }

    fn remove_confirmed(&mut self, addr: &Multiaddr) -> bool {
        match self.confirmed.iter().position(|m| m == addr) {
            Some(pos) => {
                self.confirmed.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl From<Vec<Multiaddr>> for AddressSet {
    fn from(addrs: Vec<Multiaddr>) -> Self {
        let mut set = Self::new();
        set.extend(addrs);
        set
    }
}

/// Trusted insertion, same as [`AddressSet::add`] for already-parsed addresses.
impl Extend<Multiaddr> for AddressSet {
    fn extend<I: IntoIterator<Item = Multiaddr>>(&mut self, addrs: I) {
        for addr in addrs {
            self.insert_confirmed(addr);
        }
    }
}

impl<'a> IntoIterator for &'a AddressSet {
    type Item = &'a Multiaddr;
    type IntoIter = std::slice::Iter<'a, Multiaddr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
