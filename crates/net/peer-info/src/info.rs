//! Peer record: identity, address set, and the address of the open connection.

use std::any::Any;
use std::sync::Arc;

use auto_impl::auto_impl;
use libp2p::{Multiaddr, PeerId};
use tracing::debug;

use crate::addr::IntoMultiaddr;
use crate::book::SharedPeerInfo;
use crate::error::{PeerInfoError, Result};
use crate::identity::{IdentityProvider, PeerIdentity};
use crate::set::{AddressSet, AddressSetConfig};

/// Read access to a record-shaped value, with auto-impl for &, Box, Arc.
#[auto_impl(&, Box, Arc)]
pub trait PeerRecord {
    type Id: PeerIdentity;

    fn id(&self) -> &Self::Id;
    fn multiaddrs(&self) -> &AddressSet;
    fn is_connected(&self) -> bool;
}

/// A peer's identity and known addresses.
///
/// Single owner: mutation takes `&mut self`. Share across tasks behind a lock
/// (see [`crate::PeerBook`]).
#[derive(Debug, Clone)]
pub struct PeerInfo<Id: PeerIdentity = PeerId> {
    id: Id,
    multiaddrs: AddressSet,
    connected: Option<Multiaddr>,
}

impl<Id: PeerIdentity> PeerInfo<Id> {
    pub fn new(id: Id) -> Self {
        Self::with_config(id, AddressSetConfig::default())
    }

    pub fn with_config(id: Id, config: AddressSetConfig) -> Self {
        Self {
            id,
            multiaddrs: AddressSet::with_config(config),
            connected: None,
        }
    }

    /// Seed the confirmed list. Uses the default [`AddressSetConfig`].
    pub fn with_multiaddrs(id: Id, multiaddrs: Vec<Multiaddr>) -> Self {
        Self::with_multiaddrs_and_config(id, multiaddrs, AddressSetConfig::default())
    }

    pub fn with_multiaddrs_and_config(
        id: Id,
        multiaddrs: Vec<Multiaddr>,
        config: AddressSetConfig,
    ) -> Self {
        let mut info = Self::with_config(id, config);
        info.multiaddrs.extend(multiaddrs);
        info
    }

    /// Build a record from an identity that may be absent.
    pub fn try_new(id: Option<Id>) -> Result<Self> {
        id.map(Self::new).ok_or(PeerInfoError::MissingIdentity)
    }

    /// Build a record, generating an identity with `provider` when none is given.
    ///
    /// Provider failures are returned unchanged.
    pub async fn create<P>(provider: &P, id: Option<Id>) -> Result<Self, P::Error>
    where
        P: IdentityProvider<Identity = Id> + ?Sized,
    {
        let id = match id {
            Some(id) => id,
            None => {
                let id = provider.generate().await?;
                debug!(?id, "created peer info with generated identity");
                id
            }
        };
        Ok(Self::new(id))
    }

    /// True if `value` holds a `PeerInfo<Id>`, either bare or behind `Box`,
    /// `Arc`, or the [`SharedPeerInfo`] handle handed out by [`crate::PeerBook`].
    ///
    /// The identity type is part of the check; generic callers that only need
    /// read access should take `impl PeerRecord` instead.
    pub fn is_peer_info(value: &dyn Any) -> bool {
        value.is::<Self>()
            || value.is::<Box<Self>>()
            || value.is::<Arc<Self>>()
            || value.is::<SharedPeerInfo<Id>>()
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn multiaddrs(&self) -> &AddressSet {
        &self.multiaddrs
    }

    pub fn multiaddrs_mut(&mut self) -> &mut AddressSet {
        &mut self.multiaddrs
    }

    /// Record `addr` as the address of the open connection. It need not be
    /// confirmed.
    pub fn connect(&mut self, addr: impl IntoMultiaddr) -> Result<()> {
        let addr = addr.into_multiaddr()?;
        debug!(id = ?self.id, %addr, "peer connected");
        self.connected = Some(addr);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(addr) = self.connected.take() {
            debug!(id = ?self.id, %addr, "peer disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    pub fn connected_multiaddr(&self) -> Option<&Multiaddr> {
        self.connected.as_ref()
    }
}

impl<Id: PeerIdentity> PeerRecord for PeerInfo<Id> {
    type Id = Id;

    fn id(&self) -> &Id {
        &self.id
    }

    fn multiaddrs(&self) -> &AddressSet {
        &self.multiaddrs
    }

    fn is_connected(&self) -> bool {
        self.connected.is_some()
    }
}
