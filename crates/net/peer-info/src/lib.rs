//! Peer identity plus confirmed/observed multiaddr bookkeeping for libp2p peers.
//!
//! - [`AddressSet`] - deduplicated addresses with confirm-on-repeat staging for
//!   identify-style discovery
//! - [`PeerInfo`] - identity, address set, and the address of the open connection
//! - [`PeerBook`] - Arc-per-peer map for sharing records across tasks

pub mod addr;
pub mod book;
pub mod error;
pub mod identity;
pub mod info;
pub mod set;

pub use addr::{AddrOptions, Family, IntoMultiaddr, IntoMultiaddrs, Transport};
pub use book::{PeerBook, PeerBookConfig, SharedPeerInfo};
pub use error::{PeerInfoError, Result};
pub use identity::{Ed25519IdentityProvider, IdentityProvider, PeerIdentity};
pub use info::{PeerInfo, PeerRecord};
pub use libp2p::{Multiaddr, PeerId};
pub use set::{AddressSet, AddressSetConfig, Sighting};
