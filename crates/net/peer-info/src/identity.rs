//! Peer identity bounds and asynchronous identity generation.

use std::convert::Infallible;
use std::fmt::Debug;
use std::hash::Hash;

use async_trait::async_trait;
use libp2p::PeerId;
use libp2p::identity::Keypair;
use tracing::debug;

/// Blanket-implemented for any type with Clone + Eq + Hash + Send + Sync + Debug.
pub trait PeerIdentity: Clone + Eq + Hash + Send + Sync + Debug + 'static {}

impl<T> PeerIdentity for T where T: Clone + Eq + Hash + Send + Sync + Debug + 'static {}

/// Source of fresh peer identities.
///
/// Generation may suspend (key derivation, keystore access). Failures are
/// surfaced to callers as `Self::Error` without wrapping.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    type Identity: PeerIdentity;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn generate(&self) -> Result<Self::Identity, Self::Error>;
}

/// Generates a random ed25519 keypair and yields its [`PeerId`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519IdentityProvider;

#[async_trait]
impl IdentityProvider for Ed25519IdentityProvider {
    type Identity = PeerId;
    type Error = Infallible;

    async fn generate(&self) -> Result<PeerId, Infallible> {
        let peer_id = Keypair::generate_ed25519().public().to_peer_id();
        debug!(%peer_id, "generated ed25519 peer identity");
        Ok(peer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ed25519_generates_unique_ids() {
        let provider = Ed25519IdentityProvider;

        let a = provider.generate().await.unwrap();
        let b = provider.generate().await.unwrap();

        assert_ne!(a, b);
    }
}
