//! Errors raised by address normalization and record construction.

use libp2p::multiaddr;
use thiserror::Error;

/// Result alias defaulting to [`PeerInfoError`].
pub type Result<T, E = PeerInfoError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PeerInfoError {
    /// A record was requested without an identity.
    #[error("missing peer identity, use PeerInfo::create to generate one")]
    MissingIdentity,
    /// Input could not be parsed into a multiaddr. `input` is the text as given,
    /// or the hex encoding for binary input.
    #[error("invalid multiaddr {input:?}: {source}")]
    InvalidAddress {
        input: String,
        #[source]
        source: multiaddr::Error,
    },
}

impl PeerInfoError {
    pub(crate) fn invalid_text(input: &str, source: multiaddr::Error) -> Self {
        Self::InvalidAddress {
            input: input.to_owned(),
            source,
        }
    }

    pub(crate) fn invalid_bytes(input: &[u8], source: multiaddr::Error) -> Self {
        Self::InvalidAddress {
            input: hex::encode(input),
            source,
        }
    }

    pub fn is_invalid_address(&self) -> bool {
        matches!(self, Self::InvalidAddress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libp2p::Multiaddr;

    #[test]
    fn invalid_bytes_are_hex_encoded() {
        let bytes = [0xffu8, 0x01];
        let source = Multiaddr::try_from(bytes.to_vec()).unwrap_err();
        let err = PeerInfoError::invalid_bytes(&bytes, source);

        assert!(err.is_invalid_address());
        assert!(err.to_string().contains("ff01"));
    }

    #[test]
    fn missing_identity_message() {
        let err = PeerInfoError::MissingIdentity;
        assert!(!err.is_invalid_address());
        assert!(err.to_string().contains("missing peer identity"));
    }
}
