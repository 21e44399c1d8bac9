//! Multiaddr normalization and the `(family, host, transport, port)` view used for
//! distinct-address selection.

use libp2p::Multiaddr;
use libp2p::multiaddr::Protocol;
use strum::Display;

use crate::error::{PeerInfoError, Result};

/// Conversion of loosely-typed input (text, bytes, or an already-parsed address)
/// into a [`Multiaddr`].
pub trait IntoMultiaddr {
    fn into_multiaddr(self) -> Result<Multiaddr>;
}

impl IntoMultiaddr for Multiaddr {
    fn into_multiaddr(self) -> Result<Multiaddr> {
        Ok(self)
    }
}

impl IntoMultiaddr for &Multiaddr {
    fn into_multiaddr(self) -> Result<Multiaddr> {
        Ok(self.clone())
    }
}

impl IntoMultiaddr for &str {
    fn into_multiaddr(self) -> Result<Multiaddr> {
        self.parse()
            .map_err(|source| PeerInfoError::invalid_text(self, source))
    }
}

impl IntoMultiaddr for String {
    fn into_multiaddr(self) -> Result<Multiaddr> {
        self.as_str().into_multiaddr()
    }
}

impl IntoMultiaddr for &String {
    fn into_multiaddr(self) -> Result<Multiaddr> {
        self.as_str().into_multiaddr()
    }
}

impl IntoMultiaddr for &[u8] {
    fn into_multiaddr(self) -> Result<Multiaddr> {
        Multiaddr::try_from(self.to_vec())
            .map_err(|source| PeerInfoError::invalid_bytes(self, source))
    }
}

impl IntoMultiaddr for Vec<u8> {
    fn into_multiaddr(self) -> Result<Multiaddr> {
        self.as_slice().into_multiaddr()
    }
}

/// One address or a sequence of addresses.
///
/// Byte containers have no single-address impl: `Vec<T>` is always a sequence.
/// Wrap binary input as `[bytes]`.
pub trait IntoMultiaddrs {
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>>;
}

impl IntoMultiaddrs for Multiaddr {
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>> {
        Ok(vec![self])
    }
}

impl IntoMultiaddrs for &Multiaddr {
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>> {
        Ok(vec![self.clone()])
    }
}

impl IntoMultiaddrs for &str {
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>> {
        Ok(vec![self.into_multiaddr()?])
    }
}

impl IntoMultiaddrs for String {
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>> {
        Ok(vec![self.into_multiaddr()?])
    }
}

impl<T: IntoMultiaddr> IntoMultiaddrs for Vec<T> {
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>> {
        self.into_iter().map(IntoMultiaddr::into_multiaddr).collect()
    }
}

impl<T: IntoMultiaddr, const N: usize> IntoMultiaddrs for [T; N] {
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>> {
        self.into_iter().map(IntoMultiaddr::into_multiaddr).collect()
    }
}

impl<T> IntoMultiaddrs for &[T]
where
    T: Clone + IntoMultiaddr,
{
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>> {
        self.iter()
            .cloned()
            .map(IntoMultiaddr::into_multiaddr)
            .collect()
    }
}

impl<T> IntoMultiaddrs for &Vec<T>
where
    T: Clone + IntoMultiaddr,
{
    fn into_multiaddrs(self) -> Result<Vec<Multiaddr>> {
        self.as_slice().into_multiaddrs()
    }
}

/// IP family of the host component. DNS names resolve to a family only when the
/// protocol pins one (`dns4`, `dns6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Family {
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Transport {
    Tcp,
    Udp,
}

/// Decomposed view of a multiaddr's host and transport components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddrOptions {
    pub family: Option<Family>,
    pub host: Option<String>,
    pub transport: Option<Transport>,
    pub port: Option<u16>,
}

impl AddrOptions {
    /// Reads the first host component and the first `tcp`/`udp` component.
    pub fn from_multiaddr(addr: &Multiaddr) -> Self {
        let mut opts = Self::default();

        for proto in addr.iter() {
            match proto {
                Protocol::Ip4(ip) if opts.host.is_none() => {
                    opts.family = Some(Family::Ipv4);
                    opts.host = Some(ip.to_string());
                }
                Protocol::Ip6(ip) if opts.host.is_none() => {
                    opts.family = Some(Family::Ipv6);
                    opts.host = Some(ip.to_string());
                }
                Protocol::Dns4(name) if opts.host.is_none() => {
                    opts.family = Some(Family::Ipv4);
                    opts.host = Some(name.into_owned());
                }
                Protocol::Dns6(name) if opts.host.is_none() => {
                    opts.family = Some(Family::Ipv6);
                    opts.host = Some(name.into_owned());
                }
                Protocol::Dns(name) if opts.host.is_none() => {
                    opts.host = Some(name.into_owned());
                }
                Protocol::Tcp(port) if opts.transport.is_none() => {
                    opts.transport = Some(Transport::Tcp);
                    opts.port = Some(port);
                }
                Protocol::Udp(port) if opts.transport.is_none() => {
                    opts.transport = Some(Transport::Udp);
                    opts.port = Some(port);
                }
                _ => {}
            }
        }

        opts
    }

    /// Key used by [`crate::AddressSet::distinct`]. Family is not part of it.
    pub fn distinct_key(&self) -> (Option<u16>, Option<Transport>) {
        (self.port, self.transport)
    }
}
