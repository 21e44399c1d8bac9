//! Address lifecycle for a peer fed by dialing and repeated identify reports.

use vertex_net_peer_info::{
    AddrOptions, Ed25519IdentityProvider, Multiaddr, PeerBook, PeerInfo, Sighting, Transport,
};

fn ma(s: &str) -> Multiaddr {
    s.parse().unwrap()
}

#[tokio::test]
async fn identify_reports_confirm_only_repeated_addresses() {
    let book = PeerBook::default();
    let info = PeerInfo::create(&Ed25519IdentityProvider, None).await.unwrap();
    let id = *info.id();
    book.insert(info);

    let record = book.get(&id).unwrap();
    let dialed = ma("/ip4/203.0.113.7/tcp/1634");
    {
        let mut info = record.write();
        info.multiaddrs_mut().add(&dialed).unwrap();
        info.connect(&dialed).unwrap();
    }

    // each identify run reports the dialed address plus a fresh ephemeral port
    for port in 40_000..40_010u16 {
        let mut info = record.write();
        let set = info.multiaddrs_mut();
        assert_eq!(set.add_safe(&dialed).unwrap(), Sighting::AlreadyConfirmed);
        assert_eq!(
            set.add_safe(format!("/ip4/203.0.113.7/tcp/{port}").as_str()).unwrap(),
            Sighting::Staged
        );
    }

    // a stable observed address reported by two runs gets confirmed
    let observed = ma("/ip6/2001:db8::7/udp/1634/quic-v1");
    for _ in 0..2 {
        record.write().multiaddrs_mut().add_safe(&observed).unwrap();
    }

    assert_eq!(book.connected_ids(), vec![id]);

    let info = record.read();
    assert!(info.is_connected());
    assert_eq!(info.multiaddrs().to_vec(), vec![dialed.clone(), observed.clone()]);
    assert_eq!(info.multiaddrs().observed().len(), 10);

    let distinct = info.multiaddrs().distinct();
    assert_eq!(distinct.len(), 2);
    assert_eq!(
        AddrOptions::from_multiaddr(&distinct[0]).transport,
        Some(Transport::Tcp)
    );
}

#[test]
fn replace_swaps_listen_addresses() {
    let mut info = PeerInfo::new(vertex_net_peer_info::PeerId::random());
    let set = info.multiaddrs_mut();
    for addr in ["/ip4/10.0.0.1/tcp/1", "/ip4/10.0.0.1/tcp/2", "/ip4/10.0.0.1/tcp/3"] {
        set.add(addr).unwrap();
    }

    set.replace(["/ip4/10.0.0.1/tcp/1", "/ip4/10.0.0.1/tcp/3"], ["/ip4/10.0.0.2/tcp/1"])
        .unwrap();

    assert_eq!(
        set.to_vec(),
        vec![ma("/ip4/10.0.0.1/tcp/2"), ma("/ip4/10.0.0.2/tcp/1")]
    );
}
