use std::cmp::min;

use crate::Result;
use crate::core::dv::{
    self,
    Prefix,
};
use crate::core::repr::{
    eth_types,
    ipv4_protocols,
    rip as rip_repr,
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
    Ipv4Packet,
    Ipv4Repr,
    Rip,
    RipCommand,
    RipEntry,
    UdpPacket,
    UdpRepr,
};
use crate::core::service::{
    ethernet,
    Router,
};
use crate::core::time::Env;

/// Seeds the distance vector and route tables with the router's own
/// prefixes, then solicits every neighbor's table.
pub fn bring_up<T: Env>(router: &Router<T>) {
    for (i, iface) in router.interfaces.iter().enumerate() {
        let prefix = Prefix {
            network: iface.ipv4_addr.network(),
            subnet_mask: iface.ipv4_addr.subnet_mask(),
        };
        router.dv.insert(prefix, 0, None, true);
        router.routes.insert(prefix.network, prefix.subnet_mask, None, i);
    }

    let request = Rip {
        command: RipCommand::Request,
        entries: vec![],
    };

    for i in 0 .. router.interfaces.len() {
        if let Err(err) = send_advertisement(router, i, &request) {
            warn!(
                "Error soliciting neighbors on {}: {:?}.",
                router.interfaces[i].name, err
            );
        }
    }
}

/// Applies an inbound advertisement to the distance vector table.
///
/// Out-of-range metrics are skipped entry by entry; nothing in here aborts
/// processing of the remaining tuples.
pub fn recv_advertisement<T: Env>(
    router: &Router<T>,
    advertiser: Ipv4Address,
    payload: &[u8],
) -> Result<()> {
    let rip = Rip::deserialize(payload)?;
    debug!(
        "Processing RIP {:?} from {} with {} entries.",
        rip.command,
        advertiser,
        rip.entries.len()
    );

    for entry in &rip.entries {
        if entry.metric > dv::INFINITY {
            debug!(
                "Skipping advertised prefix {} with metric {} out of range.",
                entry.address, entry.metric
            );
            continue;
        }

        // Cost of the hop through this router.
        let candidate = min(entry.metric + 1, dv::INFINITY);
        let prefix = Prefix {
            network: entry.address,
            subnet_mask: entry.subnet_mask,
        };

        match router.dv.lookup(prefix) {
            Some(known) => {
                if candidate < known.metric {
                    router.dv.replace(prefix, candidate, Some(advertiser));
                } else if known.next_hop == Some(advertiser) {
                    // Still the best we know through that neighbor.
                    router.dv.renew(prefix);
                }
            }
            None => {
                if candidate < dv::INFINITY {
                    router.dv.insert(prefix, candidate, Some(advertiser), false);
                }
            }
        }
    }

    Ok(())
}

/// Sweeps expired routes, then advertises the table out every interface.
///
/// Poison reverse: a route is advertised as unreachable on the interface
/// through whose subnet its next hop is reached, so the neighbor that
/// supplied it never hears it back at a finite metric. The poisoned metric
/// exists only in the outbound advertisement, never in the table.
pub fn flood<T: Env>(router: &Router<T>) {
    router.dv.sweep();
    let snapshot = router.dv.snapshot();

    for (i, iface) in router.interfaces.iter().enumerate() {
        let entries = snapshot
            .iter()
            .map(|entry| {
                let poisoned = entry
                    .next_hop
                    .map_or(false, |next_hop| iface.ipv4_addr.is_member(next_hop));

                RipEntry {
                    address: entry.prefix.network,
                    subnet_mask: entry.prefix.subnet_mask,
                    next_hop: entry.next_hop.unwrap_or(Ipv4Address::UNSPECIFIED),
                    metric: if poisoned { dv::INFINITY } else { entry.metric },
                }
            })
            .collect();

        let response = Rip {
            command: RipCommand::Response,
            entries,
        };

        if let Err(err) = send_advertisement(router, i, &response) {
            warn!("Error advertising on {}: {:?}.", iface.name, err);
        }
    }
}

/// Broadcasts an advertisement out one interface, multicast addressed and
/// sourced from the interface's own address.
fn send_advertisement<T: Env>(router: &Router<T>, iface: usize, rip: &Rip) -> Result<()> {
    let udp_repr = UdpRepr {
        src_port: rip_repr::PORT,
        dst_port: rip_repr::PORT,
        length: UdpPacket::<&[u8]>::buffer_len(rip.buffer_len()) as u16,
    };

    let ipv4_repr = Ipv4Repr {
        src_addr: *router.interfaces[iface].ipv4_addr,
        dst_addr: rip_repr::MULTICAST,
        protocol: ipv4_protocols::UDP,
        payload_len: udp_repr.length,
    };

    let eth_frame_len = EthernetFrame::<&[u8]>::buffer_len(ipv4_repr.buffer_len());

    ethernet::send_frame(router, iface, eth_frame_len, |eth_frame| {
        eth_frame.set_dst_addr(EthernetAddress::BROADCAST);
        eth_frame.set_payload_type(eth_types::IPV4);

        let mut ipv4_packet = Ipv4Packet::try_new(eth_frame.payload_mut()).unwrap();
        ipv4_repr.serialize(&mut ipv4_packet);

        let mut udp_packet = UdpPacket::try_new(ipv4_packet.payload_mut()).unwrap();
        rip.serialize(udp_packet.payload_mut()).unwrap();
        // NOTE: The UDP header goes last so its checksum covers the payload.
        udp_repr.serialize(&mut udp_packet, &ipv4_repr);
    })
}
