use crate::{
    Error,
    Result,
};
use crate::core::repr::{
    eth_types,
    ipv4_protocols,
    rip as rip_repr,
    EthernetFrame,
    Ipv4Packet,
    UdpPacket,
};
use crate::core::service::{
    ethernet,
    rip,
    Router,
};
use crate::core::time::Env;

/// Runs the forwarding pipeline on an inbound IPv4 packet.
///
/// Control traffic for the routing protocol is diverted to the protocol
/// agent; everything else is forwarded or dropped. No error is escalated
/// beyond the caller logging it.
pub fn recv_packet<T: Env>(router: &Router<T>, in_iface: usize, ipv4_buffer: &[u8]) -> Result<()> {
    let ipv4_packet = Ipv4Packet::try_new(ipv4_buffer)?;
    ipv4_packet.check_encoding()?;

    if ipv4_packet.gen_header_checksum() != ipv4_packet.header_checksum() {
        debug!("Dropping IPv4 packet with a bad checksum.");
        return Err(Error::Checksum);
    }

    if ipv4_packet.ttl() <= 1 {
        debug!("Dropping IPv4 packet with an expired TTL.");
        return Err(Error::Ignored);
    }
    let ttl = ipv4_packet.ttl() - 1;

    let dst_addr = ipv4_packet.dst_addr();

    if router.is_local_addr(dst_addr) {
        debug!("Dropping IPv4 packet addressed to local {}.", dst_addr);
        return Err(Error::Ignored);
    }

    if dst_addr == rip_repr::MULTICAST && ipv4_packet.protocol() == ipv4_protocols::UDP {
        let udp_packet = UdpPacket::try_new(ipv4_packet.payload())?;
        if udp_packet.dst_port() == rip_repr::PORT {
            return rip::recv_advertisement(router, ipv4_packet.src_addr(), udp_packet.payload());
        }
    }

    forward_packet(router, in_iface, &ipv4_packet, ttl)
}

/// Forwards a validated packet toward its destination.
///
/// The forwarded copy carries the decremented TTL, a recomputed header
/// checksum and rewritten link-layer addresses; the rest of the packet is
/// untouched.
fn forward_packet<T: Env>(
    router: &Router<T>,
    in_iface: usize,
    ipv4_packet: &Ipv4Packet<&[u8]>,
    ttl: u8,
) -> Result<()> {
    let dst_addr = ipv4_packet.dst_addr();

    let route = match router.routes.lookup(dst_addr) {
        Some(route) => route,
        None => {
            debug!("Dropping IPv4 packet with no route to {}.", dst_addr);
            return Err(Error::Ignored);
        }
    };

    if route.iface == in_iface {
        debug!(
            "Not sending {} back out ingress {}.",
            dst_addr, router.interfaces[in_iface].name
        );
        return Err(Error::Ignored);
    }

    let next_hop = route.gateway.unwrap_or(dst_addr);

    let eth_dst_addr = match router.neighbors.lookup(next_hop) {
        Some(eth_addr) => eth_addr,
        None => {
            debug!("Dropping IPv4 packet with unresolvable next hop {}.", next_hop);
            return Err(Error::MacResolution(next_hop));
        }
    };

    let eth_frame_len = EthernetFrame::<&[u8]>::buffer_len(ipv4_packet.as_ref().len());

    ethernet::send_frame(router, route.iface, eth_frame_len, |eth_frame| {
        eth_frame.set_dst_addr(eth_dst_addr);
        eth_frame.set_payload_type(eth_types::IPV4);
        eth_frame.payload_mut().copy_from_slice(ipv4_packet.as_ref());

        let mut forwarded = Ipv4Packet::try_new(eth_frame.payload_mut()).unwrap();
        forwarded.set_ttl(ttl);
        let checksum = forwarded.gen_header_checksum();
        forwarded.set_header_checksum(checksum);
    })
}
