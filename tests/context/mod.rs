use vrouter::core::dev::Queued;
use vrouter::core::repr::{
    eth_types,
    ipv4_protocols,
    rip as rip_repr,
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
    Ipv4Packet,
    Ipv4Repr,
    Rip,
    UdpPacket,
    UdpRepr,
};

/// Builds an Ethernet frame carrying an IPv4 packet with an opaque payload.
pub fn ipv4_frame(
    dst_eth: EthernetAddress,
    src_ip: Ipv4Address,
    dst_ip: Ipv4Address,
    ttl: u8,
    payload: &[u8],
) -> Vec<u8> {
    let ipv4_repr = Ipv4Repr {
        src_addr: src_ip,
        dst_addr: dst_ip,
        protocol: ipv4_protocols::ICMP,
        payload_len: payload.len() as u16,
    };

    let mut buffer = vec![0; EthernetFrame::<&[u8]>::buffer_len(ipv4_repr.buffer_len())];

    {
        let mut eth_frame = EthernetFrame::try_new(&mut buffer[..]).unwrap();
        eth_frame.set_dst_addr(dst_eth);
        eth_frame.set_src_addr(EthernetAddress::new([0x06, 0x99, 0x99, 0x99, 0x99, 0x99]));
        eth_frame.set_payload_type(eth_types::IPV4);

        let mut ipv4_packet = Ipv4Packet::try_new(eth_frame.payload_mut()).unwrap();
        ipv4_repr.serialize(&mut ipv4_packet);
        ipv4_packet.payload_mut().copy_from_slice(payload);

        ipv4_packet.set_ttl(ttl);
        let checksum = ipv4_packet.gen_header_checksum();
        ipv4_packet.set_header_checksum(checksum);
    }

    buffer
}

/// Builds a broadcast Ethernet frame carrying a routing advertisement.
pub fn rip_frame(src_eth: EthernetAddress, src_ip: Ipv4Address, rip: &Rip) -> Vec<u8> {
    let udp_repr = UdpRepr {
        src_port: rip_repr::PORT,
        dst_port: rip_repr::PORT,
        length: UdpPacket::<&[u8]>::buffer_len(rip.buffer_len()) as u16,
    };

    let ipv4_repr = Ipv4Repr {
        src_addr: src_ip,
        dst_addr: rip_repr::MULTICAST,
        protocol: ipv4_protocols::UDP,
        payload_len: udp_repr.length,
    };

    let mut buffer = vec![0; EthernetFrame::<&[u8]>::buffer_len(ipv4_repr.buffer_len())];

    {
        let mut eth_frame = EthernetFrame::try_new(&mut buffer[..]).unwrap();
        eth_frame.set_dst_addr(EthernetAddress::BROADCAST);
        eth_frame.set_src_addr(src_eth);
        eth_frame.set_payload_type(eth_types::IPV4);

        let mut ipv4_packet = Ipv4Packet::try_new(eth_frame.payload_mut()).unwrap();
        ipv4_repr.serialize(&mut ipv4_packet);

        let mut udp_packet = UdpPacket::try_new(ipv4_packet.payload_mut()).unwrap();
        rip.serialize(udp_packet.payload_mut()).unwrap();
        udp_repr.serialize(&mut udp_packet, &ipv4_repr);
    }

    buffer
}

/// Parses an advertisement the router transmitted, checking its addressing
/// along the way.
pub fn parse_rip(frame: &[u8]) -> (Ipv4Address, Rip) {
    let eth_frame = EthernetFrame::try_new(frame).unwrap();
    assert_eq!(eth_frame.dst_addr(), EthernetAddress::BROADCAST);
    assert_eq!(eth_frame.payload_type(), eth_types::IPV4);

    let ipv4_packet = Ipv4Packet::try_new(eth_frame.payload()).unwrap();
    ipv4_packet.check_encoding().unwrap();
    assert_eq!(ipv4_packet.gen_header_checksum(), ipv4_packet.header_checksum());
    assert_eq!(ipv4_packet.dst_addr(), rip_repr::MULTICAST);
    assert_eq!(ipv4_packet.protocol(), ipv4_protocols::UDP);

    let udp_packet = UdpPacket::try_new(ipv4_packet.payload()).unwrap();
    assert_eq!(udp_packet.src_port(), rip_repr::PORT);
    assert_eq!(udp_packet.dst_port(), rip_repr::PORT);

    let rip = Rip::deserialize(udp_packet.payload()).unwrap();
    (ipv4_packet.src_addr(), rip)
}

/// Discards every frame a device has transmitted so far.
pub fn drain(dev: &Queued) {
    while let Some(_) = dev.dequeue_send() {}
}
