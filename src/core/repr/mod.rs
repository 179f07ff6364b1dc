//! Serialization and deserialization of network packets.
//!
//! The `repr` module provides abstractions for serializing and deserializing
//! packets and frames at different network layers to/from byte buffers.

pub mod ethernet;
pub mod ipv4;
pub mod rip;
pub mod udp;

pub use self::ethernet::{
    eth_types,
    Address as EthernetAddress,
    Frame as EthernetFrame,
};
pub use self::ipv4::{
    protocols as ipv4_protocols,
    Address as Ipv4Address,
    AddressCidr as Ipv4AddressCidr,
    Packet as Ipv4Packet,
    Repr as Ipv4Repr,
};
pub use self::rip::{
    Command as RipCommand,
    Entry as RipEntry,
    Rip,
};
pub use self::udp::{
    Packet as UdpPacket,
    Repr as UdpRepr,
};
