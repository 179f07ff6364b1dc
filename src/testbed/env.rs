use std::net::{
    IpAddr as StdIpAddr,
    Ipv4Addr as StdIpv4Addr,
};
use std::sync::Mutex;

use get_if_addrs;

use crate::core::dev::{
    Device,
    Queued,
};
use crate::core::neighbors::NeighborCache;
use crate::core::repr::{
    EthernetAddress,
    Ipv4Address,
    Ipv4AddressCidr,
};
use crate::core::service::{
    Interface,
    Router,
};
use crate::core::time::Env;

lazy_static! {
    /// IPv4 address of the router's first interface.
    pub static ref IFACE_A_ADDR: Ipv4AddressCidr = {
        Ipv4AddressCidr::new(Ipv4Address::new([10, 0, 1, 1]), 24)
    };

    /// IPv4 address of the router's second interface.
    pub static ref IFACE_B_ADDR: Ipv4AddressCidr = {
        Ipv4AddressCidr::new(Ipv4Address::new([10, 0, 2, 1]), 24)
    };

    /// MAC address of the router's first interface.
    pub static ref IFACE_A_ETH: EthernetAddress = {
        EthernetAddress::new([0x06, 0x11, 0x11, 0x11, 0x11, 0x01])
    };

    /// MAC address of the router's second interface.
    pub static ref IFACE_B_ETH: EthernetAddress = {
        EthernetAddress::new([0x06, 0x22, 0x22, 0x22, 0x22, 0x01])
    };

    /// IPv4 address of the neighboring router on the first subnet.
    pub static ref NEIGHBOR_A_ADDR: Ipv4Address = {
        Ipv4Address::new([10, 0, 1, 2])
    };

    /// IPv4 address of the neighboring router on the second subnet.
    pub static ref NEIGHBOR_B_ADDR: Ipv4Address = {
        Ipv4Address::new([10, 0, 2, 2])
    };

    /// MAC address of the neighboring router on the first subnet.
    pub static ref NEIGHBOR_A_ETH: EthernetAddress = {
        EthernetAddress::new([0x06, 0x11, 0x11, 0x11, 0x11, 0x02])
    };

    /// MAC address of the neighboring router on the second subnet.
    pub static ref NEIGHBOR_B_ETH: EthernetAddress = {
        EthernetAddress::new([0x06, 0x22, 0x22, 0x22, 0x22, 0x02])
    };
}

/// Creates a router with two queue-backed interfaces and one known neighbor
/// on each subnet.
///
/// The returned device handles share queues with the router's interfaces, so
/// callers can inject inbound frames and inspect outbound ones.
pub fn two_iface_router<T: Env>(time_env: T) -> (Router<T>, Vec<Queued>) {
    let dev_a = Queued::new();
    let dev_b = Queued::new();

    let interfaces = vec![
        Interface {
            dev: Mutex::new(Box::new(dev_a.clone()) as Box<dyn Device>),
            name: "eth0".to_string(),
            ethernet_addr: *IFACE_A_ETH,
            ipv4_addr: *IFACE_A_ADDR,
        },
        Interface {
            dev: Mutex::new(Box::new(dev_b.clone()) as Box<dyn Device>),
            name: "eth1".to_string(),
            ethernet_addr: *IFACE_B_ETH,
            ipv4_addr: *IFACE_B_ADDR,
        },
    ];

    let mut neighbors = NeighborCache::new();
    neighbors.insert(*NEIGHBOR_A_ADDR, *NEIGHBOR_A_ETH);
    neighbors.insert(*NEIGHBOR_B_ADDR, *NEIGHBOR_B_ETH);

    (Router::new(interfaces, neighbors, time_env), vec![dev_a, dev_b])
}

/// Gets the host-side IPv4 address for an interface. See demos/taps.sh for
/// more info.
pub fn ifr_addr(ifr_name: &str) -> StdIpv4Addr {
    for interface in get_if_addrs::get_if_addrs().unwrap() {
        if interface.name == ifr_name {
            if let StdIpAddr::V4(ipv4_addr) = interface.ip() {
                return ipv4_addr;
            }
        }
    }

    panic!("IPv4 address for '{}' not found!", ifr_name);
}
