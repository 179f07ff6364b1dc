use std::collections::HashMap;
use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::Path;

use crate::{
    Error,
    Result,
};
use crate::core::repr::{
    EthernetAddress,
    Ipv4Address,
};

/// Static IPv4 to Ethernet address mappings for the testbed.
///
/// The cache is populated once, from a file or by hand, and only read
/// afterwards; lookups never block and never trigger resolution traffic.
#[derive(Debug)]
pub struct NeighborCache {
    entries: HashMap<Ipv4Address, EthernetAddress>,
}

impl NeighborCache {
    pub fn new() -> NeighborCache {
        NeighborCache {
            entries: HashMap::new(),
        }
    }

    /// Loads mappings from a file of whitespace separated "ip mac" lines.
    ///
    /// Any malformed line is an error; startup should treat that as fatal.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NeighborCache> {
        let file = File::open(path)?;
        let mut neighbors = NeighborCache::new();

        for line in BufReader::new(file).lines() {
            let line = line?;
            let tokens: Vec<_> = line.split_whitespace().collect();

            if tokens.is_empty() {
                continue;
            } else if tokens.len() != 2 {
                return Err(Error::Malformed);
            }

            let ipv4_addr = tokens[0].parse().map_err(|_| Error::Malformed)?;
            let eth_addr = tokens[1].parse().map_err(|_| Error::Malformed)?;
            neighbors.insert(ipv4_addr, eth_addr);
        }

        Ok(neighbors)
    }

    /// Creates or updates the Ethernet address mapping for an IPv4 address.
    pub fn insert(&mut self, ipv4_addr: Ipv4Address, eth_addr: EthernetAddress) {
        self.entries.insert(ipv4_addr, eth_addr);
    }

    /// Looks up the Ethernet address for a next hop.
    pub fn lookup(&self, ipv4_addr: Ipv4Address) -> Option<EthernetAddress> {
        self.entries.get(&ipv4_addr).cloned()
    }
}
