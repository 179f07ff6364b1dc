use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::Path;
use std::sync::Mutex;

use crate::{
    Error,
    Result,
};
use crate::core::repr::Ipv4Address;

/// A route to a destination prefix through a local interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    pub network: Ipv4Address,
    pub subnet_mask: Ipv4Address,
    /// Address of the next router toward the prefix; None for directly
    /// connected prefixes.
    pub gateway: Option<Ipv4Address>,
    /// Index of the interface packets leave through.
    pub iface: usize,
}

/// Routing table with longest-prefix-match lookups.
pub struct RouteTable {
    entries: Mutex<Vec<RouteEntry>>,
}

impl RouteTable {
    pub fn new() -> RouteTable {
        RouteTable {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Adds a route to the table.
    pub fn insert(
        &self,
        network: Ipv4Address,
        subnet_mask: Ipv4Address,
        gateway: Option<Ipv4Address>,
        iface: usize,
    ) {
        self.entries.lock().unwrap().push(RouteEntry {
            network,
            subnet_mask,
            gateway,
            iface,
        });
    }

    /// Returns the route whose prefix contains the address with the longest
    /// subnet mask, or None if no prefix contains it.
    pub fn lookup(&self, addr: Ipv4Address) -> Option<RouteEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| {
                (addr.as_u32() & entry.subnet_mask.as_u32())
                    == (entry.network.as_u32() & entry.subnet_mask.as_u32())
            })
            .max_by_key(|entry| entry.subnet_mask.as_u32())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Loads routes from a file of whitespace separated
    /// "network gateway subnet-mask interface" lines, resolving interface
    /// names through the provided closure.
    ///
    /// A gateway of 0.0.0.0 marks a directly connected prefix. Any malformed
    /// line is an error; startup should treat that as fatal.
    pub fn load<P, F>(&self, path: P, iface_index: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<usize>,
    {
        let file = File::open(path)?;

        for line in BufReader::new(file).lines() {
            let line = line?;
            let tokens: Vec<_> = line.split_whitespace().collect();

            if tokens.is_empty() {
                continue;
            } else if tokens.len() != 4 {
                return Err(Error::Malformed);
            }

            let network = tokens[0].parse().map_err(|_| Error::Malformed)?;
            let gateway: Ipv4Address = tokens[1].parse().map_err(|_| Error::Malformed)?;
            let subnet_mask = tokens[2].parse().map_err(|_| Error::Malformed)?;
            let iface = iface_index(tokens[3]).ok_or(Error::Malformed)?;

            let gateway = if gateway == Ipv4Address::UNSPECIFIED {
                None
            } else {
                Some(gateway)
            };

            self.insert(network, subnet_mask, gateway, iface);
        }

        Ok(())
    }
}
