use std::collections::HashMap;
use std::fmt::{
    Display,
    Formatter,
    Result as FmtResult,
};
use std::sync::Mutex;
use std::time::{
    Duration,
    Instant,
};

use crate::core::repr::Ipv4Address;
use crate::core::time::{
    Env,
    SystemEnv,
};

/// Metric at and beyond which a destination is unreachable.
pub const INFINITY: u32 = 16;

/// Seconds a learned entry stays valid without being refreshed.
pub const TIMEOUT_SECS: u64 = 30;

/// A (network, subnet mask) pair identifying a destination range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Prefix {
    pub network: Ipv4Address,
    pub subnet_mask: Ipv4Address,
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}/{}", self.network, self.subnet_mask)
    }
}

/// One known destination prefix with its best route.
#[derive(Clone, Copy, Debug)]
pub struct DvEntry {
    pub prefix: Prefix,
    /// Hop count to the prefix, within [0, INFINITY].
    pub metric: u32,
    /// Neighbor that advertised the route; None for self entries.
    pub next_hop: Option<Ipv4Address>,
    /// Entries for the router's own interfaces never expire.
    pub is_self: bool,
    last_refreshed: Instant,
}

/// The set of destination prefixes known to the distance vector engine.
///
/// The table guards its storage with an internal lock, making each operation
/// atomic with respect to the others, so the frame-receive path and the
/// periodic advertisement path can share it directly. No operation blocks on
/// anything but that lock.
pub struct DvTable<T = SystemEnv>
where
    T: Env,
{
    entries: Mutex<HashMap<Prefix, DvEntry>>,
    timeout: Duration,
    time_env: T,
}

impl<T: Env> DvTable<T> {
    /// Creates a distance vector table where learned entries expire after
    /// timeout_in_secs seconds without a refresh.
    pub fn new(timeout_in_secs: u64, time_env: T) -> DvTable<T> {
        DvTable {
            entries: Mutex::new(HashMap::new()),
            timeout: Duration::from_secs(timeout_in_secs),
            time_env,
        }
    }

    /// Returns the entry for an exact prefix match.
    ///
    /// An expired non-self match is deleted and None returned instead, so
    /// lookups double as lazy garbage collection.
    pub fn lookup(&self, prefix: Prefix) -> Option<DvEntry> {
        let mut entries = self.entries.lock().unwrap();
        let now = self.time_env.now_instant();

        let expired = match entries.get(&prefix) {
            Some(entry) => self.expired(entry, now),
            None => return None,
        };

        if expired {
            debug!("Expiring {} on lookup.", prefix);
            entries.remove(&prefix);
            None
        } else {
            entries.get(&prefix).cloned()
        }
    }

    /// Adds an entry for a prefix.
    ///
    /// Callers are responsible for checking for an existing entry first; an
    /// insert over an existing prefix overwrites it wholesale.
    pub fn insert(
        &self,
        prefix: Prefix,
        metric: u32,
        next_hop: Option<Ipv4Address>,
        is_self: bool,
    ) {
        debug!(
            "Inserting {} with metric {} via {:?}.",
            prefix, metric, next_hop
        );

        let entry = DvEntry {
            prefix,
            metric,
            next_hop,
            is_self,
            last_refreshed: self.time_env.now_instant(),
        };

        self.entries.lock().unwrap().insert(prefix, entry);
    }

    /// Resets the age of an entry. Returns false if the prefix is absent.
    pub fn renew(&self, prefix: Prefix) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let now = self.time_env.now_instant();

        match entries.get_mut(&prefix) {
            Some(entry) => {
                entry.last_refreshed = now;
                true
            }
            None => false,
        }
    }

    /// Installs a strictly better route for a known prefix, updating metric
    /// and next hop and refreshing the age.
    ///
    /// A metric that does not improve the stored one is a no-op. Returns
    /// false if nothing was changed.
    pub fn replace(&self, prefix: Prefix, metric: u32, next_hop: Option<Ipv4Address>) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let now = self.time_env.now_instant();

        match entries.get_mut(&prefix) {
            Some(entry) if metric < entry.metric => {
                debug!(
                    "Replacing {}: metric {} -> {}, next hop {:?}.",
                    prefix, entry.metric, metric, next_hop
                );
                entry.metric = metric;
                entry.next_hop = next_hop;
                entry.last_refreshed = now;
                true
            }
            _ => false,
        }
    }

    /// Deletes every non-self entry that has outlived the timeout.
    pub fn sweep(&self) {
        let mut entries = self.entries.lock().unwrap();
        let now = self.time_env.now_instant();

        entries.retain(|prefix, entry| {
            let expired = !entry.is_self && now.duration_since(entry.last_refreshed) > self.timeout;
            if expired {
                debug!("Expiring {} on sweep.", prefix);
            }
            !expired
        });
    }

    /// Returns a defensive copy of all current entries. Iteration order is
    /// not stable across calls.
    pub fn snapshot(&self) -> Vec<DvEntry> {
        self.entries.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn expired(&self, entry: &DvEntry, now: Instant) -> bool {
        !entry.is_self && now.duration_since(entry.last_refreshed) > self.timeout
    }
}
