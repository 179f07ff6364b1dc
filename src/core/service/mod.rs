//! Packet processing services for the router.
//!
//! The `service` modules deal with frame reception, the IPv4 forwarding
//! pipeline, and the distance vector routing protocol.

pub mod ethernet;
pub mod ipv4;
pub mod rip;

use std::sync::{
    Arc,
    Mutex,
};
use std::thread;
use std::time::{
    Duration,
    Instant,
};

use crate::core::dev::{
    self,
    Device,
};
use crate::core::dv::{
    self,
    DvTable,
};
use crate::core::neighbors::NeighborCache;
use crate::core::repr::{
    EthernetAddress,
    EthernetFrame,
    Ipv4Address,
    Ipv4AddressCidr,
};
use crate::core::route::RouteTable;
use crate::core::time::{
    Env,
    SystemEnv,
};

/// Seconds between unsolicited advertisement floods.
pub const UPDATE_INTERVAL_SECS: u64 = 10;

/// One attachment point of the router: a device plus its addresses.
///
/// Interfaces are static for the process lifetime; only the device behind
/// the mutex sees mutation after startup.
pub struct Interface {
    /// Device for sending and receiving raw Ethernet frames.
    pub dev: Mutex<Box<dyn Device>>,
    /// Interface name, used by the route table loader.
    pub name: String,
    /// Ethernet address for the interface.
    pub ethernet_addr: EthernetAddress,
    /// IPv4 address and subnet for the interface.
    pub ipv4_addr: Ipv4AddressCidr,
}

/// The forwarding and control plane of the router.
pub struct Router<T = SystemEnv>
where
    T: Env,
{
    pub interfaces: Vec<Interface>,
    pub routes: RouteTable,
    pub neighbors: NeighborCache,
    pub dv: DvTable<T>,
}

impl<T: Env> Router<T> {
    pub fn new(interfaces: Vec<Interface>, neighbors: NeighborCache, time_env: T) -> Router<T> {
        Router {
            interfaces,
            routes: RouteTable::new(),
            neighbors,
            dv: DvTable::new(dv::TIMEOUT_SECS, time_env),
        }
    }

    /// Returns the index of the interface with the given name.
    pub fn iface_index(&self, name: &str) -> Option<usize> {
        self.interfaces.iter().position(|iface| iface.name == name)
    }

    /// Checks if the address is assigned to one of the router's own
    /// interfaces.
    pub fn is_local_addr(&self, addr: Ipv4Address) -> bool {
        self.interfaces.iter().any(|iface| *iface.ipv4_addr == addr)
    }
}

/// Receives frames on every interface until the process exits.
///
/// Polls each device in turn, handing complete frames to the Ethernet
/// service, and backs off briefly when every device is idle.
pub fn recv_loop<T: Env>(router: &Router<T>) {
    let mut buffer = vec![0; EthernetFrame::<&[u8]>::MAX_FRAME_LEN];

    loop {
        let mut idle = true;

        for i in 0 .. router.interfaces.len() {
            let frame_len = {
                let mut dev = router.interfaces[i].dev.lock().unwrap();
                match dev.recv(&mut buffer) {
                    Ok(frame_len) => frame_len,
                    Err(dev::Error::Nothing) => continue,
                    Err(err) => {
                        warn!(
                            "Error receiving on {}: {:?}.",
                            router.interfaces[i].name, err
                        );
                        continue;
                    }
                }
            };

            idle = false;

            if let Err(err) = ethernet::recv_frame(router, i, &buffer[.. frame_len]) {
                debug!(
                    "Dropped frame on {} with {:?}.",
                    router.interfaces[i].name, err
                );
            }
        }

        if idle {
            thread::sleep(Duration::from_millis(1));
        }
    }
}

/// Runs the periodic sweep and flood until the process exits.
///
/// Ticks on absolute deadlines so the interval does not drift with the time
/// spent building and sending advertisements.
pub fn update_loop<T: Env>(router: &Router<T>) {
    let interval = Duration::from_secs(UPDATE_INTERVAL_SECS);
    let mut deadline = Instant::now() + interval;

    loop {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
        deadline += interval;

        rip::flood(router);
    }
}

/// Brings the router up and spawns the receive and update activities.
pub fn spawn<T>(router: Arc<Router<T>>) -> Vec<thread::JoinHandle<()>>
where
    T: Env + Send + Sync + 'static,
{
    rip::bring_up(&router);
    rip::flood(&router);

    let recv = {
        let router = router.clone();
        thread::spawn(move || recv_loop(&*router))
    };

    let update = {
        let router = router.clone();
        thread::spawn(move || update_loop(&*router))
    };

    vec![recv, update]
}
