use crate::{
    Error,
    Result,
};
use crate::core::repr::{
    eth_types,
    EthernetFrame,
};
use crate::core::service::{
    ipv4,
    Router,
};
use crate::core::time::Env;

/// Sends an Ethernet frame out an interface.
///
/// The closure fills in everything but the source address, which is set to
/// the interface's own.
pub fn send_frame<T, F>(router: &Router<T>, iface: usize, eth_frame_len: usize, f: F) -> Result<()>
where
    T: Env,
    F: FnOnce(&mut EthernetFrame<&mut [u8]>),
{
    let mut eth_buffer = vec![0; eth_frame_len];
    let mut eth_frame = EthernetFrame::try_new(&mut eth_buffer[..])?;
    f(&mut eth_frame);
    eth_frame.set_src_addr(router.interfaces[iface].ethernet_addr);

    let mut dev = router.interfaces[iface].dev.lock().unwrap();
    dev.send(eth_frame.as_ref())?;
    Ok(())
}

/// Receives an Ethernet frame on an interface.
///
/// IPv4 frames addressed to the interface (or broadcast) are handed to the
/// forwarding pipeline; everything else is ignored.
pub fn recv_frame<T: Env>(router: &Router<T>, in_iface: usize, eth_buffer: &[u8]) -> Result<()> {
    let eth_frame = EthernetFrame::try_new(eth_buffer)?;

    let dst_addr = eth_frame.dst_addr();
    if dst_addr != router.interfaces[in_iface].ethernet_addr && !dst_addr.is_broadcast() {
        debug!("Ignoring Ethernet frame with destination {}.", dst_addr);
        return Err(Error::Ignored);
    }

    match eth_frame.payload_type() {
        eth_types::IPV4 => ipv4::recv_packet(router, in_iface, eth_frame.payload()),
        i => {
            debug!("Ignoring Ethernet frame with type {}.", i);
            Err(Error::Ignored)
        }
    }
}
