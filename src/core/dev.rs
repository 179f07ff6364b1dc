use std::collections::VecDeque;
use std::sync::{
    Arc,
    Mutex,
};

#[derive(Debug)]
pub enum Error {
    /// Indicates the device cannot accept a frame right now.
    Busy,
    /// Indicates the device has no frame to deliver.
    Nothing,
    /// Indicates a frame larger than the provided buffer.
    Overflow,
    /// Indicates a generic IO error.
    IO(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A low level interface for sending and receiving raw Ethernet frames.
pub trait Device: Send {
    /// Transmits a single frame, fire-and-forget.
    fn send(&mut self, buffer: &[u8]) -> Result<()>;

    /// Reads a single frame into the buffer, returning its length.
    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Returns the maximum payload size the device supports.
    fn max_transmission_unit(&self) -> usize;
}

/// An in-memory device backed by frame queues.
///
/// Clones share the same queues, so a test or demo can keep a handle to
/// inspect frames the router transmitted or feed it frames to receive.
#[derive(Clone)]
pub struct Queued {
    rx: Arc<Mutex<VecDeque<Vec<u8>>>>,
    tx: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl Queued {
    pub fn new() -> Queued {
        Queued {
            rx: Arc::new(Mutex::new(VecDeque::new())),
            tx: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Enqueues a frame for the device to receive.
    pub fn enqueue_recv(&self, frame: Vec<u8>) {
        self.rx.lock().unwrap().push_back(frame);
    }

    /// Removes and returns the oldest frame sent through the device.
    pub fn dequeue_send(&self) -> Option<Vec<u8>> {
        self.tx.lock().unwrap().pop_front()
    }

    /// Returns the number of frames sent through the device and not yet
    /// dequeued.
    pub fn sent_len(&self) -> usize {
        self.tx.lock().unwrap().len()
    }
}

impl Device for Queued {
    fn send(&mut self, buffer: &[u8]) -> Result<()> {
        self.tx.lock().unwrap().push_back(buffer.to_vec());
        Ok(())
    }

    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let frame = match self.rx.lock().unwrap().pop_front() {
            Some(frame) => frame,
            None => return Err(Error::Nothing),
        };

        if frame.len() > buffer.len() {
            return Err(Error::Overflow);
        }

        buffer[.. frame.len()].copy_from_slice(&frame);
        Ok(frame.len())
    }

    fn max_transmission_unit(&self) -> usize {
        1500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recv_with_empty_queue() {
        let mut dev = Queued::new();
        let mut buffer = [0; 64];
        assert_matches!(dev.recv(&mut buffer), Err(Error::Nothing));
    }

    #[test]
    fn test_send_then_dequeue() {
        let mut dev = Queued::new();
        let handle = dev.clone();

        dev.send(&[1, 2, 3]).unwrap();
        assert_eq!(handle.dequeue_send().unwrap(), vec![1, 2, 3]);
        assert_matches!(handle.dequeue_send(), None);
    }

    #[test]
    fn test_enqueue_then_recv() {
        let mut dev = Queued::new();
        let handle = dev.clone();

        handle.enqueue_recv(vec![4, 5]);

        let mut buffer = [0; 64];
        assert_matches!(dev.recv(&mut buffer), Ok(2));
        assert_eq!(&buffer[.. 2], &[4, 5]);
    }
}
