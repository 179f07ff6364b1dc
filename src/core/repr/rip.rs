use std::io::{
    Cursor,
    Write,
};

use byteorder::{
    NetworkEndian,
    ReadBytesExt,
    WriteBytesExt,
};

use crate::{
    Error,
    Result,
};
use crate::core::repr::ipv4::Address as Ipv4Address;

/// Well-known UDP port advertisements are exchanged on.
pub const PORT: u16 = 520;

/// Well-known multicast address advertisements are addressed to.
pub const MULTICAST: Ipv4Address = Ipv4Address::new([224, 0, 0, 9]);

const VERSION: u8 = 2;

const ADDRESS_FAMILY_IPV4: u16 = 2;

/// [RIPv2](https://tools.ietf.org/html/rfc2453) advertisement type.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Solicitation for a neighbor's table, sent at bring-up.
    Request = 1,
    /// Periodic or solicited advertisement of routes.
    Response = 2,
}

impl Command {
    fn try_new(command: u8) -> Result<Command> {
        match command {
            1 => Ok(Command::Request),
            2 => Ok(Command::Response),
            _ => Err(Error::Malformed),
        }
    }
}

/// One advertised route: a destination prefix and its hop count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub address: Ipv4Address,
    pub subnet_mask: Ipv4Address,
    pub next_hop: Ipv4Address,
    pub metric: u32,
}

/// Safe representation of a RIPv2 advertisement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rip {
    pub command: Command,
    pub entries: Vec<Entry>,
}

impl Rip {
    pub const HEADER_LEN: usize = 4;

    pub const ENTRY_LEN: usize = 20;

    /// Returns the size of the advertisement when serialized to a buffer.
    pub fn buffer_len(&self) -> usize {
        Self::HEADER_LEN + Self::ENTRY_LEN * self.entries.len()
    }

    /// Serializes the advertisement into a buffer.
    pub fn serialize(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }

        let mut writer = Cursor::new(buffer);
        writer.write_u8(self.command as u8).unwrap();
        writer.write_u8(VERSION).unwrap();
        writer.write_u16::<NetworkEndian>(0).unwrap();

        for entry in &self.entries {
            writer
                .write_u16::<NetworkEndian>(ADDRESS_FAMILY_IPV4)
                .unwrap();
            writer.write_u16::<NetworkEndian>(0).unwrap();
            writer.write(entry.address.as_bytes()).unwrap();
            writer.write(entry.subnet_mask.as_bytes()).unwrap();
            writer.write(entry.next_hop.as_bytes()).unwrap();
            writer.write_u32::<NetworkEndian>(entry.metric).unwrap();
        }

        Ok(())
    }

    /// Tries to deserialize a buffer into an advertisement.
    ///
    /// The advertised metrics are not range checked here; the protocol agent
    /// skips out-of-range entries one by one.
    pub fn deserialize(buffer: &[u8]) -> Result<Rip> {
        if buffer.len() < Self::HEADER_LEN {
            return Err(Error::Exhausted);
        } else if (buffer.len() - Self::HEADER_LEN) % Self::ENTRY_LEN != 0 {
            return Err(Error::Malformed);
        }

        let command = Command::try_new(buffer[0])?;
        let num_entries = (buffer.len() - Self::HEADER_LEN) / Self::ENTRY_LEN;
        let mut entries = Vec::with_capacity(num_entries);

        for i in 0 .. num_entries {
            let entry = &buffer[Self::HEADER_LEN + i * Self::ENTRY_LEN ..];
            entries.push(Entry {
                address: Ipv4Address::try_new(&entry[4 .. 8]).unwrap(),
                subnet_mask: Ipv4Address::try_new(&entry[8 .. 12]).unwrap(),
                next_hop: Ipv4Address::try_new(&entry[12 .. 16]).unwrap(),
                metric: (&entry[16 .. 20]).read_u32::<NetworkEndian>().unwrap(),
            });
        }

        Ok(Rip { command, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> Rip {
        Rip {
            command: Command::Response,
            entries: vec![
                Entry {
                    address: Ipv4Address::new([10, 0, 3, 0]),
                    subnet_mask: Ipv4Address::new([255, 255, 255, 0]),
                    next_hop: Ipv4Address::new([10, 0, 1, 2]),
                    metric: 1,
                },
                Entry {
                    address: Ipv4Address::new([10, 0, 4, 0]),
                    subnet_mask: Ipv4Address::new([255, 255, 255, 0]),
                    next_hop: Ipv4Address::UNSPECIFIED,
                    metric: 16,
                },
            ],
        }
    }

    #[test]
    fn test_serialize_then_deserialize() {
        let rip = response();
        let mut buffer = vec![0; rip.buffer_len()];
        rip.serialize(&mut buffer[..]).unwrap();
        assert_eq!(Rip::deserialize(&buffer[..]).unwrap(), rip);
    }

    #[test]
    fn test_serialize_request() {
        let rip = Rip {
            command: Command::Request,
            entries: vec![],
        };

        let mut buffer = vec![0; rip.buffer_len()];
        rip.serialize(&mut buffer[..]).unwrap();

        assert_eq!(buffer, vec![1, 2, 0, 0]);
        assert_eq!(Rip::deserialize(&buffer[..]).unwrap(), rip);
    }

    #[test]
    fn test_serialize_with_short_buffer() {
        let rip = response();
        let mut buffer = vec![0; rip.buffer_len() - 1];
        assert_matches!(rip.serialize(&mut buffer[..]), Err(Error::Exhausted));
    }

    #[test]
    fn test_deserialize_with_bad_command() {
        let buffer = [9, 2, 0, 0];
        assert_matches!(Rip::deserialize(&buffer[..]), Err(Error::Malformed));
    }

    #[test]
    fn test_deserialize_with_truncated_entry() {
        let buffer = [2, 2, 0, 0, 0, 2, 0, 0];
        assert_matches!(Rip::deserialize(&buffer[..]), Err(Error::Malformed));
    }
}
