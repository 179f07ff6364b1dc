use std::cmp::min;
use std::fmt::{
    Display,
    Formatter,
    Result as FmtResult,
};
use std::io::Write;
use std::ops::Deref;
use std::result::Result as StdResult;
use std::str::FromStr;

use byteorder::{
    NetworkEndian,
    ReadBytesExt,
    WriteBytesExt,
};

use crate::{
    Error,
    Result,
};
use crate::core::check::internet_checksum;

/// [IPv4 address](https://en.wikipedia.org/wiki/IPv4) in network byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address([u8; 4]);

impl Address {
    pub const UNSPECIFIED: Address = Address([0; 4]);

    /// Creates an IPv4 address from a network byte order buffer.
    pub const fn new(addr: [u8; 4]) -> Address {
        Address(addr)
    }

    /// Tries to create an IPv4 address from a network byte order slice.
    pub fn try_new(addr: &[u8]) -> Result<Address> {
        if addr.len() != 4 {
            return Err(Error::Exhausted);
        }

        let mut _addr: [u8; 4] = [0; 4];
        _addr.clone_from_slice(addr);
        Ok(Address(_addr))
    }

    /// Returns a reference to the network byte order representation of the
    /// address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a host byte order integer.
    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Creates an IPv4 address from a host byte order integer.
    pub fn from_u32(addr: u32) -> Address {
        Address(addr.to_be_bytes())
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}.{}.{}.{}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl FromStr for Address {
    type Err = ();

    /// Parses an IPv4 address from an A.B.C.D style string.
    fn from_str(addr: &str) -> StdResult<Address, Self::Err> {
        let (bytes, unknown): (Vec<_>, Vec<_>) = addr.split(".")
            .map(|token| token.parse::<u8>())
            .partition(|byte| !byte.is_err());

        if bytes.len() != 4 || unknown.len() > 0 {
            return Err(());
        }

        let mut ipv4: [u8; 4] = [0; 4];
        for (i, byte) in bytes.into_iter().enumerate() {
            ipv4[i] = byte.unwrap();
        }

        Ok(Address::new(ipv4))
    }
}

/// IPv4 address with a subnet prefix length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressCidr {
    address: Address,
    prefix_len: u8,
}

impl AddressCidr {
    /// Creates an IPv4 address with a subnet prefix length.
    ///
    /// # Panics
    ///
    /// Causes a panic if the prefix length is longer than 32 bits.
    pub fn new(address: Address, prefix_len: u8) -> AddressCidr {
        assert!(prefix_len <= 32);

        AddressCidr {
            address,
            prefix_len,
        }
    }

    /// Returns the subnet mask as an address.
    pub fn subnet_mask(&self) -> Address {
        if self.prefix_len == 0 {
            Address::UNSPECIFIED
        } else {
            Address::from_u32(!0 << (32 - self.prefix_len))
        }
    }

    /// Returns the network address of the subnet.
    pub fn network(&self) -> Address {
        Address::from_u32(self.address.as_u32() & self.subnet_mask().as_u32())
    }

    /// Checks if an address is a member of the subnet.
    pub fn is_member(&self, address: Address) -> bool {
        (address.as_u32() & self.subnet_mask().as_u32()) == self.network().as_u32()
    }
}

impl Deref for AddressCidr {
    type Target = Address;

    fn deref(&self) -> &Address {
        &self.address
    }
}

impl Display for AddressCidr {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for AddressCidr {
    type Err = ();

    /// Parses an address and prefix length from an A.B.C.D/N style string.
    fn from_str(cidr: &str) -> StdResult<AddressCidr, Self::Err> {
        let tokens: Vec<_> = cidr.split("/").collect();

        if tokens.len() != 2 {
            return Err(());
        }

        let address = tokens[0].parse::<Address>()?;
        let prefix_len = tokens[1].parse::<u8>().map_err(|_| ())?;

        if prefix_len > 32 {
            return Err(());
        }

        Ok(AddressCidr::new(address, prefix_len))
    }
}

/// [IPv4 protocol numbers](https://en.wikipedia.org/wiki/List_of_IP_protocol_numbers).
pub mod protocols {
    pub const ICMP: u8 = 1;

    pub const UDP: u8 = 17;
}

mod fields {
    use std::ops::Range;

    pub const VERSION_IHL: usize = 0;

    pub const TOTAL_LEN: Range<usize> = 2 .. 4;

    pub const IDENTIFICATION: Range<usize> = 4 .. 6;

    pub const TTL: usize = 8;

    pub const PROTOCOL: usize = 9;

    pub const CHECKSUM: Range<usize> = 10 .. 12;

    pub const SRC_ADDR: Range<usize> = 12 .. 16;

    pub const DST_ADDR: Range<usize> = 16 .. 20;
}

/// View of a byte buffer as an IPv4 packet.
#[derive(Debug)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for Packet<T> {
    fn as_ref(&self) -> &[u8] {
        self.buffer.as_ref()
    }
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub const MIN_HEADER_LEN: usize = 20;

    /// Tries to create an IPv4 packet view over a byte buffer.
    ///
    /// Only the buffer length is checked here; use check_encoding() to
    /// validate a received packet before trusting its fields.
    pub fn try_new(buffer: T) -> Result<Packet<T>> {
        if buffer.as_ref().len() < Self::MIN_HEADER_LEN {
            Err(Error::Exhausted)
        } else {
            Ok(Packet { buffer })
        }
    }

    /// Returns the length of an IPv4 packet, with no options, carrying the
    /// specified payload size.
    pub fn buffer_len(payload_len: usize) -> usize {
        Self::MIN_HEADER_LEN + payload_len
    }

    /// Checks if the header has a consistent encoding.
    ///
    /// This does not verify the checksum; forwarding logic handles checksum
    /// mismatches separately.
    pub fn check_encoding(&self) -> Result<()> {
        let buffer_len = self.buffer.as_ref().len();

        if self.ip_version() != 4 {
            Err(Error::Malformed)
        } else if (self.header_len() as usize) < Self::MIN_HEADER_LEN
            || (self.header_len() as usize) > buffer_len
            || (self.packet_len() as usize) < (self.header_len() as usize)
            || (self.packet_len() as usize) > buffer_len
        {
            Err(Error::Malformed)
        } else {
            Ok(())
        }
    }

    /// Calculates the header checksum with the checksum field treated as
    /// zero. Equal to header_checksum() for an intact header.
    pub fn gen_header_checksum(&self) -> u16 {
        let header = &self.buffer.as_ref()[.. self.header_len() as usize];
        let bytes = header
            .iter()
            .enumerate()
            .map(|(i, &byte)| if fields::CHECKSUM.contains(&i) { 0 } else { byte });
        internet_checksum(bytes)
    }

    pub fn ip_version(&self) -> u8 {
        (self.buffer.as_ref()[fields::VERSION_IHL] & 0xF0) >> 4
    }

    pub fn header_len(&self) -> u8 {
        (self.buffer.as_ref()[fields::VERSION_IHL] & 0x0F) * 4
    }

    pub fn packet_len(&self) -> u16 {
        (&self.buffer.as_ref()[fields::TOTAL_LEN])
            .read_u16::<NetworkEndian>()
            .unwrap()
    }

    pub fn identification(&self) -> u16 {
        (&self.buffer.as_ref()[fields::IDENTIFICATION])
            .read_u16::<NetworkEndian>()
            .unwrap()
    }

    pub fn ttl(&self) -> u8 {
        self.buffer.as_ref()[fields::TTL]
    }

    pub fn protocol(&self) -> u8 {
        self.buffer.as_ref()[fields::PROTOCOL]
    }

    pub fn header_checksum(&self) -> u16 {
        (&self.buffer.as_ref()[fields::CHECKSUM])
            .read_u16::<NetworkEndian>()
            .unwrap()
    }

    pub fn src_addr(&self) -> Address {
        Address::try_new(&self.buffer.as_ref()[fields::SRC_ADDR]).unwrap()
    }

    pub fn dst_addr(&self) -> Address {
        Address::try_new(&self.buffer.as_ref()[fields::DST_ADDR]).unwrap()
    }

    /// Returns an immutable view of the payload.
    pub fn payload(&self) -> &[u8] {
        let start = self.header_len() as usize;
        let end = min(self.packet_len() as usize, self.buffer.as_ref().len());
        &self.buffer.as_ref()[start .. end]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_version_and_header_len(&mut self, version: u8, header_len: u8) {
        self.buffer.as_mut()[fields::VERSION_IHL] = (version << 4) | (header_len / 4);
    }

    pub fn set_packet_len(&mut self, packet_len: u16) {
        (&mut self.buffer.as_mut()[fields::TOTAL_LEN])
            .write_u16::<NetworkEndian>(packet_len)
            .unwrap()
    }

    pub fn set_identification(&mut self, identification: u16) {
        (&mut self.buffer.as_mut()[fields::IDENTIFICATION])
            .write_u16::<NetworkEndian>(identification)
            .unwrap()
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.buffer.as_mut()[fields::TTL] = ttl;
    }

    pub fn set_protocol(&mut self, protocol: u8) {
        self.buffer.as_mut()[fields::PROTOCOL] = protocol;
    }

    pub fn set_header_checksum(&mut self, checksum: u16) {
        (&mut self.buffer.as_mut()[fields::CHECKSUM])
            .write_u16::<NetworkEndian>(checksum)
            .unwrap()
    }

    pub fn set_src_addr(&mut self, addr: Address) {
        (&mut self.buffer.as_mut()[fields::SRC_ADDR])
            .write(addr.as_bytes())
            .unwrap();
    }

    pub fn set_dst_addr(&mut self, addr: Address) {
        (&mut self.buffer.as_mut()[fields::DST_ADDR])
            .write(addr.as_bytes())
            .unwrap();
    }

    /// Returns a mutable view of the payload.
    ///
    /// NOTE: The header length and packet length fields must be written
    /// before the payload is located; Repr::serialize takes care of this.
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let start = self.header_len() as usize;
        let end = min(self.packet_len() as usize, self.buffer.as_ref().len());
        &mut self.buffer.as_mut()[start .. end]
    }
}

/// Safe representation of an IPv4 header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repr {
    pub src_addr: Address,
    pub dst_addr: Address,
    pub protocol: u8,
    pub payload_len: u16,
}

impl Repr {
    pub const DEFAULT_TTL: u8 = 64;

    /// Returns the IPv4 packet size needed to serialize this header and
    /// payload.
    pub fn buffer_len(&self) -> usize {
        Packet::<&[u8]>::MIN_HEADER_LEN + self.payload_len as usize
    }

    /// Tries to deserialize a packet into an IPv4 header representation.
    pub fn deserialize<T>(packet: &Packet<T>) -> Result<Repr>
    where
        T: AsRef<[u8]>,
    {
        packet.check_encoding()?;

        Ok(Repr {
            src_addr: packet.src_addr(),
            dst_addr: packet.dst_addr(),
            protocol: packet.protocol(),
            payload_len: packet.packet_len() - packet.header_len() as u16,
        })
    }

    /// Serializes the IPv4 header into a packet, without options, with a
    /// randomized identification field and a valid checksum.
    pub fn serialize<T>(&self, packet: &mut Packet<T>)
    where
        T: AsRef<[u8]> + AsMut<[u8]>,
    {
        packet.set_version_and_header_len(4, Packet::<&[u8]>::MIN_HEADER_LEN as u8);
        packet.set_packet_len(self.buffer_len() as u16);
        packet.set_identification(rand::random::<u16>());
        packet.set_ttl(Repr::DEFAULT_TTL);
        packet.set_protocol(self.protocol);
        packet.set_src_addr(self.src_addr);
        packet.set_dst_addr(self.dst_addr);
        packet.set_header_checksum(0);

        let checksum = packet.gen_header_checksum();
        packet.set_header_checksum(checksum);
    }
}
