/// Calculates the Internet Checksum from [RFC1071](https://tools.ietf.org/html/rfc1071)
/// over a stream of bytes.
///
/// See [IPv4 header checksum](https://en.wikipedia.org/wiki/IPv4_header_checksum)
/// for an example.
pub fn internet_checksum<I>(bytes: I) -> u16
where
    I: IntoIterator<Item = u8>,
{
    let mut acc = 0 as u32;
    let mut iter = bytes.into_iter();

    loop {
        match (iter.next(), iter.next()) {
            (Some(hi), Some(lo)) => acc += ((hi as u32) << 8) | (lo as u32),
            (Some(hi), None) => {
                acc += (hi as u32) << 8;
                break;
            }
            _ => break,
        }
    }

    while acc > 0xFFFF {
        acc -= 0xFFFF;
    }

    !acc as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internet_checksum() {
        let buffer: [u8; 20] = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert_eq!(0xB861, internet_checksum(buffer.iter().cloned()));
    }

    #[test]
    fn test_internet_checksum_of_valid_header_is_zero() {
        let buffer: [u8; 20] = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0xB8, 0x61, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert_eq!(0, internet_checksum(buffer.iter().cloned()));
    }

    #[test]
    fn test_internet_checksum_with_odd_length() {
        let buffer: [u8; 3] = [0x01, 0x02, 0x03];
        assert_eq!(!0x0402, internet_checksum(buffer.iter().cloned()));
    }
}
