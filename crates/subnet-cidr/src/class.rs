//! Classful address classification

use subnet_core::{IpClass, Result};

use crate::address_to_integer;

/// Class of an address given as a `u32`
pub fn classify(address: u32) -> IpClass {
    IpClass::from_first_octet((address >> 24) as u8)
}

/// Class of a dotted-quad address
///
/// The address is validated first; only the first octet decides the class.
///
/// # Examples
///
/// ```
/// use subnet_core::IpClass;
/// use subnet_cidr::classify_address;
///
/// assert_eq!(classify_address("10.1.2.3").unwrap(), IpClass::A);
/// assert_eq!(classify_address("192.168.0.1").unwrap(), IpClass::C);
/// assert!(classify_address("192.168.0").is_err());
/// ```
pub fn classify_address(address: &str) -> Result<IpClass> {
    address_to_integer(address).map(classify)
}

/// Conventional default prefix of a class
pub fn default_prefix_for(class: IpClass) -> u8 {
    class.default_prefix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_integers() {
        assert_eq!(classify(0x0A000000), IpClass::A);
        assert_eq!(classify(0xAC100000), IpClass::B);
        assert_eq!(classify(0xC0A80100), IpClass::C);
        assert_eq!(classify(0xE0000001), IpClass::D);
        assert_eq!(classify(0xF0000000), IpClass::E);
    }

    #[test]
    fn test_edge_octets() {
        assert_eq!(classify_address("0.0.0.0").unwrap(), IpClass::E);
        assert_eq!(classify_address("127.0.0.1").unwrap(), IpClass::E);
        assert_eq!(classify_address("126.255.255.255").unwrap(), IpClass::A);
        assert_eq!(classify_address("128.0.0.0").unwrap(), IpClass::B);
    }

    #[test]
    fn test_default_prefix_for() {
        assert_eq!(default_prefix_for(IpClass::A), 8);
        assert_eq!(default_prefix_for(IpClass::B), 16);
        assert_eq!(default_prefix_for(IpClass::D), 24);
    }
}
