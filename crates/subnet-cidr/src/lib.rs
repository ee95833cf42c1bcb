//! IPv4 address codec and CIDR block arithmetic
//!
//! Provides the conversions everything else is built on:
//! - Dotted-quad string <-> `u32`
//! - Prefix length -> subnet mask and wildcard mask
//! - Octet -> 8-bit binary string (subtraction method)
//! - [`Cidr`] block with network, broadcast and usable host bounds
//! - Classful address classification
//!
//! # Examples
//!
//! ```
//! use subnet_cidr::{address_to_integer, integer_to_address, Cidr};
//!
//! assert_eq!(address_to_integer("192.168.1.0").unwrap(), 0xC0A80100);
//! assert_eq!(integer_to_address(0x0A000001), "10.0.0.1");
//!
//! let cidr = Cidr::parse("192.168.1.77/24").unwrap();
//! assert_eq!(cidr.network(), 0xC0A80100);
//! assert_eq!(cidr.usable_hosts(), 254);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use subnet_core::validation::{parse_octet, MAX_PREFIX};
use subnet_core::{Result, SubnetError};

mod class;

pub use class::{classify, classify_address, default_prefix_for};

/// Powers of two visited by the subtraction method, largest first
const OCTET_POWERS: [u8; 8] = [128, 64, 32, 16, 8, 4, 2, 1];

const MSG_FORMAT: &str = "Invalid IP address format";
const MSG_RANGE: &str = "IP address octets must be between 0 and 255";

/// Parse a dotted-quad address into a `u32`
///
/// Requires exactly four base-10 octets in 0-255 without leading zeros.
///
/// # Examples
///
/// ```
/// use subnet_cidr::address_to_integer;
///
/// assert_eq!(address_to_integer("10.0.0.0").unwrap(), 0x0A000000);
/// assert!(address_to_integer("10.0.0").is_err());
/// assert!(address_to_integer("10.0.0.256").is_err());
/// ```
pub fn address_to_integer(address: &str) -> Result<u32> {
    let octets: Vec<&str> = address.split('.').collect();
    if octets.len() != 4 {
        return Err(SubnetError::InvalidAddress(MSG_FORMAT.to_string()));
    }

    let mut result = 0u32;
    for octet_str in octets {
        let octet = parse_octet(octet_str).ok_or_else(|| {
            let plain_digits =
                octet_str.bytes().all(|b| b.is_ascii_digit()) && !octet_str.starts_with('0');
            let msg = match octet_str.parse::<u32>() {
                Ok(v) if plain_digits && v > 255 => MSG_RANGE,
                _ => MSG_FORMAT,
            };
            SubnetError::InvalidAddress(msg.to_string())
        })?;
        result = (result << 8) | octet as u32;
    }

    Ok(result)
}

/// Render a `u32` as a dotted-quad address
pub fn integer_to_address(value: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (value >> 24) & 0xFF,
        (value >> 16) & 0xFF,
        (value >> 8) & 0xFF,
        value & 0xFF
    )
}

/// Subnet mask for a prefix length, as a `u32`
pub fn prefix_to_mask(prefix: u8) -> Result<u32> {
    if prefix > MAX_PREFIX {
        return Err(invalid_prefix(prefix));
    }
    Ok(if prefix == 0 {
        0
    } else {
        !((1u64 << (32 - prefix)) - 1) as u32
    })
}

/// Subnet mask for a prefix length, in dotted-quad form
///
/// # Examples
///
/// ```
/// use subnet_cidr::prefix_to_subnet_mask;
///
/// assert_eq!(prefix_to_subnet_mask(0).unwrap(), "0.0.0.0");
/// assert_eq!(prefix_to_subnet_mask(20).unwrap(), "255.255.240.0");
/// assert_eq!(prefix_to_subnet_mask(32).unwrap(), "255.255.255.255");
/// assert!(prefix_to_subnet_mask(33).is_err());
/// ```
pub fn prefix_to_subnet_mask(prefix: u8) -> Result<String> {
    prefix_to_mask(prefix).map(integer_to_address)
}

/// Wildcard mask of a dotted-quad subnet mask (255 - octet, per octet)
pub fn subnet_mask_to_wildcard(mask: &str) -> Result<String> {
    address_to_integer(mask).map(|m| integer_to_address(!m))
}

/// Render an octet as 8 binary digits using the subtraction method
///
/// Walks 128, 64, ... 1; emits `1` and subtracts when the remainder can
/// cover the power, `0` otherwise.
///
/// # Examples
///
/// ```
/// use subnet_cidr::octet_to_binary8;
///
/// assert_eq!(octet_to_binary8(200), "11001000");
/// assert_eq!(octet_to_binary8(0), "00000000");
/// ```
pub fn octet_to_binary8(value: u8) -> String {
    let mut bits = String::with_capacity(8);
    let mut remainder = value;
    for power in OCTET_POWERS {
        if remainder >= power {
            bits.push('1');
            remainder -= power;
        } else {
            bits.push('0');
        }
    }
    bits
}

/// Dotted binary rendering of a mask, e.g. `11111111.11111111.00000000.00000000`
pub fn mask_to_binary(mask: u32) -> String {
    mask.to_be_bytes()
        .iter()
        .map(|&b| octet_to_binary8(b))
        .collect::<Vec<_>>()
        .join(".")
}

/// Step-by-step view of the subtraction method for one octet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryBreakdown {
    /// Powers of two turned on, largest first
    pub powers: Vec<u8>,
    /// The powers joined as `128 + 64 + 8`, or `0`
    pub sum: String,
    /// 8-digit binary string
    pub binary: String,
}

/// Break an octet down into the powers of two the subtraction method uses
///
/// # Examples
///
/// ```
/// use subnet_cidr::binary_breakdown;
///
/// let b = binary_breakdown(200);
/// assert_eq!(b.powers, vec![128, 64, 8]);
/// assert_eq!(b.sum, "128 + 64 + 8");
/// assert_eq!(b.binary, "11001000");
/// ```
pub fn binary_breakdown(value: u8) -> BinaryBreakdown {
    let mut powers = Vec::new();
    let mut remainder = value;
    for power in OCTET_POWERS {
        if remainder >= power {
            powers.push(power);
            remainder -= power;
        }
    }

    let sum = if powers.is_empty() {
        "0".to_string()
    } else {
        powers
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    };

    BinaryBreakdown {
        powers,
        sum,
        binary: octet_to_binary8(value),
    }
}

fn invalid_prefix(prefix: impl fmt::Display) -> SubnetError {
    SubnetError::InvalidPrefix(format!("CIDR must be between 0 and 32 (got {})", prefix))
}

/// CIDR block representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cidr {
    /// Network address (host bits cleared)
    network: u32,
    /// Prefix length (0-32)
    prefix_len: u8,
    /// Network mask
    mask: u32,
}

impl Cidr {
    /// Parse CIDR notation string
    ///
    /// # Arguments
    ///
    /// * `cidr` - CIDR string (e.g., "192.168.1.0/24")
    ///
    /// # Examples
    ///
    /// ```
    /// use subnet_cidr::Cidr;
    ///
    /// let cidr = Cidr::parse("10.0.0.0/8").unwrap();
    /// assert_eq!(cidr.prefix_len(), 8);
    /// ```
    pub fn parse(cidr: &str) -> Result<Self> {
        let (ip_str, prefix_str) = cidr.split_once('/').ok_or_else(|| {
            SubnetError::InvalidAddress("Please use format: IP/CIDR (e.g., 10.0.0.0/16)".to_string())
        })?;

        let prefix_len: u8 = prefix_str
            .trim()
            .parse()
            .map_err(|_| invalid_prefix(prefix_str))?;

        Self::new(address_to_integer(ip_str)?, prefix_len)
    }

    /// Create new CIDR block containing `address`
    ///
    /// # Arguments
    ///
    /// * `address` - Any address inside the block, as u32
    /// * `prefix_len` - Prefix length (0-32)
    pub fn new(address: u32, prefix_len: u8) -> Result<Self> {
        let mask = prefix_to_mask(prefix_len)?;
        Ok(Self {
            network: address & mask,
            prefix_len,
            mask,
        })
    }

    /// Get network address
    pub fn network(&self) -> u32 {
        self.network
    }

    /// Get prefix length
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Get network mask
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Get wildcard mask (complement of the network mask)
    pub fn wildcard(&self) -> u32 {
        !self.mask
    }

    /// Number of host bits (32 - prefix)
    pub fn host_bits(&self) -> u8 {
        32 - self.prefix_len
    }

    /// Get broadcast address
    pub fn broadcast(&self) -> u32 {
        self.network | !self.mask
    }

    /// First usable host
    ///
    /// Blocks with fewer than two host bits have no separate host range; the
    /// network address is reported instead.
    pub fn first_usable(&self) -> u32 {
        if self.host_bits() > 1 {
            self.network + 1
        } else {
            self.network
        }
    }

    /// Last usable host, see [`Cidr::first_usable`]
    pub fn last_usable(&self) -> u32 {
        if self.host_bits() > 1 {
            self.broadcast() - 1
        } else {
            self.network
        }
    }

    /// Get total number of addresses in this block
    pub fn size(&self) -> u64 {
        1u64 << self.host_bits()
    }

    /// Usable host count
    ///
    /// `size - 2` normally; a /31 has none, a /32 counts its single address.
    pub fn usable_hosts(&self) -> u64 {
        usable_hosts_for(self.host_bits())
    }

    /// Check if address is in this block
    pub fn contains(&self, ip: u32) -> bool {
        (ip & self.mask) == self.network
    }
}

/// Usable host count for a block with `host_bits` host bits
pub fn usable_hosts_for(host_bits: u8) -> u64 {
    match host_bits {
        0 => 1,
        1 => 0,
        n => (1u64 << n) - 2,
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", integer_to_address(self.network), self.prefix_len)
    }
}
