//! Core types for subnetcalc
//!
//! This crate provides the foundational types shared by the subnetcalc crates:
//! - [`IpClass`] - Historical (classful) IPv4 address class
//! - [`SubnetInfo`] - Complete result of a subnet calculation
//! - [`SubnetRange`] - One entry of an enumerated subnet list
//! - [`SubnetError`] - Error types
//!
//! ```
//! use subnet_core::IpClass;
//!
//! assert_eq!(IpClass::from_first_octet(10), IpClass::A);
//! assert_eq!(IpClass::A.default_prefix(), 8);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod config;
pub mod validation;

/// Historical IPv4 address class
///
/// A pure function of the first octet of an address. Addresses whose first
/// octet is 0 or 127 match none of the class ranges and fall through to
/// class E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpClass {
    A,
    B,
    C,
    D,
    E,
}

impl IpClass {
    /// Classify by first octet
    ///
    /// # Examples
    ///
    /// ```
    /// use subnet_core::IpClass;
    ///
    /// assert_eq!(IpClass::from_first_octet(172), IpClass::B);
    /// assert_eq!(IpClass::from_first_octet(224), IpClass::D);
    /// assert_eq!(IpClass::from_first_octet(127), IpClass::E);
    /// ```
    pub fn from_first_octet(octet: u8) -> Self {
        match octet {
            1..=126 => IpClass::A,
            128..=191 => IpClass::B,
            192..=223 => IpClass::C,
            224..=239 => IpClass::D,
            _ => IpClass::E,
        }
    }

    /// Conventional default prefix length
    ///
    /// D and E have no host addressing; 24 is used for them only so that
    /// the bits-borrowed statistic has something to subtract from.
    pub fn default_prefix(&self) -> u8 {
        match self {
            IpClass::A => 8,
            IpClass::B => 16,
            IpClass::C | IpClass::D | IpClass::E => 24,
        }
    }

    /// Single-letter class name
    pub fn as_str(&self) -> &'static str {
        match self {
            IpClass::A => "A",
            IpClass::B => "B",
            IpClass::C => "C",
            IpClass::D => "D",
            IpClass::E => "E",
        }
    }

    /// Long description including the class address range
    pub fn description(&self) -> &'static str {
        match self {
            IpClass::A => "Class A (1.0.0.0 - 126.255.255.255) - Large networks, /8 default",
            IpClass::B => "Class B (128.0.0.0 - 191.255.255.255) - Medium networks, /16 default",
            IpClass::C => "Class C (192.0.0.0 - 223.255.255.255) - Small networks, /24 default",
            IpClass::D => "Class D (224.0.0.0 - 239.255.255.255) - Multicast addresses",
            IpClass::E => "Class E (240.0.0.0 - 255.255.255.255) - Experimental/Reserved",
        }
    }

    /// Address range covered by the class
    pub fn address_range(&self) -> &'static str {
        match self {
            IpClass::A => "1.0.0.0 - 126.255.255.255",
            IpClass::B => "128.0.0.0 - 191.255.255.255",
            IpClass::C => "192.0.0.0 - 223.255.255.255",
            IpClass::D => "224.0.0.0 - 239.255.255.255",
            IpClass::E => "240.0.0.0 - 255.255.255.255",
        }
    }

    /// Default mask as shown to users, "N/A" for D and E
    pub fn default_mask_label(&self) -> &'static str {
        match self {
            IpClass::A => "255.0.0.0 (/8)",
            IpClass::B => "255.255.0.0 (/16)",
            IpClass::C => "255.255.255.0 (/24)",
            IpClass::D | IpClass::E => "N/A",
        }
    }
}

impl fmt::Display for IpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One subnet of an enumerated subnet list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetRange {
    /// 1-based position in the listing
    pub subnet_number: u64,
    pub network_address: String,
    pub broadcast_address: String,
    pub first_usable_host: String,
    pub last_usable_host: String,
    pub usable_hosts: u64,
}

/// Per-subnet listing attached to a [`SubnetInfo`]
///
/// Distinguishes a listing that was never asked for from one that was
/// dropped because enumeration failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RangeListing {
    /// Ranges were not requested
    NotRequested,
    /// Ranges were computed
    Listed { ranges: Vec<SubnetRange> },
    /// Ranges were requested but enumeration failed
    Omitted { reason: String },
}

impl RangeListing {
    /// Listed ranges, if any were computed
    pub fn ranges(&self) -> Option<&[SubnetRange]> {
        match self {
            RangeListing::Listed { ranges } => Some(ranges),
            _ => None,
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, RangeListing::Omitted { .. })
    }
}

/// Complete result of a subnet calculation
///
/// Immutable once built. Every address field is in dotted-quad form.
///
/// # Examples
///
/// ```
/// use subnet_core::{IpClass, RangeListing, SubnetInfo};
///
/// let info = SubnetInfo {
///     network_address: "192.168.1.0".to_string(),
///     broadcast_address: "192.168.1.255".to_string(),
///     first_usable_host: "192.168.1.1".to_string(),
///     last_usable_host: "192.168.1.254".to_string(),
///     total_hosts: 256,
///     usable_hosts: 254,
///     subnet_mask: "255.255.255.0".to_string(),
///     subnet_mask_binary: "11111111.11111111.11111111.00000000".to_string(),
///     wildcard_mask: "0.0.0.255".to_string(),
///     cidr: 24,
///     ip_class: IpClass::C,
///     ip_class_description: IpClass::C.description().to_string(),
///     number_of_subnets: 1,
///     bits_used_for_subnetting: 0,
///     subnet_ranges: RangeListing::NotRequested,
/// };
/// assert_eq!(info.to_string(), "192.168.1.0/24");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetInfo {
    pub network_address: String,
    pub broadcast_address: String,
    pub first_usable_host: String,
    pub last_usable_host: String,
    /// 2^(32 - cidr)
    pub total_hosts: u64,
    pub usable_hosts: u64,
    pub subnet_mask: String,
    /// Dotted 8-bit binary rendering of the subnet mask
    pub subnet_mask_binary: String,
    pub wildcard_mask: String,
    pub cidr: u8,
    pub ip_class: IpClass,
    pub ip_class_description: String,
    pub number_of_subnets: u64,
    pub bits_used_for_subnetting: u8,
    pub subnet_ranges: RangeListing,
}

impl fmt::Display for SubnetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_address, self.cidr)
    }
}

/// How the prefix of a calculation was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// Address and prefix given directly as `IP/CIDR`
    Manual,
    /// Prefix derived from a desired subnet count
    Subnets,
    /// Prefix derived from a desired host count
    Hosts,
}

impl fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CalculationMode::Manual => "manual",
            CalculationMode::Subnets => "subnets",
            CalculationMode::Hosts => "hosts",
        };
        f.write_str(s)
    }
}

/// Error types for subnet calculations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubnetError {
    /// Malformed address, wrong octet count or out-of-range octet
    #[error("{0}")]
    InvalidAddress(String),

    /// Prefix outside 0-32 or not an integer
    #[error("{0}")]
    InvalidPrefix(String),

    /// Subnet enumeration failed; never surfaced from a full calculation
    #[error("Subnet enumeration failed: {0}")]
    EnumerationFailure(String),

    /// Desired subnet or host count is not usable
    #[error("Invalid count: {0}")]
    InvalidCount(String),
}

/// Result type alias for subnet operations
pub type Result<T> = std::result::Result<T, SubnetError>;
