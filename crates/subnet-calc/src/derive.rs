//! Prefix derivation from desired subnet or host counts

use subnet_cidr::{address_to_integer, classify};
use subnet_core::validation::MAX_PREFIX;
use subnet_core::{CalculationMode, Result, SubnetError};

/// Where the prefix of a calculation comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixSource {
    /// Prefix given directly
    Prefix(u8),
    /// Enough subnets of the classful parent network
    SubnetCount(u64),
    /// Enough usable hosts per subnet
    HostCount(u64),
}

impl PrefixSource {
    pub fn mode(&self) -> CalculationMode {
        match self {
            PrefixSource::Prefix(_) => CalculationMode::Manual,
            PrefixSource::SubnetCount(_) => CalculationMode::Subnets,
            PrefixSource::HostCount(_) => CalculationMode::Hosts,
        }
    }
}

/// Smallest `b` with `2^b >= n`
fn ceil_log2(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        64 - (n - 1).leading_zeros()
    }
}

/// Prefix giving at least `count` subnets below `default_prefix`
///
/// # Examples
///
/// ```
/// use subnet_calc::prefix_from_subnet_count;
///
/// assert_eq!(prefix_from_subnet_count(16, 4).unwrap(), 18);
/// assert_eq!(prefix_from_subnet_count(24, 5).unwrap(), 27);
/// ```
pub fn prefix_from_subnet_count(default_prefix: u8, count: u64) -> Result<u8> {
    if count == 0 {
        return Err(SubnetError::InvalidCount(
            "Please enter a valid number of subnets".to_string(),
        ));
    }
    let prefix = u32::from(default_prefix) + ceil_log2(count);
    if prefix > u32::from(MAX_PREFIX) {
        return Err(SubnetError::InvalidPrefix(format!(
            "{} subnets need a /{} prefix; CIDR must be between 0 and 32",
            count, prefix
        )));
    }
    Ok(prefix as u8)
}

/// Prefix giving at least `hosts` usable hosts per subnet
///
/// Two extra addresses are reserved for network and broadcast.
///
/// # Examples
///
/// ```
/// use subnet_calc::prefix_from_host_count;
///
/// assert_eq!(prefix_from_host_count(254).unwrap(), 24);
/// assert_eq!(prefix_from_host_count(255).unwrap(), 23);
/// ```
pub fn prefix_from_host_count(hosts: u64) -> Result<u8> {
    if hosts == 0 {
        return Err(SubnetError::InvalidCount(
            "Please enter a valid number of hosts".to_string(),
        ));
    }
    let host_bits = hosts.checked_add(2).map(ceil_log2).unwrap_or(64);
    if host_bits > u32::from(MAX_PREFIX) {
        return Err(SubnetError::InvalidPrefix(format!(
            "{} hosts do not fit in an IPv4 network",
            hosts
        )));
    }
    Ok((32 - host_bits) as u8)
}

/// Resolve the prefix for `address` from any [`PrefixSource`]
///
/// Subnet counts are measured against the class default prefix of the address.
pub fn resolve_prefix(address: &str, source: PrefixSource) -> Result<u8> {
    match source {
        PrefixSource::Prefix(prefix) => {
            if prefix > MAX_PREFIX {
                return Err(SubnetError::InvalidPrefix(
                    "CIDR must be between 0 and 32".to_string(),
                ));
            }
            Ok(prefix)
        }
        PrefixSource::SubnetCount(count) => {
            let default_prefix = classify(address_to_integer(address)?).default_prefix();
            prefix_from_subnet_count(default_prefix, count)
        }
        PrefixSource::HostCount(hosts) => prefix_from_host_count(hosts),
    }
}
