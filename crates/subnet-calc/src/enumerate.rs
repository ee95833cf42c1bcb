//! Subnet range enumeration
//!
//! Lists the equal-sized subnets that a prefix carves out of the classful
//! parent network of an address, capped to a maximum count.

use subnet_cidr::{address_to_integer, classify, integer_to_address, prefix_to_mask, usable_hosts_for};
use subnet_core::{Result, SubnetError, SubnetRange};

/// Shape of the subnet grid a prefix lays over the classful parent network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetLayout {
    /// Parent network: the address masked with its class default prefix
    pub parent_network: u32,
    /// Addresses per subnet, 2^(32 - prefix)
    pub block_size: u64,
    /// Bits taken from the host part beyond the class default, never negative
    pub bits_borrowed: u8,
    /// Number of subnets in the parent network
    pub total_subnets: u64,
}

impl SubnetLayout {
    /// Layout for an address and an already validated prefix
    pub fn new(address: u32, prefix: u8) -> Result<Self> {
        let default_prefix = classify(address).default_prefix();
        let parent_network = address & prefix_to_mask(default_prefix)?;
        prefix_to_mask(prefix)?;

        let bits_borrowed = prefix.saturating_sub(default_prefix);
        Ok(Self {
            parent_network,
            block_size: 1u64 << (32 - prefix),
            bits_borrowed,
            total_subnets: 1u64 << bits_borrowed,
        })
    }
}

/// Enumerate subnet ranges for a dotted-quad address
///
/// Returns at most `max_count` entries, numbered from 1.
///
/// # Examples
///
/// ```
/// use subnet_calc::enumerate_subnet_ranges;
///
/// let ranges = enumerate_subnet_ranges("172.16.0.0", 18, 10).unwrap();
/// assert_eq!(ranges.len(), 4);
/// assert_eq!(ranges[1].network_address, "172.16.64.0");
/// ```
pub fn enumerate_subnet_ranges(address: &str, prefix: u8, max_count: u64) -> Result<Vec<SubnetRange>> {
    let ip = address_to_integer(address)?;
    enumerate_from(ip, prefix, max_count)
}

/// Enumerate subnet ranges for an address given as `u32`
///
/// Each block starts at `parent + i * block_size`, even when that start is
/// not on the block's own size boundary. Fails with
/// [`SubnetError::EnumerationFailure`] when a block would run past
/// `255.255.255.255`, e.g. `200.0.0.0/0`.
pub fn enumerate_from(address: u32, prefix: u8, max_count: u64) -> Result<Vec<SubnetRange>> {
    let layout = SubnetLayout::new(address, prefix)?;
    let host_bits = 32 - prefix;
    let emit_count = layout.total_subnets.min(max_count);

    let mut ranges = Vec::with_capacity(emit_count.min(4096) as usize);
    for i in 0..emit_count {
        let network = u64::from(layout.parent_network) + i * layout.block_size;
        let broadcast = network + layout.block_size - 1;
        if broadcast > u64::from(u32::MAX) {
            return Err(SubnetError::EnumerationFailure(format!(
                "subnet {} of /{} starting at {} exceeds 255.255.255.255",
                i + 1,
                prefix,
                integer_to_address(layout.parent_network)
            )));
        }
        let (network, broadcast) = (network as u32, broadcast as u32);

        let (first, last) = if host_bits > 1 {
            (network + 1, broadcast - 1)
        } else {
            (network, network)
        };

        ranges.push(SubnetRange {
            subnet_number: i + 1,
            network_address: integer_to_address(network),
            broadcast_address: integer_to_address(broadcast),
            first_usable_host: integer_to_address(first),
            last_usable_host: integer_to_address(last),
            usable_hosts: usable_hosts_for(host_bits),
        });
    }

    Ok(ranges)
}
