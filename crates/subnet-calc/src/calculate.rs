//! Subnet info calculation

use subnet_cidr::{address_to_integer, classify, integer_to_address, mask_to_binary, Cidr};
use subnet_core::{RangeListing, Result, SubnetInfo};
use tracing::warn;

use crate::enumerate::{enumerate_from, SubnetLayout};

/// Compute the full subnet description for an address and prefix
///
/// Address and prefix errors fail the whole call. When `include_ranges` is
/// set but enumeration fails, the result is still returned with the listing
/// marked [`RangeListing::Omitted`].
///
/// # Examples
///
/// ```
/// use subnet_calc::compute_subnet_info;
///
/// let info = compute_subnet_info("192.168.1.0", 24, false, 0).unwrap();
/// assert_eq!(info.broadcast_address, "192.168.1.255");
/// assert_eq!(info.usable_hosts, 254);
/// ```
pub fn compute_subnet_info(
    address: &str,
    prefix: u8,
    include_ranges: bool,
    max_ranges: u64,
) -> Result<SubnetInfo> {
    let ip = address_to_integer(address)?;
    let block = Cidr::new(ip, prefix)?;
    let layout = SubnetLayout::new(ip, prefix)?;
    let ip_class = classify(ip);

    let subnet_ranges = if include_ranges {
        match enumerate_from(ip, prefix, max_ranges) {
            Ok(ranges) => RangeListing::Listed { ranges },
            Err(err) => {
                warn!(address, prefix, error = %err, "subnet ranges omitted");
                RangeListing::Omitted {
                    reason: err.to_string(),
                }
            }
        }
    } else {
        RangeListing::NotRequested
    };

    Ok(SubnetInfo {
        network_address: integer_to_address(block.network()),
        broadcast_address: integer_to_address(block.broadcast()),
        first_usable_host: integer_to_address(block.first_usable()),
        last_usable_host: integer_to_address(block.last_usable()),
        total_hosts: block.size(),
        usable_hosts: block.usable_hosts(),
        subnet_mask: integer_to_address(block.mask()),
        subnet_mask_binary: mask_to_binary(block.mask()),
        wildcard_mask: integer_to_address(block.wildcard()),
        cidr: prefix,
        ip_class,
        ip_class_description: ip_class.description().to_string(),
        number_of_subnets: layout.total_subnets,
        bits_used_for_subnetting: layout.bits_borrowed,
        subnet_ranges,
    })
}
