use std::sync::Arc;
use subnet_calc::{compute_subnet_info, enumerate_subnet_ranges, SubnetCalculator};
use subnet_cidr::{address_to_integer, binary_breakdown, octet_to_binary8};
use subnet_core::{IpClass, RangeListing, SubnetError};

#[test]
fn test_class_a_slash_16_with_ranges() {
    let info = compute_subnet_info("10.0.0.0", 16, true, 100).expect("valid input");

    assert_eq!(info.network_address, "10.0.0.0");
    assert_eq!(info.broadcast_address, "10.0.255.255");
    assert_eq!(info.subnet_mask, "255.255.0.0");
    assert_eq!(info.total_hosts, 65536);
    assert_eq!(info.usable_hosts, 65534);
    assert_eq!(info.ip_class, IpClass::A);
    assert_eq!(info.bits_used_for_subnetting, 8);
    assert_eq!(info.number_of_subnets, 256);

    let ranges = info.subnet_ranges.ranges().expect("ranges listed");
    assert_eq!(ranges.len(), 100);
    assert_eq!(ranges[99].network_address, "10.99.0.0");
}

#[test]
fn test_class_c_default_prefix() {
    let info = compute_subnet_info("192.168.1.0", 24, false, 0).expect("valid input");

    assert_eq!(info.network_address, "192.168.1.0");
    assert_eq!(info.broadcast_address, "192.168.1.255");
    assert_eq!(info.usable_hosts, 254);
    assert_eq!(info.ip_class, IpClass::C);
    assert_eq!(info.bits_used_for_subnetting, 0);
    assert_eq!(info.number_of_subnets, 1);
    assert_eq!(info.subnet_ranges, RangeListing::NotRequested);
}

#[test]
fn test_class_b_slash_18_yields_four_subnets() {
    let info = compute_subnet_info("172.16.0.0", 18, true, 10).expect("valid input");
    assert_eq!(info.number_of_subnets, 4);
    assert_eq!(info.bits_used_for_subnetting, 2);

    let ranges = enumerate_subnet_ranges("172.16.0.0", 18, 10).expect("valid input");
    assert_eq!(ranges.len(), 4);
    assert_eq!(ranges[0].network_address, "172.16.0.0");
    assert_eq!(ranges[1].network_address, "172.16.64.0");
    assert_eq!(ranges[3].broadcast_address, "172.16.255.255");
    assert_eq!(info.subnet_ranges.ranges(), Some(ranges.as_slice()));
}

#[test]
fn test_host_route() {
    let info = compute_subnet_info("10.0.0.0", 32, false, 0).expect("valid input");
    assert_eq!(info.network_address, "10.0.0.0");
    assert_eq!(info.broadcast_address, "10.0.0.0");
    assert_eq!(info.total_hosts, 1);
    assert_eq!(info.usable_hosts, 1);
}

#[test]
fn test_out_of_range_octet() {
    let err = compute_subnet_info("10.0.0.256", 24, true, 10).unwrap_err();
    assert!(matches!(err, SubnetError::InvalidAddress(_)));
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_subtraction_method_for_200() {
    assert_eq!(octet_to_binary8(200), "11001000");
    assert_eq!(binary_breakdown(200).powers, vec![128, 64, 8]);
}

#[test]
fn test_ranges_follow_parent_plus_block_offsets() {
    let ranges = enumerate_subnet_ranges("10.200.3.4", 20, 40).expect("valid input");
    assert_eq!(ranges.len(), 40);

    let parent = address_to_integer("10.0.0.0").unwrap();
    let mut previous_broadcast = None;
    for (i, range) in ranges.iter().enumerate() {
        let network = address_to_integer(&range.network_address).unwrap();
        assert_eq!(network, parent + (i as u32) * 4096);
        if let Some(prev) = previous_broadcast {
            assert_eq!(network, prev + 1);
        }
        previous_broadcast = Some(address_to_integer(&range.broadcast_address).unwrap());
    }
}

#[test]
fn test_cache_evicts_first_key_after_51_inserts() {
    let mut calc = SubnetCalculator::new().expect("default config");
    let first = calc.calculate("10.1.0.0", 16, false, 0).expect("valid input");
    for n in 2..=51 {
        calc.calculate(&format!("10.{}.0.0", n), 16, false, 0)
            .expect("valid input");
    }
    assert_eq!(calc.cache_stats().size, 50);

    let misses_before = calc.cache_stats().misses;
    let recomputed = calc.calculate("10.1.0.0", 16, false, 0).expect("valid input");
    assert_eq!(calc.cache_stats().misses, misses_before + 1);
    assert!(!Arc::ptr_eq(&first, &recomputed));
}

#[test]
fn test_json_shape_of_range_listing() {
    let listed = compute_subnet_info("172.16.0.0", 18, true, 2).expect("valid input");
    let value = serde_json::to_value(&listed).expect("serializable");
    assert_eq!(value["ip_class"], "B");
    assert_eq!(value["subnet_ranges"]["status"], "listed");
    assert_eq!(value["subnet_ranges"]["ranges"][1]["network_address"], "172.16.64.0");

    let omitted = compute_subnet_info("200.0.0.0", 0, true, 2).expect("valid input");
    let value = serde_json::to_value(&omitted).expect("serializable");
    assert_eq!(value["subnet_ranges"]["status"], "omitted");
    assert!(value["subnet_ranges"]["reason"].is_string());

    let plain = compute_subnet_info("172.16.0.0", 18, false, 0).expect("valid input");
    let value = serde_json::to_value(&plain).expect("serializable");
    assert_eq!(value["subnet_ranges"], serde_json::json!({ "status": "not_requested" }));
}
