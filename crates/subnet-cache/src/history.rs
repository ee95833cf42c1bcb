//! Recent calculation history
//!
//! Keeps summaries of the last few calculations, newest first. The store
//! lives in memory only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use subnet_core::{CalculationMode, SubnetInfo};

/// Default number of entries kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Summary of one finished calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// What the user typed, `IP/CIDR` in manual mode or a bare address
    pub address_input: String,
    pub mode: CalculationMode,
    pub network_address: String,
    pub broadcast_address: String,
    pub cidr: u8,
    pub total_hosts: u64,
    pub usable_hosts: u64,
    pub subnet_mask: String,
}

/// History entry before an id and timestamp are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub address_input: String,
    pub mode: CalculationMode,
    pub network_address: String,
    pub broadcast_address: String,
    pub cidr: u8,
    pub total_hosts: u64,
    pub usable_hosts: u64,
    pub subnet_mask: String,
}

impl HistoryEntry {
    /// Summarize a calculation result
    pub fn from_info(address_input: &str, mode: CalculationMode, info: &SubnetInfo) -> Self {
        Self {
            address_input: address_input.to_string(),
            mode,
            network_address: info.network_address.clone(),
            broadcast_address: info.broadcast_address.clone(),
            cidr: info.cidr,
            total_hosts: info.total_hosts,
            usable_hosts: info.usable_hosts,
            subnet_mask: info.subnet_mask.clone(),
        }
    }
}

/// Bounded history, newest entry first
#[derive(Debug)]
pub struct HistoryStore {
    items: VecDeque<HistoryItem>,
    capacity: usize,
    sequence: u64,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            sequence: 0,
        }
    }

    /// Record an entry stamped with the current time
    pub fn record(&mut self, entry: HistoryEntry) -> String {
        self.record_at(entry, Utc::now())
    }

    /// Record an entry with an explicit timestamp, returning its id
    pub fn record_at(&mut self, entry: HistoryEntry, timestamp: DateTime<Utc>) -> String {
        self.sequence += 1;
        let id = format!("{}-{}", timestamp.timestamp_millis(), self.sequence);

        self.items.push_front(HistoryItem {
            id: id.clone(),
            timestamp,
            address_input: entry.address_input,
            mode: entry.mode,
            network_address: entry.network_address,
            broadcast_address: entry.broadcast_address,
            cidr: entry.cidr,
            total_hosts: entry.total_hosts,
            usable_hosts: entry.usable_hosts,
            subnet_mask: entry.subnet_mask,
        });
        self.items.truncate(self.capacity);

        id
    }

    /// Entries, newest first
    pub fn items(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    /// Remove one entry; returns whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Human-friendly age of a timestamp relative to `now`
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use subnet_cache::history::format_relative;
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
/// assert_eq!(format_relative(now - Duration::seconds(30), now), "Just now");
/// assert_eq!(format_relative(now - Duration::minutes(5), now), "5m ago");
/// assert_eq!(format_relative(now - Duration::days(30), now), "2024-04-10");
/// ```
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(timestamp);
    let seconds = age.num_seconds();
    let minutes = age.num_minutes();
    let hours = age.num_hours();
    let days = age.num_days();

    if seconds < 60 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}
