//! CSV and JSON export of a calculation result

use anyhow::Result;
use csv::WriterBuilder;
use subnet_core::SubnetInfo;

/// File extension of an export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Flatten a result into field/value rows followed by one row per subnet
pub fn export_csv(info: &SubnetInfo) -> Result<String> {
    // Rows have different widths: two-column summary, five-column ranges
    let mut writer = WriterBuilder::new().flexible(true).from_writer(vec![]);

    writer.write_record(["Field", "Value"])?;

    let summary = [
        ("Network Address", info.network_address.clone()),
        ("Broadcast Address", info.broadcast_address.clone()),
        ("First Usable Host", info.first_usable_host.clone()),
        ("Last Usable Host", info.last_usable_host.clone()),
        ("Total Hosts", info.total_hosts.to_string()),
        ("Usable Hosts", info.usable_hosts.to_string()),
        ("Subnet Mask", info.subnet_mask.clone()),
        ("Wildcard Mask", info.wildcard_mask.clone()),
        ("CIDR Notation", format!("/{}", info.cidr)),
        ("IP Class", info.ip_class.to_string()),
        ("Number of Subnets", info.number_of_subnets.to_string()),
    ];
    for (field, value) in &summary {
        writer.write_record([*field, value.as_str()])?;
    }

    writer.write_record(std::iter::empty::<&str>())?;
    writer.write_record(["Subnet Ranges:"])?;
    writer.write_record(["Subnet", "Network", "First Host", "Last Host", "Broadcast"])?;

    for range in info.subnet_ranges.ranges().unwrap_or_default() {
        writer.write_record([
            range.subnet_number.to_string().as_str(),
            range.network_address.as_str(),
            range.first_usable_host.as_str(),
            range.last_usable_host.as_str(),
            range.broadcast_address.as_str(),
        ])?;
    }

    let csv_data = String::from_utf8(writer.into_inner()?)?;
    Ok(csv_data)
}

/// Dump the whole record as JSON
pub fn export_json(info: &SubnetInfo, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(info)?
    } else {
        serde_json::to_string(info)?
    };
    Ok(json)
}

/// Export file name, e.g. `subnet-10-0-0-0.csv`
pub fn export_file_name(info: &SubnetInfo, format: ExportFormat) -> String {
    format!(
        "subnet-{}.{}",
        info.network_address.replace('.', "-"),
        format.extension()
    )
}
