use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use subnet_cache::history::{format_relative, HistoryEntry, HistoryStore};
use subnet_calc::{PrefixSource, SubnetCalculator};
use subnet_cidr::binary_breakdown;
use subnet_core::config::CalculatorConfig;
use subnet_core::validation::{validate_host_count_input, validate_subnet_count_input};
use subnet_core::{IpClass, RangeListing, SubnetInfo};

mod batch;
mod export;
mod logging;

use batch::{read_inputs, split_cidr, BatchProcessor};
use export::{export_csv, export_file_name, export_json, ExportFormat};

/// IPv4 subnet calculator
#[derive(Parser)]
#[command(name = "subnetcalc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate subnet info for IP/CIDR
    Calc(CalcArgs),
    /// Calculate the prefix that yields at least COUNT subnets
    Subnets(CountArgs),
    /// Calculate the prefix that fits at least COUNT hosts per subnet
    Hosts(CountArgs),
    /// Show the classful address class of an IP
    Classify(ClassifyArgs),
    /// Show the binary subtraction breakdown of an octet
    Binary(BinaryArgs),
    /// Calculate many IP/CIDR lines from a file or stdin
    Batch(BatchArgs),
    /// Write a CSV or JSON export file
    Export(ExportArgs),
}

#[derive(Args)]
struct RangeArgs {
    /// List the subnets of the classful parent network
    #[arg(short, long)]
    ranges: bool,

    /// Maximum number of subnets listed
    #[arg(short, long, value_name = "N")]
    max_ranges: Option<u64>,
}

#[derive(Parser)]
struct CalcArgs {
    /// Address with prefix, e.g. 10.0.0.0/16
    #[arg(value_name = "IP/CIDR")]
    target: String,

    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Parser)]
struct CountArgs {
    /// Base IP address
    #[arg(value_name = "IP")]
    address: String,

    /// Desired count
    #[arg(value_name = "COUNT")]
    count: u64,

    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Parser)]
struct ClassifyArgs {
    #[arg(value_name = "IP")]
    address: String,
}

#[derive(Parser)]
struct BinaryArgs {
    /// Decimal value 0-255
    #[arg(value_name = "OCTET")]
    value: u8,
}

#[derive(Parser)]
struct BatchArgs {
    /// Input file (use '-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Show recent calculation history after the batch
    #[arg(long)]
    history: bool,

    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Parser)]
struct ExportArgs {
    /// Address with prefix, e.g. 10.0.0.0/16
    #[arg(value_name = "IP/CIDR")]
    target: String,

    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportKind,

    /// Directory the file is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Maximum number of subnets listed
    #[arg(short, long, value_name = "N")]
    max_ranges: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output
    Csv,
}

#[derive(Debug, Clone, ValueEnum)]
enum ExportKind {
    Csv,
    Json,
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Csv => ExportFormat::Csv,
            ExportKind::Json => ExportFormat::Json,
        }
    }
}

#[derive(Serialize)]
struct ClassResult {
    address: String,
    class: IpClass,
    range: &'static str,
    default_mask: &'static str,
    description: &'static str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config = CalculatorConfig::from_env()?;
    let mut calc = SubnetCalculator::with_config(config)?;

    match cli.command {
        Commands::Calc(args) => handle_calc(&mut calc, args, &cli.output)?,
        Commands::Subnets(args) => {
            let source = PrefixSource::SubnetCount(args.count);
            handle_count(&mut calc, args, source, &cli.output)?
        }
        Commands::Hosts(args) => {
            let source = PrefixSource::HostCount(args.count);
            handle_count(&mut calc, args, source, &cli.output)?
        }
        Commands::Classify(args) => handle_classify(&calc, args, &cli.output)?,
        Commands::Binary(args) => handle_binary(args, &cli.output)?,
        Commands::Batch(args) => handle_batch(calc, args, &cli.output, cli.verbose)?,
        Commands::Export(args) => handle_export(&mut calc, args, cli.verbose)?,
    }

    Ok(())
}

fn max_ranges(calc: &SubnetCalculator, range: &RangeArgs) -> u64 {
    range.max_ranges.unwrap_or(calc.config().default_max_ranges)
}

fn handle_calc(calc: &mut SubnetCalculator, args: CalcArgs, format: &OutputFormat) -> Result<()> {
    let (address, prefix) = split_cidr(&args.target)?;
    let cap = max_ranges(calc, &args.range);
    let info = calc.calculate(address, prefix, args.range.ranges, cap)?;
    print_info(&info, format)
}

fn handle_count(
    calc: &mut SubnetCalculator,
    args: CountArgs,
    source: PrefixSource,
    format: &OutputFormat,
) -> Result<()> {
    check_count(source)?;
    let address = args.address.split('/').next().unwrap_or_default();
    let cap = max_ranges(calc, &args.range);
    let info = calc.calculate_from(address, source, args.range.ranges, cap)?;
    print_info(&info, format)
}

/// Reject subnet or host counts outside the accepted limits
fn check_count(source: PrefixSource) -> Result<()> {
    let feedback = match source {
        PrefixSource::SubnetCount(count) => validate_subnet_count_input(&count.to_string()),
        PrefixSource::HostCount(count) => validate_host_count_input(&count.to_string()),
        PrefixSource::Prefix(_) => return Ok(()),
    };
    if !feedback.is_valid {
        anyhow::bail!(feedback.message);
    }
    Ok(())
}

fn handle_classify(calc: &SubnetCalculator, args: ClassifyArgs, format: &OutputFormat) -> Result<()> {
    let class = calc.classify(&args.address)?;
    let result = ClassResult {
        address: args.address,
        class,
        range: class.address_range(),
        default_mask: class.default_mask_label(),
        description: class.description(),
    };

    match format {
        OutputFormat::Human => {
            println!();
            println!("{}", format!("Class {}", result.class).bold().cyan());
            println!("{}", "─".repeat(50).dimmed());
            println!("{:>15}: {}", "Address".bold(), result.address);
            println!("{:>15}: {}", "Range".bold(), result.range);
            println!("{:>15}: {}", "Default Mask".bold(), result.default_mask);
            println!("{:>15}: {}", "Description".bold(), result.description);
            println!();
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(&result)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["address", "class", "range", "default_mask", "description"])?;
            wtr.write_record([
                result.address.as_str(),
                result.class.as_str(),
                result.range,
                result.default_mask,
                result.description,
            ])?;
            wtr.flush()?;
        }
    }
    Ok(())
}

fn handle_binary(args: BinaryArgs, format: &OutputFormat) -> Result<()> {
    let breakdown = binary_breakdown(args.value);
    match format {
        OutputFormat::Human => {
            println!(
                "{} = {} = {}",
                args.value.to_string().bold(),
                breakdown.sum.yellow(),
                breakdown.binary.green()
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&breakdown)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(&breakdown)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["value", "sum", "binary"])?;
            wtr.write_record([
                args.value.to_string().as_str(),
                breakdown.sum.as_str(),
                breakdown.binary.as_str(),
            ])?;
            wtr.flush()?;
        }
    }
    Ok(())
}

fn handle_batch(
    calc: SubnetCalculator,
    args: BatchArgs,
    format: &OutputFormat,
    verbose: bool,
) -> Result<()> {
    if verbose {
        match args.file.as_deref() {
            Some(file) if file != "-" => eprintln!("{} Reading from: {}", "›".blue(), file),
            _ => eprintln!("{} Reading from stdin", "›".blue()),
        }
    }

    let inputs = read_inputs(args.file.as_deref())?;
    let cap = max_ranges(&calc, &args.range);
    let mut history = HistoryStore::new(calc.config().history_capacity);
    let mut processor = BatchProcessor::new(calc, args.range.ranges, cap);
    let results = processor.process(&inputs);

    let mut failures = 0usize;
    for item in &results {
        match &item.result {
            Ok(info) => {
                print_info(info, format)?;
                history.record(HistoryEntry::from_info(
                    &item.input,
                    subnet_core::CalculationMode::Manual,
                    info,
                ));
            }
            Err(err) => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red(), item.input, err);
            }
        }
    }

    let stats = processor.cache_stats();
    eprintln!(
        "{} {} processed, {} failed, cache hit rate {:.1}%",
        "›".blue(),
        results.len(),
        failures,
        stats.hit_rate()
    );

    if args.history {
        let now = Utc::now();
        eprintln!("{}", "Recent calculations".bold());
        for item in history.items() {
            eprintln!(
                "  {:<20} {:>18}  {:>10} usable  {}",
                item.address_input,
                format!("{}/{}", item.network_address, item.cidr),
                item.usable_hosts,
                format_relative(item.timestamp, now).dimmed()
            );
        }
    }

    Ok(())
}

fn handle_export(calc: &mut SubnetCalculator, args: ExportArgs, verbose: bool) -> Result<()> {
    let (address, prefix) = split_cidr(&args.target)?;
    let cap = args.max_ranges.unwrap_or(calc.config().default_max_ranges);
    let info = calc.calculate(address, prefix, true, cap)?;

    let format = ExportFormat::from(args.format);
    let content = match format {
        ExportFormat::Csv => export_csv(&info)?,
        ExportFormat::Json => export_json(&info, true)?,
    };

    let path = args.out.join(export_file_name(&info, format));
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    if verbose {
        eprintln!("{} Wrote {}", "›".blue(), path.display());
    }
    println!("{}", path.display());
    Ok(())
}

fn print_info(info: &SubnetInfo, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print_human(info),
        OutputFormat::Json => println!("{}", export_json(info, true)?),
        OutputFormat::JsonCompact => println!("{}", export_json(info, false)?),
        OutputFormat::Csv => print!("{}", export_csv(info)?),
    }
    Ok(())
}

fn print_human(info: &SubnetInfo) {
    println!();
    println!("{}", format!("{}", info).bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
    println!("{:>18}: {}", "Network".bold(), info.network_address.green());
    println!("{:>18}: {}", "Broadcast".bold(), info.broadcast_address.green());
    println!("{:>18}: {}", "First Host".bold(), info.first_usable_host);
    println!("{:>18}: {}", "Last Host".bold(), info.last_usable_host);
    println!("{:>18}: {}", "Total Hosts".bold(), info.total_hosts);
    println!("{:>18}: {}", "Usable Hosts".bold(), info.usable_hosts.to_string().yellow());
    println!("{:>18}: {}", "Subnet Mask".bold(), info.subnet_mask);
    println!("{:>18}: {}", "Mask (binary)".bold(), info.subnet_mask_binary.dimmed());
    println!("{:>18}: {}", "Wildcard Mask".bold(), info.wildcard_mask);
    println!("{:>18}: {}", "IP Class".bold(), info.ip_class_description);
    println!("{:>18}: {}", "Bits Borrowed".bold(), info.bits_used_for_subnetting);
    println!("{:>18}: {}", "Subnets".bold(), info.number_of_subnets);

    match &info.subnet_ranges {
        RangeListing::NotRequested => {}
        RangeListing::Omitted { reason } => {
            println!("{:>18}: {}", "Subnet Ranges".bold(), reason.red());
        }
        RangeListing::Listed { ranges } => {
            println!();
            println!(
                "  {:>6}  {:<16} {:<16} {:<16} {:<16}",
                "#".bold(),
                "Network".bold(),
                "First Host".bold(),
                "Last Host".bold(),
                "Broadcast".bold()
            );
            for range in ranges {
                println!(
                    "  {:>6}  {:<16} {:<16} {:<16} {:<16}",
                    range.subnet_number,
                    range.network_address,
                    range.first_usable_host,
                    range.last_usable_host,
                    range.broadcast_address
                );
            }
            if (ranges.len() as u64) < info.number_of_subnets {
                println!(
                    "  {}",
                    format!("... {} of {} subnets shown", ranges.len(), info.number_of_subnets)
                        .dimmed()
                );
            }
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_limits() {
        assert!(check_count(PrefixSource::SubnetCount(16384)).is_ok());
        let err = check_count(PrefixSource::SubnetCount(16385)).unwrap_err();
        assert_eq!(err.to_string(), "Maximum 16,384 subnets");

        assert!(check_count(PrefixSource::HostCount(16_777_214)).is_ok());
        let err = check_count(PrefixSource::HostCount(16_777_215)).unwrap_err();
        assert_eq!(err.to_string(), "Maximum ~16.7M hosts");

        let err = check_count(PrefixSource::HostCount(0)).unwrap_err();
        assert_eq!(err.to_string(), "Must be at least 1");
        assert!(check_count(PrefixSource::Prefix(24)).is_ok());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["subnetcalc", "calc", "10.0.0.0/16"]);
        assert!(matches!(cli.command, Commands::Calc(_)));
        assert!(matches!(cli.output, OutputFormat::Human));
    }

    #[test]
    fn test_calc_range_flags() {
        let cli = Cli::parse_from(["subnetcalc", "calc", "10.0.0.0/16", "--ranges", "--max-ranges", "10"]);
        if let Commands::Calc(args) = cli.command {
            assert!(args.range.ranges);
            assert_eq!(args.range.max_ranges, Some(10));
        } else {
            panic!("Expected Calc command");
        }
    }

    #[test]
    fn test_output_format_json() {
        let cli = Cli::parse_from(["subnetcalc", "--output", "json", "classify", "10.0.0.1"]);
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_hosts_command() {
        let cli = Cli::parse_from(["subnetcalc", "hosts", "192.168.1.0", "50"]);
        if let Commands::Hosts(args) = cli.command {
            assert_eq!(args.address, "192.168.1.0");
            assert_eq!(args.count, 50);
        } else {
            panic!("Expected Hosts command");
        }
    }

    #[test]
    fn test_batch_command() {
        let cli = Cli::parse_from(["subnetcalc", "batch", "--file", "nets.txt", "--history"]);
        if let Commands::Batch(args) = cli.command {
            assert_eq!(args.file, Some("nets.txt".to_string()));
            assert!(args.history);
        } else {
            panic!("Expected Batch command");
        }
    }

    #[test]
    fn test_binary_rejects_out_of_range() {
        assert!(Cli::try_parse_from(["subnetcalc", "binary", "256"]).is_err());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "subnetcalc",
            "export",
            "172.16.0.0/18",
            "--format",
            "json",
            "--out",
            dir.path().to_str().unwrap(),
        ]);
        let Commands::Export(args) = cli.command else {
            panic!("Expected Export command");
        };

        let mut calc = SubnetCalculator::new().unwrap();
        handle_export(&mut calc, args, false).unwrap();

        let written = std::fs::read_to_string(dir.path().join("subnet-172-16-0-0.json")).unwrap();
        let info: SubnetInfo = serde_json::from_str(&written).unwrap();
        assert_eq!(info.number_of_subnets, 4);
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::parse_from(["subnetcalc", "-v", "binary", "200"]);
        assert!(cli.verbose);
    }
}
