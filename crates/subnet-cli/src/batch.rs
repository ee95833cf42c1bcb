//! Batch calculation over many `IP/CIDR` inputs
//!
//! Every line runs through one cached calculator, so repeated inputs are
//! served from the cache. A bad line is reported on its own and does not
//! stop the batch.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead};
use std::sync::Arc;
use subnet_cache::CacheStats;
use subnet_calc::SubnetCalculator;
use subnet_core::validation::parse_prefix;
use subnet_core::{SubnetError, SubnetInfo};
use tracing::debug;

/// Outcome of one batch line
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub input: String,
    pub result: Result<Arc<SubnetInfo>, String>,
}

/// Sequential batch processor sharing one result cache
pub struct BatchProcessor {
    calculator: SubnetCalculator,
    include_ranges: bool,
    max_ranges: u64,
}

impl BatchProcessor {
    /// Create a new batch processor
    ///
    /// # Arguments
    ///
    /// * `calculator` - Calculator whose cache is shared by every line
    /// * `include_ranges` - Whether each result lists its subnets
    /// * `max_ranges` - Range cap per result
    pub fn new(calculator: SubnetCalculator, include_ranges: bool, max_ranges: u64) -> Self {
        Self {
            calculator,
            include_ranges,
            max_ranges,
        }
    }

    /// Process inputs in order
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn process<I, S>(&mut self, inputs: I) -> Vec<BatchResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results = Vec::new();
        for raw in inputs {
            let input = raw.as_ref().trim();
            if input.is_empty() || input.starts_with('#') {
                continue;
            }

            let result = self.calculate_one(input).map_err(|e| e.to_string());
            results.push(BatchResult {
                input: input.to_string(),
                result,
            });

            if results.len() % 1000 == 0 {
                debug!(processed = results.len(), "batch progress");
            }
        }
        results
    }

    fn calculate_one(&mut self, input: &str) -> subnet_core::Result<Arc<SubnetInfo>> {
        let (address, prefix) = split_cidr(input)?;
        self.calculator
            .calculate(address, prefix, self.include_ranges, self.max_ranges)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.calculator.cache_stats()
    }
}

/// Split `IP/CIDR` into address and prefix
///
/// Only the prefix is checked here; the address is validated by the calculator.
pub fn split_cidr(input: &str) -> subnet_core::Result<(&str, u8)> {
    let (address, prefix) = input.trim().split_once('/').ok_or_else(|| {
        SubnetError::InvalidAddress("Please use format: IP/CIDR (e.g., 10.0.0.0/16)".to_string())
    })?;
    let prefix = parse_prefix(prefix)
        .ok_or_else(|| SubnetError::InvalidPrefix("CIDR must be between 0 and 32".to_string()))?;
    Ok((address, prefix))
}

/// Read input lines from a file, or stdin when `file` is `None` or `-`
pub fn read_inputs(file: Option<&str>) -> Result<Vec<String>> {
    match file {
        Some(path) if path != "-" => {
            let content =
                fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
            Ok(content.lines().map(str::to_string).collect())
        }
        _ => {
            let stdin = io::stdin();
            let lines = stdin
                .lock()
                .lines()
                .collect::<io::Result<Vec<_>>>()
                .context("Failed to read stdin")?;
            Ok(lines)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn processor() -> BatchProcessor {
        BatchProcessor::new(SubnetCalculator::new().unwrap(), false, 0)
    }

    #[test]
    fn test_batch_mixed_inputs() {
        let mut batch = processor();
        let results = batch.process(["10.0.0.0/8", "", "# comment", "10.0.0.256/24", "192.168.1.0"]);

        assert_eq!(results.len(), 3);
        assert!(results[0].result.is_ok());
        assert_eq!(
            results[1].result.as_ref().unwrap_err(),
            "IP address octets must be between 0 and 255"
        );
        assert!(results[2].result.is_err());
    }

    #[test]
    fn test_batch_reuses_cache() {
        let mut batch = processor();
        let results = batch.process(["172.16.0.0/18", "172.16.0.0/18"]);

        let first = results[0].result.as_ref().unwrap();
        let second = results[1].result.as_ref().unwrap();
        assert!(Arc::ptr_eq(first, second));

        let stats = batch.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_split_cidr() {
        assert_eq!(split_cidr("10.0.0.0/16").unwrap(), ("10.0.0.0", 16));
        assert!(matches!(split_cidr("10.0.0.0"), Err(SubnetError::InvalidAddress(_))));
        assert!(matches!(split_cidr("10.0.0.0/33"), Err(SubnetError::InvalidPrefix(_))));
        assert!(matches!(split_cidr("10.0.0.0/x"), Err(SubnetError::InvalidPrefix(_))));
    }

    #[test]
    fn test_read_inputs_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "10.0.0.0/16").unwrap();
        writeln!(file, "192.168.1.0/24").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let lines = read_inputs(Some(&path)).unwrap();
        assert_eq!(lines, vec!["10.0.0.0/16", "192.168.1.0/24"]);
    }

    #[test]
    fn test_read_inputs_missing_file() {
        assert!(read_inputs(Some("/nonexistent/subnetcalc-input.txt")).is_err());
    }
}
