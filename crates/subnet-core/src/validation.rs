//! Address, prefix and count input validation
//!
//! Strict checks used by the codec, plus real-time feedback for partially
//! typed input. Feedback never fails; it reports what is wrong and how bad it is.

use crate::CalculationMode;
use serde::{Deserialize, Serialize};

/// Smallest legal prefix length
pub const MIN_PREFIX: u8 = 0;
/// Largest legal prefix length
pub const MAX_PREFIX: u8 = 32;
/// Largest desired subnet count accepted from input
pub const MAX_SUBNET_COUNT: u64 = 16_384;
/// Largest desired host count accepted from input
pub const MAX_HOST_COUNT: u64 = 16_777_214;

/// Severity of an [`InputFeedback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// Outcome of validating a piece of user input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFeedback {
    pub is_valid: bool,
    pub message: String,
    pub level: FeedbackLevel,
}

impl InputFeedback {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
            level: FeedbackLevel::Success,
        }
    }

    fn fail(level: FeedbackLevel, message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            level,
        }
    }
}

/// Parse one octet strictly
///
/// Accepts 1-3 ASCII digits with a value of at most 255 and no leading zero
/// (except "0" itself).
pub fn parse_octet(octet: &str) -> Option<u8> {
    if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if octet.len() > 1 && octet.starts_with('0') {
        return None;
    }
    octet.parse::<u8>().ok()
}

/// Check a single octet
///
/// # Examples
///
/// ```
/// use subnet_core::validation::is_valid_octet;
///
/// assert!(is_valid_octet("0"));
/// assert!(is_valid_octet("255"));
/// assert!(!is_valid_octet("256"));
/// assert!(!is_valid_octet("01"));
/// ```
pub fn is_valid_octet(octet: &str) -> bool {
    parse_octet(octet).is_some()
}

/// Check a complete dotted-quad address
pub fn is_valid_address(address: &str) -> bool {
    let octets: Vec<&str> = address.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| is_valid_octet(o))
}

/// Parse a prefix length given as text
pub fn parse_prefix(prefix: &str) -> Option<u8> {
    let value: u8 = prefix.trim().parse().ok()?;
    (MIN_PREFIX..=MAX_PREFIX).contains(&value).then_some(value)
}

/// Check a prefix length given as text
pub fn is_valid_prefix(prefix: &str) -> bool {
    parse_prefix(prefix).is_some()
}

fn check_octets(address: &str) -> Option<InputFeedback> {
    let octets: Vec<&str> = address.split('.').collect();
    if octets.len() < 4 {
        return Some(InputFeedback::fail(
            FeedbackLevel::Info,
            format!("Enter all 4 octets ({}/4)", octets.len()),
        ));
    }
    if octets.len() > 4 {
        return Some(InputFeedback::fail(
            FeedbackLevel::Error,
            "Too many octets (max 4)",
        ));
    }
    for (i, octet) in octets.iter().enumerate() {
        if octet.is_empty() {
            return Some(InputFeedback::fail(
                FeedbackLevel::Error,
                format!("Octet {} is empty", i + 1),
            ));
        }
        if !is_valid_octet(octet) {
            return Some(InputFeedback::fail(
                FeedbackLevel::Error,
                format!("Octet {} must be 0-255", i + 1),
            ));
        }
    }
    None
}

/// Validate address input as it is typed
///
/// Manual mode expects `IP/CIDR`; the other modes take a bare address and
/// ignore anything after a `/`.
///
/// # Examples
///
/// ```
/// use subnet_core::CalculationMode;
/// use subnet_core::validation::{validate_address_input, FeedbackLevel};
///
/// let feedback = validate_address_input("192.168", CalculationMode::Manual);
/// assert!(!feedback.is_valid);
///
/// let feedback = validate_address_input("10.0.0.0/16", CalculationMode::Manual);
/// assert_eq!(feedback.level, FeedbackLevel::Success);
/// ```
pub fn validate_address_input(input: &str, mode: CalculationMode) -> InputFeedback {
    if input.trim().is_empty() {
        return InputFeedback::fail(FeedbackLevel::Info, "IP address is required");
    }

    match mode {
        CalculationMode::Manual => {
            let Some((address, prefix)) = input.split_once('/') else {
                return InputFeedback::fail(
                    FeedbackLevel::Warning,
                    "Format: IP/CIDR (e.g., 192.168.1.0/24)",
                );
            };
            if address.is_empty() {
                return InputFeedback::fail(
                    FeedbackLevel::Error,
                    "IP address is required before /",
                );
            }
            if let Some(feedback) = check_octets(address) {
                return feedback;
            }
            if prefix.is_empty() {
                return InputFeedback::fail(
                    FeedbackLevel::Warning,
                    "CIDR prefix is required after /",
                );
            }
            if !is_valid_prefix(prefix) {
                return InputFeedback::fail(FeedbackLevel::Error, "CIDR must be 0-32");
            }
            InputFeedback::ok("Valid IP/CIDR notation")
        }
        CalculationMode::Subnets | CalculationMode::Hosts => {
            let address = input.split('/').next().unwrap_or_default();
            if let Some(feedback) = check_octets(address) {
                return feedback;
            }
            InputFeedback::ok("Valid IP address")
        }
    }
}

fn validate_count(input: &str, what: &str, max: u64, over_max: &str) -> Result<u64, InputFeedback> {
    if input.trim().is_empty() {
        return Err(InputFeedback::fail(
            FeedbackLevel::Info,
            format!("Number of {} required", what),
        ));
    }
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| InputFeedback::fail(FeedbackLevel::Error, "Must be a valid number"))?;
    if value < 1 {
        return Err(InputFeedback::fail(FeedbackLevel::Error, "Must be at least 1"));
    }
    let value = value as u64;
    if value > max {
        return Err(InputFeedback::fail(FeedbackLevel::Warning, over_max));
    }
    Ok(value)
}

/// Validate a desired subnet count
pub fn validate_subnet_count_input(input: &str) -> InputFeedback {
    match validate_count(input, "subnets", MAX_SUBNET_COUNT, "Maximum 16,384 subnets") {
        Ok(n) => InputFeedback::ok(format!(
            "{} subnet{} will be calculated",
            n,
            if n > 1 { "s" } else { "" }
        )),
        Err(feedback) => feedback,
    }
}

/// Validate a desired host count
pub fn validate_host_count_input(input: &str) -> InputFeedback {
    match validate_count(input, "hosts", MAX_HOST_COUNT, "Maximum ~16.7M hosts") {
        Ok(n) => InputFeedback::ok(format!(
            "Network for {} host{} will be calculated",
            n,
            if n > 1 { "s" } else { "" }
        )),
        Err(feedback) => feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octet_validation() {
        assert!(is_valid_octet("0"));
        assert!(is_valid_octet("10"));
        assert!(is_valid_octet("255"));

        assert!(!is_valid_octet(""));
        assert!(!is_valid_octet("256"));
        assert!(!is_valid_octet("00"));
        assert!(!is_valid_octet("010"));
        assert!(!is_valid_octet("+1"));
        assert!(!is_valid_octet("-1"));
        assert!(!is_valid_octet("1a"));
        assert!(!is_valid_octet("1000"));
    }

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address("192.168.1.1"));
        assert!(is_valid_address("0.0.0.0"));
        assert!(!is_valid_address("192.168.1"));
        assert!(!is_valid_address("192.168.1.1.1"));
        assert!(!is_valid_address("192.168.01.1"));
        assert!(!is_valid_address("10.0.0.256"));
    }

    #[test]
    fn test_prefix_validation() {
        assert_eq!(parse_prefix("0"), Some(0));
        assert_eq!(parse_prefix("32"), Some(32));
        assert_eq!(parse_prefix("33"), None);
        assert_eq!(parse_prefix("-1"), None);
        assert_eq!(parse_prefix("abc"), None);
    }

    #[test]
    fn test_manual_input_feedback() {
        let empty = validate_address_input("  ", CalculationMode::Manual);
        assert_eq!(empty.level, FeedbackLevel::Info);

        let no_slash = validate_address_input("10.0.0.0", CalculationMode::Manual);
        assert_eq!(no_slash.level, FeedbackLevel::Warning);

        let no_ip = validate_address_input("/24", CalculationMode::Manual);
        assert_eq!(no_ip.message, "IP address is required before /");

        let partial = validate_address_input("10.0/24", CalculationMode::Manual);
        assert_eq!(partial.message, "Enter all 4 octets (2/4)");

        let too_many = validate_address_input("1.2.3.4.5/24", CalculationMode::Manual);
        assert_eq!(too_many.message, "Too many octets (max 4)");

        let empty_octet = validate_address_input("10..0.0/24", CalculationMode::Manual);
        assert_eq!(empty_octet.message, "Octet 2 is empty");

        let bad_octet = validate_address_input("10.0.0.300/24", CalculationMode::Manual);
        assert_eq!(bad_octet.message, "Octet 4 must be 0-255");

        let no_prefix = validate_address_input("10.0.0.0/", CalculationMode::Manual);
        assert_eq!(no_prefix.message, "CIDR prefix is required after /");

        let bad_prefix = validate_address_input("10.0.0.0/40", CalculationMode::Manual);
        assert_eq!(bad_prefix.message, "CIDR must be 0-32");

        let good = validate_address_input("10.0.0.0/16", CalculationMode::Manual);
        assert!(good.is_valid);
    }

    #[test]
    fn test_derived_mode_ignores_prefix() {
        let feedback = validate_address_input("10.0.0.0/99", CalculationMode::Subnets);
        assert!(feedback.is_valid);
        assert_eq!(feedback.message, "Valid IP address");
    }

    #[test]
    fn test_subnet_count_feedback() {
        assert_eq!(validate_subnet_count_input("").level, FeedbackLevel::Info);
        assert_eq!(validate_subnet_count_input("x").message, "Must be a valid number");
        assert_eq!(validate_subnet_count_input("0").message, "Must be at least 1");
        assert_eq!(validate_subnet_count_input("20000").level, FeedbackLevel::Warning);
        assert_eq!(
            validate_subnet_count_input("1").message,
            "1 subnet will be calculated"
        );
        assert_eq!(
            validate_subnet_count_input("4").message,
            "4 subnets will be calculated"
        );
    }

    #[test]
    fn test_host_count_feedback() {
        assert_eq!(
            validate_host_count_input("16777215").message,
            "Maximum ~16.7M hosts"
        );
        assert_eq!(
            validate_host_count_input("50").message,
            "Network for 50 hosts will be calculated"
        );
    }
}
