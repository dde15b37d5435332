//! Input validation for operator-provided configuration values.
//!
//! The listening port list arrives as a single comma-separated string on the
//! command line. It is checked in full before any socket is opened.

use regex::Regex;
use std::sync::LazyLock;

/// Validation error with field context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

// One to five digits per group, groups separated by single commas
static PORT_LIST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,5},)*[0-9]{1,5}$").unwrap());

/// Ordered list of ports to listen on, exactly as the operator gave them.
///
/// Duplicates are kept; the second bind on the same port fails at startup
/// and is reported like any other bind failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec(Vec<u16>);

impl PortSpec {
    pub fn ports(&self) -> &[u16] {
        &self.0
    }
}

/// Validate a comma-separated port list and parse it.
///
/// The whole string must match `digits(,digits)*` with 1-5 digits per group.
/// Surrounding whitespace is not tolerated.
///
/// # Errors
///
/// Returns `ValidationError` if the list is malformed or any port is 0 or
/// above 65535. Range errors name the offending token.
pub fn validate_port_list(ports: &str) -> Result<PortSpec, ValidationError> {
    if !PORT_LIST_REGEX.is_match(ports) {
        return Err(ValidationError {
            field: "ports".to_string(),
            message: "Malformed ports option".to_string(),
        });
    }

    ports
        .split(',')
        .map(validate_port_token)
        .collect::<Result<Vec<_>, _>>()
        .map(PortSpec)
}

/// Range-check a single token that already matched the digit grammar.
fn validate_port_token(token: &str) -> Result<u16, ValidationError> {
    // Five digits always fit in a u32
    match token.parse::<u32>() {
        Ok(port @ 1..=65535) => Ok(port as u16),
        _ => Err(ValidationError {
            field: "ports".to_string(),
            message: format!("Port {} not in range", token),
        }),
    }
}
