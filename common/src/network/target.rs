//! # Scan Target Validation
//!
//! Decides whether a user supplied string may be handed to the external scan tool.
//!
//! A target is accepted when it is either:
//! * An IPv4 address inside one of the [`ALLOWED_NETWORKS`](super::range::ALLOWED_NETWORKS).
//! * A locally resolvable hostname: `localhost`, `<label>.local`, `<label>.internal`
//!   or a bare single label such as `redis` or `db-01`.
//!
//! Everything else is denied with a human readable reason. Validation is a pure,
//! total function: no input can make it fail or panic.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use thiserror::Error;

use crate::network::range;

pub const MAX_TARGET_LEN: usize = 255;

/// Shell metacharacters that are never allowed to reach the scan tool.
pub const FORBIDDEN_CHARS: [char; 5] = [';', '&', '|', '`', '$'];

/// Shapes of hostnames that resolve inside the private network.
pub const HOSTNAME_PATTERNS: [&str; 4] = [
    r"^localhost$",
    r"^[\w\-]+\.local$",
    r"^[\w\-]+\.internal$",
    r"^[\w\-]+$",
];

static HOSTNAME_REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();

fn hostname_regexes() -> &'static [Regex] {
    HOSTNAME_REGEXES.get_or_init(|| {
        HOSTNAME_PATTERNS
            .iter()
            .filter_map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .collect()
    })
}

/// Why a target was denied.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
pub enum TargetError {
    #[error("Target cannot be empty")]
    Empty,
    #[error("Target name too long")]
    TooLong,
    #[error("Invalid characters in target")]
    InvalidCharacters,
    #[error("Scanning of external IP addresses is not allowed")]
    ExternalAddress,
    #[error("Invalid hostname format or external hostname not allowed")]
    InvalidHostname,
}

/// The allow/deny decision for a single target.
///
/// `reason` is only populated when `allowed` is `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn denied(error: TargetError) -> Self {
        Self {
            allowed: false,
            reason: Some(error.to_string()),
        }
    }
}

impl From<Result<ValidatedTarget, TargetError>> for ValidationResult {
    fn from(result: Result<ValidatedTarget, TargetError>) -> Self {
        match result {
            Ok(_) => ValidationResult::allowed(),
            Err(error) => ValidationResult::denied(error),
        }
    }
}

/// What kind of target passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Address(Ipv4Addr),
    Hostname,
}

/// A trimmed target that passed validation.
///
/// The only way to obtain one is through [`check`] (or [`FromStr`]), so code that
/// receives a `ValidatedTarget` never needs to validate again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTarget {
    value: String,
    kind: TargetKind,
}

impl ValidatedTarget {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

impl fmt::Display for ValidatedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for ValidatedTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check(s)
    }
}

/// Validates a scan target and reports the decision.
///
/// # Examples
/// ```
/// use hostwatch_common::network::target::validate;
///
/// assert!(validate("192.168.1.1").allowed);
/// assert_eq!(
///     validate("8.8.8.8").reason.as_deref(),
///     Some("Scanning of external IP addresses is not allowed")
/// );
/// ```
pub fn validate(target: &str) -> ValidationResult {
    check(target).into()
}

/// Validates a scan target, returning the trimmed target on success.
///
/// Order matters for the reported reason:
/// 1. emptiness, 2. length (on the trimmed input), 3. shell metacharacters,
/// 4. IPv4 allow list, 5. hostname shapes.
///
/// Input that is nothing but padding is reported as too long when the raw
/// input exceeds the limit, and as empty otherwise.
pub fn check(target: &str) -> Result<ValidatedTarget, TargetError> {
    let trimmed: &str = target.trim_matches(is_padding);
    if trimmed.is_empty() {
        return Err(if target.chars().count() > MAX_TARGET_LEN {
            TargetError::TooLong
        } else {
            TargetError::Empty
        });
    }

    if trimmed.chars().count() > MAX_TARGET_LEN {
        return Err(TargetError::TooLong);
    }

    let target = trimmed;
    if target.contains(FORBIDDEN_CHARS) {
        return Err(TargetError::InvalidCharacters);
    }

    if let Some(kind) = parse_address(target)? {
        return Ok(ValidatedTarget {
            value: target.to_string(),
            kind,
        });
    }

    if hostname_regexes().iter().any(|re| re.is_match(target)) {
        return Ok(ValidatedTarget {
            value: target.to_string(),
            kind: TargetKind::Hostname,
        });
    }

    Err(TargetError::InvalidHostname)
}

/// Whitespace plus the ASCII separators U+001C..=U+001F.
fn is_padding(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Parses a dotted-quad IPv4 address and applies the allow list.
///
/// Returns `Ok(None)` when `s` is not an IPv4 address at all.
fn parse_address(s: &str) -> Result<Option<TargetKind>, TargetError> {
    let Ok(addr) = s.parse::<Ipv4Addr>() else {
        return Ok(None);
    };

    if range::is_allowed(addr) {
        Ok(Some(TargetKind::Address(addr)))
    } else {
        Err(TargetError::ExternalAddress)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
