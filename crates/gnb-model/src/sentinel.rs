//! Missing-value sentinels accepted by the NCBI submission portal.

use std::fmt;
use std::str::FromStr;

/// Literal placeholder GISAID uses for unknown values.
pub const UNKNOWN_LITERAL: &str = "unknown";

/// Placeholder written wherever a source value is absent or `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sentinel {
    #[default]
    Missing,
    NotCollected,
    NotApplicable,
}

impl Sentinel {
    /// All accepted sentinels, in CLI display order.
    pub const ALL: [Sentinel; 3] = [Self::Missing, Self::NotCollected, Self::NotApplicable];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::NotCollected => "not collected",
            Self::NotApplicable => "not applicable",
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unsupported sentinel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported missing-value sentinel '{0}' (expected missing, not collected or not applicable)")]
pub struct ParseSentinelError(pub String);

impl FromStr for Sentinel {
    type Err = ParseSentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|sentinel| sentinel.as_str() == normalized)
            .ok_or_else(|| ParseSentinelError(s.to_string()))
    }
}
