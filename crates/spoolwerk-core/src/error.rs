// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Spoolwerk.

use thiserror::Error;

/// Top-level error type for all Spoolwerk operations.
#[derive(Debug, Error)]
pub enum SpoolError {
    // -- Identifier errors --
    #[error("unsupported device identifier: {0}")]
    UnsupportedIdentifier(String),

    #[error("invalid device name in identifier {0:?}")]
    InvalidDeviceName(String),

    // -- Session errors --
    #[error("could not open printer \"{device}\": {detail}")]
    DeviceUnreachable { device: String, detail: String },

    // -- Job transport errors --
    #[error("starting a document on \"{device}\" failed: {detail}")]
    JobStartFailed { device: String, detail: String },

    #[error("starting a page on \"{device}\" failed: {detail}")]
    PageStartFailed { device: String, detail: String },

    #[error("write to \"{device}\" incomplete: {written} of {requested} bytes accepted ({detail})")]
    WriteIncomplete {
        device: String,
        written: usize,
        requested: usize,
        detail: String,
    },

    // -- Payload errors --
    #[error("character {ch:?} at position {position} has no single-byte encoding")]
    UnencodableText { ch: char, position: usize },

    // -- Platform bridge --
    #[error("print spooler error: {0}")]
    Spooler(String),

    #[error("print spooler not available on this platform")]
    PlatformUnavailable,

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SpoolError {
    /// Name of the device the error concerns, if it is a session or job error.
    pub fn device(&self) -> Option<&str> {
        match self {
            Self::DeviceUnreachable { device, .. }
            | Self::JobStartFailed { device, .. }
            | Self::PageStartFailed { device, .. }
            | Self::WriteIncomplete { device, .. } => Some(device),
            _ => None,
        }
    }

    /// Whether this error failed a single write call while leaving the
    /// session usable for another attempt.
    pub fn is_job_failure(&self) -> bool {
        matches!(
            self,
            Self::JobStartFailed { .. } | Self::PageStartFailed { .. } | Self::WriteIncomplete { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_incomplete_reports_both_counts() {
        let err = SpoolError::WriteIncomplete {
            device: "Brother QL-700".into(),
            written: 40,
            requested: 100,
            detail: "short write".into(),
        };
        let text = err.to_string();
        assert!(text.contains("40 of 100"));
        assert!(text.contains("Brother QL-700"));
        assert_eq!(err.device(), Some("Brother QL-700"));
        assert!(err.is_job_failure());
    }

    #[test]
    fn unreachable_is_not_a_job_failure() {
        let err = SpoolError::DeviceUnreachable {
            device: "Brother QL-500".into(),
            detail: "access denied".into(),
        };
        assert!(!err.is_job_failure());
        assert!(err.to_string().contains("access denied"));
    }
}
