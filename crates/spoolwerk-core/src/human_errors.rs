// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people at the label printer.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::SpoolError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Printer busy or briefly offline. Trying again may work.
    Transient,
    /// User must do something (switch the printer on, fix the name).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether sending the same job again could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `SpoolError` into a `HumanError`.
pub fn humanize_error(err: &SpoolError) -> HumanError {
    match err {
        SpoolError::UnsupportedIdentifier(_) | SpoolError::InvalidDeviceName(_) => HumanError {
            message: "That printer name doesn't look right.".into(),
            suggestion: "Use the exact printer name, for example \"local://Brother QL-500\". Run `spoolwerk list` to see candidates.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        SpoolError::DeviceUnreachable { device, .. } => HumanError {
            message: format!("We couldn't reach the printer \"{device}\"."),
            suggestion: "Check that the printer is installed under exactly this name, switched on and connected.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        SpoolError::JobStartFailed { device, .. } | SpoolError::PageStartFailed { device, .. } => {
            HumanError {
                message: format!("The print queue for \"{device}\" refused the label."),
                suggestion: "Open the printer queue, clear any stuck jobs and try again.".into(),
                retriable: true,
                severity: Severity::Transient,
            }
        }

        SpoolError::WriteIncomplete {
            device,
            written,
            requested,
            ..
        } => HumanError {
            message: format!(
                "Only part of the label reached \"{device}\" ({written} of {requested} bytes)."
            ),
            suggestion: "Cancel the half-printed job in the printer queue, then print again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SpoolError::UnencodableText { ch, .. } => HumanError {
            message: format!("The text contains a character ({ch}) the printer can't receive."),
            suggestion: "Remove special symbols or send the label as a rendered file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        SpoolError::Spooler(_) => HumanError {
            message: "The print spooler reported a problem.".into(),
            suggestion: "Restart the print spooler service and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SpoolError::PlatformUnavailable => HumanError {
            message: "Spooler printing isn't available on this system.".into(),
            suggestion: "Run Spoolwerk on Windows, or use --dry-run to test without a printer.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        SpoolError::Config(detail) => HumanError {
            message: "The settings file has a mistake.".into(),
            suggestion: format!("Fix the configuration: {detail}."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        SpoolError::Io(_) => HumanError {
            message: "We couldn't read a file.".into(),
            suggestion: "Check that the file exists and you are allowed to open it.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        SpoolError::Serialization(_) => HumanError {
            message: "The settings file isn't valid JSON.".into(),
            suggestion: "Check the file for typos such as missing quotes or commas.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_names_the_device() {
        let err = SpoolError::DeviceUnreachable {
            device: "Brother QL-700".into(),
            detail: "The printer name is invalid.".into(),
        };
        let human = humanize_error(&err);
        assert!(human.message.contains("Brother QL-700"));
        assert!(human.retriable);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn partial_write_mentions_counts() {
        let err = SpoolError::WriteIncomplete {
            device: "QL".into(),
            written: 10,
            requested: 20,
            detail: String::new(),
        };
        let human = humanize_error(&err);
        assert!(human.message.contains("10 of 20"));
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn bad_identifier_is_not_retriable() {
        let human = humanize_error(&SpoolError::InvalidDeviceName("local://".into()));
        assert!(!human.retriable);
    }
}
