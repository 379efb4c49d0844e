// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device identifiers.
//
// A device is addressed as `local://<name>`, where `<name>` is the printer
// name exactly as the spooler registered it. A bare name without the scheme is
// accepted verbatim. Case and whitespace are never touched.

use std::ffi::OsStr;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpoolError};

/// Scheme prefix for printers reachable through the local print spooler.
pub const SCHEME_PREFIX: &str = "local://";

/// A resolved device identifier holding the bare spooler name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceIdentifier {
    name: String,
}

impl DeviceIdentifier {
    /// Resolve a device specifier into its bare name.
    ///
    /// Strips exactly one leading [`SCHEME_PREFIX`]; fails with
    /// [`SpoolError::InvalidDeviceName`] when nothing is left.
    pub fn parse(specifier: &str) -> Result<Self> {
        let name = specifier.strip_prefix(SCHEME_PREFIX).unwrap_or(specifier);
        if name.is_empty() {
            return Err(SpoolError::InvalidDeviceName(specifier.to_owned()));
        }
        Ok(Self {
            name: name.to_owned(),
        })
    }

    /// Resolve a specifier taken from the command line or environment.
    ///
    /// Non-UTF-8 input cannot name a spooler printer and is rejected with
    /// [`SpoolError::UnsupportedIdentifier`].
    pub fn from_os_str(specifier: &OsStr) -> Result<Self> {
        let text = specifier.to_str().ok_or_else(|| {
            SpoolError::UnsupportedIdentifier(format!(
                "{} is not valid UTF-8",
                specifier.to_string_lossy()
            ))
        })?;
        Self::parse(text)
    }

    /// Canonical `local://<name>` form for a bare spooler name.
    pub fn with_scheme(name: &str) -> String {
        format!("{SCHEME_PREFIX}{name}")
    }

    /// The bare device name as registered with the spooler.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME_PREFIX}{}", self.name)
    }
}

impl std::str::FromStr for DeviceIdentifier {
    type Err = SpoolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for DeviceIdentifier {
    type Error = SpoolError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&OsStr> for DeviceIdentifier {
    type Error = SpoolError;

    fn try_from(value: &OsStr) -> Result<Self> {
        Self::from_os_str(value)
    }
}

impl TryFrom<String> for DeviceIdentifier {
    type Error = SpoolError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<&serde_json::Value> for DeviceIdentifier {
    type Error = SpoolError;

    /// Only JSON strings can name a device; numbers, arrays, objects, booleans
    /// and null are rejected before anything else happens.
    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            other => Err(SpoolError::UnsupportedIdentifier(format!(
                "expected a string like \"{SCHEME_PREFIX}Brother QL-500\", got {other}"
            ))),
        }
    }
}

impl From<DeviceIdentifier> for String {
    fn from(id: DeviceIdentifier) -> Self {
        id.to_string()
    }
}
