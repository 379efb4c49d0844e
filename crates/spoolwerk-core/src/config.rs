// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transport configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SpoolError};

/// Document name the spooler shows for every label job.
pub const DEFAULT_DOCUMENT_NAME: &str = "Brother QL Label";

/// Settings for enumeration and job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoolConfig {
    /// Document name submitted when a job starts.
    pub document_name: String,
    /// A registered printer is a candidate if its name contains any of these
    /// (case-sensitive).
    pub vendor_markers: Vec<String>,
    /// Names offered when discovery finds nothing.
    pub fallback_models: Vec<String>,
    /// Open and close the device when a session is created.
    pub validate_on_connect: bool,
}

impl Default for SpoolConfig {
    fn default() -> Self {
        Self {
            document_name: DEFAULT_DOCUMENT_NAME.into(),
            vendor_markers: vec!["Brother".into(), "QL".into()],
            fallback_models: vec![
                "Brother QL-500".into(),
                "Brother QL-550".into(),
                "Brother QL-600".into(),
                "Brother QL-700".into(),
            ],
            validate_on_connect: true,
        }
    }
}

impl SpoolConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                debug!("no configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.document_name.is_empty() {
            return Err(SpoolError::Config("document_name must not be empty".into()));
        }
        Ok(())
    }
}
