// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Best-effort discovery of label printers registered with the spooler.
//
// Discovery asks the spooler for every registered printer and keeps the names
// containing one of the configured vendor markers. If that fails or finds
// nothing, a fixed list of well-known models is offered instead. Enumeration
// never returns an error: the worst case is an empty list.

use spoolwerk_bridge::PrintSpooler;
use spoolwerk_core::config::SpoolConfig;
use spoolwerk_core::error::Result;
use spoolwerk_core::identifier::DeviceIdentifier;
use spoolwerk_core::types::DeviceDescriptor;
use tracing::{debug, error, info};

/// Lists candidate printers through a spooler.
pub struct DeviceEnumerator<'a, S: PrintSpooler + ?Sized> {
    spooler: &'a S,
    config: &'a SpoolConfig,
}

impl<'a, S: PrintSpooler + ?Sized> DeviceEnumerator<'a, S> {
    pub fn new(spooler: &'a S, config: &'a SpoolConfig) -> Self {
        Self { spooler, config }
    }

    /// Discovered candidates, or the fallback list when there are none.
    pub fn list_available_devices(&self) -> Vec<DeviceDescriptor> {
        let devices = match self.try_discover() {
            Some(found) => Ok(found),
            None => self.fallback(),
        };

        match devices {
            Ok(devices) => devices,
            Err(e) => {
                error!(error = %e, "error listing spooler printers");
                Vec::new()
            }
        }
    }

    /// Registered printers matching a vendor marker, in registry order.
    ///
    /// `None` when the spooler could not be queried or nothing matched.
    pub fn try_discover(&self) -> Option<Vec<DeviceDescriptor>> {
        let names = match self.spooler.registered_printers() {
            Ok(names) => names,
            Err(e) => {
                debug!(error = %e, "could not enumerate printers from registry");
                return None;
            }
        };

        let found = filter_candidates(names, &self.config.vendor_markers);
        if found.is_empty() {
            None
        } else {
            info!(count = found.len(), "label printers discovered");
            Some(found)
        }
    }

    /// The configured well-known models, each with the scheme prefix.
    ///
    /// Fails if a configured name is empty.
    pub fn fallback(&self) -> Result<Vec<DeviceDescriptor>> {
        debug!("no printers discovered, offering common model names");
        self.config
            .fallback_models
            .iter()
            .map(|name| -> Result<DeviceDescriptor> {
                let id = DeviceIdentifier::parse(name)?;
                Ok(DeviceDescriptor::new(id.to_string()))
            })
            .collect()
    }
}

/// Keep the names containing any of `markers` (case-sensitive).
pub fn filter_candidates<I>(names: I, markers: &[String]) -> Vec<DeviceDescriptor>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .filter(|name| markers.iter().any(|m| name.contains(m.as_str())))
        .map(|name| DeviceDescriptor::new(DeviceIdentifier::with_scheme(&name)))
        .collect()
}

/// Convenience wrapper around [`DeviceEnumerator::list_available_devices`].
pub fn list_available_devices<S: PrintSpooler + ?Sized>(
    spooler: &S,
    config: &SpoolConfig,
) -> Vec<DeviceDescriptor> {
    DeviceEnumerator::new(spooler, config).list_available_devices()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spoolwerk_bridge::{MemorySpooler, SpoolStep};

    fn identifiers(devices: &[DeviceDescriptor]) -> Vec<&str> {
        devices.iter().map(|d| d.identifier.as_str()).collect()
    }

    #[test]
    fn registry_failure_falls_back_to_common_models() {
        let spooler = MemorySpooler::new();
        spooler.fail(SpoolStep::Registry);

        let devices = list_available_devices(&spooler, &SpoolConfig::default());
        assert_eq!(
            identifiers(&devices),
            vec![
                "local://Brother QL-500",
                "local://Brother QL-550",
                "local://Brother QL-600",
                "local://Brother QL-700",
            ]
        );
        assert!(devices.iter().all(|d| d.instance.is_none()));
    }

    #[test]
    fn only_matching_printers_are_returned() {
        let spooler = MemorySpooler::with_printers(["HP LaserJet", "Brother QL-600"]);
        let devices = list_available_devices(&spooler, &SpoolConfig::default());
        assert_eq!(
            devices,
            vec![DeviceDescriptor {
                identifier: "local://Brother QL-600".into(),
                instance: None,
            }]
        );
    }

    #[test]
    fn registry_order_is_preserved() {
        let spooler =
            MemorySpooler::with_printers(["QL-820NWB", "Canon", "Brother PT-P700", "brother ql"]);
        let devices = list_available_devices(&spooler, &SpoolConfig::default());
        assert_eq!(
            identifiers(&devices),
            vec!["local://QL-820NWB", "local://Brother PT-P700"]
        );
    }

    #[test]
    fn no_match_falls_back() {
        let spooler = MemorySpooler::with_printers(["HP LaserJet", "Microsoft Print to PDF"]);
        let config = SpoolConfig::default();
        let enumerator = DeviceEnumerator::new(&spooler, &config);
        assert!(enumerator.try_discover().is_none());
        assert_eq!(enumerator.list_available_devices().len(), 4);
    }

    #[test]
    fn bad_fallback_config_yields_empty_list() {
        let spooler = MemorySpooler::new();
        let config = SpoolConfig {
            fallback_models: vec!["Brother QL-500".into(), String::new()],
            ..SpoolConfig::default()
        };
        assert!(list_available_devices(&spooler, &config).is_empty());
    }

    #[test]
    fn markers_are_case_sensitive() {
        let markers = vec!["QL".to_string()];
        let found = filter_candidates(vec!["ql-500".to_string(), "QL-500".to_string()], &markers);
        assert_eq!(identifiers(&found), vec!["local://QL-500"]);
    }
}
