// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub spooler for platforms without winspool.
//
// Every call returns `PlatformUnavailable`. The real implementation lives in
// the `winspool` module.

use spoolwerk_core::error::{Result, SpoolError};
use spoolwerk_core::types::DocInfo;

use crate::traits::{PrintSpooler, SpoolHandle, TransferFault};

/// No-op spooler returned on non-Windows platforms.
pub struct StubSpooler;

impl PrintSpooler for StubSpooler {
    fn registered_printers(&self) -> Result<Vec<String>> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn open_printer(&self, name: &str) -> Result<SpoolHandle> {
        tracing::warn!(printer = name, "PrintSpooler::open_printer called on stub spooler");
        Err(SpoolError::PlatformUnavailable)
    }

    fn close_printer(&self, _handle: SpoolHandle) -> Result<()> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn start_doc(&self, _handle: &SpoolHandle, _doc: &DocInfo) -> Result<u32> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn start_page(&self, _handle: &SpoolHandle) -> Result<()> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn write_printer(
        &self,
        _handle: &SpoolHandle,
        _data: &[u8],
    ) -> std::result::Result<usize, TransferFault> {
        Err(TransferFault {
            written: 0,
            detail: SpoolError::PlatformUnavailable.to_string(),
        })
    }

    fn end_page(&self, _handle: &SpoolHandle) -> Result<()> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn end_doc(&self, _handle: &SpoolHandle) -> Result<()> {
        Err(SpoolError::PlatformUnavailable)
    }
}
