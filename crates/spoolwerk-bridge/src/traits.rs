// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait for the OS print spooler.
//
// The calls mirror the spooler's own vocabulary: open a printer by name, start
// a document, start a page, write bytes, end the page, end the document, close
// the printer. Implementations report failures as `SpoolError::Spooler` with
// the OS error text; callers decide which failures matter.

use std::fmt;

use spoolwerk_core::error::Result;
use spoolwerk_core::types::DocInfo;
use thiserror::Error;

/// Opaque token for an open printer.
///
/// Returned by [`PrintSpooler::open_printer`] and consumed by
/// [`PrintSpooler::close_printer`]. It is neither `Clone` nor `Copy`, so one
/// open printer has exactly one owner and cannot be closed twice.
#[derive(PartialEq, Eq)]
pub struct SpoolHandle {
    raw: usize,
}

impl SpoolHandle {
    /// Wrap a raw OS handle value. Only spooler implementations call this.
    pub fn from_raw(raw: usize) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> usize {
        self.raw
    }
}

impl fmt::Debug for SpoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpoolHandle({:#x})", self.raw)
    }
}

/// A byte transfer the spooler did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail} ({written} bytes accepted)")]
pub struct TransferFault {
    /// Bytes the spooler reported as accepted before failing.
    pub written: usize,
    pub detail: String,
}

/// Access to the operating system's print spooler.
///
/// All calls are synchronous and block until the OS returns.
pub trait PrintSpooler {
    /// Names of all printers registered with the spooler, in registry order.
    fn registered_printers(&self) -> Result<Vec<String>>;

    /// Open a printer by its exact registered name.
    fn open_printer(&self, name: &str) -> Result<SpoolHandle>;

    /// Release a printer handle.
    fn close_printer(&self, handle: SpoolHandle) -> Result<()>;

    /// Start a document. Returns the spooler job id.
    fn start_doc(&self, handle: &SpoolHandle, doc: &DocInfo) -> Result<u32>;

    fn start_page(&self, handle: &SpoolHandle) -> Result<()>;

    /// Hand `data` to the spooler in one call. Returns the bytes accepted.
    fn write_printer(
        &self,
        handle: &SpoolHandle,
        data: &[u8],
    ) -> std::result::Result<usize, TransferFault>;

    fn end_page(&self, handle: &SpoolHandle) -> Result<()>;

    fn end_doc(&self, handle: &SpoolHandle) -> Result<()>;
}

impl<T: PrintSpooler + ?Sized> PrintSpooler for &T {
    fn registered_printers(&self) -> Result<Vec<String>> {
        (**self).registered_printers()
    }

    fn open_printer(&self, name: &str) -> Result<SpoolHandle> {
        (**self).open_printer(name)
    }

    fn close_printer(&self, handle: SpoolHandle) -> Result<()> {
        (**self).close_printer(handle)
    }

    fn start_doc(&self, handle: &SpoolHandle, doc: &DocInfo) -> Result<u32> {
        (**self).start_doc(handle, doc)
    }

    fn start_page(&self, handle: &SpoolHandle) -> Result<()> {
        (**self).start_page(handle)
    }

    fn write_printer(
        &self,
        handle: &SpoolHandle,
        data: &[u8],
    ) -> std::result::Result<usize, TransferFault> {
        (**self).write_printer(handle, data)
    }

    fn end_page(&self, handle: &SpoolHandle) -> Result<()> {
        (**self).end_page(handle)
    }

    fn end_doc(&self, handle: &SpoolHandle) -> Result<()> {
        (**self).end_doc(handle)
    }
}

impl<T: PrintSpooler + ?Sized> PrintSpooler for Box<T> {
    fn registered_printers(&self) -> Result<Vec<String>> {
        (**self).registered_printers()
    }

    fn open_printer(&self, name: &str) -> Result<SpoolHandle> {
        (**self).open_printer(name)
    }

    fn close_printer(&self, handle: SpoolHandle) -> Result<()> {
        (**self).close_printer(handle)
    }

    fn start_doc(&self, handle: &SpoolHandle, doc: &DocInfo) -> Result<u32> {
        (**self).start_doc(handle, doc)
    }

    fn start_page(&self, handle: &SpoolHandle) -> Result<()> {
        (**self).start_page(handle)
    }

    fn write_printer(
        &self,
        handle: &SpoolHandle,
        data: &[u8],
    ) -> std::result::Result<usize, TransferFault> {
        (**self).write_printer(handle, data)
    }

    fn end_page(&self, handle: &SpoolHandle) -> Result<()> {
        (**self).end_page(handle)
    }

    fn end_doc(&self, handle: &SpoolHandle) -> Result<()> {
        (**self).end_doc(handle)
    }
}
