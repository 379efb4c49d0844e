// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw job transport.
//
// One write call becomes one spooler document holding one page:
//
//   Idle -> DocumentOpen -> PageOpen -> Writing -> PageOpen
//        -> DocumentOpen -> DocumentClosing -> Idle
//
// Starting the document, starting the page and transferring the bytes can fail
// the job. Ending the page and ending the document cannot: their failures are
// logged and dropped. Once a document has been started it is always ended,
// either by `finish` or by `Drop`.

use spoolwerk_bridge::{PrintSpooler, SpoolHandle};
use spoolwerk_core::error::{Result, SpoolError};
use spoolwerk_core::types::{DocInfo, PrintJob};
use tracing::{debug, warn};

/// Where a job is in its document/page framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// No document open on the handle.
    Idle,
    DocumentOpen,
    PageOpen,
    /// Bytes are being handed to the spooler.
    Writing,
    /// The document is being ended.
    DocumentClosing,
}

/// Drives one document through the spooler on a borrowed handle.
pub struct JobTransport<'a, S: PrintSpooler + ?Sized> {
    spooler: &'a S,
    handle: &'a SpoolHandle,
    device: &'a str,
    state: JobState,
}

impl<'a, S: PrintSpooler + ?Sized> JobTransport<'a, S> {
    pub fn new(spooler: &'a S, handle: &'a SpoolHandle, device: &'a str) -> Self {
        Self {
            spooler,
            handle,
            device,
            state: JobState::Idle,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Start the spooler document. On failure the transport stays `Idle`.
    pub fn begin_document(&mut self, doc: &DocInfo) -> Result<u32> {
        if self.state != JobState::Idle {
            return Err(self.job_start_failed(format!("document already open ({:?})", self.state)));
        }
        let job_id = self
            .spooler
            .start_doc(self.handle, doc)
            .map_err(|e| self.job_start_failed(e.to_string()))?;

        self.state = JobState::DocumentOpen;
        debug!(device = self.device, job_id, document = %doc.document_name, "document started");
        Ok(job_id)
    }

    /// Start the single page of the document.
    pub fn begin_page(&mut self) -> Result<()> {
        if self.state != JobState::DocumentOpen {
            return Err(SpoolError::PageStartFailed {
                device: self.device.to_owned(),
                detail: format!("no document open ({:?})", self.state),
            });
        }
        self.spooler
            .start_page(self.handle)
            .map_err(|e| SpoolError::PageStartFailed {
                device: self.device.to_owned(),
                detail: e.to_string(),
            })?;

        self.state = JobState::PageOpen;
        Ok(())
    }

    /// Hand the whole payload to the spooler in one call.
    ///
    /// Anything short of the full length is `WriteIncomplete`, whether the
    /// spooler reported an error or merely accepted fewer bytes.
    pub fn transfer(&mut self, data: &[u8]) -> Result<usize> {
        let requested = data.len();
        if self.state != JobState::PageOpen {
            return Err(self.write_incomplete(0, requested, format!("no page open ({:?})", self.state)));
        }

        self.state = JobState::Writing;
        let outcome = self.spooler.write_printer(self.handle, data);
        self.state = JobState::PageOpen;

        match outcome {
            Ok(written) if written == requested => {
                debug!(device = self.device, written, "wrote bytes to printer");
                Ok(written)
            }
            Ok(written) => Err(self.write_incomplete(
                written,
                requested,
                "spooler accepted a partial write".into(),
            )),
            Err(fault) => Err(self.write_incomplete(fault.written, requested, fault.detail)),
        }
    }

    /// End whatever is open. Failures are logged, never returned.
    ///
    /// `Writing` only survives here if the transfer unwound; the page is
    /// still open then.
    pub fn finish(&mut self) {
        if matches!(self.state, JobState::PageOpen | JobState::Writing) {
            if let Err(e) = self.spooler.end_page(self.handle) {
                warn!(device = self.device, error = %e, "EndPage failed");
            }
            self.state = JobState::DocumentOpen;
        }

        if self.state == JobState::DocumentOpen {
            self.state = JobState::DocumentClosing;
            if let Err(e) = self.spooler.end_doc(self.handle) {
                warn!(device = self.device, error = %e, "EndDoc failed");
            }
        }

        self.state = JobState::Idle;
    }

    fn job_start_failed(&self, detail: String) -> SpoolError {
        SpoolError::JobStartFailed {
            device: self.device.to_owned(),
            detail,
        }
    }

    fn write_incomplete(&self, written: usize, requested: usize, detail: String) -> SpoolError {
        SpoolError::WriteIncomplete {
            device: self.device.to_owned(),
            written,
            requested,
            detail,
        }
    }
}

impl<S: PrintSpooler + ?Sized> Drop for JobTransport<'_, S> {
    fn drop(&mut self) {
        if self.state != JobState::Idle {
            self.finish();
        }
    }
}

/// Send one job as a complete document on an open handle.
///
/// Only the start of the document, the start of the page and the transfer can
/// fail the call. The handle is left open either way.
pub fn send_job<S: PrintSpooler + ?Sized>(
    spooler: &S,
    handle: &SpoolHandle,
    device: &str,
    job: &PrintJob,
) -> Result<()> {
    let mut transport = JobTransport::new(spooler, handle, device);
    transport.begin_document(&job.doc_info)?;

    let outcome = transport
        .begin_page()
        .and_then(|()| transport.transfer(&job.data))
        .map(|_| ());
    transport.finish();
    outcome
}
