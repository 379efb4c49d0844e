// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory print spooler.
//
// A virtual device for dry runs, benchmarks and tests. It keeps a registry of
// printer names, records every call made to it, captures the bytes of each
// finished document, and can be told to fail any individual step or to accept
// only part of a write.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use spoolwerk_core::error::{Result, SpoolError};
use spoolwerk_core::types::DocInfo;
use tracing::debug;

use crate::traits::{PrintSpooler, SpoolHandle, TransferFault};

/// The individual spooler operations, used for failure injection and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpoolStep {
    Registry,
    Open,
    Close,
    StartDoc,
    StartPage,
    Write,
    EndPage,
    EndDoc,
}

/// One recorded call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpoolCall {
    RegisteredPrinters,
    Open(String),
    Close,
    StartDoc(String),
    StartPage,
    /// Bytes requested.
    Write(usize),
    EndPage,
    EndDoc,
}

impl SpoolCall {
    pub fn step(&self) -> SpoolStep {
        match self {
            Self::RegisteredPrinters => SpoolStep::Registry,
            Self::Open(_) => SpoolStep::Open,
            Self::Close => SpoolStep::Close,
            Self::StartDoc(_) => SpoolStep::StartDoc,
            Self::StartPage => SpoolStep::StartPage,
            Self::Write(_) => SpoolStep::Write,
            Self::EndPage => SpoolStep::EndPage,
            Self::EndDoc => SpoolStep::EndDoc,
        }
    }
}

/// A document that was ended on the spooler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpooledJob {
    pub printer: String,
    pub job_id: u32,
    pub doc_info: DocInfo,
    pub data: Vec<u8>,
}

#[derive(Default)]
struct State {
    printers: Vec<String>,
    failing: HashSet<SpoolStep>,
    accept_limit: Option<usize>,
    calls: Vec<SpoolCall>,
    /// Open handles keyed by raw value, mapped to the printer name.
    open: HashMap<usize, String>,
    /// Documents started but not yet ended, keyed by handle.
    in_flight: HashMap<usize, SpooledJob>,
    finished: Vec<SpooledJob>,
    next_handle: usize,
    next_job: u32,
}

impl State {
    fn check(&self, step: SpoolStep) -> Result<()> {
        if self.failing.contains(&step) {
            return Err(SpoolError::Spooler(format!("{step:?} failed (injected)")));
        }
        Ok(())
    }

    fn printer_for(&self, handle: &SpoolHandle) -> Result<&str> {
        self.open
            .get(&handle.raw())
            .map(String::as_str)
            .ok_or_else(|| SpoolError::Spooler("The handle is invalid.".into()))
    }
}

/// Process-local spooler holding everything in memory.
#[derive(Default)]
pub struct MemorySpooler {
    state: Mutex<State>,
}

impl MemorySpooler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spooler with the given printers registered, in that order.
    pub fn with_printers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spooler = Self::new();
        spooler.lock().printers = names.into_iter().map(Into::into).collect();
        spooler
    }

    /// Make every following call of `step` fail.
    pub fn fail(&self, step: SpoolStep) {
        self.lock().failing.insert(step);
    }

    /// Undo [`fail`](Self::fail) for `step`.
    pub fn recover(&self, step: SpoolStep) {
        self.lock().failing.remove(&step);
    }

    /// Accept at most `limit` bytes per write. The write itself still succeeds.
    pub fn accept_at_most(&self, limit: usize) {
        self.lock().accept_limit = Some(limit);
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<SpoolCall> {
        self.lock().calls.clone()
    }

    /// How many times `step` was called.
    pub fn count(&self, step: SpoolStep) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.step() == step)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Documents ended successfully, oldest first.
    pub fn jobs(&self) -> Vec<SpooledJob> {
        self.lock().finished.clone()
    }

    /// Remove and return the finished documents.
    pub fn take_jobs(&self) -> Vec<SpooledJob> {
        std::mem::take(&mut self.lock().finished)
    }

    /// Number of handles opened and not yet closed.
    pub fn open_handles(&self) -> usize {
        self.lock().open.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory spooler lock poisoned")
    }
}

impl PrintSpooler for MemorySpooler {
    fn registered_printers(&self) -> Result<Vec<String>> {
        let mut state = self.lock();
        state.calls.push(SpoolCall::RegisteredPrinters);
        state.check(SpoolStep::Registry)?;
        Ok(state.printers.clone())
    }

    fn open_printer(&self, name: &str) -> Result<SpoolHandle> {
        let mut state = self.lock();
        state.calls.push(SpoolCall::Open(name.to_owned()));
        state.check(SpoolStep::Open)?;
        if !state.printers.iter().any(|p| p == name) {
            return Err(SpoolError::Spooler("The printer name is invalid.".into()));
        }

        state.next_handle += 1;
        let raw = state.next_handle;
        state.open.insert(raw, name.to_owned());
        debug!(printer = name, handle = raw, "memory spooler opened printer");
        Ok(SpoolHandle::from_raw(raw))
    }

    fn close_printer(&self, handle: SpoolHandle) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(SpoolCall::Close);
        // The handle is gone either way; a failed close still consumes it.
        state.open.remove(&handle.raw());
        state.in_flight.remove(&handle.raw());
        state.check(SpoolStep::Close)
    }

    fn start_doc(&self, handle: &SpoolHandle, doc: &DocInfo) -> Result<u32> {
        let mut state = self.lock();
        state.calls.push(SpoolCall::StartDoc(doc.document_name.clone()));
        state.check(SpoolStep::StartDoc)?;
        let printer = state.printer_for(handle)?.to_owned();

        state.next_job += 1;
        let job_id = state.next_job;
        state.in_flight.insert(
            handle.raw(),
            SpooledJob {
                printer,
                job_id,
                doc_info: doc.clone(),
                data: Vec::new(),
            },
        );
        Ok(job_id)
    }

    fn start_page(&self, handle: &SpoolHandle) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(SpoolCall::StartPage);
        state.check(SpoolStep::StartPage)?;
        state.printer_for(handle).map(|_| ())
    }

    fn write_printer(
        &self,
        handle: &SpoolHandle,
        data: &[u8],
    ) -> std::result::Result<usize, TransferFault> {
        let mut state = self.lock();
        state.calls.push(SpoolCall::Write(data.len()));
        if let Err(e) = state.check(SpoolStep::Write) {
            return Err(TransferFault {
                written: 0,
                detail: e.to_string(),
            });
        }

        let accepted = state.accept_limit.map_or(data.len(), |l| l.min(data.len()));
        let Some(job) = state.in_flight.get_mut(&handle.raw()) else {
            return Err(TransferFault {
                written: 0,
                detail: "no document started on this handle".into(),
            });
        };
        job.data.extend_from_slice(&data[..accepted]);
        Ok(accepted)
    }

    fn end_page(&self, handle: &SpoolHandle) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(SpoolCall::EndPage);
        state.check(SpoolStep::EndPage)?;
        state.printer_for(handle).map(|_| ())
    }

    fn end_doc(&self, handle: &SpoolHandle) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(SpoolCall::EndDoc);
        let job = state.in_flight.remove(&handle.raw());
        state.check(SpoolStep::EndDoc)?;
        match job {
            Some(job) => {
                state.finished.push(job);
                Ok(())
            }
            None => Err(SpoolError::Spooler("no document started on this handle".into())),
        }
    }
}
