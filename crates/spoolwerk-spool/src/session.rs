// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device sessions.
//
// A `DeviceSession` owns at most one open spooler handle for one printer. The
// handle is opened lazily by `write`, stays open between jobs, and is closed
// by `close`, `dispose` or when the session is dropped. Close failures are
// logged and dropped so teardown never errors.
//
// A session is single-threaded. Callers sharing one across threads must
// serialise access themselves.

use spoolwerk_bridge::{PrintSpooler, SpoolHandle};
use spoolwerk_core::config::DEFAULT_DOCUMENT_NAME;
use spoolwerk_core::error::{Result, SpoolError};
use spoolwerk_core::identifier::DeviceIdentifier;
use spoolwerk_core::types::{Payload, PrintJob};
use tracing::{debug, error, info, instrument, warn};

use crate::transport::send_job;

/// Read length used when the caller has no preference.
pub const DEFAULT_READ_LEN: usize = 32;

/// One addressable printer and the I/O to it.
pub struct DeviceSession<S: PrintSpooler> {
    device: DeviceIdentifier,
    spooler: S,
    handle: Option<SpoolHandle>,
    document_name: String,
}

impl<S: PrintSpooler> DeviceSession<S> {
    /// Resolve `identifier` and check the printer can be opened.
    ///
    /// The printer is opened and closed again straight away; if that fails
    /// the session is never created and the error is `DeviceUnreachable`.
    #[instrument(skip_all)]
    pub fn connect<I>(identifier: I, spooler: S) -> Result<Self>
    where
        I: TryInto<DeviceIdentifier, Error = SpoolError>,
    {
        let mut session = Self::deferred(identifier, spooler)?;
        session.validate()?;
        Ok(session)
    }

    /// Resolve `identifier` without touching the spooler.
    ///
    /// The first `open` or `write` reports an unreachable printer instead.
    pub fn deferred<I>(identifier: I, spooler: S) -> Result<Self>
    where
        I: TryInto<DeviceIdentifier, Error = SpoolError>,
    {
        let device = identifier.try_into()?;
        Ok(Self::from_identifier(device, spooler))
    }

    pub fn from_identifier(device: DeviceIdentifier, spooler: S) -> Self {
        info!(device = device.name(), "initializing spooler session");
        Self {
            device,
            spooler,
            handle: None,
            document_name: DEFAULT_DOCUMENT_NAME.to_owned(),
        }
    }

    /// Use `name` as the spooler document name for subsequent jobs.
    pub fn with_document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = name.into();
        self
    }

    /// Check the printer can be opened.
    ///
    /// With no handle held this opens and immediately closes one. A session
    /// that already holds a handle is reachable by definition.
    pub fn validate(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        self.open()?;
        self.close();
        Ok(())
    }

    /// Acquire the printer handle. Does nothing if one is already held.
    pub fn open(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let handle = self
            .spooler
            .open_printer(self.device.name())
            .map_err(|e| SpoolError::DeviceUnreachable {
                device: self.device.name().to_owned(),
                detail: e.to_string(),
            })?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Release the printer handle, if any. Never fails.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.spooler.close_printer(handle) {
                warn!(device = self.device.name(), error = %e, "ClosePrinter failed");
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Send `payload` as one raw spooler job, opening the printer if needed.
    ///
    /// Text payloads are encoded one byte per character first. A failed job
    /// leaves the handle open so the caller can try again.
    #[instrument(skip_all, fields(device = self.device.name()))]
    pub fn write(&mut self, payload: impl Into<Payload>) -> Result<()> {
        self.write_job(payload.into()).inspect_err(|e| {
            error!(device = self.device.name(), error = %e, "error writing to printer");
        })
    }

    fn write_job(&mut self, payload: Payload) -> Result<()> {
        let job = PrintJob::new(&self.document_name, payload)?;
        self.open()?;

        let Some(handle) = self.handle.as_ref() else {
            return Err(SpoolError::DeviceUnreachable {
                device: self.device.name().to_owned(),
                detail: "no printer handle after open".into(),
            });
        };

        debug!(
            job_id = %job.id,
            created_at = %job.created_at,
            bytes = job.len(),
            "sending job"
        );
        send_job(&self.spooler, handle, self.device.name(), &job)
    }

    /// Send text, encoded one byte per character.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.write(text)
    }

    /// The spooler has no read-back channel: always returns no bytes.
    pub fn read(&mut self, _max_len: usize) -> Vec<u8> {
        Vec::new()
    }

    /// Release everything this session holds. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.close();
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }

    pub fn identifier(&self) -> &DeviceIdentifier {
        &self.device
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn spooler(&self) -> &S {
        &self.spooler
    }
}

impl<S: PrintSpooler> Drop for DeviceSession<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spoolwerk_bridge::{MemorySpooler, SpoolCall, SpoolStep};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    const PRINTER: &str = "Brother QL-500";

    fn spooler() -> MemorySpooler {
        MemorySpooler::with_printers(["HP LaserJet", PRINTER])
    }

    #[test]
    fn connect_validates_and_leaves_session_idle() {
        let spooler = spooler();
        let session = DeviceSession::connect("local://Brother QL-500", &spooler).expect("connect");

        assert_eq!(session.device_name(), PRINTER);
        assert_eq!(session.identifier().to_string(), "local://Brother QL-500");
        assert!(!session.is_open());
        assert_eq!(
            spooler.calls(),
            vec![SpoolCall::Open(PRINTER.into()), SpoolCall::Close]
        );
    }

    #[test]
    fn connect_to_missing_printer_is_unreachable() {
        let spooler = spooler();
        let err = DeviceSession::connect("local://Brother QL-820", &spooler)
            .err()
            .expect("must fail");
        match err {
            SpoolError::DeviceUnreachable { device, detail } => {
                assert_eq!(device, "Brother QL-820");
                assert!(detail.contains("invalid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_string_identifier_fails_before_any_spooler_call() {
        let spooler = spooler();
        let err = DeviceSession::connect(&json!(500), &spooler).err().expect("must fail");
        assert!(matches!(err, SpoolError::UnsupportedIdentifier(_)));
        assert!(spooler.calls().is_empty());
    }

    #[test]
    fn empty_name_fails_before_any_spooler_call() {
        let spooler = spooler();
        let err = DeviceSession::connect("local://", &spooler).err().expect("must fail");
        assert!(matches!(err, SpoolError::InvalidDeviceName(_)));
        assert!(spooler.calls().is_empty());
    }

    #[test]
    fn deferred_skips_validation() {
        let spooler = spooler();
        let mut session = DeviceSession::deferred("nowhere", &spooler).expect("deferred");
        assert!(spooler.calls().is_empty());
        assert!(matches!(
            session.validate(),
            Err(SpoolError::DeviceUnreachable { .. })
        ));
    }

    #[test]
    fn open_is_idempotent() {
        let spooler = spooler();
        let mut session = DeviceSession::deferred(PRINTER, &spooler).expect("deferred");
        session.open().expect("open");
        session.open().expect("open again");
        assert_eq!(session.spooler().count(SpoolStep::Open), 1);
        assert!(session.is_open());
    }

    #[test]
    fn close_is_idempotent_and_silent() {
        let spooler = spooler();
        let mut session = DeviceSession::deferred(PRINTER, &spooler).expect("deferred");
        session.close();
        session.open().expect("open");
        spooler.fail(SpoolStep::Close);
        session.close();
        session.close();
        assert!(!session.is_open());
        assert_eq!(spooler.count(SpoolStep::Close), 1);
    }

    #[test]
    fn read_is_always_empty() {
        let spooler = spooler();
        let mut session = DeviceSession::connect(PRINTER, &spooler).expect("connect");
        for len in [0, 1, DEFAULT_READ_LEN, usize::MAX] {
            assert!(session.read(len).is_empty());
        }
    }

    #[test]
    fn write_opens_lazily_and_keeps_handle() {
        let spooler = spooler();
        let mut session = DeviceSession::connect(PRINTER, &spooler).expect("connect");
        spooler.clear_calls();

        session.write(vec![0u8; 100]).expect("write");
        session.write(vec![1u8; 10]).expect("second write");

        assert!(session.is_open());
        assert_eq!(spooler.count(SpoolStep::Open), 1);
        assert_eq!(spooler.count(SpoolStep::EndPage), 2);
        assert_eq!(spooler.count(SpoolStep::EndDoc), 2);
        let jobs = spooler.jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].data.len(), 100);
        assert_eq!(jobs[0].doc_info.document_name, "Brother QL Label");
    }

    #[test]
    fn write_to_unreachable_printer_fails_fast() {
        let spooler = spooler();
        let mut session = DeviceSession::connect(PRINTER, &spooler).expect("connect");
        spooler.fail(SpoolStep::Open);

        let err = session.write(vec![1, 2, 3]).expect_err("must fail");
        assert!(matches!(err, SpoolError::DeviceUnreachable { .. }));
        assert_eq!(spooler.count(SpoolStep::StartDoc), 0);
    }

    /// Log sink for asserting on emitted events.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log lock poisoned")).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log lock poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn unreachable_write_is_logged_as_error() {
        let spooler = spooler();
        let mut session = DeviceSession::deferred("Brother QL-820", &spooler).expect("deferred");
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();

        let err = tracing::subscriber::with_default(subscriber, || session.write(vec![1, 2]))
            .expect_err("must fail");
        assert!(matches!(err, SpoolError::DeviceUnreachable { .. }));
        let text = logs.text();
        assert!(text.contains("error writing to printer"), "{text}");
        assert!(text.contains("Brother QL-820"), "{text}");
    }

    #[test]
    fn failed_job_leaves_session_reusable() {
        let spooler = spooler();
        let mut session = DeviceSession::connect(PRINTER, &spooler).expect("connect");

        spooler.fail(SpoolStep::StartDoc);
        let err = session.write(vec![9; 4]).expect_err("must fail");
        assert!(matches!(err, SpoolError::JobStartFailed { .. }));
        assert!(session.is_open());
        assert_eq!(spooler.count(SpoolStep::StartPage), 0);

        spooler.recover(SpoolStep::StartDoc);
        session.write(vec![9; 4]).expect("retry succeeds");
        assert_eq!(spooler.count(SpoolStep::Open), 2);
    }

    #[test]
    fn text_is_encoded_before_sending() {
        let spooler = spooler();
        let mut session = DeviceSession::connect(PRINTER, &spooler)
            .expect("connect")
            .with_document_name("Price tag");
        session.write_text("Preis: 5€").expect_err("euro sign has no Latin-1 byte");
        assert_eq!(spooler.count(SpoolStep::StartDoc), 0);

        assert_eq!(session.document_name(), "Price tag");
        session.write_text("Größe").expect("write");
        let job = &spooler.jobs()[0];
        assert_eq!(job.data, vec![b'G', b'r', 0xf6, 0xdf, b'e']);
        assert_eq!(job.doc_info.document_name, "Price tag");
    }

    #[test]
    fn drop_releases_handle() {
        let spooler = spooler();
        {
            let mut session = DeviceSession::connect(PRINTER, &spooler).expect("connect");
            session.write(vec![0; 8]).expect("write");
            assert_eq!(spooler.open_handles(), 1);
        }
        assert_eq!(spooler.open_handles(), 0);
    }

    #[test]
    fn dispose_twice_is_harmless() {
        let spooler = spooler();
        let mut session = DeviceSession::connect(PRINTER, &spooler).expect("connect");
        session.open().expect("open");
        session.dispose();
        session.dispose();
        assert_eq!(spooler.open_handles(), 0);
    }
}
