// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations.

use std::ffi::OsStr;
use std::io::{Read, Write};
use std::path::Path;

use spoolwerk_bridge::{MemorySpooler, PrintSpooler, platform_spooler};
use spoolwerk_core::SpoolConfig;
use spoolwerk_core::error::Result;
use spoolwerk_core::identifier::DeviceIdentifier;
use spoolwerk_core::types::{DeviceDescriptor, Payload};
use spoolwerk_spool::{DeviceSession, list_available_devices};
use tracing::info;

/// Write the candidate printers to `out`.
pub fn list(config: &SpoolConfig, json: bool, out: &mut impl Write) -> Result<()> {
    let spooler = platform_spooler();
    let devices = list_available_devices(&*spooler, config);
    render_devices(&devices, json, out)
}

pub fn render_devices(devices: &[DeviceDescriptor], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, devices)?;
        writeln!(out)?;
    } else {
        for device in devices {
            writeln!(out, "{}", device.identifier)?;
        }
    }
    Ok(())
}

/// Options for the `print` subcommand.
pub struct PrintOptions<'a> {
    pub device: &'a OsStr,
    pub file: &'a Path,
    pub text: bool,
    pub dry_run: bool,
    pub no_validate: bool,
}

/// Send one file as a raw job. Returns the number of bytes delivered.
pub fn print(config: &SpoolConfig, opts: &PrintOptions<'_>, out: &mut impl Write) -> Result<usize> {
    let device = DeviceIdentifier::from_os_str(opts.device)?;
    let payload = read_payload(opts.file, opts.text)?;
    let validate = config.validate_on_connect && !opts.no_validate;

    if opts.dry_run {
        let spooler = MemorySpooler::with_printers([device.name()]);
        send(device, &spooler, config, payload, validate)?;
        let sent: usize = spooler.jobs().iter().map(|j| j.data.len()).sum();
        writeln!(out, "dry run: {sent} bytes captured for {}", spooler_target(&spooler))?;
        Ok(sent)
    } else {
        let bytes = payload_len(&payload);
        let target = device.to_string();
        send(device, platform_spooler(), config, payload, validate)?;
        writeln!(out, "sent {bytes} bytes to {target}")?;
        Ok(bytes)
    }
}

fn send<S: PrintSpooler>(
    device: DeviceIdentifier,
    spooler: S,
    config: &SpoolConfig,
    payload: Payload,
    validate: bool,
) -> Result<()> {
    let mut session =
        DeviceSession::from_identifier(device, spooler).with_document_name(&config.document_name);
    if validate {
        session.validate()?;
    }
    session.write(payload)?;
    info!(
        device = %session.identifier(),
        document = session.document_name(),
        "job delivered to spooler"
    );
    session.dispose();
    Ok(())
}

fn read_payload(file: &Path, text: bool) -> Result<Payload> {
    let mut bytes = Vec::new();
    if file == Path::new("-") {
        std::io::stdin().lock().read_to_end(&mut bytes)?;
    } else {
        bytes = std::fs::read(file)?;
    }

    if text {
        let text = String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Payload::Text(text))
    } else {
        Ok(Payload::Bytes(bytes))
    }
}

/// Length in characters for text, which is what gets sent.
fn payload_len(payload: &Payload) -> usize {
    match payload {
        Payload::Bytes(b) => b.len(),
        Payload::Text(t) => t.chars().count(),
    }
}

fn spooler_target(spooler: &MemorySpooler) -> String {
    spooler
        .jobs()
        .first()
        .map(|j| DeviceIdentifier::with_scheme(&j.printer))
        .unwrap_or_default()
}
