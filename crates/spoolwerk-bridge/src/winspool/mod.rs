// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Windows print spooler bridge.
//
// Printer names come from the spooler's registry key; jobs go through
// winspool.drv (`OpenPrinterW` .. `ClosePrinter`). Documents are submitted at
// level 1 with datatype `RAW`, so the driver passes the bytes through.

#![cfg(target_os = "windows")]

use std::ffi::c_void;

use spoolwerk_core::error::{Result, SpoolError};
use spoolwerk_core::types::DocInfo;
use tracing::debug;
use windows::Win32::Foundation::{ERROR_SUCCESS, WIN32_ERROR};
use windows::Win32::Graphics::Printing::{
    ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
    StartDocPrinterW, StartPagePrinter, WritePrinter,
};
use windows::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_READ, RegCloseKey, RegEnumKeyExW, RegOpenKeyExW,
};
use windows::core::{HSTRING, PWSTR};

use crate::traits::{PrintSpooler, SpoolHandle, TransferFault};

/// Registry key whose subkeys are the installed printers.
const PRINTERS_KEY: &str = r"SYSTEM\CurrentControlSet\Control\Print\Printers";

/// Longest registry key name, in UTF-16 units, plus terminator.
const MAX_KEY_LEN: usize = 256;

/// Spooler backed by winspool.drv.
pub struct WinSpooler;

impl WinSpooler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WinSpooler {
    fn default() -> Self {
        Self::new()
    }
}

fn handle(h: &SpoolHandle) -> PRINTER_HANDLE {
    PRINTER_HANDLE(h.raw() as _)
}

/// NUL-terminated UTF-16 buffer for `PWSTR` fields.
fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn registry_error(call: &str, status: WIN32_ERROR) -> SpoolError {
    SpoolError::Spooler(format!(
        "{call}: {}",
        windows::core::Error::from(status.to_hresult()).message()
    ))
}

fn last_error(call: &str) -> SpoolError {
    SpoolError::Spooler(format!("{call}: {}", windows::core::Error::from_win32().message()))
}

impl PrintSpooler for WinSpooler {
    fn registered_printers(&self) -> Result<Vec<String>> {
        let mut key = HKEY::default();
        let path = HSTRING::from(PRINTERS_KEY);
        let status = unsafe { RegOpenKeyExW(HKEY_LOCAL_MACHINE, &path, 0, KEY_READ, &mut key) };
        if status != ERROR_SUCCESS {
            return Err(registry_error("RegOpenKeyExW", status));
        }

        // Enumeration stops at the first index the registry refuses, which
        // includes the normal ERROR_NO_MORE_ITEMS terminator.
        let mut names = Vec::new();
        let mut buf = [0u16; MAX_KEY_LEN];
        for index in 0.. {
            let mut len = buf.len() as u32;
            let status = unsafe {
                RegEnumKeyExW(
                    key,
                    index,
                    PWSTR(buf.as_mut_ptr()),
                    &mut len,
                    None,
                    PWSTR::null(),
                    None,
                    None,
                )
            };
            if status != ERROR_SUCCESS {
                break;
            }
            names.push(String::from_utf16_lossy(&buf[..len as usize]));
        }

        unsafe {
            let _ = RegCloseKey(key);
        }
        debug!(count = names.len(), "printers read from registry");
        Ok(names)
    }

    fn open_printer(&self, name: &str) -> Result<SpoolHandle> {
        let mut raw = PRINTER_HANDLE::default();
        let wide_name = HSTRING::from(name);
        unsafe { OpenPrinterW(&wide_name, &mut raw, None) }
            .map_err(|e| SpoolError::Spooler(format!("OpenPrinterW: {}", e.message())))?;
        Ok(SpoolHandle::from_raw(raw.0 as usize))
    }

    fn close_printer(&self, h: SpoolHandle) -> Result<()> {
        unsafe { ClosePrinter(handle(&h)) }
            .map_err(|e| SpoolError::Spooler(format!("ClosePrinter: {}", e.message())))
    }

    fn start_doc(&self, h: &SpoolHandle, doc: &DocInfo) -> Result<u32> {
        let mut doc_name = wide(&doc.document_name);
        let mut datatype = wide(doc.data_type.spooler_name());
        let mut output_file = doc.output_file.as_deref().map(wide);

        let info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name.as_mut_ptr()),
            pOutputFile: output_file
                .as_mut()
                .map_or(PWSTR::null(), |f| PWSTR(f.as_mut_ptr())),
            pDatatype: PWSTR(datatype.as_mut_ptr()),
        };

        let job_id = unsafe { StartDocPrinterW(handle(h), 1, &info) };
        if job_id == 0 {
            return Err(last_error("StartDocPrinterW"));
        }
        Ok(job_id)
    }

    fn start_page(&self, h: &SpoolHandle) -> Result<()> {
        if unsafe { StartPagePrinter(handle(h)) }.as_bool() {
            Ok(())
        } else {
            Err(last_error("StartPagePrinter"))
        }
    }

    fn write_printer(
        &self,
        h: &SpoolHandle,
        data: &[u8],
    ) -> std::result::Result<usize, TransferFault> {
        let requested = u32::try_from(data.len()).map_err(|_| TransferFault {
            written: 0,
            detail: format!("{} bytes exceed a single WritePrinter call", data.len()),
        })?;

        let mut written = 0u32;
        let ok = unsafe {
            WritePrinter(
                handle(h),
                data.as_ptr() as *const c_void,
                requested,
                &mut written,
            )
        };
        if ok.as_bool() {
            Ok(written as usize)
        } else {
            Err(TransferFault {
                written: written as usize,
                detail: format!("WritePrinter: {}", windows::core::Error::from_win32().message()),
            })
        }
    }

    fn end_page(&self, h: &SpoolHandle) -> Result<()> {
        if unsafe { EndPagePrinter(handle(h)) }.as_bool() {
            Ok(())
        } else {
            Err(last_error("EndPagePrinter"))
        }
    }

    fn end_doc(&self, h: &SpoolHandle) -> Result<()> {
        if unsafe { EndDocPrinter(handle(h)) }.as_bool() {
            Ok(())
        } else {
            Err(last_error("EndDocPrinter"))
        }
    }
}
