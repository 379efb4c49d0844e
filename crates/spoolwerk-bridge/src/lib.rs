// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolwerk — Native print spooler bridge.
//
// Defines the `PrintSpooler` trait the session layer talks to, and picks the
// implementation for the target operating system. The in-memory spooler is
// available everywhere for tests and dry runs.

pub mod memory;
pub mod traits;

#[cfg(target_os = "windows")]
pub mod winspool;

#[cfg(not(target_os = "windows"))]
pub mod stub;

pub use memory::{MemorySpooler, SpoolCall, SpoolStep, SpooledJob};
pub use traits::{PrintSpooler, SpoolHandle, TransferFault};

/// Returns the spooler implementation for the target operating system.
pub fn platform_spooler() -> Box<dyn PrintSpooler> {
    #[cfg(target_os = "windows")]
    {
        // Windows: winspool.drv plus the printers registry key.
        Box::new(winspool::WinSpooler::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        // Elsewhere every call fails with `PlatformUnavailable`.
        Box::new(stub::StubSpooler)
    }
}
