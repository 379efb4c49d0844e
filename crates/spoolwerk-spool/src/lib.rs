// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolwerk Spool — device sessions, the raw job transport, and best-effort
// printer enumeration. This crate sits between the core types in
// `spoolwerk-core` and the OS spooler reached through `spoolwerk-bridge`.

pub mod enumerator;
pub mod session;
pub mod transport;

pub use enumerator::{DeviceEnumerator, list_available_devices};
pub use session::{DEFAULT_READ_LEN, DeviceSession};
pub use transport::{JobState, JobTransport, send_job};
