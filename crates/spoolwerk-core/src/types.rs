// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Spoolwerk print transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SpoolError};

/// Unique identifier for a print job (local to this process).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the spooler should treat the job payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Deliver the bytes to the device untouched, bypassing the driver.
    Raw,
}

impl DataType {
    /// Spooler datatype name.
    pub fn spooler_name(&self) -> &'static str {
        match self {
            Self::Raw => "RAW",
        }
    }
}

/// Metadata submitted when a spooler document is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocInfo {
    pub document_name: String,
    /// Redirect the job into a file instead of the device. Always `None` here.
    pub output_file: Option<String>,
    pub data_type: DataType,
}

impl DocInfo {
    /// A raw, non-redirected document with the given name.
    pub fn raw(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            output_file: None,
            data_type: DataType::Raw,
        }
    }
}

/// Data handed to a write call, either as bytes or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Bytes(Vec<u8>),
    /// Encoded one byte per character before transmission.
    Text(String),
}

impl Payload {
    /// Convert into the byte sequence sent to the device.
    ///
    /// Text is encoded as Latin-1: every character must be at most U+00FF.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Text(text) => encode_latin1(&text),
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Encode text one byte per character.
pub fn encode_latin1(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| {
            u8::try_from(u32::from(ch)).map_err(|_| SpoolError::UnencodableText { ch, position })
        })
        .collect()
}

/// One write call, framed as a single spooler document with a single page.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub id: JobId,
    pub doc_info: DocInfo,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl PrintJob {
    /// Build a raw job, encoding text payloads first.
    pub fn new(document_name: &str, payload: impl Into<Payload>) -> Result<Self> {
        Ok(Self {
            id: JobId::new(),
            doc_info: DocInfo::raw(document_name),
            data: payload.into().into_bytes()?,
            created_at: Utc::now(),
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A candidate device returned by enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Identifier in `local://<name>` form.
    pub identifier: String,
    /// Backend-specific extra data. The spooler backend never sets it.
    pub instance: Option<String>,
}

impl DeviceDescriptor {
    pub fn new(identifier: String) -> Self {
        Self {
            identifier,
            instance: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_text_encodes_one_byte_per_char() {
        let bytes = Payload::from("Größe\u{ff}").into_bytes().expect("encode");
        assert_eq!(bytes, vec![b'G', b'r', 0xf6, 0xdf, b'e', 0xff]);
    }

    #[test]
    fn wide_char_is_rejected_with_position() {
        let err = Payload::from("ab€").into_bytes().expect_err("must fail");
        assert!(matches!(
            err,
            SpoolError::UnencodableText { ch: '€', position: 2 }
        ));
    }

    #[test]
    fn bytes_pass_through() {
        let raw = vec![0x1b, 0x40, 0x00, 0xff];
        assert_eq!(Payload::from(raw.clone()).into_bytes().expect("bytes"), raw);
    }

    #[test]
    fn job_is_raw_without_output_file() {
        let job = PrintJob::new("Brother QL Label", vec![1, 2, 3]).expect("job");
        assert_eq!(job.doc_info.data_type, DataType::Raw);
        assert_eq!(job.doc_info.data_type.spooler_name(), "RAW");
        assert!(job.doc_info.output_file.is_none());
        assert_eq!(job.len(), 3);
    }

    #[test]
    fn descriptor_serializes_with_empty_instance() {
        let d = DeviceDescriptor::new("local://Brother QL-600".into());
        let json = serde_json::to_value(&d).expect("ser");
        assert_eq!(json["identifier"], "local://Brother QL-600");
        assert!(json["instance"].is_null());
    }
}
