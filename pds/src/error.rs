// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::{error::Error as _, fmt, io, path::PathBuf};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Errors encountered while opening or reading a source.
///
/// To inspect the details of the error use [`details`](Self::details) or
/// [`into_details`](Self::into_details). For coarse-grained handling, such as telling a
/// corrupted file apart from a misuse of the API, use [`kind`](Self::kind).
#[derive(thiserror::Error, Debug)]
#[repr(transparent)]
#[error(transparent)]
pub struct Error {
    details: Box<Details>,
}

impl Error {
    pub fn new(details: Details) -> Self {
        Self {
            details: Box::new(details),
        }
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn into_details(self) -> Details {
        *self.details
    }

    /// The category this error falls in.
    pub fn kind(&self) -> ErrorKind {
        self.details.kind()
    }

    /// Whether the error was caused by the content of the container rather than by the caller or
    /// the environment.
    pub fn is_corruption(&self) -> bool {
        self.kind().is_corruption()
    }
}

impl From<Details> for Error {
    fn from(details: Details) -> Self {
        Self::new(details)
    }
}

/// Coarse classification of [`Details`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum ErrorKind {
    /// The underlying stream failed.
    Io,
    /// A declared size exceeds [`max_allocation_bytes`](crate::util::max_allocation_bytes).
    Allocation,
    /// A source could not be set up from the given options.
    Configuration,
    /// The file is not a PDS container.
    MagicMismatch,
    /// The preamble is internally inconsistent.
    SchemaCorrupt,
    /// The registry has no decoder for a type named in the catalog.
    UnknownType,
    /// A size declared inside the preamble points past its end.
    BufferOverrun,
    /// An event frame failed its cross-check or could not be split into products.
    FrameCorrupt,
    /// The container ended in the middle of a structure.
    TruncatedRead,
    /// An event before the current position was requested.
    UnsupportedSeek,
    /// A decoder rejected the bytes of a product.
    Decode,
    /// The source already failed and its position in the stream is unknown.
    Poisoned,
}

impl ErrorKind {
    pub fn is_corruption(self) -> bool {
        matches!(
            self,
            ErrorKind::SchemaCorrupt
                | ErrorKind::BufferOverrun
                | ErrorKind::FrameCorrupt
                | ErrorKind::TruncatedRead
        )
    }
}

#[derive(thiserror::Error)]
pub enum Details {
    #[error("Failed to open container {path:?}: {source}")]
    OpenContainer {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read from the container: {0}")]
    ReadWords(#[source] io::Error),

    #[error("Failed to seek within the container: {0}")]
    Seek(#[source] io::Error),

    #[error("Unable to allocate {desired} bytes (maximum allowed: {maximum})")]
    MemoryAllocation { desired: usize, maximum: usize },

    #[error("Unknown source type {0:?}")]
    UnknownSourceKind(String),

    #[error("Unknown body layout {0:?}")]
    UnknownBodyLayout(String),

    #[error("Source {0} needs a file name")]
    MissingFileName(&'static str),

    #[error("Not a PDS container: magic number is {found}, expected {expected}")]
    MagicMismatch { expected: u32, found: u32 },

    #[error(
        "Preamble cross-check failed: buffer size is {expected} words but the trailing word is {found}"
    )]
    PreambleCrossCheck { expected: u32, found: u32 },

    #[error("Preamble has {remaining} unparsed words before its cross-check word")]
    PreambleTrailingWords { remaining: usize },

    #[error("Preamble catalog consumed the cross-check word")]
    PreambleMissingCrossCheck,

    #[error(
        "Product {product:?} refers to type index {index} but only {available} top-level types are declared"
    )]
    TypeIndexOutOfRange {
        product: String,
        index: u32,
        available: usize,
    },

    #[error("Invalid utf-8 string")]
    ConvertToUtf8(#[source] std::string::FromUtf8Error),

    #[error("No decoder registered for type {type_name:?} of product {product:?}")]
    UnknownType { product: String, type_name: String },

    #[error("Preamble entry at word {offset} needs {needed} words but only {available} remain")]
    BufferOverrun {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Unterminated string at word {offset} of the preamble")]
    UnterminatedString { offset: usize },

    #[error(
        "Event {event} is corrupt: body size is {body_size} words but the cross-check word is {cross_check}"
    )]
    FrameCorrupt {
        event: u64,
        body_size: u32,
        cross_check: u32,
    },

    #[error("Body of event {event} does not split into {expected} product segments")]
    SegmentMismatch { event: u64, expected: usize },

    #[error("Container ended early: needed {wanted} bytes but only {available} remain")]
    TruncatedRead { wanted: u64, available: u64 },

    #[error("Cannot seek backwards from event {current} to event {requested}")]
    UnsupportedSeek { current: u64, requested: u64 },

    #[error("Decoder for type {type_name:?} rejected the product bytes: {reason}")]
    Decode { type_name: String, reason: String },

    #[error("Source is unusable after failing at event {event}")]
    Poisoned { event: u64 },
}

impl Details {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Details::OpenContainer { .. } | Details::ReadWords(_) | Details::Seek(_) => {
                ErrorKind::Io
            }
            Details::MemoryAllocation { .. } => ErrorKind::Allocation,
            Details::UnknownSourceKind(_)
            | Details::UnknownBodyLayout(_)
            | Details::MissingFileName(_) => ErrorKind::Configuration,
            Details::MagicMismatch { .. } => ErrorKind::MagicMismatch,
            Details::PreambleCrossCheck { .. }
            | Details::PreambleTrailingWords { .. }
            | Details::PreambleMissingCrossCheck
            | Details::TypeIndexOutOfRange { .. }
            | Details::ConvertToUtf8(_) => ErrorKind::SchemaCorrupt,
            Details::UnknownType { .. } => ErrorKind::UnknownType,
            Details::BufferOverrun { .. } | Details::UnterminatedString { .. } => {
                ErrorKind::BufferOverrun
            }
            Details::FrameCorrupt { .. } | Details::SegmentMismatch { .. } => {
                ErrorKind::FrameCorrupt
            }
            Details::TruncatedRead { .. } => ErrorKind::TruncatedRead,
            Details::UnsupportedSeek { .. } => ErrorKind::UnsupportedSeek,
            Details::Decode { .. } => ErrorKind::Decode,
            Details::Poisoned { .. } => ErrorKind::Poisoned,
        }
    }
}

impl fmt::Debug for Details {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut msg = self.to_string();
        if let Some(e) = self.source() {
            msg.extend([": ", &e.to_string()]);
        }
        write!(f, "{msg}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_corruption_kinds() {
        let corrupt: Vec<ErrorKind> = ErrorKind::iter().filter(|k| k.is_corruption()).collect();
        assert_eq!(
            corrupt,
            vec![
                ErrorKind::SchemaCorrupt,
                ErrorKind::BufferOverrun,
                ErrorKind::FrameCorrupt,
                ErrorKind::TruncatedRead,
            ]
        );
    }

    #[test]
    fn test_error_display_and_kind() {
        let err: Error = Details::FrameCorrupt {
            event: 3,
            body_size: 8,
            cross_check: 7,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::FrameCorrupt);
        assert!(err.is_corruption());
        assert_eq!(
            err.to_string(),
            "Event 3 is corrupt: body size is 8 words but the cross-check word is 7"
        );
    }

    #[test]
    fn test_debug_appends_source() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let details = Details::ReadWords(io);
        assert_eq!(
            format!("{details:?}"),
            "Failed to read from the container: denied: denied"
        );
        assert_eq!(details.kind(), ErrorKind::Io);
        assert!(!details.kind().is_corruption());
    }
}
