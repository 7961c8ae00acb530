//! Error types for the log container and record codec.

use std::io;

use simtrace_model::{ModelError, ValueType};

/// Errors that can occur while reading, writing, or parsing log entries.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// An I/O error occurred during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The stream does not start with the expected `b"SIMT"` magic bytes.
    #[error("invalid magic bytes (expected b\"SIMT\")")]
    InvalidMagic,
    /// The container version is not supported by this build.
    #[error("unsupported format version {found}")]
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// The stream ended inside an entry.
    #[error("truncated entry: {detail}")]
    TruncatedEntry {
        /// What was being read when the stream ended.
        detail: String,
    },
    /// An entry's bytes do not match the layout its tags announce.
    #[error("malformed entry: {detail}")]
    MalformedEntry {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The header's category tag is not recognized.
    #[error("unknown entry category tag {tag}")]
    UnknownCategory {
        /// The unrecognized tag.
        tag: u8,
    },
    /// A sub-type discriminant is not recognized.
    #[error("unknown {kind} tag {tag}")]
    UnknownSubtype {
        /// Which discriminant was being decoded.
        kind: &'static str,
        /// The unrecognized tag.
        tag: u8,
    },
    /// A declared value type has no wire representation yet.
    #[error("{value_type} values are not supported in traces")]
    UnsupportedValueType {
        /// The unsupported type.
        value_type: ValueType,
    },
    /// A value handed to the encoder does not match its declared type.
    #[error("value type mismatch: declared {expected}, got {found}")]
    ValueTypeMismatch {
        /// The declared type.
        expected: ValueType,
        /// The type of the supplied value.
        found: ValueType,
    },
    /// A search spawn entry arrived while no search episode was active.
    #[error("search spawn entry outside of a search episode")]
    SpawnOutsideSearch,
    /// A model lookup failed while interpreting an entry.
    #[error("model: {0}")]
    Model(#[from] ModelError),
}

impl LogError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedEntry {
            detail: detail.into(),
        }
    }
}
