//! Binary event log for simtrace.
//!
//! A simulation run produces an append-only sequence of typed entries.
//! This crate frames those entries in a simple container, reads and
//! writes it, and turns each raw entry into a typed [`Record`].
//!
//! # Architecture
//!
//! - [`LogWriter`] appends entries to any `Write` sink
//! - [`LogReader`] reads entries back from any `Read` source, telling a
//!   clean end of stream apart from a truncated trailing entry
//! - [`Record::parse`] and [`Record::encode`] convert between raw
//!   header/data bytes and closed per-category sum types
//!
//! # Format
//!
//! ```text
//! [MAGIC "SIMT"] [VERSION u8]
//! [Entry 1] [Entry 2] ... [Entry N]
//! Entry := [header_len u32] [header] [data_len u32] [data]
//! ```
//!
//! All multi-byte values are big-endian, matching the simulation engine's
//! buffer order. The first header byte is the entry category tag.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod entry;
pub mod error;
pub mod reader;
pub mod record;
pub mod writer;

pub use entry::{
    EntryCategory, PatternEntryKind, RawEntry, ResourceEntryKind, SearchEntryKind,
    SpawnStatus, StopCode, SystemEntryKind,
};
pub use error::LogError;
pub use reader::{EntryIter, LogReader};
pub use record::{
    ActivityRef, ParseContext, PatternRecord, Record, RelevantResources, ResourceRecord,
    ResultRecord, SearchRecord, SearchStats, SystemRecord,
};
pub use writer::LogWriter;

/// Magic bytes at the start of every log file.
pub const MAGIC: [u8; 4] = *b"SIMT";

/// Current container format version.
pub const FORMAT_VERSION: u8 = 1;
