//! Legacy text trace rendering for simtrace logs.
//!
//! Older analysis and visualization tools read a line-oriented text trace.
//! This crate rebuilds that trace from the binary log, byte for byte:
//!
//! - [`TraceSession`] drives translation entry by entry, in log order
//! - [`ResourceIdAllocator`] and [`ActionSlotAllocator`] reproduce the
//!   legacy tool's smallest-free id reuse
//! - [`SearchTracker`] synthesizes the bracketing lines around search
//!   episodes
//! - [`format_real`] reproduces the legacy fixed-precision number format
//!
//! # Example
//!
//! ```
//! use simtrace_legacy::{render_trace, TraceConfig, TraceSession};
//! use simtrace_log::{LogReader, LogWriter, Record, SystemEntryKind, SystemRecord};
//! use simtrace_model::ModelStructure;
//!
//! let model = ModelStructure::default();
//! let mut log = Vec::new();
//! let mut writer = LogWriter::new(&mut log).unwrap();
//! for (time, kind) in [(0.0, SystemEntryKind::TraceStart), (0.0, SystemEntryKind::SimStart)] {
//!     writer.write_record(&Record::System(SystemRecord { time, kind }), &model).unwrap();
//! }
//! drop(writer);
//!
//! let mut session = TraceSession::new(&model, TraceConfig::default());
//! let summary = session.translate(LogReader::open(log.as_slice()).unwrap()).unwrap();
//! assert_eq!(summary.entries_decoded, 2);
//! assert_eq!(render_trace(session.lines()), "SYSTEM 0 1\nSYSTEM 0 3\n");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action_ids;
pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod line;
pub mod resource_ids;
pub mod search;
pub mod session;

pub use action_ids::ActionSlotAllocator;
pub use config::{TailPolicy, TraceConfig};
pub use decode::Decoder;
pub use error::TraceError;
pub use format::{format_bool, format_real};
pub use line::{render_trace, write_trace, TraceLine, TraceType};
pub use resource_ids::ResourceIdAllocator;
pub use search::SearchTracker;
pub use session::{TraceSession, TranslationSummary};
