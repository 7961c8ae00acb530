//! simtrace: decoding of binary simulation logs into the legacy text trace.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! simtrace sub-crates. For most users, adding `simtrace` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use simtrace::prelude::*;
//!
//! let model = ModelStructure::from_json(
//!     r#"{
//!         "name": "depot",
//!         "resource_types": [
//!             { "name": "Truck", "parameters": [{ "name": "load", "type": "real" }] }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! // A short run, as the engine would have written it.
//! let records = [
//!     Record::System(SystemRecord { time: 0.0, kind: SystemEntryKind::TraceStart }),
//!     Record::System(SystemRecord { time: 0.0, kind: SystemEntryKind::SimStart }),
//!     Record::Resource(ResourceRecord {
//!         time: 1.5,
//!         kind: ResourceEntryKind::Created,
//!         resource_type: ResourceTypeId(0),
//!         resource: ResourceId(0),
//!         parameters: vec![Value::Real(12.25)],
//!     }),
//! ];
//! let mut log = Vec::new();
//! let mut writer = LogWriter::new(&mut log).unwrap();
//! for record in &records {
//!     writer.write_record(record, &model).unwrap();
//! }
//! drop(writer);
//!
//! let mut session = TraceSession::new(&model, TraceConfig::default());
//! session.translate(LogReader::open(log.as_slice()).unwrap()).unwrap();
//! assert_eq!(
//!     simtrace::legacy::render_trace(session.lines()),
//!     "SYSTEM 0 1\nSYSTEM 0 3\nRESOURCE_CREATE 1.5 1 1 12.25\n"
//! );
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`model`] | `simtrace-model` | Model descriptor, typed ids, values, parameter layouts |
//! | [`log`] | `simtrace-log` | Log container reader/writer, typed records |
//! | [`legacy`] | `simtrace-legacy` | Legacy trace sessions, id allocators, number format |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Model descriptor and typed ids (`simtrace-model`).
///
/// [`model::ModelStructure`] is loaded from the JSON the engine exports and
/// supplies parameter schemas and pattern lookups to the decoder.
pub use simtrace_model as model;

/// Binary log container and records (`simtrace-log`).
///
/// Read entries with [`log::LogReader`], interpret them with
/// [`log::Record::parse`], and write test logs with [`log::LogWriter`].
pub use simtrace_log as log;

/// Legacy text trace rendering (`simtrace-legacy`).
///
/// [`legacy::TraceSession`] turns a log into [`legacy::TraceLine`]s.
pub use simtrace_legacy as legacy;

/// Common imports for typical simtrace usage.
///
/// ```rust
/// use simtrace::prelude::*;
/// ```
///
/// This imports the model descriptor and its ids, the log reader and
/// writer, every record type, and the trace session with its
/// configuration.
pub mod prelude {
    // Model
    pub use simtrace_model::{
        ActivityId, DecisionPointId, ModelStructure, PatternId, ResourceId, ResourceTypeId,
        ResultId, Value, ValueType,
    };

    // Log container and records
    pub use simtrace_log::{
        LogReader, LogWriter, PatternRecord, Record, ResourceEntryKind, ResourceRecord,
        ResultRecord, SearchRecord, SystemEntryKind, SystemRecord,
    };

    // Errors
    pub use simtrace_legacy::TraceError;
    pub use simtrace_log::LogError;
    pub use simtrace_model::ModelError;

    // Legacy trace
    pub use simtrace_legacy::{
        TailPolicy, TraceConfig, TraceLine, TraceSession, TraceType, TranslationSummary,
    };
}
