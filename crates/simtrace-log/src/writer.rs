//! Log writer.
//!
//! [`LogWriter`] streams entries to any `Write` sink. The preamble is
//! written immediately on construction.

use std::io::Write;

use simtrace_model::ModelStructure;

use crate::codec::{encode_entry, encode_preamble};
use crate::entry::RawEntry;
use crate::error::LogError;
use crate::record::Record;

/// Writes log entries to a byte stream.
///
/// # Examples
///
/// ```
/// use simtrace_log::{LogReader, LogWriter, Record, SystemEntryKind, SystemRecord};
/// use simtrace_model::ModelStructure;
///
/// let model = ModelStructure::default();
/// let mut buf = Vec::new();
/// let mut writer = LogWriter::new(&mut buf).unwrap();
/// let start = Record::System(SystemRecord { time: 0.0, kind: SystemEntryKind::TraceStart });
/// writer.write_record(&start, &model).unwrap();
/// assert_eq!(writer.entries_written(), 1);
/// drop(writer);
///
/// let mut reader = LogReader::open(buf.as_slice()).unwrap();
/// let entry = reader.next_entry().unwrap().unwrap();
/// assert_eq!(entry.header[0], 0);
/// assert!(reader.next_entry().unwrap().is_none());
/// ```
pub struct LogWriter<W: Write> {
    writer: W,
    entries_written: u64,
}

impl<W: Write> LogWriter<W> {
    /// Create a new log writer, immediately writing the preamble.
    pub fn new(mut writer: W) -> Result<Self, LogError> {
        encode_preamble(&mut writer)?;
        Ok(Self {
            writer,
            entries_written: 0,
        })
    }

    /// Write a raw entry as-is.
    pub fn write_entry(&mut self, entry: &RawEntry) -> Result<(), LogError> {
        encode_entry(&mut self.writer, entry)?;
        self.entries_written += 1;
        Ok(())
    }

    /// Encode a typed record against `model` and write it.
    pub fn write_record(&mut self, record: &Record, model: &ModelStructure) -> Result<(), LogError> {
        let entry = record.encode(model)?;
        self.write_entry(&entry)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), LogError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of entries written so far.
    pub fn entries_written(&self) -> u64 {
        self.entries_written
    }

    /// Consume the writer and return the underlying `Write` sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
