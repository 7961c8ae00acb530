//! Log reader.
//!
//! [`LogReader`] reads raw entries from any `Read` source. The preamble is
//! validated on construction.

use std::io::Read;

use crate::codec::{decode_entry, decode_preamble};
use crate::entry::RawEntry;
use crate::error::LogError;

/// Reads log entries from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production
/// code can use `BufReader<File>`.
pub struct LogReader<R: Read> {
    reader: R,
    entries_read: u64,
}

impl<R: Read> LogReader<R> {
    /// Open a log stream, reading and validating the preamble.
    pub fn open(mut reader: R) -> Result<Self, LogError> {
        decode_preamble(&mut reader)?;
        Ok(Self {
            reader,
            entries_read: 0,
        })
    }

    /// Read the next entry, or `None` if the stream ended cleanly.
    pub fn next_entry(&mut self) -> Result<Option<RawEntry>, LogError> {
        let entry = decode_entry(&mut self.reader)?;
        if entry.is_some() {
            self.entries_read += 1;
        }
        Ok(entry)
    }

    /// Number of complete entries read so far.
    pub fn entries_read(&self) -> u64 {
        self.entries_read
    }

    /// Convert into an entry iterator.
    pub fn entries(self) -> EntryIter<R> {
        EntryIter {
            reader: self.reader,
            entries_read: self.entries_read,
            done: false,
        }
    }
}

/// Iterator adapter over log entries.
///
/// Yields at most one error, after which iteration stops.
pub struct EntryIter<R: Read> {
    reader: R,
    entries_read: u64,
    done: bool,
}

impl<R: Read> EntryIter<R> {
    /// Number of complete entries yielded so far.
    pub fn entries_read(&self) -> u64 {
        self.entries_read
    }
}

impl<R: Read> Iterator for EntryIter<R> {
    type Item = Result<RawEntry, LogError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match decode_entry(&mut self.reader) {
            Ok(Some(entry)) => {
                self.entries_read += 1;
                Some(Ok(entry))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
