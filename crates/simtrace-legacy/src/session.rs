//! Translation sessions.
//!
//! A [`TraceSession`] is the unit of translation: it borrows the model,
//! owns all per-run state, and accumulates the trace lines in order.
//! Entries must be fed in log order. Every entry is handled in two
//! phases: first any search bracketing lines left pending by earlier
//! entries are flushed, then the entry itself is parsed and rendered.

use std::io::Read;

use simtrace_log::{LogError, LogReader, RawEntry, Record};
use simtrace_model::ModelStructure;

use crate::config::{TailPolicy, TraceConfig};
use crate::decode::Decoder;
use crate::error::TraceError;
use crate::line::TraceLine;

/// Counters for one [`TraceSession::translate`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Entries decoded.
    pub entries_decoded: u64,
    /// Lines appended, synthetic ones included.
    pub lines_emitted: u64,
    /// Search bracketing lines among `lines_emitted`.
    pub synthetic_lines: u64,
    /// Whether a truncated trailing entry was dropped.
    pub truncated_tail_dropped: bool,
}

/// Stateful translator from log entries to legacy trace lines.
///
/// On error the lines produced so far stay available through
/// [`lines`](Self::lines).
///
/// ```
/// use simtrace_legacy::{TraceConfig, TraceSession};
/// use simtrace_log::{Record, SystemEntryKind, SystemRecord};
/// use simtrace_model::ModelStructure;
///
/// let model = ModelStructure::default();
/// let mut session = TraceSession::new(&model, TraceConfig::default());
/// session
///     .decode_record(&Record::System(SystemRecord {
///         time: 0.0,
///         kind: SystemEntryKind::TraceStart,
///     }))
///     .unwrap();
/// assert_eq!(session.lines()[0].text, "SYSTEM 0 1");
/// ```
#[derive(Clone, Debug)]
pub struct TraceSession<'m> {
    config: TraceConfig,
    decoder: Decoder<'m>,
    lines: Vec<TraceLine>,
    entries_decoded: u64,
    lines_emitted: u64,
    synthetic_lines: u64,
}

impl<'m> TraceSession<'m> {
    /// Start a session over `model`.
    pub fn new(model: &'m ModelStructure, config: TraceConfig) -> Self {
        let decoder = Decoder::new(model, config.simulation_started);
        tracing::debug!(
            model = %model.name,
            action_containers = decoder.actions().container_count(),
            "trace session created"
        );
        Self {
            config,
            decoder,
            lines: Vec::new(),
            entries_decoded: 0,
            lines_emitted: 0,
            synthetic_lines: 0,
        }
    }

    /// The session's configuration.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Rendering state, for diagnostics.
    pub fn decoder(&self) -> &Decoder<'m> {
        &self.decoder
    }

    /// Parse and render one raw entry.
    pub fn decode_entry(&mut self, entry: &RawEntry) -> Result<(), TraceError> {
        self.flush_pending();
        let record = Record::parse(entry, &self.decoder.parse_context())?;
        self.render(&record)
    }

    /// Render one already-parsed record.
    pub fn decode_record(&mut self, record: &Record) -> Result<(), TraceError> {
        self.flush_pending();
        self.render(record)
    }

    /// End of input: flush bracketing lines still pending, if configured.
    pub fn finish(&mut self) {
        if self.config.flush_brackets_at_end {
            self.flush_pending();
        }
    }

    /// Open `source` as a log and translate it.
    ///
    /// Under [`TailPolicy::StopAtLastComplete`] a source that ends inside
    /// the preamble, such as the empty file of a run cancelled at once,
    /// translates as an empty log with its tail marked dropped.
    pub fn translate_stream<R: Read>(
        &mut self,
        source: R,
    ) -> Result<TranslationSummary, TraceError> {
        match LogReader::open(source) {
            Ok(reader) => self.translate(reader),
            Err(LogError::TruncatedEntry { detail })
                if self.config.tail_policy == TailPolicy::StopAtLastComplete =>
            {
                tracing::warn!(%detail, "log ends inside the preamble, treating it as empty");
                let mark = self.mark();
                self.finish();
                Ok(self.summary_since(mark, true))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Translate every entry of `reader`, then [`finish`](Self::finish).
    pub fn translate<R: Read>(
        &mut self,
        mut reader: LogReader<R>,
    ) -> Result<TranslationSummary, TraceError> {
        let mark = self.mark();
        let mut truncated_tail_dropped = false;

        loop {
            match reader.next_entry() {
                Ok(Some(entry)) => self.decode_entry(&entry)?,
                Ok(None) => break,
                Err(LogError::TruncatedEntry { detail })
                    if self.config.tail_policy == TailPolicy::StopAtLastComplete =>
                {
                    tracing::warn!(
                        entries = reader.entries_read(),
                        %detail,
                        "log ends inside an entry, dropping the partial tail"
                    );
                    truncated_tail_dropped = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.finish();
        Ok(self.summary_since(mark, truncated_tail_dropped))
    }

    fn mark(&self) -> TranslationSummary {
        TranslationSummary {
            entries_decoded: self.entries_decoded,
            lines_emitted: self.lines_emitted,
            synthetic_lines: self.synthetic_lines,
            truncated_tail_dropped: false,
        }
    }

    fn summary_since(
        &self,
        mark: TranslationSummary,
        truncated_tail_dropped: bool,
    ) -> TranslationSummary {
        let summary = TranslationSummary {
            entries_decoded: self.entries_decoded - mark.entries_decoded,
            lines_emitted: self.lines_emitted - mark.lines_emitted,
            synthetic_lines: self.synthetic_lines - mark.synthetic_lines,
            truncated_tail_dropped,
        };
        tracing::info!(
            entries = summary.entries_decoded,
            lines = summary.lines_emitted,
            synthetic = summary.synthetic_lines,
            truncated = summary.truncated_tail_dropped,
            "translation finished"
        );
        summary
    }

    /// Lines produced so far.
    pub fn lines(&self) -> &[TraceLine] {
        &self.lines
    }

    /// Move the lines produced so far out of the session.
    ///
    /// State is kept, so translation can continue.
    pub fn take_lines(&mut self) -> Vec<TraceLine> {
        std::mem::take(&mut self.lines)
    }

    /// Consume the session and return its lines.
    pub fn into_lines(self) -> Vec<TraceLine> {
        self.lines
    }

    /// Entries decoded over the session's lifetime.
    pub fn entries_decoded(&self) -> u64 {
        self.entries_decoded
    }

    /// Lines emitted over the session's lifetime, including taken ones.
    pub fn lines_emitted(&self) -> u64 {
        self.lines_emitted
    }

    /// Search bracketing lines emitted over the session's lifetime.
    pub fn synthetic_lines(&self) -> u64 {
        self.synthetic_lines
    }

    fn flush_pending(&mut self) {
        let flushed = self.decoder.search_mut().flush_pending(&mut self.lines) as u64;
        self.synthetic_lines += flushed;
        self.lines_emitted += flushed;
    }

    fn render(&mut self, record: &Record) -> Result<(), TraceError> {
        tracing::trace!(
            index = self.entries_decoded,
            category = %record.category(),
            "decoding entry"
        );
        let line = self.decoder.render(record)?;
        self.lines.push(line);
        self.entries_decoded += 1;
        self.lines_emitted += 1;
        Ok(())
    }
}
