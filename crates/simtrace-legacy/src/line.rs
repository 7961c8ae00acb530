//! Legacy trace lines.

use std::fmt::{self, Display, Write as _};
use std::io::Write;

use crate::error::TraceError;
use crate::format::format_real;

/// Kind of a legacy trace line.
///
/// The name returned by [`as_str`](TraceType::as_str) is the line's
/// leading token for every kind except the search node lines, which the
/// legacy consumer expects as `SO`, `SD`, and (for the bootstrap node)
/// `STN`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceType {
    /// Run lifecycle marker.
    System,
    /// Resource state kept (initial creation or alteration).
    ResourceKeep,
    /// Resource created during the run.
    ResourceCreate,
    /// Resource erased.
    ResourceErase,
    /// Resource state inside the search graph.
    SearchResourceKeep,
    /// Event fired.
    Event,
    /// Rule fired.
    Rule,
    /// Operation began.
    OperationBegin,
    /// Operation ended.
    OperationEnd,
    /// Search episode began.
    SearchBegin,
    /// Search node opened.
    SearchOpen,
    /// Search node spawned, new state.
    SearchSpawnNew,
    /// Search node spawned, worse path to a known state.
    SearchSpawnWorse,
    /// Search node spawned, better path to a known state.
    SearchSpawnBetter,
    /// Search solution step.
    SearchDecision,
    /// Search stopped externally.
    SearchEndAborted,
    /// Search not needed, condition already held.
    SearchEndCondition,
    /// Search found a solution.
    SearchEndSuccess,
    /// Search exhausted the open list.
    SearchEndFail,
    /// Result value.
    Result,
}

impl TraceType {
    /// Canonical name of the line kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::ResourceKeep => "RESOURCE_KEEP",
            Self::ResourceCreate => "RESOURCE_CREATE",
            Self::ResourceErase => "RESOURCE_ERASE",
            Self::SearchResourceKeep => "SEARCH_RESOURCE_KEEP",
            Self::Event => "EVENT",
            Self::Rule => "RULE",
            Self::OperationBegin => "OPERATION_BEGIN",
            Self::OperationEnd => "OPERATION_END",
            Self::SearchBegin => "SEARCH_BEGIN",
            Self::SearchOpen => "SEARCH_OPEN",
            Self::SearchSpawnNew => "SEARCH_SPAWN_NEW",
            Self::SearchSpawnWorse => "SEARCH_SPAWN_WORSE",
            Self::SearchSpawnBetter => "SEARCH_SPAWN_BETTER",
            Self::SearchDecision => "SEARCH_DECISION",
            Self::SearchEndAborted => "SEARCH_END_ABORTED",
            Self::SearchEndCondition => "SEARCH_END_CONDITION",
            Self::SearchEndSuccess => "SEARCH_END_SUCCESS",
            Self::SearchEndFail => "SEARCH_END_FAIL",
            Self::Result => "RESULT",
        }
    }
}

impl Display for TraceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered line of the legacy trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceLine {
    /// Line kind.
    pub trace_type: TraceType,
    /// Fully rendered, space-delimited text.
    pub text: String,
}

impl Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Space-delimited field joiner.
///
/// Empty fields are kept, so `push("")` yields two consecutive spaces.
pub(crate) struct Fields {
    text: String,
}

impl Fields {
    /// Start a line with the given leading token.
    pub(crate) fn new(first: impl Display) -> Self {
        let mut text = String::with_capacity(64);
        let _ = write!(text, "{first}");
        Self { text }
    }

    /// Start a line led by the canonical name of `trace_type`.
    pub(crate) fn tagged(trace_type: TraceType) -> Self {
        Self::new(trace_type.as_str())
    }

    pub(crate) fn push(&mut self, field: impl Display) -> &mut Self {
        let _ = write!(self.text, " {field}");
        self
    }

    pub(crate) fn real(&mut self, v: f64) -> &mut Self {
        self.push(format_real(v))
    }

    /// The legacy empty placeholder field.
    pub(crate) fn gap(&mut self) -> &mut Self {
        self.text.push(' ');
        self
    }

    pub(crate) fn finish(self, trace_type: TraceType) -> TraceLine {
        TraceLine {
            trace_type,
            text: self.text,
        }
    }
}

/// Write `lines` to `out`, one per line.
pub fn write_trace<W: Write>(mut out: W, lines: &[TraceLine]) -> Result<(), TraceError> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Render `lines` into one newline-terminated string.
pub fn render_trace(lines: &[TraceLine]) -> String {
    let mut out = String::new();
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_keeps_empty_token() {
        let mut fields = Fields::tagged(TraceType::Event);
        fields.real(1.5).push(2).push(2).push(0).gap();
        let line = fields.finish(TraceType::Event);
        assert_eq!(line.text, "EVENT 1.5 2 2 0 ");
        assert_eq!(line.to_string(), line.text);
    }

    #[test]
    fn literal_leading_token() {
        let mut fields = Fields::new("SO");
        fields.push(1).push(0).push(0).push(0);
        let line = fields.finish(TraceType::SearchOpen);
        assert_eq!(line.text, "SO 1 0 0 0");
        assert_eq!(line.trace_type.as_str(), "SEARCH_OPEN");
    }

    #[test]
    fn writes_one_line_per_record() {
        let lines = vec![
            TraceLine {
                trace_type: TraceType::System,
                text: "SYSTEM 0 1".into(),
            },
            TraceLine {
                trace_type: TraceType::SearchDecision,
                text: "SD 3 1".into(),
            },
        ];
        let mut out = Vec::new();
        write_trace(&mut out, &lines).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "SYSTEM 0 1\nSD 3 1\n");
        assert_eq!(render_trace(&lines), "SYSTEM 0 1\nSD 3 1\n");
    }
}
