//! Translation session configuration.

/// What to do when the log ends partway through an entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TailPolicy {
    /// Stop at the last complete entry and report the dropped tail.
    /// Logs cut off by cancellation end this way.
    #[default]
    StopAtLastComplete,
    /// Fail with [`LogError::TruncatedEntry`](simtrace_log::LogError::TruncatedEntry).
    Error,
}

/// Configuration for a [`TraceSession`](crate::TraceSession).
///
/// Every combination of settings is valid.
///
/// ```
/// use simtrace_legacy::{TailPolicy, TraceConfig};
///
/// let config = TraceConfig::default()
///     .with_tail_policy(TailPolicy::Error)
///     .with_simulation_started(true);
/// assert!(config.flush_brackets_at_end);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceConfig {
    /// Handling of a truncated trailing entry. Default: stop at the last
    /// complete entry.
    pub tail_policy: TailPolicy,
    /// Emit search bracketing lines still pending when the log ends.
    /// Default: `true`.
    pub flush_brackets_at_end: bool,
    /// Treat the log as starting after SIM_START, so that creations render
    /// as `RESOURCE_CREATE`. Default: `false`.
    pub simulation_started: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            tail_policy: TailPolicy::default(),
            flush_brackets_at_end: true,
            simulation_started: false,
        }
    }
}

impl TraceConfig {
    /// Set [`tail_policy`](Self::tail_policy).
    pub fn with_tail_policy(mut self, tail_policy: TailPolicy) -> Self {
        self.tail_policy = tail_policy;
        self
    }

    /// Set [`flush_brackets_at_end`](Self::flush_brackets_at_end).
    pub fn with_flush_brackets_at_end(mut self, flush: bool) -> Self {
        self.flush_brackets_at_end = flush;
        self
    }

    /// Set [`simulation_started`](Self::simulation_started).
    pub fn with_simulation_started(mut self, started: bool) -> Self {
        self.simulation_started = started;
        self
    }
}
