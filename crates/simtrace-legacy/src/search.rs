//! Search episode bracketing.
//!
//! The legacy trace frames every search episode with lines the binary log
//! does not contain: a bootstrap spawn and open of the root node right
//! after `SEARCH_BEGIN`, and a `SYSTEM <time> 4` marker right after the
//! `SEARCH_END_*` line. Both are emitted lazily, just before the next
//! entry's own line, so they land after the bracketing line itself.

use simtrace_model::DecisionPointId;

use crate::line::{Fields, TraceLine, TraceType};

/// Legacy system code of the post-search marker.
const SEARCH_FINISHED_CODE: u32 = 4;

/// Search state carried between entries.
#[derive(Clone, Debug, Default)]
pub struct SearchTracker {
    active: Option<DecisionPointId>,
    just_started: bool,
    finished_at: Option<f64>,
}

impl SearchTracker {
    /// Idle tracker with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decision point of the episode in progress.
    pub fn active(&self) -> Option<DecisionPointId> {
        self.active
    }

    /// Whether bracketing lines are waiting to be flushed.
    pub fn has_pending(&self) -> bool {
        self.just_started || self.finished_at.is_some()
    }

    /// An episode began at `decision_point`.
    pub fn begin(&mut self, decision_point: DecisionPointId) {
        self.active = Some(decision_point);
        self.just_started = true;
    }

    /// The episode ended at simulation time `time`.
    pub fn end(&mut self, time: f64) {
        self.active = None;
        self.finished_at = Some(time);
    }

    /// Append pending bracketing lines to `out`, returning how many.
    ///
    /// Start brackets precede the finish bracket when both are pending.
    pub fn flush_pending(&mut self, out: &mut Vec<TraceLine>) -> usize {
        let before = out.len();
        if std::mem::take(&mut self.just_started) {
            out.push(root_spawn_line());
            out.push(root_open_line());
        }
        if let Some(time) = self.finished_at.take() {
            out.push(finished_line(time));
        }
        out.len() - before
    }
}

fn root_spawn_line() -> TraceLine {
    let mut fields = Fields::new("STN");
    for field in [1, 0, 0, 0, -1, -1, 0, 0] {
        fields.push(field);
    }
    fields.finish(TraceType::SearchSpawnNew)
}

fn root_open_line() -> TraceLine {
    let mut fields = Fields::new("SO");
    fields.push(1).push(0).push(0).push(0);
    fields.finish(TraceType::SearchOpen)
}

fn finished_line(time: f64) -> TraceLine {
    let mut fields = Fields::tagged(TraceType::System);
    fields.real(time).push(SEARCH_FINISHED_CODE);
    fields.finish(TraceType::System)
}
