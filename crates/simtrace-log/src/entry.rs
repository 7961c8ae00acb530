//! Raw log entries and their wire discriminants.

use std::fmt;

use crate::error::LogError;

/// One record of the binary log, exactly as the engine wrote it.
///
/// `header[0]` is the category tag; the rest of the header and the whole
/// data region are interpreted by [`Record::parse`](crate::Record::parse).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    /// Fixed-layout header region.
    pub header: Vec<u8>,
    /// Variable-layout data region.
    pub data: Vec<u8>,
}

impl RawEntry {
    /// The entry category announced by the first header byte.
    pub fn category(&self) -> Result<EntryCategory, LogError> {
        let tag = *self
            .header
            .first()
            .ok_or_else(|| LogError::malformed("empty entry header"))?;
        EntryCategory::from_tag(tag).ok_or(LogError::UnknownCategory { tag })
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident = $tag:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $tag,)+
        }

        impl $name {
            /// Name used in error messages.
            pub const KIND: &'static str = $kind;

            /// Decode a wire tag.
            pub fn from_tag(tag: u8) -> Option<Self> {
                match tag {
                    $($tag => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Decode a wire tag, reporting an unknown value as an error.
            pub fn decode(tag: u8) -> Result<Self, LogError> {
                Self::from_tag(tag).ok_or(LogError::UnknownSubtype {
                    kind: Self::KIND,
                    tag,
                })
            }

            /// The wire tag of this variant.
            pub fn tag(self) -> u8 {
                self as u8
            }
        }
    };
}

wire_enum!(
    /// Category of a log entry.
    EntryCategory("entry category") {
        /// Run lifecycle markers.
        System = 0,
        /// Resource state changes.
        Resource = 1,
        /// Events, rules and operations.
        Pattern = 2,
        /// Decision-point search progress.
        Search = 3,
        /// Collected result values.
        Result = 4,
    }
);

impl fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::Resource => "resource",
            Self::Pattern => "pattern",
            Self::Search => "search",
            Self::Result => "result",
        };
        f.write_str(name)
    }
}

wire_enum!(
    /// Sub-type of a system entry.
    SystemEntryKind("system entry") {
        /// The trace has started.
        TraceStart = 0,
        /// The simulation proper has started; later creations are dynamic.
        SimStart = 1,
        /// The run ended normally.
        NormalTermination = 2,
        /// The event queue ran dry.
        NoMoreEvents = 3,
        /// The run was aborted by the user.
        Abort = 4,
        /// The run stopped on a runtime error.
        RunTimeError = 5,
    }
);

wire_enum!(
    /// Sub-type of a resource entry.
    ResourceEntryKind("resource entry") {
        /// A resource was created.
        Created = 0,
        /// A resource was erased.
        Erased = 1,
        /// A resource's parameters changed.
        Altered = 2,
        /// Resource state inside a search tree node.
        Search = 3,
        /// Resource state along the chosen search solution.
        Solution = 4,
    }
);

wire_enum!(
    /// Sub-type of a pattern entry.
    PatternEntryKind("pattern entry") {
        /// An event fired.
        Event = 0,
        /// A rule fired.
        Rule = 1,
        /// An operation began.
        OperationBegin = 2,
        /// An operation ended.
        OperationEnd = 3,
    }
);

wire_enum!(
    /// Sub-type of a search entry.
    SearchEntryKind("search entry") {
        /// A search episode began.
        Begin = 0,
        /// A search episode ended.
        End = 1,
        /// A node was opened.
        Open = 2,
        /// A child node was spawned.
        Spawn = 3,
        /// A node was chosen as part of the solution.
        Decision = 4,
    }
);

wire_enum!(
    /// Why a search episode stopped.
    StopCode("search stop code") {
        /// Stopped externally.
        Aborted = 0,
        /// The terminate condition was already satisfied.
        Condition = 1,
        /// A solution was found.
        Success = 2,
        /// The open list ran dry.
        Fail = 3,
    }
);

wire_enum!(
    /// How a spawned node relates to the existing search graph.
    SpawnStatus("spawn status") {
        /// A state not seen before.
        New = 0,
        /// A known state reached at a higher cost.
        Worse = 1,
        /// A known state reached at a lower cost.
        Better = 2,
    }
);
