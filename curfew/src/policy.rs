//! Time-windowed permission policies.
//!
//! A [`Policy`] pairs an effective instant with a mode declaration. A node's
//! policy list is ordered by timestamp alone: the earliest entry is the
//! default that applies before any deadline (or to excluded paths), the
//! latest entry is the most recent deadline and takes over once eligible.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Local, Offset, Utc};

use crate::config::ModeSpec;

/// One time-windowed rule: an effective timestamp plus mode expressions.
#[derive(Debug, Clone)]
pub struct Policy {
    timestamp: DateTime<Local>,
    spec: ModeSpec,
}

impl Policy {
    /// A dated policy that becomes eligible at `timestamp`.
    pub fn new(timestamp: DateTime<Local>, spec: ModeSpec) -> Self {
        Self { timestamp, spec }
    }

    /// The default policy: epoch-dated, eligible from the start of time.
    pub fn epoch(spec: ModeSpec) -> Self {
        Self {
            timestamp: DateTime::<Utc>::UNIX_EPOCH.with_timezone(&Local),
            spec,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Whether this policy's instant has passed relative to the frozen `now`.
    ///
    /// The timestamp is shifted back by `now`'s UTC offset before the
    /// comparison; the offset is taken from the frozen instant so every node
    /// in a traversal agrees on it.
    pub fn is_eligible(&self, now: DateTime<Local>) -> bool {
        let offset = Duration::seconds(i64::from(now.offset().fix().local_minus_utc()));
        self.timestamp - offset <= now
    }

    /// The mode expression for a target of the given type.
    pub fn expr_for(&self, is_dir: bool) -> &str {
        self.spec.expr_for(is_dir)
    }

    pub fn spec(&self) -> &ModeSpec {
        &self.spec
    }
}

// Ordering is defined solely by timestamp; the mode declaration never
// participates in comparisons.
impl PartialEq for Policy {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
    }
}

impl Eq for Policy {}

impl PartialOrd for Policy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Policy {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
