//! Ring buffer for trace records.

use std::collections::{BTreeMap, VecDeque};

use super::record::{TraceEvent, TraceRecord};

// =============================================================================
// Trace Buffer
// =============================================================================

/// A bounded buffer of trace records.
///
/// When full, the oldest record is discarded. Record ids keep increasing,
/// so a gap at the front shows how much was lost.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    /// The records, oldest first.
    records: VecDeque<TraceRecord>,
    /// Maximum number of records to store.
    max_size: usize,
    /// Next record id to assign.
    next_id: u64,
    /// Records evicted so far.
    dropped: usize,
}

impl TraceBuffer {
    /// Creates a buffer holding at most `max_size` records.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_size.min(256)),
            max_size,
            next_id: 0,
            dropped: 0,
        }
    }

    /// Appends an event, returning its record id.
    pub fn push(&mut self, depth: usize, event: TraceEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push_back(TraceRecord::new(id, depth, event));

        while self.records.len() > self.max_size {
            self.records.pop_front();
            self.dropped += 1;
        }
        id
    }

    /// Returns the number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records evicted.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Returns all records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Returns the most recent `count` records.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let start = self.records.len().saturating_sub(count);
        self.records.iter().skip(start).collect()
    }

    /// Returns records matching a predicate.
    pub fn filter<F>(&self, predicate: F) -> Vec<&TraceRecord>
    where
        F: Fn(&TraceRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Returns records of one event type.
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.filter(|r| r.event_type() == event_type)
    }

    /// Returns the error records.
    #[must_use]
    pub fn errors(&self) -> Vec<&TraceRecord> {
        self.filter(|r| matches!(r.event, TraceEvent::Error { .. }))
    }

    /// Returns statistics about the buffer.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        let mut event_counts = BTreeMap::new();
        for record in &self.records {
            *event_counts.entry(record.event_type()).or_insert(0) += 1;
        }

        TraceBufferStats {
            record_count: self.records.len(),
            max_size: self.max_size,
            dropped: self.dropped,
            max_depth: self.records.iter().map(|r| r.depth).max().unwrap_or(0),
            event_counts,
        }
    }
}

// =============================================================================
// Buffer Statistics
// =============================================================================

/// Statistics about a trace buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceBufferStats {
    /// Number of records held.
    pub record_count: usize,
    /// Buffer capacity.
    pub max_size: usize,
    /// Number of records evicted.
    pub dropped: usize,
    /// Deepest depth recorded.
    pub max_depth: usize,
    /// Count of each event type.
    pub event_counts: BTreeMap<&'static str, usize>,
}

// =============================================================================
// Tests
// =============================================================================
