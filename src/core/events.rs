//! Structured events emitted while resolving typing results.
//!
//! The resolvers never log directly. They report recoverable conditions to an
//! [`EventSink`] supplied by the caller, which decides where the events go.
//! [`TracingSink`] forwards them to `tracing`; tests use [`CollectingSink`].

use std::sync::Mutex;

use crate::core::types::AnalysisType;

/// A recoverable condition encountered during resolution
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionEvent {
    /// A hit failed to parse and was skipped
    MalformedRecord {
        sample: String,
        analysis: AnalysisType,
        target: String,
        reason: String,
    },

    /// A gene had no entry in a catalogue or lookup table. For scheme
    /// tallies `gene` holds the genus that was missing from the catalogue.
    CatalogueMiss {
        sample: String,
        analysis: AnalysisType,
        gene: String,
    },

    /// A previously written report could not be reused
    PriorReportUnreadable {
        analysis: AnalysisType,
        reason: String,
    },

    /// A sample finished resolving for one analysis
    SampleResolved {
        sample: String,
        analysis: AnalysisType,
        hits: usize,
        calls: usize,
    },
}

/// Receiver for resolution events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ResolutionEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ResolutionEvent) {
        match event {
            ResolutionEvent::MalformedRecord {
                sample,
                analysis,
                target,
                reason,
            } => {
                tracing::warn!(%sample, %analysis, %target, "Skipping malformed hit: {reason}");
            }
            ResolutionEvent::CatalogueMiss {
                sample,
                analysis,
                gene,
            } => {
                tracing::debug!(%sample, %analysis, %gene, "No catalogue entry");
            }
            ResolutionEvent::PriorReportUnreadable { analysis, reason } => {
                tracing::warn!(%analysis, "Ignoring unreadable prior report: {reason}");
            }
            ResolutionEvent::SampleResolved {
                sample,
                analysis,
                hits,
                calls,
            } => {
                tracing::debug!(%sample, %analysis, hits, calls, "Resolved");
            }
        }
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ResolutionEvent) {}
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ResolutionEvent>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    #[must_use]
    pub fn events(&self) -> Vec<ResolutionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn malformed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ResolutionEvent::MalformedRecord { .. }))
            .count()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: ResolutionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
