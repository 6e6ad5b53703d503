//! Extractor types
//!
//! Per-source outcomes and run statistics.

use crate::pagination::StopReason;

/// What happened to one source during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    /// Source name
    pub name: String,
    /// Object name the collection was (or would have been) written as
    pub object_name: String,
    /// Items fetched
    pub items: usize,
    /// Pages fetched
    pub pages: u32,
    /// Why paging stopped, if fetching completed
    pub stop: Option<StopReason>,
    /// Whether the sink wrote the object
    pub saved: bool,
    /// Error that aborted this source
    pub error: Option<String>,
}

impl SourceOutcome {
    /// Create an outcome for a source that failed before it could be written
    pub fn failed(
        name: impl Into<String>,
        object_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            object_name: object_name.into(),
            items: 0,
            pages: 0,
            stop: None,
            saved: false,
            error: Some(error.into()),
        }
    }

    /// Whether this source raised an error
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Whether paging ended early on a failed request
    pub fn is_partial(&self) -> bool {
        self.stop == Some(StopReason::TransportError)
    }
}

/// Summary of an extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractSummary {
    /// Object name prefix used for the run
    pub prefix: String,
    /// One outcome per source, in processing order
    pub outcomes: Vec<SourceOutcome>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ExtractSummary {
    /// Create an empty summary for `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Record an outcome
    pub fn push(&mut self, outcome: SourceOutcome) {
        self.outcomes.push(outcome);
    }

    /// Look up the outcome for a source
    pub fn get(&self, name: &str) -> Option<&SourceOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// Total items fetched across sources
    pub fn total_items(&self) -> usize {
        self.outcomes.iter().map(|o| o.items).sum()
    }

    /// Number of sources written successfully
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.saved).count()
    }

    /// Number of sources that raised an error
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
