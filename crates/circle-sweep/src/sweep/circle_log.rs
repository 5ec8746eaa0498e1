use circle_sweep_core::CandidateSet;
use serde::{Deserialize, Serialize};

use super::grid::SweepParams;

/// A candidate set the sweep accepted, with the parameters that found it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub params: SweepParams,
    pub candidates: CandidateSet,
}

impl LogEntry {
    /// Strongest accumulator score among the candidates.
    pub fn peak_votes(&self) -> u32 {
        self.candidates.iter().map(|c| c.votes).max().unwrap_or(0)
    }
}

/// Accepted candidate sets in the order the sweep found them. Append-only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircleLog {
    entries: Vec<LogEntry>,
}

impl CircleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// The entry found at the highest vote threshold. Ties go to the higher
    /// accumulator score, then to the earlier entry.
    pub fn best(&self) -> Option<&LogEntry> {
        self.entries.iter().fold(None, |best, entry| match best {
            Some(b)
                if (b.params.vote_threshold, b.peak_votes())
                    >= (entry.params.vote_threshold, entry.peak_votes()) =>
            {
                Some(b)
            }
            _ => Some(entry),
        })
    }
}

impl<'a> IntoIterator for &'a CircleLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
