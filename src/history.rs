use chrono::{DateTime, Local};

use crate::util::{mean, std_dev};

/// Summary of one finished session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub wpm: u32,
    pub accuracy: u32,
    pub completed_at: DateTime<Local>,
}

/// Aggregates shown above the history list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySummary {
    pub sessions: usize,
    pub avg_wpm: f64,
    pub best_wpm: u32,
    pub avg_accuracy: f64,
    pub wpm_std_dev: f64,
}

/// Append-only log of finished sessions for the life of the process
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        tracing::debug!(wpm = entry.wpm, accuracy = entry.accuracy, "history entry appended");
        self.entries.push(entry);
    }

    /// Newest first; the stored order is untouched
    pub fn list_descending(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> + '_ {
        self.entries.iter().rev()
    }

    /// Insertion order, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> Option<HistorySummary> {
        let wpms: Vec<f64> = self.entries.iter().map(|e| e.wpm as f64).collect();
        let accuracies: Vec<f64> = self.entries.iter().map(|e| e.accuracy as f64).collect();

        Some(HistorySummary {
            sessions: self.entries.len(),
            avg_wpm: mean(&wpms)?,
            best_wpm: self.entries.iter().map(|e| e.wpm).max()?,
            avg_accuracy: mean(&accuracies)?,
            wpm_std_dev: std_dev(&wpms)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(wpm: u32, accuracy: u32, offset_secs: i64) -> HistoryEntry {
        HistoryEntry {
            wpm,
            accuracy,
            completed_at: Local::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn starts_empty() {
        let log = HistoryLog::new();
        assert!(log.is_empty());
        assert_eq!(log.list_descending().count(), 0);
        assert!(log.summary().is_none());
    }

    #[test]
    fn descending_view_does_not_mutate_order() {
        let mut log = HistoryLog::new();
        log.append(entry(30, 90, 0));
        log.append(entry(40, 95, 1));
        log.append(entry(50, 100, 2));

        let newest_first: Vec<u32> = log.list_descending().map(|e| e.wpm).collect();
        assert_eq!(newest_first, vec![50, 40, 30]);

        let stored: Vec<u32> = log.entries().iter().map(|e| e.wpm).collect();
        assert_eq!(stored, vec![30, 40, 50]);
        assert_eq!(log.latest().map(|e| e.wpm), Some(50));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut log = HistoryLog::new();
        let e = entry(42, 99, 0);
        log.append(e);
        log.append(e);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn summary_aggregates() {
        let mut log = HistoryLog::new();
        log.append(entry(40, 90, 0));
        log.append(entry(60, 100, 1));

        let summary = log.summary().unwrap();
        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.avg_wpm, 50.0);
        assert_eq!(summary.best_wpm, 60);
        assert_eq!(summary.avg_accuracy, 95.0);
        assert_eq!(summary.wpm_std_dev, 10.0);
    }
}
