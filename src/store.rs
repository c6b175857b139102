use std::collections::BTreeMap;

use crate::history::HistoryLog;
use crate::theme::Theme;

/// Mistyped-key counts accumulated across sessions until cleared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyHeatmap {
    counts: BTreeMap<char, usize>,
}

impl KeyHeatmap {
    pub fn record(&mut self, key: char) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn count(&self, key: char) -> usize {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Highest count, never below 1 so it can be used as a divisor
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0).max(1)
    }

    /// Share of the worst key's count, in [0, 1]
    pub fn intensity(&self, key: char) -> f64 {
        self.count(key) as f64 / self.max_count() as f64
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Process-scoped state shared by the engine and the presentation layer.
/// Created empty at startup and dropped at exit.
#[derive(Debug, Clone, Default)]
pub struct AppStore {
    pub history: HistoryLog,
    pub heatmap: KeyHeatmap,
    pub theme: Theme,
}

impl AppStore {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heatmap_counts_and_intensity() {
        let mut heatmap = KeyHeatmap::default();
        heatmap.record('a');
        heatmap.record('a');
        heatmap.record('s');

        assert_eq!(heatmap.count('a'), 2);
        assert_eq!(heatmap.count('z'), 0);
        assert_eq!(heatmap.total(), 3);
        assert_eq!(heatmap.intensity('a'), 1.0);
        assert_eq!(heatmap.intensity('s'), 0.5);
    }

    #[test]
    fn empty_heatmap_has_unit_divisor() {
        let heatmap = KeyHeatmap::default();
        assert_eq!(heatmap.max_count(), 1);
        assert_eq!(heatmap.intensity('q'), 0.0);
    }

    #[test]
    fn clear_empties_heatmap() {
        let mut heatmap = KeyHeatmap::default();
        heatmap.record('k');
        heatmap.clear();
        assert_eq!(heatmap, KeyHeatmap::default());
    }

    #[test]
    fn new_store_is_empty() {
        let store = AppStore::new(Theme::Ocean);
        assert!(store.history.is_empty());
        assert_eq!(store.heatmap.total(), 0);
        assert_eq!(store.theme, Theme::Ocean);
    }
}
