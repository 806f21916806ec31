use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Basic land names removed from the table before any aggregation. Their
/// presence is near-universal, so they carry no per-card signal.
pub const BASIC_LANDS: [&str; 5] = ["Swamp", "Forest", "Island", "Mountain", "Plains"];

/// One observed (card, turn) win-rate row from the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateRecord {
    pub card_name: String,
    pub turn: u32,
    pub win_rate: f64,
}

impl WinRateRecord {
    pub fn new(card_name: impl Into<String>, turn: u32, win_rate: f64) -> Self {
        Self {
            card_name: card_name.into(),
            turn,
            win_rate,
        }
    }
}

/// Immutable collection of filtered win-rate records, built once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<WinRateRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<WinRateRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[WinRateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct card names in first-appearance order.
    pub fn card_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.card_name.as_str()) {
                names.push(&record.card_name);
            }
        }
        names
    }

    /// All (turn, win rate) points for one card, sorted ascending by turn.
    pub fn series_for(&self, card_name: &str) -> Vec<(u32, f64)> {
        let mut points: Vec<(u32, f64)> = self
            .records
            .iter()
            .filter(|record| record.card_name == card_name)
            .map(|record| (record.turn, record.win_rate))
            .collect();
        points.sort_by_key(|&(turn, _)| turn);
        points
    }
}

/// Turn-indexed mean win rate across every non-land record. Keys iterate in
/// ascending turn order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineCurve {
    means: BTreeMap<u32, f64>,
}

impl BaselineCurve {
    pub fn from_means(means: BTreeMap<u32, f64>) -> Self {
        Self { means }
    }

    pub fn get(&self, turn: u32) -> Option<f64> {
        self.means.get(&turn).copied()
    }

    pub fn contains(&self, turn: u32) -> bool {
        self.means.contains_key(&turn)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.means.iter().map(|(&turn, &mean)| (turn, mean))
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_names_are_distinct_and_keep_first_appearance_order() {
        let dataset = Dataset::from_records(vec![
            WinRateRecord::new("Overlord of the Balemurk", 3, 0.58),
            WinRateRecord::new("Fear of Missing Out", 2, 0.55),
            WinRateRecord::new("Overlord of the Balemurk", 4, 0.60),
        ]);

        assert_eq!(
            dataset.card_names(),
            vec!["Overlord of the Balemurk", "Fear of Missing Out"]
        );
    }

    #[test]
    fn series_for_sorts_by_turn() {
        let dataset = Dataset::from_records(vec![
            WinRateRecord::new("Ghostly Keybearer", 6, 0.61),
            WinRateRecord::new("Ghostly Keybearer", 3, 0.54),
            WinRateRecord::new("Twitching Doll", 4, 0.57),
            WinRateRecord::new("Ghostly Keybearer", 4, 0.56),
        ]);

        assert_eq!(
            dataset.series_for("Ghostly Keybearer"),
            vec![(3, 0.54), (4, 0.56), (6, 0.61)]
        );
    }

    #[test]
    fn baseline_iterates_in_ascending_turn_order() {
        let curve = BaselineCurve::from_means(BTreeMap::from([(5, 0.6), (1, 0.5), (3, 0.55)]));
        let turns: Vec<u32> = curve.iter().map(|(turn, _)| turn).collect();
        assert_eq!(turns, vec![1, 3, 5]);
    }
}
