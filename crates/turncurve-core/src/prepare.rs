use std::collections::BTreeMap;

use crate::model::{BaselineCurve, Dataset, WinRateRecord};

/// Read-only state derived from the raw table, held for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedData {
    pub dataset: Dataset,
    pub baseline: BaselineCurve,
}

/// Drop every record whose card name is in `exclude`, then average the
/// survivors per turn. Runs once at startup; the result is never mutated.
pub fn prepare<S: AsRef<str>>(records: Vec<WinRateRecord>, exclude: &[S]) -> PreparedData {
    let filtered: Vec<WinRateRecord> = records
        .into_iter()
        .filter(|record| {
            !exclude
                .iter()
                .any(|name| name.as_ref() == record.card_name)
        })
        .collect();

    let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in &filtered {
        let entry = sums.entry(record.turn).or_insert((0.0, 0));
        entry.0 += record.win_rate;
        entry.1 += 1;
    }

    let means = sums
        .into_iter()
        .map(|(turn, (sum, count))| (turn, sum / count as f64))
        .collect();

    PreparedData {
        dataset: Dataset::from_records(filtered),
        baseline: BaselineCurve::from_means(means),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BASIC_LANDS;

    fn sample_records() -> Vec<WinRateRecord> {
        vec![
            WinRateRecord::new("Island", 1, 0.52),
            WinRateRecord::new("Fear of Abduction", 1, 0.50),
            WinRateRecord::new("Shroudstomper", 1, 0.70),
            WinRateRecord::new("Fear of Abduction", 2, 0.60),
            WinRateRecord::new("Swamp", 2, 0.49),
        ]
    }

    #[test]
    fn filtering_removes_every_excluded_name() {
        let prepared = prepare(sample_records(), &BASIC_LANDS);
        for record in prepared.dataset.records() {
            assert!(
                !BASIC_LANDS.contains(&record.card_name.as_str()),
                "land '{}' survived the filter",
                record.card_name
            );
        }
        assert_eq!(prepared.dataset.len(), 3);
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = prepare(sample_records(), &BASIC_LANDS);
        let twice = prepare(once.dataset.records().to_vec(), &BASIC_LANDS);
        assert_eq!(once, twice);
    }

    #[test]
    fn baseline_covers_every_turn_in_the_filtered_dataset() {
        let prepared = prepare(sample_records(), &BASIC_LANDS);
        for record in prepared.dataset.records() {
            assert!(
                prepared.baseline.contains(record.turn),
                "no baseline entry for turn {}",
                record.turn
            );
        }
    }

    #[test]
    fn baseline_is_the_per_turn_arithmetic_mean() {
        let records = vec![
            WinRateRecord::new("A", 1, 0.5),
            WinRateRecord::new("B", 1, 0.7),
            WinRateRecord::new("A", 2, 0.6),
        ];
        let prepared = prepare(records, &BASIC_LANDS);

        let turn_one = prepared.baseline.get(1).expect("turn 1 present");
        let turn_two = prepared.baseline.get(2).expect("turn 2 present");
        assert!((turn_one - 0.6).abs() < 1e-12);
        assert!((turn_two - 0.6).abs() < 1e-12);
    }

    #[test]
    fn land_only_input_prepares_to_an_empty_dataset() {
        let records = vec![
            WinRateRecord::new("Plains", 1, 0.51),
            WinRateRecord::new("Mountain", 3, 0.50),
        ];
        let prepared = prepare(records, &BASIC_LANDS);
        assert!(prepared.dataset.is_empty());
        assert!(prepared.baseline.is_empty());
    }
}
