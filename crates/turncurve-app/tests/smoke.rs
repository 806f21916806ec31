use std::fs;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::tempdir;

use turncurve_app::chart::render_svg;
use turncurve_app::config::ViewerConfig;
use turncurve_app::dataset;
use turncurve_core::{SampleError, prepare, sample_chart};

const TABLE: &str = "\
Card Name,Turn,Win Rate
Fear of Abduction,2,0.54
Fear of Abduction,3,0.57
Fear of Abduction,4,0.59
Shroudstomper,3,0.55
Shroudstomper,5,0.62
Island,1,0.51
Swamp,2,0.50
";

#[test]
fn table_on_disk_becomes_a_rendered_chart() {
    let dir = tempdir().expect("temp dir");
    let table_path = dir.path().join("winrates.csv");
    fs::write(&table_path, TABLE).expect("write table");

    let config_path = dir.path().join("viewer.yaml");
    let yaml = format!(
        "data:\n  path: \"{}\"\nserver:\n  listen: \"127.0.0.1:0\"\n",
        table_path.display()
    );
    fs::write(&config_path, yaml).expect("write config");

    let config = ViewerConfig::from_path(&config_path).expect("config loads");
    let records = dataset::load(&config.data.path).expect("table loads");
    let prepared = prepare(records, &config.data.exclude);

    // Lands are gone, and every surviving turn has a baseline entry.
    assert_eq!(prepared.dataset.card_names().len(), 2);
    for record in prepared.dataset.records() {
        assert!(!config.data.exclude.contains(&record.card_name));
        assert!(prepared.baseline.contains(record.turn));
    }

    let mut rng = StdRng::seed_from_u64(17);
    let spec = sample_chart(&prepared.dataset, &prepared.baseline, &mut rng).expect("chart spec");
    assert!(
        prepared
            .dataset
            .card_names()
            .contains(&spec.card_name.as_str())
    );
    assert_eq!(spec.y_range, (0.4, 0.7));

    let svg = render_svg(&spec).expect("svg renders");
    assert!(svg.contains(&spec.card_name));
    assert!(svg.contains("Average Win Rate"));
}

#[test]
fn land_only_table_reports_the_empty_state() {
    let dir = tempdir().expect("temp dir");
    let table_path = dir.path().join("lands.csv");
    fs::write(
        &table_path,
        "Card Name,Turn,Win Rate\nIsland,1,0.51\nForest,2,0.49\n",
    )
    .expect("write table");

    let records = dataset::load(&table_path).expect("table loads");
    let prepared = prepare(records, &turncurve_core::BASIC_LANDS);
    assert!(prepared.dataset.is_empty());

    let mut rng = StdRng::seed_from_u64(0);
    let result = sample_chart(&prepared.dataset, &prepared.baseline, &mut rng);
    assert_eq!(result, Err(SampleError::EmptyDataset));
}
