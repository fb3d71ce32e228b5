//! End-to-end integration tests: CSV -> pairwise/mean -> JSON -> deserialize.

use std::fs;
use std::path::{Path, PathBuf};

use lpi_distance::{Lpi, MeanConfig};
use lpi_io::{ExperimentName, IoError, ResultWriter, SequenceReader};
use tempfile::TempDir;

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn pairwise_round_trip() {
    // 1. Read CSV: five hourly load profiles, house_b/c/e are shifted copies of
    //    house_a and house_d is a scaled copy.
    let dataset = SequenceReader::new(&fixture_path("profiles_5x24.csv"))
        .read()
        .expect("fixture should parse");
    assert_eq!(dataset.len(), 5);

    // 2. Pairwise matrix and medoid
    let lpi = Lpi::new(1);
    let views = dataset.views();
    let matrix = lpi.pairwise(&views).unwrap();
    let medoid = lpi.medoid(&views).unwrap();
    assert_eq!(dataset.ids[medoid.index].as_str(), "house_a");

    // 3. Write JSON artifact
    let dir = TempDir::new().unwrap();
    let experiment = ExperimentName::new("pairwise_rt".into()).unwrap();
    let writer = ResultWriter::new(dir.path(), experiment).unwrap();
    let path = writer
        .write_pairwise(&dataset.ids, &lpi, &matrix, &medoid)
        .unwrap();

    // 4. Deserialize back and verify
    let content = read_json(&path);
    assert_eq!(content["experiment"], "pairwise_rt");
    assert_eq!(content["medoid"], "house_a");

    let ids: Vec<&str> = content["ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(ids, ["house_a", "house_b", "house_c", "house_d", "house_e"]);

    let rows = content["matrix"].as_array().unwrap();
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_array().unwrap();
        assert_eq!(row.len(), 5);
        assert_eq!(row[i].as_f64().unwrap(), 0.0, "diagonal entry {i}");
        for value in row {
            assert!(value.as_f64().unwrap() >= 0.0);
        }
    }

    // Row sums in the artifact agree with the matrix rows
    let sums = content["row_sums"].as_array().unwrap();
    for (row, sum) in rows.iter().zip(sums) {
        let total: f64 = row.as_array().unwrap().iter().map(|v| v.as_f64().unwrap()).sum();
        assert!((total - sum.as_f64().unwrap()).abs() < 1e-9);
    }
}

#[test]
fn mean_round_trip() {
    let dataset = SequenceReader::new(&fixture_path("profiles_5x24.csv"))
        .read()
        .unwrap();

    let config = MeanConfig::new(1).with_max_iter(5);
    let result = config.average(&dataset.views()).unwrap();

    let dir = TempDir::new().unwrap();
    let experiment = ExperimentName::new("mean_rt".into()).unwrap();
    let writer = ResultWriter::new(dir.path(), experiment).unwrap();
    let path = writer.write_mean(&dataset.ids, &config, &result).unwrap();
    assert_eq!(path, dir.path().join("mean_rt_mean.json"));

    let content = read_json(&path);
    assert_eq!(content["medoid"], "house_a");
    assert_eq!(content["omega"], 1);
    assert_eq!(content["max_iter"], 5);
    assert_eq!(content["iterations"], 5);
    assert_eq!(content["converged"], false);

    let center = content["center"].as_array().unwrap();
    assert_eq!(center.len(), 24);
    for (value, expected) in center.iter().zip(result.center.as_ref()) {
        assert!((value.as_f64().unwrap() - expected).abs() < 1e-12);
    }
}

#[test]
fn lookup_reference_and_candidate() {
    let dataset = SequenceReader::new(&fixture_path("profiles_5x24.csv"))
        .read()
        .unwrap();
    let reference = dataset.get("house_a").unwrap();
    let candidate = dataset.get("house_d").unwrap();

    let lpi = Lpi::new(1);
    let d = lpi.distance(candidate, reference).unwrap().value();
    assert!(d > 0.0);
    assert!(matches!(dataset.get("house_z"), Err(IoError::UnknownId { .. })));
}

#[test]
fn invalid_fixtures_are_rejected() {
    let ragged = SequenceReader::new(&fixture_path("ragged.csv")).read();
    assert!(matches!(
        ragged,
        Err(IoError::InconsistentRowLength { row_index: 1, .. })
    ));

    let non_finite = SequenceReader::new(&fixture_path("non_finite.csv")).read();
    assert!(matches!(
        non_finite,
        Err(IoError::NonFiniteValue { row_index: 1, col_index: 1, .. })
    ));
}
