//! JSON result writer for pairwise and mean outputs.

use std::fs;
use std::path::{Path, PathBuf};

use lpi_distance::{AssignmentSolver, DistanceMatrix, Lpi, MeanConfig, MeanResult, Medoid};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, SequenceId};

/// Writes LPI results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_pairwise.json` and
/// `{experiment}_mean.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Path of the pairwise artifact.
    #[must_use]
    pub fn pairwise_path(&self) -> PathBuf {
        self.artifact_path("pairwise")
    }

    /// Path of the mean artifact.
    #[must_use]
    pub fn mean_path(&self) -> PathBuf {
        self.artifact_path("mean")
    }

    /// Write a pairwise distance matrix and its medoid to `{experiment}_pairwise.json`.
    ///
    /// Row `i` of `matrix` holds the distances of every sequence aligned onto
    /// `ids[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] if the artifact
    /// cannot be produced.
    #[instrument(skip_all, fields(n = ids.len()))]
    pub fn write_pairwise<S: AssignmentSolver>(
        &self,
        ids: &[SequenceId],
        lpi: &Lpi<S>,
        matrix: &DistanceMatrix,
        medoid: &Medoid,
    ) -> Result<PathBuf, IoError> {
        let artifact = PairwiseArtifact {
            experiment: self.experiment.as_str(),
            omega: lpi.window().omega(),
            p: lpi.norm().value(),
            ids: ids.iter().map(SequenceId::as_str).collect(),
            matrix: matrix.to_rows(),
            row_sums: matrix.row_sums(),
            max_asymmetry: matrix.max_asymmetry(),
            medoid: ids.get(medoid.index).map(SequenceId::as_str),
            medoid_total_distance: medoid.total_distance,
        };

        let path = self.pairwise_path();
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "pairwise result written");
        Ok(path)
    }

    /// Write a mean result to `{experiment}_mean.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`] if the artifact
    /// cannot be produced.
    #[instrument(skip_all, fields(n = ids.len()))]
    pub fn write_mean<S: AssignmentSolver>(
        &self,
        ids: &[SequenceId],
        config: &MeanConfig<S>,
        result: &MeanResult,
    ) -> Result<PathBuf, IoError> {
        let artifact = MeanArtifact {
            experiment: self.experiment.as_str(),
            omega: config.lpi().window().omega(),
            p: config.lpi().norm().value(),
            max_iter: config.max_iter(),
            tol: config.tol(),
            ids: ids.iter().map(SequenceId::as_str).collect(),
            medoid: ids.get(result.medoid_index).map(SequenceId::as_str),
            iterations: result.iterations,
            converged: result.converged,
            final_delta: result.final_delta,
            center: result.center.as_ref(),
        };

        let path = self.mean_path();
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "mean result written");
        Ok(path)
    }

    fn artifact_path(&self, kind: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.json", self.experiment.as_str()))
    }
}

fn write_json<T: Serialize>(path: &Path, artifact: &T) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct PairwiseArtifact<'a> {
    experiment: &'a str,
    omega: usize,
    p: f64,
    ids: Vec<&'a str>,
    matrix: Vec<Vec<f64>>,
    row_sums: Vec<f64>,
    max_asymmetry: f64,
    medoid: Option<&'a str>,
    medoid_total_distance: f64,
}

#[derive(Serialize)]
struct MeanArtifact<'a> {
    experiment: &'a str,
    omega: usize,
    p: f64,
    max_iter: usize,
    tol: Option<f64>,
    ids: Vec<&'a str>,
    medoid: Option<&'a str>,
    iterations: usize,
    converged: bool,
    final_delta: f64,
    center: &'a [f64],
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpi_distance::{NormOrder, Sequence};
    use tempfile::TempDir;

    fn test_series() -> Vec<Sequence> {
        vec![
            Sequence::new(vec![0.0, 1.0, 0.0, 0.0]).unwrap(),
            Sequence::new(vec![0.0, 0.0, 1.0, 0.0]).unwrap(),
            Sequence::new(vec![0.0, 0.0, 0.0, 1.0]).unwrap(),
        ]
    }

    fn test_ids() -> Vec<SequenceId> {
        ["a", "b", "c"].iter().map(|s| SequenceId::new((*s).into())).collect()
    }

    fn read(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn write_pairwise_json_structure() {
        let dir = TempDir::new().unwrap();
        let experiment = ExperimentName::new("pw_test".into()).unwrap();
        let writer = ResultWriter::new(dir.path(), experiment).unwrap();

        let series = test_series();
        let views: Vec<_> = series.iter().map(Sequence::as_view).collect();
        let lpi = Lpi::new(1);
        let matrix = lpi.pairwise(&views).unwrap();
        let medoid = lpi.medoid(&views).unwrap();

        let path = writer.write_pairwise(&test_ids(), &lpi, &matrix, &medoid).unwrap();
        assert_eq!(path, dir.path().join("pw_test_pairwise.json"));

        let content = read(&path);
        assert_eq!(content["experiment"], "pw_test");
        assert_eq!(content["omega"], 1);
        assert_eq!(content["p"], 2.0);
        assert_eq!(content["ids"].as_array().unwrap().len(), 3);
        let rows = content["matrix"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.as_array().unwrap().len() == 3));
        assert_eq!(content["row_sums"].as_array().unwrap().len(), 3);
        assert_eq!(content["medoid"], "b");
        assert!(content["max_asymmetry"].is_number());
    }

    #[test]
    fn write_mean_json_structure() {
        let dir = TempDir::new().unwrap();
        let experiment = ExperimentName::new("mean_test".into()).unwrap();
        let writer = ResultWriter::new(dir.path(), experiment).unwrap();

        let series = test_series();
        let views: Vec<_> = series.iter().map(Sequence::as_view).collect();
        let config = MeanConfig::new(1).with_max_iter(3).with_norm(NormOrder::L1);
        let result = config.average(&views).unwrap();

        let path = writer.write_mean(&test_ids(), &config, &result).unwrap();
        let content = read(&path);
        assert_eq!(content["experiment"], "mean_test");
        assert_eq!(content["p"], 1.0);
        assert_eq!(content["max_iter"], 3);
        assert!(content["tol"].is_null());
        assert_eq!(content["iterations"], 3);
        assert_eq!(content["converged"], false);
        assert!(content["final_delta"].is_number());
        assert_eq!(content["center"].as_array().unwrap().len(), 4);
        assert!(content["medoid"].is_string());
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("deep");
        let experiment = ExperimentName::new("nested_test".into()).unwrap();
        let writer = ResultWriter::new(&nested, experiment).unwrap();
        assert!(nested.is_dir());
        assert_eq!(writer.mean_path(), nested.join("nested_test_mean.json"));
    }

    #[test]
    fn output_dir_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let experiment = ExperimentName::new("blocked".into()).unwrap();
        let result = ResultWriter::new(&blocker.join("out"), experiment);
        assert!(matches!(result, Err(IoError::OutputDirCreate { .. })));
    }
}
