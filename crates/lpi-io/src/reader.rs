//! CSV sequence reader with full input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lpi_distance::Sequence;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{Dataset, SequenceId};

/// Reads a collection of sequences from a CSV file.
///
/// Expected CSV format:
/// - Header row required: `id,t0,t1,...,tn` (only the column count matters)
/// - One row per sequence; every row has as many columns as the header
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows, or a header with no sample columns |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::MissingId`] | Id cell is empty |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
/// | [`IoError::DuplicateId`] | Same id appears twice |
pub struct SequenceReader {
    path: PathBuf,
}

impl SequenceReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets short or long rows through so that
        // InconsistentRowLength fires instead of a generic CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");
        if expected_cols < 2 {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let mut ids = Vec::new();
        let mut series = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            let id = record.get(0).unwrap_or("").to_string();
            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    id,
                    expected: expected_cols,
                    got: record.len(),
                });
            }
            if id.is_empty() {
                return Err(IoError::MissingId {
                    path: self.path.clone(),
                    row_index,
                });
            }
            if let Some(&first_row) = seen.get(&id) {
                return Err(IoError::DuplicateId {
                    path: self.path.clone(),
                    id,
                    first_row,
                    second_row: row_index,
                });
            }
            seen.insert(id.clone(), row_index);

            let mut values = Vec::with_capacity(expected_cols - 1);
            for (col_index, raw) in record.iter().skip(1).enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    })?;
                values.push(value);
            }

            // Non-empty and finite were checked above.
            let sequence = Sequence::new(values).map_err(|_| IoError::EmptyDataset {
                path: self.path.clone(),
            })?;

            ids.push(SequenceId::new(id));
            series.push(sequence);
        }

        if ids.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_sequences = ids.len(),
            n_samples = expected_cols - 1,
            "dataset loaded"
        );

        Ok(Dataset { ids, series })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_dataset() {
        let csv = "id,t0,t1,t2,t3\nmon,0.0,1.0,0.0,0.0\ntue,0.0,0.0,1.0,0.0\nwed,0.0,0.0,0.0,1.0\n";
        let f = write_csv(csv);
        let ds = SequenceReader::new(f.path()).read().unwrap();
        assert_eq!(ds.ids.len(), 3);
        assert_eq!(ds.series.len(), 3);
        assert_eq!(ds.ids[0].as_str(), "mon");
        assert_eq!(ds.series[2].as_ref(), &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn whitespace_around_cells_is_ignored() {
        let csv = "id, t0, t1\n a , 1.5 , 2.5\n";
        let f = write_csv(csv);
        let ds = SequenceReader::new(f.path()).read().unwrap();
        assert_eq!(ds.ids[0].as_str(), "a");
        assert_eq!(ds.series[0].as_ref(), &[1.5, 2.5]);
    }

    #[test]
    fn insertion_order_preserved() {
        let csv = "id,t0\nZZZ,1.0\nAAA,2.0\nMMM,3.0\n";
        let f = write_csv(csv);
        let ds = SequenceReader::new(f.path()).read().unwrap();
        let ids: Vec<_> = ds.ids.iter().map(SequenceId::as_str).collect();
        assert_eq!(ids, ["ZZZ", "AAA", "MMM"]);
    }

    #[test]
    fn error_file_not_found() {
        let result = SequenceReader::new(Path::new("/nonexistent/file.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("id,t0,t1,t2\n");
        let result = SequenceReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_no_sample_columns() {
        let f = write_csv("id\na\nb\n");
        let result = SequenceReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_inconsistent_row_length() {
        let f = write_csv("id,t0,t1,t2\nB01,1.0,2.0,3.0\nB02,1.0,2.0\n");
        let result = SequenceReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::InconsistentRowLength { row_index: 1, expected: 4, got: 3, .. })
        ));
    }

    #[test]
    fn error_missing_id() {
        let f = write_csv("id,t0\na,1.0\n,2.0\n");
        let result = SequenceReader::new(f.path()).read();
        assert!(matches!(result, Err(IoError::MissingId { row_index: 1, .. })));
    }

    #[test]
    fn error_non_finite_values() {
        for bad in ["NaN", "inf", "-Inf", "abc", ""] {
            let f = write_csv(&format!("id,t0,t1\nB01,1.0,{bad}\n"));
            let result = SequenceReader::new(f.path()).read();
            assert!(
                matches!(result, Err(IoError::NonFiniteValue { row_index: 0, col_index: 1, .. })),
                "value {bad:?} accepted"
            );
        }
    }

    #[test]
    fn error_duplicate_id() {
        let f = write_csv("id,t0,t1\nB01,1.0,2.0\nB02,3.0,4.0\nB01,5.0,6.0\n");
        let result = SequenceReader::new(f.path()).read();
        assert!(matches!(
            result,
            Err(IoError::DuplicateId {
                first_row: 0,
                second_row: 2,
                ..
            })
        ));
    }
}
