use std::fs::File;
use std::path::{Path, PathBuf};

use super::writer_utils::open_for_append;
use super::{ResultRow, ResultSink, SinkError, RESULT_COLUMNS};

/// Appends result rows to a CSV file.
///
/// The header is written only when the file is new or empty, so several
/// sweeps can accumulate into one file.
pub struct CsvResultSink {
    path: PathBuf,
    wtr: csv::Writer<File>,
}

impl CsvResultSink {
    /// Opens `path` for appending, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the header cannot be written.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let (file, has_content) = open_for_append(&path)?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if !has_content {
            wtr.write_record(RESULT_COLUMNS)?;
            wtr.flush()?;
        }

        Ok(Self { path, wtr })
    }

    /// File the rows are appended to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvResultSink {
    fn print(&mut self, row: &ResultRow) -> Result<(), SinkError> {
        self.wtr.write_record(row.fields())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::PerformanceSnapshot;
    use sweep_core::Combination;

    fn row(identifier: &str) -> ResultRow {
        ResultRow::new(
            identifier,
            Combination::new(3, 10000, 20000),
            PerformanceSnapshot::default(),
        )
    }

    #[test]
    fn header_is_written_once_across_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let mut first = CsvResultSink::open(&path).unwrap();
        first.print(&row("run-0")).unwrap();
        first.flush().unwrap();
        drop(first);

        let mut second = CsvResultSink::open(&path).unwrap();
        second.print(&row("run-1")).unwrap();
        second.flush().unwrap();
        drop(second);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), RESULT_COLUMNS.to_vec());

        let ids: Vec<String> = reader
            .records()
            .map(|record| record.unwrap()[1].to_string())
            .collect();
        assert_eq!(ids, vec!["run-0", "run-1"]);
    }

    #[test]
    fn existing_content_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "earlier,row\n").unwrap();

        let mut sink = CsvResultSink::open(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        sink.print(&row("run-2")).unwrap();
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier,row\n"));
        assert!(!contents.contains("StudyUID"));
        assert!(contents.contains("run-2"));
    }
}
