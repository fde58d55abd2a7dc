//! FileSink - writes batches to disk as NDJSON rows

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use contracts::{AcquisitionError, BatchSink, SampleBatch};
use tracing::{debug, info};

/// Sink that appends one JSON row per sample to a file.
///
/// Rows are `[t_rel_seconds, ch0, ch1, ...]`, the shape the downstream
/// processing stage consumes. NaN channels serialize as `null`.
pub struct FileSink {
    name: String,
    writer: BufWriter<File>,
    rows_written: u64,
}

impl FileSink {
    /// Create the output file, truncating an existing one
    pub fn create(name: impl Into<String>, path: &Path) -> Result<Self, AcquisitionError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;

        debug!(path = %path.display(), "file sink created");
        Ok(Self {
            name: name.into(),
            writer: BufWriter::new(file),
            rows_written: 0,
        })
    }

    /// Rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl BatchSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, batch: &SampleBatch) -> Result<(), AcquisitionError> {
        for row in batch.rows() {
            let line = serde_json::to_string(&row)
                .map_err(|e| AcquisitionError::sink_write(&self.name, e.to_string()))?;
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(b"\n")?;
            self.rows_written += 1;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AcquisitionError> {
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), AcquisitionError> {
        self.writer.flush()?;
        info!(sink = %self.name, rows = self.rows_written, "FileSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use contracts::Sample;

    #[test]
    fn test_file_sink_writes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ndjson");

        let t0 = Utc::now();
        let batch = SampleBatch::new(
            t0,
            vec![
                Sample {
                    time: t0 + TimeDelta::seconds(1),
                    data: vec![0.5, 1.5],
                },
                Sample {
                    time: t0 + TimeDelta::seconds(2),
                    data: vec![0.6, 1.6],
                },
            ],
        );

        let mut sink = FileSink::create("test", &path).unwrap();
        sink.write(&batch).unwrap();
        sink.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[1.0,0.5,1.5]");
        assert_eq!(sink.rows_written(), 2);
    }

    #[test]
    fn test_file_sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.ndjson");

        let sink = FileSink::create("test", &path);
        assert!(sink.is_ok());
        assert!(path.exists());
    }
}
