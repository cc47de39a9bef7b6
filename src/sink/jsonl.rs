//! JSON-lines record export

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::ResultSink;
use crate::learning::ResultRecord;
use crate::metrics::RunSummary;

/// Writes one JSON object per record to a file
pub struct JsonlSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl JsonlSink {
    /// Create (or truncate) the output file
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context("Failed to create record output directory")?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create record file {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }
}

impl ResultSink for JsonlSink {
    fn accept(&mut self, record: ResultRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        self.writer.flush().context("Failed to flush record file")?;
        info!("Wrote {} records to {:?}", self.written, self.path);
        Ok(())
    }
}
