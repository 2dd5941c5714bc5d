use crate::error::Result;
use crate::page::DependentRow;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Append-only sink writing one `<stem>.txt` file per source repository.
///
/// Files are never truncated or deduplicated; reruns accumulate lines.
pub struct DependentsSink {
    output_dir: PathBuf,
}

impl DependentsSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(DependentsSink { output_dir })
    }

    /// Append one `name, stars` line. The file handle is scoped to the call.
    pub fn append(&self, stem: &str, row: &DependentRow) -> Result<()> {
        let path = self.output_dir.join(format!("{stem}.txt"));
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        writeln!(file, "{}, {}", row.name, row.stars)?;
        Ok(())
    }
}
