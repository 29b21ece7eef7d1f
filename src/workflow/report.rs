use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::Result;
use crate::inventory::Finding;

const BAR_WIDTH: usize = 102;

/// One appended plain-text block per profiling execution that turned up
/// mismatches. Operators read these directly; keep the format line-oriented.
#[derive(Debug)]
pub struct MismatchReport<'a> {
    pub host: &'a str,
    pub job_id: i64,
    pub date: NaiveDate,
    pub findings: &'a [Finding],
}

impl MismatchReport<'_> {
    pub fn file_name(&self) -> String {
        format!("j{}_D{}.txt", self.job_id, self.date)
    }

    /// Append the block to `<dir>/j<jobId>_D<date>.txt`, creating the
    /// directory and file as needed, and return the report path.
    pub fn append_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", "=".repeat(BAR_WIDTH))?;
        writeln!(file, "Engine: {}", self.host)?;
        writeln!(file, "Job ID: {}", self.job_id)?;
        writeln!(file, "Date of Profiling: {}", self.date)?;
        writeln!(file, "{}", ".".repeat(BAR_WIDTH))?;
        for finding in self.findings {
            writeln!(file, "{finding}")?;
        }
        writeln!(file)?;

        Ok(path)
    }
}
