//! Plain-text run report.
use crate::persist::write_atomic;
use crate::version::Version;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_REPORT_FILE: &str = "version_report.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub ignored: usize,
    pub average: Version,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    updates: Vec<String>,
    failures: Vec<String>,
    pub stats: RunStats,
}

impl RunReport {
    pub fn record_update(&mut self, display_path: &str, version: &Version) {
        self.updates.push(format!("{display_path} -> {version}"));
    }

    pub fn record_failure(&mut self, display_path: &str, error: &anyhow::Error) {
        self.failures.push(format!("{display_path} !! {error:#}"));
    }

    pub fn updates(&self) -> &[String] {
        &self.updates
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn render(&self) -> String {
        let mut text = String::new();
        for line in self.updates.iter().chain(&self.failures) {
            text.push_str(line);
            text.push('\n');
        }
        if !text.is_empty() {
            text.push('\n');
        }
        let stats = &self.stats;
        let _ = writeln!(text, "Files processed: {}", stats.processed);
        let _ = writeln!(text, "Files updated: {}", stats.updated);
        if stats.failed > 0 {
            let _ = writeln!(text, "Files failed: {}", stats.failed);
        }
        let _ = writeln!(text, "Average version: {}", stats.average);
        text
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.render().as_bytes())
    }
}
