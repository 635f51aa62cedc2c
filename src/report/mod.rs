// src/report/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::utils::error::ReportError;

/// Summary of one synchronization run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub module: String,
    pub mode_marker: String,
    pub table_rows: usize,
    pub updated_files: Vec<String>,
    pub generated_at: String,
}

impl SyncReport {
    pub fn new(module: &Path, mode_marker: &str, table_rows: usize, updated: &[PathBuf]) -> Self {
        Self {
            module: module.display().to_string(),
            mode_marker: mode_marker.to_string(),
            table_rows,
            updated_files: updated.iter().map(|p| p.display().to_string()).collect(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Writes the report as pretty JSON, creating parent directories as needed.
pub fn save_report<P: AsRef<Path>>(report: &SyncReport, path: P) -> Result<PathBuf, ReportError> {
    let file_path = path.as_ref().to_path_buf();

    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(report)
        .map_err(|e| ReportError::SerializationError(e.to_string()))?;
    fs::write(&file_path, json)?;

    tracing::info!("Saved report to {}", file_path.display());
    Ok(file_path)
}
