// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Could not find any \"{marker}\" lines in benchmark output (starts with: {snippet:?})")]
    NoRows { marker: String, snippet: String },
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Module directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid block pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Interrupted by user after {0} updated file(s)")]
    Interrupted(usize),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Command failed: {command}\nExit: {code:?}\nOutput:\n{output}")]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command interrupted by user: {0}")]
    Interrupted(String),

    #[error("No jar found in {dir} (tried: {pattern})")]
    JarNotFound { dir: String, pattern: String },

    #[error("Could not split JMH arguments: {0:?}")]
    InvalidArgs(String),

    #[error("I/O error while running command: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not read runner output from {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Benchmark run failed: {0}")]
    Runner(#[from] RunnerError),

    #[error("Table extraction failed: {0}")]
    Table(#[from] TableError),

    #[error("Synchronization failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}
