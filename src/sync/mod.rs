// src/sync/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::docs::{BlockLocator, BlockMarkers};
use crate::jmh::{classify, ResultTable, TableFormat};
use crate::utils::error::SyncError;

/// What happened to a single file during a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Blocks were rewritten and the file was written back.
    Updated { substitutions: usize },
    /// Blocks were found but already held the current table.
    Unchanged,
    /// Eligible file without any prefixed block.
    NoBlocks,
    /// The table has no rows for the entity this file documents.
    NoMatchingRows,
    /// Missing the begin marker or the mode marker.
    NotCandidate,
    /// Unreadable or not UTF-8 text.
    Undecodable,
}

/// Entity documented by a file: its base name without the extension
/// (`CounterBenchmark.java` -> `CounterBenchmark`).
pub fn entity_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

pub struct Synchronizer {
    format: TableFormat,
    locator: BlockLocator,
    cancel: Option<Arc<AtomicBool>>,
}

impl Synchronizer {
    pub fn new(format: TableFormat, markers: BlockMarkers) -> Result<Self, SyncError> {
        let locator = BlockLocator::new(markers)?;
        Ok(Self {
            format,
            locator,
            cancel: None,
        })
    }

    /// Stops `sync_dir` before the next file once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Syncs every regular file below `root` (hidden files included, symlinks not followed)
    /// and returns the paths that were written.
    pub fn sync_dir<P: AsRef<Path>>(&self, root: P, table: &ResultTable) -> Result<Vec<PathBuf>, SyncError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(SyncError::RootNotFound(root.to_path_buf()));
        }

        let mut updated = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if self.cancelled() {
                return Err(SyncError::Interrupted(updated.len()));
            }

            let path = entry.path();
            let outcome = self.sync_file(path, table)?;
            tracing::debug!("{}: {:?}", path.display(), outcome);
            if let FileOutcome::Updated { substitutions } = outcome {
                tracing::info!(
                    "Updated {}: replaced {} {} block(s)",
                    path.display(),
                    substitutions,
                    self.locator.markers().begin
                );
                updated.push(path.to_path_buf());
            }
        }

        Ok(updated)
    }

    /// Rewrites the blocks of one file with the rows of the entity it documents.
    /// The file is only opened for writing when its text actually changes.
    pub fn sync_file(&self, path: &Path, table: &ResultTable) -> Result<FileOutcome, SyncError> {
        let content = match fs::read(path).map(String::from_utf8) {
            Ok(Ok(content)) => content,
            _ => return Ok(FileOutcome::Undecodable),
        };

        if !self.locator.is_candidate(&content, &self.format.mode_marker) {
            return Ok(FileOutcome::NotCandidate);
        }

        let Some(entity) = entity_name(path) else {
            return Ok(FileOutcome::NoMatchingRows);
        };
        let Some(filtered) = classify(table, entity, &self.format) else {
            return Ok(FileOutcome::NoMatchingRows);
        };

        let rewrite = self.locator.rewrite(&content, &filtered);
        if rewrite.substitutions == 0 {
            return Ok(FileOutcome::NoBlocks);
        }
        if rewrite.text == content {
            return Ok(FileOutcome::Unchanged);
        }

        fs::write(path, rewrite.text).map_err(|source| SyncError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(FileOutcome::Updated {
            substitutions: rewrite.substitutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const HEADER: &str = "Benchmark  Mode  Cnt  Score  Error  Units";

    fn synchronizer() -> Synchronizer {
        Synchronizer::new(TableFormat::default(), BlockMarkers::default()).unwrap()
    }

    fn interleaved_table() -> ResultTable {
        ResultTable::new(
            HEADER,
            vec![
                "A.x  thrpt  100".into(),
                "B.y  thrpt  200".into(),
                "A.z  thrpt  50".into(),
                "C.w  thrpt  7".into(),
            ],
        )
    }

    fn javadoc(class: &str) -> String {
        format!(
            "/**\n * Results:\n *\n * <pre>\n * {h}\n * A.x  thrpt  1\n * B.y  thrpt  2\n * C.w  thrpt  3\n * </pre>\n */\npublic class {c} {{}}\n",
            h = HEADER,
            c = class
        )
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn block_lines(content: &str) -> Vec<String> {
        let start = content.find("<pre>").unwrap();
        let end = content.find("</pre>").unwrap();
        content[start..end]
            .lines()
            .skip(1)
            .map(|l| l.trim_start_matches(" * ").to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    #[test]
    fn test_updates_entity_file_then_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "A.txt", " * <pre>\n * old thrpt\n * </pre>\n");
        let sync = synchronizer();

        let updated = sync.sync_dir(dir.path(), &interleaved_table()).unwrap();
        assert_eq!(updated, vec![path.clone()]);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!(" * <pre>\n * {}\n * A.x  thrpt  100\n * A.z  thrpt  50\n * </pre>\n", HEADER)
        );

        let again = sync.sync_dir(dir.path(), &interleaved_table()).unwrap();
        assert!(again.is_empty());
        assert_eq!(sync.sync_file(&path, &interleaved_table()).unwrap(), FileOutcome::Unchanged);
    }

    #[test]
    fn test_no_cross_contamination_between_entities() {
        let dir = TempDir::new().unwrap();
        for class in ["A", "B", "C"] {
            write(dir.path(), &format!("{}.java", class), &javadoc(class));
        }

        let updated = synchronizer().sync_dir(dir.path(), &interleaved_table()).unwrap();
        assert_eq!(updated.len(), 3);

        let a = block_lines(&fs::read_to_string(dir.path().join("A.java")).unwrap());
        assert_eq!(a, vec![HEADER, "A.x  thrpt  100", "A.z  thrpt  50"]);
        let b = block_lines(&fs::read_to_string(dir.path().join("B.java")).unwrap());
        assert_eq!(b, vec![HEADER, "B.y  thrpt  200"]);
        let c = block_lines(&fs::read_to_string(dir.path().join("C.java")).unwrap());
        assert_eq!(c, vec![HEADER, "C.w  thrpt  7"]);
    }

    #[test]
    fn test_header_only_table_modifies_nothing() {
        let dir = TempDir::new().unwrap();
        let original = javadoc("A");
        let path = write(dir.path(), "A.java", &original);

        let table = ResultTable::new(HEADER, Vec::new());
        let updated = synchronizer().sync_dir(dir.path(), &table).unwrap();
        assert!(updated.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_file_without_rows_for_its_entity_is_untouched() {
        let dir = TempDir::new().unwrap();
        let original = javadoc("GaugeBenchmark");
        let path = write(dir.path(), "GaugeBenchmark.java", &original);

        let sync = synchronizer();
        assert_eq!(sync.sync_file(&path, &interleaved_table()).unwrap(), FileOutcome::NoMatchingRows);
        assert!(sync.sync_dir(dir.path(), &interleaved_table()).unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_walks_nested_and_hidden_files_and_skips_binary() {
        let dir = TempDir::new().unwrap();
        let nested = write(dir.path(), "src/main/java/A.java", &javadoc("A"));
        let hidden = write(dir.path(), ".hidden/B.txt", &javadoc("B"));
        let binary = dir.path().join("C.bin");
        fs::write(&binary, [0xff, 0xfe, 0x00, b'<', b'p', b'r', b'e', b'>']).unwrap();

        let sync = synchronizer();
        assert_eq!(sync.sync_file(&binary, &interleaved_table()).unwrap(), FileOutcome::Undecodable);

        let mut updated = sync.sync_dir(dir.path(), &interleaved_table()).unwrap();
        updated.sort();
        let mut expected = vec![nested, hidden];
        expected.sort();
        assert_eq!(updated, expected);
    }

    #[test]
    fn test_short_circuit_and_missing_blocks() {
        let dir = TempDir::new().unwrap();
        let no_marker = write(dir.path(), "A.md", "A.x thrpt 100 but no block here\n");
        let bare_pre = write(dir.path(), "B.html", "<pre>\nB.y thrpt 1\n</pre>\n");

        let sync = synchronizer();
        assert_eq!(sync.sync_file(&no_marker, &interleaved_table()).unwrap(), FileOutcome::NotCandidate);
        assert_eq!(sync.sync_file(&bare_pre, &interleaved_table()).unwrap(), FileOutcome::NoBlocks);
    }

    #[test]
    fn test_crlf_file_is_rewritten_once_with_crlf() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "A.java", "/**\r\n * <pre>\r\n * old thrpt\r\n * </pre>\r\n */\r\n");
        let sync = synchronizer();

        assert_eq!(sync.sync_dir(dir.path(), &interleaved_table()).unwrap(), vec![path.clone()]);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!(
                "/**\r\n * <pre>\r\n * {}\r\n * A.x  thrpt  100\r\n * A.z  thrpt  50\r\n * </pre>\r\n */\r\n",
                HEADER
            )
        );
        assert!(sync.sync_dir(dir.path(), &interleaved_table()).unwrap().is_empty());
    }

    #[test]
    fn test_cancel_flag_stops_before_writing() {
        let dir = TempDir::new().unwrap();
        let original = javadoc("A");
        let path = write(dir.path(), "A.java", &original);

        let flag = Arc::new(AtomicBool::new(true));
        let sync = synchronizer().with_cancel_flag(flag.clone());
        let err = sync.sync_dir(dir.path(), &interleaved_table()).unwrap_err();
        assert!(matches!(err, SyncError::Interrupted(0)));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);

        flag.store(false, Ordering::SeqCst);
        assert_eq!(sync.sync_dir(dir.path(), &interleaved_table()).unwrap(), vec![path]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = synchronizer()
            .sync_dir(dir.path().join("nope"), &interleaved_table())
            .unwrap_err();
        assert!(matches!(err, SyncError::RootNotFound(_)));
    }

    #[test]
    fn test_entity_name_strips_only_last_extension() {
        assert_eq!(entity_name(Path::new("x/CounterBenchmark.java")), Some("CounterBenchmark"));
        assert_eq!(entity_name(Path::new("A.txt")), Some("A"));
        assert_eq!(entity_name(Path::new("notes.backup.txt")), Some("notes.backup"));
    }
}
