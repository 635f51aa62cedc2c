// src/jmh/classify.rs
use crate::jmh::table::{ResultTable, TableFormat};

/// True when `row` is a result row whose leading token is `<entity>.<case>`.
/// The match is case-sensitive and anchored at the start of the line (leading whitespace allowed).
pub fn row_belongs_to(row: &str, entity: &str, format: &TableFormat) -> bool {
    if !format.is_result_row(row) {
        return false;
    }
    row.trim_start()
        .strip_prefix(entity)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Keeps the header and only the rows that belong to `entity`, in their original order.
///
/// Returns `None` when no row matches, so the caller leaves the entity's document alone.
pub fn classify(table: &ResultTable, entity: &str, format: &TableFormat) -> Option<ResultTable> {
    let rows: Vec<String> = table
        .rows
        .iter()
        .filter(|row| row_belongs_to(row, entity, format))
        .cloned()
        .collect();

    if rows.is_empty() {
        tracing::trace!("No \"{}\" rows for {}", format.mode_marker, entity);
        return None;
    }

    tracing::trace!("Classified {} of {} row(s) to {}", rows.len(), table.rows.len(), entity);
    Some(ResultTable::new(table.header.clone(), rows))
}
