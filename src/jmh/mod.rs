// src/jmh/mod.rs
pub mod classify;
pub mod table;

// Re-export key table types for convenience
pub use classify::classify;
pub use table::{extract_first_table, ResultTable, TableFormat};
