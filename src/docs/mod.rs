// src/docs/mod.rs
pub mod block;

pub use block::{BlockLocator, BlockMarkers};
