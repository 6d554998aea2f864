//! RestoIQ Extract: turns a free-form business query into a typed field map.

pub mod extract;

pub use extract::tabular::{detect_tabular_block, TabularBlock};
pub use extract::{extract_fields, Extraction, FieldExtractor};
