//! Reading measures
//!
//! Individual word-level reading measures over the annotated fixation
//! table, a name-based registry for dispatching them, and the word-level
//! aggregator joining every measure onto the token vocabulary.

pub mod functions;
pub mod registry;
pub mod word_table;

pub use registry::{compute_measure, measure_names, MeasureFn};
pub use word_table::{build_word_level_table, WordMeasures};
