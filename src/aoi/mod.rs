//! Area-of-interest (AOI) tables
//!
//! Character- and word-level AOI geometry with grouping keys, plus the
//! utilities operating on it: point-to-AOI lookup, word label repair, and
//! token vocabulary extraction.

pub mod repair;
pub mod table;
pub mod tokens;

pub use repair::repair_word_labels;
pub use table::{Aoi, AoiHit, AoiQuery, AoiTable};
pub use tokens::{fixated_word_keys, word_tokens, WordToken};
