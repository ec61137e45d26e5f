//! Reading Measures Library
//!
//! A stateless library for computing word-level reading measures from
//! eye-tracking fixation events and text areas of interest (AOIs).
//!
//! # Architecture
//!
//! The library is a chain of pure stages over immutable tabular data:
//! - Repairs word labels in the character-level AOI table
//! - Maps fixation events onto the AOI occupying their location
//! - Annotates fixations with run- and pass-level reading state
//! - Aggregates named reading measures (FFD, FPRT, TFC, ...) onto the
//!   full token vocabulary, skipped words included
//!
//! The library does NOT:
//! - Download datasets or parse raw eye-tracker files
//! - Detect events from gaze samples
//! - Plot or export results
//!
//! Those concerns belong to the surrounding application.
//!
//! # Example Usage
//!
//! ```
//! use reading_measures::{
//!     Aoi, AoiTable, GazeEvent, PipelineConfig, ReadingMeasurePipeline,
//! };
//!
//! // Two word-level AOIs: "The" on [0,30), "quick" on [30,80).
//! let aois = AoiTable::new(vec![
//!     Aoi {
//!         word: Some("The".to_string()),
//!         start_x: 0.0,
//!         start_y: 0.0,
//!         width: Some(30.0),
//!         height: Some(20.0),
//!         word_idx: Some(0),
//!         char_idx: Some(0),
//!         ..Default::default()
//!     },
//!     Aoi {
//!         word: Some("quick".to_string()),
//!         start_x: 30.0,
//!         start_y: 0.0,
//!         width: Some(50.0),
//!         height: Some(20.0),
//!         word_idx: Some(1),
//!         char_idx: Some(4),
//!         ..Default::default()
//!     },
//! ]);
//!
//! let pipeline = ReadingMeasurePipeline::new(aois, PipelineConfig::new());
//!
//! let events = vec![
//!     GazeEvent::fixation(0, 200, 10.0, 10.0),
//!     GazeEvent::fixation(200, 400, 45.0, 10.0),
//! ];
//!
//! let table = pipeline.process(&events).unwrap();
//! assert_eq!(table.len(), 2);
//! assert_eq!(table[0].ffd, 200);
//! assert_eq!(table[1].tfc, 1);
//! ```

// Public modules
pub mod annotate;
pub mod aoi;
pub mod config;
pub mod mapping;
pub mod measures;
pub mod pipeline;
pub mod types;

// Re-export main types for convenience
pub use annotate::{annotate_fixations, AnnotatedFixation};
pub use aoi::{
    repair_word_labels, word_tokens, Aoi, AoiHit, AoiQuery, AoiTable, WordToken,
};
pub use config::{PartitionKeys, PipelineConfig};
pub use mapping::{map_events, MappedEvent};
pub use measures::{build_word_level_table, compute_measure, measure_names, WordMeasures};
pub use pipeline::{PipelineStats, ReadingMeasurePipeline};
pub use types::{
    EventLocation, Eye, GazeEvent, GazePoint, MeasureError, Result, Timestamp, WordKey,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
