//! Core types for the reading measures library
//!
//! This module defines the fundamental types that flow through the pipeline:
//! gaze events as produced by an event detector, their locations, the keys
//! used to partition data into independent reading sequences, and the error
//! type shared by all stages. Each pipeline stage consumes and produces
//! immutable rows - no stage mutates its input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the pipeline (integer sample time, e.g. ms)
pub type Timestamp = i64;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Errors that can occur during measure computation
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    /// The AOI table or annotator partitions by a grouping column that the
    /// event row does not provide. Indicates caller misconfiguration.
    #[error("grouping column '{column}' is in use but missing from the event row")]
    MissingGroupKey {
        /// Name of the missing grouping column
        column: &'static str,
    },

    /// A required column is absent from an input table.
    #[error("required column '{column}' is missing from the {table} table")]
    MissingColumn {
        /// Table the column was expected in
        table: &'static str,
        /// Name of the missing column
        column: &'static str,
    },

    /// The AOI geometry does not define an upper bound on some axis.
    #[error("invalid AOI geometry: {0}")]
    InvalidGeometry(String),

    /// A measure name passed to the registry is not recognized.
    #[error("unknown reading measure: '{0}'")]
    UnknownMeasure(String),
}

/// A 2D gaze coordinate in stimulus space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f64,
    pub y: f64,
}

impl GazePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Spatial location of a gaze event
///
/// Event detectors emit either a single mean position or a nested
/// per-eye structure. The mapper flattens `Binocular` locations to the
/// configured eye for AOI lookup; whether the nested representation is
/// reinstated afterwards is controlled by `preserve_structure` (see
/// [`crate::config::PipelineConfig`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventLocation {
    /// A flat mean position
    Point(GazePoint),
    /// Separate positions for the left and right eye
    Binocular {
        left: GazePoint,
        right: GazePoint,
    },
}

impl EventLocation {
    /// Resolve this location to a single point for the given eye.
    ///
    /// A flat `Point` ignores the eye selection; a `Binocular` location
    /// picks the requested component.
    pub fn resolve(&self, eye: Eye) -> GazePoint {
        match self {
            EventLocation::Point(p) => *p,
            EventLocation::Binocular { left, right } => match eye {
                Eye::Left => *left,
                Eye::Right => *right,
            },
        }
    }
}

/// Which eye to use when flattening binocular gaze locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eye {
    Left,
    #[default]
    Right,
}

impl fmt::Display for Eye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eye::Left => write!(f, "left"),
            Eye::Right => write!(f, "right"),
        }
    }
}

/// A gaze event as produced by an event detector (external collaborator)
///
/// Invariant: `onset <= offset`; the event duration is `offset - onset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazeEvent {
    /// Event type tag (e.g. "fixation", "saccade")
    pub name: String,
    /// Onset timestamp
    pub onset: Timestamp,
    /// Offset timestamp
    pub offset: Timestamp,
    /// Trial identifier, if the recording is partitioned into trials
    pub trial: Option<String>,
    /// Page identifier, if the stimulus is partitioned into pages
    pub page: Option<String>,
    /// Spatial location (e.g. mean fixation position)
    pub location: Option<EventLocation>,
}

impl GazeEvent {
    /// Create a fixation event with a flat mean position.
    pub fn fixation(onset: Timestamp, offset: Timestamp, x: f64, y: f64) -> Self {
        Self {
            name: "fixation".to_string(),
            onset,
            offset,
            trial: None,
            page: None,
            location: Some(EventLocation::Point(GazePoint::new(x, y))),
        }
    }

    /// Event duration (`offset - onset`)
    pub fn duration(&self) -> Timestamp {
        self.offset - self.onset
    }
}

/// Key identifying one word unit: `(trial, page, word_idx)`
///
/// All word-level aggregations group by this key. `Option` fields are
/// `None` when the corresponding grouping column is absent from the data;
/// the derived `Ord` gives measure outputs a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordKey {
    pub trial: Option<String>,
    pub page: Option<String>,
    pub word_idx: i64,
}

impl WordKey {
    pub fn new(trial: Option<String>, page: Option<String>, word_idx: i64) -> Self {
        Self { trial, page, word_idx }
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(trial={}, page={}, word_idx={})",
            self.trial.as_deref().unwrap_or("-"),
            self.page.as_deref().unwrap_or("-"),
            self.word_idx,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_duration() {
        let event = GazeEvent::fixation(100, 350, 10.0, 20.0);
        assert_eq!(event.duration(), 250);
        assert_eq!(event.name, "fixation");
    }

    #[test]
    fn test_location_resolve() {
        let flat = EventLocation::Point(GazePoint::new(1.0, 2.0));
        assert_eq!(flat.resolve(Eye::Left), GazePoint::new(1.0, 2.0));
        assert_eq!(flat.resolve(Eye::Right), GazePoint::new(1.0, 2.0));

        let bino = EventLocation::Binocular {
            left: GazePoint::new(1.0, 2.0),
            right: GazePoint::new(3.0, 4.0),
        };
        assert_eq!(bino.resolve(Eye::Left), GazePoint::new(1.0, 2.0));
        assert_eq!(bino.resolve(Eye::Right), GazePoint::new(3.0, 4.0));
    }

    #[test]
    fn test_word_key_ordering() {
        let a = WordKey::new(Some("t1".into()), Some("p1".into()), 0);
        let b = WordKey::new(Some("t1".into()), Some("p1".into()), 1);
        assert!(a < b);
    }

    #[test]
    fn test_error_messages_name_offender() {
        let err = MeasureError::MissingGroupKey { column: "trial" };
        assert!(err.to_string().contains("'trial'"));

        let err = MeasureError::UnknownMeasure("XYZ".to_string());
        assert!(err.to_string().contains("'XYZ'"));
    }
}
