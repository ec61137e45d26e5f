//! Pipeline configuration types
//!
//! This module defines the minimal configuration needed by the reading
//! measure pipeline. The pipeline is intentionally simple - dataset
//! loading, event detection, and report generation are handled by the
//! caller.

use serde::{Deserialize, Serialize};

use crate::types::Eye;

/// Configuration for the reading measure pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Event name tag identifying fixations in the event table
    #[serde(default = "default_fixation_name")]
    pub fixation_name: String,

    /// Which eye to use when flattening binocular gaze locations
    #[serde(default)]
    pub eye: Eye,

    /// Whether the mapper reinstates the caller's nested location
    /// representation after lookup (true) or leaves it flattened (false)
    #[serde(default = "default_true")]
    pub preserve_structure: bool,

    /// Whether to repair word labels in the AOI table before mapping
    #[serde(default = "default_true")]
    pub repair_labels: bool,

    /// Partition keys for fixation annotation
    #[serde(default)]
    pub partition: PartitionKeys,

    /// Trial identifier to attach when the AOI table has no trial column
    #[serde(default)]
    pub trial: Option<String>,
}

/// Which grouping columns partition fixations into independent reading
/// sequences (typically one trial per page)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionKeys {
    /// Partition by trial identifier
    #[serde(default = "default_true")]
    pub trial: bool,
    /// Partition by page identifier
    #[serde(default = "default_true")]
    pub page: bool,
}

impl Default for PartitionKeys {
    fn default() -> Self {
        Self { trial: true, page: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_fixation_name() -> String {
    "fixation".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fixation_name: default_fixation_name(),
            eye: Eye::default(),
            preserve_structure: true,
            repair_labels: true,
            partition: PartitionKeys::default(),
            trial: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new pipeline configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the fixation event name tag
    pub fn with_fixation_name(mut self, name: impl Into<String>) -> Self {
        self.fixation_name = name.into();
        self
    }

    /// Builder method: select the eye used for binocular locations
    pub fn with_eye(mut self, eye: Eye) -> Self {
        self.eye = eye;
        self
    }

    /// Builder method: control nested-location restoration after mapping
    pub fn with_preserve_structure(mut self, enabled: bool) -> Self {
        self.preserve_structure = enabled;
        self
    }

    /// Builder method: enable or disable word label repair
    pub fn with_label_repair(mut self, enabled: bool) -> Self {
        self.repair_labels = enabled;
        self
    }

    /// Builder method: set the annotation partition keys
    pub fn with_partition(mut self, partition: PartitionKeys) -> Self {
        self.partition = partition;
        self
    }

    /// Builder method: set the trial identifier for trial-less AOI tables
    pub fn with_trial(mut self, trial: impl Into<String>) -> Self {
        self.trial = Some(trial.into());
        self
    }

    /// Check whether an event row is a fixation under this configuration
    pub fn is_fixation(&self, name: &str) -> bool {
        name == self.fixation_name
    }
}
