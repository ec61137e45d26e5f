//! Main pipeline API
//!
//! This module provides the primary interface for the library. The
//! [`ReadingMeasurePipeline`] struct owns the (repaired) AOI table and
//! runs the full chain: event-to-AOI mapping, fixation annotation, token
//! vocabulary extraction, and word-level aggregation.

use crate::annotate::{annotate_fixations, AnnotatedFixation};
use crate::aoi::repair::repair_word_labels;
use crate::aoi::table::AoiTable;
use crate::aoi::tokens::{word_tokens, WordToken};
use crate::config::PipelineConfig;
use crate::mapping::{map_events, MappedEvent};
use crate::measures::word_table::{build_word_level_table, WordMeasures};
use crate::types::{GazeEvent, Result};

/// The reading measure pipeline - entry point for all computations
///
/// Construction repairs the AOI table's word labels once (unless disabled
/// in the configuration); the table is immutable afterwards. All methods
/// are pure with respect to the pipeline state, so one pipeline can
/// process any number of event tables.
pub struct ReadingMeasurePipeline {
    aois: AoiTable,
    config: PipelineConfig,
}

/// Statistics about the loaded AOI table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Number of AOI rows
    pub num_aois: usize,
    /// Number of word tokens in the vocabulary
    pub num_tokens: usize,
    /// Whether the AOI table defines a trial column
    pub has_trial: bool,
    /// Whether the AOI table defines a page column
    pub has_page: bool,
}

impl ReadingMeasurePipeline {
    /// Create a pipeline over an AOI table.
    ///
    /// # Example
    /// ```
    /// use reading_measures::{AoiTable, PipelineConfig, ReadingMeasurePipeline};
    ///
    /// let pipeline = ReadingMeasurePipeline::new(AoiTable::new(vec![]), PipelineConfig::new());
    /// assert_eq!(pipeline.stats().num_aois, 0);
    /// ```
    pub fn new(aois: AoiTable, config: PipelineConfig) -> Self {
        let aois = if config.repair_labels {
            repair_word_labels(&aois)
        } else {
            aois
        };
        Self { aois, config }
    }

    /// The (repaired) AOI table this pipeline operates on.
    pub fn aois(&self) -> &AoiTable {
        &self.aois
    }

    /// Statistics about the AOI table and its vocabulary.
    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            num_aois: self.aois.len(),
            num_tokens: self.tokens().len(),
            has_trial: self.aois.has_trial(),
            has_page: self.aois.has_page(),
        }
    }

    /// Map every event onto the AOI occupying its location.
    pub fn map(&self, events: &[GazeEvent]) -> Result<Vec<MappedEvent>> {
        map_events(&self.effective_events(events), &self.aois, &self.config)
    }

    /// Map events and annotate the resulting fixations with run- and
    /// pass-level reading state.
    pub fn annotate(&self, events: &[GazeEvent]) -> Result<Vec<AnnotatedFixation>> {
        let mapped = self.map(events)?;
        annotate_fixations(&mapped, &self.config)
    }

    /// The token vocabulary of the AOI table: one entry per word unit,
    /// fixated or not.
    pub fn tokens(&self) -> Vec<WordToken> {
        word_tokens(&self.aois, self.config.trial.as_deref())
    }

    /// Run the full pipeline: map, annotate, and aggregate into the
    /// word-level measures table.
    pub fn process(&self, events: &[GazeEvent]) -> Result<Vec<WordMeasures>> {
        log::debug!("processing {} events", events.len());
        let fix = self.annotate(events)?;
        build_word_level_table(&self.tokens(), &fix)
    }

    /// Attach the configured trial identifier to events that lack one, so
    /// fixation keys line up with the vocabulary keys.
    fn effective_events(&self, events: &[GazeEvent]) -> Vec<GazeEvent> {
        let Some(trial) = &self.config.trial else {
            return events.to_vec();
        };
        events
            .iter()
            .map(|event| {
                let mut event = event.clone();
                if event.trial.is_none() {
                    event.trial = Some(trial.clone());
                }
                event
            })
            .collect()
    }
}
