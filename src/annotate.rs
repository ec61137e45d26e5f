//! Fixation annotation
//!
//! Derives per-fixation reading state over ordered fixation sequences:
//! run identifiers, first-pass membership, regression direction, and the
//! neighbouring fixated words. Fixations are partitioned into independent
//! reading sequences by the configured grouping keys (typically one trial
//! per page) and ordered by onset within each partition.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::mapping::MappedEvent;
use crate::types::{MeasureError, Result, Timestamp, WordKey};

/// A fixation with its reading-state annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedFixation {
    /// Index of the fixation in the filtered event order
    pub fixation_id: u64,
    /// Trial identifier
    pub trial: Option<String>,
    /// Page identifier
    pub page: Option<String>,
    /// Onset timestamp
    pub onset: Timestamp,
    /// Offset timestamp
    pub offset: Timestamp,
    /// Index of the fixated word (always present; unmapped fixations are
    /// dropped before annotation)
    pub word_idx: i64,
    /// Label of the fixated word
    pub word: Option<String>,
    /// Character index of the fixated character
    pub char_idx: Option<i64>,
    /// 0-based identifier of the run this fixation belongs to; a run is a
    /// maximal contiguous stretch of fixations on the same word index
    pub run_id: u32,
    /// True when this fixation belongs to the earliest run visiting its
    /// word index within the partition
    pub is_first_pass: bool,
    /// Word index of the immediately preceding fixation in the partition
    pub prev_word_idx: Option<i64>,
    /// Word index of the immediately following fixation in the partition
    pub next_word_idx: Option<i64>,
    /// True when the fixation arrives from a higher-index word
    pub is_reg_in: bool,
    /// True when the fixation departs to a lower-index word
    pub is_reg_out: bool,
    /// True when this is the first fixation ever on the word within the
    /// partition
    pub is_first_fix: bool,
}

impl AnnotatedFixation {
    /// Fixation duration (`offset - onset`)
    pub fn duration(&self) -> Timestamp {
        self.offset - self.onset
    }

    /// Word key `(trial, page, word_idx)` of the fixated word.
    pub fn word_key(&self) -> WordKey {
        WordKey::new(self.trial.clone(), self.page.clone(), self.word_idx)
    }
}

/// Partition key: the values of the grouping columns in use
type PartitionValue = (Option<String>, Option<String>);

/// Annotate AOI-mapped fixations with run- and pass-level information.
///
/// Filters `events` down to rows whose name matches the configured
/// fixation tag and that were mapped to a word, partitions them by the
/// configured keys, and derives within each partition (ordered by onset
/// ascending):
///
/// * `run_id` - 0-based counter, incremented whenever the fixated word
///   index differs from the immediately preceding fixation. Returning to
///   a previously visited word starts a new run.
/// * `is_first_pass` - true only for fixations in the earliest run that
///   visits their word index.
/// * `prev_word_idx` / `next_word_idx`, `is_reg_in` / `is_reg_out`,
///   `is_first_fix` - neighbouring-word and regression annotations.
///
/// A grouping key that no fixation carries is excluded from the partition
/// key (grouping degrades to the columns present); a key carried by some
/// fixations but missing from others is a configuration error.
pub fn annotate_fixations(
    events: &[MappedEvent],
    config: &PipelineConfig,
) -> Result<Vec<AnnotatedFixation>> {
    let fixations: Vec<&MappedEvent> = events
        .iter()
        .filter(|e| config.is_fixation(&e.event.name) && e.aoi.word_idx.is_some())
        .collect();

    log::debug!(
        "annotating {} fixations out of {} events",
        fixations.len(),
        events.len()
    );

    // A partition key is in effect when requested and carried by at least
    // one fixation; partially missing keys indicate misconfigured input.
    let use_trial = config.partition.trial && fixations.iter().any(|e| e.event.trial.is_some());
    let use_page = config.partition.page && fixations.iter().any(|e| e.event.page.is_some());
    if use_trial && fixations.iter().any(|e| e.event.trial.is_none()) {
        return Err(MeasureError::MissingGroupKey { column: "trial" });
    }
    if use_page && fixations.iter().any(|e| e.event.page.is_none()) {
        return Err(MeasureError::MissingGroupKey { column: "page" });
    }

    // Partition while keeping the filtered order as fixation_id.
    let mut partitions: BTreeMap<PartitionValue, Vec<(u64, &MappedEvent)>> = BTreeMap::new();
    for (id, fixation) in fixations.into_iter().enumerate() {
        let key = (
            if use_trial { fixation.event.trial.clone() } else { None },
            if use_page { fixation.event.page.clone() } else { None },
        );
        partitions.entry(key).or_default().push((id as u64, fixation));
    }

    let mut annotated = Vec::new();
    for members in partitions.into_values() {
        annotate_partition(members, &mut annotated);
    }

    Ok(annotated)
}

/// Annotate one partition of fixations, ordered by onset ascending.
fn annotate_partition(mut members: Vec<(u64, &MappedEvent)>, out: &mut Vec<AnnotatedFixation>) {
    members.sort_by_key(|(_, e)| e.event.onset);

    let word_indices: Vec<i64> = members
        .iter()
        .map(|(_, e)| e.aoi.word_idx.unwrap_or_default())
        .collect();

    let mut run_id: u32 = 0;
    let mut words_with_runs: HashSet<i64> = HashSet::new();
    let mut words_fixated: HashSet<i64> = HashSet::new();
    let mut current_run_is_first_pass = false;

    for (pos, (fixation_id, fixation)) in members.iter().enumerate() {
        let word_idx = word_indices[pos];
        let prev_word_idx = (pos > 0).then(|| word_indices[pos - 1]);
        let next_word_idx = word_indices.get(pos + 1).copied();

        let new_run = match prev_word_idx {
            None => true,
            Some(prev) => prev != word_idx,
        };
        if new_run {
            if pos > 0 {
                run_id += 1;
            }
            // The run counts as first-pass iff no earlier run visited
            // this word.
            current_run_is_first_pass = words_with_runs.insert(word_idx);
        }

        let is_first_fix = words_fixated.insert(word_idx);
        let is_reg_in = prev_word_idx.is_some_and(|prev| word_idx < prev);
        let is_reg_out = next_word_idx.is_some_and(|next| next < word_idx);

        out.push(AnnotatedFixation {
            fixation_id: *fixation_id,
            trial: fixation.event.trial.clone(),
            page: fixation.event.page.clone(),
            onset: fixation.event.onset,
            offset: fixation.event.offset,
            word_idx,
            word: fixation.aoi.word.clone(),
            char_idx: fixation.aoi.char_idx,
            run_id,
            is_first_pass: current_run_is_first_pass,
            prev_word_idx,
            next_word_idx,
            is_reg_in,
            is_reg_out,
            is_first_fix,
        });
    }
}
