//! Individual reading measure functions
//!
//! Each measure is an independent aggregation over the annotated fixation
//! table, grouped by `(trial, page, word_idx)`. The functions are pure and
//! composable outside the full pipeline; all of them map zero-row input to
//! an empty result rather than an error. Output maps are ordered by word
//! key, so iteration order is deterministic.

use std::collections::BTreeMap;

use crate::annotate::AnnotatedFixation;
use crate::types::{MeasureError, Result, WordKey};

/// Regression counts into and out of a word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrcCounts {
    /// Fixations on the word arriving from a higher word index
    pub trc_in: i64,
    /// Fixations on the word departing to a lower word index
    pub trc_out: i64,
}

/// Regression-path durations for a word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RpdMeasures {
    /// Total duration from first entering the word until the first
    /// fixation to its right, including fixations on the word itself
    pub rpd_inc: i64,
    /// Same window, excluding fixations on the word itself
    pub rpd_exc: i64,
    /// Duration on the word before any word to its right is visited
    /// (right-bounded reading time)
    pub rbrt: i64,
}

/// Group fixations by word key, preserving input order within each group.
fn by_word<'a>(fix: &'a [AnnotatedFixation]) -> BTreeMap<WordKey, Vec<&'a AnnotatedFixation>> {
    let mut groups: BTreeMap<WordKey, Vec<&AnnotatedFixation>> = BTreeMap::new();
    for f in fix {
        groups.entry(f.word_key()).or_default().push(f);
    }
    groups
}

/// The fixation with the earliest onset in a group.
fn earliest<'a>(group: &[&'a AnnotatedFixation]) -> &'a AnnotatedFixation {
    group
        .iter()
        .copied()
        .min_by_key(|f| f.onset)
        .expect("measure groups are never empty")
}

/// TFC: total number of fixations on each word.
pub fn total_fixation_count(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    by_word(fix)
        .into_iter()
        .map(|(key, group)| (key, group.len() as i64))
        .collect()
}

/// FPFC: number of fixations during each word's first pass.
pub fn first_pass_fixation_count(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    let first_pass: Vec<AnnotatedFixation> =
        fix.iter().filter(|f| f.is_first_pass).cloned().collect();
    total_fixation_count(&first_pass)
}

/// FD: duration of the temporally-first fixation on each word,
/// regardless of reading pass.
pub fn first_duration(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    by_word(fix)
        .into_iter()
        .map(|(key, group)| (key, earliest(&group).duration()))
        .collect()
}

/// FFD: duration of the first fixation within each word's first pass.
pub fn first_fixation_duration(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    let first_pass: Vec<AnnotatedFixation> =
        fix.iter().filter(|f| f.is_first_pass).cloned().collect();
    first_duration(&first_pass)
}

/// FPRT: sum of fixation durations during each word's first pass.
pub fn first_pass_reading_time(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    let mut out: BTreeMap<WordKey, i64> = BTreeMap::new();
    for f in fix.iter().filter(|f| f.is_first_pass) {
        *out.entry(f.word_key()).or_default() += f.duration();
    }
    out
}

/// RRT: sum of fixation durations outside each word's first pass.
pub fn rereading_time(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    let mut out: BTreeMap<WordKey, i64> = BTreeMap::new();
    for f in fix.iter().filter(|f| !f.is_first_pass) {
        *out.entry(f.word_key()).or_default() += f.duration();
    }
    out
}

/// TFT: total fixation time across all passes.
pub fn total_fixation_time(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    let mut out: BTreeMap<WordKey, i64> = BTreeMap::new();
    for f in fix {
        *out.entry(f.word_key()).or_default() += f.duration();
    }
    out
}

/// FRT: sum of fixation durations during each word's first run, i.e. the
/// dwell time from first entering the word until first leaving it.
pub fn first_reading_time(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    let mut out = BTreeMap::new();
    for (key, group) in by_word(fix) {
        let first_run = group
            .iter()
            .map(|f| f.run_id)
            .min()
            .expect("measure groups are never empty");
        let duration = group
            .iter()
            .filter(|f| f.run_id == first_run)
            .map(|f| f.duration())
            .sum();
        out.insert(key, duration);
    }
    out
}

/// TRC_in / TRC_out: regression counts into and out of each word.
pub fn trc_in_out(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, TrcCounts> {
    let mut out: BTreeMap<WordKey, TrcCounts> = BTreeMap::new();
    for f in fix {
        let counts = out.entry(f.word_key()).or_default();
        counts.trc_in += i64::from(f.is_reg_in);
        counts.trc_out += i64::from(f.is_reg_out);
    }
    out
}

/// LP: landing position, the character index of the temporally-first
/// fixation on each word.
///
/// # Errors
/// `MissingColumn` when fixations exist but none carries a character
/// index (the AOI table had no char column to attach).
pub fn landing_position(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    if !fix.is_empty() && fix.iter().all(|f| f.char_idx.is_none()) {
        return Err(MeasureError::MissingColumn {
            table: "fixation",
            column: "char_idx",
        });
    }

    Ok(by_word(fix)
        .into_iter()
        .map(|(key, group)| (key, earliest(&group).char_idx.unwrap_or(0)))
        .collect())
}

/// SL_in: signed word distance from the previously fixated word at the
/// very first fixation on each word. Words entered first (no previous
/// fixation) get 0.
pub fn saccade_length_in(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    fix.iter()
        .filter(|f| f.is_first_fix)
        .map(|f| {
            let length = f.prev_word_idx.map_or(0, |prev| f.word_idx - prev);
            (f.word_key(), length)
        })
        .collect()
}

/// SL_out: signed word distance to the next fixated word at the last
/// fixation of each word's first run. Words never left (no next
/// fixation) get 0.
pub fn saccade_length_out(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, i64> {
    let mut out = BTreeMap::new();
    for (key, group) in by_word(fix) {
        let first_run = group
            .iter()
            .map(|f| f.run_id)
            .min()
            .expect("measure groups are never empty");
        let last_of_run = group
            .iter()
            .copied()
            .filter(|f| f.run_id == first_run)
            .max_by_key(|f| f.onset)
            .expect("first run is never empty");
        let length = last_of_run
            .next_word_idx
            .map_or(0, |next| next - last_of_run.word_idx);
        out.insert(key, length);
    }
    out
}

/// RPD_inc / RPD_exc / RBRT: regression-path measures.
///
/// For each fixated word the window runs from the word's first first-pass
/// fixation up to (exclusive) the first later fixation on a higher word
/// index, within the word's partition. Words without any first-pass
/// fixation get explicit zero rows.
pub fn rpd_measures(fix: &[AnnotatedFixation]) -> BTreeMap<WordKey, RpdMeasures> {
    // Partition by (trial, page); window scans run over whole partitions.
    let mut partitions: BTreeMap<(Option<String>, Option<String>), Vec<&AnnotatedFixation>> =
        BTreeMap::new();
    for f in fix {
        partitions
            .entry((f.trial.clone(), f.page.clone()))
            .or_default()
            .push(f);
    }

    let mut out = BTreeMap::new();
    for members in partitions.values_mut() {
        members.sort_by_key(|f| f.onset);

        let mut words: Vec<i64> = members.iter().map(|f| f.word_idx).collect();
        words.sort_unstable();
        words.dedup();

        for &w in &words {
            let key = WordKey::new(
                members[0].trial.clone(),
                members[0].page.clone(),
                w,
            );

            let start_onset = members
                .iter()
                .find(|f| f.word_idx == w && f.is_first_pass)
                .map(|f| f.onset);
            let Some(start_onset) = start_onset else {
                out.insert(key, RpdMeasures::default());
                continue;
            };

            let after: Vec<&&AnnotatedFixation> =
                members.iter().filter(|f| f.onset >= start_onset).collect();
            let stop_onset = after
                .iter()
                .filter(|f| f.word_idx > w)
                .map(|f| f.onset)
                .min();

            let window = after
                .iter()
                .filter(|f| stop_onset.map_or(true, |stop| f.onset < stop));

            let mut rbrt = 0;
            let mut rpd_exc = 0;
            for f in window {
                if f.word_idx == w {
                    rbrt += f.duration();
                } else {
                    rpd_exc += f.duration();
                }
            }

            out.insert(
                key,
                RpdMeasures { rpd_inc: rbrt + rpd_exc, rpd_exc, rbrt },
            );
        }
    }
    out
}
