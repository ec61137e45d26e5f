//! Word-level measures table
//!
//! Joins every reading measure onto the token vocabulary. The output has
//! one row per vocabulary word regardless of fixation coverage: words
//! never fixated get zero-valued measures and `skipped = 1`, so the table
//! height always equals the vocabulary size.

use serde::{Deserialize, Serialize};

use crate::annotate::AnnotatedFixation;
use crate::aoi::tokens::{fixated_word_keys, WordToken};
use crate::measures::functions;
use crate::types::Result;

/// One row of the word-level measures table
///
/// Serialized field names follow the established measure naming so the
/// table can be exported as-is: `{trial, page, word_idx, word, skipped,
/// TFC, FD, FFD, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordMeasures {
    pub trial: Option<String>,
    pub page: Option<String>,
    pub word_idx: i64,
    pub word: Option<String>,
    /// 1 when the word received no fixation at all, else 0
    pub skipped: i64,
    /// Total fixation count
    #[serde(rename = "TFC")]
    pub tfc: i64,
    /// Duration of the temporally-first fixation
    #[serde(rename = "FD")]
    pub fd: i64,
    /// First-fixation duration (first pass only)
    #[serde(rename = "FFD")]
    pub ffd: i64,
    /// First-pass reading time
    #[serde(rename = "FPRT")]
    pub fprt: i64,
    /// First reading time (first run)
    #[serde(rename = "FRT")]
    pub frt: i64,
    /// Rereading time
    #[serde(rename = "RRT")]
    pub rrt: i64,
    /// First-pass fixation count
    #[serde(rename = "FPFC")]
    pub fpfc: i64,
    /// Regressions into the word
    #[serde(rename = "TRC_in")]
    pub trc_in: i64,
    /// Regressions out of the word
    #[serde(rename = "TRC_out")]
    pub trc_out: i64,
    /// Landing position (character index of the first fixation)
    #[serde(rename = "LP")]
    pub lp: i64,
    /// Saccade length into the word
    #[serde(rename = "SL_in")]
    pub sl_in: i64,
    /// Saccade length out of the word
    #[serde(rename = "SL_out")]
    pub sl_out: i64,
    /// Regression-path duration, inclusive
    #[serde(rename = "RPD_inc")]
    pub rpd_inc: i64,
    /// Regression-path duration, exclusive
    #[serde(rename = "RPD_exc")]
    pub rpd_exc: i64,
    /// Right-bounded reading time
    #[serde(rename = "RBRT")]
    pub rbrt: i64,
    /// Total fixation time (FPRT + RRT)
    #[serde(rename = "TFT")]
    pub tft: i64,
    /// First-pass fixation indicator (FPRT > 0)
    #[serde(rename = "FPF")]
    pub fpf: i64,
    /// Rereading indicator (RRT > 0)
    #[serde(rename = "RR")]
    pub rr: i64,
    /// Single-fixation duration (FFD when FPFC == 1, else 0)
    #[serde(rename = "SFD")]
    pub sfd: i64,
}

/// Join all reading measures onto the token vocabulary.
///
/// Left join: one output row per vocabulary token, in vocabulary order.
/// Measures missing for a token (never fixated, or never flagged) fill
/// with zero; tokens without any fixation are additionally marked
/// `skipped = 1`. Derived measures (TFT, FPF, RR, SFD) are appended after
/// the join. Empty fixation input yields a fully-skipped table of
/// vocabulary height; empty vocabulary yields an empty table.
pub fn build_word_level_table(
    words: &[WordToken],
    fix: &[AnnotatedFixation],
) -> Result<Vec<WordMeasures>> {
    let fixated = fixated_word_keys(fix);

    let tfc = functions::total_fixation_count(fix);
    let fd = functions::first_duration(fix);
    let ffd = functions::first_fixation_duration(fix);
    let fprt = functions::first_pass_reading_time(fix);
    let frt = functions::first_reading_time(fix);
    let rrt = functions::rereading_time(fix);
    let fpfc = functions::first_pass_fixation_count(fix);
    let trc = functions::trc_in_out(fix);
    let lp = functions::landing_position(fix)?;
    let sl_in = functions::saccade_length_in(fix);
    let sl_out = functions::saccade_length_out(fix);
    let rpd = functions::rpd_measures(fix);

    log::debug!(
        "building word-level table: {} tokens, {} fixated words",
        words.len(),
        fixated.len()
    );

    let table = words
        .iter()
        .map(|token| {
            let key = token.key();
            let value = |map: &std::collections::BTreeMap<_, i64>| {
                map.get(&key).copied().unwrap_or(0)
            };
            let trc = trc.get(&key).copied().unwrap_or_default();
            let rpd = rpd.get(&key).copied().unwrap_or_default();

            let fprt_value = value(&fprt);
            let rrt_value = value(&rrt);
            let fpfc_value = value(&fpfc);
            let ffd_value = value(&ffd);

            WordMeasures {
                trial: token.trial.clone(),
                page: token.page.clone(),
                word_idx: token.word_idx,
                word: token.word.clone(),
                skipped: i64::from(!fixated.contains(&key)),
                tfc: value(&tfc),
                fd: value(&fd),
                ffd: ffd_value,
                fprt: fprt_value,
                frt: value(&frt),
                rrt: rrt_value,
                fpfc: fpfc_value,
                trc_in: trc.trc_in,
                trc_out: trc.trc_out,
                lp: value(&lp),
                sl_in: value(&sl_in),
                sl_out: value(&sl_out),
                rpd_inc: rpd.rpd_inc,
                rpd_exc: rpd.rpd_exc,
                rbrt: rpd.rbrt,
                tft: fprt_value + rrt_value,
                fpf: i64::from(fprt_value > 0),
                rr: i64::from(rrt_value > 0),
                sfd: if fpfc_value == 1 { ffd_value } else { 0 },
            }
        })
        .collect();

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::annotate_fixations;
    use crate::aoi::table::AoiHit;
    use crate::config::PipelineConfig;
    use crate::mapping::MappedEvent;
    use crate::types::GazeEvent;

    fn token(word: &str, word_idx: i64) -> WordToken {
        WordToken {
            trial: None,
            page: None,
            word_idx,
            word: Some(word.to_string()),
        }
    }

    fn annotated(word_indices: &[i64]) -> Vec<AnnotatedFixation> {
        let events: Vec<MappedEvent> = word_indices
            .iter()
            .enumerate()
            .map(|(i, &w)| MappedEvent {
                event: GazeEvent::fixation(i as i64 * 100, i as i64 * 100 + 50, 0.0, 0.0),
                aoi: AoiHit {
                    word_idx: Some(w),
                    char_idx: Some(w),
                    ..Default::default()
                },
            })
            .collect();
        annotate_fixations(&events, &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_height_equals_vocabulary_size() {
        let words = vec![token("The", 0), token("quick", 1), token("fox", 2)];
        // Only word 0 is fixated.
        let table = build_word_level_table(&words, &annotated(&[0])).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_unfixated_words_marked_skipped_with_zero_measures() {
        let words = vec![token("The", 0), token("quick", 1)];
        let table = build_word_level_table(&words, &annotated(&[0])).unwrap();

        let skipped = &table[1];
        assert_eq!(skipped.skipped, 1);
        assert_eq!(skipped.tfc, 0);
        assert_eq!(skipped.ffd, 0);
        assert_eq!(skipped.tft, 0);

        let fixated = &table[0];
        assert_eq!(fixated.skipped, 0);
        assert_eq!(fixated.tfc, 1);
    }

    #[test]
    fn test_derived_measures() {
        let words = vec![token("The", 0), token("quick", 1)];
        // Word 0: one first-pass fixation, then a rereading visit.
        let table = build_word_level_table(&words, &annotated(&[0, 1, 0])).unwrap();

        let w0 = &table[0];
        assert_eq!(w0.fprt, 50);
        assert_eq!(w0.rrt, 50);
        assert_eq!(w0.tft, 100);
        assert_eq!(w0.fpf, 1);
        assert_eq!(w0.rr, 1);
        // One first-pass fixation -> SFD equals FFD.
        assert_eq!(w0.fpfc, 1);
        assert_eq!(w0.sfd, w0.ffd);

        let w1 = &table[1];
        assert_eq!(w1.rr, 0);
        assert_eq!(w1.trc_out, 1);
    }

    #[test]
    fn test_empty_fixations_yield_fully_skipped_table() {
        let words = vec![token("The", 0)];
        let table = build_word_level_table(&words, &[]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].skipped, 1);
    }

    #[test]
    fn test_empty_vocabulary_yields_empty_table() {
        let table = build_word_level_table(&[], &annotated(&[0])).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_serialized_column_names_follow_contract() {
        let words = vec![token("The", 0)];
        let table = build_word_level_table(&words, &annotated(&[0])).unwrap();
        let json = serde_json::to_value(&table[0]).unwrap();

        for column in [
            "trial", "page", "word_idx", "word", "skipped", "TFC", "FD", "FFD",
            "FPRT", "FRT", "RRT", "FPFC", "TRC_in", "TRC_out", "LP", "SL_in",
            "SL_out", "RPD_inc", "RPD_exc", "RBRT", "TFT", "FPF", "RR", "SFD",
        ] {
            assert!(json.get(column).is_some(), "missing column {column}");
        }
    }
}
