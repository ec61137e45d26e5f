//! Token vocabulary extraction
//!
//! The word-level measures table has one row per word unit that exists on
//! a page, independent of whether the word was ever fixated. This module
//! derives that vocabulary from the AOI table and the set of fixated word
//! keys used for skip marking.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::annotate::AnnotatedFixation;
use crate::aoi::table::AoiTable;
use crate::types::WordKey;

/// One word unit of a page: deduplicated `(trial, page, word_idx, word)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordToken {
    pub trial: Option<String>,
    pub page: Option<String>,
    pub word_idx: i64,
    pub word: Option<String>,
}

impl WordToken {
    /// Word key of this token.
    pub fn key(&self) -> WordKey {
        WordKey::new(self.trial.clone(), self.page.clone(), self.word_idx)
    }
}

/// Enumerate every AOI word unit, in word-index order.
///
/// Includes words, spaces, and punctuation: every AOI row with a
/// `word_idx` contributes. The `trial` argument fills in the trial key
/// when the AOI table has no trial column of its own; when the table does
/// carry one, the argument is ignored.
pub fn word_tokens(aois: &AoiTable, trial: Option<&str>) -> Vec<WordToken> {
    let mut tokens: BTreeSet<WordToken> = BTreeSet::new();

    for row in aois.rows() {
        let Some(word_idx) = row.word_idx else {
            continue;
        };
        let trial_value = if aois.has_trial() {
            row.trial.clone()
        } else {
            trial.map(str::to_string)
        };
        tokens.insert(WordToken {
            trial: trial_value,
            page: row.page.clone(),
            word_idx,
            word: row.word.clone(),
        });
    }

    tokens.into_iter().collect()
}

/// Distinct word keys that received at least one fixation.
///
/// Fixations never map to a null word index here because the annotator
/// already filtered unmapped events; the set feeds the skipped-word join
/// in the word-level builder.
pub fn fixated_word_keys(fix: &[AnnotatedFixation]) -> BTreeSet<WordKey> {
    fix.iter().map(AnnotatedFixation::word_key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aoi::table::Aoi;

    fn aoi(word: &str, word_idx: i64, page: &str) -> Aoi {
        Aoi {
            word: Some(word.to_string()),
            word_idx: Some(word_idx),
            page: Some(page.to_string()),
            width: Some(10.0),
            height: Some(10.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_tokens_deduplicated_and_sorted() {
        // Three character rows of "The" plus one of "quick", out of order.
        let table = AoiTable::new(vec![
            aoi("quick", 1, "p1"),
            aoi("The", 0, "p1"),
            aoi("The", 0, "p1"),
            aoi("The", 0, "p1"),
        ]);

        let tokens = word_tokens(&table, None);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].word.as_deref(), Some("The"));
        assert_eq!(tokens[0].word_idx, 0);
        assert_eq!(tokens[1].word.as_deref(), Some("quick"));
    }

    #[test]
    fn test_rows_without_word_idx_excluded() {
        let mut no_idx = aoi("stray", 0, "p1");
        no_idx.word_idx = None;
        let table = AoiTable::new(vec![no_idx, aoi("The", 0, "p1")]);

        let tokens = word_tokens(&table, None);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].word.as_deref(), Some("The"));
    }

    #[test]
    fn test_trial_argument_fills_missing_column() {
        let table = AoiTable::new(vec![aoi("The", 0, "p1")]);
        let tokens = word_tokens(&table, Some("t1"));
        assert_eq!(tokens[0].trial.as_deref(), Some("t1"));
        assert_eq!(
            tokens[0].key(),
            WordKey::new(Some("t1".into()), Some("p1".into()), 0)
        );
    }

    #[test]
    fn test_trial_argument_ignored_when_column_present() {
        let mut row = aoi("The", 0, "p1");
        row.trial = Some("native".to_string());
        let table = AoiTable::new(vec![row]);
        let tokens = word_tokens(&table, Some("override"));
        assert_eq!(tokens[0].trial.as_deref(), Some("native"));
    }
}
