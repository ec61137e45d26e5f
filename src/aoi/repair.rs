//! Word label repair
//!
//! Stimulus metadata often tags inter-word space glyphs with a valid
//! `word_idx` but a blank or missing word label. Repair normalizes labels
//! so that every row in the same `(trial, page, line_idx, word_idx)` group
//! shares one non-blank word label, by propagating the nearest valid label
//! within the group (forward fill, then backward fill, in character order).

use std::collections::HashMap;

use crate::aoi::table::{Aoi, AoiTable};

/// Group key for label repair: the subset of
/// `(trial, page, line_idx, word_idx)` columns present in the table.
type RepairKey = (Option<String>, Option<String>, Option<i64>, Option<i64>);

/// Normalize word labels within each word group.
///
/// A label counts as missing when it is `None` or whitespace-only after
/// trimming. Within each group, rows are ordered by `char_idx_in_line` and
/// missing labels inherit the nearest valid label (forward fill, then
/// backward fill). Grouping columns absent from the table are simply
/// excluded from the grouping key.
///
/// Guarantees:
/// * row count and row order are unchanged
/// * `word_idx` values are never mutated
/// * a group with no valid label at all stays `None` (no invented label)
pub fn repair_word_labels(table: &AoiTable) -> AoiTable {
    let mut rows: Vec<Aoi> = table.rows().to_vec();

    // Blank labels become None before filling.
    for row in &mut rows {
        if let Some(word) = &row.word {
            if word.trim().is_empty() {
                row.word = None;
            }
        }
    }

    // Collect row indices per group, preserving original row order.
    let mut groups: HashMap<RepairKey, Vec<usize>> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let key = (
            if table.has_trial() { row.trial.clone() } else { None },
            if table.has_page() { row.page.clone() } else { None },
            if table.has_line_idx() { row.line_idx } else { None },
            if table.has_word_idx() { row.word_idx } else { None },
        );
        groups.entry(key).or_default().push(idx);
    }

    for indices in groups.values() {
        let mut ordered = indices.clone();
        if table.has_char_idx_in_line() {
            ordered.sort_by_key(|&i| rows[i].char_idx_in_line);
        }

        // Forward fill.
        let mut last_valid: Option<String> = None;
        for &i in &ordered {
            match &rows[i].word {
                Some(word) => last_valid = Some(word.clone()),
                None => rows[i].word = last_valid.clone(),
            }
        }

        // Backward fill.
        let mut next_valid: Option<String> = None;
        for &i in ordered.iter().rev() {
            match &rows[i].word {
                Some(word) => next_valid = Some(word.clone()),
                None => rows[i].word = next_valid.clone(),
            }
        }
    }

    log::debug!("repaired word labels across {} AOI rows", rows.len());
    AoiTable::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_row(word: Option<&str>, word_idx: i64, char_pos: i64) -> Aoi {
        Aoi {
            label: None,
            word: word.map(str::to_string),
            start_x: char_pos as f64 * 10.0,
            start_y: 0.0,
            width: Some(10.0),
            height: Some(10.0),
            line_idx: Some(0),
            word_idx: Some(word_idx),
            char_idx: Some(char_pos),
            char_idx_in_line: Some(char_pos),
            ..Default::default()
        }
    }

    #[test]
    fn test_interior_blank_inherits_label() {
        // A trailing space glyph tagged with word_idx 0 but a blank label.
        let table = AoiTable::new(vec![
            char_row(Some("The"), 0, 0),
            char_row(Some("The"), 0, 1),
            char_row(Some(" "), 0, 2),
            char_row(Some("quick"), 1, 3),
        ]);

        let repaired = repair_word_labels(&table);
        let words: Vec<_> = repaired
            .rows()
            .iter()
            .map(|r| r.word.as_deref().unwrap().to_string())
            .collect();
        assert_eq!(words, vec!["The", "The", "The", "quick"]);
    }

    #[test]
    fn test_backward_fill_for_leading_blank() {
        let table = AoiTable::new(vec![
            char_row(None, 0, 0),
            char_row(Some("The"), 0, 1),
        ]);

        let repaired = repair_word_labels(&table);
        assert_eq!(repaired.rows()[0].word.as_deref(), Some("The"));
    }

    #[test]
    fn test_all_blank_group_stays_none() {
        let table = AoiTable::new(vec![
            char_row(Some("  "), 3, 0),
            char_row(None, 3, 1),
        ]);

        let repaired = repair_word_labels(&table);
        assert!(repaired.rows().iter().all(|r| r.word.is_none()));
    }

    #[test]
    fn test_row_count_order_and_word_idx_unchanged() {
        let table = AoiTable::new(vec![
            char_row(Some("b"), 1, 2),
            char_row(None, 1, 1),
            char_row(Some("a"), 0, 0),
        ]);

        let repaired = repair_word_labels(&table);
        assert_eq!(repaired.len(), 3);
        // Original row order preserved (no global sort).
        assert_eq!(repaired.rows()[0].char_idx_in_line, Some(2));
        assert_eq!(repaired.rows()[2].char_idx_in_line, Some(0));
        let word_idx: Vec<_> = repaired.rows().iter().map(|r| r.word_idx).collect();
        assert_eq!(word_idx, vec![Some(1), Some(1), Some(0)]);
        // The blank row inherited the label of its group, not its neighbor.
        assert_eq!(repaired.rows()[1].word.as_deref(), Some("b"));
    }

    #[test]
    fn test_groups_do_not_leak_across_word_idx() {
        let table = AoiTable::new(vec![
            char_row(Some("The"), 0, 0),
            char_row(None, 1, 1),
        ]);

        let repaired = repair_word_labels(&table);
        // word_idx 1 has no valid label of its own.
        assert_eq!(repaired.rows()[1].word, None);
    }
}
