//! AOI table and point-to-AOI lookup
//!
//! The AOI table holds one row per visual unit (character or word) of the
//! stimulus. It is constructed once from parsed stimulus metadata and is
//! immutable afterwards; label repair and derived-column addition always
//! produce a new table.

use serde::{Deserialize, Serialize};

use crate::types::{MeasureError, Result};

/// One area of interest: a labeled spatial box with optional grouping keys
///
/// The box spans `[start_x, end)` on each axis, where the end is given
/// either by `width`/`height` or by `end_x`/`end_y`. Upper bounds are
/// exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aoi {
    /// Label of this visual unit (the character glyph or word string)
    pub label: Option<String>,
    /// Word string this unit belongs to
    pub word: Option<String>,
    /// Left edge of the box
    pub start_x: f64,
    /// Top edge of the box
    pub start_y: f64,
    /// Box width (alternative to `end_x`)
    pub width: Option<f64>,
    /// Box height (alternative to `end_y`)
    pub height: Option<f64>,
    /// Exclusive right edge of the box (alternative to `width`)
    pub end_x: Option<f64>,
    /// Exclusive bottom edge of the box (alternative to `height`)
    pub end_y: Option<f64>,
    /// Trial identifier
    pub trial: Option<String>,
    /// Page identifier
    pub page: Option<String>,
    /// Line index within the page
    pub line_idx: Option<i64>,
    /// Word index within the page
    pub word_idx: Option<i64>,
    /// Character index within the page
    pub char_idx: Option<i64>,
    /// Character index within the line (ordering key for label repair)
    pub char_idx_in_line: Option<i64>,
}

impl Aoi {
    /// Exclusive right edge, from `end_x` or `start_x + width`.
    fn bound_x(&self) -> Result<f64> {
        match (self.end_x, self.width) {
            (Some(end), _) => Ok(end),
            (None, Some(w)) => Ok(self.start_x + w),
            (None, None) => Err(MeasureError::InvalidGeometry(
                "either width or end_x must be defined".to_string(),
            )),
        }
    }

    /// Exclusive bottom edge, from `end_y` or `start_y + height`.
    fn bound_y(&self) -> Result<f64> {
        match (self.end_y, self.height) {
            (Some(end), _) => Ok(end),
            (None, Some(h)) => Ok(self.start_y + h),
            (None, None) => Err(MeasureError::InvalidGeometry(
                "either height or end_y must be defined".to_string(),
            )),
        }
    }

    /// Half-open box containment: `start <= p < end` on both axes.
    pub fn contains(&self, x: f64, y: f64) -> Result<bool> {
        let end_x = self.bound_x()?;
        let end_y = self.bound_y()?;
        Ok(self.start_x <= x && x < end_x && self.start_y <= y && y < end_y)
    }
}

/// A point plus the grouping key values of the row it came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AoiQuery<'a> {
    pub x: f64,
    pub y: f64,
    pub trial: Option<&'a str>,
    pub page: Option<&'a str>,
}

impl<'a> AoiQuery<'a> {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, trial: None, page: None }
    }

    pub fn with_trial(mut self, trial: &'a str) -> Self {
        self.trial = Some(trial);
        self
    }

    pub fn with_page(mut self, page: &'a str) -> Self {
        self.page = Some(page);
        self
    }
}

/// The single-row result of an AOI lookup
///
/// Lookups always return exactly one hit so batch mapping stays
/// rectangular: when no AOI contains the point, every field is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AoiHit {
    pub label: Option<String>,
    pub word: Option<String>,
    pub word_idx: Option<i64>,
    pub char_idx: Option<i64>,
    pub line_idx: Option<i64>,
}

impl AoiHit {
    /// The all-`None` hit returned when no AOI contains the point.
    pub fn none() -> Self {
        Self::default()
    }

    fn from_aoi(aoi: &Aoi) -> Self {
        Self {
            label: aoi.label.clone(),
            word: aoi.word.clone(),
            word_idx: aoi.word_idx,
            char_idx: aoi.char_idx,
            line_idx: aoi.line_idx,
        }
    }
}

/// An ordered, immutable collection of AOIs
///
/// Grouping columns are considered present in the table when any row
/// carries a value for them; lookup matches only on columns that are
/// present. Row order is stable and meaningful: overlap ties are broken
/// by the first matching row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AoiTable {
    rows: Vec<Aoi>,
    has_trial: bool,
    has_page: bool,
    has_line_idx: bool,
    has_word_idx: bool,
    has_char_idx_in_line: bool,
}

impl AoiTable {
    /// Build a table from AOI rows, recording which optional grouping
    /// columns are present.
    pub fn new(rows: Vec<Aoi>) -> Self {
        let has_trial = rows.iter().any(|r| r.trial.is_some());
        let has_page = rows.iter().any(|r| r.page.is_some());
        let has_line_idx = rows.iter().any(|r| r.line_idx.is_some());
        let has_word_idx = rows.iter().any(|r| r.word_idx.is_some());
        let has_char_idx_in_line = rows.iter().any(|r| r.char_idx_in_line.is_some());
        Self {
            rows,
            has_trial,
            has_page,
            has_line_idx,
            has_word_idx,
            has_char_idx_in_line,
        }
    }

    pub fn rows(&self) -> &[Aoi] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if any row defines a trial key.
    pub fn has_trial(&self) -> bool {
        self.has_trial
    }

    /// True if any row defines a page key.
    pub fn has_page(&self) -> bool {
        self.has_page
    }

    pub(crate) fn has_line_idx(&self) -> bool {
        self.has_line_idx
    }

    pub(crate) fn has_word_idx(&self) -> bool {
        self.has_word_idx
    }

    pub(crate) fn has_char_idx_in_line(&self) -> bool {
        self.has_char_idx_in_line
    }

    /// Look up the AOI containing a gaze point.
    ///
    /// Returns exactly one [`AoiHit`] for every call. A point is inside an
    /// AOI when both half-open box conditions hold and the AOI's trial and
    /// page values match those of the query, for whichever of those
    /// columns the table defines. Grouping columns the table does not
    /// define are ignored even if the query provides them.
    ///
    /// # Errors
    /// * `MissingGroupKey` - the table defines a trial or page column but
    ///   the query does not provide it
    /// * `InvalidGeometry` - an AOI row has no end bound on some axis
    ///
    /// # Edge cases
    /// * No AOI contains the point: returns [`AoiHit::none`] (all fields
    ///   `None`), never an error.
    /// * Multiple AOIs contain the point (overlapping geometry): the first
    ///   row in stable table order wins and a warning is logged.
    pub fn get_aoi(&self, query: &AoiQuery<'_>) -> Result<AoiHit> {
        if self.has_trial && query.trial.is_none() {
            return Err(MeasureError::MissingGroupKey { column: "trial" });
        }
        if self.has_page && query.page.is_none() {
            return Err(MeasureError::MissingGroupKey { column: "page" });
        }

        let mut first_match: Option<&Aoi> = None;
        let mut match_count = 0usize;

        for aoi in &self.rows {
            if self.has_trial && aoi.trial.as_deref() != query.trial {
                continue;
            }
            if self.has_page && aoi.page.as_deref() != query.page {
                continue;
            }
            if aoi.contains(query.x, query.y)? {
                match_count += 1;
                if first_match.is_none() {
                    first_match = Some(aoi);
                }
            }
        }

        if match_count > 1 {
            log::warn!(
                "multiple AOIs matched point ({}, {}); keeping the first in table order",
                query.x,
                query.y
            );
        }

        match first_match {
            Some(aoi) => Ok(AoiHit::from_aoi(aoi)),
            None => {
                log::trace!("no AOI matched point ({}, {})", query.x, query.y);
                Ok(AoiHit::none())
            }
        }
    }
}
