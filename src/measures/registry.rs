//! Measure registry
//!
//! Maps measure names to their aggregation functions so callers can
//! request measures by name (e.g. from a configuration file) without
//! hard-coding the dispatch. The registry is a static table, not mutable
//! global state.

use std::collections::BTreeMap;

use crate::annotate::AnnotatedFixation;
use crate::measures::functions;
use crate::types::{MeasureError, Result, WordKey};

/// A named measure: one scalar per `(trial, page, word_idx)` group
pub type MeasureFn = fn(&[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>>;

/// Static name-to-function table of all scalar measures
static REGISTRY: &[(&str, MeasureFn)] = &[
    ("TFC", tfc),
    ("FPFC", fpfc),
    ("FD", fd),
    ("FFD", ffd),
    ("FPRT", fprt),
    ("FRT", frt),
    ("RRT", rrt),
    ("TFT", tft),
    ("TRC_in", trc_in),
    ("TRC_out", trc_out),
    ("LP", lp),
    ("SL_in", sl_in),
    ("SL_out", sl_out),
    ("RPD_inc", rpd_inc),
    ("RPD_exc", rpd_exc),
    ("RBRT", rbrt),
];

/// Compute a measure by name.
///
/// # Errors
/// `UnknownMeasure` naming the invalid value when no registered measure
/// matches; schema errors from the underlying function are propagated.
pub fn compute_measure(name: &str, fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    let (_, f) = REGISTRY
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| MeasureError::UnknownMeasure(name.to_string()))?;
    f(fix)
}

/// Names of all registered measures, in registry order.
pub fn measure_names() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}

fn tfc(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::total_fixation_count(fix))
}

fn fpfc(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::first_pass_fixation_count(fix))
}

fn fd(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::first_duration(fix))
}

fn ffd(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::first_fixation_duration(fix))
}

fn fprt(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::first_pass_reading_time(fix))
}

fn frt(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::first_reading_time(fix))
}

fn rrt(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::rereading_time(fix))
}

fn tft(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::total_fixation_time(fix))
}

fn trc_in(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::trc_in_out(fix)
        .into_iter()
        .map(|(key, counts)| (key, counts.trc_in))
        .collect())
}

fn trc_out(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::trc_in_out(fix)
        .into_iter()
        .map(|(key, counts)| (key, counts.trc_out))
        .collect())
}

fn lp(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    functions::landing_position(fix)
}

fn sl_in(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::saccade_length_in(fix))
}

fn sl_out(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::saccade_length_out(fix))
}

fn rpd_inc(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::rpd_measures(fix)
        .into_iter()
        .map(|(key, rpd)| (key, rpd.rpd_inc))
        .collect())
}

fn rpd_exc(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::rpd_measures(fix)
        .into_iter()
        .map(|(key, rpd)| (key, rpd.rpd_exc))
        .collect())
}

fn rbrt(fix: &[AnnotatedFixation]) -> Result<BTreeMap<WordKey, i64>> {
    Ok(functions::rpd_measures(fix)
        .into_iter()
        .map(|(key, rpd)| (key, rpd.rbrt))
        .collect())
}
