//! End-to-end pipeline tests over a small two-page stimulus.

use reading_measures::{
    Aoi, AoiTable, GazeEvent, MeasureError, PipelineConfig, ReadingMeasurePipeline,
};

/// Character-level AOIs for the page "The quick" at y [0,20): each glyph
/// is 10 px wide, and the inter-word space carries word_idx 0 with a
/// blank word label (repaired by the pipeline).
fn the_quick_page(page: &str) -> Vec<Aoi> {
    let glyphs: Vec<(char, i64, Option<&str>)> = vec![
        ('T', 0, Some("The")),
        ('h', 0, Some("The")),
        ('e', 0, Some("The")),
        (' ', 0, Some(" ")),
        ('q', 1, Some("quick")),
        ('u', 1, Some("quick")),
        ('i', 1, Some("quick")),
        ('c', 1, Some("quick")),
        ('k', 1, Some("quick")),
    ];
    glyphs
        .into_iter()
        .enumerate()
        .map(|(i, (glyph, word_idx, word))| Aoi {
            label: Some(glyph.to_string()),
            word: word.map(str::to_string),
            start_x: i as f64 * 10.0,
            start_y: 0.0,
            width: Some(10.0),
            height: Some(20.0),
            page: Some(page.to_string()),
            line_idx: Some(0),
            word_idx: Some(word_idx),
            char_idx: Some(i as i64),
            char_idx_in_line: Some(i as i64),
            ..Default::default()
        })
        .collect()
}

fn fixation(onset: i64, offset: i64, x: f64, page: &str) -> GazeEvent {
    let mut event = GazeEvent::fixation(onset, offset, x, 10.0);
    event.page = Some(page.to_string());
    event
}

#[test]
fn two_word_scenario_yields_expected_measures() {
    let pipeline = ReadingMeasurePipeline::new(
        AoiTable::new(the_quick_page("p1")),
        PipelineConfig::new(),
    );

    // One fixation per word, read left to right.
    let events = vec![
        fixation(0, 200, 10.0, "p1"),
        fixation(200, 400, 45.0, "p1"),
    ];

    let table = pipeline.process(&events).unwrap();
    assert_eq!(table.len(), 2);

    for row in &table {
        assert_eq!(row.ffd, 200);
        assert_eq!(row.tfc, 1);
        assert_eq!(row.skipped, 0);
    }
    assert_eq!(table[0].word.as_deref(), Some("The"));
    assert_eq!(table[1].word.as_deref(), Some("quick"));
}

#[test]
fn skipped_word_keeps_table_rectangular() {
    let pipeline = ReadingMeasurePipeline::new(
        AoiTable::new(the_quick_page("p1")),
        PipelineConfig::new(),
    );

    // Only "quick" is fixated.
    let events = vec![fixation(0, 150, 45.0, "p1")];

    let table = pipeline.process(&events).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].skipped, 1);
    assert_eq!(table[0].tfc, 0);
    assert_eq!(table[1].skipped, 0);
    assert_eq!(table[1].fd, 150);
    // No previous fixation, so the entry saccade length defaults to 0.
    assert_eq!(table[1].sl_in, 0);
}

#[test]
fn regression_sequence_full_pipeline() {
    let pipeline = ReadingMeasurePipeline::new(
        AoiTable::new(the_quick_page("p1")),
        PipelineConfig::new(),
    );

    // Read "The", move to "quick", regress to "The", return to "quick".
    let events = vec![
        fixation(0, 100, 10.0, "p1"),
        fixation(100, 250, 45.0, "p1"),
        fixation(250, 300, 15.0, "p1"),
        fixation(300, 380, 60.0, "p1"),
    ];

    let table = pipeline.process(&events).unwrap();

    let the = &table[0];
    assert_eq!(the.tfc, 2);
    assert_eq!(the.fprt, 100); // only the initial visit is first-pass
    assert_eq!(the.rrt, 50);
    assert_eq!(the.tft, 150);
    assert_eq!(the.trc_in, 1);
    assert_eq!(the.rr, 1);

    let quick = &table[1];
    assert_eq!(quick.tfc, 2);
    assert_eq!(quick.trc_out, 1);
    // Regression path of "quick": its first fixation plus the regressed
    // visit to "The"; bounded only by the end of the recording.
    assert_eq!(quick.rbrt, 150 + 80);
    assert_eq!(quick.rpd_exc, 50);
    assert_eq!(quick.rpd_inc, 280);
}

#[test]
fn pages_partition_independently() {
    let mut aois = the_quick_page("p1");
    aois.extend(the_quick_page("p2"));
    let pipeline =
        ReadingMeasurePipeline::new(AoiTable::new(aois), PipelineConfig::new());

    // The same word is read once per page; neither counts as rereading.
    let events = vec![
        fixation(0, 100, 10.0, "p1"),
        fixation(100, 200, 10.0, "p2"),
    ];

    let table = pipeline.process(&events).unwrap();
    assert_eq!(table.len(), 4);
    let the_rows: Vec<_> = table.iter().filter(|r| r.word_idx == 0).collect();
    assert_eq!(the_rows.len(), 2);
    for row in the_rows {
        assert_eq!(row.tfc, 1);
        assert_eq!(row.rrt, 0);
        assert_eq!(row.fprt, 100);
    }
}

#[test]
fn missing_page_key_is_a_configuration_error() {
    let pipeline = ReadingMeasurePipeline::new(
        AoiTable::new(the_quick_page("p1")),
        PipelineConfig::new(),
    );

    // The AOI table defines a page column; an event without one cannot
    // be looked up.
    let event = GazeEvent::fixation(0, 100, 10.0, 10.0);
    let err = pipeline.process(&[event]).unwrap_err();
    assert!(matches!(err, MeasureError::MissingGroupKey { column: "page" }));
}

#[test]
fn empty_event_table_yields_fully_skipped_words() {
    let pipeline = ReadingMeasurePipeline::new(
        AoiTable::new(the_quick_page("p1")),
        PipelineConfig::new(),
    );

    let table = pipeline.process(&[]).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|row| row.skipped == 1 && row.tft == 0));
}

#[test]
fn word_level_table_exports_as_json() {
    let pipeline = ReadingMeasurePipeline::new(
        AoiTable::new(the_quick_page("p1")),
        PipelineConfig::new().with_trial("t1"),
    );

    let table = pipeline.process(&[fixation(0, 200, 10.0, "p1")]).unwrap();
    let json = serde_json::to_string(&table).unwrap();
    assert!(json.contains("\"FFD\":200"));
    assert!(json.contains("\"trial\":\"t1\""));
}
