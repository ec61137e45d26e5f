//! Event-to-AOI mapping
//!
//! Applies the AOI lookup across a whole event table, attaching each
//! event's word and character identity. Mapping preserves event count and
//! order; the AOI columns are unioned in as an [`AoiHit`] per row.

use serde::{Deserialize, Serialize};

use crate::aoi::table::{AoiHit, AoiQuery, AoiTable};
use crate::config::PipelineConfig;
use crate::types::{EventLocation, GazeEvent, MeasureError, Result};

/// A gaze event with its AOI identity attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedEvent {
    /// The original event (location possibly flattened, see
    /// `preserve_structure`)
    pub event: GazeEvent,
    /// The AOI occupying the event location (all-`None` when outside
    /// every AOI)
    pub aoi: AoiHit,
}

impl MappedEvent {
    /// Event duration (`offset - onset`)
    pub fn duration(&self) -> i64 {
        self.event.duration()
    }
}

/// Map every event onto the AOI occupying its location.
///
/// For each event the lookup uses the event's resolved gaze point and its
/// trial/page identity. Binocular locations are flattened to the
/// configured eye for the lookup; when `preserve_structure` is true the
/// output keeps the caller's original nested representation, otherwise
/// the flattened point is left in place. The flag never changes which AOI
/// a row is assigned to.
///
/// Events without a location receive an all-`None` hit so the output
/// stays rectangular; an event table where no row carries a location at
/// all is a schema error.
pub fn map_events(
    events: &[GazeEvent],
    aois: &AoiTable,
    config: &PipelineConfig,
) -> Result<Vec<MappedEvent>> {
    if !events.is_empty() && events.iter().all(|e| e.location.is_none()) {
        return Err(MeasureError::MissingColumn {
            table: "event",
            column: "location",
        });
    }

    log::debug!(
        "mapping {} events onto {} AOIs (eye={}, preserve_structure={})",
        events.len(),
        aois.len(),
        config.eye,
        config.preserve_structure
    );

    let mut mapped = Vec::with_capacity(events.len());

    for event in events {
        let (hit, flattened) = match event.location {
            Some(location) => {
                let point = location.resolve(config.eye);
                let mut query = AoiQuery::new(point.x, point.y);
                if let Some(trial) = event.trial.as_deref() {
                    query = query.with_trial(trial);
                }
                if let Some(page) = event.page.as_deref() {
                    query = query.with_page(page);
                }
                (aois.get_aoi(&query)?, Some(EventLocation::Point(point)))
            }
            None => (AoiHit::none(), None),
        };

        let mut out = event.clone();
        if !config.preserve_structure {
            out.location = flattened.or(out.location);
        }
        mapped.push(MappedEvent { event: out, aoi: hit });
    }

    Ok(mapped)
}
