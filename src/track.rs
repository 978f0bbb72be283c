use serde::Serialize;

use crate::distance::distance_km;
use crate::record::{GpsRecord, parse_line};
use crate::video::{VideoEntry, VideoIndex};

/// Thresholds for the joint temporal/spatial denoising filter.
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    /// Maximum plausible jump between consecutive retained points, km.
    pub max_jump_km: f64,
    /// Minimum time between retained points, seconds.
    pub min_interval_secs: f64,
}

/// One retained GPS fix, annotated with the recording that was active at
/// that moment (if any).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    pub record: GpsRecord,
    pub matched_video: Option<VideoEntry>,
}

/// The ordered, filtered points derived from one log file.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSegment {
    pub source_file: String,
    pub points: Vec<TrackPoint>,
}

impl TrackSegment {
    /// Whether a renderer may connect this segment's points with a line.
    /// Short segments still carry their points for marker rendering.
    pub fn is_line_eligible(&self) -> bool {
        self.points.len() >= 2
    }
}

// hand-written so the derived eligibility flag travels with the segment
impl Serialize for TrackSegment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("TrackSegment", 3)?;
        state.serialize_field("source_file", &self.source_file)?;
        state.serialize_field("line_eligible", &self.is_line_eligible())?;
        state.serialize_field("points", &self.points)?;
        state.end()
    }
}

/// Single reject guard for a candidate against the last retained point:
/// too soon (downsampling) or too far (jump rejection). The two conditions
/// are deliberately one guard, and a negative time delta counts as "too
/// soon" rather than a separate clock-rollback case.
fn should_retain(prev: &GpsRecord, candidate: &GpsRecord, filter: &FilterConfig) -> bool {
    let delta_secs = (candidate.timestamp - prev.timestamp).num_seconds() as f64;
    let jump_km = distance_km(
        candidate.latitude(),
        candidate.longitude(),
        prev.latitude(),
        prev.longitude(),
    );

    delta_secs >= filter.min_interval_secs && jump_km <= filter.max_jump_km
}

/// Fold a file's lines into a `TrackSegment`: parse each line, apply the
/// retain guard against the last retained point, and annotate survivors
/// with the active recording. Malformed lines drop out without touching the
/// filter state.
pub fn build_track<'a, I>(
    source_file: &str,
    lines: I,
    index: &VideoIndex,
    filter: &FilterConfig,
) -> TrackSegment
where
    I: IntoIterator<Item = &'a str>,
{
    let mut segment = TrackSegment {
        source_file: source_file.to_string(),
        points: Vec::new(),
    };
    let mut last_retained: Option<GpsRecord> = None;

    for line in lines {
        let Some(record) = parse_line(line) else {
            continue;
        };

        if let Some(prev) = &last_retained
            && !should_retain(prev, &record, filter)
        {
            continue;
        }

        last_retained = Some(record);
        segment.points.push(TrackPoint {
            record,
            matched_video: index.find_active(record.timestamp).cloned(),
        });
    }

    segment
}
