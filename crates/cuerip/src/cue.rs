// Cue Classifier: Interprets the SCTE-35 metadata carried by media segments.

use m3u8_rs::MediaSegment;

/// A discrete ad-boundary marker attached to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueMarker {
    /// Start or continuation of an ad break
    /// (`EXT-X-CUE-OUT`, `EXT-X-CUE-OUT-CONT`).
    Out,
    /// End of an ad break (`EXT-X-CUE-IN`).
    In,
}

/// Extracts the ordered cue markers from a segment's non-standard tags.
///
/// Tag names are matched the way m3u8-rs stores them, without the `#EXT-`
/// prefix. Anything that is not a cue marker is ignored.
pub fn segment_markers(segment: &MediaSegment) -> Vec<CueMarker> {
    segment
        .unknown_tags
        .iter()
        .filter_map(|tag| {
            let name = tag.tag.as_str();
            if name.eq_ignore_ascii_case("X-CUE-OUT") || name.eq_ignore_ascii_case("X-CUE-OUT-CONT")
            {
                Some(CueMarker::Out)
            } else if name.eq_ignore_ascii_case("X-CUE-IN") {
                Some(CueMarker::In)
            } else {
                None
            }
        })
        .collect()
}

/// Returns true when the segment closes an ad interval.
///
/// A DATERANGE decides on its own: the interval is closed iff it carries an
/// end date, and discrete markers are not consulted. Without a DATERANGE the
/// segment is a boundary iff any of its markers is `In`.
pub fn is_cue_in(segment: &MediaSegment) -> bool {
    if let Some(daterange) = &segment.daterange {
        return daterange.end_date.is_some();
    }
    segment_markers(segment)
        .iter()
        .any(|marker| *marker == CueMarker::In)
}

/// Returns true when the segment carries any SCTE-35 cue metadata at all.
pub fn has_cue_metadata(segment: &MediaSegment) -> bool {
    segment.daterange.is_some() || !segment_markers(segment).is_empty()
}
