//! Collapse a stack of tracks into a single track.
//!
//! At every instant the topmost non-gap item wins. Where every track is
//! empty or gapped the result holds a gap.

use crate::item::{Gap, Item};
use crate::time::{RationalTime, TimeRange};
use crate::track::{Track, TrackKind};

/// Flatten `tracks` (bottom first, top last) into one video track.
///
/// Clips that are partly covered by a clip above them are trimmed so that
/// only their visible part remains.
pub fn flatten_stack(tracks: &[&Track]) -> Track {
    let mut flat = Track::new("Flattened", TrackKind::Video);

    let Some(end) = tracks
        .iter()
        .filter_map(|t| t.duration())
        .reduce(RationalTime::latest)
    else {
        return flat;
    };

    let range = TimeRange::new(RationalTime::zero(end.rate), end);
    flatten_into(tracks, &range, &mut flat);
    tracing::debug!(
        tracks = tracks.len(),
        items = flat.len(),
        "flattened track stack"
    );
    flat
}

fn flatten_into(tracks: &[&Track], range: &TimeRange, out: &mut Track) {
    if range.is_empty() {
        return;
    }

    let Some((top, below)) = tracks.split_last() else {
        out.append(Item::Gap(Gap::with_duration(range.duration)));
        return;
    };

    let mut covered_until = range.start_time;

    for placement in top.placements() {
        match placement.item {
            Item::Transition(transition) => {
                if range.contains(&placement.range.start_time) {
                    out.append(Item::Transition(transition.clone()));
                }
            }
            Item::Gap(_) => {
                if let Some(window) = placement.range.intersection(range) {
                    flatten_into(below, &window, out);
                    covered_until = window.end_time_exclusive();
                }
            }
            Item::Clip(clip) => {
                if let Some(window) = placement.range.intersection(range) {
                    out.append(Item::Clip(clip.trimmed_to(&placement.range, &window)));
                    covered_until = window.end_time_exclusive();
                }
            }
        }
    }

    let end = range.end_time_exclusive();
    if covered_until.is_before(&end) {
        let rest = TimeRange::from_start_end_time(covered_until, end);
        flatten_into(below, &rest, out);
    }
}
