use chrono::Duration;

use crate::schedule::types::{RefinedPass, Schedule};

/// Order passes of all satellites by start and serialize overlaps.
///
/// The sort is stable, so equal starts keep the order they were collected
/// in. Overlaps are resolved in one forward scan over adjacent pairs: when a
/// pass starts at or before the end of its predecessor it is moved to one
/// second past that end and both are flagged. Nothing is re-sorted or
/// re-checked after a move.
pub fn merge(mut passes: Vec<RefinedPass>) -> Schedule {
    passes.sort_by_key(|p| p.start);

    for i in 1..passes.len() {
        let (before, after) = passes.split_at_mut(i);
        let current = &mut before[i - 1];
        let next = &mut after[0];

        if next.start <= current.end {
            next.start = current.end + Duration::seconds(1);
            current.conflict = true;
            next.conflict = true;
        }
    }

    Schedule { passes }
}
