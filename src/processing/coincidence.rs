use crate::types::config::CoincidenceConfig;
use crate::types::event::{CoincidencePair, SingleEvent, distance};
use tracing::debug;

/// Counts collected during one coincidence sorting pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoincidenceStats {
    pub singles: usize,
    pub coincidences: usize,
    /// Singles that ended up in no pair and were dropped
    pub unpaired: usize,
    /// In-window candidates rejected for being too close to the trigger hit
    pub rejected_by_separation: usize,
}

/// Pair singles into coincidences.
///
/// Singles are visited in time order. Each unconsumed single takes the first
/// later, unconsumed single that arrives within `time_window_ns` and lies more
/// than `min_separation_mm` away; both are then consumed. Candidates that are
/// too close are skipped without ending the scan. Singles without a partner
/// are dropped.
///
/// Times and positions must not be NaN.
pub fn find_coincidences(events: &[SingleEvent], config: &CoincidenceConfig) -> Vec<CoincidencePair> {
    find_coincidences_with_stats(events, config).0
}

/// Same as [`find_coincidences`], also reporting pass statistics
pub fn find_coincidences_with_stats(
    events: &[SingleEvent],
    config: &CoincidenceConfig,
) -> (Vec<CoincidencePair>, CoincidenceStats) {
    let n = events.len();
    let mut stats = CoincidenceStats {
        singles: n,
        ..Default::default()
    };
    if n < 2 {
        stats.unpaired = n;
        return (Vec::new(), stats);
    }

    let window = config.time_window_ns;
    let min_separation = config.min_separation_mm;

    // Stable, so simultaneous singles keep their input order
    let mut time_order: Vec<usize> = (0..n).collect();
    time_order.sort_by(|&a, &b| events[a].time.total_cmp(&events[b].time));

    // Indexed by original event position
    let mut consumed = vec![false; n];
    let mut pairs = Vec::new();

    for i in 0..n - 1 {
        let idx1 = time_order[i];
        if consumed[idx1] {
            continue;
        }
        let first = &events[idx1];

        for &idx2 in &time_order[i + 1..] {
            let second = &events[idx2];
            if second.time - first.time > window {
                break;
            }
            if consumed[idx2] {
                continue;
            }

            let separation = distance(&first.position, &second.position);
            if separation > min_separation {
                pairs.push(CoincidencePair::from_singles(first, idx1, second, idx2, separation));
                consumed[idx1] = true;
                consumed[idx2] = true;
                break;
            }
            stats.rejected_by_separation += 1;
        }
    }

    stats.coincidences = pairs.len();
    stats.unpaired = n - 2 * pairs.len();
    debug!(
        singles = stats.singles,
        coincidences = stats.coincidences,
        unpaired = stats.unpaired,
        rejected_by_separation = stats.rejected_by_separation,
        "coincidence pass finished"
    );

    (pairs, stats)
}
