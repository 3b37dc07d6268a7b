use crate::{ObstacleId, ObstacleSet};
use itertools::Itertools;

/// Extra space kept between obstacles in the same lane, beyond their width.
const SEPARATION_MARGIN: f64 = 10.0;

/// How far each obstacle of a pair is pushed apart per frame.
const SEPARATION_NUDGE: f64 = 2.0;

/// Pushes apart every pair of obstacles in the same lane that are closer
/// than `vehicle_width` plus a margin. Speeds and lanes are left untouched.
/// Returns the number of pairs nudged.
pub(crate) fn separate_obstacles(obstacles: &mut ObstacleSet, vehicle_width: f64) -> usize {
    let min_dist = vehicle_width + SEPARATION_MARGIN;
    let ids = obstacles.keys().collect::<Vec<ObstacleId>>();
    let mut nudged = 0;

    for (a, b) in ids.into_iter().tuple_combinations() {
        if let Some([a, b]) = obstacles.get_disjoint_mut([a, b]) {
            if a.lane() != b.lane() || (a.x() - b.x()).abs() >= min_dist {
                continue;
            }
            // The one in front moves further ahead
            let dir = if a.x() < b.x() { -1.0 } else { 1.0 };
            a.nudge(dir * SEPARATION_NUDGE);
            b.nudge(-dir * SEPARATION_NUDGE);
            nudged += 1;
        }
    }

    nudged
}
