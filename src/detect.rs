//! Collision and proximity queries shared by the player and the obstacles.

use crate::util::Rect;
use crate::{Obstacle, ObstacleId, ObstacleSet, Player, SimulationConfig};

/// The direction a vehicle is looking along the road.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    /// Looking towards positive x, as the player does.
    Forward,
    /// Looking towards negative x, the direction obstacles travel.
    Backward,
}

/// The point from which a vehicle looks for traffic ahead of it.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    /// The horizontal position that gaps are measured from.
    pub front: f64,
    /// Which way is "ahead".
    pub heading: Heading,
    /// An obstacle to ignore, usually the one doing the looking.
    pub exclude: Option<ObstacleId>,
}

impl Probe {
    /// The probe used by an obstacle, measured from its own position.
    pub fn obstacle(id: ObstacleId, obstacle: &Obstacle) -> Self {
        Self {
            front: obstacle.x(),
            heading: Heading::Backward,
            exclude: Some(id),
        }
    }

    /// The probe used by the player, measured from its front bumper.
    pub fn player(player: &Player, config: &SimulationConfig) -> Self {
        Self {
            front: player.x() + config.vehicle_width,
            heading: Heading::Forward,
            exclude: None,
        }
    }

    /// The forward gap between the probe and a horizontal position.
    /// Negative if the position is behind the probe.
    pub fn gap_to(&self, x: f64) -> f64 {
        match self.heading {
            Heading::Forward => x - self.front,
            Heading::Backward => self.front - x,
        }
    }
}

/// Returns true if the two rectangles overlap.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Returns true if any obstacle other than the probe's own is in `lane`,
/// strictly ahead of the probe and closer than `horizon`.
pub fn is_vehicle_ahead_in_lane(
    probe: &Probe,
    lane: usize,
    obstacles: &ObstacleSet,
    horizon: f64,
) -> bool {
    obstacles
        .iter()
        .filter(|(id, _)| Some(*id) != probe.exclude)
        .filter(|(_, obstacle)| obstacle.lane() == lane)
        .map(|(_, obstacle)| probe.gap_to(obstacle.x()))
        .any(|gap| gap > 0.0 && gap < horizon)
}
