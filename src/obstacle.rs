use crate::math::{geometric_towards, lerp_towards, Point2d};
use crate::util::Rect;
use crate::ObstacleId;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) mod autonomy;

/// The fraction of its cruising speed an obstacle slows to when following another.
const FOLLOW_SPEED_RATIO: f64 = 0.5;

/// The factor applied to the speed each tick while following.
const DECELERATION_RATE: f64 = 0.98;

/// The factor applied to the speed each tick while the road ahead is clear.
const ACCELERATION_RATE: f64 = 1.02;

/// The fraction of the remaining lateral distance covered each tick during a lane change.
const LANE_CHANGE_RATE: f64 = 0.1;

/// A lane change completes once the remaining lateral distance is below this.
const LANE_CHANGE_SNAP: f64 = 2.0;

/// The look of an obstacle. Only used by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VehicleKind {
    SportsCar,
    Sedan,
    Suv,
}

impl VehicleKind {
    /// All the vehicle kinds.
    pub const ALL: [VehicleKind; 3] = [VehicleKind::SportsCar, VehicleKind::Sedan, VehicleKind::Suv];
}

impl Distribution<VehicleKind> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> VehicleKind {
        VehicleKind::ALL[rng.gen_range(0..VehicleKind::ALL.len())]
    }
}

/// A simulated NPC vehicle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    /// The obstacle's ID.
    pub(crate) id: ObstacleId,
    /// The top-left corner of the obstacle.
    pos: Point2d,
    /// The lane the obstacle is in.
    lane: usize,
    /// The lane the obstacle is moving to; equal to `lane` when not changing lanes.
    target_lane: usize,
    /// The preferred cruising speed, in units per tick.
    base_speed: f64,
    /// The current speed, in units per tick.
    speed: f64,
    /// The look of the obstacle.
    kind: VehicleKind,
    /// The frame in which the obstacle last decided to change lanes.
    last_lane_change: usize,
}

/// The attributes of a new obstacle.
#[derive(Clone, Copy, Debug)]
pub struct ObstacleAttributes {
    /// The lane the obstacle starts in.
    pub lane: usize,
    /// The horizontal position of the obstacle's left edge.
    pub x: f64,
    /// The preferred cruising speed, in units per tick.
    pub base_speed: f64,
    /// The look of the obstacle.
    pub kind: VehicleKind,
}

impl Obstacle {
    /// Creates a new obstacle cruising at its base speed.
    pub(crate) fn new(id: ObstacleId, attributes: &ObstacleAttributes, y: f64) -> Self {
        Self {
            id,
            pos: Point2d::new(attributes.x, y),
            lane: attributes.lane,
            target_lane: attributes.lane,
            base_speed: attributes.base_speed,
            speed: attributes.base_speed,
            kind: attributes.kind,
            last_lane_change: 0,
        }
    }

    /// Gets the obstacle's ID.
    pub fn id(&self) -> ObstacleId {
        self.id
    }

    /// The top-left corner of the obstacle.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The horizontal position of the obstacle's left edge.
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    /// The vertical position of the obstacle's top edge.
    pub fn y(&self) -> f64 {
        self.pos.y
    }

    /// The lane the obstacle is in.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// The lane the obstacle is moving towards.
    pub fn target_lane(&self) -> usize {
        self.target_lane
    }

    /// Whether the obstacle is part way through a lane change.
    pub fn is_changing_lanes(&self) -> bool {
        self.lane != self.target_lane
    }

    /// The preferred cruising speed.
    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    /// The current speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The look of the obstacle.
    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    /// The frame in which the obstacle last decided to change lanes.
    pub fn last_lane_change(&self) -> usize {
        self.last_lane_change
    }

    /// The rectangle covered by the obstacle.
    pub fn rect(&self, width: f64, height: f64) -> Rect {
        Rect::new(self.pos.x, self.pos.y, width, height)
    }

    /// Whether the obstacle has finished its lane change cooldown.
    pub(crate) fn can_change_lanes(&self, frame: usize, cooldown: usize) -> bool {
        frame.saturating_sub(self.last_lane_change) >= cooldown
    }

    /// Slows down while following, otherwise speeds back up to cruising speed.
    pub(crate) fn follow(&mut self, blocked: bool) {
        self.speed = if blocked {
            geometric_towards(
                self.speed,
                DECELERATION_RATE,
                FOLLOW_SPEED_RATIO * self.base_speed,
            )
        } else {
            geometric_towards(self.speed, ACCELERATION_RATE, self.base_speed)
        };
    }

    /// Commits to a lane change.
    pub(crate) fn begin_lane_change(&mut self, lane: usize, frame: usize) {
        self.target_lane = lane;
        self.last_lane_change = frame;
    }

    /// Moves part of the way towards `target_y`, the top edge of a vehicle
    /// centred in the target lane, completing the lane change once close enough.
    pub(crate) fn steer(&mut self, target_y: f64) {
        if !self.is_changing_lanes() {
            return;
        }
        let dy = target_y - self.pos.y;
        self.pos.y = lerp_towards(self.pos.y, target_y, LANE_CHANGE_RATE);
        if dy.abs() < LANE_CHANGE_SNAP {
            self.lane = self.target_lane;
        }
    }

    /// Moves the obstacle along the road, scaled by the player's speed factor.
    pub(crate) fn advance(&mut self, speed_factor: f64) {
        self.pos.x -= self.speed * speed_factor;
    }

    /// Shifts the obstacle along the road without touching its speed.
    pub(crate) fn nudge(&mut self, dx: f64) {
        self.pos.x += dx;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use slotmap::Key;

    fn obstacle(lane: usize, y: f64) -> Obstacle {
        let attributes = ObstacleAttributes {
            lane,
            x: 500.0,
            base_speed: 4.0,
            kind: VehicleKind::Suv,
        };
        Obstacle::new(ObstacleId::null(), &attributes, y)
    }

    #[test]
    fn speed_stays_between_floor_and_base() {
        let mut obs = obstacle(0, 35.0);
        for _ in 0..200 {
            obs.follow(true);
            assert!(obs.speed() >= 2.0 && obs.speed() <= 4.0);
        }
        assert_approx_eq!(obs.speed(), 2.0);
        for _ in 0..200 {
            obs.follow(false);
            assert!(obs.speed() >= 2.0 && obs.speed() <= 4.0);
        }
        assert_approx_eq!(obs.speed(), 4.0);
    }

    #[test]
    fn lane_change_converges() {
        let mut obs = obstacle(0, 35.0);
        obs.begin_lane_change(1, 30);
        assert!(obs.is_changing_lanes());
        assert_eq!(obs.last_lane_change(), 30);

        obs.steer(135.0);
        assert_approx_eq!(obs.y(), 45.0);
        assert_eq!(obs.lane(), 0);

        let mut ticks = 1;
        while obs.is_changing_lanes() {
            obs.steer(135.0);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(obs.lane(), 1);
        assert!((135.0 - obs.y()).abs() < LANE_CHANGE_SNAP);
    }

    #[test]
    fn cooldown() {
        let mut obs = obstacle(2, 235.0);
        assert!(obs.can_change_lanes(20, 20));
        obs.begin_lane_change(3, 25);
        assert!(!obs.can_change_lanes(44, 20));
        assert!(obs.can_change_lanes(45, 20));
    }

    #[test]
    fn advance_scales_with_speed_factor() {
        let mut obs = obstacle(0, 35.0);
        obs.advance(1.5);
        assert_approx_eq!(obs.x(), 494.0);
        obs.nudge(2.0);
        assert_approx_eq!(obs.x(), 496.0);
    }

    #[test]
    fn every_kind_is_sampled() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let kind: VehicleKind = rng.gen();
            let idx = VehicleKind::ALL.iter().position(|k| *k == kind).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
