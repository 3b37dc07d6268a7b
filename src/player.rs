use self::autopilot::AutopilotState;
use crate::config::MIN_SPEED_FACTOR;
use crate::math::Point2d;
use crate::util::Rect;
use crate::SimulationConfig;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) mod autopilot;

/// The speed factor the player starts with.
const INITIAL_SPEED_FACTOR: f64 = 1.0;

/// How much the speed factor drops per frame while something is ahead.
const BRAKE_STEP: f64 = 0.02;

/// How much the speed factor rises per frame while the lane is clear.
const ACCELERATE_STEP: f64 = 0.015;

/// The player stops steering once this close to the centre of its target lane.
const LANE_TOLERANCE: f64 = 1.0;

/// How far the player's hitbox is inset from its drawn rectangle.
const HITBOX_INSET: f64 = 5.0;

/// The player's vehicle, which drives itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player {
    /// The top-left corner of the vehicle.
    pos: Point2d,
    /// The lane the vehicle last settled in.
    lane: usize,
    /// The lane the vehicle is steering towards.
    target_lane: usize,
    /// The player's forward speed relative to the baseline.
    speed_factor: f64,
    /// Whether the autopilot is cruising or boxed in.
    state: AutopilotState,
}

impl Player {
    /// Creates the player in the middle lane at the vertical middle of the field.
    pub(crate) fn new(config: &SimulationConfig) -> Self {
        let lane = config.middle_lane();
        Self {
            pos: Point2d::new(config.player_x, 0.5 * config.field_height),
            lane,
            target_lane: lane,
            speed_factor: f64::min(INITIAL_SPEED_FACTOR, config.max_speed_factor),
            state: AutopilotState::Cruising,
        }
    }

    /// The top-left corner of the vehicle.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The horizontal position of the vehicle's left edge.
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    /// The vertical position of the vehicle's top edge.
    pub fn y(&self) -> f64 {
        self.pos.y
    }

    /// The lane the vehicle last settled in.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// The lane the vehicle is steering towards.
    pub fn target_lane(&self) -> usize {
        self.target_lane
    }

    /// The player's forward speed relative to the baseline.
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// The state of the autopilot.
    pub fn state(&self) -> AutopilotState {
        self.state
    }

    /// The time at which the player became boxed in, if it is.
    pub fn blocked_since(&self) -> Option<f64> {
        self.state.blocked_since()
    }

    /// The area in which contact with an obstacle counts as a collision.
    pub fn hitbox(&self, width: f64, height: f64) -> Rect {
        Rect::new(self.pos.x, self.pos.y, width, height).inset(HITBOX_INSET)
    }

    /// Eases off while something is ahead.
    pub(crate) fn brake(&mut self) {
        self.speed_factor = f64::max(self.speed_factor - BRAKE_STEP, MIN_SPEED_FACTOR);
    }

    /// Speeds up while the lane ahead is clear.
    pub(crate) fn accelerate(&mut self, max_speed_factor: f64) {
        self.speed_factor = f64::min(self.speed_factor + ACCELERATE_STEP, max_speed_factor);
    }

    /// Moves towards the centre of the target lane by a fixed fraction of the
    /// remaining distance, settling into it once close enough.
    pub(crate) fn steer(&mut self, target_y: f64, divisor: f64) {
        let dy = target_y - self.pos.y;
        if dy.abs() > LANE_TOLERANCE {
            self.pos.y += dy / divisor;
        }
        if (target_y - self.pos.y).abs() <= LANE_TOLERANCE {
            self.lane = self.target_lane;
        }
    }
}
