pub use cgmath;
pub use config::{ConfigError, SimulationConfig, MIN_SPEED_FACTOR};
pub use detect::{is_vehicle_ahead_in_lane, rects_overlap, Heading, Probe};
pub use obstacle::{Obstacle, ObstacleAttributes, VehicleKind};
pub use player::autopilot::AutopilotState;
pub use player::Player;
pub use simulation::{Simulation, StepReport};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use util::{Interval, Rect};

mod config;
mod debug;
mod detect;
pub mod math;
mod obstacle;
mod player;
mod separation;
mod simulation;
mod spawn;
mod util;

new_key_type! {
    /// Unique ID of an [Obstacle].
    pub struct ObstacleId;
}

/// The set of obstacles on the road.
pub type ObstacleSet = SlotMap<ObstacleId, Obstacle>;
