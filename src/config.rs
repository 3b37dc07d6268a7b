//! Tunable parameters of the simulation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The lowest speed factor the player's autopilot will slow down to.
pub const MIN_SPEED_FACTOR: f64 = 0.5;

/// An error produced when a [SimulationConfig] is unusable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("lane count must be at least 1")]
    NoLanes,
    #[error("`{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("max speed factor {0} is below the minimum speed factor of 0.5")]
    SpeedFactorTooLow(f64),
    #[error("vehicle height {vehicle} does not fit in a lane of height {lane}")]
    VehicleTooTall { vehicle: f64, lane: f64 },
    #[error("`{name}` must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("`{name}` must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("lane change divisor {0} is below 1 and would overshoot the lane")]
    LaneChangeTooFast(f64),
    #[error("extra spawn probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
    #[cfg(feature = "serde")]
    #[error("malformed configuration: {0}")]
    Parse(String),
}

/// The parameters of a simulation.
///
/// All distances are in field units, with the origin at the top-left of the field.
/// Obstacles travel towards negative x; the player faces positive x.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SimulationConfig {
    /// The number of lanes.
    pub lane_count: usize,
    /// The width of the visible field.
    pub field_width: f64,
    /// The height of the visible field, shared equally by the lanes.
    pub field_height: f64,
    /// The width of every vehicle.
    pub vehicle_width: f64,
    /// The height of every vehicle.
    pub vehicle_height: f64,
    /// The slowest cruising speed of an obstacle, in units per tick.
    pub base_obstacle_speed: f64,
    /// The gap ahead of the player within which it brakes and looks for another lane.
    pub front_detection_horizon: f64,
    /// The gap ahead of the player which must be clear in a lane for it to move there.
    pub side_detection_horizon: f64,
    /// The wall-clock time between spawns, in ms.
    pub spawn_interval_ms: f64,
    /// The highest speed factor the player's autopilot will accelerate to.
    pub max_speed_factor: f64,
    /// The number of ticks an obstacle must wait between lane changes.
    pub lane_change_cooldown_ticks: usize,
    /// How long the player may stay blocked before the traffic is cleared, in ms.
    pub deadlock_reset_ms: f64,
    /// The fixed horizontal position of the player.
    pub player_x: f64,
    /// The divisor applied to the player's remaining lateral distance each tick.
    pub lane_change_divisor: f64,
    /// The gap ahead of an obstacle within which it slows down.
    pub obstacle_front_horizon: f64,
    /// The gap which must be clear in a lane for an obstacle to move there.
    pub obstacle_side_horizon: f64,
    /// The maximum random distance beyond the field edge at which obstacles spawn.
    pub spawn_jitter: f64,
    /// The range of the random speed added to `base_obstacle_speed`.
    pub speed_variation: f64,
    /// The probability of a second obstacle spawning alongside a scheduled one.
    pub extra_spawn_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lane_count: 5,
            field_width: 1000.0,
            field_height: 500.0,
            vehicle_width: 40.0,
            vehicle_height: 30.0,
            base_obstacle_speed: 3.0,
            front_detection_horizon: 130.0,
            side_detection_horizon: 150.0,
            spawn_interval_ms: 600.0,
            max_speed_factor: 2.0,
            lane_change_cooldown_ticks: 20,
            deadlock_reset_ms: 3000.0,
            player_x: 80.0,
            lane_change_divisor: 5.0,
            obstacle_front_horizon: 150.0,
            obstacle_side_horizon: 100.0,
            spawn_jitter: 200.0,
            speed_variation: 2.0,
            extra_spawn_probability: 0.3,
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from JSON and validates it.
    /// Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be simulated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::NoLanes);
        }

        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("vehicle_width", self.vehicle_width),
            ("vehicle_height", self.vehicle_height),
            ("base_obstacle_speed", self.base_obstacle_speed),
            ("front_detection_horizon", self.front_detection_horizon),
            ("side_detection_horizon", self.side_detection_horizon),
            ("lane_change_divisor", self.lane_change_divisor),
            ("obstacle_front_horizon", self.obstacle_front_horizon),
            ("obstacle_side_horizon", self.obstacle_side_horizon),
        ];
        if let Some((name, value)) = positive.into_iter().find(|(_, value)| !(*value > 0.0)) {
            return Err(ConfigError::NotPositive { name, value });
        }

        let non_negative = [
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("deadlock_reset_ms", self.deadlock_reset_ms),
            ("spawn_jitter", self.spawn_jitter),
            ("speed_variation", self.speed_variation),
        ];
        if let Some((name, value)) = non_negative.into_iter().find(|(_, value)| !(*value >= 0.0)) {
            return Err(ConfigError::Negative { name, value });
        }

        // Bounds of the spawn distributions
        let finite = [
            ("base_obstacle_speed", self.base_obstacle_speed),
            ("spawn_jitter", self.spawn_jitter),
            ("speed_variation", self.speed_variation),
        ];
        if let Some((name, value)) = finite.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NotFinite { name, value });
        }

        if self.lane_change_divisor < 1.0 {
            return Err(ConfigError::LaneChangeTooFast(self.lane_change_divisor));
        }
        if !(self.max_speed_factor >= MIN_SPEED_FACTOR) {
            return Err(ConfigError::SpeedFactorTooLow(self.max_speed_factor));
        }
        if self.vehicle_height > self.lane_height() {
            return Err(ConfigError::VehicleTooTall {
                vehicle: self.vehicle_height,
                lane: self.lane_height(),
            });
        }
        if !(0.0..=1.0).contains(&self.extra_spawn_probability) {
            return Err(ConfigError::InvalidProbability(self.extra_spawn_probability));
        }
        Ok(())
    }

    /// The height of a single lane.
    pub fn lane_height(&self) -> f64 {
        self.field_height / self.lane_count as f64
    }

    /// The vertical position of the top edge of a vehicle centred in the given lane.
    pub fn lane_y(&self, lane: usize) -> f64 {
        let lane_height = self.lane_height();
        lane as f64 * lane_height + 0.5 * lane_height - 0.5 * self.vehicle_height
    }

    /// The middle lane, where the player starts.
    pub fn middle_lane(&self) -> usize {
        self.lane_count / 2
    }

    /// The lanes directly beside `lane` which exist on the road.
    pub fn neighbours(&self, lane: usize) -> impl Iterator<Item = usize> {
        let count = self.lane_count;
        [lane.checked_sub(1), lane.checked_add(1)]
            .into_iter()
            .flatten()
            .filter(move |lane| *lane < count)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn default_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn lane_centres() {
        let config = SimulationConfig::default();
        assert_approx_eq!(config.lane_height(), 100.0);
        assert_approx_eq!(config.lane_y(0), 35.0);
        assert_approx_eq!(config.lane_y(2), 235.0);
        assert_eq!(config.middle_lane(), 2);
    }

    #[test]
    fn neighbours_stay_on_the_road() {
        let config = SimulationConfig::default();
        assert_eq!(config.neighbours(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(config.neighbours(2).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(config.neighbours(4).collect::<Vec<_>>(), vec![3]);

        let single = SimulationConfig {
            lane_count: 1,
            ..Default::default()
        };
        assert_eq!(single.neighbours(0).count(), 0);
    }

    #[test]
    fn rejects_bad_configs() {
        let no_lanes = SimulationConfig {
            lane_count: 0,
            ..Default::default()
        };
        assert_eq!(no_lanes.validate(), Err(ConfigError::NoLanes));

        let slow = SimulationConfig {
            max_speed_factor: 0.3,
            ..Default::default()
        };
        assert_eq!(slow.validate(), Err(ConfigError::SpeedFactorTooLow(0.3)));

        let crowded = SimulationConfig {
            lane_count: 50,
            ..Default::default()
        };
        assert!(matches!(
            crowded.validate(),
            Err(ConfigError::VehicleTooTall { .. })
        ));

        let narrow = SimulationConfig {
            field_width: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            narrow.validate(),
            Err(ConfigError::NotPositive {
                name: "field_width",
                ..
            })
        ));
    }

    #[test]
    fn rejects_unbounded_spawn_ranges() {
        let jitter = SimulationConfig {
            spawn_jitter: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(
            jitter.validate(),
            Err(ConfigError::NotFinite {
                name: "spawn_jitter",
                value: f64::INFINITY
            })
        );

        let variation = SimulationConfig {
            speed_variation: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            variation.validate(),
            Err(ConfigError::NotFinite {
                name: "speed_variation",
                ..
            })
        ));

        let speed = SimulationConfig {
            base_obstacle_speed: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            speed.validate(),
            Err(ConfigError::NotFinite {
                name: "base_obstacle_speed",
                ..
            })
        ));
    }

    #[test]
    fn rejects_overshooting_lane_changes() {
        let fast = SimulationConfig {
            lane_change_divisor: 0.25,
            ..Default::default()
        };
        assert_eq!(fast.validate(), Err(ConfigError::LaneChangeTooFast(0.25)));

        let instant = SimulationConfig {
            lane_change_divisor: 1.0,
            ..Default::default()
        };
        assert_eq!(instant.validate(), Ok(()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_partial_json() {
        let config = SimulationConfig::from_json(r#"{ "lane_count": 3, "spawn_interval_ms": 250.0 }"#)
            .unwrap();
        assert_eq!(config.lane_count, 3);
        assert_approx_eq!(config.spawn_interval_ms, 250.0);
        assert_approx_eq!(config.field_width, 1000.0);

        let err = SimulationConfig::from_json(r#"{ "lane_count": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::NoLanes);
    }
}
