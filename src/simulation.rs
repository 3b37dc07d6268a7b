use crate::config::ConfigError;
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::debug::debug_marker;
use crate::detect::rects_overlap;
use crate::obstacle::autonomy::{self, DriveContext};
use crate::player::autopilot::{self, AutopilotAction};
use crate::separation::separate_obstacles;
use crate::spawn::{random_obstacle, SpawnTimer};
use crate::{Obstacle, ObstacleAttributes, ObstacleId, ObstacleSet, Player, SimulationConfig};
use log::{info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// How far the road markings scroll per frame at a speed factor of 1.
const ROAD_SCROLL_RATE: f64 = 2.5;

/// The period of the road markings; the scroll offset wraps at this value.
const ROAD_MARKING_PERIOD: f64 = 50.0;

/// A traffic simulation.
pub struct Simulation<R = StdRng> {
    /// The simulation parameters.
    config: SimulationConfig,
    /// The obstacles on the road.
    obstacles: ObstacleSet,
    /// The player's vehicle.
    player: Player,
    /// The current frame of simulation.
    frame: usize,
    /// Decides when obstacles spawn.
    spawner: SpawnTimer,
    /// The scroll offset of the road markings.
    road_offset: f64,
    /// Whether the player touched an obstacle in the previous frame.
    collision: bool,
    /// The source of randomness for spawning and lane choices.
    rng: R,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

/// A summary of what happened during a single step.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepReport {
    /// Whether the player's hitbox overlaps an obstacle.
    pub collision: bool,
    /// The obstacles which entered the road.
    pub spawned: SmallVec<[ObstacleId; 2]>,
    /// The number of obstacles which left the road.
    pub despawned: usize,
    /// The number of obstacles which started a lane change.
    pub lane_changes: usize,
    /// Whether all the obstacles were cleared to free the player.
    pub deadlock_reset: bool,
}

impl Default for Simulation<StdRng> {
    fn default() -> Self {
        Self::from_parts(SimulationConfig::default(), StdRng::from_entropy())
    }
}

impl Simulation<StdRng> {
    /// Creates a new simulation seeded from the operating system.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a new simulation which behaves identically on every run
    /// given the same seed and the same timestamps.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a new simulation drawing its randomness from `rng`.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, rng))
    }

    fn from_parts(config: SimulationConfig, rng: R) -> Self {
        Self {
            player: Player::new(&config),
            config,
            obstacles: ObstacleSet::with_key(),
            frame: 0,
            spawner: SpawnTimer::default(),
            road_offset: 0.0,
            collision: false,
            rng,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Adds an obstacle to the road, centred in its lane.
    ///
    /// # Panics
    /// Panics if the lane does not exist.
    pub fn add_obstacle(&mut self, attributes: &ObstacleAttributes) -> ObstacleId {
        assert!(
            attributes.lane < self.config.lane_count,
            "Lane {} is out of range",
            attributes.lane
        );
        let y = self.config.lane_y(attributes.lane);
        self.obstacles
            .insert_with_key(|id| Obstacle::new(id, attributes, y))
    }

    /// Removes an obstacle from the road.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Obstacle> {
        self.obstacles.remove(id)
    }

    /// Removes every obstacle from the road.
    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// Advances the simulation by one frame.
    ///
    /// # Parameters
    /// * `now` - The wall-clock time in ms, used for spawning and deadlock detection.
    pub fn step(&mut self, now: f64) -> StepReport {
        let mut report = StepReport::default();

        self.frame += 1;
        self.scroll_road();
        self.spawn_obstacles(now, &mut report);
        self.drive_obstacles(&mut report);
        separate_obstacles(&mut self.obstacles, self.config.vehicle_width);
        self.remove_departed(&mut report);
        self.drive_player(now, &mut report);
        self.collision = self.check_collision();
        report.collision = self.collision;

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        report
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Gets the simulation parameters.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Gets the player's vehicle.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player's speed factor, which scales the motion of all the obstacles.
    pub fn speed_factor(&self) -> f64 {
        self.player.speed_factor()
    }

    /// The scroll offset of the road markings.
    pub fn road_offset(&self) -> f64 {
        self.road_offset
    }

    /// Whether the player touched an obstacle in the previous frame.
    pub fn collision(&self) -> bool {
        self.collision
    }

    /// The wall-clock time of the last spawn, in ms.
    pub fn last_spawn(&self) -> f64 {
        self.spawner.last_spawn()
    }

    /// Returns an iterator over all the obstacles on the road.
    pub fn iter_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.values()
    }

    /// Gets a reference to the obstacle with the given ID, if it is still on the road.
    pub fn get_obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Scrolls the road markings in proportion to the player's speed.
    fn scroll_road(&mut self) {
        self.road_offset += self.player.speed_factor() * ROAD_SCROLL_RATE;
        if self.road_offset >= ROAD_MARKING_PERIOD {
            self.road_offset = 0.0;
        }
    }

    /// Spawns new obstacles once the spawn interval has passed.
    fn spawn_obstacles(&mut self, now: f64, report: &mut StepReport) {
        let count = self.spawner.poll(now, &self.config, &mut self.rng);
        for _ in 0..count {
            let attributes = random_obstacle(&self.config, &mut self.rng);
            let id = self.add_obstacle(&attributes);
            trace!("spawned obstacle {:?} in lane {}", id, attributes.lane);
            report.spawned.push(id);
        }
    }

    /// Runs the driving policy of every obstacle, in order.
    fn drive_obstacles(&mut self, report: &mut StepReport) {
        let ctx = DriveContext {
            config: &self.config,
            frame: self.frame,
            speed_factor: self.player.speed_factor(),
        };
        let ids = self.obstacles.keys().collect::<Vec<_>>();
        for id in ids {
            if autonomy::drive(id, &mut self.obstacles, &ctx, &mut self.rng).is_some() {
                report.lane_changes += 1;
            }
        }
    }

    /// Removes obstacles which have driven off the left edge of the field.
    fn remove_departed(&mut self, report: &mut StepReport) {
        let width = self.config.vehicle_width;
        let before = self.obstacles.len();
        self.obstacles.retain(|id, obstacle| {
            let keep = obstacle.x() + width > 0.0;
            if !keep {
                trace!("obstacle {:?} left the road", id);
            }
            keep
        });
        report.despawned = before - self.obstacles.len();
    }

    /// Runs the player's autopilot, clearing the road if it has been stuck for too long.
    fn drive_player(&mut self, now: f64, report: &mut StepReport) {
        let action = autopilot::drive(
            &mut self.player,
            &self.obstacles,
            &self.config,
            now,
            &mut self.rng,
        );
        if action == AutopilotAction::Reset {
            info!("deadlock reset: removing {} obstacles", self.obstacles.len());
            debug_marker("deadlock reset", self.player.position());
            self.obstacles.clear();
            report.deadlock_reset = true;
        }
    }

    /// Checks whether the player's hitbox overlaps any obstacle.
    fn check_collision(&self) -> bool {
        let (width, height) = (self.config.vehicle_width, self.config.vehicle_height);
        let hitbox = self.player.hitbox(width, height);
        self.obstacles
            .values()
            .any(|obstacle| rects_overlap(&hitbox, &obstacle.rect(width, height)))
    }
}
