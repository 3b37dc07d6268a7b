use crate::{ObstacleAttributes, SimulationConfig};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Decides when new obstacles enter the road.
#[derive(Clone, Debug, Default)]
pub(crate) struct SpawnTimer {
    /// The wall-clock time of the last spawn, in ms.
    last_spawn: f64,
}

impl SpawnTimer {
    /// Returns the number of obstacles to spawn at time `now`: none until the spawn
    /// interval has passed, then one, occasionally accompanied by a second.
    pub fn poll<R: Rng>(&mut self, now: f64, config: &SimulationConfig, rng: &mut R) -> usize {
        if now - self.last_spawn <= config.spawn_interval_ms {
            return 0;
        }
        self.last_spawn = now;
        if rng.gen_bool(config.extra_spawn_probability) {
            2
        } else {
            1
        }
    }

    /// The wall-clock time of the last spawn, in ms.
    pub fn last_spawn(&self) -> f64 {
        self.last_spawn
    }
}

/// Picks the lane, position, speed and look of a new obstacle just beyond
/// the right edge of the field.
pub(crate) fn random_obstacle<R: Rng>(config: &SimulationConfig, rng: &mut R) -> ObstacleAttributes {
    let lane = rng.gen_range(0..config.lane_count);
    let base_speed = config.base_obstacle_speed
        + Uniform::new_inclusive(0.0, config.speed_variation).sample(rng);
    let kind = rng.gen();
    let x = config.field_width + Uniform::new_inclusive(0.0, config.spawn_jitter).sample(rng);

    ObstacleAttributes {
        lane,
        x,
        base_speed,
        kind,
    }
}
