use crate::debug::debug_lane_change;
use crate::detect::{is_vehicle_ahead_in_lane, Probe};
use crate::{ObstacleId, ObstacleSet, SimulationConfig};
use arrayvec::ArrayVec;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// The inputs shared by every obstacle's decision in one frame.
pub(crate) struct DriveContext<'a> {
    /// The simulation parameters.
    pub config: &'a SimulationConfig,
    /// The current frame of simulation.
    pub frame: usize,
    /// The player's speed factor, which scales every obstacle's motion.
    pub speed_factor: f64,
}

/// Runs one frame of the obstacle's driving policy: car following, lane changing
/// and motion. Returns the lane the obstacle decided to move to, if any.
pub(crate) fn drive<R: Rng>(
    id: ObstacleId,
    obstacles: &mut ObstacleSet,
    ctx: &DriveContext,
    rng: &mut R,
) -> Option<usize> {
    let config = ctx.config;
    let (lane, blocked, choice) = {
        let obstacles: &ObstacleSet = obstacles;
        let obstacle = &obstacles[id];
        let probe = Probe::obstacle(id, obstacle);
        let lane = obstacle.lane();

        let blocked =
            is_vehicle_ahead_in_lane(&probe, lane, obstacles, config.obstacle_front_horizon);

        // Only a blocked obstacle looks for a way around, and only between cooldowns
        let mut candidates = ArrayVec::<usize, 2>::new();
        if blocked && obstacle.can_change_lanes(ctx.frame, config.lane_change_cooldown_ticks) {
            candidates.extend(config.neighbours(lane).filter(|lane| {
                !is_vehicle_ahead_in_lane(&probe, *lane, obstacles, config.obstacle_side_horizon)
            }));
        }
        (lane, blocked, candidates.choose(rng).copied())
    };

    let obstacle = &mut obstacles[id];
    obstacle.follow(blocked);
    if let Some(target) = choice {
        debug!("obstacle {:?} changing lanes {} -> {}", id, lane, target);
        debug_lane_change("obstacle lane change", lane, target, obstacle.position());
        obstacle.begin_lane_change(target, ctx.frame);
    }
    obstacle.steer(config.lane_y(obstacle.target_lane()));
    obstacle.advance(ctx.speed_factor);

    choice
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Obstacle, ObstacleAttributes, VehicleKind};
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn add(set: &mut ObstacleSet, config: &SimulationConfig, lane: usize, x: f64) -> ObstacleId {
        let attributes = ObstacleAttributes {
            lane,
            x,
            base_speed: 4.0,
            kind: VehicleKind::SportsCar,
        };
        set.insert_with_key(|id| Obstacle::new(id, &attributes, config.lane_y(lane)))
    }

    #[test]
    fn clear_road_keeps_cruising() {
        let config = SimulationConfig::default();
        let mut set = ObstacleSet::with_key();
        let id = add(&mut set, &config, 1, 600.0);
        let ctx = DriveContext {
            config: &config,
            frame: 50,
            speed_factor: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(drive(id, &mut set, &ctx, &mut rng), None);
        assert_approx_eq!(set[id].speed(), 4.0);
        assert_approx_eq!(set[id].x(), 596.0);
    }

    #[test]
    fn blocked_obstacle_slows_and_changes_lanes() {
        let config = SimulationConfig::default();
        let mut set = ObstacleSet::with_key();
        let id = add(&mut set, &config, 0, 600.0);
        add(&mut set, &config, 0, 500.0);
        let ctx = DriveContext {
            config: &config,
            frame: 50,
            speed_factor: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(1);

        // Lane 0 only has one neighbour, so the choice is forced
        assert_eq!(drive(id, &mut set, &ctx, &mut rng), Some(1));
        let obs = &set[id];
        assert_approx_eq!(obs.speed(), 3.92);
        assert_eq!(obs.target_lane(), 1);
        assert_eq!(obs.lane(), 0);
        assert_eq!(obs.last_lane_change(), 50);
        assert!(obs.y() > config.lane_y(0));
    }

    #[test]
    fn queues_when_neighbours_are_occupied() {
        let config = SimulationConfig::default();
        let mut set = ObstacleSet::with_key();
        let id = add(&mut set, &config, 2, 600.0);
        add(&mut set, &config, 2, 500.0);
        add(&mut set, &config, 1, 550.0);
        add(&mut set, &config, 3, 520.0);
        let ctx = DriveContext {
            config: &config,
            frame: 50,
            speed_factor: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(drive(id, &mut set, &ctx, &mut rng), None);
        assert_eq!(set[id].target_lane(), 2);
        assert_approx_eq!(set[id].speed(), 3.92);
    }

    #[test]
    fn cooldown_prevents_lane_change() {
        let config = SimulationConfig::default();
        let mut set = ObstacleSet::with_key();
        let id = add(&mut set, &config, 0, 600.0);
        add(&mut set, &config, 0, 500.0);
        let ctx = DriveContext {
            config: &config,
            frame: 10,
            speed_factor: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(drive(id, &mut set, &ctx, &mut rng), None);
        assert_eq!(set[id].target_lane(), 0);
    }
}
