use super::Player;
use crate::debug::{debug_lane_change, debug_marker};
use crate::detect::{is_vehicle_ahead_in_lane, Probe};
use crate::{ObstacleSet, SimulationConfig};
use arrayvec::ArrayVec;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The state of the player's autopilot.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AutopilotState {
    /// The lane ahead is clear, or there is a way around what is in it.
    Cruising,
    /// Every lane the player could take is occupied.
    Blocked {
        /// The wall-clock time at which the player became boxed in, in ms.
        since: f64,
    },
}

impl AutopilotState {
    /// The time at which the player became boxed in, if it is.
    pub fn blocked_since(&self) -> Option<f64> {
        match self {
            Self::Cruising => None,
            Self::Blocked { since } => Some(*since),
        }
    }

    /// How long the player has been boxed in at time `now`.
    pub fn blocked_for(&self, now: f64) -> Option<f64> {
        self.blocked_since().map(|since| now - since)
    }

    /// Enters the blocked state. Staying blocked keeps the original start time.
    pub(crate) fn block(&mut self, now: f64) {
        if let Self::Cruising = self {
            *self = Self::Blocked { since: now };
        }
    }

    /// Returns to cruising.
    pub(crate) fn clear(&mut self) {
        *self = Self::Cruising;
    }
}

/// What the autopilot did in a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum AutopilotAction {
    /// The lane ahead was clear.
    Cruise,
    /// Something was ahead and the player picked another lane.
    Retarget(usize),
    /// Something was ahead and there was nowhere to go.
    Blocked,
    /// The player was blocked for too long; all traffic must be cleared.
    Reset,
}

/// Runs one frame of the player's lane selection and speed policy,
/// then steers towards the chosen lane.
pub(crate) fn drive<R: Rng>(
    player: &mut Player,
    obstacles: &ObstacleSet,
    config: &SimulationConfig,
    now: f64,
    rng: &mut R,
) -> AutopilotAction {
    let probe = Probe::player(player, config);
    let lane = player.target_lane;

    let blocked = is_vehicle_ahead_in_lane(&probe, lane, obstacles, config.front_detection_horizon);

    let mut action = if blocked {
        player.brake();

        let candidates = config
            .neighbours(lane)
            .filter(|lane| {
                !is_vehicle_ahead_in_lane(&probe, *lane, obstacles, config.side_detection_horizon)
            })
            .collect::<ArrayVec<usize, 2>>();

        match candidates.choose(rng).copied() {
            Some(target) => {
                debug!("player retargeting lane {} -> {}", lane, target);
                debug_lane_change("player lane change", lane, target, player.pos);
                player.target_lane = target;
                if player.state.blocked_since().is_some() {
                    info!("player found a way around after being blocked");
                }
                player.state.clear();
                AutopilotAction::Retarget(target)
            }
            None => {
                if player.state.blocked_since().is_none() {
                    info!("player blocked in lane {} at {}ms", lane, now);
                    debug_marker("player blocked", player.pos);
                }
                player.state.block(now);
                AutopilotAction::Blocked
            }
        }
    } else {
        player.accelerate(config.max_speed_factor);
        player.state.clear();
        AutopilotAction::Cruise
    };

    if let Some(blocked_for) = player.state.blocked_for(now) {
        if blocked_for > config.deadlock_reset_ms {
            info!("player blocked for {}ms, clearing traffic", blocked_for);
            player.state.clear();
            action = AutopilotAction::Reset;
        }
    }

    player.steer(config.lane_y(player.target_lane), config.lane_change_divisor);

    action
}
