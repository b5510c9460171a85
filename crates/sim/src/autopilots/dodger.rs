use glider_shared::*;

use super::threat::{assess_column, ColumnGeometry};
use crate::policy::Policy;

/// Clearance kept between the craft and the obstacle column.
const DODGE_MARGIN: f32 = 8.0;
/// Lateral speed the momentum dodger accelerates to while escaping.
const ESCAPE_SPEED: f32 = 2.0;
/// Sink rate the momentum dodger tries not to exceed.
const MAX_SINK: f32 = 0.5;
const SPEED_DEADBAND: f32 = 0.1;

/// Glide autopilot: steps out of the falling obstacle's column and otherwise
/// lets the craft glide. With momentum it also brakes drift and slows the sink.
///
/// Produces nothing for the landing variant or a config without an obstacle.
pub struct DodgerPolicy {
    margin: f32,
    geometry: Option<ColumnGeometry>,
}

impl DodgerPolicy {
    /// Dodger sized for the world and boxes of `config`.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            margin: DODGE_MARGIN,
            geometry: ColumnGeometry::from_config(config),
        }
    }

    fn glide(&self, obs: &GlideObservation, geometry: &ColumnGeometry) -> Action {
        assess_column(obs.plane_x, obs.wind_x, geometry, self.margin)
            .escape
            .unwrap_or(Action::NoThrust)
    }

    fn momentum(&self, obs: &MomentumObservation, geometry: &ColumnGeometry) -> Action {
        let threat = assess_column(obs.plane_x, obs.wind_x, geometry, self.margin);

        if let Some(escape) = threat.escape {
            let target = if escape == Action::Left { -ESCAPE_SPEED } else { ESCAPE_SPEED };
            if let Some(action) = chase_speed(obs.velocity_x, target) {
                return action;
            }
        }

        if obs.velocity_y < -MAX_SINK {
            return Action::Up;
        }

        chase_speed(obs.velocity_x, 0.0).unwrap_or(Action::NoThrust)
    }
}

/// Lateral thrust that moves `vx` toward `target`, or `None` inside the deadband.
fn chase_speed(vx: f32, target: f32) -> Option<Action> {
    if vx < target - SPEED_DEADBAND {
        Some(Action::Right)
    } else if vx > target + SPEED_DEADBAND {
        Some(Action::Left)
    } else {
        None
    }
}

impl Policy for DodgerPolicy {
    fn name(&self) -> &str {
        "dodger"
    }

    fn act(&mut self, obs: &Observation) -> Option<ControlInput> {
        let geometry = self.geometry?;
        let action = match obs {
            Observation::Glide(o) => self.glide(o, &geometry),
            Observation::Momentum(o) => self.momentum(o, &geometry),
            Observation::Landing(_) => return None,
        };
        Some(action.into())
    }
}
