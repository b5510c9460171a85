use glam::Vec2;
use glider_shared::*;
use serde::Serialize;

use crate::collision::Aabb;

/// Craft state at the moment of ground contact.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TouchdownReport {
    pub angle: f32,
    pub speed_x: f32,
    pub soft: bool,
}

/// Flight-quality metrics computed from a recorded flight.
#[derive(Debug, Clone, Serialize)]
pub struct FlightMetrics {
    pub ticks: u32,
    /// Max altitude minus min altitude over the flight.
    pub altitude_range: f32,
    pub min_altitude: f32,
    pub max_lateral_speed: f32,
    /// Largest downward speed seen.
    pub max_sink_rate: f32,
    pub max_abs_angle: f32,
    /// Final x minus initial x.
    pub lateral_drift: f32,
    /// Smallest box-to-box gap to the obstacle, or None without an obstacle.
    pub closest_obstacle_gap: Option<f32>,
    pub touchdown: Option<TouchdownReport>,
    /// Registered thrust impulses per simulated second.
    pub impulse_rate: f32,
    /// Share of ticks flown on neutral fallback control.
    pub fallback_fraction: f32,
}

/// Analyze a flight record.
pub fn analyze(record: &FlightRecord) -> FlightMetrics {
    let frames = &record.frames;
    let result = &record.result;
    let sim = &record.config.sim;

    let mut min_alt = f32::MAX;
    let mut max_alt = f32::MIN;
    let mut max_lateral_speed = 0.0f32;
    let mut max_sink_rate = 0.0f32;
    let mut max_abs_angle = 0.0f32;
    let mut closest_gap: Option<f32> = None;

    for frame in frames {
        let c = &frame.craft;
        min_alt = min_alt.min(c.y);
        max_alt = max_alt.max(c.y);
        max_lateral_speed = max_lateral_speed.max(c.vx.abs());
        max_sink_rate = max_sink_rate.max(-c.vy);
        max_abs_angle = max_abs_angle.max(c.angle.abs());

        if let (Some(o), Some(size)) = (&frame.obstacle, &sim.obstacle) {
            let craft = Aabb::from_corner(Vec2::new(c.x, c.y), sim.craft.width, sim.craft.height);
            let obstacle = Aabb::from_corner(Vec2::new(o.x, o.y), size.width, size.height);
            let gap = craft.separation(&obstacle);
            closest_gap = Some(closest_gap.map_or(gap, |g| g.min(gap)));
        }
    }

    let lateral_drift = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => last.craft.x - first.craft.x,
        _ => 0.0,
    };

    let touchdown = match (result.reason, frames.last()) {
        (Some(EndReason::Touchdown | EndReason::HardLanding), Some(last)) => Some(TouchdownReport {
            angle: last.craft.angle,
            speed_x: last.craft.vx,
            soft: result.reason == Some(EndReason::Touchdown),
        }),
        _ => None,
    };

    let seconds = result.final_tick as f32 * sim.tick_ms as f32 / 1000.0;
    let impulse_rate = if seconds > 0.0 {
        result.stats.impulses as f32 / seconds
    } else {
        0.0
    };
    let fallback_fraction = if result.final_tick > 0 {
        result.fallback_ticks as f32 / result.final_tick as f32
    } else {
        0.0
    };

    FlightMetrics {
        ticks: result.final_tick,
        altitude_range: if frames.is_empty() { 0.0 } else { max_alt - min_alt },
        min_altitude: if frames.is_empty() { 0.0 } else { min_alt },
        max_lateral_speed,
        max_sink_rate,
        max_abs_angle,
        lateral_drift,
        closest_obstacle_gap: closest_gap,
        touchdown,
        impulse_rate,
        fallback_fraction,
    }
}
