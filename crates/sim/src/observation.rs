use glider_shared::*;

use crate::episode::Episode;

impl Episode {
    /// Observation for the controller, laid out for the configured variant.
    pub fn observe(&self) -> Observation {
        let craft = &self.craft;
        let time_remaining = self.time_remaining.map_or(0.0, |t| t.as_secs_f32());
        // Variants without an obstacle report it at the left edge.
        let wind_x = self.obstacle.map_or(0.0, |o| o.position.x);

        match self.config.variant {
            Variant::Glide => Observation::Glide(GlideObservation {
                plane_x: craft.position.x,
                plane_y: craft.position.y,
                wind_x,
                time_remaining,
            }),
            Variant::MomentumGlide => Observation::Momentum(MomentumObservation {
                plane_x: craft.position.x,
                plane_y: craft.position.y,
                velocity_x: craft.velocity.x,
                velocity_y: craft.velocity.y,
                wind_x,
                time_remaining,
            }),
            Variant::Landing => Observation::Landing(LandingObservation {
                x: craft.position.x,
                altitude: craft.position.y - self.config.world.ground_level,
                velocity_x: craft.velocity.x,
                velocity_y: craft.velocity.y,
                angle: craft.angle,
                angular_velocity: craft.angular_velocity,
            }),
        }
    }
}
