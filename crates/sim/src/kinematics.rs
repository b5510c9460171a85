use glider_shared::*;

/// Advance the craft by one tick (semi-implicit Euler).
///
/// Order matters and is shared by every driver: gravity, linear drag,
/// angular damping and rotation, then position from the damped velocity.
pub fn integrate(craft: &mut CraftState, physics: &PhysicsConfig) {
    craft.velocity.y -= physics.gravity;

    craft.velocity.x *= physics.drag_x;
    craft.velocity.y *= physics.drag_y;

    craft.angular_velocity *= physics.angular_damping;
    craft.angle += craft.angular_velocity;

    craft.position += craft.velocity;
}

/// Velocity the craft settles at when falling freely: `v = (v - g) * d`.
pub fn terminal_fall_speed(physics: &PhysicsConfig) -> Option<f32> {
    if physics.drag_y < 1.0 {
        Some(physics.gravity * physics.drag_y / (1.0 - physics.drag_y))
    } else {
        None
    }
}
