use glam::Vec2;
use glider_shared::*;

/// Axis-aligned box given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_corner(corner: Vec2, width: f32, height: f32) -> Self {
        Self {
            min: corner,
            max: corner + Vec2::new(width, height),
        }
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Gap between two boxes, zero when they touch or overlap.
    pub fn separation(&self, other: &Aabb) -> f32 {
        let dx = (other.min.x - self.max.x).max(self.min.x - other.max.x).max(0.0);
        let dy = (other.min.y - self.max.y).max(self.min.y - other.max.y).max(0.0);
        Vec2::new(dx, dy).length()
    }
}

/// Contacts found while resolving one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    pub collision: bool,
    pub out_of_bounds: bool,
    pub grounded: bool,
}

pub fn craft_box(craft: &CraftState, size: &CraftConfig) -> Aabb {
    Aabb::from_corner(craft.position, size.width, size.height)
}

pub fn obstacle_box(obstacle: &ObstacleState, size: &ObstacleConfig) -> Aabb {
    Aabb::from_corner(obstacle.position, size.width, size.height)
}

fn clamp_axis(pos: &mut f32, vel: &mut f32, lo: f32, hi: f32) {
    if *pos < lo {
        *pos = lo;
        *vel = 0.0;
    } else if *pos > hi {
        *pos = hi;
        *vel = 0.0;
    }
}

/// Keep the craft inside the world, zeroing velocity on any clamped axis.
/// Worlds with a lateral margin are not clamped horizontally.
pub fn clamp_to_world(craft: &mut CraftState, world: &WorldConfig) {
    if world.lateral_margin.is_none() {
        clamp_axis(&mut craft.position.x, &mut craft.velocity.x, 0.0, world.width);
    }
    clamp_axis(
        &mut craft.position.y,
        &mut craft.velocity.y,
        world.ground_level,
        world.height,
    );
}

/// Bound the craft and detect every contact for this tick.
///
/// `detect_ground` turns reaching the ground into a contact instead of a
/// resting position; the craft is snapped to the ground either way.
pub fn resolve(
    craft: &mut CraftState,
    config: &SimConfig,
    obstacle: Option<&ObstacleState>,
    detect_ground: bool,
) -> Contact {
    let world = &config.world;
    let out_of_bounds = match world.lateral_margin {
        Some(margin) => {
            craft.position.x < -margin || craft.position.x > world.width + margin
        }
        None => false,
    };

    clamp_to_world(craft, world);
    // The clamp leaves a craft resting exactly on the ground line untouched.
    let grounded = detect_ground && craft.position.y <= world.ground_level;
    if grounded {
        craft.position.y = world.ground_level;
        craft.velocity.y = 0.0;
    }

    let collision = match (obstacle, config.obstacle.as_ref()) {
        (Some(obstacle), Some(size)) => {
            craft_box(craft, &config.craft).overlaps(&obstacle_box(obstacle, size))
        }
        _ => false,
    };

    Contact {
        collision,
        out_of_bounds,
        grounded,
    }
}
