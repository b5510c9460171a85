use glider_shared::*;

/// Horizontal situation of the craft relative to the falling obstacle.
///
/// Only the obstacle's x is observable, so everything here works on the
/// obstacle's column rather than its box.
#[derive(Debug, Clone, Copy)]
pub struct ColumnThreat {
    /// Craft box overlaps the obstacle column widened by the margin.
    pub in_column: bool,
    /// Which way to leave the column, if in it.
    pub escape: Option<Action>,
    /// Positive when the craft's centre is right of the obstacle's centre.
    pub offset: f32,
}

/// Horizontal sizes the column assessment works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGeometry {
    pub craft_width: f32,
    pub obstacle_width: f32,
    /// Craft positions run over `[0, max_x]`.
    pub max_x: f32,
}

impl ColumnGeometry {
    /// Geometry of `config`, or `None` when it has no obstacle.
    pub fn from_config(config: &SimConfig) -> Option<Self> {
        config.obstacle.as_ref().map(|obstacle| Self {
            craft_width: config.craft.width,
            obstacle_width: obstacle.width,
            max_x: config.world.width,
        })
    }
}

/// Assess the obstacle column for a craft at `plane_x`.
pub fn assess_column(plane_x: f32, wind_x: f32, geometry: &ColumnGeometry, margin: f32) -> ColumnThreat {
    let craft_width = geometry.craft_width;
    let craft_right = plane_x + craft_width;
    let column_left = wind_x - margin;
    let column_right = wind_x + geometry.obstacle_width + margin;

    let offset = (plane_x + craft_width / 2.0) - (wind_x + geometry.obstacle_width / 2.0);
    let in_column = plane_x < column_right && craft_right > column_left;
    if !in_column {
        return ColumnThreat {
            in_column,
            escape: None,
            offset,
        };
    }

    let room_left = column_left - craft_width >= 0.0;
    let room_right = column_right <= geometry.max_x;
    let escape = if offset < 0.0 {
        if room_left { Action::Left } else { Action::Right }
    } else if room_right {
        Action::Right
    } else {
        Action::Left
    };

    ColumnThreat {
        in_column,
        escape: Some(escape),
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glide_geometry() -> ColumnGeometry {
        ColumnGeometry::from_config(&SimConfig::glide()).expect("glide has an obstacle")
    }

    #[test]
    fn test_clear_of_column() {
        let threat = assess_column(0.0, 200.0, &glide_geometry(), 8.0);
        assert!(!threat.in_column);
        assert!(threat.escape.is_none());
        assert!(threat.offset < 0.0);
    }

    #[test]
    fn test_escape_toward_nearer_side() {
        // Craft centre 200, obstacle centre 215: leave to the left.
        let threat = assess_column(180.0, 200.0, &glide_geometry(), 8.0);
        assert!(threat.in_column);
        assert_eq!(threat.escape, Some(Action::Left));
    }

    #[test]
    fn test_escape_away_from_wall() {
        // Obstacle hugs the left wall; no room there, go right.
        let threat = assess_column(0.0, 10.0, &glide_geometry(), 8.0);
        assert_eq!(threat.escape, Some(Action::Right));

        // Obstacle hugs the right wall; go left even when right of centre.
        let threat = assess_column(GLIDE_WORLD_WIDTH, 345.0, &glide_geometry(), 8.0);
        assert_eq!(threat.escape, Some(Action::Left));
    }

    #[test]
    fn test_geometry_follows_config() {
        let mut config = SimConfig::glide();
        config.world.width = 400.0;
        let wide = ColumnGeometry::from_config(&config).expect("obstacle");
        assert_eq!(wide.max_x, 400.0);

        // Right of centre near the preset wall: only the wider world has room.
        assert_eq!(assess_column(330.0, 330.0, &glide_geometry(), 8.0).escape, Some(Action::Left));
        assert_eq!(assess_column(330.0, 330.0, &wide, 8.0).escape, Some(Action::Right));

        assert!(ColumnGeometry::from_config(&SimConfig::landing()).is_none());
    }
}
