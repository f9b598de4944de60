use serde::{Deserialize, Serialize};

use crate::error::{FollowerError, GridError};

/// Plain configuration for grid generation, as handed over by a host application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Probability that a generated tile is an obstacle.
    pub obstacle_probability: f32,
    /// Seed for reproducible layouts. Without one the generator is seeded from entropy.
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            width: 10,
            height: 10,
            obstacle_probability: 0.2,
            seed: None,
        }
    }
}

/// The probability must lie in `[0, 1]`; NaN is rejected.
pub(crate) fn check_obstacle_probability(p: f32) -> Result<(), GridError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(GridError::InvalidObstacleProbability(p));
    }
    Ok(())
}

/// Both sides must be addressable with `i32` coordinates and the cell count must fit in `usize`.
pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(), GridError> {
    let limit = i32::MAX as usize;
    if width > limit || height > limit || width.checked_mul(height).is_none() {
        return Err(GridError::DimensionTooLarge { width, height });
    }
    Ok(())
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), GridError> {
        check_obstacle_probability(self.obstacle_probability)?;
        check_dimensions(self.width, self.height)
    }
}

/// Movement parameters of a [PathFollower](crate::PathFollower).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    /// Distance travelled per unit of time.
    pub speed: f32,
    /// Distance below which a waypoint counts as reached.
    pub arrive_epsilon: f32,
    /// World size of one tile, used to place waypoints at tile centers.
    pub tile_size: f32,
}

impl FollowerConfig {
    /// `speed` and `tile_size` must be finite and positive, `arrive_epsilon` finite and not
    /// negative.
    pub fn validate(&self) -> Result<(), FollowerError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(FollowerError::InvalidSpeed(self.speed));
        }
        if !(self.arrive_epsilon.is_finite() && self.arrive_epsilon >= 0.0) {
            return Err(FollowerError::InvalidArriveEpsilon(self.arrive_epsilon));
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(FollowerError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }
}

impl Default for FollowerConfig {
    fn default() -> FollowerConfig {
        FollowerConfig {
            speed: 3.0,
            arrive_epsilon: 0.05,
            tile_size: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_use_defaults() {
        let config: GridConfig =
            serde_json::from_str(r#"{ "width": 32, "seed": 7 }"#).unwrap();
        assert_eq!(config.width, 32);
        assert_eq!(config.height, 10);
        assert_eq!(config.obstacle_probability, 0.2);
        assert_eq!(config.seed, Some(7));

        let follower: FollowerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(follower, FollowerConfig::default());
    }

    #[test]
    fn rejects_bad_probability() {
        for p in [-0.1, 1.5, f32::NAN] {
            let config = GridConfig {
                obstacle_probability: p,
                ..GridConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(GridError::InvalidObstacleProbability(_))
            ));
        }
        assert!(GridConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let config = GridConfig {
            width: i32::MAX as usize + 1,
            ..GridConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(GridError::DimensionTooLarge {
                width: i32::MAX as usize + 1,
                height: 10
            })
        );
    }

    #[test]
    fn rejects_bad_follower_parameters() {
        assert_eq!(FollowerConfig::default().validate(), Ok(()));
        let zero_tiles = FollowerConfig {
            tile_size: 0.0,
            ..FollowerConfig::default()
        };
        assert_eq!(
            zero_tiles.validate(),
            Err(FollowerError::InvalidTileSize(0.0))
        );
        for speed in [0.0, -1.0, f32::INFINITY] {
            let config = FollowerConfig {
                speed,
                ..FollowerConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(FollowerError::InvalidSpeed(_))
            ));
        }
        let config = FollowerConfig {
            arrive_epsilon: f32::NAN,
            ..FollowerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FollowerError::InvalidArriveEpsilon(_))
        ));
        // Arriving only on exact hits is allowed.
        let exact = FollowerConfig {
            arrive_epsilon: 0.0,
            ..FollowerConfig::default()
        };
        assert!(exact.validate().is_ok());
    }
}
