use crate::config::FollowerConfig;
use crate::error::FollowerError;
use glam::Vec2;
use grid_util::point::Point;
use log::{debug, info};
use std::collections::VecDeque;

/// Progress reported by [PathFollower::advance].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowState {
    /// Not started, or there is nothing left to follow.
    Idle,
    Moving,
    /// The last waypoint was reached during this tick.
    Arrived,
}

/// Direction the agent faces while walking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Right,
    Left,
    Up,
    Down,
}

impl Facing {
    /// Horizontal movement takes precedence. Returns [None] for a direction that rounds to zero.
    pub fn from_direction(direction: Vec2) -> Option<Facing> {
        let d = direction.round();
        if d.x > 0.0 {
            Some(Facing::Right)
        } else if d.x < 0.0 {
            Some(Facing::Left)
        } else if d.y > 0.0 {
            Some(Facing::Up)
        } else if d.y < 0.0 {
            Some(Facing::Down)
        } else {
            None
        }
    }
}

/// World position of the center of the tile at `point`.
pub fn cell_center(point: Point, tile_size: f32) -> Vec2 {
    Vec2::new(point.x as f32 + 0.5, point.y as f32 + 0.5) * tile_size
}

/// Walks an agent along a sequence of waypoints at a fixed speed, one tick at a time.
#[derive(Clone, Debug)]
pub struct PathFollower {
    config: FollowerConfig,
    waypoints: VecDeque<Vec2>,
    position: Option<Vec2>,
    facing: Option<Facing>,
    moving: bool,
}

impl PathFollower {
    /// Creates an idle follower without a position. Fails if the config is out of range, see
    /// [FollowerConfig::validate].
    pub fn new(config: FollowerConfig) -> Result<PathFollower, FollowerError> {
        config.validate()?;
        Ok(PathFollower {
            config,
            waypoints: VecDeque::new(),
            position: None,
            facing: None,
            moving: false,
        })
    }

    /// Replaces the route with the centers of the tiles in `path`. Stops any ongoing movement.
    pub fn set_path(&mut self, path: &[Point]) {
        let tile_size = self.config.tile_size;
        self.set_waypoints(path.iter().map(|p| cell_center(*p, tile_size)).collect());
    }

    pub fn set_waypoints(&mut self, waypoints: Vec<Vec2>) {
        debug!("Follower received {} waypoints", waypoints.len());
        self.waypoints = waypoints.into();
        self.moving = false;
    }

    /// Starts following the current route. An agent without a position is placed on the first
    /// waypoint. Returns false if there is nothing to follow or the agent is already moving.
    pub fn start(&mut self) -> bool {
        if self.moving {
            return false;
        }
        let Some(&first) = self.waypoints.front() else {
            return false;
        };
        self.position.get_or_insert(first);
        self.moving = true;
        true
    }

    /// Moves the agent by `speed * dt` along the route. A waypoint within the arrival distance
    /// counts as reached and the agent snaps onto it; travel left over in the tick continues
    /// towards the next waypoint.
    pub fn advance(&mut self, dt: f32) -> FollowState {
        if !self.moving {
            return FollowState::Idle;
        }
        let Some(mut position) = self.position else {
            return FollowState::Idle;
        };
        let epsilon = self.config.arrive_epsilon;
        let mut budget = if dt.is_finite() && dt > 0.0 {
            self.config.speed * dt
        } else {
            0.0
        };
        while let Some(&target) = self.waypoints.front() {
            let offset = target - position;
            let distance = offset.length();
            if distance > epsilon {
                if budget <= 0.0 {
                    break;
                }
                self.facing = Facing::from_direction(offset / self.config.tile_size).or(self.facing);
                if budget < distance - epsilon {
                    position += offset * (budget / distance);
                    break;
                }
                budget -= distance.min(budget);
            }
            position = target;
            self.waypoints.pop_front();
        }
        self.position = Some(position);
        if self.waypoints.is_empty() {
            self.moving = false;
            info!("Agent arrived at {}", position);
            FollowState::Arrived
        } else {
            FollowState::Moving
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Places the agent, e.g. when spawning it.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = Some(position);
    }

    pub fn facing(&self) -> Option<Facing> {
        self.facing
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn remaining_waypoints(&self) -> usize {
        self.waypoints.len()
    }
}
