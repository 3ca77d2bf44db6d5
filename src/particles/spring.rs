use super::point::PointId;
use serde::Deserialize;

/// Physical constants of a single spring
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpringParams {
    /// Unstretched distance between the two endpoints
    pub rest_length: f32,
    /// Hooke constant
    pub stiffness: f32,
    /// Drag applied to each endpoint's own velocity
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        SpringParams {
            rest_length: 3.0,
            stiffness: 2.0,
            damping: 0.5,
        }
    }
}

/// A spring between two points
/// Order matters only for bookkeeping: `a` receives `-force`, `b` receives `+force`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spring {
    pub a: PointId,
    pub b: PointId,
    pub params: SpringParams,
}

impl Spring {
    pub fn new(a: PointId, b: PointId, params: SpringParams) -> Self {
        Spring { a, b, params }
    }

    /// Current length divided by rest length
    pub fn tension(&self, distance: f32) -> f32 {
        distance / self.params.rest_length
    }
}
