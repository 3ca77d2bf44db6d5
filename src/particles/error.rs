use super::point::PointId;
use std::fmt;

/// Broken buffer invariant, reported at insertion time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    PointCapacityExceeded { capacity: usize, requested: usize },
    EdgeCapacityExceeded { capacity: usize, requested: usize },
    EndpointOutOfRange { endpoint: PointId, point_count: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::PointCapacityExceeded {
                capacity,
                requested,
            } => {
                write!(f, "{} points requested, capacity is {}", requested, capacity)
            }
            InvariantViolation::EdgeCapacityExceeded {
                capacity,
                requested,
            } => {
                write!(f, "{} springs requested, capacity is {}", requested, capacity)
            }
            InvariantViolation::EndpointOutOfRange {
                endpoint,
                point_count,
            } => write!(
                f,
                "Spring endpoint {} is not a live point (count {})",
                endpoint, point_count
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
