use std::fmt;

/// Index of a point in a [`ParticleSystem`](super::ParticleSystem)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PointId {
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Root of the implicit tree
    pub const ROOT: PointId = PointId(0);
}
