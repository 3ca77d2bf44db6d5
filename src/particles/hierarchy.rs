use std::ops::Range;

use super::point::PointId;

/// Implicit tree laid over point indices
///
/// Layout for `leaf = 3`:
/// ```text
/// level 0:  0
/// level 1:  1 2 3
/// level 2:  4 5 6 7 8 9 10 11 12
/// ```
/// The parent of `i` is `(i - 1) / leaf`, so children always come after their parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hierarchy {
    /// Branching factor (at least 2)
    pub leaf: usize,
    /// Mass of the root point; each level down divides it by `leaf`
    pub root_mass: f32,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Hierarchy {
            leaf: 3,
            root_mass: 1000.0,
        }
    }
}

impl Hierarchy {
    pub fn new(leaf: usize, root_mass: f32) -> Self {
        assert!(leaf >= 2, "branching factor must be at least 2");
        Hierarchy { leaf, root_mass }
    }

    /// Tree depth of a point index
    ///
    /// Same value as `floor(log(i*(leaf-1)+1) / log(leaf))`, computed on integers
    /// so exact powers of `leaf` land on the right level.
    pub fn level(&self, index: usize) -> usize {
        let mut level = 0;
        let mut start = 0usize;
        let mut width = 1usize;

        loop {
            let end = start.saturating_add(width);
            // A saturated level reaches the end of the index space
            if index < end || end == usize::MAX {
                break;
            }
            start = end;
            width = width.saturating_mul(self.leaf);
            level += 1;
        }

        level
    }

    /// Index range `[start, end)` covered by a level (not clipped to the live count)
    pub fn level_range(&self, level: usize) -> Range<usize> {
        let mut start = 0usize;
        let mut width = 1usize;

        for _ in 0..level {
            start = start.saturating_add(width);
            width = width.saturating_mul(self.leaf);
        }

        start..start.saturating_add(width)
    }

    /// Parent of a point, `None` for the root
    pub fn parent(&self, point: PointId) -> Option<PointId> {
        if point == PointId::ROOT {
            return None;
        }
        Some(PointId((point.index() - 1) / self.leaf))
    }

    /// `(1/leaf)^level * root_mass`
    pub fn mass_at_level(&self, level: usize) -> f32 {
        self.root_mass * (1.0 / self.leaf as f32).powi(level as i32)
    }

    /// Mass assigned to the point at `index`
    pub fn mass_for(&self, index: usize) -> f32 {
        self.mass_at_level(self.level(index))
    }
}
