//! # Face Direction Module
//!
//! This module defines the six faces of a voxel cube and their neighbor
//! offsets. Face culling, water spread and structure stamping all reason in
//! terms of these directions.

use cgmath::Vector3;

/// The six face directions of a voxel cube.
///
/// Each variant is assigned a unique integer value used to index into the
/// cube face template (four template vertices per direction, in variant
/// order).
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum FaceDirection {
    /// The face looking along positive Z.
    FORWARD = 0,

    /// The face looking along negative Z.
    BACK = 1,

    /// The face looking along positive X.
    RIGHT = 2,

    /// The face looking along negative X.
    LEFT = 3,

    /// The face looking along positive Y.
    UP = 4,

    /// The face looking along negative Y.
    BOTTOM = 5,
}

impl FaceDirection {
    /// Returns all six face directions in index order.
    pub fn all() -> [FaceDirection; 6] {
        [
            FaceDirection::FORWARD,
            FaceDirection::BACK,
            FaceDirection::RIGHT,
            FaceDirection::LEFT,
            FaceDirection::UP,
            FaceDirection::BOTTOM,
        ]
    }

    /// Returns the five directions water is allowed to flow in.
    ///
    /// `UP` is excluded so that water never climbs.
    pub fn non_up() -> [FaceDirection; 5] {
        [
            FaceDirection::FORWARD,
            FaceDirection::BACK,
            FaceDirection::RIGHT,
            FaceDirection::LEFT,
            FaceDirection::BOTTOM,
        ]
    }

    /// Returns the offset of the neighboring cell this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            FaceDirection::FORWARD => Vector3::new(0, 0, 1),
            FaceDirection::BACK => Vector3::new(0, 0, -1),
            FaceDirection::RIGHT => Vector3::new(1, 0, 0),
            FaceDirection::LEFT => Vector3::new(-1, 0, 0),
            FaceDirection::UP => Vector3::new(0, 1, 0),
            FaceDirection::BOTTOM => Vector3::new(0, -1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_unit_axis_steps() {
        for dir in FaceDirection::all() {
            let offset = dir.offset();
            assert_eq!(offset.x.abs() + offset.y.abs() + offset.z.abs(), 1);
        }
    }

    #[test]
    fn test_non_up_excludes_up() {
        assert!(!FaceDirection::non_up().contains(&FaceDirection::UP));
        assert_eq!(FaceDirection::non_up().len(), 5);
    }
}
