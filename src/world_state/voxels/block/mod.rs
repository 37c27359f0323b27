//! # Block Module
//!
//! This module provides the core block-related types of the world core:
//! the block type enumeration, face directions, and the static per-type
//! definition record owned by the block registry.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is what the dense chunk grids actually store.
pub type BlockTypeSize = u8;

/// The rendering strategy of a block type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshKind {
    /// Six axis-aligned faces, each culled against its neighbor cell.
    Cube,

    /// Two intersecting quads, always rendered in full.
    Cross,
}

/// Static definition of a block type, owned by the registry.
///
/// Definitions are immutable after registry construction and are always
/// shared by reference; per-cell state is only the `BlockType` value in the
/// chunk grid.
#[derive(Clone, Debug)]
pub struct BlockDefinition {
    /// The block type this definition describes.
    pub block_type: BlockType,

    /// How the block is turned into geometry.
    pub mesh: MeshKind,

    /// Whether faces behind this block remain visible.
    pub transparent: bool,

    /// Break time factor consumed by the external interaction layer.
    /// Negative means unbreakable.
    pub hardness: f32,
}

impl BlockDefinition {
    /// Creates a new block definition.
    pub fn new(block_type: BlockType, mesh: MeshKind, transparent: bool, hardness: f32) -> Self {
        BlockDefinition {
            block_type,
            mesh,
            transparent,
            hardness,
        }
    }
}
