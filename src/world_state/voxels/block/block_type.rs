//! # Block Type Module
//!
//! This module defines the closed set of block types that can occupy a cell
//! of the voxel world. It provides functionality for block type identification,
//! conversion from the compact storage format, and random generation.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// Each variant represents a distinct type of block. `AIR` denotes emptiness:
/// it has no registry definition and is never meshed. The `FromPrimitive`
/// derive allows conversion from integers, which is how the dense chunk grids
/// map back to the rich enum type.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and never rendered.
    AIR,

    /// The indestructible block forming the world floor at y = 0.
    BEDROCK,

    /// Plain stone, the filler below the soil layers.
    STONE,

    /// A basic dirt block.
    DIRT,

    /// A grass block with different textures on top, sides and bottom.
    GRASS_BLOCK,

    /// Sand, generated in the beach band around sea level.
    SAND,

    /// Compressed sand with distinct top and bottom textures.
    SANDSTONE,

    /// Water. Lives in the water chunk collection, never in the terrain one.
    WATER,

    /// A tree trunk block with ring textures on both ends.
    OAK_LOG,

    /// Transparent foliage block stamped by tree structures.
    OAK_LEAVES,

    /// A cross-mesh tuft of grass sitting on top of a grass block.
    TALL_GRASS,
}

impl BlockType {
    /// Converts a `BlockTypeSize` back to a `BlockType`.
    ///
    /// This is used when reading cells out of the dense chunk grid, which
    /// stores block types in their compact integer form.
    ///
    /// # Panics
    /// Panics if the input value doesn't correspond to a valid `BlockType`.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        let btype_option = num::FromPrimitive::from_u8(btype);
        btype_option.unwrap()
    }

    /// Generates a random non-air block type.
    ///
    /// This is primarily used for randomized test grids.
    pub fn random() -> Self {
        num::FromPrimitive::from_u8(fastrand::u8(1..11)).unwrap()
    }

    /// Returns `true` for the `AIR` variant.
    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }
}

// Implementation of PHF (Perfect Hash Function) traits for BlockType.
// These are used internally by the `phf` crate for static hash maps.

/// Implements `FmtConst` to allow formatting `BlockType` in const contexts.
impl phf_shared::FmtConst for BlockType {
    fn fmt_const(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockType::{:?}", self)
    }
}

/// Implements `PhfHash` to provide a custom hashing strategy for `BlockType`.
/// This ensures that the hash matches the underlying integer representation.
impl phf_shared::PhfHash for BlockType {
    #[inline]
    fn phf_hash<H: Hasher>(&self, state: &mut H) {
        (*self as BlockTypeSize).hash(state);
    }
}

/// Implements `PhfBorrow` to allow using `BlockType` as a key in PHF maps.
impl phf_shared::PhfBorrow<BlockType> for BlockType {
    fn borrow(&self) -> &BlockType {
        self
    }
}
