//! # Tile Atlas Module
//!
//! UV mapping into the 16x16 texture atlas. Every face of every block type
//! resolves to one atlas tile; template UVs in [0, 1] are remapped into that
//! tile's cell with a small inward epsilon so bilinear filtering never bleeds
//! in texels from a neighboring tile.

use crate::world_state::voxels::block::block_side::FaceDirection;
use crate::world_state::voxels::block::block_type::BlockType;

/// Number of tiles along one edge of the atlas.
pub const TILES_PER_ROW: usize = 16;

const TILE_SIZE: f32 = 1.0 / TILES_PER_ROW as f32;
const TILE_EPSILON: f32 = 0.0001;

/// Identifies one tile of the atlas.
///
/// The discriminants are the atlas tile indices (row-major, 16 per row).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaceKind {
    /// Top of a grass block.
    GrassTop = 0,
    /// Side of a grass block (grass over dirt).
    GrassSide = 1,
    /// Dirt, also the underside of grass blocks.
    Dirt = 2,
    /// Sand.
    Sand = 3,
    /// Top of a sandstone block.
    SandstoneTop = 4,
    /// Side of a sandstone block.
    SandstoneSide = 5,
    /// Underside of a sandstone block.
    SandstoneBottom = 6,
    /// Stone.
    Stone = 7,
    /// Bedrock.
    Bedrock = 8,
    /// Bark side of an oak log.
    OakLogSide = 9,
    /// Ring ends of an oak log.
    OakLogEnd = 10,
    /// Oak leaves.
    OakLeaves = 11,
    /// Water surface.
    Water = 12,
    /// Tall grass tuft.
    TallGrass = 13,
}

/// Maps (block type, face direction) pairs to atlas tiles and template UVs
/// into tile-local UVs.
pub struct TileAtlas;

impl TileAtlas {
    /// Selects the atlas tile for a face of a block type.
    ///
    /// Most blocks use one tile everywhere; grass, sandstone and logs pick
    /// different tiles for their tops, bottoms and sides.
    pub fn face_kind(block: BlockType, direction: FaceDirection) -> FaceKind {
        match block {
            BlockType::GRASS_BLOCK => match direction {
                FaceDirection::UP => FaceKind::GrassTop,
                FaceDirection::BOTTOM => FaceKind::Dirt,
                _ => FaceKind::GrassSide,
            },
            BlockType::SANDSTONE => match direction {
                FaceDirection::UP => FaceKind::SandstoneTop,
                FaceDirection::BOTTOM => FaceKind::SandstoneBottom,
                _ => FaceKind::SandstoneSide,
            },
            BlockType::OAK_LOG => match direction {
                FaceDirection::UP | FaceDirection::BOTTOM => FaceKind::OakLogEnd,
                _ => FaceKind::OakLogSide,
            },
            BlockType::DIRT => FaceKind::Dirt,
            BlockType::SAND => FaceKind::Sand,
            BlockType::STONE => FaceKind::Stone,
            BlockType::BEDROCK => FaceKind::Bedrock,
            BlockType::OAK_LEAVES => FaceKind::OakLeaves,
            BlockType::WATER => FaceKind::Water,
            BlockType::TALL_GRASS => FaceKind::TallGrass,
            // air is never meshed
            BlockType::AIR => FaceKind::Dirt,
        }
    }

    /// Remaps a template UV in [0, 1] into the given atlas tile.
    ///
    /// The epsilon is applied towards the tile center, away from whichever
    /// edge the coordinate is closest to.
    pub fn uv(tile: usize, original: [f32; 2]) -> [f32; 2] {
        let tile_x = (tile % TILES_PER_ROW) as f32;
        let tile_y = (tile / TILES_PER_ROW) as f32;

        let epsilon_x = if original[0] > 0.5 { -TILE_EPSILON } else { TILE_EPSILON };
        let epsilon_y = if original[1] > 0.5 { -TILE_EPSILON } else { TILE_EPSILON };

        [
            original[0] * TILE_SIZE + epsilon_x + TILE_SIZE * tile_x,
            original[1] * TILE_SIZE + epsilon_y + TILE_SIZE * tile_y,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_zero_origin_maps_to_epsilon() {
        assert_eq!(TileAtlas::uv(0, [0.0, 0.0]), [TILE_EPSILON, TILE_EPSILON]);
    }

    #[test]
    fn test_tile_seventeen_offsets_by_one_cell_each_way() {
        let uv = TileAtlas::uv(17, [0.0, 0.0]);
        assert_eq!(uv, [TILE_SIZE + TILE_EPSILON, TILE_SIZE + TILE_EPSILON]);
    }

    #[test]
    fn test_far_edge_pulls_inward() {
        let uv = TileAtlas::uv(0, [1.0, 1.0]);
        assert_eq!(uv, [TILE_SIZE - TILE_EPSILON, TILE_SIZE - TILE_EPSILON]);
    }

    #[test]
    fn test_grass_block_faces() {
        assert_eq!(
            TileAtlas::face_kind(BlockType::GRASS_BLOCK, FaceDirection::UP),
            FaceKind::GrassTop
        );
        assert_eq!(
            TileAtlas::face_kind(BlockType::GRASS_BLOCK, FaceDirection::BOTTOM),
            FaceKind::Dirt
        );
        assert_eq!(
            TileAtlas::face_kind(BlockType::GRASS_BLOCK, FaceDirection::LEFT),
            FaceKind::GrassSide
        );
    }

    #[test]
    fn test_oak_log_ends_share_a_tile() {
        assert_eq!(
            TileAtlas::face_kind(BlockType::OAK_LOG, FaceDirection::UP),
            TileAtlas::face_kind(BlockType::OAK_LOG, FaceDirection::BOTTOM)
        );
        assert_ne!(
            TileAtlas::face_kind(BlockType::OAK_LOG, FaceDirection::UP),
            TileAtlas::face_kind(BlockType::OAK_LOG, FaceDirection::BACK)
        );
    }
}
