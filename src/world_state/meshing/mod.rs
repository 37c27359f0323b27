//! # Meshing Module
//!
//! Converts a chunk's cell grid plus its neighbors' grids into a triangle
//! vertex list. Cube blocks get per-face visibility culling against every
//! supplied chunk set; cross blocks are always emitted in full. The finished
//! list is stably partitioned opaque-first so the renderer can draw opaque
//! geometry before transparent geometry without sorting.
//!
//! Building vertices is pure computation over read-only chunk views, so
//! chunks can be meshed in parallel; only installing the result back into a
//! chunk mutates anything.

use std::sync::Arc;

use cgmath::Point3;

use atlas::TileAtlas;
use templates::FACE_QUAD_INDICES;
use vertex::Vertex;

use crate::world_state::registry::BlockRegistry;
use crate::world_state::voxels::block::block_side::FaceDirection;
use crate::world_state::voxels::block::block_type::BlockType;
use crate::world_state::voxels::block::{BlockDefinition, MeshKind};
use crate::world_state::voxels::chunk::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};
use crate::world_state::voxels::chunk_store::ChunkSet;

pub mod atlas;
pub mod templates;
pub mod vertex;

/// How far the top of a water cell sits below the cell ceiling when no water
/// lies directly above it.
pub const WATER_SURFACE_OFFSET: f32 = 0.125;

/// Builds chunk geometry from cell grids.
pub struct MeshBuilder {
    registry: Arc<BlockRegistry>,
}

impl MeshBuilder {
    /// Creates a mesh builder over the given registry.
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        MeshBuilder { registry }
    }

    /// Builds the vertex list for one chunk.
    ///
    /// `occluders` are the chunk sets a cube face is tested against; a face
    /// is culled as soon as any set vetoes it. `water` is always the water
    /// collection and drives the surface-depression check.
    ///
    /// Returns the vertices partitioned opaque-first together with the
    /// split point. Rebuilding an unmodified chunk yields an identical list.
    pub fn build_vertices(
        &self,
        chunk: &Chunk,
        occluders: &[&ChunkSet],
        water: &ChunkSet,
    ) -> (Vec<Vertex>, usize) {
        let mut vertices = Vec::new();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for y in (0..WORLD_HEIGHT).rev() {
                    let block = chunk.block(x, y, z);
                    let definition = match self.registry.definition(block) {
                        Some(definition) => definition,
                        None => continue,
                    };

                    match definition.mesh {
                        MeshKind::Cube => {
                            self.emit_cube(chunk, x, y, z, definition, occluders, water, &mut vertices)
                        }
                        MeshKind::Cross => self.emit_cross(chunk, x, y, z, definition, &mut vertices),
                    }
                }
            }
        }

        Self::partition_opaque_first(vertices)
    }

    /// Emits the visible faces of a cube cell.
    #[allow(clippy::too_many_arguments)]
    fn emit_cube(
        &self,
        chunk: &Chunk,
        x: i32,
        y: i32,
        z: i32,
        definition: &BlockDefinition,
        occluders: &[&ChunkSet],
        water: &ChunkSet,
        out: &mut Vec<Vertex>,
    ) {
        let origin = chunk.origin();
        let world = Point3::new(origin.x + x, y, origin.y + z);
        let template = self.registry.face_template(MeshKind::Cube);

        // Water that has no water directly above renders with a lowered
        // surface, so it never fills its cell to the brim.
        let depress_surface = definition.block_type == BlockType::WATER
            && !water.is_occupied(Point3::new(world.x, world.y + 1, world.z));

        for direction in FaceDirection::all() {
            let neighbor = world + direction.offset();

            let mut can_render = true;
            for set in occluders {
                if !self.face_visible(set, neighbor, definition) {
                    can_render = false;
                    break;
                }
            }
            if !can_render {
                continue;
            }

            let face = &template[direction as usize * 4..direction as usize * 4 + 4];
            let tile = TileAtlas::face_kind(definition.block_type, direction) as usize;

            for &index in &FACE_QUAD_INDICES {
                let mut vertex = face[index];

                if depress_surface && vertex.position[1] > 0.0 {
                    vertex.position[1] -= WATER_SURFACE_OFFSET;
                }

                vertex.position[0] += world.x as f32;
                vertex.position[1] += world.y as f32;
                vertex.position[2] += world.z as f32;
                vertex.tex_coords = TileAtlas::uv(tile, vertex.tex_coords);
                vertex.transparent = definition.transparent as u32;
                out.push(vertex);
            }
        }
    }

    /// Emits the quads of a cross cell. Cross blocks are never culled and
    /// always sample their forward-facing tile.
    fn emit_cross(
        &self,
        chunk: &Chunk,
        x: i32,
        y: i32,
        z: i32,
        definition: &BlockDefinition,
        out: &mut Vec<Vertex>,
    ) {
        let origin = chunk.origin();
        let world = Point3::new(origin.x + x, y, origin.y + z);
        let template = self.registry.face_template(MeshKind::Cross);
        let tile = TileAtlas::face_kind(definition.block_type, FaceDirection::FORWARD) as usize;

        for quad in 0..template.len() / 4 {
            for &index in &FACE_QUAD_INDICES {
                let mut vertex = template[quad * 4 + index];
                vertex.position[0] += world.x as f32;
                vertex.position[1] += world.y as f32;
                vertex.position[2] += world.z as f32;
                vertex.tex_coords = TileAtlas::uv(tile, vertex.tex_coords);
                vertex.transparent = definition.transparent as u32;
                out.push(vertex);
            }
        }
    }

    /// Decides whether a cube face looking at `neighbor` renders, judged
    /// against one chunk set.
    ///
    /// A face renders when the neighbor cell is absent, when the neighbor is
    /// a cross block (those never occlude), or when the neighbor is
    /// transparent and the current block is not water (water never renders
    /// behind water, but does render behind other transparent blocks).
    fn face_visible(&self, set: &ChunkSet, neighbor: Point3<i32>, current: &BlockDefinition) -> bool {
        let neighbor_block = match set.block_at(neighbor.x, neighbor.y, neighbor.z) {
            Some(block) => block,
            None => return true,
        };
        let neighbor_definition = match self.registry.definition(neighbor_block) {
            Some(definition) => definition,
            None => return true,
        };

        if neighbor_definition.mesh == MeshKind::Cross {
            return true;
        }

        if current.block_type != BlockType::WATER && neighbor_definition.transparent {
            return true;
        }

        false
    }

    /// Stable partition: all opaque vertices first, transparent after, with
    /// the relative order inside each group preserved.
    fn partition_opaque_first(vertices: Vec<Vertex>) -> (Vec<Vertex>, usize) {
        let mut partitioned = Vec::with_capacity(vertices.len());
        partitioned.extend(vertices.iter().filter(|v| !v.is_transparent()));
        let opaque_len = partitioned.len();
        partitioned.extend(vertices.iter().filter(|v| v.is_transparent()));
        (partitioned, opaque_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    fn builder() -> MeshBuilder {
        MeshBuilder::new(Arc::new(BlockRegistry::with_defaults().unwrap()))
    }

    fn chunk_with(blocks: &[(i32, i32, i32, BlockType)]) -> ChunkSet {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        for &(x, y, z, block) in blocks {
            chunk.set_block(x, y, z, block);
        }
        let mut set = ChunkSet::new();
        set.insert(chunk);
        set
    }

    #[test]
    fn test_isolated_cube_emits_six_faces() {
        let builder = builder();
        let terrain = chunk_with(&[(5, 10, 5, BlockType::DIRT)]);
        let water = ChunkSet::new();
        let (vertices, opaque_len) =
            builder.build_vertices(terrain.get(Point2::new(0, 0)).unwrap(), &[&terrain], &water);
        assert_eq!(vertices.len(), 6 * 6);
        assert_eq!(opaque_len, vertices.len());
    }

    #[test]
    fn test_adjacent_cubes_cull_their_shared_faces() {
        let builder = builder();
        let terrain = chunk_with(&[(5, 10, 5, BlockType::DIRT), (6, 10, 5, BlockType::STONE)]);
        let water = ChunkSet::new();
        let (vertices, _) =
            builder.build_vertices(terrain.get(Point2::new(0, 0)).unwrap(), &[&terrain], &water);
        // 12 faces minus the two touching ones.
        assert_eq!(vertices.len(), 10 * 6);
    }

    #[test]
    fn test_rebuild_without_edits_is_idempotent() {
        let builder = builder();
        let terrain = chunk_with(&[
            (0, 0, 0, BlockType::BEDROCK),
            (4, 20, 9, BlockType::SANDSTONE),
            (7, 21, 9, BlockType::TALL_GRASS),
        ]);
        let water = chunk_with(&[(2, 30, 2, BlockType::WATER)]);
        let chunk = terrain.get(Point2::new(0, 0)).unwrap();
        let first = builder.build_vertices(chunk, &[&terrain], &water);
        let second = builder.build_vertices(chunk, &[&terrain], &water);
        assert_eq!(first, second);
    }

    #[test]
    fn test_partition_is_opaque_first_and_stable() {
        let builder = builder();
        let terrain = chunk_with(&[
            (5, 10, 5, BlockType::DIRT),
            (7, 10, 7, BlockType::TALL_GRASS),
            (9, 10, 9, BlockType::OAK_LEAVES),
        ]);
        let water = ChunkSet::new();
        let (vertices, opaque_len) =
            builder.build_vertices(terrain.get(Point2::new(0, 0)).unwrap(), &[&terrain], &water);

        assert!(vertices[..opaque_len].iter().all(|v| !v.is_transparent()));
        assert!(vertices[opaque_len..].iter().all(|v| v.is_transparent()));

        // The grid walk visits x=7 before x=9, and the stable partition must
        // keep that order inside the transparent run.
        let first_transparent = vertices[opaque_len];
        assert_eq!(first_transparent.position[0], 7.0 - 0.5);
    }

    #[test]
    fn test_water_surface_is_depressed_without_water_above() {
        let builder = builder();
        let terrain = ChunkSet::new();
        let water = chunk_with(&[(5, 10, 5, BlockType::WATER)]);
        let chunk = water.get(Point2::new(0, 0)).unwrap();
        let (vertices, opaque_len) = builder.build_vertices(chunk, &[&terrain, &water], &water);

        assert_eq!(opaque_len, 0);
        let top = vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(top, 10.0 + 0.5 - WATER_SURFACE_OFFSET);
    }

    #[test]
    fn test_stacked_water_keeps_a_full_cell_below() {
        let builder = builder();
        let terrain = ChunkSet::new();
        let water = chunk_with(&[(5, 10, 5, BlockType::WATER), (5, 11, 5, BlockType::WATER)]);
        let chunk = water.get(Point2::new(0, 0)).unwrap();
        let (vertices, _) = builder.build_vertices(chunk, &[&terrain, &water], &water);

        // The two shared faces are culled (water never renders behind
        // water), and only the top cell's surface is lowered.
        assert_eq!(vertices.len(), 10 * 6);
        let top = vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(top, 11.0 + 0.5 - WATER_SURFACE_OFFSET);
    }

    #[test]
    fn test_cross_blocks_never_cull_and_never_occlude() {
        let builder = builder();
        let mut blocks = vec![(5, 10, 5, BlockType::TALL_GRASS)];
        for direction in FaceDirection::all() {
            let offset = direction.offset();
            blocks.push((5 + offset.x, 10 + offset.y, 5 + offset.z, BlockType::DIRT));
        }
        let terrain = chunk_with(&blocks);
        let water = ChunkSet::new();
        let (vertices, opaque_len) =
            builder.build_vertices(terrain.get(Point2::new(0, 0)).unwrap(), &[&terrain], &water);

        // Each surrounding cube keeps all six faces (the cross neighbor
        // does not occlude), and the cross itself emits its two quads.
        assert_eq!(vertices.len(), 6 * 6 * 6 + 2 * 6);
        assert_eq!(vertices.len() - opaque_len, 2 * 6);
    }

    #[test]
    fn test_any_occluder_set_can_veto_a_face() {
        let builder = builder();
        let terrain = chunk_with(&[(5, 10, 5, BlockType::DIRT)]);
        let water = chunk_with(&[(5, 11, 5, BlockType::WATER)]);
        let chunk = water.get(Point2::new(0, 0)).unwrap();
        let (vertices, _) = builder.build_vertices(chunk, &[&terrain, &water], &water);

        // The water cube sits on the dirt cube: its bottom face is vetoed
        // by the terrain set even though the water set would render it.
        assert_eq!(vertices.len(), 5 * 6);
    }
}
