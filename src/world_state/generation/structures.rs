//! # Structure Spawner Module
//!
//! Holds the queue of structures waiting to be stamped into the world and
//! stamps them once the neighborhood of their anchor chunk exists. Deferring
//! the stamp until all four axis neighbors are loaded prevents a structure
//! whose footprint crosses a chunk boundary from being half-born into
//! unloaded space.
//!
//! Queue removal swaps with the last element, so the spawn order across a
//! batch is unspecified. That is documented nondeterminism, not a bug: each
//! pending structure is consumed exactly once either way.

use cgmath::{Point2, Point3};
use log::debug;

use crate::world_state::registry::{BlockRegistry, StructureId};
use crate::world_state::voxels::block::block_type::BlockType;
use crate::world_state::voxels::block::MeshKind;
use crate::world_state::voxels::chunk::chunk_coord;
use crate::world_state::voxels::chunk_store::ChunkSet;

use std::sync::Arc;

/// A structure waiting for its anchor chunk's neighborhood to be loaded.
#[derive(Clone, Debug)]
pub struct PendingStructure {
    /// Handle of the structure template to stamp.
    pub structure: StructureId,

    /// World position of the anchor cell (one above the spawn surface).
    pub anchor: Point3<i32>,
}

/// Stamps pending structures into the terrain once their surroundings exist.
pub struct StructureSpawner {
    registry: Arc<BlockRegistry>,
    pending: Vec<PendingStructure>,
}

impl StructureSpawner {
    /// Creates a spawner with an empty queue.
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        StructureSpawner {
            registry,
            pending: Vec::new(),
        }
    }

    /// Appends a batch of spawn candidates to the queue.
    pub fn enqueue(&mut self, structures: Vec<PendingStructure>) {
        self.pending.extend(structures);
    }

    /// Returns the number of structures still waiting.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Stamps every pending structure anchored in the given chunk, provided
    /// all four axis-neighbor chunks are loaded. Returns whether anything
    /// was stamped.
    pub fn try_spawn(&mut self, chunk: Point2<i32>, terrain: &mut ChunkSet) -> bool {
        let neighbors = [
            Point2::new(chunk.x - 1, chunk.y),
            Point2::new(chunk.x + 1, chunk.y),
            Point2::new(chunk.x, chunk.y - 1),
            Point2::new(chunk.x, chunk.y + 1),
        ];
        if !neighbors.iter().all(|coord| terrain.contains(*coord)) {
            return false;
        }

        let mut spawned = false;
        let mut index = self.pending.len();
        while index > 0 {
            index -= 1;
            let anchor = self.pending[index].anchor;
            let anchor_chunk = Point2::new(chunk_coord(anchor.x), chunk_coord(anchor.z));
            if anchor_chunk != chunk {
                continue;
            }

            let pending = self.pending.swap_remove(index);
            self.stamp(&pending, terrain);
            spawned = true;
        }

        spawned
    }

    /// Writes a structure's blocks into the terrain by absolute offset.
    ///
    /// A failed cell lookup (unloaded chunk, out-of-range height) silently
    /// aborts the remaining blocks; a partial stamp is accepted behavior.
    /// Placing a cube block converts grass directly beneath it to dirt.
    fn stamp(&self, pending: &PendingStructure, terrain: &mut ChunkSet) {
        let structure = self.registry.structure(pending.structure);

        for (offset, block) in &structure.blocks {
            let pos = pending.anchor + *offset;
            if !terrain.set_block_at(pos.x, pos.y, pos.z, *block) {
                return;
            }

            if self.registry.mesh_kind(*block) == Some(MeshKind::Cube)
                && terrain.block_at(pos.x, pos.y - 1, pos.z) == Some(BlockType::GRASS_BLOCK)
            {
                terrain.set_block_at(pos.x, pos.y - 1, pos.z, BlockType::DIRT);
            }
        }

        debug!(
            "stamped {} at ({}, {}, {})",
            structure.name, pending.anchor.x, pending.anchor.y, pending.anchor.z
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_state::voxels::chunk::{Chunk, CHUNK_SIZE};

    fn flat_grass_set(coords: &[Point2<i32>], surface_y: i32) -> ChunkSet {
        let mut set = ChunkSet::new();
        for &coord in coords {
            let mut chunk = Chunk::new(coord);
            for x in 0..CHUNK_SIZE {
                for z in 0..CHUNK_SIZE {
                    chunk.set_block(x, surface_y, z, BlockType::GRASS_BLOCK);
                }
            }
            set.insert(chunk);
        }
        set
    }

    fn spawner_with_tree_at(anchor: Point3<i32>) -> (StructureSpawner, StructureId) {
        let registry = Arc::new(BlockRegistry::with_defaults().unwrap());
        let tree = registry
            .biome("forest")
            .unwrap()
            .big_vegetation
            .as_ref()
            .unwrap()
            .structure;
        let mut spawner = StructureSpawner::new(registry);
        spawner.enqueue(vec![PendingStructure {
            structure: tree,
            anchor,
        }]);
        (spawner, tree)
    }

    fn ring() -> [Point2<i32>; 5] {
        [
            Point2::new(0, 0),
            Point2::new(1, 0),
            Point2::new(-1, 0),
            Point2::new(0, 1),
            Point2::new(0, -1),
        ]
    }

    #[test]
    fn test_spawn_waits_for_all_four_neighbors() {
        let (mut spawner, _) = spawner_with_tree_at(Point3::new(8, 41, 8));
        let mut set = flat_grass_set(&ring()[..4], 40);

        assert!(!spawner.try_spawn(Point2::new(0, 0), &mut set));
        assert_eq!(spawner.pending_len(), 1);

        set.insert(Chunk::new(ring()[4]));
        assert!(spawner.try_spawn(Point2::new(0, 0), &mut set));
        assert_eq!(spawner.pending_len(), 0);
    }

    #[test]
    fn test_stamp_places_trunk_and_fixes_grass_below() {
        let (mut spawner, _) = spawner_with_tree_at(Point3::new(8, 41, 8));
        let mut set = flat_grass_set(&ring(), 40);

        assert!(spawner.try_spawn(Point2::new(0, 0), &mut set));

        for y in 41..45 {
            assert_eq!(set.block_at(8, y, 8), Some(BlockType::OAK_LOG));
        }
        assert_eq!(set.block_at(8, 45, 8), Some(BlockType::OAK_LEAVES));
        assert_eq!(set.block_at(7, 43, 7), Some(BlockType::OAK_LEAVES));
        // The trunk base converted the grass beneath it.
        assert_eq!(set.block_at(8, 40, 8), Some(BlockType::DIRT));
        // Cells away from the footprint keep their grass.
        assert_eq!(set.block_at(4, 40, 4), Some(BlockType::GRASS_BLOCK));
    }

    #[test]
    fn test_anchor_in_other_chunk_is_left_queued() {
        let (mut spawner, _) = spawner_with_tree_at(Point3::new(CHUNK_SIZE + 2, 41, 2));
        let mut set = flat_grass_set(&ring(), 40);

        assert!(!spawner.try_spawn(Point2::new(0, 0), &mut set));
        assert_eq!(spawner.pending_len(), 1);
    }

    #[test]
    fn test_footprint_crossing_a_loaded_boundary_stamps_fully() {
        // Anchor at the +x edge of chunk (0, 0): the leaf crown reaches into
        // chunk (1, 0).
        let (mut spawner, _) = spawner_with_tree_at(Point3::new(CHUNK_SIZE - 1, 41, 8));
        let mut set = flat_grass_set(&ring(), 40);

        assert!(spawner.try_spawn(Point2::new(0, 0), &mut set));
        assert_eq!(set.block_at(CHUNK_SIZE, 43, 8), Some(BlockType::OAK_LEAVES));
    }
}
