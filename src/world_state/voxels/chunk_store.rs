//! # Chunk Store Module
//!
//! This module owns the loaded chunk collections and provides the
//! coordinate-to-chunk and world-coordinate-to-cell lookups, including the
//! out-of-bounds and negative-coordinate handling every caller relies on.
//!
//! ## Absent is not air
//!
//! Lookups against an unloaded chunk or a Y outside `[0, WORLD_HEIGHT)`
//! return `None`, never a default block. Callers must treat absent as "no
//! block / not yet generated", which differs semantically from `AIR`.

use std::collections::HashMap;

use cgmath::{Point2, Point3};

use super::block::block_type::BlockType;
use super::chunk::{chunk_coord, Chunk, WORLD_HEIGHT};

/// A keyed collection of loaded chunks.
///
/// Every loaded chunk coordinate appears at most once; chunk lookup is O(1)
/// through the hash map.
pub struct ChunkSet {
    chunks: HashMap<Point2<i32>, Chunk>,
}

impl ChunkSet {
    /// Creates a new, empty chunk set.
    pub fn new() -> Self {
        ChunkSet {
            chunks: HashMap::new(),
        }
    }

    /// Returns whether a chunk is loaded at the given chunk coordinate.
    pub fn contains(&self, coord: Point2<i32>) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Inserts a chunk, replacing any previous chunk at its coordinate.
    pub fn insert(&mut self, chunk: Chunk) {
        self.chunks.insert(chunk.position, chunk);
    }

    /// Returns the chunk at the given chunk coordinate, if loaded.
    pub fn get(&self, coord: Point2<i32>) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Returns a mutable handle to the chunk at the given chunk coordinate.
    pub fn get_mut(&mut self, coord: Point2<i32>) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Maps world coordinates to the owning chunk, if loaded.
    pub fn chunk_at(&self, world_x: i32, world_z: i32) -> Option<&Chunk> {
        self.get(Point2::new(chunk_coord(world_x), chunk_coord(world_z)))
    }

    /// Returns the block type at the given world position.
    ///
    /// `None` when the owning chunk is not loaded or `world_y` lies outside
    /// `[0, WORLD_HEIGHT)`.
    pub fn block_at(&self, world_x: i32, world_y: i32, world_z: i32) -> Option<BlockType> {
        if !(0..WORLD_HEIGHT).contains(&world_y) {
            return None;
        }
        let chunk = self.chunk_at(world_x, world_z)?;
        let origin = chunk.origin();
        Some(chunk.block(world_x - origin.x, world_y, world_z - origin.y))
    }

    /// Overwrites the block at the given world position.
    ///
    /// Returns `false` without touching anything when the cell is absent;
    /// this is the mutable-handle path used by all edit operations.
    pub fn set_block_at(&mut self, world_x: i32, world_y: i32, world_z: i32, block: BlockType) -> bool {
        if !(0..WORLD_HEIGHT).contains(&world_y) {
            return false;
        }
        let coord = Point2::new(chunk_coord(world_x), chunk_coord(world_z));
        match self.get_mut(coord) {
            Some(chunk) => {
                let origin = chunk.origin();
                chunk.set_block(world_x - origin.x, world_y, world_z - origin.y, block);
                true
            }
            None => false,
        }
    }

    /// Returns whether the cell at `position` holds a non-air block.
    ///
    /// Absent cells count as unoccupied.
    pub fn is_occupied(&self, position: Point3<i32>) -> bool {
        match self.block_at(position.x, position.y, position.z) {
            Some(block) => !block.is_air(),
            None => false,
        }
    }

    /// Removes every chunk outside a square of half-width `keep_radius`
    /// around `center`. Returns the number of evicted chunks.
    pub fn evict_outside(&mut self, center: Point2<i32>, keep_radius: i32) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|coord, _| {
            (coord.x - center.x).abs() <= keep_radius && (coord.y - center.y).abs() <= keep_radius
        });
        before - self.chunks.len()
    }

    /// Returns the coordinates of every loaded chunk.
    pub fn coords(&self) -> Vec<Point2<i32>> {
        self.chunks.keys().copied().collect()
    }

    /// Iterates over the loaded chunks.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Iterates mutably over the loaded chunks.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.values_mut()
    }

    /// Returns the number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns whether no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl Default for ChunkSet {
    fn default() -> Self {
        Self::new()
    }
}

/// The two chunk collections of the world: terrain and water.
///
/// Both are addressed by the same chunk coordinates but are otherwise
/// independent; a cell is occupied by at most one of the two (conflicts are
/// resolved by the water simulator in favor of solid terrain).
pub struct ChunkStore {
    /// Solid terrain chunks.
    pub terrain: ChunkSet,

    /// Water chunks, parallel to the terrain set.
    pub water: ChunkSet,
}

impl ChunkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        ChunkStore {
            terrain: ChunkSet::new(),
            water: ChunkSet::new(),
        }
    }

    /// Evicts chunks outside the keep radius from both collections
    /// independently. Returns the total number of evicted chunks.
    pub fn evict(&mut self, center: Point2<i32>, keep_radius: i32) -> usize {
        self.terrain.evict_outside(center, keep_radius) + self.water.evict_outside(center, keep_radius)
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_state::voxels::chunk::CHUNK_SIZE;

    fn set_with_chunk(coord: Point2<i32>) -> ChunkSet {
        let mut set = ChunkSet::new();
        set.insert(Chunk::new(coord));
        set
    }

    #[test]
    fn test_negative_world_coordinates_resolve_below_zero() {
        let set = set_with_chunk(Point2::new(-1, -1));
        assert!(set.chunk_at(-1, -1).is_some());
        assert!(set.chunk_at(-CHUNK_SIZE, -CHUNK_SIZE).is_some());
        assert!(set.chunk_at(0, 0).is_none());
    }

    #[test]
    fn test_block_at_absent_chunk_is_none() {
        let set = set_with_chunk(Point2::new(0, 0));
        assert_eq!(set.block_at(0, 10, 0), Some(BlockType::AIR));
        assert_eq!(set.block_at(CHUNK_SIZE, 10, 0), None);
    }

    #[test]
    fn test_block_at_out_of_range_y_is_none() {
        let set = set_with_chunk(Point2::new(0, 0));
        assert_eq!(set.block_at(0, -1, 0), None);
        assert_eq!(set.block_at(0, WORLD_HEIGHT, 0), None);
    }

    #[test]
    fn test_set_block_at_unloaded_is_a_no_op() {
        let mut set = ChunkSet::new();
        assert!(!set.set_block_at(3, 3, 3, BlockType::DIRT));
    }

    #[test]
    fn test_set_and_read_back_across_negative_chunk() {
        let mut set = set_with_chunk(Point2::new(-1, 0));
        assert!(set.set_block_at(-1, 5, 3, BlockType::STONE));
        assert_eq!(set.block_at(-1, 5, 3), Some(BlockType::STONE));
        assert!(set.is_occupied(Point3::new(-1, 5, 3)));
        assert!(!set.is_occupied(Point3::new(-2, 5, 3)));
    }

    #[test]
    fn test_evict_keeps_square_around_center() {
        let mut store = ChunkStore::new();
        for x in -2..=2 {
            for z in -2..=2 {
                store.terrain.insert(Chunk::new(Point2::new(x, z)));
                store.water.insert(Chunk::new(Point2::new(x, z)));
            }
        }
        let evicted = store.evict(Point2::new(0, 0), 1);
        assert_eq!(store.terrain.len(), 9);
        assert_eq!(store.water.len(), 9);
        assert_eq!(evicted, 2 * (25 - 9));
        assert!(!store.terrain.contains(Point2::new(2, 0)));
        assert!(store.terrain.contains(Point2::new(1, -1)));
    }
}
