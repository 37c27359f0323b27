//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size vertical column of
//! the voxel grid addressed by a 2D integer chunk coordinate, together with
//! the dimensional constants and the flattened index math used everywhere a
//! cell is touched.
//!
//! ## Storage
//!
//! A chunk stores its cells as a dense grid of `BlockType`, flattened with
//! index `x + z * CHUNK_SIZE + y * CHUNK_SIZE²` and sized exactly
//! `WORLD_HEIGHT * CHUNK_SIZE²`. There are no partial chunks: the grid length
//! is an invariant checked on construction.
//!
//! Alongside the grid, a chunk carries its derived render geometry (the
//! vertex list produced by the mesh builder, partitioned opaque-first) and a
//! dirty flag consumed by the external renderer hook.

use cgmath::Point2;

use crate::world_state::meshing::vertex::Vertex;

use super::block::block_type::BlockType;

/// The dimension (width and depth) of a chunk in cells.
pub const CHUNK_SIZE: i32 = 16;
/// The number of cells in a single horizontal plane of a chunk (CHUNK_SIZE²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_SIZE * CHUNK_SIZE;
/// The height of the world (and of every chunk) in cells.
pub const WORLD_HEIGHT: i32 = 128;
/// The total number of cells in a chunk.
pub const CHUNK_VOLUME: usize = (WORLD_HEIGHT * CHUNK_PLANE_SIZE) as usize;

/// Maps a world axis coordinate to the chunk-grid coordinate containing it.
///
/// Uses floor division rather than truncation, so negative world coordinates
/// resolve to the chunk below zero: world x = -1 belongs to chunk -1, not 0.
pub fn chunk_coord(world: i32) -> i32 {
    if world >= 0 {
        world / CHUNK_SIZE
    } else {
        (world + 1) / CHUNK_SIZE - 1
    }
}

/// A fixed-size vertical column of the voxel grid.
///
/// Two independent chunk collections exist per chunk coordinate: a terrain
/// chunk and a water chunk. They share the same coordinate system, and a cell
/// is occupied by at most one of the two.
pub struct Chunk {
    /// The position of this chunk in chunk-grid units (not world units).
    pub position: Point2<i32>,

    /// The dense cell grid, always exactly `CHUNK_VOLUME` entries.
    pub blocks: Vec<BlockType>,

    /// Derived render geometry: opaque vertices followed by transparent ones.
    pub vertices: Vec<Vertex>,

    /// Number of leading opaque vertices in `vertices`.
    pub opaque_len: usize,

    /// Set whenever the geometry has been rebuilt; cleared by the renderer
    /// hook when the geometry is handed off.
    pub dirty: bool,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all cells are air).
    pub fn new(position: Point2<i32>) -> Self {
        Chunk {
            position,
            blocks: vec![BlockType::AIR; CHUNK_VOLUME],
            vertices: Vec::new(),
            opaque_len: 0,
            dirty: false,
        }
    }

    /// Computes the flattened grid index of a local cell position.
    pub fn block_index(x: i32, y: i32, z: i32) -> usize {
        debug_assert!((0..CHUNK_SIZE).contains(&x));
        debug_assert!((0..WORLD_HEIGHT).contains(&y));
        debug_assert!((0..CHUNK_SIZE).contains(&z));
        (x + z * CHUNK_SIZE + y * CHUNK_PLANE_SIZE) as usize
    }

    /// Recovers the local cell position from a flattened grid index.
    pub fn decode_index(index: usize) -> (i32, i32, i32) {
        let index = index as i32;
        let y = index / CHUNK_PLANE_SIZE;
        let z = (index % CHUNK_PLANE_SIZE) / CHUNK_SIZE;
        let x = index % CHUNK_SIZE;
        (x, y, z)
    }

    /// Returns the block type at the given local cell position.
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.blocks[Self::block_index(x, y, z)]
    }

    /// Overwrites the block type at the given local cell position.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        self.blocks[Self::block_index(x, y, z)] = block;
    }

    /// Returns the world-space coordinates of this chunk's (x, z) origin.
    pub fn origin(&self) -> Point2<i32> {
        Point2::new(self.position.x * CHUNK_SIZE, self.position.y * CHUNK_SIZE)
    }

    /// Installs freshly built geometry and flags the chunk for upload.
    pub fn install_geometry(&mut self, vertices: Vec<Vertex>, opaque_len: usize) {
        self.vertices = vertices;
        self.opaque_len = opaque_len;
        self.dirty = true;
    }
}
