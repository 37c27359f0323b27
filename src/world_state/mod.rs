//! # World State Module
//!
//! The orchestration layer of the world core. `WorldState` owns the chunk
//! collections and wires the generator, structure spawner, water simulator
//! and mesh builder together behind the public mutation surface:
//! `place_block`, `remove_block` and `load_around`.
//!
//! ## Incremental correctness
//!
//! Editing one block invalidates exactly the geometry it can affect: the
//! owning chunk is always re-meshed, and an edit on a chunk-local edge
//! ripples into the chunk across that boundary (never the diagonal one).
//! Chunks whose geometry was rebuilt carry a dirty flag until the external
//! renderer consumes it through [`WorldState::flush_geometry`].
//!
//! ## Concurrency
//!
//! The chunk store lives in an [`MtResource`] so mesh building can take
//! shared read views (vertex construction is pure), while every mutation
//! funnels through `WorldState` on the owning thread: the store is
//! single-writer. Worker threads generate fully populated chunks and hand
//! them back through [`WorldState::insert_generated`].

use cgmath::{Point2, Point3};
use log::{debug, info};

use crate::core::MtResource;

use self::generation::structures::StructureSpawner;
use self::generation::terrain::{GeneratedChunk, TerrainGenerator};
use self::meshing::vertex::Vertex;
use self::meshing::MeshBuilder;
use self::registry::{BlockRegistry, RegistryError};
use self::settings::{LoadPolicy, WorldSettings};
use self::simulation::water::WaterSimulator;
use self::voxels::block::block_type::BlockType;
use self::voxels::block::{BlockDefinition, MeshKind};
use self::voxels::chunk::{chunk_coord, CHUNK_SIZE};
use self::voxels::chunk_store::ChunkStore;

use std::sync::Arc;

pub mod generation;
pub mod meshing;
pub mod registry;
pub mod settings;
pub mod simulation;
pub mod tasks;
pub mod voxels;

/// One chunk's geometry handed to the renderer hook.
///
/// `vertices[..opaque_len]` is the opaque run, the rest is transparent;
/// drawing the two runs in order needs no further sorting.
pub struct GeometryUpload<'a> {
    /// Chunk coordinate the geometry belongs to.
    pub position: Point2<i32>,

    /// The partitioned vertex list.
    pub vertices: &'a [Vertex],

    /// Number of leading opaque vertices.
    pub opaque_len: usize,
}

/// The world core: chunk collections plus the components operating on them.
pub struct WorldState {
    registry: Arc<BlockRegistry>,
    settings: WorldSettings,
    store: MtResource<ChunkStore>,
    generator: Arc<TerrainGenerator>,
    spawner: StructureSpawner,
    water: WaterSimulator,
    mesher: MeshBuilder,
}

impl WorldState {
    /// Creates a world over the given registry and settings.
    ///
    /// Fails if the settings name a biome the registry does not know.
    pub fn new(registry: Arc<BlockRegistry>, settings: WorldSettings) -> Result<Self, RegistryError> {
        let generator = Arc::new(TerrainGenerator::new(registry.clone(), settings.clone())?);
        Ok(WorldState {
            spawner: StructureSpawner::new(registry.clone()),
            water: WaterSimulator::new(settings.physics_distance),
            mesher: MeshBuilder::new(registry.clone()),
            store: MtResource::new(ChunkStore::new()),
            generator,
            registry,
            settings,
        })
    }

    /// Writes a block into the terrain at a world position.
    ///
    /// A no-op returning `false` when the owning chunk is not loaded. Grass
    /// directly beneath the placed block turns to dirt, and the affected
    /// chunks are re-meshed, rippling across a chunk boundary if the edit
    /// sits on one.
    pub fn place_block(&mut self, position: Point3<i32>, block: BlockType) -> bool {
        let mut store = self.store.get_mut();

        if !store
            .terrain
            .set_block_at(position.x, position.y, position.z, block)
        {
            return false;
        }

        if store.terrain.block_at(position.x, position.y - 1, position.z)
            == Some(BlockType::GRASS_BLOCK)
        {
            store
                .terrain
                .set_block_at(position.x, position.y - 1, position.z, BlockType::DIRT);
        }

        Self::reload_after_edit(&self.mesher, &mut store, position);
        debug!(
            "placed {:?} at ({}, {}, {})",
            block, position.x, position.y, position.z
        );
        true
    }

    /// Clears the terrain cell at a world position back to air.
    ///
    /// A no-op returning `false` when the owning chunk is not loaded. A
    /// cross-mesh block directly above is cleared too (cross vegetation
    /// cannot float), and the same boundary-ripple re-mesh rule applies.
    pub fn remove_block(&mut self, position: Point3<i32>) -> bool {
        let mut store = self.store.get_mut();

        if !store
            .terrain
            .set_block_at(position.x, position.y, position.z, BlockType::AIR)
        {
            return false;
        }

        if let Some(above) = store.terrain.block_at(position.x, position.y + 1, position.z) {
            if !above.is_air() && self.registry.mesh_kind(above) == Some(MeshKind::Cross) {
                store
                    .terrain
                    .set_block_at(position.x, position.y + 1, position.z, BlockType::AIR);
            }
        }

        Self::reload_after_edit(&self.mesher, &mut store, position);
        debug!(
            "removed block at ({}, {}, {})",
            position.x, position.y, position.z
        );
        true
    }

    /// Maintains the loaded ring around a focus chunk: evicts chunks outside
    /// it, spawns ready structures, then generates missing chunks.
    ///
    /// Under [`LoadPolicy::All`] the whole ring is brought up to date and
    /// re-meshed in one call. Under [`LoadPolicy::Incremental`] at most one
    /// visible change happens per call and the method returns early; calling
    /// it repeatedly converges to the same state.
    ///
    /// Returns whether anything changed.
    pub fn load_around(&mut self, center: Point2<i32>) -> bool {
        let radius = self.settings.render_distance - 1;
        let incremental = self.settings.load_policy == LoadPolicy::Incremental;
        let mut store = self.store.get_mut();

        let evicted = store.evict(center, radius);
        if evicted > 0 {
            debug!("evicted {evicted} chunks outside radius {radius} of ({}, {})", center.x, center.y);
        }

        let mut changed = false;

        for x in (center.x - radius)..=(center.x + radius) {
            for z in (center.y - radius)..=(center.y + radius) {
                let coord = Point2::new(x, z);
                if !self.spawner.try_spawn(coord, &mut store.terrain) {
                    continue;
                }
                changed = true;
                if incremental {
                    Self::reload_ring(&self.mesher, &mut store, coord);
                    return true;
                }
            }
        }

        for x in (center.x - radius)..=(center.x + radius) {
            for z in (center.y - radius)..=(center.y + radius) {
                let coord = Point2::new(x, z);
                if store.terrain.contains(coord) {
                    continue;
                }

                let generated = self.generator.generate(coord);
                store.terrain.insert(generated.terrain);
                store.water.insert(generated.water);
                self.spawner.enqueue(generated.structures);

                changed = true;
                if incremental {
                    Self::reload_ring(&self.mesher, &mut store, coord);
                    return true;
                }
            }
        }

        if changed && !incremental {
            for coord in store.terrain.coords() {
                Self::remesh_terrain(&self.mesher, &mut store, coord);
            }
            for coord in store.water.coords() {
                Self::remesh_water(&self.mesher, &mut store, coord);
            }
            info!(
                "loaded ring around ({}, {}): {} terrain chunks, {} structures pending",
                center.x,
                center.y,
                store.terrain.len(),
                self.spawner.pending_len()
            );
        }

        changed
    }

    /// Runs one water simulation pass around a focus chunk and re-meshes
    /// every water chunk the pass touched, each exactly once.
    ///
    /// Returns whether any cell changed.
    pub fn change_environment(&mut self, focus: Point2<i32>) -> bool {
        let mut store = self.store.get_mut();
        let touched = self.water.change_environment(focus, &mut store);
        for coord in &touched {
            Self::remesh_water(&self.mesher, &mut store, *coord);
        }
        !touched.is_empty()
    }

    /// Inserts a fully populated chunk generated elsewhere (typically a
    /// worker thread) and re-meshes its neighborhood.
    ///
    /// This is the serialized hand-off point of the worker path: population
    /// happens off-thread, insertion happens here, on the owning thread.
    pub fn insert_generated(&mut self, generated: GeneratedChunk) {
        let mut store = self.store.get_mut();
        let coord = generated.terrain.position;
        store.terrain.insert(generated.terrain);
        store.water.insert(generated.water);
        self.spawner.enqueue(generated.structures);
        Self::reload_ring(&self.mesher, &mut store, coord);
    }

    /// Returns the terrain block at a world position, or `None` when the
    /// owning chunk is not loaded or the height is out of range.
    pub fn block_at(&self, position: Point3<i32>) -> Option<BlockType> {
        self.store
            .get()
            .terrain
            .block_at(position.x, position.y, position.z)
    }

    /// Returns the registry definition of the block at a world position.
    ///
    /// `None` for absent cells and for air.
    pub fn definition_at(&self, position: Point3<i32>) -> Option<&BlockDefinition> {
        let block = self.block_at(position)?;
        self.registry.definition(block)
    }

    /// Returns the world-space positions of a chunk's opaque vertices, for
    /// external collision-mesh generation.
    pub fn solid_positions(&self, coord: Point2<i32>) -> Vec<[f32; 3]> {
        let store = self.store.get();
        match store.terrain.get(coord) {
            Some(chunk) => chunk.vertices[..chunk.opaque_len]
                .iter()
                .map(|v| v.position)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns the coordinates of every chunk whose rebuilt geometry has not
    /// been consumed yet.
    pub fn dirty_chunks(&self) -> Vec<Point2<i32>> {
        let store = self.store.get();
        let mut coords = Vec::new();
        for chunk in store.terrain.iter().chain(store.water.iter()) {
            if chunk.dirty && !coords.contains(&chunk.position) {
                coords.push(chunk.position);
            }
        }
        coords
    }

    /// Hands every dirty chunk's geometry to the renderer hook and clears
    /// the dirty flags.
    ///
    /// Chunks with empty geometry are cleared but not uploaded; an empty
    /// vertex list is a valid outcome, not an error.
    pub fn flush_geometry(&mut self, mut upload: impl FnMut(GeometryUpload<'_>)) {
        let mut guard = self.store.get_mut();
        let store = &mut *guard;
        for chunk in store.terrain.iter_mut().chain(store.water.iter_mut()) {
            if !chunk.dirty {
                continue;
            }
            chunk.dirty = false;
            if chunk.vertices.is_empty() {
                continue;
            }
            upload(GeometryUpload {
                position: chunk.position,
                vertices: &chunk.vertices,
                opaque_len: chunk.opaque_len,
            });
        }
    }

    /// Probes whether a chunk hosts ambient creatures; consumed by external
    /// spawners.
    pub fn is_animal_chunk(&self, chunk_pos: Point2<i32>) -> bool {
        self.generator.is_animal_chunk(chunk_pos)
    }

    /// Returns a shared handle to the terrain generator, for dispatching
    /// chunk population onto worker threads.
    pub fn generator(&self) -> Arc<TerrainGenerator> {
        self.generator.clone()
    }

    /// Returns a shared handle to the chunk store for read-only consumers.
    pub fn store(&self) -> MtResource<ChunkStore> {
        self.store.clone()
    }

    /// Returns the registry this world was built over.
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Returns the active settings.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Rebuilds the terrain geometry of one chunk, if loaded.
    fn remesh_terrain(mesher: &MeshBuilder, store: &mut ChunkStore, coord: Point2<i32>) {
        let geometry = store
            .terrain
            .get(coord)
            .map(|chunk| mesher.build_vertices(chunk, &[&store.terrain], &store.water));
        if let Some((vertices, opaque_len)) = geometry {
            if let Some(chunk) = store.terrain.get_mut(coord) {
                chunk.install_geometry(vertices, opaque_len);
            }
        }
    }

    /// Rebuilds the water geometry of one chunk, if loaded. Water faces are
    /// culled against both collections.
    fn remesh_water(mesher: &MeshBuilder, store: &mut ChunkStore, coord: Point2<i32>) {
        let geometry = store
            .water
            .get(coord)
            .map(|chunk| mesher.build_vertices(chunk, &[&store.terrain, &store.water], &store.water));
        if let Some((vertices, opaque_len)) = geometry {
            if let Some(chunk) = store.water.get_mut(coord) {
                chunk.install_geometry(vertices, opaque_len);
            }
        }
    }

    /// Re-meshes the chunks an edit at `position` can affect: the owning
    /// chunk, plus the neighbor across any chunk-local edge the edit sits
    /// on. Diagonal neighbors are never affected.
    fn reload_after_edit(mesher: &MeshBuilder, store: &mut ChunkStore, position: Point3<i32>) {
        let coord = Point2::new(chunk_coord(position.x), chunk_coord(position.z));
        Self::remesh_terrain(mesher, store, coord);
        Self::remesh_water(mesher, store, coord);

        let local_x = position.x - coord.x * CHUNK_SIZE;
        let local_z = position.z - coord.y * CHUNK_SIZE;

        if local_x == 0 || local_x == CHUNK_SIZE - 1 {
            let neighbor_x = if local_x == 0 { coord.x - 1 } else { coord.x + 1 };
            let neighbor = Point2::new(neighbor_x, coord.y);
            Self::remesh_terrain(mesher, store, neighbor);
            Self::remesh_water(mesher, store, neighbor);
        }
        if local_z == 0 || local_z == CHUNK_SIZE - 1 {
            let neighbor_z = if local_z == 0 { coord.y - 1 } else { coord.y + 1 };
            let neighbor = Point2::new(coord.x, neighbor_z);
            Self::remesh_terrain(mesher, store, neighbor);
            Self::remesh_water(mesher, store, neighbor);
        }
    }

    /// Re-meshes a chunk and its four axis neighbors after generation or
    /// structure changes.
    fn reload_ring(mesher: &MeshBuilder, store: &mut ChunkStore, coord: Point2<i32>) {
        for dx in -1..=1 {
            for dz in -1..=1 {
                if dx != 0 && dz != 0 {
                    continue;
                }
                let neighbor = Point2::new(coord.x + dx, coord.y + dz);
                Self::remesh_terrain(mesher, store, neighbor);
                Self::remesh_water(mesher, store, neighbor);
            }
        }
    }
}
