//! # Terrain Generator Module
//!
//! Populates chunks from layered noise. Per column, two independent noise
//! fields decide the surface height (an undersea field that also amplifies
//! terrain below sea level, and a height field blended in above it), a third
//! field widens or narrows the beach band, and a fourth rolls vegetation
//! spawns. The classification walk then fills the column from the surface
//! down to bedrock, routing sea cells into the parallel water chunk.
//!
//! Generation is a pure function of (seed, chunk coordinate): a generator can
//! run on a worker thread and hand fully populated chunks back for the
//! single-writer store to insert.

use cgmath::{Point2, Point3};
use log::debug;

use crate::world_state::registry::{Biome, BlockRegistry, RegistryError};
use crate::world_state::settings::WorldSettings;
use crate::world_state::voxels::block::block_type::BlockType;
use crate::world_state::voxels::chunk::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};

use super::noise_field::NoiseField;
use super::structures::PendingStructure;

use std::sync::Arc;

/// Vegetation rolls below this value mark a chunk as hosting ambient
/// creatures; consumed by external spawners through `is_animal_chunk`.
const ANIMAL_SPAWN_CHANCE: f32 = 0.4;

/// The output of generating one chunk coordinate: a fully populated terrain
/// chunk, its parallel water chunk, and the vegetation structures the
/// spawner should stamp once the neighborhood exists.
pub struct GeneratedChunk {
    /// The populated terrain chunk.
    pub terrain: Chunk,

    /// The populated water chunk at the same coordinate.
    pub water: Chunk,

    /// Vegetation spawn candidates detected in this chunk.
    pub structures: Vec<PendingStructure>,
}

/// Everything the classification walk needs to know about one (x, z) column.
struct ColumnProfile {
    /// The fractional terrain height before clamping; sea cells sit above it.
    world_height: f32,

    /// The clamped integer surface height; the top-layer block goes here.
    surface_y: i32,

    /// Half-width of the beach band around sea level for this column.
    beach_half: f32,
}

/// Deterministic, seeded terrain generation for one biome.
pub struct TerrainGenerator {
    registry: Arc<BlockRegistry>,
    settings: WorldSettings,
    biome: Biome,
    height_noise: NoiseField,
    undersea_noise: NoiseField,
    beach_noise: NoiseField,
    vegetation_noise: NoiseField,
}

impl TerrainGenerator {
    /// Creates a generator for the biome named in the settings.
    ///
    /// Fails if the registry does not know that biome.
    pub fn new(registry: Arc<BlockRegistry>, settings: WorldSettings) -> Result<Self, RegistryError> {
        let biome = registry
            .biome(&settings.biome)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownBiome(settings.biome.clone()))?;

        let seed = settings.seed;
        Ok(TerrainGenerator {
            height_noise: NoiseField::new(seed, settings.height_octaves, settings.height_scale),
            undersea_noise: NoiseField::new(
                seed.wrapping_add(1),
                settings.undersea_octaves,
                settings.undersea_scale,
            ),
            beach_noise: NoiseField::new(
                seed.wrapping_add(2),
                settings.beach_octaves,
                settings.beach_scale,
            ),
            vegetation_noise: NoiseField::new(
                seed.wrapping_add(3),
                settings.vegetation_octaves,
                settings.vegetation_scale,
            ),
            registry,
            settings,
            biome,
        })
    }

    /// Generates the chunk at the given chunk coordinate.
    pub fn generate(&self, coord: Point2<i32>) -> GeneratedChunk {
        let mut terrain = Chunk::new(coord);
        let mut water = Chunk::new(coord);
        let mut structures = Vec::new();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let world_x = coord.x * CHUNK_SIZE + x;
                let world_z = coord.y * CHUNK_SIZE + z;
                let profile = self.column_profile(world_x, world_z);

                // Once soil has been written in this column, any sand the
                // classification produces below it turns back into dirt.
                let mut has_dirt = false;

                for y in (0..=profile.surface_y).rev() {
                    let mut block = self.classify(y, &profile);

                    if block == BlockType::WATER {
                        water.set_block(x, y, z, block);
                        continue;
                    }

                    if block == BlockType::DIRT || block == BlockType::GRASS_BLOCK {
                        has_dirt = true;
                    }
                    if block == BlockType::SAND && has_dirt {
                        block = BlockType::DIRT;
                    }

                    terrain.set_block(x, y, z, block);
                }

                self.roll_vegetation(&terrain, x, z, &profile, &mut structures);
            }
        }

        debug!(
            "generated chunk ({}, {}) with {} pending structures",
            coord.x,
            coord.y,
            structures.len()
        );

        GeneratedChunk {
            terrain,
            water,
            structures,
        }
    }

    /// Probes the vegetation field to decide whether a chunk hosts ambient
    /// creatures. Consumed by external spawners.
    pub fn is_animal_chunk(&self, chunk_pos: Point2<i32>) -> bool {
        let roll = self.vegetation_noise.sample(
            chunk_pos.x as f64 / CHUNK_SIZE as f64,
            chunk_pos.y as f64 / CHUNK_SIZE as f64,
        );
        roll < ANIMAL_SPAWN_CHANCE
    }

    /// Returns the registry this generator reads from.
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    fn column_profile(&self, world_x: i32, world_z: i32) -> ColumnProfile {
        let nx = world_x as f64 / CHUNK_SIZE as f64;
        let nz = world_z as f64 / CHUNK_SIZE as f64;
        let sea = self.settings.sea_level as f32;
        let terrain_height = self.settings.terrain_height;

        let undersea_height = self.undersea_noise.sample(nx, nz) * terrain_height;

        let world_height = if undersea_height < sea {
            // Below sea level the undersea field is amplified, carving the
            // sea floor away from the surface instead of hugging it.
            undersea_height * 2.0 - sea
        } else {
            let fraction_above_sea = (undersea_height - sea) / (terrain_height - sea);
            sea + self.height_noise.sample(nx, nz) * terrain_height * fraction_above_sea
        };

        let surface_y = (world_height as i32).clamp(self.settings.sea_level + 1, WORLD_HEIGHT - 1);
        let beach_half = self.beach_noise.sample(nx, nz) * self.biome.beach.size;

        ColumnProfile {
            world_height,
            surface_y,
            beach_half,
        }
    }

    /// Classifies one cell of a column, from the rules in order: bedrock
    /// floor, sea water, beach band, surface top layer, biome layers down to
    /// the sentinel.
    fn classify(&self, y: i32, profile: &ColumnProfile) -> BlockType {
        if y == 0 {
            return BlockType::BEDROCK;
        }

        if y <= self.settings.sea_level && y as f32 > profile.world_height {
            return BlockType::WATER;
        }

        let sea = self.settings.sea_level as f32;
        if profile.surface_y as f32 <= sea + profile.beach_half && y as f32 > sea - profile.beach_half {
            return self.biome.beach.block;
        }

        if y == profile.surface_y {
            return self.biome.top_layer;
        }

        let mut layer_top = profile.surface_y - 1;
        for layer in &self.biome.layers {
            if layer.size < 0 {
                return layer.block;
            }
            if y > layer_top - layer.size {
                return layer.block;
            }
            layer_top -= layer.size;
        }

        // a validated biome always ends in a sentinel layer
        BlockType::STONE
    }

    /// Rolls the vegetation field for a column and queues a structure when
    /// the roll passes a threshold and the surface block matches.
    ///
    /// Big vegetation spawns above the high threshold, small vegetation
    /// below the low one; rolls between the two spawn nothing.
    fn roll_vegetation(
        &self,
        terrain: &Chunk,
        x: i32,
        z: i32,
        profile: &ColumnProfile,
        structures: &mut Vec<PendingStructure>,
    ) {
        let world_x = terrain.origin().x + x;
        let world_z = terrain.origin().y + z;
        let roll = self.vegetation_noise.sample(
            world_x as f64 / CHUNK_SIZE as f64,
            world_z as f64 / CHUNK_SIZE as f64,
        );
        let surface_block = terrain.block(x, profile.surface_y, z);
        let anchor = Point3::new(world_x, profile.surface_y + 1, world_z);

        if roll > self.settings.big_vegetation_threshold {
            if let Some(rule) = &self.biome.big_vegetation {
                if surface_block == rule.spawn_on {
                    structures.push(PendingStructure {
                        structure: rule.structure,
                        anchor,
                    });
                }
            }
        } else if roll < self.settings.small_vegetation_threshold {
            if let Some(rule) = &self.biome.small_vegetation {
                if surface_block == rule.spawn_on {
                    structures.push(PendingStructure {
                        structure: rule.structure,
                        anchor,
                    });
                }
            }
        }
    }
}
