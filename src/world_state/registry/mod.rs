//! # Block Registry Module
//!
//! This module provides the `BlockRegistry`: the single lookup authority for
//! block definitions, biome rulesets, structure templates and face mesh
//! templates. The registry is constructed once, validated, and then passed by
//! handle (`Arc<BlockRegistry>`) into the generator, spawner and mesh
//! builder, which keeps every consumer testable against synthetic registries.
//!
//! `AIR` deliberately has no definition: a `None` from [`BlockRegistry::definition`]
//! is how all consumers recognize emptiness.

use thiserror::Error;

use cgmath::Vector3;

use crate::world_state::meshing::templates::{cross_template, cube_template};
use crate::world_state::meshing::vertex::Vertex;
use crate::world_state::voxels::block::block_type::BlockType;
use crate::world_state::voxels::block::{BlockDefinition, MeshKind};

/// One layer of a biome's vertical layering rule.
#[derive(Clone, Debug)]
pub struct BlockLayer {
    /// The block this layer is made of.
    pub block: BlockType,

    /// Layer thickness in cells. `-1` marks the sentinel layer that fills
    /// everything below the configured layers.
    pub size: i32,
}

/// The beach rule of a biome: which block forms the band around sea level,
/// and how wide that band may grow (scaled per column by a noise field).
#[derive(Clone, Debug)]
pub struct BeachRule {
    /// The block the beach band is made of.
    pub block: BlockType,

    /// Maximum half-width of the band in cells.
    pub size: f32,
}

/// A vegetation slot of a biome: which structure to stamp and which surface
/// block triggers the spawn roll.
#[derive(Clone, Debug)]
pub struct VegetationRule {
    /// Handle of the structure template to stamp.
    pub structure: StructureId,

    /// The surface block a candidate column must expose.
    pub spawn_on: BlockType,
}

/// A named generation ruleset selected per world region.
#[derive(Clone, Debug)]
pub struct Biome {
    /// Name the biome is looked up by.
    pub name: String,

    /// Ordered layers from just below the surface downward. The last entry
    /// must be a sentinel layer with `size == -1`.
    pub layers: Vec<BlockLayer>,

    /// The beach band rule.
    pub beach: BeachRule,

    /// The block exposed exactly at the surface.
    pub top_layer: BlockType,

    /// Large vegetation (trees), rolled above the high spawn threshold.
    pub big_vegetation: Option<VegetationRule>,

    /// Small vegetation (tufts, flowers), rolled below the low threshold.
    pub small_vegetation: Option<VegetationRule>,
}

/// Stable handle to a structure template inside the registry.
///
/// Handles stay valid for the registry's lifetime; nothing holds references
/// into resizable collections.
pub type StructureId = usize;

/// A fixed multi-block template stamped into the world relative to an anchor.
#[derive(Clone, Debug)]
pub struct Structure {
    /// Name used in logs.
    pub name: String,

    /// Blocks as (offset from anchor, block type) pairs.
    pub blocks: Vec<(Vector3<i32>, BlockType)>,
}

/// Errors detected while assembling or validating a registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Two biomes were registered under the same name.
    #[error("duplicate biome name: {0}")]
    DuplicateBiome(String),

    /// A biome's final layer is not the `size == -1` sentinel.
    #[error("biome {0} is missing its sentinel layer")]
    MissingSentinel(String),

    /// A biome or structure references a block without a definition.
    #[error("no definition registered for block {0:?}")]
    MissingDefinition(BlockType),

    /// A vegetation rule points at a structure handle that does not exist.
    #[error("biome {biome} references unknown structure handle {structure}")]
    UnknownStructure {
        /// The biome carrying the dangling reference.
        biome: String,
        /// The dangling handle.
        structure: StructureId,
    },

    /// A requested biome name is not registered.
    #[error("unknown biome: {0}")]
    UnknownBiome(String),
}

/// The lookup authority for block, biome and structure data.
pub struct BlockRegistry {
    definitions: Vec<Option<BlockDefinition>>,
    biomes: Vec<Biome>,
    structures: Vec<Structure>,
}

impl BlockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        BlockRegistry {
            definitions: Vec::new(),
            biomes: Vec::new(),
            structures: Vec::new(),
        }
    }

    /// Registers a block definition, replacing any previous one for the type.
    pub fn add_definition(&mut self, definition: BlockDefinition) {
        let index = definition.block_type as usize;
        if self.definitions.len() <= index {
            self.definitions.resize(index + 1, None);
        }
        self.definitions[index] = Some(definition);
    }

    /// Registers a structure template and returns its stable handle.
    pub fn add_structure(&mut self, structure: Structure) -> StructureId {
        self.structures.push(structure);
        self.structures.len() - 1
    }

    /// Registers a biome ruleset.
    pub fn add_biome(&mut self, biome: Biome) -> Result<(), RegistryError> {
        if self.biomes.iter().any(|b| b.name == biome.name) {
            return Err(RegistryError::DuplicateBiome(biome.name));
        }
        self.biomes.push(biome);
        Ok(())
    }

    /// Returns the definition of a block type.
    ///
    /// `None` for `AIR` and for types without a registered definition.
    pub fn definition(&self, block: BlockType) -> Option<&BlockDefinition> {
        self.definitions.get(block as usize)?.as_ref()
    }

    /// Returns the mesh kind of a block type, if it has a definition.
    pub fn mesh_kind(&self, block: BlockType) -> Option<MeshKind> {
        self.definition(block).map(|d| d.mesh)
    }

    /// Looks a biome up by name.
    pub fn biome(&self, name: &str) -> Option<&Biome> {
        self.biomes.iter().find(|b| b.name == name)
    }

    /// Resolves a structure handle.
    ///
    /// # Panics
    /// Panics on a dangling handle; validation rejects registries that could
    /// hand one out.
    pub fn structure(&self, id: StructureId) -> &Structure {
        &self.structures[id]
    }

    /// Returns the face template for a mesh kind: a flat list of quad
    /// vertices, four per face, in face-index order.
    pub fn face_template(&self, kind: MeshKind) -> &'static [Vertex] {
        match kind {
            MeshKind::Cube => cube_template(),
            MeshKind::Cross => cross_template(),
        }
    }

    /// Checks cross-references: sentinel layers, definitions for every block
    /// a biome or structure names, and structure handles.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for biome in &self.biomes {
            match biome.layers.last() {
                Some(layer) if layer.size == -1 => {}
                _ => return Err(RegistryError::MissingSentinel(biome.name.clone())),
            }
            for layer in &biome.layers {
                self.require_definition(layer.block)?;
            }
            self.require_definition(biome.beach.block)?;
            self.require_definition(biome.top_layer)?;
            for rule in [&biome.big_vegetation, &biome.small_vegetation].into_iter().flatten() {
                self.require_definition(rule.spawn_on)?;
                if rule.structure >= self.structures.len() {
                    return Err(RegistryError::UnknownStructure {
                        biome: biome.name.clone(),
                        structure: rule.structure,
                    });
                }
            }
        }
        for structure in &self.structures {
            for (_, block) in &structure.blocks {
                self.require_definition(*block)?;
            }
        }
        Ok(())
    }

    fn require_definition(&self, block: BlockType) -> Result<(), RegistryError> {
        match self.definition(block) {
            Some(_) => Ok(()),
            None => Err(RegistryError::MissingDefinition(block)),
        }
    }

    /// Builds the standard registry: the full block set, the oak tree and
    /// tall grass structures, and the forest and desert biomes.
    pub fn with_defaults() -> Result<Self, RegistryError> {
        let mut registry = BlockRegistry::new();

        registry.add_definition(BlockDefinition::new(BlockType::BEDROCK, MeshKind::Cube, false, -1.0));
        registry.add_definition(BlockDefinition::new(BlockType::STONE, MeshKind::Cube, false, 1.5));
        registry.add_definition(BlockDefinition::new(BlockType::DIRT, MeshKind::Cube, false, 0.5));
        registry.add_definition(BlockDefinition::new(BlockType::GRASS_BLOCK, MeshKind::Cube, false, 0.6));
        registry.add_definition(BlockDefinition::new(BlockType::SAND, MeshKind::Cube, false, 0.5));
        registry.add_definition(BlockDefinition::new(BlockType::SANDSTONE, MeshKind::Cube, false, 0.8));
        registry.add_definition(BlockDefinition::new(BlockType::WATER, MeshKind::Cube, true, -1.0));
        registry.add_definition(BlockDefinition::new(BlockType::OAK_LOG, MeshKind::Cube, false, 2.0));
        registry.add_definition(BlockDefinition::new(BlockType::OAK_LEAVES, MeshKind::Cube, true, 0.2));
        registry.add_definition(BlockDefinition::new(BlockType::TALL_GRASS, MeshKind::Cross, true, 0.0));

        let oak_tree = registry.add_structure(oak_tree_structure());
        let tall_grass = registry.add_structure(Structure {
            name: "tall_grass".to_string(),
            blocks: vec![(Vector3::new(0, 0, 0), BlockType::TALL_GRASS)],
        });

        registry.add_biome(Biome {
            name: "forest".to_string(),
            layers: vec![
                BlockLayer { block: BlockType::DIRT, size: 3 },
                BlockLayer { block: BlockType::STONE, size: -1 },
            ],
            beach: BeachRule { block: BlockType::SAND, size: 4.0 },
            top_layer: BlockType::GRASS_BLOCK,
            big_vegetation: Some(VegetationRule {
                structure: oak_tree,
                spawn_on: BlockType::GRASS_BLOCK,
            }),
            small_vegetation: Some(VegetationRule {
                structure: tall_grass,
                spawn_on: BlockType::GRASS_BLOCK,
            }),
        })?;

        registry.add_biome(Biome {
            name: "desert".to_string(),
            layers: vec![
                BlockLayer { block: BlockType::SAND, size: 3 },
                BlockLayer { block: BlockType::SANDSTONE, size: 4 },
                BlockLayer { block: BlockType::STONE, size: -1 },
            ],
            beach: BeachRule { block: BlockType::SAND, size: 6.0 },
            top_layer: BlockType::SAND,
            big_vegetation: None,
            small_vegetation: None,
        })?;

        registry.validate()?;
        Ok(registry)
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A four-block trunk with a two-tier leaf crown and a capped top.
fn oak_tree_structure() -> Structure {
    let mut blocks = Vec::new();
    for y in 0..4 {
        blocks.push((Vector3::new(0, y, 0), BlockType::OAK_LOG));
    }
    for y in 2..4 {
        for x in -1..=1 {
            for z in -1..=1 {
                if x == 0 && z == 0 {
                    continue;
                }
                blocks.push((Vector3::new(x, y, z), BlockType::OAK_LEAVES));
            }
        }
    }
    blocks.push((Vector3::new(0, 4, 0), BlockType::OAK_LEAVES));
    blocks.push((Vector3::new(1, 4, 0), BlockType::OAK_LEAVES));
    blocks.push((Vector3::new(-1, 4, 0), BlockType::OAK_LEAVES));
    blocks.push((Vector3::new(0, 4, 1), BlockType::OAK_LEAVES));
    blocks.push((Vector3::new(0, 4, -1), BlockType::OAK_LEAVES));
    Structure {
        name: "oak_tree".to_string(),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let registry = BlockRegistry::with_defaults().unwrap();
        assert!(registry.biome("forest").is_some());
        assert!(registry.biome("desert").is_some());
        assert!(registry.biome("tundra").is_none());
    }

    #[test]
    fn test_air_has_no_definition() {
        let registry = BlockRegistry::with_defaults().unwrap();
        assert!(registry.definition(BlockType::AIR).is_none());
        assert!(registry.definition(BlockType::DIRT).is_some());
    }

    #[test]
    fn test_cross_blocks_report_cross_mesh() {
        let registry = BlockRegistry::with_defaults().unwrap();
        assert_eq!(registry.mesh_kind(BlockType::TALL_GRASS), Some(MeshKind::Cross));
        assert_eq!(registry.mesh_kind(BlockType::OAK_LOG), Some(MeshKind::Cube));
    }

    #[test]
    fn test_missing_sentinel_is_rejected() {
        let mut registry = BlockRegistry::new();
        registry.add_definition(BlockDefinition::new(BlockType::DIRT, MeshKind::Cube, false, 0.5));
        registry
            .add_biome(Biome {
                name: "broken".to_string(),
                layers: vec![BlockLayer { block: BlockType::DIRT, size: 3 }],
                beach: BeachRule { block: BlockType::DIRT, size: 0.0 },
                top_layer: BlockType::DIRT,
                big_vegetation: None,
                small_vegetation: None,
            })
            .unwrap();
        assert!(matches!(registry.validate(), Err(RegistryError::MissingSentinel(_))));
    }

    #[test]
    fn test_duplicate_biome_is_rejected() {
        let mut registry = BlockRegistry::with_defaults().unwrap();
        let result = registry.add_biome(Biome {
            name: "forest".to_string(),
            layers: vec![BlockLayer { block: BlockType::STONE, size: -1 }],
            beach: BeachRule { block: BlockType::SAND, size: 0.0 },
            top_layer: BlockType::GRASS_BLOCK,
            big_vegetation: None,
            small_vegetation: None,
        });
        assert!(matches!(result, Err(RegistryError::DuplicateBiome(_))));
    }

    #[test]
    fn test_face_templates_are_quads() {
        let registry = BlockRegistry::with_defaults().unwrap();
        assert_eq!(registry.face_template(MeshKind::Cube).len(), 24);
        assert_eq!(registry.face_template(MeshKind::Cross).len(), 8);
    }
}
