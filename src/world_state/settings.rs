//! # World Settings Module
//!
//! Runtime configuration of the world core, deserializable from JSON so a
//! host application can ship tuned worlds without recompiling. Every field
//! has a default; a settings file only needs to name what it overrides.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// How `load_around` spreads its work.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Generate every missing chunk in the ring, then re-mesh everything in
    /// one batch.
    All,

    /// Apply at most one visible change per call (one generated chunk or one
    /// chunk's structures), re-mesh its neighborhood and return early.
    /// Spreads the cost across frames instead of stalling on a large batch.
    Incremental,
}

/// Errors raised while loading settings from disk.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON for this schema.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable parameters of generation, simulation and loading.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// World seed; all noise fields derive from it.
    pub seed: u32,

    /// Name of the biome used for generation.
    pub biome: String,

    /// Scale factor from undersea noise to world height.
    pub terrain_height: f32,

    /// The sea surface sits at this cell height.
    pub sea_level: i32,

    /// Chunk-ring distance kept loaded around the focus; the effective
    /// radius is `render_distance - 1`.
    pub render_distance: i32,

    /// Half-width, in chunks, of the box the water simulator rescans around
    /// its focus.
    pub physics_distance: i32,

    /// How `load_around` batches its work.
    pub load_policy: LoadPolicy,

    /// Octave count of the surface height field.
    pub height_octaves: u32,
    /// Base frequency of the surface height field.
    pub height_scale: f64,

    /// Octave count of the undersea field.
    pub undersea_octaves: u32,
    /// Base frequency of the undersea field.
    pub undersea_scale: f64,

    /// Octave count of the beach width field.
    pub beach_octaves: u32,
    /// Base frequency of the beach width field.
    pub beach_scale: f64,

    /// Octave count of the vegetation field.
    pub vegetation_octaves: u32,
    /// Base frequency of the vegetation field.
    pub vegetation_scale: f64,

    /// Vegetation rolls above this value spawn big vegetation.
    pub big_vegetation_threshold: f32,

    /// Vegetation rolls below this value spawn small vegetation. Rolls
    /// between the two thresholds intentionally spawn nothing.
    pub small_vegetation_threshold: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            seed: 0,
            biome: "forest".to_string(),
            terrain_height: 128.0,
            sea_level: 62,
            render_distance: 5,
            physics_distance: 1,
            load_policy: LoadPolicy::All,
            height_octaves: 4,
            height_scale: 5.0,
            undersea_octaves: 5,
            undersea_scale: 25.0,
            beach_octaves: 2,
            beach_scale: 1.0,
            vegetation_octaves: 5,
            vegetation_scale: 0.1,
            big_vegetation_threshold: 0.7,
            small_vegetation_threshold: 0.5,
        }
    }
}

impl WorldSettings {
    /// Parses settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
