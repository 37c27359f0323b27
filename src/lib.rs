#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A chunk-based voxel world core: procedural terrain generation,
//! incremental chunk meshing with face culling, a bounded water-propagation
//! simulator, and a deferred structure-placement queue.
//!
//! The crate produces and consumes plain data contracts. It never touches
//! graphics-API objects: the external renderer receives partitioned vertex
//! lists through [`world_state::WorldState::flush_geometry`], and the
//! external interaction layer drives edits through
//! [`world_state::WorldState::place_block`] and
//! [`world_state::WorldState::remove_block`].
//!
//! ## Key Modules
//!
//! * `core` - Concurrency primitives shared across the crate
//! * `world_state` - The chunk collections and the components operating on
//!   them: registry, generation, simulation, meshing, tasks
//!
//! ## Architecture
//!
//! The world follows a single-writer model: all mutation funnels through
//! [`world_state::WorldState`] on the owning thread, while chunk population
//! runs on worker threads (`world_state::tasks`) and hands fully populated
//! chunks back for a serialized insert. Mesh building is pure computation
//! over read views of the chunk collections.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use cgmath::Point2;
//! use voxel_world::world_state::registry::BlockRegistry;
//! use voxel_world::world_state::settings::WorldSettings;
//! use voxel_world::world_state::WorldState;
//!
//! let registry = Arc::new(BlockRegistry::with_defaults().unwrap());
//! let mut settings = WorldSettings::default();
//! settings.render_distance = 2;
//! let mut world = WorldState::new(registry, settings).unwrap();
//!
//! while world.load_around(Point2::new(0, 0)) {}
//! world.flush_geometry(|upload| {
//!     // hand upload.vertices / upload.opaque_len to the renderer
//!     assert!(upload.opaque_len <= upload.vertices.len());
//! });
//! ```

pub mod core;
pub mod world_state;

pub use world_state::WorldState;
