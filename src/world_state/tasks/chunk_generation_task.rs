//! # Chunk Generation Task
//!
//! Off-thread chunk population. The task carries a shared handle to the
//! terrain generator and produces a fully populated chunk pair; the result
//! inserts it into the store on the owner thread and re-meshes the
//! neighborhood, so the shared collections only ever see complete chunks.

use cgmath::Point2;

use crate::world_state::generation::terrain::{GeneratedChunk, TerrainGenerator};
use crate::world_state::WorldState;

use super::{Task, TaskResult};

use std::sync::Arc;

/// A task that populates one chunk coordinate on a worker thread.
pub struct ChunkGenerationTask {
    generator: Arc<TerrainGenerator>,
    position: Point2<i32>,
}

impl ChunkGenerationTask {
    /// Creates a generation task for the given chunk coordinate.
    pub fn new(generator: Arc<TerrainGenerator>, position: Point2<i32>) -> Self {
        ChunkGenerationTask {
            generator,
            position,
        }
    }
}

impl Task for ChunkGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkGenerationTaskResult {
            generated: self.generator.generate(self.position),
        })
    }
}

/// The result of a chunk generation task: the populated chunk pair waiting
/// for its serialized insert.
pub struct ChunkGenerationTaskResult {
    generated: GeneratedChunk,
}

impl TaskResult for ChunkGenerationTaskResult {
    fn handle_result(self: Box<Self>, world: &mut WorldState) -> Vec<Box<dyn Task + Send>> {
        world.insert_generated(self.generated);
        Vec::new()
    }
}
