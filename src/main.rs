//! Headless world demo: generates a ring of chunks (partly on worker
//! threads), runs a few water passes, performs some edits and reports what
//! the renderer would have uploaded.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cgmath::{Point2, Point3};
use log::info;

use voxel_world::world_state::registry::BlockRegistry;
use voxel_world::world_state::settings::WorldSettings;
use voxel_world::world_state::tasks::chunk_generation_task::ChunkGenerationTask;
use voxel_world::world_state::tasks::TaskManager;
use voxel_world::world_state::voxels::block::block_type::BlockType;
use voxel_world::world_state::voxels::chunk::WORLD_HEIGHT;
use voxel_world::world_state::WorldState;

fn main() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let settings = match std::env::args().nth(1) {
        Some(path) => WorldSettings::from_json_file(&path).expect("failed to load settings"),
        None => WorldSettings::default(),
    };

    let registry = Arc::new(BlockRegistry::with_defaults().expect("default registry is valid"));
    let mut world = WorldState::new(registry, settings).expect("settings name a known biome");

    let start = Instant::now();

    // Pre-generate the inner ring on worker threads; the owner thread only
    // performs the serialized inserts.
    let mut task_manager = TaskManager::new(2);
    for x in -1..=1 {
        for z in -1..=1 {
            task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                world.generator(),
                Point2::new(x, z),
            )));
        }
    }
    while !task_manager.is_idle() {
        task_manager.process_completed_tasks(&mut world);
        task_manager.process_queued_tasks();
        std::thread::sleep(Duration::from_millis(5));
    }
    task_manager.process_completed_tasks(&mut world);

    // Fill the rest of the ring (and stamp pending structures) inline.
    let center = Point2::new(0, 0);
    while world.load_around(center) {}

    info!(
        "world ready after {:?}: {} terrain chunks loaded",
        start.elapsed(),
        world.store().get().terrain.len()
    );

    // Let the environment settle a little.
    let mut water_passes = 0;
    while world.change_environment(center) && water_passes < 4 {
        water_passes += 1;
    }
    info!("water settled after {water_passes} passes");

    // Find a surface cell in the center chunk and edit around it.
    let surface = (0..WORLD_HEIGHT)
        .rev()
        .find(|&y| {
            world
                .block_at(Point3::new(8, y, 8))
                .is_some_and(|b| !b.is_air())
        })
        .expect("column has a surface");

    world.place_block(Point3::new(8, surface + 1, 8), BlockType::SANDSTONE);
    world.remove_block(Point3::new(8, surface + 1, 8));
    info!(
        "edited around surface y = {surface}; {} chunks marked dirty",
        world.dirty_chunks().len()
    );

    let mut uploads = 0usize;
    let mut vertices = 0usize;
    let mut transparent = 0usize;
    world.flush_geometry(|upload| {
        uploads += 1;
        vertices += upload.vertices.len();
        transparent += upload.vertices.len() - upload.opaque_len;
    });

    info!("uploaded {uploads} chunk meshes: {vertices} vertices ({transparent} transparent)");
    info!(
        "collision positions for center chunk: {}",
        world.solid_positions(center).len()
    );
    info!(
        "center chunk hosts animals: {}",
        world.is_animal_chunk(center)
    );
}
