//! End-to-end exercises of the public mutation surface: loading a ring of
//! chunks under both policies, editing, water conflict resolution and
//! eviction as the focus moves.

use std::sync::Arc;

use cgmath::{Point2, Point3};

use voxel_world::world_state::registry::BlockRegistry;
use voxel_world::world_state::settings::{LoadPolicy, WorldSettings};
use voxel_world::world_state::voxels::block::block_type::BlockType;
use voxel_world::world_state::voxels::chunk::{CHUNK_SIZE, WORLD_HEIGHT};
use voxel_world::world_state::WorldState;

fn small_settings(policy: LoadPolicy) -> WorldSettings {
    WorldSettings {
        render_distance: 2,
        load_policy: policy,
        ..WorldSettings::default()
    }
}

fn world_with(policy: LoadPolicy) -> WorldState {
    let registry = Arc::new(BlockRegistry::with_defaults().unwrap());
    WorldState::new(registry, small_settings(policy)).unwrap()
}

fn surface_of(world: &WorldState, x: i32, z: i32) -> i32 {
    (0..WORLD_HEIGHT)
        .rev()
        .find(|&y| {
            world
                .block_at(Point3::new(x, y, z))
                .is_some_and(|b| !b.is_air())
        })
        .expect("column has a surface")
}

#[test]
fn load_all_policy_fills_the_ring_in_one_call() {
    let mut world = world_with(LoadPolicy::All);

    assert!(world.load_around(Point2::new(0, 0)));
    assert_eq!(world.store().get().terrain.len(), 9);
    assert_eq!(world.store().get().water.len(), 9);

    // Every generated chunk was meshed and awaits upload.
    assert!(!world.dirty_chunks().is_empty());
}

#[test]
fn incremental_policy_converges_over_repeated_calls() {
    let mut world = world_with(LoadPolicy::Incremental);

    let mut calls = 0;
    while world.load_around(Point2::new(0, 0)) {
        calls += 1;
        assert!(calls < 200, "incremental loading failed to converge");
    }

    assert!(calls >= 9, "each chunk needs its own call, got {calls}");
    assert_eq!(world.store().get().terrain.len(), 9);
}

#[test]
fn both_policies_produce_the_same_world() {
    let mut all = world_with(LoadPolicy::All);
    let mut incremental = world_with(LoadPolicy::Incremental);

    while all.load_around(Point2::new(0, 0)) {}
    while incremental.load_around(Point2::new(0, 0)) {}

    for x in -16..32 {
        for z in -16..32 {
            for y in 0..WORLD_HEIGHT {
                let position = Point3::new(x, y, z);
                assert_eq!(all.block_at(position), incremental.block_at(position));
            }
        }
    }
}

#[test]
fn moving_the_focus_evicts_chunks_left_behind() {
    let mut world = world_with(LoadPolicy::All);

    while world.load_around(Point2::new(0, 0)) {}
    assert!(world.store().get().terrain.contains(Point2::new(-1, -1)));

    while world.load_around(Point2::new(3, 0)) {}
    let store = world.store();
    assert!(!store.get().terrain.contains(Point2::new(-1, -1)));
    assert!(!store.get().water.contains(Point2::new(-1, -1)));
    assert!(store.get().terrain.contains(Point2::new(2, 0)));
    assert_eq!(store.get().terrain.len(), 9);
}

#[test]
fn placing_solid_terrain_into_water_resolves_in_favor_of_terrain() {
    let mut world = world_with(LoadPolicy::All);
    while world.load_around(Point2::new(0, 0)) {}

    // Find a water cell inside the physics window, if this seed made any.
    let store = world.store();
    let mut water_cell = None;
    'search: for x in -CHUNK_SIZE..CHUNK_SIZE {
        for z in -CHUNK_SIZE..CHUNK_SIZE {
            for y in (0..WORLD_HEIGHT).rev() {
                if store.get().water.is_occupied(Point3::new(x, y, z)) {
                    water_cell = Some(Point3::new(x, y, z));
                    break 'search;
                }
            }
        }
    }
    drop(store);

    let Some(cell) = water_cell else {
        // Nothing to resolve on this seed; the unit tests cover the rule.
        return;
    };

    world.place_block(cell, BlockType::STONE);
    assert!(world.change_environment(Point2::new(0, 0)));
    assert!(!world.store().get().water.is_occupied(cell));
    assert_eq!(world.block_at(cell), Some(BlockType::STONE));
}

#[test]
fn edits_ripple_and_flush_settles_everything() {
    let mut world = world_with(LoadPolicy::All);
    while world.load_around(Point2::new(0, 0)) {}
    world.flush_geometry(|_| {});
    assert!(world.dirty_chunks().is_empty());

    let surface = surface_of(&world, 0, 8);
    world.place_block(Point3::new(0, surface + 1, 8), BlockType::SANDSTONE);

    let mut dirty = world.dirty_chunks();
    dirty.sort_by_key(|c| (c.x, c.y));
    assert_eq!(dirty, vec![Point2::new(-1, 0), Point2::new(0, 0)]);

    world.flush_geometry(|_| {});
    assert!(world.dirty_chunks().is_empty());
}

#[test]
fn grass_surface_edits_follow_the_soil_rules() {
    let mut world = world_with(LoadPolicy::All);
    while world.load_around(Point2::new(0, 0)) {}

    // Find a grass-topped column to exercise the grass-to-dirt correction.
    let mut grass = None;
    'search: for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let y = surface_of(&world, x, z);
            if world.block_at(Point3::new(x, y, z)) == Some(BlockType::GRASS_BLOCK) {
                grass = Some(Point3::new(x, y, z));
                break 'search;
            }
        }
    }
    let grass = grass.expect("forest chunk exposes grass somewhere");

    let above = Point3::new(grass.x, grass.y + 1, grass.z);
    assert!(world.place_block(above, BlockType::DIRT));
    assert_eq!(world.block_at(grass), Some(BlockType::DIRT));

    // Clearing the placed block and the converted soil removes any cross
    // vegetation that would have floated above them.
    assert!(world.remove_block(above));
    assert_eq!(world.block_at(above), Some(BlockType::AIR));
}
