//! # Water Simulator Module
//!
//! Recomputes which cells should hold water inside a bounded window around a
//! focus chunk. The pass does two things per water cell: resolve conflicts
//! with terrain (an edit may have placed a solid block into a water cell;
//! solid wins and the water is removed) and grow one step of flood expansion
//! into empty, in-window neighbor cells. Up is never a flow direction, so
//! water cannot climb.
//!
//! All removals and additions are collected during the scan and applied
//! afterwards in one batch, which keeps the result independent of scan
//! order: a cell added by this pass can never also be removed by it.
//!
//! This is deliberately not a fluid solver. One call grows water by at most
//! one cell per direction; repeated calls as the focus moves approximate
//! spreading without pressure, flow rate or draining.

use cgmath::{Point2, Point3};
use log::debug;

use crate::world_state::voxels::block::block_side::FaceDirection;
use crate::world_state::voxels::block::block_type::BlockType;
use crate::world_state::voxels::chunk::{chunk_coord, CHUNK_SIZE, WORLD_HEIGHT};
use crate::world_state::voxels::chunk_store::ChunkStore;

/// One-step bounded flood expansion over the water chunk collection.
pub struct WaterSimulator {
    physics_distance: i32,
}

impl WaterSimulator {
    /// Creates a simulator scanning `physics_distance` chunks around the
    /// focus in each direction.
    pub fn new(physics_distance: i32) -> Self {
        WaterSimulator { physics_distance }
    }

    /// Runs one simulation pass around `focus`.
    ///
    /// Returns the coordinates of every water chunk whose cells changed,
    /// each exactly once, so the caller can re-mesh them without duplicates.
    /// An empty result means the environment was already settled.
    pub fn change_environment(&self, focus: Point2<i32>, store: &mut ChunkStore) -> Vec<Point2<i32>> {
        let min_x = (focus.x - self.physics_distance) * CHUNK_SIZE;
        let max_x = (focus.x + self.physics_distance) * CHUNK_SIZE;
        let min_z = (focus.y - self.physics_distance) * CHUNK_SIZE;
        let max_z = (focus.y + self.physics_distance) * CHUNK_SIZE;

        let mut new_cells: Vec<Point3<i32>> = Vec::new();
        let mut removed_cells: Vec<Point3<i32>> = Vec::new();

        for x in min_x..max_x {
            for z in min_z..max_z {
                for y in (0..WORLD_HEIGHT).rev() {
                    let position = Point3::new(x, y, z);

                    if !store.water.is_occupied(position) {
                        continue;
                    }

                    // An edit put a solid block where water stood: the solid
                    // terrain wins and the water cell is cleared.
                    if store.terrain.is_occupied(position) {
                        removed_cells.push(position);
                        continue;
                    }

                    for direction in FaceDirection::non_up() {
                        let neighbor = position + direction.offset();

                        if neighbor.x < min_x
                            || neighbor.x >= max_x
                            || neighbor.z < min_z
                            || neighbor.z >= max_z
                            || neighbor.y < 0
                        {
                            continue;
                        }
                        if store.water.is_occupied(neighbor) {
                            continue;
                        }
                        if store.terrain.is_occupied(neighbor) {
                            continue;
                        }

                        new_cells.push(neighbor);
                    }
                }
            }
        }

        let mut touched: Vec<Point2<i32>> = Vec::new();

        for position in &new_cells {
            if store
                .water
                .set_block_at(position.x, position.y, position.z, BlockType::WATER)
            {
                touch(&mut touched, *position);
            }
        }
        for position in &removed_cells {
            if store
                .water
                .set_block_at(position.x, position.y, position.z, BlockType::AIR)
            {
                touch(&mut touched, *position);
            }
        }

        if !touched.is_empty() {
            debug!(
                "water pass around ({}, {}): +{} cells, -{} cells, {} chunks touched",
                focus.x,
                focus.y,
                new_cells.len(),
                removed_cells.len(),
                touched.len()
            );
        }

        touched
    }
}

/// Records the water chunk owning `position`, once.
fn touch(touched: &mut Vec<Point2<i32>>, position: Point3<i32>) {
    let coord = Point2::new(chunk_coord(position.x), chunk_coord(position.z));
    if !touched.contains(&coord) {
        touched.push(coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_state::voxels::chunk::Chunk;

    fn store_with_origin_chunks() -> ChunkStore {
        let mut store = ChunkStore::new();
        for x in -1..=0 {
            for z in -1..=0 {
                store.terrain.insert(Chunk::new(Point2::new(x, z)));
                store.water.insert(Chunk::new(Point2::new(x, z)));
            }
        }
        store
    }

    #[test]
    fn test_lone_water_cell_spreads_everywhere_but_up() {
        let mut store = store_with_origin_chunks();
        store.water.set_block_at(5, 10, 5, BlockType::WATER);

        let simulator = WaterSimulator::new(1);
        let touched = simulator.change_environment(Point2::new(0, 0), &mut store);

        assert_eq!(touched, vec![Point2::new(0, 0)]);
        for direction in FaceDirection::non_up() {
            let neighbor = Point3::new(5, 10, 5) + direction.offset();
            assert!(store.water.is_occupied(neighbor), "no water at {neighbor:?}");
        }
        assert!(!store.water.is_occupied(Point3::new(5, 11, 5)));
        // The source cell itself is untouched.
        assert!(store.water.is_occupied(Point3::new(5, 10, 5)));
    }

    #[test]
    fn test_solid_neighbors_block_the_spread() {
        let mut store = store_with_origin_chunks();
        store.water.set_block_at(5, 10, 5, BlockType::WATER);
        for direction in FaceDirection::non_up() {
            let neighbor = Point3::new(5, 10, 5) + direction.offset();
            store
                .terrain
                .set_block_at(neighbor.x, neighbor.y, neighbor.z, BlockType::STONE);
        }

        let simulator = WaterSimulator::new(1);
        let touched = simulator.change_environment(Point2::new(0, 0), &mut store);
        assert!(touched.is_empty());
    }

    #[test]
    fn test_conflicting_solid_removes_the_water_cell() {
        let mut store = store_with_origin_chunks();
        // Box the water in so the pass has nothing to add either.
        store.water.set_block_at(5, 10, 5, BlockType::WATER);
        for direction in FaceDirection::non_up() {
            let neighbor = Point3::new(5, 10, 5) + direction.offset();
            store
                .terrain
                .set_block_at(neighbor.x, neighbor.y, neighbor.z, BlockType::STONE);
        }
        store.terrain.set_block_at(5, 10, 5, BlockType::DIRT);

        let simulator = WaterSimulator::new(1);
        let touched = simulator.change_environment(Point2::new(0, 0), &mut store);

        assert_eq!(touched, vec![Point2::new(0, 0)]);
        assert!(!store.water.is_occupied(Point3::new(5, 10, 5)));
        assert!(store.terrain.is_occupied(Point3::new(5, 10, 5)));
    }

    #[test]
    fn test_spread_never_crosses_the_window_boundary() {
        let mut store = store_with_origin_chunks();
        // Chunk (1, 0) is loaded but lies outside the scan window, which
        // spans [-16, 16) on both axes around focus (0, 0).
        store.terrain.insert(Chunk::new(Point2::new(1, 0)));
        store.water.insert(Chunk::new(Point2::new(1, 0)));
        store.water.set_block_at(15, 10, 8, BlockType::WATER);

        let simulator = WaterSimulator::new(1);
        simulator.change_environment(Point2::new(0, 0), &mut store);

        assert!(store.water.is_occupied(Point3::new(14, 10, 8)));
        assert!(!store.water.is_occupied(Point3::new(16, 10, 8)));
    }

    #[test]
    fn test_one_call_adds_and_removes_disjoint_cells() {
        let mut store = store_with_origin_chunks();
        store.water.set_block_at(5, 10, 5, BlockType::WATER);
        store.terrain.set_block_at(5, 10, 5, BlockType::STONE);
        store.water.set_block_at(8, 20, 8, BlockType::WATER);

        let simulator = WaterSimulator::new(1);
        simulator.change_environment(Point2::new(0, 0), &mut store);

        // The conflicted cell went away; cells grown this pass stayed.
        assert!(!store.water.is_occupied(Point3::new(5, 10, 5)));
        assert!(store.water.is_occupied(Point3::new(8, 19, 8)));
        assert!(store.water.is_occupied(Point3::new(7, 20, 8)));
    }

    #[test]
    fn test_settled_water_reports_no_change() {
        let mut store = store_with_origin_chunks();
        let simulator = WaterSimulator::new(1);
        assert!(simulator
            .change_environment(Point2::new(0, 0), &mut store)
            .is_empty());
    }
}
