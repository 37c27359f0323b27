//! Face mesh templates.
//!
//! The base quads every block is built from, in cell-local coordinates
//! centered on the cell (each axis spanning [-0.5, 0.5]). The mesh builder
//! copies template vertices, translates them into world space and remaps
//! their UVs into the atlas.
//!
//! Quads are stored as four vertices; [`FACE_QUAD_INDICES`] triangulates a
//! quad into the two triangles (0,1,2) and (3,2,1).

use super::vertex::Vertex;

/// Index pattern turning a 4-vertex quad template into six triangle vertices.
pub const FACE_QUAD_INDICES: [usize; 6] = [0, 1, 2, 3, 2, 1];

const fn template_vertex(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Vertex {
    Vertex {
        position,
        normal,
        tex_coords,
        transparent: 0,
    }
}

/// Cube template: four vertices per face, ordered by `FaceDirection` index
/// (FORWARD, BACK, RIGHT, LEFT, UP, BOTTOM). Each quad reads top-left,
/// top-right, bottom-left, bottom-right as seen from outside the cube.
static CUBE_TEMPLATE: [Vertex; 24] = [
    // FORWARD (+z)
    template_vertex([0.5, 0.5, 0.5], [0.0, 0.0, 1.0], [0.0, 0.0]),
    template_vertex([-0.5, 0.5, 0.5], [0.0, 0.0, 1.0], [1.0, 0.0]),
    template_vertex([0.5, -0.5, 0.5], [0.0, 0.0, 1.0], [0.0, 1.0]),
    template_vertex([-0.5, -0.5, 0.5], [0.0, 0.0, 1.0], [1.0, 1.0]),
    // BACK (-z)
    template_vertex([-0.5, 0.5, -0.5], [0.0, 0.0, -1.0], [0.0, 0.0]),
    template_vertex([0.5, 0.5, -0.5], [0.0, 0.0, -1.0], [1.0, 0.0]),
    template_vertex([-0.5, -0.5, -0.5], [0.0, 0.0, -1.0], [0.0, 1.0]),
    template_vertex([0.5, -0.5, -0.5], [0.0, 0.0, -1.0], [1.0, 1.0]),
    // RIGHT (+x)
    template_vertex([0.5, 0.5, -0.5], [1.0, 0.0, 0.0], [0.0, 0.0]),
    template_vertex([0.5, 0.5, 0.5], [1.0, 0.0, 0.0], [1.0, 0.0]),
    template_vertex([0.5, -0.5, -0.5], [1.0, 0.0, 0.0], [0.0, 1.0]),
    template_vertex([0.5, -0.5, 0.5], [1.0, 0.0, 0.0], [1.0, 1.0]),
    // LEFT (-x)
    template_vertex([-0.5, 0.5, 0.5], [-1.0, 0.0, 0.0], [0.0, 0.0]),
    template_vertex([-0.5, 0.5, -0.5], [-1.0, 0.0, 0.0], [1.0, 0.0]),
    template_vertex([-0.5, -0.5, 0.5], [-1.0, 0.0, 0.0], [0.0, 1.0]),
    template_vertex([-0.5, -0.5, -0.5], [-1.0, 0.0, 0.0], [1.0, 1.0]),
    // UP (+y)
    template_vertex([-0.5, 0.5, 0.5], [0.0, 1.0, 0.0], [0.0, 0.0]),
    template_vertex([0.5, 0.5, 0.5], [0.0, 1.0, 0.0], [1.0, 0.0]),
    template_vertex([-0.5, 0.5, -0.5], [0.0, 1.0, 0.0], [0.0, 1.0]),
    template_vertex([0.5, 0.5, -0.5], [0.0, 1.0, 0.0], [1.0, 1.0]),
    // BOTTOM (-y)
    template_vertex([-0.5, -0.5, -0.5], [0.0, -1.0, 0.0], [0.0, 0.0]),
    template_vertex([0.5, -0.5, -0.5], [0.0, -1.0, 0.0], [1.0, 0.0]),
    template_vertex([-0.5, -0.5, 0.5], [0.0, -1.0, 0.0], [0.0, 1.0]),
    template_vertex([0.5, -0.5, 0.5], [0.0, -1.0, 0.0], [1.0, 1.0]),
];

/// Cross template: two diagonal quads spanning the cell.
static CROSS_TEMPLATE: [Vertex; 8] = [
    template_vertex([-0.5, 0.5, -0.5], [0.7071, 0.0, -0.7071], [0.0, 0.0]),
    template_vertex([0.5, 0.5, 0.5], [0.7071, 0.0, -0.7071], [1.0, 0.0]),
    template_vertex([-0.5, -0.5, -0.5], [0.7071, 0.0, -0.7071], [0.0, 1.0]),
    template_vertex([0.5, -0.5, 0.5], [0.7071, 0.0, -0.7071], [1.0, 1.0]),
    template_vertex([-0.5, 0.5, 0.5], [0.7071, 0.0, 0.7071], [0.0, 0.0]),
    template_vertex([0.5, 0.5, -0.5], [0.7071, 0.0, 0.7071], [1.0, 0.0]),
    template_vertex([-0.5, -0.5, 0.5], [0.7071, 0.0, 0.7071], [0.0, 1.0]),
    template_vertex([0.5, -0.5, -0.5], [0.7071, 0.0, 0.7071], [1.0, 1.0]),
];

/// Returns the cube template, four vertices per face in face-index order.
pub fn cube_template() -> &'static [Vertex] {
    &CUBE_TEMPLATE
}

/// Returns the cross template, four vertices per quad.
pub fn cross_template() -> &'static [Vertex] {
    &CROSS_TEMPLATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_template_covers_six_faces() {
        assert_eq!(cube_template().len(), 24);
    }

    #[test]
    fn test_template_positions_stay_in_cell() {
        for v in cube_template().iter().chain(cross_template()) {
            for axis in v.position {
                assert!((-0.5..=0.5).contains(&axis));
            }
        }
    }

    #[test]
    fn test_quad_uvs_span_the_unit_square() {
        for quad in cube_template().chunks(4) {
            assert_eq!(quad[0].tex_coords, [0.0, 0.0]);
            assert_eq!(quad[1].tex_coords, [1.0, 0.0]);
            assert_eq!(quad[2].tex_coords, [0.0, 1.0]);
            assert_eq!(quad[3].tex_coords, [1.0, 1.0]);
        }
    }
}
