//! Vertex data for chunk geometry.
//!
//! This module defines the vertex format the mesh builder emits. The core
//! never touches graphics-API objects; the external renderer consumes these
//! vertices together with each chunk's opaque/transparent split point.

/// A single vertex of chunk geometry.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Transparency flag: u32 (4 bytes)
///
/// Total size: 36 bytes. The `#[repr(C)]` layout and the `bytemuck` traits
/// let the renderer upload vertex slices without conversion.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space.
    pub position: [f32; 3],

    /// Outward face normal.
    pub normal: [f32; 3],

    /// UV coordinates inside the texture atlas.
    pub tex_coords: [f32; 2],

    /// 1 when the vertex belongs to a transparent block, 0 otherwise.
    pub transparent: u32,
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2], transparent: bool) -> Self {
        Vertex {
            position,
            normal,
            tex_coords,
            transparent: transparent as u32,
        }
    }

    /// Returns whether this vertex belongs to a transparent block.
    pub fn is_transparent(&self) -> bool {
        self.transparent != 0
    }
}
