//! Renderer-facing frame data: camera uniforms + board surface mesh.
//! GPU upload belongs to the backend; everything here is plain CPU data.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use corelib::board::Board;
use corelib::camera::Camera;

/// Camera UBO (16-byte aligned). Column-major, upload without transpose.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            projection: camera.projection().to_cols_array_2d(),
            view: camera.view().to_cols_array_2d(),
        }
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection) * Mat4::from_cols_array_2d(&self.view)
    }
}

/// Vertex: position + display tile of the owning cell.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub tile: u32,
}

pub const VERTICES_PER_CELL: usize = 6;

/// Two CCW triangles (seen from +Z) per cell on the z = 0 plane.
pub fn board_mesh(board: &Board, cell_size: f32) -> Vec<Vertex> {
    let (size_x, size_y) = board.size();
    let mut out = Vec::with_capacity((size_x * size_y) as usize * VERTICES_PER_CELL);
    for y in 0..size_y as i32 {
        for x in 0..size_x as i32 {
            let tile = board.tile(x, y).map(|t| t.index()).unwrap_or_default();
            let (x0, y0) = (x as f32 * cell_size, y as f32 * cell_size);
            let (x1, y1) = (x0 + cell_size, y0 + cell_size);
            let v = |px: f32, py: f32| Vertex {
                pos: [px, py, 0.0],
                tile,
            };
            out.extend_from_slice(&[
                v(x0, y0),
                v(x1, y0),
                v(x1, y1),
                v(x1, y1),
                v(x0, y1),
                v(x0, y0),
            ]);
        }
    }
    out
}

/// Everything the backend needs for one frame.
pub struct FrameData {
    pub camera: CameraUniform,
    pub vertices: Vec<Vertex>,
}

impl FrameData {
    /// Capture after input has been applied, before draw calls.
    pub fn capture(camera: &Camera, board: &Board, cell_size: f32) -> Self {
        let vertices = board_mesh(board, cell_size);
        log::trace!("Frame captured: {} vertices", vertices.len());
        Self {
            camera: CameraUniform::from_camera(camera),
            vertices,
        }
    }

    #[inline]
    pub fn camera_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.camera)
    }

    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
