use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// `[x, y, z, r, g, b]`, used by lit static surfaces.
    PosColor,
    /// `[x, y, z, u, v]`, used by textured surfaces.
    PosUv,
}

impl VertexLayout {
    /// Number of floats per vertex.
    pub fn stride(&self) -> usize {
        match self {
            Self::PosColor => 6,
            Self::PosUv => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PosColorVertex {
    pub position: Vec3,
    pub color: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PosUvVertex {
    pub position: Vec3,
    pub uv: Vec2,
}

/// CPU-side vertex buffer of an object, drawn as a plain triangle list.
///
/// The buffer length must always be a whole number of triangles; anything else
/// would break the correspondence between buffer vertices and extracted triangles.
#[derive(Debug, Clone)]
pub struct Geometry {
    layout: VertexLayout,
    data: Vec<f32>,
    data_changed: bool,
}

impl Geometry {
    fn new(layout: VertexLayout, data: Vec<f32>) -> Self {
        let triangle_stride = 3 * layout.stride();
        assert!(
            data.len() % triangle_stride == 0,
            "{:?} vertex buffer of {} floats is not a multiple of {} (3 vertices x {} floats)",
            layout,
            data.len(),
            triangle_stride,
            layout.stride()
        );

        Self {
            layout,
            data,
            data_changed: true,
        }
    }

    pub fn new_pos_color(data: Vec<f32>) -> Self {
        Self::new(VertexLayout::PosColor, data)
    }

    pub fn new_pos_uv(data: Vec<f32>) -> Self {
        Self::new(VertexLayout::PosUv, data)
    }

    pub fn from_pos_color_vertices(vertices: &[PosColorVertex]) -> Self {
        Self::new_pos_color(bytemuck::cast_slice(vertices).to_vec())
    }

    pub fn from_pos_uv_vertices(vertices: &[PosUvVertex]) -> Self {
        Self::new_pos_uv(bytemuck::cast_slice(vertices).to_vec())
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn num_vertices(&self) -> usize {
        self.data.len() / self.layout.stride()
    }

    pub fn num_triangles(&self) -> usize {
        self.num_vertices() / 3
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn pos_color_vertices(&self) -> &[PosColorVertex] {
        assert_eq!(self.layout, VertexLayout::PosColor);
        bytemuck::cast_slice(&self.data)
    }

    pub fn pos_color_vertices_mut(&mut self) -> &mut [PosColorVertex] {
        assert_eq!(self.layout, VertexLayout::PosColor);
        bytemuck::cast_slice_mut(&mut self.data)
    }

    pub fn pos_uv_vertices(&self) -> &[PosUvVertex] {
        assert_eq!(self.layout, VertexLayout::PosUv);
        bytemuck::cast_slice(&self.data)
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        let offset = vertex * self.layout.stride();
        Vec3::from_slice(&self.data[offset..offset + 3])
    }

    /// Overwrites the color columns of a `PosColor` vertex.
    pub fn set_color(&mut self, vertex: usize, color: Vec3) {
        self.pos_color_vertices_mut()[vertex].color = color;
    }

    /// Signals that the buffer must be re-uploaded.
    pub fn notify_data_change(&mut self) {
        self.data_changed = true;
    }

    /// Reports and clears the data-changed signal; consumed by the uploader.
    pub fn take_data_changed(&mut self) -> bool {
        std::mem::replace(&mut self.data_changed, false)
    }
}
