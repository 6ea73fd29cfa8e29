//! Draw contract between the simulation and the host surface
//!
//! Entities draw themselves through `Canvas`. The host either implements it
//! directly (a 2D context) or uses `VertexCanvas` to get a triangle list it
//! can upload with `bytemuck::cast_slice`.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use vertex::{Vertex, colors};

/// Circle tessellation used by `VertexCanvas`
const CIRCLE_SEGMENTS: u32 = 24;

/// Immediate-mode drawing surface
pub trait Canvas {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: [f32; 4]);
    /// Axis-aligned rectangle from its top-left corner
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: [f32; 4]);

    /// Horizontal bar with a background and a proportional fill
    fn fill_bar(&mut self, origin: Vec2, size: Vec2, fraction: f32, back: [f32; 4], fill: [f32; 4]) {
        self.fill_rect(origin, size, back);
        let filled = Vec2::new(size.x * fraction.clamp(0.0, 1.0), size.y);
        self.fill_rect(origin, filled, fill);
    }
}

/// Canvas that tessellates every call into a triangle list
#[derive(Debug, Default)]
pub struct VertexCanvas {
    pub vertices: Vec<Vertex>,
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame's geometry
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Raw bytes for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Canvas for VertexCanvas {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.vertices
            .extend(shapes::circle(center, radius, color, CIRCLE_SEGMENTS));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: [f32; 4]) {
        let inner = (radius - width / 2.0).max(0.0);
        self.vertices.extend(shapes::ring(
            center,
            inner,
            radius + width / 2.0,
            color,
            CIRCLE_SEGMENTS,
        ));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: [f32; 4]) {
        self.vertices.extend(shapes::rect(origin, size, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_canvas_accumulates() {
        let mut canvas = VertexCanvas::new();
        canvas.fill_circle(Vec2::ZERO, 5.0, colors::PLAYER);
        assert_eq!(canvas.vertices.len(), (CIRCLE_SEGMENTS * 3) as usize);
        canvas.fill_rect(Vec2::ZERO, Vec2::new(4.0, 2.0), colors::ENEMY_BAR);
        assert_eq!(canvas.vertices.len(), (CIRCLE_SEGMENTS * 3) as usize + 6);
        assert_eq!(canvas.as_bytes().len(), canvas.vertices.len() * Vertex::STRIDE);

        canvas.fill_bar(Vec2::ZERO, Vec2::new(10.0, 2.0), 0.0, colors::ENEMY_BAR_BACK, colors::ENEMY_BAR);
        assert_eq!(canvas.vertices.len(), (CIRCLE_SEGMENTS * 3) as usize + 12);

        canvas.clear();
        assert!(canvas.vertices.is_empty());
    }
}
