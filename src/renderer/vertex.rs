//! GPU instance types for circle rendering

use bytemuck::{Pod, Zeroable};

/// Circle style selector, matched in the fragment shader
pub const STYLE_FILL: u32 = 0;
pub const STYLE_STROKE: u32 = 1;

/// One circle to draw, expanded to a quad in the vertex shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    /// Center in surface pixel coordinates (origin top-left, y down)
    pub center: [f32; 2],
    pub radius: f32,
    /// `STYLE_FILL` or `STYLE_STROKE`
    pub style: u32,
}

impl CircleInstance {
    pub const fn new(x: f32, y: f32, radius: f32, style: u32) -> Self {
        Self {
            center: [x, y],
            radius,
            style,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}

/// Palette for the field
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    /// Initial fill before the first resize restyles the field
    pub const FILL_BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const STROKE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Post-resize gradient stops: white, gold, orange-red
    pub const GRADIENT_TOP: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GRADIENT_MID: [f32; 4] = [1.0, 0.843, 0.0, 1.0];
    pub const GRADIENT_BOTTOM: [f32; 4] = [1.0, 0.27, 0.0, 1.0];
}
