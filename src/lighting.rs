//! GPU lighting uniform for the brain mesh surface.

use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;

/// Lighting configuration for the mesh shader.
/// NOTE: Must match WGSL struct layout exactly (48 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Primary light direction (normalized).
    pub light1_dir: [f32; 3],
    /// Primary light intensity.
    pub light1_intensity: f32,
    /// Secondary light direction (normalized).
    pub light2_dir: [f32; 3],
    /// Secondary light intensity.
    pub light2_intensity: f32,
    /// Ambient light intensity.
    pub ambient: f32,
    /// Padding for GPU alignment.
    pub _pad: [f32; 3],
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self {
            // Primary light: upper-left for directional contrast
            light1_dir: normalize([-0.3, 0.9, -0.3]),
            light1_intensity: 0.7,
            // Secondary light: upper-right-front for fill
            light2_dir: normalize([0.3, 0.6, -0.4]),
            light2_intensity: 0.3,
            ambient: 0.25,
            _pad: [0.0; 3],
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

/// GPU lighting uniform, buffer, and bind group.
pub struct Lighting {
    /// CPU copy of the lighting uniform.
    pub uniform: LightingUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout for the mesh pipeline.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over [`Self::buffer`].
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Create the lighting resources with default light placement.
    pub fn new(context: &RenderContext) -> Self {
        let uniform = LightingUniform::default();

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group = context.device.create_bind_group(
            &wgpu::BindGroupDescriptor {
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some("Lighting Bind Group"),
            },
        );

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Upload the current uniform values.
    pub fn update_gpu(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }
}
