//! Instanced billboard renderer for the probe point cloud.
//!
//! Each probe is a camera-facing quad shaded as a soft disc. Instance
//! attributes live in one GPU buffer per field, mirroring the CPU-side
//! structure-of-arrays, so a pass that only changed colors re-uploads
//! nothing else.

use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTexture;
use crate::resolve::{DirtyFields, PointAttributes};

/// One quad corner in billboard space.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    corner: [f32; 2],
}

/// Two triangles covering [-1, 1]².
const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex { corner: [-1.0, -1.0] },
    QuadVertex { corner: [1.0, -1.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [-1.0, -1.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [-1.0, 1.0] },
];

/// Renders the probe cloud from per-field instance buffers.
///
/// The buffers are sized once for the probe count at construction and
/// never reallocated; [`upload`](Self::upload) rewrites only the fields a
/// resolver pass marked dirty.
pub struct ProbePointRenderer {
    pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    size_buffer: wgpu::Buffer,
    hidden_buffer: wgpu::Buffer,
    dcnn_tag_buffer: wgpu::Buffer,
    instance_count: u32,
}

impl ProbePointRenderer {
    /// Allocate the instance buffers and build the pipeline, seeding the
    /// GPU state from the given attribute buffer.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        attributes: &PointAttributes,
    ) -> Self {
        let device = &context.device;

        let quad_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Probe Quad Buffer"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let instance_usage =
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST;
        let position_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Probe Position Buffer"),
                contents: bytemuck::cast_slice(attributes.positions()),
                usage: instance_usage,
            });
        let color_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Probe Color Buffer"),
                contents: bytemuck::cast_slice(attributes.colors()),
                usage: instance_usage,
            });
        let size_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Probe Size Buffer"),
                contents: bytemuck::cast_slice(attributes.sizes()),
                usage: instance_usage,
            });
        let hidden_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Probe Hidden Buffer"),
                contents: bytemuck::cast_slice(attributes.hidden_flags()),
                usage: instance_usage,
            });
        let dcnn_tag_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Probe Dcnn Tag Buffer"),
                contents: bytemuck::cast_slice(attributes.dcnn_tags()),
                usage: instance_usage,
            });

        let pipeline = Self::create_pipeline(context, camera_layout);

        #[allow(clippy::cast_possible_truncation)]
        let instance_count = attributes.positions().len() as u32;

        Self {
            pipeline,
            quad_buffer,
            position_buffer,
            color_buffer,
            size_buffer,
            hidden_buffer,
            dcnn_tag_buffer,
            instance_count,
        }
    }

    fn create_pipeline(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let shader = context.device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/probes.wgsl"
        ));

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Probe Pipeline Layout"),
                bind_group_layouts: &[camera_layout],
                immediate_size: 0,
            },
        );

        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<QuadVertex>()
                as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        };

        // One instance buffer per resolver field so dirty-flag uploads
        // stay independent.
        let position_layout = instance_field(12, &POSITION_ATTR);
        let color_layout = instance_field(12, &COLOR_ATTR);
        let size_layout = instance_field(4, &SIZE_ATTR);
        let hidden_layout = instance_field(4, &HIDDEN_ATTR);
        let tag_layout = instance_field(4, &TAG_ATTR);

        context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Probe Render Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[
                        quad_layout,
                        position_layout,
                        color_layout,
                        size_layout,
                        hidden_layout,
                        tag_layout,
                    ],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                // Translucent points blend over each other; depth is read
                // so the solid background still occludes.
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTexture::FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            },
        )
    }

    /// Re-upload exactly the instance fields the resolver touched.
    pub fn upload(
        &self,
        queue: &wgpu::Queue,
        attributes: &PointAttributes,
        dirty: DirtyFields,
    ) {
        if dirty.position {
            queue.write_buffer(
                &self.position_buffer,
                0,
                bytemuck::cast_slice(attributes.positions()),
            );
        }
        if dirty.color {
            queue.write_buffer(
                &self.color_buffer,
                0,
                bytemuck::cast_slice(attributes.colors()),
            );
        }
        if dirty.size {
            queue.write_buffer(
                &self.size_buffer,
                0,
                bytemuck::cast_slice(attributes.sizes()),
            );
        }
        if dirty.hidden {
            queue.write_buffer(
                &self.hidden_buffer,
                0,
                bytemuck::cast_slice(attributes.hidden_flags()),
            );
        }
        if dirty.dcnn_tag {
            queue.write_buffer(
                &self.dcnn_tag_buffer,
                0,
                bytemuck::cast_slice(attributes.dcnn_tags()),
            );
        }
    }

    /// Record the instanced draw into the given pass.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        if self.instance_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(2, self.color_buffer.slice(..));
        render_pass.set_vertex_buffer(3, self.size_buffer.slice(..));
        render_pass.set_vertex_buffer(4, self.hidden_buffer.slice(..));
        render_pass.set_vertex_buffer(5, self.dcnn_tag_buffer.slice(..));
        render_pass.draw(0..6, 0..self.instance_count);
    }
}

const POSITION_ATTR: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![1 => Float32x3];
const COLOR_ATTR: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![2 => Float32x3];
const SIZE_ATTR: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![3 => Float32];
const HIDDEN_ATTR: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![4 => Float32];
const TAG_ATTR: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![5 => Sint32];

const fn instance_field(
    stride: wgpu::BufferAddress,
    attributes: &[wgpu::VertexAttribute],
) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: stride,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes,
    }
}
