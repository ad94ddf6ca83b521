//! Lit sphere billboards for the star and planets.
//!
//! Each body is one camera-facing quad. The fragment shader reconstructs the
//! sphere normal, lights it from a point light at the origin plus an ambient
//! term, and bands the surface by longitude so self-rotation is visible.
//! The star is emissive and ignores lighting.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::depth::DepthBuffer;

/// Maximum number of bodies drawn per frame.
pub const MAX_BODIES: usize = 64;

const BODY_SHADER: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    right: vec4<f32>,
    up: vec4<f32>,
};

struct LightUniform {
    position: vec4<f32>,
    ambient: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(0) @binding(1) var<uniform> light: LightUniform;

struct VertexInput {
    @location(0) quad_pos: vec2<f32>,
    @location(1) center: vec3<f32>,
    @location(2) radius: f32,
    @location(3) color: vec3<f32>,
    @location(4) emissive: f32,
    @location(5) spin: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) center: vec3<f32>,
    @location(2) radius: f32,
    @location(3) color: vec3<f32>,
    @location(4) emissive: f32,
    @location(5) spin: f32,
};

@vertex
fn vs_body(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let offset = (camera.right.xyz * in.quad_pos.x + camera.up.xyz * in.quad_pos.y) * in.radius;
    out.clip_position = camera.view_proj * vec4<f32>(in.center + offset, 1.0);
    out.uv = in.quad_pos;
    out.center = in.center;
    out.radius = in.radius;
    out.color = in.color;
    out.emissive = in.emissive;
    out.spin = in.spin;
    return out;
}

@fragment
fn fs_body(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist_sq = dot(in.uv, in.uv);
    if dist_sq > 1.0 {
        discard;
    }
    let z = sqrt(1.0 - dist_sq);

    if in.emissive > 0.5 {
        let glow = 0.8 + 0.2 * z;
        return vec4<f32>(in.color * glow, 1.0);
    }

    let to_eye = normalize(camera.eye.xyz - in.center);
    let normal = normalize(camera.right.xyz * in.uv.x + camera.up.xyz * in.uv.y + to_eye * z);
    let surface = in.center + normal * in.radius;

    let to_light = normalize(light.position.xyz - surface);
    let diffuse = max(dot(normal, to_light), 0.0);

    let longitude = atan2(normal.z, normal.x) + in.spin;
    let band = 0.9 + 0.1 * sin(longitude * 5.0 + normal.y * 3.0);

    let lit = in.color * band * (light.ambient * 0.6 + diffuse);
    return vec4<f32>(min(lit, vec3<f32>(1.0)), 1.0);
}
"#;

/// Per-body instance data.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    /// 1.0 for the star, 0.0 for lit bodies.
    pub emissive: f32,
    /// Self-rotation angle in radians.
    pub spin: f32,
    pub _padding: [f32; 3],
}

impl BodyInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x3,
        2 => Float32,
        3 => Float32x3,
        4 => Float32,
        5 => Float32,
    ];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BodyInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &Self::ATTRIBUTES,
    };
}

/// Point light position and ambient level.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub ambient: f32,
    pub _padding: [f32; 3],
}

impl LightUniform {
    /// Light at the origin with the given ambient level, clamped to `[0, 1]`.
    pub fn at_origin(ambient: f32) -> Self {
        Self {
            position: [0.0, 0.0, 0.0, 1.0],
            ambient: ambient.clamp(0.0, 1.0),
            _padding: [0.0; 3],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

/// Instanced renderer for every body in the scene.
pub struct BodyRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_count: u32,
}

impl BodyRenderer {
    /// `camera_buffer` holds a [`CameraUniform`](crate::camera::CameraUniform)
    /// shared with the other scene pipelines.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_buffer: &wgpu::Buffer,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER.into()),
        });

        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("body-bgl"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_body"),
                buffers: &[QuadVertex::LAYOUT, BodyInstance::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::stencil_state(true, true)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_body"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let quad = [
            QuadVertex {
                position: [-1.0, -1.0],
            },
            QuadVertex {
                position: [1.0, -1.0],
            },
            QuadVertex {
                position: [1.0, 1.0],
            },
            QuadVertex {
                position: [-1.0, 1.0],
            },
        ];
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body-quad"),
            contents: bytemuck::cast_slice(&quad),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body-quad-indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("body-instances"),
            size: (MAX_BODIES * std::mem::size_of::<BodyInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body-light"),
            contents: bytemuck::bytes_of(&LightUniform::at_origin(0.5)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("body-bg"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        log::info!("Body renderer initialized (max {MAX_BODIES} bodies)");

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            light_buffer,
            bind_group,
            instance_count: 0,
        }
    }

    /// Upload this frame's bodies and light.
    pub fn update(&mut self, queue: &wgpu::Queue, light: LightUniform, instances: &[BodyInstance]) {
        let count = instances.len().min(MAX_BODIES);
        self.instance_count = count as u32;
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&light));
        if count > 0 {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances[..count]),
            );
        }
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..6, 0, 0..self.instance_count);
    }

    pub fn active_count(&self) -> u32 {
        self.instance_count
    }
}
