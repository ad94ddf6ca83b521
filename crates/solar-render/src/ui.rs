//! Paints tessellated egui output over the finished scene.
//!
//! egui lays out the info panel and body labels; this module owns the GPU
//! side: the font atlas and other egui textures, one vertex and index
//! buffer refilled each frame, and a pass that loads the scene's color
//! target and draws each mesh inside its clip rectangle.

use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use egui::epaint::{ImageDelta, Primitive, Vertex};
use egui::{ClippedPrimitive, ImageData, TextureId, TexturesDelta};

use crate::gpu::RenderContext;
use crate::pass::{FrameEncoder, RenderPassBuilder};

const UI_SHADER: &str = r#"
struct Screen {
    size_in_points: vec2<f32>,
    _padding: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> screen: Screen;

@group(1) @binding(0)
var ui_texture: texture_2d<f32>;
@group(1) @binding(1)
var ui_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

fn unpack_color(color: u32) -> vec4<f32> {
    return vec4<f32>(
        f32(color & 255u),
        f32((color >> 8u) & 255u),
        f32((color >> 16u) & 255u),
        f32((color >> 24u) & 255u),
    ) / 255.0;
}

fn linear_from_gamma(srgb: vec3<f32>) -> vec3<f32> {
    let cutoff = srgb < vec3<f32>(0.04045);
    let lower = srgb / vec3<f32>(12.92);
    let higher = pow((srgb + vec3<f32>(0.055)) / vec3<f32>(1.055), vec3<f32>(2.4));
    return select(higher, lower, cutoff);
}

@vertex
fn vs_main(
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: u32,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(
        2.0 * position.x / screen.size_in_points.x - 1.0,
        1.0 - 2.0 * position.y / screen.size_in_points.y,
        0.0,
        1.0,
    );
    out.uv = uv;
    out.color = unpack_color(color);
    return out;
}

fn shade(in: VertexOutput) -> vec4<f32> {
    return in.color * textureSample(ui_texture, ui_sampler, in.uv);
}

// egui colors and textures are gamma encoded.
@fragment
fn fs_srgb_target(in: VertexOutput) -> @location(0) vec4<f32> {
    let gamma = shade(in);
    return vec4<f32>(linear_from_gamma(gamma.rgb), gamma.a);
}

@fragment
fn fs_linear_target(in: VertexOutput) -> @location(0) vec4<f32> {
    return shade(in);
}
"#;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Uint32];

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct ScreenUniform {
    size_in_points: [f32; 2],
    _padding: [f32; 2],
}

/// Clip rectangle in physical pixels, clamped to the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    pub fn new(clip: egui::Rect, pixels_per_point: f32, target: [u32; 2]) -> Self {
        let [target_w, target_h] = target.map(|v| v as f32);
        let min_x = (clip.min.x * pixels_per_point).round().clamp(0.0, target_w);
        let min_y = (clip.min.y * pixels_per_point).round().clamp(0.0, target_h);
        let max_x = (clip.max.x * pixels_per_point).round().clamp(min_x, target_w);
        let max_y = (clip.max.y * pixels_per_point).round().clamp(min_y, target_h);
        Self {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x) as u32,
            height: (max_y - min_y) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One indexed draw out of the frame's shared buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct UiDraw {
    pub texture: TextureId,
    pub scissor: ScissorRect,
    pub indices: Range<u32>,
    pub base_vertex: i32,
}

/// Meshes flattened into shared buffers, ready for upload.
#[derive(Debug, Default)]
pub struct UiBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub draws: Vec<UiDraw>,
}

impl UiBatch {
    /// Flatten `primitives`, dropping empty meshes and fully clipped ones.
    /// Paint callbacks are not supported and are skipped.
    pub fn build(primitives: &[ClippedPrimitive], pixels_per_point: f32, target: [u32; 2]) -> Self {
        let mut batch = Self::default();
        for primitive in primitives {
            let mesh = match &primitive.primitive {
                Primitive::Mesh(mesh) => mesh,
                Primitive::Callback(_) => {
                    log::debug!("Skipping egui paint callback");
                    continue;
                }
            };
            let scissor = ScissorRect::new(primitive.clip_rect, pixels_per_point, target);
            if mesh.indices.is_empty() || scissor.is_empty() {
                continue;
            }
            let first = batch.indices.len() as u32;
            batch.draws.push(UiDraw {
                texture: mesh.texture_id,
                scissor,
                indices: first..first + mesh.indices.len() as u32,
                base_vertex: batch.vertices.len() as i32,
            });
            batch.vertices.extend_from_slice(&mesh.vertices);
            batch.indices.extend_from_slice(&mesh.indices);
        }
        batch
    }
}

struct UiTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// GPU buffer that grows to fit whatever is uploaded.
struct GrowingBuffer {
    buffer: wgpu::Buffer,
    size: u64,
    usage: wgpu::BufferUsages,
    label: &'static str,
}

impl GrowingBuffer {
    fn new(device: &wgpu::Device, label: &'static str, usage: wgpu::BufferUsages) -> Self {
        let size = 1 << 16;
        Self {
            buffer: Self::allocate(device, label, usage, size),
            size,
            usage,
            label,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, usage: wgpu::BufferUsages, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload(&mut self, ctx: &RenderContext, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if needed > self.size {
            self.size = needed.next_power_of_two();
            self.buffer = Self::allocate(&ctx.device, self.label, self.usage, self.size);
            log::debug!("Grew {} to {} bytes", self.label, self.size);
        }
        if !bytes.is_empty() {
            ctx.queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

/// Draws egui meshes with wgpu.
pub struct UiPainter {
    pipeline: wgpu::RenderPipeline,
    screen_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<TextureId, UiTexture>,
    vertices: GrowingBuffer,
    indices: GrowingBuffer,
}

impl UiPainter {
    pub fn new(ctx: &RenderContext) -> Self {
        let device = &ctx.device;

        let screen_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ui-screen-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ui-texture-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let screen_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ui-screen"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ui-screen"),
            layout: &screen_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ui-shader"),
            source: wgpu::ShaderSource::Wgsl(UI_SHADER.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ui-pipeline"),
            bind_group_layouts: &[&screen_layout, &texture_layout],
            immediate_size: 0,
        });
        let fragment_entry = if ctx.surface_format.is_srgb() {
            "fs_srgb_target"
        } else {
            "fs_linear_target"
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ui-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ui-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pipeline,
            screen_buffer,
            screen_bind_group,
            texture_layout,
            sampler,
            textures: HashMap::new(),
            vertices: GrowingBuffer::new(device, "ui-vertices", wgpu::BufferUsages::VERTEX),
            indices: GrowingBuffer::new(device, "ui-indices", wgpu::BufferUsages::INDEX),
        }
    }

    /// Apply texture changes, then record a pass drawing `primitives` on top
    /// of whatever `frame` already holds.
    pub fn paint(
        &mut self,
        ctx: &RenderContext,
        frame: &mut FrameEncoder,
        primitives: &[ClippedPrimitive],
        textures: &TexturesDelta,
        pixels_per_point: f32,
    ) {
        for (id, delta) in &textures.set {
            self.update_texture(ctx, *id, delta);
        }

        let target = [ctx.surface_config.width, ctx.surface_config.height];
        let batch = UiBatch::build(primitives, pixels_per_point, target);
        if !batch.draws.is_empty() {
            let screen = ScreenUniform {
                size_in_points: target.map(|v| v as f32 / pixels_per_point),
                _padding: [0.0; 2],
            };
            ctx.queue
                .write_buffer(&self.screen_buffer, 0, bytemuck::bytes_of(&screen));
            self.vertices
                .upload(ctx, bytemuck::cast_slice(&batch.vertices));
            self.indices.upload(ctx, bytemuck::cast_slice(&batch.indices));

            let builder = RenderPassBuilder::new().load_existing().label("ui-pass");
            let mut pass = frame.begin_render_pass(&builder);
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.screen_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertices.buffer.slice(..));
            pass.set_index_buffer(self.indices.buffer.slice(..), wgpu::IndexFormat::Uint32);
            for draw in &batch.draws {
                let Some(texture) = self.textures.get(&draw.texture) else {
                    log::warn!("Missing UI texture {:?}", draw.texture);
                    continue;
                };
                let s = draw.scissor;
                pass.set_scissor_rect(s.x, s.y, s.width, s.height);
                pass.set_bind_group(1, &texture.bind_group, &[]);
                pass.draw_indexed(draw.indices.clone(), draw.base_vertex, 0..1);
            }
        }

        for id in &textures.free {
            self.textures.remove(id);
        }
    }

    fn update_texture(&mut self, ctx: &RenderContext, id: TextureId, delta: &ImageDelta) {
        let ImageData::Color(image) = &delta.image;
        let [width, height] = image.size.map(|v| v as u32);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let (texture, origin) = match delta.pos {
            Some([x, y]) => {
                let Some(existing) = self.textures.get(&id) else {
                    log::warn!("Partial update for unknown UI texture {id:?}");
                    return;
                };
                let origin = wgpu::Origin3d {
                    x: x as u32,
                    y: y as u32,
                    z: 0,
                };
                (existing.texture.clone(), origin)
            }
            None => {
                let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("ui-texture"),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8Unorm,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                });
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("ui-texture"),
                    layout: &self.texture_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&self.sampler),
                        },
                    ],
                });
                self.textures.insert(
                    id,
                    UiTexture {
                        texture: texture.clone(),
                        bind_group,
                    },
                );
                log::debug!("Allocated UI texture {id:?} ({width}x{height})");
                (texture, wgpu::Origin3d::ZERO)
            }
        };

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&image.pixels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
    }
}
