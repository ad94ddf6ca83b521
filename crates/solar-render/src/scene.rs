//! Per-frame scene assembly.
//!
//! [`SceneRenderer`] owns every GPU resource of the explorer and draws one
//! [`FrameInput`] snapshot: the view mode, the camera, body poses, display
//! settings and the selection. Geometry for lines and overlays is rebuilt on
//! the CPU each frame by pure functions so it can be tested without a GPU.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use solar_sim::{BodyId, BodyPose, Catalog, DisplaySettings, ViewMode};

use crate::body::{BodyInstance, BodyRenderer, LightUniform};
use crate::camera::{Camera, CameraUniform};
use crate::depth::DepthBuffer;
use crate::gpu::RenderContext;
use crate::line::{LineBatch, LinePipeline, VertexStream};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::starfield::StarfieldGenerator;

/// Selection ring radius relative to the body's visual radius.
pub const SELECTION_RING_SCALE: f32 = 1.45;

/// Height of a label marker above the body's top.
pub const LABEL_MARKER_HEIGHT: f32 = 1.2;

const ORBIT_SEGMENTS: u32 = 128;
const RING_SEGMENTS: u32 = 48;

const ORBIT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.15];
const ORBIT_SELECTED_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.45];
const DISTANCE_LINE_COLOR: [f32; 4] = [0.4, 0.6, 1.0, 0.35];
const OVERLAY_COLOR: [f32; 4] = [0.85, 0.9, 1.0, 0.9];
const OVERLAY_DIM: [f32; 4] = [0.85, 0.9, 1.0, 0.2];

/// Everything the renderer consumes for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub mode: ViewMode,
    pub camera: &'a Camera,
    pub catalog: &'a Catalog,
    /// Catalog-ordered poses. Empty outside the simulation view.
    pub poses: &'a [BodyPose],
    pub settings: DisplaySettings,
    pub selection: Option<BodyId>,
    /// Tour progress in `[0, 1]` while touring.
    pub tour_progress: Option<f64>,
    pub loading_progress: f32,
    /// Wall-clock seconds, for pulsing effects.
    pub time: f64,
}

/// Orbit rings, distance lines, selection ring and label markers.
pub fn build_scene_lines(input: &FrameInput<'_>, batch: &mut LineBatch) {
    batch.clear();
    if input.mode != ViewMode::Simulation || input.poses.is_empty() {
        return;
    }
    let settings = input.settings;
    let star = input.poses[input.catalog.star().index()].position.as_vec3();

    for ((id, body), pose) in input.catalog.iter().zip(input.poses) {
        let position = pose.position.as_vec3();
        let radius = body.radius as f32;
        let selected = input.selection == Some(id);
        let [r, g, b] = body.rgb();

        if settings.show_orbits && !body.is_star() {
            let color = if selected {
                ORBIT_SELECTED_COLOR
            } else {
                ORBIT_COLOR
            };
            batch.push_orbit(star, body.distance as f32, ORBIT_SEGMENTS, color);
        }

        if settings.show_distance_lines && !body.is_star() {
            batch.push_line(star, position, DISTANCE_LINE_COLOR);
        }

        if settings.show_labels {
            let base = position + Vec3::Y * radius;
            let top = label_top(input, position, radius);
            let alpha = if selected { 1.0 } else { 0.6 };
            let color = [r, g, b, alpha];
            batch.push_line(base, top, color);
            let tick = input.camera.right() * 0.35;
            batch.push_line(top, top + tick, color);
        }

        if selected {
            let pulse = 0.65 + 0.25 * (input.time as f32 * 3.0).sin();
            batch.push_arc(
                position,
                input.camera.right(),
                input.camera.up(),
                radius * SELECTION_RING_SCALE,
                0.0,
                TAU,
                RING_SEGMENTS,
                [1.0, 1.0, 1.0, pulse],
            );
        }
    }
}

/// Screen-space overlays: loading ring, landing prompt, tour progress bar.
///
/// Coordinates are NDC with `x` pre-multiplied by the aspect ratio.
pub fn build_overlay(input: &FrameInput<'_>, aspect: f32, batch: &mut LineBatch) {
    batch.clear();
    let t = input.time as f32;
    match input.mode {
        ViewMode::Loading => {
            let progress = input.loading_progress.clamp(0.0, 1.0);
            let start = TAU / 4.0;
            batch.push_arc(Vec3::ZERO, Vec3::X, Vec3::Y, 0.25, 0.0, TAU, 64, OVERLAY_DIM);
            if progress > 0.0 {
                let segments = ((64.0 * progress).ceil() as u32).max(1);
                batch.push_arc(
                    Vec3::ZERO,
                    Vec3::X,
                    Vec3::Y,
                    0.25,
                    start,
                    -TAU * progress,
                    segments,
                    OVERLAY_COLOR,
                );
            }
            // Spinner inside the ring.
            batch.push_arc(Vec3::ZERO, Vec3::X, Vec3::Y, 0.15, -t * 4.0, TAU / 3.0, 16, OVERLAY_COLOR);
        }
        ViewMode::Landing => {
            let pulse = 0.5 + 0.4 * (t * 2.0).sin().abs();
            let color = [OVERLAY_COLOR[0], OVERLAY_COLOR[1], OVERLAY_COLOR[2], pulse];
            batch.push_arc(Vec3::ZERO, Vec3::X, Vec3::Y, 0.2, 0.0, TAU, 64, color);
            // Play glyph.
            let a = Vec3::new(-0.06, 0.09, 0.0);
            let b = Vec3::new(-0.06, -0.09, 0.0);
            let c = Vec3::new(0.1, 0.0, 0.0);
            batch.push_line(a, b, color);
            batch.push_line(b, c, color);
            batch.push_line(c, a, color);
        }
        ViewMode::Simulation => {
            if let Some(progress) = input.tour_progress {
                let half = 0.8 * aspect;
                let y = -0.9;
                let left = Vec3::new(-half, y, 0.0);
                let right = Vec3::new(half, y, 0.0);
                batch.push_line(left, right, OVERLAY_DIM);
                let filled = left.lerp(right, progress.clamp(0.0, 1.0) as f32);
                batch.push_line(left, filled, OVERLAY_COLOR);
            }
        }
    }
}

/// Where a body's name is drawn on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    pub id: BodyId,
    pub name: String,
    /// Physical pixels from the top-left corner.
    pub position: Vec2,
    pub selected: bool,
}

fn label_top(input: &FrameInput<'_>, position: Vec3, radius: f32) -> Vec3 {
    position + Vec3::Y * (radius + LABEL_MARKER_HEIGHT)
}

/// Screen positions for body names, at the top of each label marker.
///
/// Empty unless labels are shown. Markers behind the camera or outside the
/// viewport are dropped.
pub fn label_anchors(input: &FrameInput<'_>, viewport: Vec2) -> Vec<LabelAnchor> {
    if input.mode != ViewMode::Simulation || !input.settings.show_labels {
        return Vec::new();
    }
    let view_proj = input.camera.view_projection_matrix();
    input
        .catalog
        .iter()
        .zip(input.poses)
        .filter_map(|((id, body), pose)| {
            let top = label_top(input, pose.position.as_vec3(), body.radius as f32);
            let clip = view_proj * top.extend(1.0);
            if clip.w <= 0.0 {
                return None;
            }
            let ndc = clip.truncate().truncate() / clip.w;
            if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
                return None;
            }
            Some(LabelAnchor {
                id,
                name: body.name.clone(),
                position: Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5) * viewport,
                selected: input.selection == Some(id),
            })
        })
        .collect()
}

/// Instances for every body, with the star emissive.
pub fn body_instances(input: &FrameInput<'_>) -> Vec<BodyInstance> {
    if input.mode != ViewMode::Simulation {
        return Vec::new();
    }
    input
        .catalog
        .bodies()
        .iter()
        .zip(input.poses)
        .map(|(body, pose)| BodyInstance {
            center: pose.position.as_vec3().to_array(),
            radius: body.radius as f32,
            color: body.rgb(),
            emissive: if body.is_star() { 1.0 } else { 0.0 },
            spin: pose.spin as f32,
            _padding: [0.0; 3],
        })
        .collect()
}

/// Owns the explorer's GPU resources.
pub struct SceneRenderer {
    depth: DepthBuffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    overlay_buffer: wgpu::Buffer,
    overlay_bind_group: wgpu::BindGroup,
    point_pipeline: LinePipeline,
    line_pipeline: LinePipeline,
    overlay_pipeline: LinePipeline,
    bodies: BodyRenderer,
    stars: VertexStream,
    scene_lines: VertexStream,
    overlay_lines: VertexStream,
    line_batch: LineBatch,
    overlay_batch: LineBatch,
}

impl SceneRenderer {
    pub fn new(ctx: &RenderContext, starfield: &StarfieldGenerator) -> Self {
        let device = &ctx.device;
        let format = ctx.surface_format;

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera-bgl"),
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

        let make_camera = |label: &str| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<CameraUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            (buffer, bind_group)
        };
        let (camera_buffer, camera_bind_group) = make_camera("scene-camera");
        let (overlay_buffer, overlay_bind_group) = make_camera("overlay-camera");

        let point_pipeline = LinePipeline::new(
            device,
            &camera_layout,
            format,
            wgpu::PrimitiveTopology::PointList,
            true,
            "star-pipeline",
        );
        let line_pipeline = LinePipeline::new(
            device,
            &camera_layout,
            format,
            wgpu::PrimitiveTopology::LineList,
            true,
            "scene-line-pipeline",
        );
        let overlay_pipeline = LinePipeline::new(
            device,
            &camera_layout,
            format,
            wgpu::PrimitiveTopology::LineList,
            false,
            "overlay-line-pipeline",
        );

        let bodies = BodyRenderer::new(device, format, &camera_buffer);

        let mut stars = VertexStream::new(device, "star-vertices", 1);
        stars.upload(device, &ctx.queue, &starfield.vertices());
        log::info!("Starfield uploaded ({} stars)", stars.count());

        Self {
            depth: DepthBuffer::new(device, ctx.surface_config.width, ctx.surface_config.height),
            camera_buffer,
            camera_bind_group,
            overlay_buffer,
            overlay_bind_group,
            point_pipeline,
            line_pipeline,
            overlay_pipeline,
            bodies,
            stars,
            scene_lines: VertexStream::new(device, "scene-lines", 4096),
            overlay_lines: VertexStream::new(device, "overlay-lines", 512),
            line_batch: LineBatch::new(),
            overlay_batch: LineBatch::new(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Replace the starfield, e.g. after a config reload.
    pub fn set_starfield(&mut self, ctx: &RenderContext, starfield: &StarfieldGenerator) {
        self.stars
            .upload(&ctx.device, &ctx.queue, &starfield.vertices());
    }

    /// Record the scene pass into `frame`. Clears color and depth.
    pub fn render(&mut self, ctx: &RenderContext, input: &FrameInput<'_>, frame: &mut FrameEncoder) {
        let aspect = ctx.surface_config.width as f32 / ctx.surface_config.height.max(1) as f32;

        ctx.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&input.camera.to_uniform()),
        );
        ctx.queue.write_buffer(
            &self.overlay_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::screen_space(aspect)),
        );

        build_scene_lines(input, &mut self.line_batch);
        self.scene_lines
            .upload(&ctx.device, &ctx.queue, self.line_batch.vertices());
        build_overlay(input, aspect, &mut self.overlay_batch);
        self.overlay_lines
            .upload(&ctx.device, &ctx.queue, self.overlay_batch.vertices());

        let light = LightUniform::at_origin(input.settings.ambient_light_intensity);
        self.bodies
            .update(&ctx.queue, light, &body_instances(input));

        let builder = RenderPassBuilder::new()
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");
        {
            let mut pass = frame.begin_render_pass(&builder);
            self.point_pipeline
                .draw(&mut pass, &self.camera_bind_group, &self.stars);
            self.bodies.render(&mut pass);
            self.line_pipeline
                .draw(&mut pass, &self.camera_bind_group, &self.scene_lines);
            self.overlay_pipeline
                .draw(&mut pass, &self.overlay_bind_group, &self.overlay_lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use solar_sim::Orrery;

    struct Fixture {
        catalog: Catalog,
        poses: Vec<BodyPose>,
        camera: Camera,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = Catalog::builtin().unwrap();
            let poses = Orrery::with_seed(&catalog, 1).poses(&catalog);
            Self {
                catalog,
                poses,
                camera: Camera::default(),
            }
        }

        fn input(&self, settings: DisplaySettings, selection: Option<BodyId>) -> FrameInput<'_> {
            FrameInput {
                mode: ViewMode::Simulation,
                camera: &self.camera,
                catalog: &self.catalog,
                poses: &self.poses,
                settings,
                selection,
                tour_progress: None,
                loading_progress: 1.0,
                time: 0.0,
            }
        }
    }

    fn all_off() -> DisplaySettings {
        DisplaySettings {
            show_orbits: false,
            show_labels: false,
            show_distance_lines: false,
            ..DisplaySettings::default()
        }
    }

    #[test]
    fn test_nothing_enabled_no_lines() {
        let f = Fixture::new();
        let mut batch = LineBatch::new();
        build_scene_lines(&f.input(all_off(), None), &mut batch);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_orbits_one_ring_per_planet() {
        let f = Fixture::new();
        let mut batch = LineBatch::new();
        let settings = DisplaySettings {
            show_orbits: true,
            ..all_off()
        };
        build_scene_lines(&f.input(settings, None), &mut batch);
        let planets = f.catalog.len() - 1;
        assert_eq!(batch.vertices().len(), planets * ORBIT_SEGMENTS as usize * 2);
    }

    #[test]
    fn test_distance_lines_end_at_planets() {
        let f = Fixture::new();
        let mut batch = LineBatch::new();
        let settings = DisplaySettings {
            show_distance_lines: true,
            ..all_off()
        };
        build_scene_lines(&f.input(settings, None), &mut batch);
        let ends: Vec<Vec3> = batch
            .vertices()
            .chunks(2)
            .map(|pair| Vec3::from_array(pair[1].position))
            .collect();
        assert_eq!(ends.len(), f.catalog.len() - 1);
        for (end, pose) in ends.iter().zip(&f.poses[1..]) {
            assert!((*end - pose.position.as_vec3()).length() < 1e-4);
        }
    }

    #[test]
    fn test_selection_ring_around_selected_body() {
        let f = Fixture::new();
        let mut batch = LineBatch::new();
        let earth = f.catalog.find("earth").unwrap();
        build_scene_lines(&f.input(all_off(), Some(earth)), &mut batch);
        assert_eq!(batch.vertices().len(), RING_SEGMENTS as usize * 2);
        let center = f.poses[earth.index()].position.as_vec3();
        let expected = f.catalog.get(earth).radius as f32 * SELECTION_RING_SCALE;
        for v in batch.vertices() {
            let d = (Vec3::from_array(v.position) - center).length();
            assert!((d - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_label_markers_above_bodies() {
        let f = Fixture::new();
        let mut batch = LineBatch::new();
        let settings = DisplaySettings {
            show_labels: true,
            ..all_off()
        };
        build_scene_lines(&f.input(settings, None), &mut batch);
        // Leader plus tick per body.
        assert_eq!(batch.vertices().len(), f.catalog.len() * 4);
        let sun_top = batch.vertices()[1].position;
        assert!((sun_top[1] - (2.5 + LABEL_MARKER_HEIGHT)).abs() < 1e-4);
    }

    #[test]
    fn test_star_is_emissive_instance() {
        let f = Fixture::new();
        let instances = body_instances(&f.input(DisplaySettings::default(), None));
        assert_eq!(instances.len(), f.catalog.len());
        assert_eq!(instances[0].emissive, 1.0);
        assert!(instances[1..].iter().all(|i| i.emissive == 0.0));
        assert_eq!(instances[0].center, [0.0; 3]);
    }

    #[test]
    fn test_intro_modes_draw_no_bodies() {
        let f = Fixture::new();
        let mut input = f.input(DisplaySettings::default(), None);
        input.mode = ViewMode::Loading;
        assert!(body_instances(&input).is_empty());
        let mut batch = LineBatch::new();
        build_scene_lines(&input, &mut batch);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_loading_overlay_grows_with_progress() {
        let f = Fixture::new();
        let mut input = f.input(DisplaySettings::default(), None);
        input.mode = ViewMode::Loading;
        let mut batch = LineBatch::new();

        input.loading_progress = 0.0;
        build_overlay(&input, 1.0, &mut batch);
        let empty = batch.vertices().len();

        input.loading_progress = 0.5;
        build_overlay(&input, 1.0, &mut batch);
        assert!(batch.vertices().len() > empty);
    }

    #[test]
    fn test_tour_progress_bar() {
        let f = Fixture::new();
        let mut input = f.input(DisplaySettings::default(), None);
        let mut batch = LineBatch::new();
        build_overlay(&input, 1.0, &mut batch);
        assert!(batch.is_empty());

        input.tour_progress = Some(0.5);
        build_overlay(&input, 1.0, &mut batch);
        let filled_end = Vec3::from_array(batch.vertices()[3].position);
        assert!(filled_end.x.abs() < 1e-5);
    }

    #[test]
    fn test_orbit_rings_centered_on_star() {
        let f = Fixture::new();
        let mut batch = LineBatch::new();
        let settings = DisplaySettings {
            show_orbits: true,
            ..all_off()
        };
        build_scene_lines(&f.input(settings, None), &mut batch);
        let first = Vec3::from_array(batch.vertices()[0].position);
        let mercury = f.catalog.get(f.catalog.find("mercury").unwrap());
        assert!((first.length() - mercury.distance as f32).abs() < 1e-4);
        assert_eq!(f.poses[0].position, DVec3::ZERO);
    }

    const SCREEN: Vec2 = Vec2::new(1280.0, 720.0);

    fn labels_only() -> DisplaySettings {
        DisplaySettings {
            show_labels: true,
            ..all_off()
        }
    }

    #[test]
    fn test_label_anchors_name_visible_bodies() {
        let f = Fixture::new();
        let sun = f.catalog.star();
        let anchors = label_anchors(&f.input(labels_only(), Some(sun)), SCREEN);
        assert!(!anchors.is_empty());
        for anchor in &anchors {
            assert_eq!(anchor.name, f.catalog.get(anchor.id).name);
            assert!(anchor.position.x >= 0.0 && anchor.position.x <= SCREEN.x);
            assert!(anchor.position.y >= 0.0 && anchor.position.y <= SCREEN.y);
            assert_eq!(anchor.selected, anchor.id == sun);
        }

        let sun_label = anchors.iter().find(|a| a.id == sun).unwrap();
        assert_eq!(sun_label.name, "Sun");
        assert!((sun_label.position.x - SCREEN.x / 2.0).abs() < 1e-2);
        // Marker top sits above the star's center, so above mid-screen.
        assert!(sun_label.position.y < SCREEN.y / 2.0);
    }

    #[test]
    fn test_label_anchors_follow_label_toggle() {
        let f = Fixture::new();
        assert!(label_anchors(&f.input(all_off(), None), SCREEN).is_empty());

        let mut input = f.input(labels_only(), None);
        input.mode = ViewMode::Landing;
        assert!(label_anchors(&input, SCREEN).is_empty());
    }

    #[test]
    fn test_label_anchors_drop_bodies_behind_camera() {
        let mut f = Fixture::new();
        f.camera.eye = Vec3::new(0.0, 3.0, 100.0);
        f.camera.target = Vec3::new(0.0, 3.0, 200.0);
        assert!(label_anchors(&f.input(labels_only(), None), SCREEN).is_empty());
    }
}
