//! wgpu rendering for Solar Explorer: device and surface setup, the orbit
//! scene (lit body billboards, orbit rings, distance lines, label markers,
//! starfield), the intro screens and the egui overlay painter.

pub mod body;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod line;
pub mod pass;
pub mod scene;
pub mod starfield;
pub mod surface;
pub mod ui;

pub use body::{BodyInstance, BodyRenderer, LightUniform};
pub use camera::{Camera, CameraUniform};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use line::{ColorVertex, LineBatch, LinePipeline, VertexStream};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use scene::{FrameInput, LabelAnchor, SceneRenderer, label_anchors};
pub use starfield::{StarfieldGenerator, StarPoint};
pub use surface::Viewport;
pub use ui::{UiBatch, UiPainter};
