//! egui layer drawn over the scene: body names at their label markers and
//! the info panel for the selected body.

use egui::{Align2, Color32, FontId, Grid, LayerId, Pos2, RichText};
use solar_render::{FrameEncoder, LabelAnchor, RenderContext, UiPainter};
use solar_sim::InfoPanel;
use winit::event::WindowEvent;
use winit::window::Window;

const LABEL_FONT_SIZE: f32 = 14.0;
const LABEL_COLOR: Color32 = Color32::from_gray(190);
/// Gap between a label's baseline and its marker, in points.
const LABEL_LIFT: f32 = 4.0;
const PANEL_MARGIN: f32 = 12.0;
const PANEL_WIDTH: f32 = 280.0;

/// Lay out one frame of UI. Label anchors are in physical pixels.
pub fn draw_ui(ctx: &egui::Context, labels: &[LabelAnchor], panel: Option<&InfoPanel>) {
    let pixels_per_point = ctx.pixels_per_point();
    let painter = ctx.layer_painter(LayerId::background());
    for label in labels {
        let pos = Pos2::new(
            label.position.x / pixels_per_point,
            label.position.y / pixels_per_point - LABEL_LIFT,
        );
        let color = if label.selected {
            Color32::WHITE
        } else {
            LABEL_COLOR
        };
        painter.text(
            pos,
            Align2::CENTER_BOTTOM,
            &label.name,
            FontId::proportional(LABEL_FONT_SIZE),
            color,
        );
    }

    if let Some(panel) = panel {
        info_window(ctx, panel);
    }
}

fn info_window(ctx: &egui::Context, panel: &InfoPanel) {
    egui::Window::new(panel.name.as_str())
        .id(egui::Id::new("info-panel"))
        .anchor(Align2::RIGHT_TOP, [-PANEL_MARGIN, PANEL_MARGIN])
        .default_width(PANEL_WIDTH)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(RichText::new(format!("{} | {}", panel.category, panel.code)).strong());
            ui.label(panel.description.as_str());
            ui.separator();
            Grid::new("info-attributes")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .striped(true)
                .show(ui, |ui| {
                    for (label, value) in &panel.attributes {
                        ui.label(format!("{label}:"));
                        ui.label(value.as_str());
                        ui.end_row();
                    }
                });
        });
}

/// egui context, winit input translation and the GPU painter.
pub struct UiOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    painter: UiPainter,
}

impl UiOverlay {
    pub fn new(window: &Window, gpu: &RenderContext) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );
        Self {
            ctx,
            state,
            painter: UiPainter::new(gpu),
        }
    }

    /// Feed a window event to egui. True when egui claimed it, e.g. a click
    /// or wheel over the info panel.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the UI for this frame and record its pass into `frame`.
    pub fn paint(
        &mut self,
        window: &Window,
        gpu: &RenderContext,
        frame: &mut FrameEncoder,
        labels: &[LabelAnchor],
        panel: Option<&InfoPanel>,
    ) {
        let input = self.state.take_egui_input(window);
        let output = self.ctx.run(input, |ctx| draw_ui(ctx, labels, panel));
        self.state
            .handle_platform_output(window, output.platform_output);
        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        self.painter.paint(
            gpu,
            frame,
            &primitives,
            &output.textures_delta,
            output.pixels_per_point,
        );
    }
}
