//! Labels anchored to scene points, the legend and the edit button.

use egui::{
    Align2, Color32, Context, FontId, Id, LayerId, Pos2, Rect, RichText, Sense, Stroke, Vec2,
};

use layerstack_camera::OrbitCamera;
use layerstack_core::{ColorMap, NetworkLayout, Rgb, VisualParams};

use crate::fonts::FontRegistry;

/// Space between label text and its backing box.
const LABEL_PADDING: Vec2 = Vec2::new(4.0, 2.0);
const LABEL_BORDER: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
const OVERLAY_MARGIN: f32 = 10.0;
const SWATCH_SIZE: f32 = 14.0;

/// egui color for a 24-bit color.
pub fn to_color32(color: Rgb) -> Color32 {
    let [r, g, b] = color.to_rgb8();
    Color32::from_rgb(r, g, b)
}

/// Backing box of a label whose text measures `text_size`, centered on `center`.
pub fn label_rect(center: Pos2, text_size: Vec2) -> Rect {
    Rect::from_center_size(center, text_size + LABEL_PADDING * 2.0)
}

/// Draw every label of `layout` behind all windows.
///
/// Labels whose anchor falls outside the view are skipped.
pub fn paint_labels(
    ctx: &Context,
    layout: &NetworkLayout,
    camera: &OrbitCamera,
    params: &VisualParams,
    fonts: &FontRegistry,
) {
    let screen = ctx.screen_rect();
    let viewport = glam::Vec2::new(screen.width(), screen.height());
    let painter = ctx.layer_painter(LayerId::background());
    let font = fonts.font_id(params.font, params.label_font_size as f32);
    let stroke = if params.show_label_box {
        Stroke::new(1.0, LABEL_BORDER)
    } else {
        Stroke::NONE
    };

    for label in &layout.labels {
        let Some(point) = camera.project_to_screen(label.anchor, viewport) else {
            continue;
        };
        let center = screen.min + Vec2::new(point.x, point.y);
        let galley = painter.layout_no_wrap(label.text.clone(), font.clone(), Color32::BLACK);
        let rect = label_rect(center, galley.size());
        painter.rect(rect, 2.0, Color32::WHITE, stroke);
        painter.galley(rect.min + LABEL_PADDING, galley, Color32::BLACK);
    }
}

/// Legend in the top-left corner: one swatch and name per entry.
pub fn show_legend(ctx: &Context, legend: &ColorMap, font: FontId) {
    egui::Area::new(Id::new("legend"))
        .anchor(Align2::LEFT_TOP, Vec2::splat(OVERLAY_MARGIN))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(Color32::from_white_alpha(230))
                .stroke(Stroke::new(1.0, Color32::LIGHT_GRAY))
                .rounding(4.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    for entry in legend.iter() {
                        ui.horizontal(|ui| {
                            let (rect, _) =
                                ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::hover());
                            ui.painter()
                                .rect_filled(rect, 2.0, to_color32(entry.color));
                            ui.label(
                                RichText::new(&entry.name)
                                    .font(font.clone())
                                    .color(Color32::BLACK),
                            );
                        });
                    }
                });
        });
}

/// "Edit Network" button in the top-right corner. Returns true when clicked.
pub fn show_edit_button(ctx: &Context) -> bool {
    egui::Area::new(Id::new("edit-network-button"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-OVERLAY_MARGIN, OVERLAY_MARGIN))
        .show(ctx, |ui| ui.button("Edit Network").clicked())
        .inner
}
