//! The network edit panel.
//!
//! The panel works on an [`EditDraft`]; nothing reaches the live network until
//! "Update" is pressed, except the font picker which applies at once.

use egui::{Context, RichText, TextStyle};

use layerstack_core::{
    font_options, format_one_decimal, format_two_decimals, EditDraft, FontChoice, NetworkState,
    Rgb,
};

/// What the panel asked the viewer to do this frame.
#[derive(Debug, Default)]
pub struct PanelEvents {
    /// Replacement state after "Update".
    pub applied: Option<NetworkState>,
    /// Newly picked font.
    pub font: Option<FontChoice>,
}

/// Edit panel visibility and its draft.
#[derive(Debug, Default)]
pub struct EditPanel {
    draft: Option<EditDraft>,
}

impl EditPanel {
    /// Hidden panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the panel is shown.
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// Show the panel with a fresh draft of `state`.
    pub fn open(&mut self, state: &NetworkState) {
        self.draft = Some(EditDraft::open(state));
    }

    /// Hide the panel, discarding the draft.
    pub fn close(&mut self) {
        self.draft = None;
    }

    /// Current draft, if open.
    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    /// Apply the draft against `state` and close. `None` when closed.
    pub fn commit(&mut self, state: &NetworkState) -> Option<NetworkState> {
        let draft = self.draft.take()?;
        Some(draft.apply(state))
    }

    /// Draw the panel if open.
    pub fn show(&mut self, ctx: &Context, state: &NetworkState) -> PanelEvents {
        let mut events = PanelEvents::default();
        let Some(draft) = self.draft.as_mut() else {
            return events;
        };

        let mut update = false;
        let mut close = false;

        egui::Window::new("Edit Network")
            .collapsible(false)
            .resizable(true)
            .default_width(620.0)
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 44.0))
            .show(ctx, |ui| {
                ui.style_mut().override_text_style = Some(TextStyle::Monospace);

                ui.label(RichText::new("Layers").strong());
                layer_table(ui, draft);
                if ui.button("Add Layer").clicked() {
                    draft.add_layer_row();
                }

                ui.separator();
                ui.label(RichText::new("Legend").strong());
                type_table(ui, draft);
                if ui.button("Add Type").clicked() {
                    draft.add_type_row();
                }

                ui.separator();
                sliders(ui, draft);

                ui.separator();
                let mut font = state.params.font;
                egui::ComboBox::from_label("Font")
                    .selected_text(font.family_name())
                    .show_ui(ui, |ui| {
                        for &choice in font_options() {
                            ui.selectable_value(&mut font, choice, choice.family_name());
                        }
                    });
                if font != state.params.font {
                    events.font = Some(font);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    update = ui.button("Update").clicked();
                    close = ui.button("Close").clicked();
                });
            });

        if update {
            events.applied = self.commit(state);
        } else if close {
            self.close();
        }
        events
    }
}

fn color_button(ui: &mut egui::Ui, color: &mut Rgb) {
    let mut rgb = color.to_rgb8();
    if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
        *color = Rgb::from_rgb8(rgb[0], rgb[1], rgb[2]);
    }
}

fn layer_table(ui: &mut egui::Ui, draft: &mut EditDraft) {
    let mut remove = None;
    egui::ScrollArea::vertical()
        .id_source("layer-rows")
        .max_height(240.0)
        .show(ui, |ui| {
            egui::Grid::new("layer-grid")
                .num_columns(6)
                .striped(true)
                .show(ui, |ui| {
                    for header in ["Name", "H", "W", "C", "Color", ""] {
                        ui.label(header);
                    }
                    ui.end_row();

                    for (index, row) in draft.layers.iter_mut().enumerate() {
                        ui.add(egui::TextEdit::singleline(&mut row.name).desired_width(180.0));
                        for field in [&mut row.h, &mut row.w, &mut row.c] {
                            ui.add(egui::TextEdit::singleline(field).desired_width(56.0));
                        }
                        color_button(ui, &mut row.color);
                        if ui.button("x").on_hover_text("Remove layer").clicked() {
                            remove = Some(index);
                        }
                        ui.end_row();
                    }
                });
        });
    if let Some(index) = remove {
        draft.remove_layer_row(index);
    }
}

fn type_table(ui: &mut egui::Ui, draft: &mut EditDraft) {
    let mut remove = None;
    egui::Grid::new("type-grid")
        .num_columns(3)
        .striped(true)
        .show(ui, |ui| {
            for (index, row) in draft.types.iter_mut().enumerate() {
                ui.add(egui::TextEdit::singleline(&mut row.name).desired_width(180.0));
                color_button(ui, &mut row.color);
                if ui.button("x").on_hover_text("Remove type").clicked() {
                    remove = Some(index);
                }
                ui.end_row();
            }
        });
    if let Some(index) = remove {
        draft.remove_type_row(index);
    }
}

fn slider_row(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    step: f64,
    readout: fn(f32) -> String,
) {
    ui.label(label);
    ui.add(egui::Slider::new(value, range).step_by(step).show_value(false));
    ui.label(readout(*value));
    ui.end_row();
}

fn format_integer(value: f32) -> String {
    format!("{}", value.trunc() as i64)
}

fn sliders(ui: &mut egui::Ui, draft: &mut EditDraft) {
    egui::Grid::new("slider-grid").num_columns(3).show(ui, |ui| {
        slider_row(
            ui,
            "Label distance",
            &mut draft.label_distance,
            0.0..=10.0,
            0.1,
            format_one_decimal,
        );
        slider_row(ui, "Cube gap", &mut draft.gap, 0.0..=10.0, 0.1, format_one_decimal);
        slider_row(ui, "Font size", &mut draft.label_font_size, 6.0..=32.0, 1.0, format_integer);
        slider_row(
            ui,
            "Block opacity",
            &mut draft.block_opacity,
            0.0..=1.0,
            0.01,
            format_two_decimals,
        );
        slider_row(
            ui,
            "Height multiplier",
            &mut draft.height_multiplier,
            0.1..=5.0,
            0.1,
            format_one_decimal,
        );
        slider_row(
            ui,
            "Width multiplier",
            &mut draft.width_multiplier,
            0.1..=5.0,
            0.1,
            format_one_decimal,
        );
        slider_row(
            ui,
            "Channel multiplier",
            &mut draft.channel_multiplier,
            0.1..=5.0,
            0.1,
            format_one_decimal,
        );
    });
    ui.checkbox(&mut draft.show_label_box, "Show label border");
}
