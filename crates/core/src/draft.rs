//! Edit panel form state.
//!
//! A draft is copied out of the live [`NetworkState`] when the panel opens
//! and only becomes live again through [`EditDraft::apply`]. Closing the panel
//! simply drops the draft.

use crate::color::{ColorMap, Rgb};
use crate::layer::Layer;
use crate::params::{FontChoice, VisualParams};
use crate::state::NetworkState;

/// Default name of a freshly added layer row.
pub const NEW_LAYER_NAME: &str = "New Layer";
/// Default name of a freshly added legend row.
pub const NEW_TYPE_NAME: &str = "NewType";

/// One row of the layer table. Dimensions are kept as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRow {
    /// Layer name.
    pub name: String,
    /// Height field.
    pub h: String,
    /// Width field.
    pub w: String,
    /// Channels field.
    pub c: String,
    /// Color picker value.
    pub color: Rgb,
}

/// One row of the legend table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRow {
    /// Type name.
    pub name: String,
    /// Color picker value.
    pub color: Rgb,
}

/// Uncommitted contents of the edit panel.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    /// Layer table rows in order.
    pub layers: Vec<LayerRow>,
    /// Legend table rows in order.
    pub types: Vec<TypeRow>,
    /// Label distance slider.
    pub label_distance: f32,
    /// Cube gap slider.
    pub gap: f32,
    /// Font size slider.
    pub label_font_size: f32,
    /// Block opacity slider.
    pub block_opacity: f32,
    /// Height multiplier slider.
    pub height_multiplier: f32,
    /// Width multiplier slider.
    pub width_multiplier: f32,
    /// Channel multiplier slider.
    pub channel_multiplier: f32,
    /// Label border checkbox.
    pub show_label_box: bool,
    legend_snapshot: ColorMap,
}

impl EditDraft {
    /// Populate every control from the live state.
    pub fn open(state: &NetworkState) -> Self {
        let params = &state.params;
        Self {
            layers: state
                .layers
                .iter()
                .map(|layer| LayerRow::from_layer(layer, &state.legend))
                .collect(),
            types: state
                .legend
                .iter()
                .map(|entry| TypeRow {
                    name: entry.name.clone(),
                    color: entry.color,
                })
                .collect(),
            label_distance: params.label_distance,
            gap: params.gap,
            label_font_size: params.label_font_size as f32,
            block_opacity: params.block_opacity,
            height_multiplier: params.height_multiplier,
            width_multiplier: params.width_multiplier,
            channel_multiplier: params.channel_multiplier,
            show_label_box: params.show_label_box,
            legend_snapshot: state.legend.clone(),
        }
    }

    /// Append a 1x1x1 layer colored by the legend that was live on open.
    pub fn add_layer_row(&mut self) {
        let layer = Layer::new(NEW_LAYER_NAME, 1, 1, 1);
        self.layers
            .push(LayerRow::from_layer(&layer, &self.legend_snapshot));
    }

    /// Append a gray legend entry.
    pub fn add_type_row(&mut self) {
        self.types.push(TypeRow {
            name: NEW_TYPE_NAME.to_string(),
            color: Rgb::FALLBACK,
        });
    }

    /// Drop a layer row; out-of-range indices are ignored.
    pub fn remove_layer_row(&mut self, index: usize) {
        if index < self.layers.len() {
            self.layers.remove(index);
        }
    }

    /// Drop a legend row; out-of-range indices are ignored.
    pub fn remove_type_row(&mut self, index: usize) {
        if index < self.types.len() {
            self.types.remove(index);
        }
    }

    /// Build the next live state from the form.
    ///
    /// The legend is rebuilt first. Every layer comes back with its row color
    /// set explicitly, so later legend edits no longer recolor it.
    pub fn apply(&self, previous: &NetworkState) -> NetworkState {
        let legend: ColorMap = self
            .types
            .iter()
            .map(|row| (row.name.clone(), row.color))
            .collect();

        let params = VisualParams {
            label_distance: nonzero_or(self.label_distance, VisualParams::DEFAULT_LABEL_DISTANCE),
            gap: nonzero_or(self.gap, VisualParams::DEFAULT_GAP),
            label_font_size: positive_int_or(
                self.label_font_size.trunc(),
                VisualParams::DEFAULT_FONT_SIZE,
            ),
            block_opacity: if self.block_opacity.is_finite() {
                self.block_opacity
            } else {
                previous.params.block_opacity
            },
            show_label_box: self.show_label_box,
            height_multiplier: nonzero_or(
                self.height_multiplier,
                VisualParams::DEFAULT_MULTIPLIER,
            ),
            width_multiplier: nonzero_or(self.width_multiplier, VisualParams::DEFAULT_MULTIPLIER),
            channel_multiplier: nonzero_or(
                self.channel_multiplier,
                VisualParams::DEFAULT_MULTIPLIER,
            ),
            show_name_labels: previous.params.show_name_labels,
            font: previous.params.font,
        };

        let layers = self.layers.iter().map(LayerRow::to_layer).collect();

        NetworkState {
            layers,
            legend,
            params,
        }
    }
}

impl LayerRow {
    /// Row showing `layer` with its effective color.
    pub fn from_layer(layer: &Layer, legend: &ColorMap) -> Self {
        Self {
            name: layer.name.clone(),
            h: layer.h.to_string(),
            w: layer.w.to_string(),
            c: layer.c.to_string(),
            color: layer.resolve_color(legend),
        }
    }

    /// Parse the row; bad or zero dimensions become 1.
    pub fn to_layer(&self) -> Layer {
        Layer {
            name: self.name.clone(),
            h: parse_dimension(&self.h),
            w: parse_dimension(&self.w),
            c: parse_dimension(&self.c),
            color: Some(self.color),
        }
    }
}

/// Parse a dimension field the way a browser number input reads it:
/// leading whitespace, an optional sign, then the longest run of digits.
/// Zero, negative or missing values fall back to 1.
pub fn parse_dimension(input: &str) -> u32 {
    match leading_integer(input) {
        Some(value) if value > 0 => u32::try_from(value).unwrap_or(u32::MAX),
        _ => 1,
    }
}

fn nonzero_or(value: f32, default: f32) -> f32 {
    if value.is_finite() && value != 0.0 {
        value
    } else {
        default
    }
}

fn positive_int_or(value: f32, default: u32) -> u32 {
    if value.is_finite() && value >= 1.0 {
        value as u32
    } else {
        default
    }
}

fn leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * magnitude)
}

/// Slider readout for distances and multipliers.
pub fn format_one_decimal(value: f32) -> String {
    format!("{value:.1}")
}

/// Slider readout for opacity.
pub fn format_two_decimals(value: f32) -> String {
    format!("{value:.2}")
}

/// Font picker entries in display order.
pub fn font_options() -> &'static [FontChoice] {
    &FontChoice::ALL
}
