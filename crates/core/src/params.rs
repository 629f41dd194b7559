//! Global visual parameters.

use serde::{Deserialize, Serialize};

/// Font families offered by the font picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontChoice {
    /// Serif default.
    #[default]
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    /// Sans-serif.
    #[serde(rename = "Arial")]
    Arial,
    /// Monospace.
    #[serde(rename = "Courier New")]
    CourierNew,
    /// Serif.
    #[serde(rename = "Georgia")]
    Georgia,
    /// Sans-serif.
    #[serde(rename = "Verdana")]
    Verdana,
}

impl FontChoice {
    /// Picker order.
    pub const ALL: [FontChoice; 5] = [
        FontChoice::TimesNewRoman,
        FontChoice::Arial,
        FontChoice::CourierNew,
        FontChoice::Georgia,
        FontChoice::Verdana,
    ];

    /// Family name as shown in the picker.
    pub fn family_name(self) -> &'static str {
        match self {
            FontChoice::TimesNewRoman => "Times New Roman",
            FontChoice::Arial => "Arial",
            FontChoice::CourierNew => "Courier New",
            FontChoice::Georgia => "Georgia",
            FontChoice::Verdana => "Verdana",
        }
    }

    /// Whether the family is monospaced (used when the font file is missing).
    pub fn is_monospace(self) -> bool {
        matches!(self, FontChoice::CourierNew)
    }
}

/// Scalars controlling spacing, sizing and label appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualParams {
    /// Distance between consecutive blocks along the stack axis.
    pub gap: f32,
    /// Distance from a block face to its label anchor.
    pub label_distance: f32,
    /// Label text size in points.
    pub label_font_size: u32,
    /// Block alpha (0.0 to 1.0).
    pub block_opacity: f32,
    /// Draw a border around each label.
    pub show_label_box: bool,
    /// Draw the name label above each block.
    pub show_name_labels: bool,
    /// Scale applied to `ln(H + 1)`.
    pub height_multiplier: f32,
    /// Scale applied to `ln(W + 1)`.
    pub width_multiplier: f32,
    /// Scale applied to `ln(C + 1)`.
    pub channel_multiplier: f32,
    /// Family used by labels and the legend.
    pub font: FontChoice,
}

impl VisualParams {
    /// Default block spacing.
    pub const DEFAULT_GAP: f32 = 2.0;
    /// Default label distance.
    pub const DEFAULT_LABEL_DISTANCE: f32 = 3.0;
    /// Default label size.
    pub const DEFAULT_FONT_SIZE: u32 = 12;
    /// Default block alpha.
    pub const DEFAULT_OPACITY: f32 = 0.85;
    /// Default value of each dimension multiplier.
    pub const DEFAULT_MULTIPLIER: f32 = 1.5;

    /// Shortest callout line, reached when labels sit very close to the block.
    pub const MIN_CALLOUT: f32 = 0.1;

    /// Length of a callout line: it stops just short of the label anchor.
    pub fn callout_length(&self) -> f32 {
        (self.label_distance - 0.2).max(Self::MIN_CALLOUT)
    }
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            gap: Self::DEFAULT_GAP,
            label_distance: Self::DEFAULT_LABEL_DISTANCE,
            label_font_size: Self::DEFAULT_FONT_SIZE,
            block_opacity: Self::DEFAULT_OPACITY,
            show_label_box: true,
            show_name_labels: true,
            height_multiplier: Self::DEFAULT_MULTIPLIER,
            width_multiplier: Self::DEFAULT_MULTIPLIER,
            channel_multiplier: Self::DEFAULT_MULTIPLIER,
            font: FontChoice::default(),
        }
    }
}
