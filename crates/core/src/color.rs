//! 24-bit colors and the type-to-color legend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NetworkError;

/// Packed `0xRRGGBB` color as typed into a color picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    /// Color used when neither the layer nor the legend supplies one.
    pub const FALLBACK: Self = Self(0xAAAAAA);
    /// Outline color for box edges.
    pub const OUTLINE: Self = Self(0x000000);
    /// Color of callout and connector lines.
    pub const CALLOUT: Self = Self(0x555555);
    /// Scene background.
    pub const BACKGROUND: Self = Self(0xFFFFFF);

    /// Build from 8-bit channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Split into 8-bit channels.
    pub const fn to_rgb8(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }

    /// Parse `#rrggbb`, `rrggbb` or `0xrrggbb` (any case).
    pub fn parse_hex(input: &str) -> Result<Self, NetworkError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(NetworkError::InvalidColor(input.to_string()));
        }

        u32::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| NetworkError::InvalidColor(input.to_string()))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0 & 0xFF_FFFF)
    }

    /// Channels in linear space, ready for an sRGB render target.
    pub fn to_linear(self) -> [f32; 3] {
        let [r, g, b] = self.to_rgb8();
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Name matching done when a layer name mentions none of the legend keys.
const FALLBACK_TYPES: [(&str, &str); 6] = [
    ("input", "Input"),
    ("pool", "Pool"),
    ("conv", "Conv"),
    ("lif", "LIF"),
    ("flatten", "Flatten"),
    ("fc", "FC"),
];

/// Ordered legend mapping a layer-type name to its color.
///
/// Order is insertion order and doubles as the legend display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap {
    entries: Vec<LegendEntry>,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Type name matched against layer names.
    pub name: String,
    /// Swatch and block color.
    pub color: Rgb,
}

impl Default for ColorMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.insert("Input", Rgb(0x4285F4));
        map.insert("Pool", Rgb(0xDB4437));
        map.insert("Conv", Rgb(0xF4B400));
        map.insert("LIF", Rgb(0x0F9D58));
        map.insert("Flatten", Rgb(0xAB47BC));
        map.insert("FC", Rgb(0xFF6D00));
        map
    }
}

impl ColorMap {
    /// Legend with no entries.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or recolor `name`. An existing key keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, color: Rgb) {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.color = color,
            None => self.entries.push(LegendEntry { name, color }),
        }
    }

    /// Color registered for an exact type name.
    pub fn get(&self, name: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.color)
    }

    /// Entries in legend order.
    pub fn iter(&self) -> impl Iterator<Item = &LegendEntry> {
        self.entries.iter()
    }

    /// Number of legend entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the legend has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type name for a layer name.
    ///
    /// The first legend key contained in `layer_name` (case-insensitive) wins.
    /// Otherwise a handful of well-known layer kinds are recognized even when
    /// the legend lacks them, so the caller can still report a type.
    pub fn layer_type<'a>(&'a self, layer_name: &str) -> Option<&'a str> {
        let lower = layer_name.to_lowercase();
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| lower.contains(&entry.name.to_lowercase()))
        {
            return Some(entry.name.as_str());
        }

        FALLBACK_TYPES
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, type_name)| *type_name)
    }

    /// Legend color for a layer name, or [`Rgb::FALLBACK`].
    pub fn color_for_name(&self, layer_name: &str) -> Rgb {
        self.layer_type(layer_name)
            .and_then(|type_name| self.get(type_name))
            .unwrap_or(Rgb::FALLBACK)
    }
}

impl FromIterator<(String, Rgb)> for ColorMap {
    fn from_iter<I: IntoIterator<Item = (String, Rgb)>>(iter: I) -> Self {
        let mut map = Self::empty();
        for (name, color) in iter {
            map.insert(name, color);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_common_spellings() {
        assert_eq!(Rgb::parse_hex("#4285F4").unwrap(), Rgb(0x4285F4));
        assert_eq!(Rgb::parse_hex("4285f4").unwrap(), Rgb(0x4285F4));
        assert_eq!(Rgb::parse_hex("0xdb4437").unwrap(), Rgb(0xDB4437));
        assert_eq!(Rgb::parse_hex("  #aaaaaa ").unwrap(), Rgb::FALLBACK);
    }

    #[test]
    fn hex_parsing_rejects_garbage() {
        assert!(Rgb::parse_hex("#abc").is_err());
        assert!(Rgb::parse_hex("#gggggg").is_err());
        assert!(Rgb::parse_hex("").is_err());
        assert!(Rgb::parse_hex("#+12345").is_err());
    }

    #[test]
    fn hex_formatting_is_lowercase_and_padded() {
        assert_eq!(Rgb(0x0F9D58).to_hex(), "#0f9d58");
        assert_eq!(Rgb(0).to_hex(), "#000000");
        assert_eq!(Rgb::from_rgb8(0xAB, 0x47, 0xBC), Rgb(0xAB47BC));
        assert_eq!(Rgb(0xAB47BC).to_rgb8(), [0xAB, 0x47, 0xBC]);
    }

    #[test]
    fn linear_conversion_hits_endpoints() {
        assert_eq!(Rgb(0x000000).to_linear(), [0.0, 0.0, 0.0]);
        let white = Rgb(0xFFFFFF).to_linear();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
        let mid = Rgb(0x808080).to_linear()[0];
        assert!((mid - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn insert_keeps_position_of_existing_key() {
        let mut map = ColorMap::default();
        map.insert("Pool", Rgb(0x123456));
        let names: Vec<_> = map.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Input", "Pool", "Conv", "LIF", "Flatten", "FC"]);
        assert_eq!(map.get("Pool"), Some(Rgb(0x123456)));
    }

    #[test]
    fn layer_type_is_case_insensitive_and_ordered() {
        let map = ColorMap::default();
        assert_eq!(map.layer_type("Input (x)"), Some("Input"));
        assert_eq!(map.layer_type("self.conv1"), Some("Conv"));
        assert_eq!(map.layer_type("self.lif2"), Some("LIF"));
        assert_eq!(map.layer_type("self.fc1"), Some("FC"));
        // "Post-Conv1 Max Pool" contains both; Pool precedes Conv in the legend.
        assert_eq!(map.layer_type("Post-Conv1 Max Pool"), Some("Pool"));
        assert_eq!(map.layer_type("Dropout"), None);
    }

    #[test]
    fn fallback_types_apply_when_legend_lacks_the_key() {
        let map: ColorMap = [("Conv".to_string(), Rgb(0x010203))]
            .into_iter()
            .collect();
        assert_eq!(map.layer_type("Max Pool"), Some("Pool"));
        assert_eq!(map.color_for_name("Max Pool"), Rgb::FALLBACK);
        assert_eq!(map.color_for_name("conv3"), Rgb(0x010203));
    }

    #[test]
    fn unknown_names_fall_back_to_gray() {
        assert_eq!(ColorMap::default().color_for_name("Dropout"), Rgb::FALLBACK);
        assert_eq!(ColorMap::empty().color_for_name("Input"), Rgb::FALLBACK);
    }
}
