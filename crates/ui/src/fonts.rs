//! System font lookup for the label families.

use egui::{FontData, FontDefinitions, FontFamily, FontId};
use std::collections::BTreeMap;
use std::path::Path;

use layerstack_core::FontChoice;

/// Well-known install locations for each family, most specific first.
pub fn candidate_paths(choice: FontChoice) -> &'static [&'static str] {
    match choice {
        FontChoice::TimesNewRoman => &[
            "/usr/share/fonts/truetype/msttcorefonts/Times_New_Roman.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
            "/usr/share/fonts/liberation-serif/LiberationSerif-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
            "C:\\Windows\\Fonts\\times.ttf",
        ],
        FontChoice::Arial => &[
            "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/Library/Fonts/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ],
        FontChoice::CourierNew => &[
            "/usr/share/fonts/truetype/msttcorefonts/Courier_New.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
            "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Courier New.ttf",
            "C:\\Windows\\Fonts\\cour.ttf",
        ],
        FontChoice::Georgia => &[
            "/usr/share/fonts/truetype/msttcorefonts/Georgia.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
            "/System/Library/Fonts/Supplemental/Georgia.ttf",
            "C:\\Windows\\Fonts\\georgia.ttf",
        ],
        FontChoice::Verdana => &[
            "/usr/share/fonts/truetype/msttcorefonts/Verdana.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Verdana.ttf",
            "C:\\Windows\\Fonts\\verdana.ttf",
        ],
    }
}

/// Font files found for each [`FontChoice`].
///
/// Families without a file fall back to egui's built-in proportional or
/// monospace font, so every choice is always drawable.
#[derive(Debug, Default, Clone)]
pub struct FontRegistry {
    files: BTreeMap<&'static str, Vec<u8>>,
}

impl FontRegistry {
    /// Registry with no system fonts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Probe [`candidate_paths`] for every family.
    pub fn discover() -> Self {
        let mut registry = Self::empty();
        for choice in FontChoice::ALL {
            let found = candidate_paths(choice)
                .iter()
                .map(Path::new)
                .find(|path| path.exists());
            match found {
                Some(path) => match std::fs::read(path) {
                    Ok(bytes) => {
                        tracing::debug!(
                            family = choice.family_name(),
                            path = %path.display(),
                            "font found"
                        );
                        registry.insert(choice, bytes);
                    }
                    Err(err) => {
                        tracing::warn!(
                            family = choice.family_name(),
                            path = %path.display(),
                            %err,
                            "failed to read font"
                        );
                    }
                },
                None => {
                    tracing::debug!(
                        family = choice.family_name(),
                        "no system font, using built-in"
                    );
                }
            }
        }
        registry
    }

    /// Register font file contents for `choice`.
    pub fn insert(&mut self, choice: FontChoice, bytes: Vec<u8>) {
        self.files.insert(choice.family_name(), bytes);
    }

    /// Whether a file was registered for `choice`.
    pub fn has_file(&self, choice: FontChoice) -> bool {
        self.files.contains_key(choice.family_name())
    }

    /// egui font definitions with one named family per registered file.
    pub fn definitions(&self) -> FontDefinitions {
        let mut fonts = FontDefinitions::default();
        let fallback = fonts
            .families
            .get(&FontFamily::Proportional)
            .cloned()
            .unwrap_or_default();

        for (name, bytes) in &self.files {
            fonts
                .font_data
                .insert((*name).to_string(), FontData::from_owned(bytes.clone()));
            let mut chain = vec![(*name).to_string()];
            chain.extend(fallback.iter().cloned());
            fonts
                .families
                .insert(FontFamily::Name((*name).into()), chain);
        }
        fonts
    }

    /// Install [`FontRegistry::definitions`] into `ctx`.
    pub fn install(&self, ctx: &egui::Context) {
        ctx.set_fonts(self.definitions());
    }

    /// Family to draw `choice` with.
    pub fn family(&self, choice: FontChoice) -> FontFamily {
        if self.has_file(choice) {
            FontFamily::Name(choice.family_name().into())
        } else if choice.is_monospace() {
            FontFamily::Monospace
        } else {
            FontFamily::Proportional
        }
    }

    /// Font for `choice` at `size` points.
    pub fn font_id(&self, choice: FontChoice, size: f32) -> FontId {
        FontId::new(size, self.family(choice))
    }
}
