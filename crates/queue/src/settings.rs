//! Output settings and named presets.

use serde::{Deserialize, Serialize};

use imgpress_codec::{OutputFormat, Quality};

/// Format and quality applied to a batch run.
///
/// Read once per run; changing settings mid-batch only affects entries not
/// yet started in future runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Output format requested on the settings surface
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    /// Encoder quality on the 10-100 scale
    #[serde(default)]
    pub quality: Quality,
}

impl ConversionSettings {
    /// Settings with an explicit format and quality.
    pub fn new(format: OutputFormat, quality: Quality) -> Self {
        Self { format, quality }
    }
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
            quality: Quality::default(),
        }
    }
}

fn default_format() -> OutputFormat {
    OutputFormat::WebP
}

/// A named (format, quality) pair offered as a configuration shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name, matched case-insensitively on lookup
    pub name: String,
    /// Output format the preset binds
    pub format: OutputFormat,
    /// Quality the preset binds
    pub quality: Quality,
}

impl Preset {
    /// The settings this preset stands for.
    pub fn settings(&self) -> ConversionSettings {
        ConversionSettings::new(self.format, self.quality)
    }
}

/// The presets shipped with the tool.
pub fn builtin_presets() -> Vec<Preset> {
    fn quality(value: u8) -> Quality {
        // Values are compile-time constants inside the accepted range.
        Quality::new(value).unwrap_or_default()
    }

    vec![
        Preset {
            name: "Web Optimized".into(),
            format: OutputFormat::WebP,
            quality: quality(80),
        },
        Preset {
            name: "High Quality".into(),
            format: OutputFormat::Jpeg,
            quality: quality(95),
        },
        Preset {
            name: "Mobile Friendly".into(),
            format: OutputFormat::WebP,
            quality: quality(65),
        },
    ]
}

/// Find a preset by name.
///
/// Matching ignores case and treats `-` and `_` as spaces, so
/// `web-optimized` selects "Web Optimized".
pub fn find_preset<'a>(presets: &'a [Preset], name: &str) -> Option<&'a Preset> {
    let wanted = normalize(name);
    presets.iter().find(|preset| normalize(&preset.name) == wanted)
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
