//! Visual styles for circuit drawings
//!
//! A style is a palette plus font sizes. Built-in styles are embedded TOML
//! documents; style files use the same format and inherit every key they
//! leave out from a base style.
//!
//! ```toml
//! [metadata]
//! name = "mine"
//! base = "iqp-dark"
//!
//! [colors]
//! background = "#000000"
//!
//! [gates.hadamard]
//! fill = "#ff00ff"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::circuit::GateFamily;

/// Style used when none is named
pub const DEFAULT_STYLE: &str = "iqp";

/// Errors that can occur when loading or parsing styles
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Failed to read style file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse style TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown style '{name}' (available: {})", .available.join(", "))]
    UnknownStyle {
        name: String,
        available: Vec<String>,
    },
    #[error("unknown gate family '{0}' in style")]
    UnknownGateFamily(String),
    #[error("font size must be positive, got {0}")]
    InvalidFontSize(f64),
}

/// Fill and label colour of a gate box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateColors {
    pub fill: String,
    pub text: String,
}

/// A resolved style: every colour and size is present
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
    pub description: Option<String>,
    pub background: String,
    pub text: String,
    /// Colour of parameter and bit-index annotations
    pub subtext: String,
    pub wire: String,
    pub classical_wire: String,
    pub barrier: String,
    pub font_size: f64,
    pub subfont_size: f64,
    gates: HashMap<GateFamily, GateColors>,
}

/// TOML structure for deserializing styles; every key is optional
#[derive(Deserialize)]
struct TomlStyle {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: TomlColors,
    #[serde(default)]
    fonts: TomlFonts,
    #[serde(default)]
    gates: HashMap<String, TomlGate>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
    base: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct TomlColors {
    background: Option<String>,
    text: Option<String>,
    subtext: Option<String>,
    wire: Option<String>,
    classical_wire: Option<String>,
    barrier: Option<String>,
}

#[derive(Deserialize, Default)]
struct TomlFonts {
    size: Option<f64>,
    subsize: Option<f64>,
}

#[derive(Deserialize)]
struct TomlGate {
    fill: Option<String>,
    text: Option<String>,
}

/// Root of the built-in chain; `base = "none"` starts from neutral colours
const IQP: &str = r##"
[metadata]
name = "iqp"
description = "Light background with IBM Quantum colours"
base = "none"

[colors]
background = "#ffffff"
text = "#000000"
subtext = "#000000"
wire = "#000000"
classical-wire = "#778899"
barrier = "#bdbdbd"

[fonts]
size = 13.0
subsize = 8.0

[gates.hadamard]
fill = "#fa4d56"
text = "#000000"

[gates.pauli]
fill = "#05bab6"
text = "#000000"

[gates.clifford]
fill = "#33b1ff"
text = "#000000"

[gates.phase]
fill = "#bb8bff"
text = "#000000"

[gates.rotation]
fill = "#9f1853"
text = "#ffffff"

[gates.multi]
fill = "#9f1853"
text = "#ffffff"

[gates.swap]
fill = "#05bab6"
text = "#000000"

[gates.measure]
fill = "#a8a8a8"
text = "#000000"
"##;

const IQP_DARK: &str = r##"
[metadata]
name = "iqp-dark"
description = "Dark background with IBM Quantum colours"
base = "iqp"

[colors]
background = "#161616"
text = "#ffffff"
subtext = "#ffffff"
wire = "#bfbfbf"
classical-wire = "#bfbfbf"
barrier = "#6f6f6f"

[gates.pauli]
fill = "#08bdba"

[gates.swap]
fill = "#08bdba"

[gates.multi]
fill = "#d4bbff"
text = "#000000"

[gates.rotation]
fill = "#d4bbff"
text = "#000000"

[gates.measure]
fill = "#8d8d8d"
"##;

const BW: &str = r##"
[metadata]
name = "bw"
description = "Black lines on white, for print"
base = "iqp"

[colors]
classical-wire = "#000000"
barrier = "#d0d0d0"

[gates.hadamard]
fill = "#ffffff"

[gates.pauli]
fill = "#ffffff"

[gates.clifford]
fill = "#ffffff"

[gates.phase]
fill = "#ffffff"

[gates.rotation]
fill = "#ffffff"
text = "#000000"

[gates.multi]
fill = "#ffffff"
text = "#000000"

[gates.swap]
fill = "#ffffff"

[gates.measure]
fill = "#ffffff"
"##;

const CLIFFORD: &str = r##"
[metadata]
name = "clifford"
description = "Clifford gates in blue, everything else in purple"
base = "iqp"

[colors]
classical-wire = "#778899"

[gates.hadamard]
fill = "#6fa4ff"

[gates.pauli]
fill = "#6fa4ff"

[gates.clifford]
fill = "#6fa4ff"

[gates.phase]
fill = "#bb8bff"

[gates.rotation]
fill = "#bb8bff"
text = "#000000"

[gates.multi]
fill = "#6fa4ff"
text = "#000000"

[gates.swap]
fill = "#6fa4ff"

[gates.measure]
fill = "#a8a8a8"
"##;

const BUILTIN: &[(&str, &str)] = &[
    ("iqp", IQP),
    ("iqp-dark", IQP_DARK),
    ("bw", BW),
    ("clifford", CLIFFORD),
];

impl Style {
    /// Names of the built-in styles
    pub fn available() -> Vec<&'static str> {
        BUILTIN.iter().map(|(name, _)| *name).collect()
    }

    /// Look up a built-in style by name
    pub fn named(name: &str) -> Result<Self, StyleError> {
        let (_, content) = BUILTIN
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| StyleError::UnknownStyle {
                name: name.to_string(),
                available: Self::available().into_iter().map(String::from).collect(),
            })?;
        Self::from_str(content)
    }

    /// Load style from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StyleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load style from TOML string, filling gaps from its base style
    ///
    /// The base is `[metadata] base`, or `iqp` when not given.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StyleError> {
        let parsed: TomlStyle = toml::from_str(content)?;
        let base_name = parsed
            .metadata
            .as_ref()
            .and_then(|m| m.base.as_deref())
            .unwrap_or(DEFAULT_STYLE);
        let base = if base_name == "none" {
            Self::neutral()
        } else {
            Self::named(base_name)?
        };
        parsed.apply(base)
    }

    /// Colours for a gate family
    pub fn gate(&self, family: GateFamily) -> &GateColors {
        // every constructor fills all families
        &self.gates[&family]
    }

    /// Neutral grey palette every chain bottoms out in
    fn neutral() -> Self {
        let gates = GateFamily::all()
            .iter()
            .map(|f| {
                (
                    *f,
                    GateColors {
                        fill: "#e0e0e0".to_string(),
                        text: "#333333".to_string(),
                    },
                )
            })
            .collect();
        Style {
            name: "neutral".to_string(),
            description: None,
            background: "#ffffff".to_string(),
            text: "#333333".to_string(),
            subtext: "#666666".to_string(),
            wire: "#333333".to_string(),
            classical_wire: "#666666".to_string(),
            barrier: "#cccccc".to_string(),
            font_size: 13.0,
            subfont_size: 8.0,
            gates,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::named(DEFAULT_STYLE).expect("Built-in style should be valid TOML")
    }
}

impl TomlStyle {
    fn apply(self, base: Style) -> Result<Style, StyleError> {
        let mut style = base;

        if let Some(meta) = self.metadata {
            style.name = meta.name.unwrap_or_else(|| "custom".to_string());
            style.description = meta.description;
        } else {
            style.name = "custom".to_string();
            style.description = None;
        }

        let c = self.colors;
        override_with(&mut style.background, c.background);
        override_with(&mut style.text, c.text);
        override_with(&mut style.subtext, c.subtext);
        override_with(&mut style.wire, c.wire);
        override_with(&mut style.classical_wire, c.classical_wire);
        override_with(&mut style.barrier, c.barrier);

        for size in [self.fonts.size, self.fonts.subsize].into_iter().flatten() {
            if !(size.is_finite() && size > 0.0) {
                return Err(StyleError::InvalidFontSize(size));
            }
        }
        if let Some(size) = self.fonts.size {
            style.font_size = size;
        }
        if let Some(size) = self.fonts.subsize {
            style.subfont_size = size;
        }

        for (key, gate) in self.gates {
            let family = GateFamily::all()
                .iter()
                .find(|f| f.as_str() == key)
                .ok_or_else(|| StyleError::UnknownGateFamily(key.clone()))?;
            if let Some(colors) = style.gates.get_mut(family) {
                override_with(&mut colors.fill, gate.fill);
                override_with(&mut colors.text, gate.text);
            }
        }

        Ok(style)
    }
}

fn override_with(slot: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *slot = v;
    }
}
