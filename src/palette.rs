//! Color palette support for diagram elements
//!
//! Palettes map symbolic role tokens to concrete colors so a diagram can be
//! re-themed without touching any geometry. New shapes pick their fill and
//! border from the diagram's palette; everything downstream (including the
//! border-color cascade onto connectors) works with the resolved values.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::style::Color;

/// Errors that can occur when loading or parsing palettes
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to read palette file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse palette TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A palette mapping role tokens to hex colors
#[derive(Debug, Clone)]
pub struct Palette {
    /// Optional name for the palette
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Color mappings: token name -> hex color
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing palettes
#[derive(Deserialize)]
struct TomlPalette {
    metadata: Option<TomlMetadata>,
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Default palette - light fills with dark gray borders and a blue accent
const DEFAULT_PALETTE: &str = r##"
[colors]
# Shape fills
shape-fill-1 = "#f0f0f0"
shape-fill-2 = "#e3f2fd"
shape-fill-3 = "#fff3e0"

# Shape borders
shape-border-1 = "#333333"
shape-border-2 = "#1565c0"
shape-border-3 = "#e65100"

# Connector strokes
connector-1 = "#333333"
connector-2 = "#666666"

# Text
text-1 = "#323232"
text-2 = "#666666"
"##;

impl Palette {
    /// Load palette from TOML file
    pub fn from_file(path: &Path) -> Result<Self, PaletteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load palette from TOML string
    pub fn from_str(content: &str) -> Result<Self, PaletteError> {
        let parsed: TomlPalette = toml::from_str(content)?;

        Ok(Palette {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
        })
    }

    /// Resolve a role token to a hex color string
    ///
    /// Returns None if the token is not defined in this palette.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a role token with fallback to the default palette
    ///
    /// Fallback order:
    /// 1. Check this palette for the exact token
    /// 2. Check the default palette for the exact token
    /// 3. Use the category default (shape-fill → #f0f0f0, etc.)
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }

        let default = Self::default();
        if let Some(color) = default.resolve(token) {
            return color.to_string();
        }

        if token.starts_with("shape-fill") {
            return "#f0f0f0".to_string();
        }
        if token.starts_with("shape-border") {
            return "#333333".to_string();
        }
        if token.starts_with("connector") {
            return "#333333".to_string();
        }
        if token.starts_with("text") {
            return "#323232".to_string();
        }

        // Unknown category - dark gray
        "#333333".to_string()
    }

    /// Resolve a role token all the way to a parsed [`Color`]
    ///
    /// Tokens whose value is not valid hex fall back through the same chain
    /// as missing tokens.
    pub fn color_or_default(&self, token: &str) -> Color {
        if let Some(color) = self.resolve(token).and_then(Color::from_hex) {
            return color;
        }
        Color::from_hex(&Self::default().resolve_or_default(token))
            .unwrap_or(Color::new(51, 51, 51))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
    }
}
