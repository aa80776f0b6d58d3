// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed decode of the asset store's opaque JSON metadata blob.
//!
//! The store attaches a free-form JSON object to every asset (variant tag,
//! usage, weights, swatches, source). Fields are read defensively in this
//! one place: missing or malformed metadata degrades to defaults and never
//! fails. Both the matcher and the summary formatters decode through here.

use serde_json::Value;

/// Decoded asset metadata with every field optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetMetadata {
    /// Declared variant tag ("standard", "inverse", "icon", ...).
    pub variant: Option<String>,
    /// Intended usage note ("app icon", "email header", ...).
    pub usage: Option<String>,
    /// Internal semantic category ("brand", "neutral", "heading", ...).
    pub category: Option<String>,
    /// Hex swatch for color assets.
    pub hex: Option<String>,
    /// Font weights for font assets.
    pub weights: Vec<String>,
    /// Font styles for font assets.
    pub styles: Vec<String>,
    /// Where the asset came from ("upload", "import", ...).
    pub source: Option<String>,
}

impl AssetMetadata {
    /// Decode a metadata blob. Non-object values yield all defaults.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            variant: string_field(obj, "variant"),
            usage: string_field(obj, "usage"),
            category: string_field(obj, "category"),
            hex: string_field(obj, "hex"),
            weights: string_list_field(obj, "weights"),
            styles: string_list_field(obj, "styles"),
            source: string_field(obj, "source"),
        }
    }

    /// The variant tag lowercased, empty string when absent.
    pub fn variant_tag(&self) -> String {
        self.variant
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }

    /// The internal category lowercased, empty string when absent.
    pub fn category_tag(&self) -> String {
        self.category
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list_field(obj: &serde_json::Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
