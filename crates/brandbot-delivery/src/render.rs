// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Captions and text-form renderings of assets.
//!
//! All metadata reads go through the typed decode in `brandbot-match`, so
//! malformed blobs degrade in one place.

use brandbot_core::types::{AssetCategory, AssetRecord};
use brandbot_match::AssetMetadata;

/// Descriptive caption for an uploaded file.
pub fn caption_for(asset: &AssetRecord) -> String {
    let meta = AssetMetadata::from_value(&asset.metadata);
    let mut caption = asset.name.clone();
    if let Some(ref variant) = meta.variant {
        caption.push_str(&format!(" ({variant})"));
    }
    if let Some(ref usage) = meta.usage {
        caption.push_str(&format!(" — use for {usage}"));
    }
    caption
}

/// Filename for an uploaded file: slugged display name plus extension.
/// Runs of non-alphanumeric characters collapse into a single dash.
pub fn filename_for(asset: &AssetRecord, extension: &str) -> String {
    let mut slug = String::new();
    for c in asset.name.to_lowercase().chars() {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        format!("asset-{}.{extension}", asset.id)
    } else {
        format!("{slug}.{extension}")
    }
}

/// Text block for a non-file asset (colors and fonts render as text).
pub fn text_block_for(asset: &AssetRecord) -> String {
    let meta = AssetMetadata::from_value(&asset.metadata);
    match asset.category {
        AssetCategory::Color => {
            let hex = meta.hex.as_deref().unwrap_or("#??????");
            let group = meta
                .category
                .as_deref()
                .map(|c| format!(" [{c}]"))
                .unwrap_or_default();
            format!("`{hex}` {}{group}", asset.name)
        }
        AssetCategory::Font => {
            let mut block = format!("*{}*", asset.name);
            if !meta.weights.is_empty() {
                block.push_str(&format!(" — weights {}", meta.weights.join(", ")));
            }
            if let Some(ref usage) = meta.usage {
                block.push_str(&format!("\nUse for {usage}."));
            }
            block.push_str(&format!(
                "\n```css\nfont-family: '{}', sans-serif;\n```",
                asset.name
            ));
            block
        }
        // File categories never render as text blocks; callers pass the
        // download link separately.
        AssetCategory::Logo => asset.name.clone(),
    }
}

/// Tier-3 text message carrying the direct download link.
pub fn link_message(asset: &AssetRecord, url: &str) -> String {
    format!("{}\nDownload: {url}", caption_for(asset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_core::types::AssetId;
    use serde_json::json;

    fn asset(category: AssetCategory, name: &str, metadata: serde_json::Value) -> AssetRecord {
        AssetRecord {
            id: AssetId(5),
            name: name.to_string(),
            category,
            metadata,
        }
    }

    #[test]
    fn caption_includes_variant_and_usage() {
        let a = asset(
            AssetCategory::Logo,
            "Primary Logo",
            json!({"variant": "inverse", "usage": "dark backgrounds"}),
        );
        let caption = caption_for(&a);
        assert!(caption.contains("Primary Logo"));
        assert!(caption.contains("inverse"));
        assert!(caption.contains("dark backgrounds"));
    }

    #[test]
    fn caption_degrades_without_metadata() {
        let a = asset(AssetCategory::Logo, "Primary Logo", json!(null));
        assert_eq!(caption_for(&a), "Primary Logo");
    }

    #[test]
    fn filename_is_slugged() {
        let a = asset(AssetCategory::Logo, "Primary Logo (2024)", json!({}));
        assert_eq!(filename_for(&a, "svg"), "primary-logo-2024.svg");
    }

    #[test]
    fn all_punctuation_name_falls_back_to_asset_id() {
        let a = asset(AssetCategory::Logo, "!!!", json!({}));
        assert_eq!(filename_for(&a, "png"), "asset-5.png");
    }

    #[test]
    fn color_block_shows_hex_and_group() {
        let a = asset(
            AssetCategory::Color,
            "Brand Blue",
            json!({"hex": "#0044cc", "category": "brand"}),
        );
        let block = text_block_for(&a);
        assert!(block.contains("#0044cc"));
        assert!(block.contains("Brand Blue"));
        assert!(block.contains("[brand]"));
    }

    #[test]
    fn font_block_includes_css_snippet() {
        let a = asset(
            AssetCategory::Font,
            "Display Sans",
            json!({"weights": ["400", "700"], "usage": "headings"}),
        );
        let block = text_block_for(&a);
        assert!(block.contains("font-family: 'Display Sans'"));
        assert!(block.contains("400, 700"));
    }

    #[test]
    fn link_message_carries_url() {
        let a = asset(AssetCategory::Logo, "Primary Logo", json!({}));
        let msg = link_message(&a, "https://storage.test/7/5");
        assert!(msg.contains("https://storage.test/7/5"));
    }
}
