// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier prompt construction.
//!
//! The prompt enumerates the distinct variant/category/usage tags observed
//! across the workspace's current assets so the classifier grounds its
//! answer in what actually exists. Tag lists are capped per category to
//! bound prompt size.

use brandbot_core::types::{AssetCategory, AssetRecord};
use brandbot_match::AssetMetadata;

/// Maximum distinct tags listed per asset category.
const MAX_TAGS_PER_CATEGORY: usize = 8;

/// Build the classification prompt for a raw command text.
pub fn build_prompt(raw_text: &str, assets: &[AssetRecord]) -> String {
    let logo_tags = distinct_tags(assets, AssetCategory::Logo);
    let color_tags = distinct_tags(assets, AssetCategory::Color);
    let font_tags = distinct_tags(assets, AssetCategory::Font);

    let mut prompt = String::from(
        "You interpret requests for brand assets in a chat workspace. \
         Classify the request into exactly one category.\n",
    );
    push_tag_line(&mut prompt, "Known logo variants", &logo_tags);
    push_tag_line(&mut prompt, "Known color groups", &color_tags);
    push_tag_line(&mut prompt, "Known font roles", &font_tags);
    prompt.push_str(
        "Reply with only a JSON object: {\"category\": \"logo\"|\"color\"|\"font\"|\"search\"|\"help\", \
         \"variant\": string or null, \"confidence\": number between 0 and 1}.\n",
    );
    prompt.push_str(&format!("Request: {raw_text}\n"));
    prompt
}

fn push_tag_line(prompt: &mut String, label: &str, tags: &[String]) {
    if !tags.is_empty() {
        prompt.push_str(&format!("{label}: {}\n", tags.join(", ")));
    }
}

/// Distinct, lowercased variant/category/usage tags for one asset category,
/// in first-seen order, capped.
fn distinct_tags(assets: &[AssetRecord], category: AssetCategory) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for asset in assets.iter().filter(|a| a.category == category) {
        let meta = AssetMetadata::from_value(&asset.metadata);
        for tag in [
            meta.variant_tag(),
            meta.category_tag(),
            meta.usage.as_deref().unwrap_or_default().trim().to_lowercase(),
        ] {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
                if tags.len() >= MAX_TAGS_PER_CATEGORY {
                    return tags;
                }
            }
        }
    }
    tags
}
