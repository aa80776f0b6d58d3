// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variant matching and filtering of candidate assets.
//!
//! Two strategies, selected by asset category. Logos run an exact →
//! substring → synonym chain against variant tags and display names;
//! colors and fonts classify the query into fixed semantic buckets. Both
//! share the same degradation rule: when no narrowing is possible the full
//! category list comes back, so a command (almost) never answers "nothing
//! found" while the category has any assets at all.

use tracing::debug;

use brandbot_core::types::{AssetCandidateSet, AssetCategory, AssetRecord};

use crate::metadata::AssetMetadata;

/// Synonym table for logo variant queries. Static and versioned with the
/// code; not tenant-configurable.
const LOGO_SYNONYMS: &[(&str, &[&str])] = &[
    ("dark", &["inverse", "white", "knockout", "reversed"]),
    ("light", &["standard", "full-color", "default", "primary"]),
    ("icon", &["mark", "symbol", "glyph", "app"]),
    ("mono", &["monochrome", "one-color", "black", "grayscale"]),
    ("horizontal", &["wide", "landscape", "lockup"]),
    ("stacked", &["vertical", "square"]),
];

/// Semantic buckets for color queries.
const COLOR_BUCKETS: &[(&str, &[&str])] = &[
    ("brand", &["brand", "primary", "identity", "main", "core"]),
    (
        "neutral",
        &["neutral", "background", "gray", "grey", "surface", "muted"],
    ),
    (
        "interactive",
        &["interactive", "state", "hover", "active", "link", "button", "accent"],
    ),
];

/// Semantic buckets for font queries.
const FONT_BUCKETS: &[(&str, &[&str])] = &[
    ("heading", &["heading", "header", "title", "display"]),
    ("body", &["body", "text", "paragraph", "copy"]),
    ("code", &["code", "mono", "monospace", "technical"]),
];

/// Filter a category's assets by a free-text query.
///
/// `narrowed` is true only when the query actually reduced the set; the
/// fall-back-to-all path reports `narrowed = false` so callers can tell
/// "everything matched" from "nothing matched, showing everything".
pub fn filter_candidates(
    category: AssetCategory,
    query: &str,
    assets: Vec<AssetRecord>,
) -> AssetCandidateSet {
    let query = query.trim().to_lowercase();
    if query.is_empty() || assets.is_empty() {
        return AssetCandidateSet {
            assets,
            narrowed: false,
        };
    }

    let matched = match category {
        AssetCategory::Logo => match_logos(&query, &assets),
        AssetCategory::Color => match_buckets(&query, &assets, COLOR_BUCKETS),
        AssetCategory::Font => match_buckets(&query, &assets, FONT_BUCKETS),
    };

    if matched.is_empty() {
        debug!(%query, %category, total = assets.len(), "no narrowing possible, returning full list");
        AssetCandidateSet {
            assets,
            narrowed: false,
        }
    } else {
        AssetCandidateSet {
            assets: matched,
            narrowed: true,
        }
    }
}

/// Logo chain: exact variant-tag match, then substring on display name,
/// then synonym-expanded variant-tag match. Empty result means the caller
/// falls back to the full list.
fn match_logos(query: &str, assets: &[AssetRecord]) -> Vec<AssetRecord> {
    // (a) Exact match against declared variant tags.
    let exact: Vec<AssetRecord> = assets
        .iter()
        .filter(|a| AssetMetadata::from_value(&a.metadata).variant_tag() == query)
        .cloned()
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    // (b) Substring match against display names.
    let by_name: Vec<AssetRecord> = assets
        .iter()
        .filter(|a| a.name.to_lowercase().contains(query))
        .cloned()
        .collect();
    if !by_name.is_empty() {
        return by_name;
    }

    // (c) Synonym expansion: a query containing "dark" also matches
    // variant tags like "inverse" or "white". Terms match whole tags
    // only; a substring check here would let short query fragments hit
    // unrelated tags ("s" matching "standard").
    let expanded = expand_synonyms(query);
    assets
        .iter()
        .filter(|a| {
            let tag = AssetMetadata::from_value(&a.metadata).variant_tag();
            !tag.is_empty()
                && expanded.iter().any(|term| {
                    tag == *term || tag.split_whitespace().any(|word| word == term.as_str())
                })
        })
        .cloned()
        .collect()
}

/// Expand a query through the logo synonym table. The original query terms
/// stay in the set alongside any synonyms.
fn expand_synonyms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = query.split_whitespace().map(str::to_string).collect();
    for (key, synonyms) in LOGO_SYNONYMS {
        if query.contains(key) {
            terms.extend(synonyms.iter().map(|s| s.to_string()));
        }
    }
    terms
}

/// Bucket strategy for colors and fonts: classify the query into a bucket
/// by keyword containment, then match assets whose display name or internal
/// category field hits that bucket's keyword set. A query matching no
/// bucket degrades to direct substring match on name.
fn match_buckets(
    query: &str,
    assets: &[AssetRecord],
    buckets: &[(&str, &[&str])],
) -> Vec<AssetRecord> {
    let bucket = buckets
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| query.contains(k)));

    match bucket {
        Some((name, keywords)) => {
            debug!(%query, bucket = name, "query classified into semantic bucket");
            assets
                .iter()
                .filter(|a| {
                    let display = a.name.to_lowercase();
                    let category_tag = AssetMetadata::from_value(&a.metadata).category_tag();
                    keywords
                        .iter()
                        .any(|k| display.contains(k) || category_tag.contains(k))
                })
                .cloned()
                .collect()
        }
        None => assets
            .iter()
            .filter(|a| a.name.to_lowercase().contains(query))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_core::types::AssetId;
    use serde_json::json;

    fn asset(id: i64, category: AssetCategory, name: &str, metadata: serde_json::Value) -> AssetRecord {
        AssetRecord {
            id: AssetId(id),
            name: name.to_string(),
            category,
            metadata,
        }
    }

    fn logos() -> Vec<AssetRecord> {
        vec![
            asset(1, AssetCategory::Logo, "Primary Logo", json!({"variant": "standard"})),
            asset(2, AssetCategory::Logo, "Logo Inverse", json!({"variant": "inverse"})),
            asset(3, AssetCategory::Logo, "App Icon", json!({"variant": "icon"})),
        ]
    }

    fn colors() -> Vec<AssetRecord> {
        vec![
            asset(10, AssetCategory::Color, "Brand Blue", json!({"category": "brand", "hex": "#0044cc"})),
            asset(11, AssetCategory::Color, "Surface Gray", json!({"category": "neutral", "hex": "#f4f4f4"})),
            asset(12, AssetCategory::Color, "Link Teal", json!({"category": "interactive", "hex": "#00a0a0"})),
        ]
    }

    #[test]
    fn exact_variant_tag_wins() {
        let result = filter_candidates(AssetCategory::Logo, "icon", logos());
        assert!(result.narrowed);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].id, AssetId(3));
    }

    #[test]
    fn substring_on_name_when_no_exact_tag() {
        let result = filter_candidates(AssetCategory::Logo, "primary", logos());
        assert!(result.narrowed);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].name, "Primary Logo");
    }

    #[test]
    fn synonym_expansion_reaches_inverse() {
        // "dark" is neither a variant tag nor in any display name; the
        // synonym table maps it onto "inverse".
        let result = filter_candidates(AssetCategory::Logo, "dark", logos());
        assert!(result.narrowed);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].id, AssetId(2));
    }

    #[test]
    fn fragment_tokens_never_widen_a_synonym_match() {
        // A stray one-letter token must not substring-match "standard";
        // only the inverse logo answers a dark query.
        let result = filter_candidates(AssetCategory::Logo, "s dark", logos());
        assert!(result.narrowed);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].id, AssetId(2));
    }

    #[test]
    fn unmatched_query_falls_back_to_all() {
        let result = filter_candidates(AssetCategory::Logo, "zzz", logos());
        assert!(!result.narrowed);
        assert_eq!(result.assets.len(), 3);
    }

    #[test]
    fn empty_query_returns_all_unnarrowed() {
        let result = filter_candidates(AssetCategory::Color, "", colors());
        assert!(!result.narrowed);
        assert_eq!(result.assets.len(), 3);
    }

    #[test]
    fn color_bucket_classification() {
        let interactive = filter_candidates(AssetCategory::Color, "interactive", colors());
        assert!(interactive.narrowed);
        assert_eq!(interactive.assets.len(), 1);
        assert_eq!(interactive.assets[0].name, "Link Teal");

        let brand = filter_candidates(AssetCategory::Color, "primary", colors());
        assert!(brand.narrowed);
        assert_eq!(brand.assets[0].name, "Brand Blue");

        let neutral = filter_candidates(AssetCategory::Color, "background", colors());
        assert!(neutral.narrowed);
        assert_eq!(neutral.assets[0].name, "Surface Gray");
    }

    #[test]
    fn color_query_outside_buckets_substring_matches_name() {
        let result = filter_candidates(AssetCategory::Color, "teal", colors());
        assert!(result.narrowed);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].name, "Link Teal");
    }

    #[test]
    fn color_nonsense_query_degrades_to_all() {
        let result = filter_candidates(AssetCategory::Color, "zzz", colors());
        assert!(!result.narrowed);
        assert_eq!(result.assets.len(), 3);
    }

    #[test]
    fn font_buckets_match_name_and_category() {
        let fonts = vec![
            asset(20, AssetCategory::Font, "Display Sans", json!({"category": "heading"})),
            asset(21, AssetCategory::Font, "Reader Serif", json!({"category": "body"})),
            asset(22, AssetCategory::Font, "Terminal Mono", json!({"category": "code"})),
        ];
        let result = filter_candidates(AssetCategory::Font, "header", fonts);
        assert!(result.narrowed);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].name, "Display Sans");
    }

    #[test]
    fn never_empty_for_non_empty_input() {
        for query in ["", "dark", "zzz", "primary", "!!!", "the quick brown fox"] {
            for (category, assets) in [
                (AssetCategory::Logo, logos()),
                (AssetCategory::Color, colors()),
            ] {
                let result = filter_candidates(category, query, assets);
                assert!(
                    !result.assets.is_empty(),
                    "query {query:?} on {category} produced an empty set"
                );
            }
        }
    }

    #[test]
    fn malformed_metadata_still_matches_by_name() {
        let assets = vec![
            asset(30, AssetCategory::Logo, "Dark Logo", json!("not an object")),
            asset(31, AssetCategory::Logo, "Light Logo", json!(null)),
        ];
        let result = filter_candidates(AssetCategory::Logo, "dark", assets);
        assert!(result.narrowed);
        assert_eq!(result.assets.len(), 1);
        assert_eq!(result.assets[0].name, "Dark Logo");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Any query at all, against any non-empty asset list, comes
            // back non-empty.
            #[test]
            fn arbitrary_queries_never_empty_the_set(query in ".{0,40}") {
                for (category, assets) in [
                    (AssetCategory::Logo, logos()),
                    (AssetCategory::Color, colors()),
                ] {
                    let total = assets.len();
                    let result = filter_candidates(category, &query, assets);
                    prop_assert!(!result.assets.is_empty());
                    prop_assert!(result.assets.len() <= total);
                    if !result.narrowed {
                        prop_assert_eq!(result.assets.len(), total);
                    }
                }
            }
        }
    }
}
