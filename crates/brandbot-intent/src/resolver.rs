// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent resolution: raw command text to a structured [`Intent`].
//!
//! Resolution runs in priority order: deterministic parse → configured
//! classifier (quota permitting) → local keyword heuristic. The
//! deterministic path never calls the classifier; classifier failures of
//! any kind degrade to the heuristic, so resolution always produces an
//! intent and never an error.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use brandbot_core::traits::IntentClassifier;
use brandbot_core::types::{AssetRecord, Intent, IntentCategory, WorkspaceId};
use brandbot_quota::CostMonitor;

use crate::prompt::build_prompt;

/// Below this confidence the caller must ask for clarification instead of
/// proceeding.
pub const CLARIFY_BELOW: f32 = 0.4;

/// Below this confidence (but at or above [`CLARIFY_BELOW`]) the caller
/// proceeds, prefixing the eventual response with a low-confidence notice.
pub const NOTICE_BELOW: f32 = 0.7;

/// Confidence assigned to a heuristic keyword match.
const HEURISTIC_CONFIDENCE: f32 = 0.7;

/// Confidence assigned to the default treat-as-search catch-all.
const SEARCH_CONFIDENCE: f32 = 0.5;

/// Bare single-token category lookups resolved deterministically.
const LOOKUP_TOKENS: &[(&str, IntentCategory)] = &[
    ("logo", IntentCategory::Logo),
    ("logos", IntentCategory::Logo),
    ("color", IntentCategory::Color),
    ("colors", IntentCategory::Color),
    ("colour", IntentCategory::Color),
    ("colours", IntentCategory::Color),
    ("palette", IntentCategory::Color),
    ("font", IntentCategory::Font),
    ("fonts", IntentCategory::Font),
    ("typeface", IntentCategory::Font),
];

/// Heuristic keyword vocabularies per category (contains, case-insensitive).
const LOGO_KEYWORDS: &[&str] = &["logo", "logos", "wordmark", "lockup", "icon", "mark"];
const COLOR_KEYWORDS: &[&str] = &["color", "colour", "palette", "hex", "swatch"];
const FONT_KEYWORDS: &[&str] = &["font", "typeface", "typography", "typo"];
const HELP_KEYWORDS: &[&str] = &["help", "usage", "how do i", "what can you"];

/// Resolves raw command text into an [`Intent`].
///
/// State-free apart from the injected classifier seam; identical input
/// always yields identical output when the classifier is unavailable.
pub struct IntentResolver {
    classifier: Option<Arc<dyn IntentClassifier>>,
}

impl IntentResolver {
    pub fn new(classifier: Option<Arc<dyn IntentClassifier>>) -> Self {
        Self { classifier }
    }

    /// Resolver with no classifier configured; always heuristic fallback.
    pub fn heuristic_only() -> Self {
        Self { classifier: None }
    }

    /// Resolve command text against the workspace's current assets.
    ///
    /// `quota` gates the classifier: `check_limits` runs before any call and
    /// usage is recorded only when the call succeeds, so failed calls do not
    /// consume quota.
    pub async fn resolve(
        &self,
        raw_text: &str,
        assets: &[AssetRecord],
        quota: &CostMonitor,
        workspace_id: &WorkspaceId,
    ) -> Intent {
        let trimmed = raw_text.trim();

        if let Some(intent) = deterministic_parse(trimmed) {
            return intent;
        }

        if let Some(ref classifier) = self.classifier {
            let decision = quota.check_limits(workspace_id);
            if decision.allowed {
                let prompt = build_prompt(trimmed, assets);
                match classifier.classify(&prompt).await {
                    Ok(reply) => {
                        quota.record_usage(workspace_id);
                        if let Some(intent) = parse_classifier_reply(&reply) {
                            debug!(
                                category = %intent.category,
                                confidence = intent.confidence,
                                "classifier resolved intent"
                            );
                            return intent;
                        }
                        warn!(reply = %reply, "malformed classifier reply, using heuristic");
                    }
                    Err(e) => {
                        warn!(error = %e, "classifier call failed, using heuristic");
                    }
                }
            } else {
                debug!(
                    workspace = %workspace_id.0,
                    reason = decision.reason.as_deref().unwrap_or(""),
                    "classifier quota exhausted, using heuristic"
                );
            }
        }

        heuristic_parse(trimmed)
    }
}

/// Deterministic parse of the fixed command vocabulary.
///
/// Handles `help`, `search <query>` / `find <query>`, and bare
/// single-token category lookups. Anything with free text around a
/// category word needs interpretation and falls through.
fn deterministic_parse(text: &str) -> Option<Intent> {
    let lower = text.to_lowercase();
    let mut tokens = lower.split_whitespace();
    let first = tokens.next()?;
    let rest = lower
        .split_once(char::is_whitespace)
        .map(|(_, r)| r.trim().to_string())
        .filter(|r| !r.is_empty());

    if first == "help" {
        return Some(Intent {
            category: IntentCategory::Help,
            variant: None,
            confidence: 1.0,
        });
    }

    if first == "search" || first == "find" {
        return Some(Intent {
            category: IntentCategory::Search,
            variant: rest,
            confidence: 1.0,
        });
    }

    // A bare category token is an unambiguous lookup. A category token with
    // trailing free text is not: that is exactly the case the classifier
    // and heuristic exist for.
    if rest.is_none() {
        if let Some((_, category)) = LOOKUP_TOKENS.iter().find(|(t, _)| *t == first) {
            return Some(Intent {
                category: *category,
                variant: None,
                confidence: 1.0,
            });
        }
    }

    None
}

/// Local keyword heuristic: containment against the per-category
/// vocabularies at 0.7 confidence, defaulting to search at 0.5.
fn heuristic_parse(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if HELP_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Intent {
            category: IntentCategory::Help,
            variant: None,
            confidence: HEURISTIC_CONFIDENCE,
        };
    }

    for (keywords, category) in [
        (LOGO_KEYWORDS, IntentCategory::Logo),
        (COLOR_KEYWORDS, IntentCategory::Color),
        (FONT_KEYWORDS, IntentCategory::Font),
    ] {
        if let Some(keyword) = keywords.iter().find(|k| lower.contains(*k)) {
            return Intent {
                category,
                variant: strip_keyword(&lower, keyword),
                confidence: HEURISTIC_CONFIDENCE,
            };
        }
    }

    Intent {
        category: IntentCategory::Search,
        variant: if lower.is_empty() {
            None
        } else {
            Some(lower)
        },
        confidence: SEARCH_CONFIDENCE,
    }
}

/// Remove the matched keyword from the query so the remainder can narrow
/// the category ("logo dark" → variant "dark"). Whole tokens only: the
/// keyword may be a substring of its token ("logos" matched via "logo"),
/// so the containing token is dropped rather than sliced.
fn strip_keyword(text: &str, keyword: &str) -> Option<String> {
    let stripped = text
        .split_whitespace()
        .filter(|token| !token.contains(keyword))
        .collect::<Vec<_>>()
        .join(" ");
    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// The small JSON object the classifier is asked to emit.
#[derive(Debug, Deserialize)]
struct ClassifierReply {
    category: String,
    #[serde(default)]
    variant: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
}

/// Parse a classifier reply. Any shape violation returns `None` and the
/// caller degrades to the heuristic.
fn parse_classifier_reply(reply: &str) -> Option<Intent> {
    let trimmed = strip_code_fence(reply.trim());
    let parsed: ClassifierReply = serde_json::from_str(trimmed).ok()?;

    let category = match parsed.category.to_lowercase().as_str() {
        "logo" | "logos" => IntentCategory::Logo,
        "color" | "colors" | "colour" => IntentCategory::Color,
        "font" | "fonts" => IntentCategory::Font,
        "search" => IntentCategory::Search,
        "help" => IntentCategory::Help,
        _ => return None,
    };

    let variant = parsed
        .variant
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty());

    let confidence = parsed.confidence.unwrap_or(0.0).clamp(0.0, 1.0);

    Some(Intent {
        category,
        variant,
        confidence,
    })
}

/// Tolerate replies wrapped in a markdown code fence.
fn strip_code_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_config::QuotaConfig;
    use brandbot_core::traits::Clock;
    use brandbot_test_utils::{ManualClock, MockClassifier};

    fn quota() -> CostMonitor {
        CostMonitor::new(
            QuotaConfig::default(),
            Arc::new(ManualClock::default()) as Arc<dyn Clock>,
        )
    }

    fn exhausted_quota() -> CostMonitor {
        CostMonitor::new(
            QuotaConfig {
                daily_request_limit: 0,
                ..QuotaConfig::default()
            },
            Arc::new(ManualClock::default()) as Arc<dyn Clock>,
        )
    }

    fn workspace() -> WorkspaceId {
        WorkspaceId("W1".into())
    }

    #[tokio::test]
    async fn bare_category_token_is_deterministic() {
        let resolver = IntentResolver::heuristic_only();
        let intent = resolver.resolve("logo", &[], &quota(), &workspace()).await;
        assert_eq!(intent.category, IntentCategory::Logo);
        assert!(intent.variant.is_none());
        assert_eq!(intent.confidence, 1.0);

        let intent = resolver
            .resolve("palette", &[], &quota(), &workspace())
            .await;
        assert_eq!(intent.category, IntentCategory::Color);
        assert_eq!(intent.confidence, 1.0);
    }

    #[tokio::test]
    async fn search_and_help_are_deterministic() {
        let resolver = IntentResolver::heuristic_only();

        let intent = resolver
            .resolve("search slide deck", &[], &quota(), &workspace())
            .await;
        assert_eq!(intent.category, IntentCategory::Search);
        assert_eq!(intent.variant.as_deref(), Some("slide deck"));
        assert_eq!(intent.confidence, 1.0);

        let intent = resolver.resolve("help", &[], &quota(), &workspace()).await;
        assert_eq!(intent.category, IntentCategory::Help);
        assert_eq!(intent.confidence, 1.0);
    }

    #[tokio::test]
    async fn heuristic_fallback_is_deterministic() {
        // Classifier unavailable: "logo dark" resolves through the keyword
        // heuristic, identically on every call.
        let resolver = IntentResolver::heuristic_only();
        for _ in 0..3 {
            let intent = resolver
                .resolve("logo dark", &[], &quota(), &workspace())
                .await;
            assert_eq!(intent.category, IntentCategory::Logo);
            assert!(intent.variant.as_deref().unwrap().contains("dark"));
            assert_eq!(intent.confidence, 0.7);
        }
    }

    #[tokio::test]
    async fn plural_keyword_strips_its_whole_token() {
        // "logos" matches the vocabulary via "logo"; the variant must be
        // "dark", not the "s dark" a substring strip would leave behind.
        let resolver = IntentResolver::heuristic_only();
        let intent = resolver
            .resolve("logos dark", &[], &quota(), &workspace())
            .await;
        assert_eq!(intent.category, IntentCategory::Logo);
        assert_eq!(intent.variant.as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn unmatched_text_defaults_to_search() {
        let resolver = IntentResolver::heuristic_only();
        let intent = resolver
            .resolve("that blue thing from the deck", &[], &quota(), &workspace())
            .await;
        assert_eq!(intent.category, IntentCategory::Search);
        assert_eq!(intent.confidence, 0.5);
        assert!(intent.variant.is_some());
    }

    #[tokio::test]
    async fn classifier_reply_is_used_and_quota_recorded() {
        let classifier = Arc::new(MockClassifier::new());
        classifier.reply_with(r#"{"category": "logo", "variant": "dark", "confidence": 0.92}"#);
        let resolver = IntentResolver::new(Some(classifier.clone() as Arc<dyn IntentClassifier>));
        let quota = quota();

        let intent = resolver
            .resolve("the one for dark slides", &[], &quota, &workspace())
            .await;
        assert_eq!(intent.category, IntentCategory::Logo);
        assert_eq!(intent.variant.as_deref(), Some("dark"));
        assert!((intent.confidence - 0.92).abs() < 1e-6);
        assert_eq!(classifier.call_count(), 1);
        assert_eq!(quota.usage(&workspace()).0, 1);
    }

    #[tokio::test]
    async fn classifier_failure_degrades_and_spares_quota() {
        let classifier = Arc::new(MockClassifier::new());
        classifier.fail_with("service unavailable");
        let resolver = IntentResolver::new(Some(classifier.clone() as Arc<dyn IntentClassifier>));
        let quota = quota();

        let intent = resolver
            .resolve("fonts for headers", &[], &quota, &workspace())
            .await;
        assert_eq!(intent.category, IntentCategory::Font);
        assert_eq!(intent.confidence, 0.7);
        // Failed call consumed no quota.
        assert_eq!(quota.usage(&workspace()).0, 0);
    }

    #[tokio::test]
    async fn malformed_classifier_reply_degrades() {
        let classifier = Arc::new(MockClassifier::new());
        classifier.reply_with("certainly! here is my analysis of your request");
        let resolver = IntentResolver::new(Some(classifier as Arc<dyn IntentClassifier>));

        let intent = resolver
            .resolve("brand colors please", &[], &quota(), &workspace())
            .await;
        assert_eq!(intent.category, IntentCategory::Color);
        assert_eq!(intent.confidence, 0.7);
    }

    #[tokio::test]
    async fn exhausted_quota_skips_classifier_entirely() {
        let classifier = Arc::new(MockClassifier::new());
        classifier.reply_with(r#"{"category": "logo", "confidence": 0.9}"#);
        let resolver = IntentResolver::new(Some(classifier.clone() as Arc<dyn IntentClassifier>));

        let intent = resolver
            .resolve("something darkish", &[], &exhausted_quota(), &workspace())
            .await;
        assert_eq!(classifier.call_count(), 0);
        assert_eq!(intent.category, IntentCategory::Search);
    }

    #[test]
    fn deterministic_parse_rejects_category_with_remainder() {
        assert!(deterministic_parse("logo").is_some());
        assert!(deterministic_parse("logo dark").is_none());
        assert!(deterministic_parse("dark logo").is_none());
    }

    #[test]
    fn reply_parser_handles_fences_and_clamps() {
        let intent = parse_classifier_reply(
            "```json\n{\"category\": \"font\", \"confidence\": 3.5}\n```",
        )
        .unwrap();
        assert_eq!(intent.category, IntentCategory::Font);
        assert_eq!(intent.confidence, 1.0);

        assert!(parse_classifier_reply(r#"{"category": "pizza"}"#).is_none());
        assert!(parse_classifier_reply("not json at all").is_none());
    }

    #[test]
    fn confidence_thresholds_are_the_documented_constants() {
        assert_eq!(CLARIFY_BELOW, 0.4);
        assert_eq!(NOTICE_BELOW, 0.7);
    }
}
