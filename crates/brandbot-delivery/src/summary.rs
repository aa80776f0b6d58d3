// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-delivery summary message.

use brandbot_core::types::{DeliveryAttempt, DeliveryTier};

/// Aggregate of one pipeline run feeding the summary message.
#[derive(Debug, Clone, Default)]
pub struct DeliveryOutcome {
    pub attempts: Vec<DeliveryAttempt>,
}

impl DeliveryOutcome {
    /// Files successfully uploaded (tiers 1 and 2).
    pub fn uploaded(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| {
                a.success
                    && matches!(
                        a.tier,
                        DeliveryTier::ChannelUpload | DeliveryTier::DirectUpload
                    )
            })
            .count()
    }

    /// Text or code blocks successfully sent (tier 3 and text deliveries).
    pub fn text_blocks(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| {
                a.success && matches!(a.tier, DeliveryTier::DirectLink | DeliveryTier::Text)
            })
            .count()
    }

    pub fn failed(&self) -> usize {
        self.attempts.iter().filter(|a| !a.success).count()
    }

    pub fn all_failed(&self) -> bool {
        !self.attempts.is_empty() && self.attempts.iter().all(|a| !a.success)
    }
}

/// Build the one summary message sent after all per-asset attempts settle.
///
/// `shown_of_total` is present when the result set was truncated by an
/// explicit limit: (delivered, total matches).
pub fn format_summary(
    outcome: &DeliveryOutcome,
    elapsed_ms: u64,
    shown_of_total: Option<(usize, usize)>,
    low_confidence: bool,
) -> String {
    let mut parts = Vec::new();

    let uploaded = outcome.uploaded();
    let text_blocks = outcome.text_blocks();
    let failed = outcome.failed();

    if uploaded > 0 {
        parts.push(format!(
            "{uploaded} file{} uploaded",
            if uploaded == 1 { "" } else { "s" }
        ));
    }
    if text_blocks > 0 {
        parts.push(format!(
            "{text_blocks} text block{} sent",
            if text_blocks == 1 { "" } else { "s" }
        ));
    }
    if failed > 0 {
        parts.push(format!("{failed} failed"));
    }
    if parts.is_empty() {
        parts.push("nothing delivered".to_string());
    }

    let mut summary = String::new();
    if low_confidence {
        summary.push_str("(I wasn't fully sure what you meant, so here's my best match.)\n");
    }
    summary.push_str(&format!("Done: {} in {elapsed_ms}ms.", parts.join(", ")));

    if let Some((shown, total)) = shown_of_total {
        if shown < total {
            summary.push_str(&format!(
                " Showing {shown} of {total} matches; narrow your query for the rest."
            ));
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandbot_core::types::AssetId;

    fn attempt(tier: DeliveryTier, success: bool) -> DeliveryAttempt {
        DeliveryAttempt {
            asset_id: AssetId(1),
            tier,
            success,
            failure: if success {
                None
            } else {
                Some("boom".into())
            },
        }
    }

    #[test]
    fn counts_split_uploads_from_text() {
        let outcome = DeliveryOutcome {
            attempts: vec![
                attempt(DeliveryTier::ChannelUpload, true),
                attempt(DeliveryTier::DirectUpload, true),
                attempt(DeliveryTier::DirectLink, true),
                attempt(DeliveryTier::Text, true),
                attempt(DeliveryTier::ChannelUpload, false),
            ],
        };
        assert_eq!(outcome.uploaded(), 2);
        assert_eq!(outcome.text_blocks(), 2);
        assert_eq!(outcome.failed(), 1);
        assert!(!outcome.all_failed());
    }

    #[test]
    fn summary_mentions_counts_and_latency() {
        let outcome = DeliveryOutcome {
            attempts: vec![
                attempt(DeliveryTier::ChannelUpload, true),
                attempt(DeliveryTier::Text, true),
            ],
        };
        let text = format_summary(&outcome, 850, None, false);
        assert!(text.contains("1 file uploaded"));
        assert!(text.contains("1 text block sent"));
        assert!(text.contains("850ms"));
    }

    #[test]
    fn summary_notes_truncation() {
        let outcome = DeliveryOutcome {
            attempts: vec![attempt(DeliveryTier::ChannelUpload, true)],
        };
        let text = format_summary(&outcome, 10, Some((1, 12)), false);
        assert!(text.contains("1 of 12"));
    }

    #[test]
    fn summary_prefixes_low_confidence_notice() {
        let outcome = DeliveryOutcome {
            attempts: vec![attempt(DeliveryTier::Text, true)],
        };
        let text = format_summary(&outcome, 10, None, true);
        assert!(text.starts_with("(I wasn't fully sure"));
    }

    #[test]
    fn untruncated_limit_is_silent() {
        let outcome = DeliveryOutcome {
            attempts: vec![attempt(DeliveryTier::ChannelUpload, true)],
        };
        let text = format_summary(&outcome, 10, Some((3, 3)), false);
        assert!(!text.contains("of 3"));
    }
}
