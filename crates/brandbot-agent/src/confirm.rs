// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confirmation gate for large result sets.
//!
//! When a match lands strictly above the scope's threshold, delivery does
//! not start. The user instead gets an interactive choice: deliver
//! everything, deliver the first few, or narrow the query. The choice is
//! carried in a [`ContinuationToken`] so the resume is stateless.

use brandbot_config::ConfirmConfig;
use brandbot_core::BrandbotError;
use brandbot_core::types::{ActionButton, AssetCategory, CommandResponse, TenantId};

use crate::token::ContinuationToken;

/// Action id prefix for confirmation buttons; the scope rides after the
/// colon so the resume handler knows what to refetch.
pub const DELIVER_ACTION_PREFIX: &str = "deliver";

/// What a gated delivery covers: one asset category, or a cross-category
/// search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryScope {
    Category(AssetCategory),
    Search,
}

impl DeliveryScope {
    pub fn action_id(&self) -> String {
        let suffix = match self {
            DeliveryScope::Category(category) => category.to_string(),
            DeliveryScope::Search => "search".to_string(),
        };
        format!("{DELIVER_ACTION_PREFIX}:{suffix}")
    }

    pub fn from_action_id(action_id: &str) -> Result<Self, BrandbotError> {
        let suffix = action_id
            .strip_prefix(DELIVER_ACTION_PREFIX)
            .and_then(|s| s.strip_prefix(':'))
            .ok_or_else(|| {
                BrandbotError::Config(format!("unrecognized action id: {action_id:?}"))
            })?;
        match suffix {
            "logo" => Ok(DeliveryScope::Category(AssetCategory::Logo)),
            "color" => Ok(DeliveryScope::Category(AssetCategory::Color)),
            "font" => Ok(DeliveryScope::Category(AssetCategory::Font)),
            "search" => Ok(DeliveryScope::Search),
            other => Err(BrandbotError::Config(format!(
                "unrecognized delivery scope: {other:?}"
            ))),
        }
    }

    /// Candidate-count threshold above which confirmation is required.
    /// Search results span categories, so the tightest threshold applies.
    pub fn threshold(&self, config: &ConfirmConfig) -> usize {
        match self {
            DeliveryScope::Category(AssetCategory::Logo) => config.logo_threshold,
            DeliveryScope::Category(AssetCategory::Color) => config.color_threshold,
            DeliveryScope::Category(AssetCategory::Font) => config.font_threshold,
            DeliveryScope::Search => config
                .logo_threshold
                .min(config.color_threshold)
                .min(config.font_threshold),
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            DeliveryScope::Category(AssetCategory::Logo) => "logo",
            DeliveryScope::Category(AssetCategory::Color) => "color",
            DeliveryScope::Category(AssetCategory::Font) => "font",
            DeliveryScope::Search => "matching",
        }
    }
}

/// Whether a candidate count requires explicit confirmation first.
/// Strictly above the threshold; a count exactly at it delivers directly.
pub fn requires_confirmation(config: &ConfirmConfig, scope: DeliveryScope, count: usize) -> bool {
    count > scope.threshold(config)
}

/// Build the interactive confirmation reply for an over-threshold match.
pub fn confirmation_response(
    config: &ConfirmConfig,
    scope: DeliveryScope,
    tenant_id: TenantId,
    query: &str,
    count: usize,
) -> CommandResponse {
    let threshold = scope.threshold(config);
    let action_id = scope.action_id();

    let all_token = ContinuationToken {
        tenant_id,
        query: query.to_string(),
        limit: None,
    };
    let first_token = ContinuationToken {
        tenant_id,
        query: query.to_string(),
        limit: Some(threshold),
    };

    CommandResponse {
        text: format!(
            "That matches {count} {} assets. Deliver all of them, just the \
             first {threshold}, or narrow your query (for example `logo dark`).",
            scope.noun()
        ),
        actions: vec![
            ActionButton {
                action_id: action_id.clone(),
                label: format!("Deliver all {count}"),
                value: all_token.encode(),
            },
            ActionButton {
                action_id,
                label: format!("Deliver first {threshold}"),
                value: first_token.encode(),
            },
        ],
    }
}
