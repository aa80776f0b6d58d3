// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Continuation tokens for interactive confirmation buttons.
//!
//! The token is an opaque string round-tripped through the chat platform's
//! action payload. It carries everything needed to resume a gated delivery
//! without server-side session state: the tenant, the narrowing query, and
//! an optional result limit. The asset category travels separately on the
//! action id.

use brandbot_core::BrandbotError;
use brandbot_core::types::TenantId;

/// State needed to resume a confirmed delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken {
    pub tenant_id: TenantId,
    /// Variant or search query the candidates were narrowed with. May be
    /// empty for whole-category lookups.
    pub query: String,
    /// Cap on how many candidates to deliver. `None` delivers all.
    pub limit: Option<usize>,
}

impl ContinuationToken {
    /// Encode as `tenant|query|limit`, with `all` standing in for no limit.
    ///
    /// Pipes never occur in tenant ids or limits; any pipe in the query is
    /// flattened to a space so the token stays three fields.
    pub fn encode(&self) -> String {
        let limit = match self.limit {
            Some(n) => n.to_string(),
            None => "all".to_string(),
        };
        format!("{}|{}|{limit}", self.tenant_id.0, self.query.replace('|', " "))
    }

    pub fn decode(raw: &str) -> Result<Self, BrandbotError> {
        let mut parts = raw.splitn(3, '|');
        let (Some(tenant), Some(query), Some(limit)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(BrandbotError::Config(format!(
                "malformed continuation token: {raw:?}"
            )));
        };

        let tenant_id = tenant.parse::<i64>().map_err(|_| {
            BrandbotError::Config(format!("bad tenant in continuation token: {tenant:?}"))
        })?;
        let limit = match limit {
            "all" => None,
            n => Some(n.parse::<usize>().map_err(|_| {
                BrandbotError::Config(format!("bad limit in continuation token: {n:?}"))
            })?),
        };

        Ok(Self {
            tenant_id: TenantId(tenant_id),
            query: query.to_string(),
            limit,
        })
    }
}
