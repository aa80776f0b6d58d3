// SPDX-FileCopyrightText: 2026 Brandbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command orchestrator.
//!
//! One handler instance serves every workspace. `handle_command` runs the
//! synchronous, time-boxed part of a command: acknowledge, resolve the
//! workspace, rate-limit, resolve intent, filter candidates, and either
//! reply immediately (help, clarification, confirmation gate) or spawn the
//! delivery as a detached task and return. The spawned task posts the
//! summary after every per-asset attempt has settled, then writes the
//! audit entry. `handle_action` resumes a gated delivery from a
//! continuation token, bypassing the gate.
//!
//! Nothing in here returns an error to the platform: every failure path
//! ends in a user-facing reply and an audit entry.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use brandbot_audit::AuditLogger;
use brandbot_classifier::HttpClassifier;
use brandbot_config::BrandbotConfig;
use brandbot_core::traits::{
    AssetStore, AuditSink, ChatClient, Clock, CommandResponder, IntentClassifier, SystemClock,
};
use brandbot_core::types::{
    AssetCandidateSet, AssetCategory, AssetId, AssetRecord, AuditLogEntry, CommandInvocation,
    CommandResponse, IntentCategory, TenantId, UserId,
};
use brandbot_core::BrandbotError;
use brandbot_delivery::{format_summary, DeliveryPipeline, DeliveryRequest};
use brandbot_intent::{CLARIFY_BELOW, IntentResolver, NOTICE_BELOW};
use brandbot_match::filter_candidates;
use brandbot_quota::{CostMonitor, RateLimiter};

use crate::confirm::{self, DeliveryScope};
use crate::token::ContinuationToken;

/// Ties the whole command pipeline together behind the platform seams.
pub struct CommandHandler {
    config: BrandbotConfig,
    chat: Arc<dyn ChatClient>,
    store: Arc<dyn AssetStore>,
    rate: Arc<RateLimiter>,
    quota: Arc<CostMonitor>,
    resolver: IntentResolver,
    pipeline: Arc<DeliveryPipeline>,
    audit: Arc<AuditLogger>,
    clock: Arc<dyn Clock>,
}

/// Everything a spawned delivery task needs, moved in wholesale.
struct DeliveryJob {
    invocation: CommandInvocation,
    responder: Arc<dyn CommandResponder>,
    tenant_id: TenantId,
    assets: Vec<AssetRecord>,
    variant: Option<String>,
    /// (delivered, total) when an explicit limit truncated the match.
    shown_of_total: Option<(usize, usize)>,
    low_confidence: bool,
}

impl CommandHandler {
    pub fn new(
        config: BrandbotConfig,
        chat: Arc<dyn ChatClient>,
        store: Arc<dyn AssetStore>,
        classifier: Option<Arc<dyn IntentClassifier>>,
        audit_sink: Option<Arc<dyn AuditSink>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, BrandbotError> {
        let pipeline = Arc::new(DeliveryPipeline::new(
            Arc::clone(&chat),
            Arc::clone(&store),
        )?);
        Ok(Self {
            rate: Arc::new(RateLimiter::new(Arc::clone(&clock))),
            quota: Arc::new(CostMonitor::new(config.quota.clone(), Arc::clone(&clock))),
            resolver: IntentResolver::new(classifier),
            audit: Arc::new(AuditLogger::new(audit_sink)),
            pipeline,
            config,
            chat,
            store,
            clock,
        })
    }

    /// Production wiring: HTTP classifier from config (when an endpoint is
    /// set) and the system clock.
    pub fn from_config(
        config: BrandbotConfig,
        chat: Arc<dyn ChatClient>,
        store: Arc<dyn AssetStore>,
        audit_sink: Option<Arc<dyn AuditSink>>,
    ) -> Result<Self, BrandbotError> {
        let classifier = HttpClassifier::from_config(&config.classifier)?
            .map(|c| Arc::new(c) as Arc<dyn IntentClassifier>);
        Self::new(config, chat, store, classifier, audit_sink, Arc::new(SystemClock))
    }

    /// Start the periodic sweep of expired rate-limit windows.
    pub fn spawn_rate_sweeper(&self, every: Duration) -> JoinHandle<()> {
        self.rate.spawn_sweeper(every)
    }

    /// Handle one inbound command.
    ///
    /// Returns the join handle of the detached delivery task when one was
    /// spawned; platform callers drop it, tests await it.
    pub async fn handle_command(
        self: &Arc<Self>,
        invocation: CommandInvocation,
        responder: Arc<dyn CommandResponder>,
    ) -> Option<JoinHandle<()>> {
        // Acknowledge before any slow work so the platform's time box
        // never expires.
        if let Err(e) = responder.acknowledge().await {
            warn!(error = %e, "command acknowledgment failed");
        }

        let workspace = match self.store.workspace(&invocation.workspace_id).await {
            Ok(Some(workspace)) => workspace,
            Ok(None) => {
                self.reply(
                    &responder,
                    CommandResponse::text(
                        "This workspace isn't registered with Brandbot. \
                         Ask your admin to connect it.",
                    ),
                )
                .await;
                self.audit_outcome(&invocation, None, Vec::new(), false, Some("workspace not found"))
                    .await;
                return None;
            }
            Err(e) => {
                warn!(error = %e, workspace = %invocation.workspace_id.0, "workspace lookup failed");
                self.reply(
                    &responder,
                    CommandResponse::text("I couldn't reach the asset store. Try again shortly."),
                )
                .await;
                self.audit_outcome(&invocation, None, Vec::new(), false, Some(&e.to_string()))
                    .await;
                return None;
            }
        };

        if !workspace.active {
            self.reply(
                &responder,
                CommandResponse::text(
                    "This workspace's Brandbot integration is deactivated. \
                     Ask your admin to re-enable it.",
                ),
            )
            .await;
            // Configuration errors stay transient in the log; even though a
            // tenant record exists, a deactivated integration should not
            // write to that tenant's audit store.
            self.audit_outcome(&invocation, None, Vec::new(), false, Some("workspace inactive"))
                .await;
            return None;
        }

        let decision = self.rate.check_and_consume(
            &invocation.workspace_id,
            self.config.limits.max_requests,
            Duration::from_secs(self.config.limits.window_secs),
        );
        if !decision.allowed {
            self.reply(
                &responder,
                CommandResponse::text(format!(
                    "You're sending commands too quickly. Try again at {}.",
                    decision.reset_at.format("%H:%M:%S UTC")
                )),
            )
            .await;
            self.audit_outcome(
                &invocation,
                Some(workspace.tenant_id),
                Vec::new(),
                false,
                Some("rate limited"),
            )
            .await;
            return None;
        }

        let all_assets = match self.fetch_all(workspace.tenant_id).await {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, tenant = %workspace.tenant_id, "asset fetch failed");
                self.reply(
                    &responder,
                    CommandResponse::text("I couldn't reach the asset store. Try again shortly."),
                )
                .await;
                self.audit_outcome(
                    &invocation,
                    Some(workspace.tenant_id),
                    Vec::new(),
                    false,
                    Some(&e.to_string()),
                )
                .await;
                return None;
            }
        };

        let intent = self
            .resolver
            .resolve(
                &invocation.text,
                &all_assets,
                &self.quota,
                &invocation.workspace_id,
            )
            .await;
        debug!(
            invocation = %invocation.id,
            category = %intent.category,
            confidence = intent.confidence,
            command = %invocation.text,
            "intent resolved"
        );

        if intent.category == IntentCategory::Help {
            self.reply(&responder, CommandResponse::text(help_text())).await;
            self.audit_outcome(&invocation, Some(workspace.tenant_id), Vec::new(), true, None)
                .await;
            return None;
        }

        if intent.confidence < CLARIFY_BELOW || intent.category == IntentCategory::Unknown {
            self.reply(
                &responder,
                CommandResponse::text(
                    "I'm not sure what you're after. Try `logo`, `colors`, `fonts`, \
                     or `search <query>` — or `help` for everything I understand.",
                ),
            )
            .await;
            self.audit_outcome(&invocation, Some(workspace.tenant_id), Vec::new(), true, None)
                .await;
            return None;
        }

        let query = intent.variant.clone().unwrap_or_default();
        let (scope, candidates) = match intent.category.asset_category() {
            Some(category) => {
                let pool = assets_of(&all_assets, category);
                (
                    DeliveryScope::Category(category),
                    filter_candidates(category, &query, pool),
                )
            }
            None => (DeliveryScope::Search, search_candidates(&all_assets, &query)),
        };

        if candidates.assets.is_empty() {
            let text = match scope {
                DeliveryScope::Category(category) => format!(
                    "No {category} assets are registered for this workspace yet."
                ),
                DeliveryScope::Search => format!(
                    "Nothing matched \"{query}\". Try `logo`, `colors`, or `fonts`."
                ),
            };
            self.reply(&responder, CommandResponse::text(text)).await;
            self.audit_outcome(&invocation, Some(workspace.tenant_id), Vec::new(), true, None)
                .await;
            return None;
        }

        let count = candidates.assets.len();
        if confirm::requires_confirmation(&self.config.confirm, scope, count) {
            let matched = ids_of(&candidates.assets);
            self.reply(
                &responder,
                confirm::confirmation_response(
                    &self.config.confirm,
                    scope,
                    workspace.tenant_id,
                    &query,
                    count,
                ),
            )
            .await;
            self.audit_outcome(&invocation, Some(workspace.tenant_id), matched, true, None)
                .await;
            return None;
        }

        Some(self.spawn_delivery(DeliveryJob {
            invocation,
            responder,
            tenant_id: workspace.tenant_id,
            assets: candidates.assets,
            variant: intent.variant,
            shown_of_total: None,
            low_confidence: intent.confidence < NOTICE_BELOW,
        }))
    }

    /// Resume a gated delivery from a confirmation button.
    ///
    /// The token is self-contained; no gate re-check, the user already
    /// chose. The workspace is still re-validated so a stale or forged
    /// token cannot cross tenants.
    pub async fn handle_action(
        self: &Arc<Self>,
        invocation: CommandInvocation,
        action_id: &str,
        token_value: &str,
        responder: Arc<dyn CommandResponder>,
    ) -> Option<JoinHandle<()>> {
        if let Err(e) = responder.acknowledge().await {
            warn!(error = %e, "action acknowledgment failed");
        }

        let parsed = DeliveryScope::from_action_id(action_id)
            .and_then(|scope| Ok((scope, ContinuationToken::decode(token_value)?)));
        let (scope, token) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, action_id, "malformed action payload");
                self.reply(
                    &responder,
                    CommandResponse::text("That button has expired. Run the command again."),
                )
                .await;
                self.audit_outcome(&invocation, None, Vec::new(), false, Some(&e.to_string()))
                    .await;
                return None;
            }
        };

        let workspace = match self.store.workspace(&invocation.workspace_id).await {
            Ok(Some(workspace)) if workspace.active => workspace,
            Ok(_) => {
                self.reply(
                    &responder,
                    CommandResponse::text("This workspace is no longer set up for Brandbot."),
                )
                .await;
                self.audit_outcome(&invocation, None, Vec::new(), false, Some("workspace unavailable"))
                    .await;
                return None;
            }
            Err(e) => {
                warn!(error = %e, workspace = %invocation.workspace_id.0, "workspace lookup failed");
                self.reply(
                    &responder,
                    CommandResponse::text("I couldn't reach the asset store. Try again shortly."),
                )
                .await;
                self.audit_outcome(&invocation, None, Vec::new(), false, Some(&e.to_string()))
                    .await;
                return None;
            }
        };

        // A token minted for one tenant must never deliver another's assets.
        if workspace.tenant_id != token.tenant_id {
            warn!(
                workspace = %invocation.workspace_id.0,
                token_tenant = %token.tenant_id,
                workspace_tenant = %workspace.tenant_id,
                "continuation token tenant mismatch"
            );
            self.reply(
                &responder,
                CommandResponse::text("That button has expired. Run the command again."),
            )
            .await;
            self.audit_outcome(
                &invocation,
                Some(workspace.tenant_id),
                Vec::new(),
                false,
                Some("continuation token tenant mismatch"),
            )
            .await;
            return None;
        }

        let candidates = match self.rebuild_candidates(workspace.tenant_id, scope, &token.query).await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, tenant = %workspace.tenant_id, "asset refetch failed");
                self.reply(
                    &responder,
                    CommandResponse::text("I couldn't reach the asset store. Try again shortly."),
                )
                .await;
                self.audit_outcome(
                    &invocation,
                    Some(workspace.tenant_id),
                    Vec::new(),
                    false,
                    Some(&e.to_string()),
                )
                .await;
                return None;
            }
        };

        let total = candidates.assets.len();
        if total == 0 {
            self.reply(
                &responder,
                CommandResponse::text("Those assets are no longer available. Run the command again."),
            )
            .await;
            self.audit_outcome(&invocation, Some(workspace.tenant_id), Vec::new(), true, None)
                .await;
            return None;
        }

        let mut assets = candidates.assets;
        if let Some(limit) = token.limit {
            assets.truncate(limit);
        }
        let shown_of_total = token.limit.map(|_| (assets.len(), total));
        let variant = if token.query.is_empty() {
            None
        } else {
            Some(token.query.clone())
        };

        Some(self.spawn_delivery(DeliveryJob {
            invocation,
            responder,
            tenant_id: workspace.tenant_id,
            assets,
            variant,
            shown_of_total,
            low_confidence: false,
        }))
    }

    /// Spawn the detached delivery task. The task owns everything it needs;
    /// it replies and audits on every path, including total failure. The
    /// work runs behind a catch-all join so a panic anywhere in it still
    /// leaves the user with a message instead of silence.
    fn spawn_delivery(self: &Arc<Self>, job: DeliveryJob) -> JoinHandle<()> {
        let handler = Arc::clone(self);
        tokio::spawn(async move {
            let user = job.invocation.user_id.clone();
            let worker = tokio::spawn({
                let handler = Arc::clone(&handler);
                async move { handler.run_delivery(job).await }
            });
            if let Err(e) = worker.await {
                error!(error = %e, user = %user.0, "delivery task aborted");
                match handler.chat.open_direct(&user).await {
                    Ok(dm) => {
                        if let Err(e) = handler
                            .chat
                            .post_message(
                                &dm,
                                "Something went wrong while delivering your assets. \
                                 Please run the command again.",
                            )
                            .await
                        {
                            warn!(error = %e, user = %user.0, "failure notice DM failed");
                        }
                    }
                    Err(e) => warn!(error = %e, user = %user.0, "could not open DM for failure notice"),
                }
            }
        })
    }

    async fn run_delivery(self: &Arc<Self>, job: DeliveryJob) {
        let matched = ids_of(&job.assets);
        let outcome = self
            .pipeline
            .deliver(DeliveryRequest {
                channel: job.invocation.channel_id.clone(),
                user: job.invocation.user_id.clone(),
                tenant_id: job.tenant_id,
                assets: job.assets,
                variant: job.variant,
            })
            .await;

        let elapsed_ms = self.elapsed_ms(&job.invocation);
        let summary = format_summary(&outcome, elapsed_ms, job.shown_of_total, job.low_confidence);
        self.reply_or_dm(&job.responder, &job.invocation.user_id, &summary)
            .await;

        let error = if outcome.all_failed() {
            Some("all deliveries failed".to_string())
        } else {
            None
        };
        self.audit
            .record(&AuditLogEntry {
                user_id: job.invocation.user_id.clone(),
                workspace_id: job.invocation.workspace_id.clone(),
                tenant_id: Some(job.tenant_id),
                command: job.invocation.text.clone(),
                matched_asset_ids: matched,
                success: !outcome.all_failed(),
                error,
                response_ms: Some(elapsed_ms),
                timestamp: self.clock.now(),
            })
            .await;
    }

    async fn fetch_all(&self, tenant_id: TenantId) -> Result<Vec<AssetRecord>, BrandbotError> {
        let mut all = Vec::new();
        for category in [AssetCategory::Logo, AssetCategory::Color, AssetCategory::Font] {
            all.extend(self.store.fetch_by_category(tenant_id, category).await?);
        }
        Ok(all)
    }

    async fn rebuild_candidates(
        &self,
        tenant_id: TenantId,
        scope: DeliveryScope,
        query: &str,
    ) -> Result<AssetCandidateSet, BrandbotError> {
        match scope {
            DeliveryScope::Category(category) => {
                let pool = self.store.fetch_by_category(tenant_id, category).await?;
                Ok(filter_candidates(category, query, pool))
            }
            DeliveryScope::Search => {
                let all = self.fetch_all(tenant_id).await?;
                Ok(search_candidates(&all, query))
            }
        }
    }

    async fn reply(&self, responder: &Arc<dyn CommandResponder>, response: CommandResponse) {
        if let Err(e) = responder.respond(&response).await {
            warn!(error = %e, "command reply failed");
        }
    }

    /// Post the summary through the responder, falling back to a direct
    /// message so the user is never left without a result.
    async fn reply_or_dm(
        &self,
        responder: &Arc<dyn CommandResponder>,
        user: &UserId,
        text: &str,
    ) {
        if responder.respond(&CommandResponse::text(text)).await.is_ok() {
            return;
        }
        warn!(user = %user.0, "summary reply failed, falling back to DM");
        match self.chat.open_direct(user).await {
            Ok(dm) => {
                if let Err(e) = self.chat.post_message(&dm, text).await {
                    warn!(error = %e, user = %user.0, "summary DM failed");
                }
            }
            Err(e) => warn!(error = %e, user = %user.0, "could not open DM for summary"),
        }
    }

    async fn audit_outcome(
        &self,
        invocation: &CommandInvocation,
        tenant_id: Option<TenantId>,
        matched_asset_ids: Vec<AssetId>,
        success: bool,
        error: Option<&str>,
    ) {
        self.audit
            .record(&AuditLogEntry {
                user_id: invocation.user_id.clone(),
                workspace_id: invocation.workspace_id.clone(),
                tenant_id,
                command: invocation.text.clone(),
                matched_asset_ids,
                success,
                error: error.map(str::to_string),
                response_ms: Some(self.elapsed_ms(invocation)),
                timestamp: self.clock.now(),
            })
            .await;
    }

    fn elapsed_ms(&self, invocation: &CommandInvocation) -> u64 {
        (self.clock.now() - invocation.received_at)
            .num_milliseconds()
            .max(0) as u64
    }
}

fn assets_of(all: &[AssetRecord], category: AssetCategory) -> Vec<AssetRecord> {
    all.iter()
        .filter(|a| a.category == category)
        .cloned()
        .collect()
}

fn ids_of(assets: &[AssetRecord]) -> Vec<AssetId> {
    assets.iter().map(|a| a.id).collect()
}

/// Cross-category search: only genuinely narrowed matches count, so an
/// unrecognized query yields an empty set rather than every asset the
/// tenant owns.
fn search_candidates(all: &[AssetRecord], query: &str) -> AssetCandidateSet {
    let mut hits = Vec::new();
    for category in [AssetCategory::Logo, AssetCategory::Color, AssetCategory::Font] {
        let pool = assets_of(all, category);
        if pool.is_empty() {
            continue;
        }
        let set = filter_candidates(category, query, pool);
        if set.narrowed {
            hits.extend(set.assets);
        }
    }
    AssetCandidateSet {
        narrowed: !hits.is_empty(),
        assets: hits,
    }
}

fn help_text() -> String {
    "Here's what I can do:\n\
     • `logo` — deliver brand logo files (`logo dark` narrows by variant)\n\
     • `colors` — send the brand color palette\n\
     • `fonts` — send brand typography details\n\
     • `search <query>` — look across every category\n\
     Large result sets ask for confirmation before anything is delivered."
        .to_string()
}
