//! Authorization service
//!
//! Entry point for every check. Resolves the actor, picks the entity policy
//! for the subject, loads tokens and memberships, builds the rule list and
//! evaluates it.

pub mod decision;
pub mod metrics;

pub use decision::{Decision, DenialReason};
pub use metrics::{EngineMetrics, MetricsCollector};

use crate::config::AuthzConfig;
use crate::context::{MembershipResolver, PermissionSource};
use crate::error::{AccessDenied, Result};
use crate::policies::PolicyContext;
use crate::registry::PolicyRegistry;
use crate::rule::{first_match, first_match_any, Rule};
use crate::subject::Subject;
use crate::types::{ActorContext, MembershipSnapshot, ProjectRoles, TokenSet, UserId};

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, debug_span, error, info, warn, Instrument};
use uuid::Uuid;

/// Authorization service
///
/// # Architecture
///
/// ```text
/// ActorContext ─┐
///               ├→ PolicyRegistry → [PermissionSource ∥ MembershipResolver] → policy → rules → Decision
/// Subject ──────┘                                                                               ↓
///                                                                                          [Metrics]
/// ```
///
/// Holds no per-user state; every call re-reads tokens and memberships.
pub struct AuthorizationService {
    /// Permission token source
    permissions: Arc<dyn PermissionSource>,

    /// Organisation and project membership lookups
    memberships: Arc<dyn MembershipResolver>,

    /// Entity policies keyed by subject type
    registry: PolicyRegistry,

    /// Metrics collector
    metrics: Option<Arc<MetricsCollector>>,

    config: AuthzConfig,
}

impl AuthorizationService {
    /// Create a service over the given context sources and registry
    pub fn new(
        config: AuthzConfig,
        permissions: Arc<dyn PermissionSource>,
        memberships: Arc<dyn MembershipResolver>,
        registry: PolicyRegistry,
    ) -> Self {
        let metrics = if config.enable_metrics {
            Some(Arc::new(MetricsCollector::new()))
        } else {
            None
        };

        info!(
            "AuthorizationService initialized with {} policies, metrics={}",
            registry.len(),
            config.enable_metrics
        );

        Self {
            permissions,
            memberships,
            registry,
            metrics,
            config,
        }
    }

    /// Create a service backed by one directory serving both tokens and memberships
    pub fn with_directory<D>(config: AuthzConfig, directory: Arc<D>, registry: PolicyRegistry) -> Self
    where
        D: PermissionSource + MembershipResolver + 'static,
    {
        let permissions: Arc<dyn PermissionSource> = directory.clone();
        let memberships: Arc<dyn MembershipResolver> = directory;
        Self::new(config, permissions, memberships, registry)
    }

    /// Connect to the account database named in `config` and register every policy
    #[cfg(feature = "postgres")]
    pub async fn connect(config: AuthzConfig) -> Result<Self> {
        use crate::context::PostgresDirectory;
        use crate::error::AuthzError;

        let database = config
            .database
            .as_ref()
            .ok_or_else(|| AuthzError::Configuration("DATABASE_URL is not set".to_string()))?;
        let directory = Arc::new(PostgresDirectory::connect(database).await?);

        Ok(Self::with_directory(config, directory, PolicyRegistry::standard()))
    }

    /// Allow or deny `action` on `subject` for the actor
    ///
    /// Every failure mode, including an unregistered subject type or an
    /// unreadable membership table, surfaces as the same [`AccessDenied`].
    pub async fn authorize(
        &self,
        actor: &ActorContext,
        action: &str,
        subject: Subject<'_>,
    ) -> std::result::Result<(), AccessDenied> {
        self.decide(actor, action, subject).await.into_result()
    }

    /// Whether any of `actions` would be allowed
    ///
    /// Context is loaded once for all actions.
    pub async fn can_any(&self, actor: &ActorContext, actions: &[&str], subject: Subject<'_>) -> bool {
        let id = Uuid::new_v4();
        let span = debug_span!(
            "can_any",
            decision_id = %id,
            actor_id = ?actor.current_actor_id(),
            subject_type = %subject.subject_type()
        );

        async {
            let start = Instant::now();
            let decision = match self.build_rules(actor, subject).await {
                Ok(rules) => match first_match_any(&rules, actions, subject) {
                    Some(index) => Decision::allow(id, index, rules.len()),
                    None => Decision::deny(id, DenialReason::NoMatchingRule, rules.len()),
                },
                Err(reason) => Decision::deny(id, reason, 0),
            };

            debug!("can_any {:?} on {:?}: allowed={}", actions, subject, decision.is_allowed());
            self.finalize_decision(decision, start).await.is_allowed()
        }
        .instrument(span)
        .await
    }

    /// Permission tokens currently held by the actor; empty for anonymous requests
    pub async fn permissions(&self, actor: &ActorContext) -> Result<TokenSet> {
        match actor.current_actor_id() {
            Some(user_id) => self.permissions.tokens(user_id).await,
            None => Ok(TokenSet::new()),
        }
    }

    /// Get engine metrics
    pub async fn metrics(&self) -> Option<EngineMetrics> {
        match &self.metrics {
            Some(metrics) => Some(metrics.get_metrics().await),
            None => None,
        }
    }

    /// Export metrics in Prometheus text format
    pub async fn export_metrics(&self) -> Option<String> {
        match &self.metrics {
            Some(metrics) => Some(metrics.export_prometheus().await),
            None => None,
        }
    }

    /// Clear counters and latency samples
    pub async fn reset_metrics(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.reset().await;
        }
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AuthzConfig {
        &self.config
    }

    /// Full decision including the internal denial reason
    pub(crate) async fn decide(&self, actor: &ActorContext, action: &str, subject: Subject<'_>) -> Decision {
        let id = Uuid::new_v4();
        let span = debug_span!(
            "authorize",
            decision_id = %id,
            actor_id = ?actor.current_actor_id(),
            action = action,
            subject_type = %subject.subject_type()
        );

        async {
            let start = Instant::now();
            let decision = match self.build_rules(actor, subject).await {
                Ok(rules) => match first_match(&rules, action, subject) {
                    Some(index) => Decision::allow(id, index, rules.len()),
                    None => Decision::deny(id, DenialReason::NoMatchingRule, rules.len()),
                },
                Err(reason) => Decision::deny(id, reason, 0),
            };

            debug!(
                "Decision: {} {} on {:?} ({} rules)",
                if decision.is_allowed() { "ALLOW" } else { "DENY" },
                action,
                subject,
                decision.rule_count
            );

            self.finalize_decision(decision, start).await
        }
        .instrument(span)
        .await
    }

    // Private helper methods

    /// Resolve actor and policy, load context and run the policy
    async fn build_rules(&self, actor: &ActorContext, subject: Subject<'_>) -> std::result::Result<Vec<Rule>, DenialReason> {
        let user_id = actor.current_actor_id().ok_or_else(|| {
            debug!("No actor in request context");
            DenialReason::Unauthenticated
        })?;

        let policy = self.registry.resolve(&subject).ok_or_else(|| {
            error!(
                "No policy registered for subject type {}; denying",
                subject.subject_type()
            );
            DenialReason::NoPolicyRegistered(subject.subject_type())
        })?;

        let (tokens, membership) = self.load_context(user_id).await.map_err(|e| {
            warn!("Failed to load authorization context for user {}: {}", user_id, e);
            DenialReason::ContextUnavailable
        })?;

        debug!(
            "Loaded {} tokens, {} organisations, {} managing / {} monitoring projects",
            tokens.len(),
            membership.organisation_ids.len(),
            membership.managing_project_ids.len(),
            membership.monitoring_project_ids.len()
        );

        let ctx = PolicyContext::new(user_id, &tokens, &membership);
        Ok(policy(&ctx))
    }

    /// Token and membership reads, issued concurrently
    async fn load_context(&self, user_id: UserId) -> Result<(TokenSet, MembershipSnapshot)> {
        let (tokens, organisation_ids, managing_project_ids, monitoring_project_ids) = tokio::try_join!(
            self.permissions.tokens(user_id),
            self.memberships.organisation_ids(user_id),
            self.memberships.project_ids(user_id, ProjectRoles::MANAGING),
            self.memberships.project_ids(user_id, ProjectRoles::MONITORING),
        )?;

        Ok((
            tokens,
            MembershipSnapshot {
                organisation_ids,
                managing_project_ids,
                monitoring_project_ids,
            },
        ))
    }

    async fn finalize_decision(&self, decision: Decision, start: Instant) -> Decision {
        if let Some(metrics) = &self.metrics {
            metrics.record(decision.denial, start.elapsed()).await;
        }

        decision
    }
}
