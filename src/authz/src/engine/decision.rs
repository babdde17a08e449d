//! Decision outcomes and the internal denial taxonomy

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::error::AccessDenied;
use crate::subject::SubjectType;

/// Why a request was denied
///
/// Kept for logs and metrics only. Callers always see [`AccessDenied`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "subject_type")]
pub enum DenialReason {
    /// No actor could be resolved from the request context
    Unauthenticated,

    /// The subject type has no registered policy; a configuration gap
    NoPolicyRegistered(SubjectType),

    /// Rules were built and evaluated but none matched
    NoMatchingRule,

    /// Tokens or memberships could not be read
    ContextUnavailable,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::Unauthenticated => "unauthenticated",
            DenialReason::NoPolicyRegistered(_) => "no_policy_registered",
            DenialReason::NoMatchingRule => "no_matching_rule",
            DenialReason::ContextUnavailable => "context_unavailable",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NoPolicyRegistered(subject_type) => {
                write!(f, "no policy registered for {}", subject_type)
            }
            other => f.write_str(other.as_str()),
        }
    }
}

/// Outcome of one authorization call
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    /// Unique decision id, also recorded on the tracing span
    pub id: Uuid,

    /// Index of the matching rule in the policy's rule list when allowed
    pub matched_rule: Option<usize>,

    /// Set when denied
    pub denial: Option<DenialReason>,

    /// Number of rules the policy produced
    pub rule_count: usize,
}

impl Decision {
    pub fn allow(id: Uuid, matched_rule: usize, rule_count: usize) -> Self {
        Self {
            id,
            matched_rule: Some(matched_rule),
            denial: None,
            rule_count,
        }
    }

    pub fn deny(id: Uuid, reason: DenialReason, rule_count: usize) -> Self {
        Self {
            id,
            matched_rule: None,
            denial: Some(reason),
            rule_count,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.denial.is_none()
    }

    /// Collapse to the caller-visible result
    pub fn into_result(self) -> Result<(), AccessDenied> {
        match self.denial {
            None => Ok(()),
            Some(_) => Err(AccessDenied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_denial_looks_the_same_to_callers() {
        let reasons = [
            DenialReason::Unauthenticated,
            DenialReason::NoPolicyRegistered(SubjectType::Media),
            DenialReason::NoMatchingRule,
            DenialReason::ContextUnavailable,
        ];

        for reason in reasons {
            let result = Decision::deny(Uuid::new_v4(), reason, 0).into_result();
            assert_eq!(result, Err(AccessDenied));
        }
    }

    #[test]
    fn test_allow_decision() {
        let decision = Decision::allow(Uuid::new_v4(), 2, 5);

        assert!(decision.is_allowed());
        assert_eq!(decision.matched_rule, Some(2));
        assert!(decision.into_result().is_ok());
    }

    #[test]
    fn test_missing_policy_display_names_the_type() {
        let reason = DenialReason::NoPolicyRegistered(SubjectType::Media);
        assert_eq!(reason.to_string(), "no policy registered for Media");
        assert_eq!(reason.as_str(), "no_policy_registered");
    }
}
