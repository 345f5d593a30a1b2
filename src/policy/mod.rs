//! The in-memory policy model both loaders resolve to.

use crate::rules::{builtin::Repo, CleanupRule};

/// One slot in a policy's rule sequence.
///
/// The repository-targeting rule supplied without arguments stays deferred
/// until the policy resolves it from its own name; downstream consumers must
/// handle both variants explicitly.
#[derive(Debug)]
pub enum PolicyRule {
    Resolved(Box<dyn CleanupRule>),
    DeferredRepo,
}

impl PolicyRule {
    pub fn is_deferred(&self) -> bool {
        matches!(self, PolicyRule::DeferredRepo)
    }
}

/// A named, ordered sequence of cleanup rules.
///
/// Rules run in sequence against the same artifact set, so document order is
/// preserved exactly.
#[derive(Debug)]
pub struct Policy {
    pub name: String,
    pub rules: Vec<PolicyRule>,
}

impl Policy {
    pub fn new(name: impl Into<String>, rules: Vec<PolicyRule>) -> Self {
        Policy {
            name: name.into(),
            rules,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn has_deferred(&self) -> bool {
        self.rules.iter().any(PolicyRule::is_deferred)
    }

    /// Replace every deferred repository rule with one bound to this
    /// policy's name.
    pub fn resolve_deferred(&mut self) {
        for slot in &mut self.rules {
            if slot.is_deferred() {
                *slot = PolicyRule::Resolved(Box::new(Repo::new(self.name.clone())));
            }
        }
    }
}

/// Connection settings for the artifact repository service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub server: String,
    pub user: String,
    pub password: String,
}
