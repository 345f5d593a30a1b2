pub mod base;
pub mod builtin;

pub use base::{CleanupRule, ParamKind, ParamSpec, RuleFactory, RuleSpec, RuleType};
pub use builtin::{
    DeleteEmptyFolders, DeleteOlderThan, DeleteOlderThanNDaysWithoutDownloads,
    DeleteWithoutDownloads, ExcludePath, KeepLatestNFiles, Repo, RepoByMask,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::errors::ConfigError;

/// Mapping from rule name to rule type.
///
/// An explicit value, constructed at startup and passed by reference into the
/// schema builder and loaders. All registration must complete before either
/// loader runs; mutation after a schema has been synthesized is unsupported.
///
/// Ordered by name so synthesized schemas are deterministic.
pub struct RuleRegistry {
    rules: BTreeMap<String, Arc<dyn RuleType>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        RuleRegistry {
            rules: BTreeMap::new(),
        }
    }

    /// Insert a rule type under `name_override`, or its own name.
    ///
    /// First registration wins: a colliding name leaves the existing entry
    /// untouched. With `warn_on_conflict` the collision is logged; without,
    /// it is skipped silently (bulk built-in registration).
    pub fn register(
        &mut self,
        rule_type: Arc<dyn RuleType>,
        name_override: Option<&str>,
        warn_on_conflict: bool,
    ) {
        let name = name_override.unwrap_or_else(|| rule_type.name());
        if self.rules.contains_key(name) {
            if warn_on_conflict {
                warn!(rule = name, "rule with this name has been registered before");
            }
            return;
        }
        self.rules.insert(name.to_string(), rule_type);
    }

    /// Register a [`RuleSpec`] under its declared name.
    pub fn register_spec<R: RuleSpec>(&mut self) {
        self.register(Arc::new(RuleFactory::<R>::new()), None, true);
    }

    /// Register every built-in rule type, silently skipping duplicates.
    pub fn register_builtins(&mut self) {
        self.register(Arc::new(RuleFactory::<Repo>::new()), None, false);
        self.register(Arc::new(RuleFactory::<RepoByMask>::new()), None, false);
        self.register(Arc::new(RuleFactory::<DeleteOlderThan>::new()), None, false);
        self.register(
            Arc::new(RuleFactory::<DeleteWithoutDownloads>::new()),
            None,
            false,
        );
        self.register(
            Arc::new(RuleFactory::<DeleteOlderThanNDaysWithoutDownloads>::new()),
            None,
            false,
        );
        self.register(Arc::new(RuleFactory::<DeleteEmptyFolders>::new()), None, false);
        self.register(Arc::new(RuleFactory::<KeepLatestNFiles>::new()), None, false);
        self.register(Arc::new(RuleFactory::<ExcludePath>::new()), None, false);
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn RuleType>, ConfigError> {
        self.rules
            .get(name)
            .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))
    }

    /// Registered `(name, rule type)` pairs, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn RuleType>)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Registered names, ordered.
    pub fn names(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtins() {
        let mut registry = RuleRegistry::new();
        registry.register_builtins();

        assert_eq!(registry.len(), 8);
        assert!(registry.get("Repo").is_ok());
        assert!(registry.get("DeleteOlderThan").is_ok());
    }

    #[test]
    fn test_unknown_rule_lookup_fails() {
        let registry = RuleRegistry::new();
        match registry.get("Nope") {
            Err(ConfigError::UnknownRule(name)) => assert_eq!(name, "Nope"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("lookup unexpectedly succeeded"),
        }
    }

    #[test]
    fn test_first_registration_wins_on_conflict() {
        let mut registry = RuleRegistry::new();
        registry.register(Arc::new(RuleFactory::<Repo>::new()), Some("Dup"), true);
        registry.register(
            Arc::new(RuleFactory::<DeleteOlderThan>::new()),
            Some("Dup"),
            true,
        );

        assert_eq!(registry.len(), 1);
        let kept = registry.get("Dup").unwrap();
        assert_eq!(kept.name(), Repo::NAME);
    }

    #[test]
    fn test_silent_skip_without_warning() {
        let mut registry = RuleRegistry::new();
        registry.register_builtins();
        let before = registry.len();

        // A second bulk pass must not grow the registry or replace entries.
        registry.register_builtins();
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_name_override() {
        let mut registry = RuleRegistry::new();
        registry.register(Arc::new(RuleFactory::<Repo>::new()), Some("Target"), true);

        assert!(registry.get("Target").is_ok());
        assert!(registry.get("Repo").is_err());
    }
}
