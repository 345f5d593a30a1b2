use std::any::Any;

use serde::Deserialize;
use serde_yaml::Value;

use crate::rules::base::{CleanupRule, ParamKind, ParamSpec, RuleSpec};
use crate::schema::{ConditionalField, ValueCheck};

/// Targets the repository a policy cleans.
///
/// When a document supplies this rule with no arguments, instantiation is
/// deferred and the owning policy's name becomes the repository name.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Repo {
    pub name: String,
}

impl Repo {
    pub fn new(name: impl Into<String>) -> Self {
        Repo { name: name.into() }
    }
}

impl CleanupRule for Repo {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RuleSpec for Repo {
    const NAME: &'static str = "Repo";

    fn params() -> Vec<ParamSpec> {
        vec![ParamSpec::required("name", ParamKind::Str)]
    }

    // The constructor requires `name`, but documents may omit it entirely to
    // defer resolution to the policy name, so the document-level field is
    // optional. A plain parameter list cannot express that.
    fn schema_override() -> Option<Vec<ConditionalField>> {
        Some(vec![ConditionalField::optional(
            "name",
            ValueCheck::Str,
            Value::Null,
            Self::NAME,
        )])
    }

    fn defers_to_policy_name() -> bool {
        true
    }
}

/// Targets every repository whose name matches a wildcard mask.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoByMask {
    pub mask: String,
}

impl CleanupRule for RepoByMask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RuleSpec for RepoByMask {
    const NAME: &'static str = "RepoByMask";

    fn params() -> Vec<ParamSpec> {
        vec![ParamSpec::required("mask", ParamKind::Str)]
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.mask.is_empty() {
            anyhow::bail!("mask must not be empty");
        }
        Ok(())
    }
}
