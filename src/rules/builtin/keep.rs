use std::any::Any;

use anyhow::bail;
use serde::Deserialize;
use serde_yaml::Value;

use crate::rules::base::{CleanupRule, ParamKind, ParamSpec, RuleSpec};

fn default_count() -> i64 {
    1
}

/// Keeps the newest N files per path, removing the rest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeepLatestNFiles {
    #[serde(default = "default_count")]
    pub count: i64,
}

impl CleanupRule for KeepLatestNFiles {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RuleSpec for KeepLatestNFiles {
    const NAME: &'static str = "KeepLatestNFiles";

    fn params() -> Vec<ParamSpec> {
        vec![ParamSpec::optional(
            "count",
            ParamKind::Int,
            Value::from(default_count()),
        )]
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.count < 1 {
            bail!("count must be positive, got {}", self.count);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_defaults_to_one() {
        let rule: KeepLatestNFiles = serde_yaml::from_str("{}").unwrap();
        assert_eq!(rule.count, 1);
    }

    #[test]
    fn test_count_must_be_positive() {
        assert!(KeepLatestNFiles { count: 0 }.validate().is_err());
        assert!(KeepLatestNFiles { count: 3 }.validate().is_ok());
    }
}
