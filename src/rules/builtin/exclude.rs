use std::any::Any;

use anyhow::bail;
use serde::{Deserialize, Deserializer};

use crate::rules::base::{CleanupRule, ParamSpec, RuleSpec};
use crate::schema::{ConditionalField, ValueCheck};

/// Excludes paths matching the given masks from cleanup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludePath {
    #[serde(deserialize_with = "string_or_seq")]
    pub masks: Vec<String>,
}

/// Accepts either a single mask or a list of masks.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(mask) => vec![mask],
        OneOrMany::Many(masks) => masks,
    })
}

impl CleanupRule for ExcludePath {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RuleSpec for ExcludePath {
    const NAME: &'static str = "ExcludePath";

    fn params() -> Vec<ParamSpec> {
        Vec::new()
    }

    // `masks` is a union of string and list-of-strings, which a plain
    // parameter list cannot express.
    fn schema_override() -> Option<Vec<ConditionalField>> {
        Some(vec![ConditionalField::required(
            "masks",
            ValueCheck::Any,
            Self::NAME,
        )])
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.masks.is_empty() {
            bail!("masks must not be empty");
        }
        if self.masks.iter().any(|mask| mask.is_empty()) {
            bail!("masks must not contain empty entries");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_single_mask() {
        let rule: ExcludePath = serde_yaml::from_str("masks: \"*.tar.gz\"").unwrap();
        assert_eq!(rule.masks, vec!["*.tar.gz"]);
    }

    #[test]
    fn test_accepts_mask_list() {
        let rule: ExcludePath = serde_yaml::from_str("masks: [\"*.zip\", \"*.jar\"]").unwrap();
        assert_eq!(rule.masks, vec!["*.zip", "*.jar"]);
    }

    #[test]
    fn test_rejects_empty_masks() {
        let rule = ExcludePath { masks: vec![] };
        assert!(rule.validate().is_err());

        let rule = ExcludePath {
            masks: vec![String::new()],
        };
        assert!(rule.validate().is_err());
    }
}
