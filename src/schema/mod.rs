//! Schema synthesis and document validation.
//!
//! The schema for a cleanup document is never written by hand: it is derived
//! from the parameter descriptors each registered rule type declares. One
//! discriminant field (`rule`) selects the rule variant; every other field on
//! a rule entry is validity-gated on the discriminant matching the variant
//! that declared it.

use serde_yaml::{Mapping, Sequence, Value};

use crate::errors::ConfigError;
use crate::rules::{ParamKind, RuleRegistry};

/// Value checker applied to a single document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCheck {
    Int,
    Str,
    /// Unconstrained; covers union-shaped and complex parameters.
    Any,
}

impl ValueCheck {
    /// Check a scalar, returning an expectation description on mismatch.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            ValueCheck::Int if !value.is_i64() => {
                Err(format!("expected an integer, got {}", type_name(value)))
            }
            ValueCheck::Str if !value.is_string() => {
                Err(format!("expected a string, got {}", type_name(value)))
            }
            _ => Ok(()),
        }
    }
}

impl From<ParamKind> for ValueCheck {
    fn from(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Int => ValueCheck::Int,
            ParamKind::Str => ValueCheck::Str,
            ParamKind::Any => ValueCheck::Any,
        }
    }
}

/// A field descriptor active only when the discriminant equals `rule_name`.
///
/// `default: None` makes the field required for that variant. A `Some(Null)`
/// default marks the field optional without substituting a value when absent.
#[derive(Debug, Clone)]
pub struct ConditionalField {
    pub name: String,
    pub check: ValueCheck,
    pub default: Option<Value>,
    pub rule_name: String,
}

impl ConditionalField {
    pub fn required(name: &str, check: ValueCheck, rule_name: &str) -> Self {
        ConditionalField {
            name: name.to_string(),
            check,
            default: None,
            rule_name: rule_name.to_string(),
        }
    }

    pub fn optional(name: &str, check: ValueCheck, default: Value, rule_name: &str) -> Self {
        ConditionalField {
            name: name.to_string(),
            check,
            default: Some(default),
            rule_name: rule_name.to_string(),
        }
    }
}

/// Validation schema for one rule entry: the discriminant plus the union of
/// every registered rule type's conditional fields.
#[derive(Debug, Clone)]
pub struct RuleSchema {
    pub allowed: Vec<String>,
    pub fields: Vec<ConditionalField>,
}

impl RuleSchema {
    /// Fields gated on the given rule name, in declaration order.
    pub fn fields_for<'a>(&'a self, rule_name: &'a str) -> impl Iterator<Item = &'a ConditionalField> {
        self.fields.iter().filter(move |f| f.rule_name == rule_name)
    }

    fn validate(&self, value: &Value, path: &str) -> Result<(), ConfigError> {
        let map = as_mapping(value, path)?;
        let rule_path = format!("{path}.rule");
        let discriminant = map
            .get("rule")
            .ok_or_else(|| ConfigError::violation(rule_path.clone(), "missing required field"))?;
        let rule_name = discriminant
            .as_str()
            .ok_or_else(|| ConfigError::violation(rule_path.clone(), "expected a string"))?;
        if !self.allowed.iter().any(|name| name == rule_name) {
            return Err(ConfigError::violation(
                rule_path,
                format!(
                    "'{rule_name}' is not a registered rule, expected one of: {}",
                    self.allowed.join(", ")
                ),
            ));
        }
        for field in self.fields_for(rule_name) {
            match map.get(field.name.as_str()) {
                Some(value) => field
                    .check
                    .check(value)
                    .map_err(|expected| {
                        ConfigError::violation(format!("{path}.{}", field.name), expected)
                    })?,
                None if field.default.is_none() => {
                    return Err(ConfigError::violation(
                        format!("{path}.{}", field.name),
                        "missing required field",
                    ));
                }
                None => {}
            }
        }
        Ok(())
    }
}

/// Document-level schema: the fixed outer layers wrapping [`RuleSchema`].
#[derive(Debug, Clone)]
pub struct RootSchema {
    pub rule: RuleSchema,
}

impl RootSchema {
    /// Validate a whole document, reporting the first offending field path.
    pub fn validate(&self, doc: &Value) -> Result<(), ConfigError> {
        let root = as_mapping(doc, "<document>")?;
        let config = required(root, "artifactory-cleanup", "")?;
        let config = as_mapping(config, "artifactory-cleanup")?;

        for key in ["server", "user", "password"] {
            let path = format!("artifactory-cleanup.{key}");
            let value = required(config, key, "artifactory-cleanup")?;
            ValueCheck::Str
                .check(value)
                .map_err(|expected| ConfigError::violation(path, expected))?;
        }

        let policies = required(config, "policies", "artifactory-cleanup")?;
        let policies = as_sequence(policies, "artifactory-cleanup.policies")?;
        for (i, policy) in policies.iter().enumerate() {
            let policy_path = format!("artifactory-cleanup.policies[{i}]");
            self.validate_policy(policy, &policy_path)?;
        }
        Ok(())
    }

    fn validate_policy(&self, value: &Value, path: &str) -> Result<(), ConfigError> {
        let map = as_mapping(value, path)?;
        let name = required(map, "name", path)?;
        ValueCheck::Str
            .check(name)
            .map_err(|expected| ConfigError::violation(format!("{path}.name"), expected))?;
        let rules = required(map, "rules", path)?;
        let rules = as_sequence(rules, &format!("{path}.rules"))?;
        for (i, rule) in rules.iter().enumerate() {
            self.rule.validate(rule, &format!("{path}.rules[{i}]"))?;
        }
        Ok(())
    }
}

/// Synthesizes a [`RootSchema`] from the live registry.
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Build the document schema from the registry's current contents.
    ///
    /// A pure read: the registry is never mutated, and nothing is cached, so
    /// rules registered between loads are reflected on the next call.
    pub fn root_schema(registry: &RuleRegistry) -> RootSchema {
        let mut fields = Vec::new();
        for (name, rule_type) in registry.iter() {
            match rule_type.schema_override() {
                Some(overridden) => fields.extend(overridden),
                None => {
                    for param in rule_type.params() {
                        let check = ValueCheck::from(param.kind);
                        fields.push(match param.default {
                            Some(default) => {
                                ConditionalField::optional(param.name, check, default, name)
                            }
                            None => ConditionalField::required(param.name, check, name),
                        });
                    }
                }
            }
        }
        RootSchema {
            rule: RuleSchema {
                allowed: registry.names(),
                fields,
            },
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn as_mapping<'a>(value: &'a Value, path: &str) -> Result<&'a Mapping, ConfigError> {
    value
        .as_mapping()
        .ok_or_else(|| ConfigError::violation(path, format!("expected a mapping, got {}", type_name(value))))
}

fn as_sequence<'a>(value: &'a Value, path: &str) -> Result<&'a Sequence, ConfigError> {
    value
        .as_sequence()
        .ok_or_else(|| ConfigError::violation(path, format!("expected a list, got {}", type_name(value))))
}

fn required<'a>(map: &'a Mapping, key: &str, parent: &str) -> Result<&'a Value, ConfigError> {
    map.get(key).ok_or_else(|| {
        let path = if parent.is_empty() {
            key.to_string()
        } else {
            format!("{parent}.{key}")
        };
        ConfigError::violation(path, "missing required field")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleRegistry;

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.register_builtins();
        registry
    }

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    const MINIMAL: &str = r#"
artifactory-cleanup:
  server: "https://repo.example.com/artifactory"
  user: "admin"
  password: "secret"
  policies:
    - name: "docker-local"
      rules:
        - rule: Repo
        - rule: DeleteOlderThan
          days: 30
"#;

    #[test]
    fn test_minimal_document_accepted() {
        let schema = SchemaBuilder::root_schema(&registry());
        schema.validate(&doc(MINIMAL)).unwrap();
    }

    #[test]
    fn test_missing_credential_field_rejected() {
        let schema = SchemaBuilder::root_schema(&registry());
        let yaml = MINIMAL.replace("  user: \"admin\"\n", "");
        let err = schema.validate(&doc(&yaml)).unwrap_err();
        match err {
            ConfigError::SchemaViolation { path, .. } => {
                assert_eq!(path, "artifactory-cleanup.user");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_required_rule_field_rejected() {
        let schema = SchemaBuilder::root_schema(&registry());
        let yaml = MINIMAL.replace("          days: 30\n", "");
        let err = schema.validate(&doc(&yaml)).unwrap_err();
        match err {
            ConfigError::SchemaViolation { path, expected } => {
                assert_eq!(path, "artifactory-cleanup.policies[0].rules[1].days");
                assert!(expected.contains("missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_discriminant_rejected() {
        let schema = SchemaBuilder::root_schema(&registry());
        let yaml = MINIMAL.replace("rule: DeleteOlderThan", "rule: Nope");
        let err = schema.validate(&doc(&yaml)).unwrap_err();
        match err {
            ConfigError::SchemaViolation { path, expected } => {
                assert_eq!(path, "artifactory-cleanup.policies[0].rules[1].rule");
                assert!(expected.contains("Nope"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_mismatch_names_field_path() {
        let schema = SchemaBuilder::root_schema(&registry());
        let yaml = MINIMAL.replace("days: 30", "days: \"abc\"");
        let err = schema.validate(&doc(&yaml)).unwrap_err();
        match err {
            ConfigError::SchemaViolation { path, expected } => {
                assert_eq!(path, "artifactory-cleanup.policies[0].rules[1].days");
                assert!(expected.contains("integer"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_field_may_be_omitted() {
        let schema = SchemaBuilder::root_schema(&registry());
        let yaml = MINIMAL.replace(
            "        - rule: DeleteOlderThan\n          days: 30\n",
            "        - rule: KeepLatestNFiles\n",
        );
        schema.validate(&doc(&yaml)).unwrap();
    }

    #[test]
    fn test_schema_reflects_registry_contents() {
        let empty = RuleRegistry::new();
        let schema = SchemaBuilder::root_schema(&empty);
        assert!(schema.rule.allowed.is_empty());
        assert!(schema.rule.fields.is_empty());

        let schema = SchemaBuilder::root_schema(&registry());
        assert!(schema.rule.allowed.iter().any(|n| n == "Repo"));
        assert!(schema
            .rule
            .fields_for("DeleteOlderThan")
            .any(|f| f.name == "days" && f.check == ValueCheck::Int && f.default.is_none()));
        assert!(schema
            .rule
            .fields_for("KeepLatestNFiles")
            .any(|f| f.name == "count" && f.default.is_some()));
    }
}
