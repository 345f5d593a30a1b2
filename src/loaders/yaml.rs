//! Declarative loader: policies and connection settings from a YAML file.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::errors::ConfigError;
use crate::policy::{ConnectionInfo, Policy, PolicyRule};
use crate::rules::RuleRegistry;
use crate::schema::{RootSchema, SchemaBuilder};

/// Typed outer shell of a validated document. Per-rule fields stay dynamic
/// until the matching rule type binds them.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "artifactory-cleanup")]
    config: RawConfig,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    server: String,
    user: String,
    password: String,
    policies: Vec<RawPolicy>,
}

#[derive(Debug, Deserialize)]
struct RawPolicy {
    name: String,
    rules: Vec<Mapping>,
}

/// Loads cleanup policies from a YAML document.
///
/// The schema is synthesized fresh from the registry on every load, so rules
/// registered since the previous load are reflected.
pub struct YamlConfigLoader<'r> {
    path: PathBuf,
    registry: &'r RuleRegistry,
}

impl<'r> YamlConfigLoader<'r> {
    pub fn new(path: impl Into<PathBuf>, registry: &'r RuleRegistry) -> Self {
        YamlConfigLoader {
            path: path.into(),
            registry,
        }
    }

    /// Read, parse and validate the document; an invalid document is never
    /// partially applied.
    fn load(&self) -> Result<(RawDocument, RootSchema), ConfigError> {
        let text = fs::read_to_string(&self.path)?;
        let doc: Value = serde_yaml::from_str(&text)?;
        let schema = SchemaBuilder::root_schema(self.registry);
        schema.validate(&doc)?;
        let doc = serde_yaml::from_value(doc)?;
        Ok((doc, schema))
    }

    /// Load every policy in document order, failing on the first rule whose
    /// construction is rejected.
    pub fn policies(&self) -> Result<Vec<Policy>, ConfigError> {
        let (doc, schema) = self.load()?;
        debug!(
            path = %self.path.display(),
            policies = doc.config.policies.len(),
            "configuration document validated"
        );

        let mut policies = Vec::with_capacity(doc.config.policies.len());
        for policy_data in doc.config.policies {
            let mut rules = Vec::with_capacity(policy_data.rules.len());
            for rule_data in &policy_data.rules {
                rules.push(self.build_rule(rule_data, &schema, &policy_data.name)?);
            }
            policies.push(Policy::new(policy_data.name, rules));
        }
        Ok(policies)
    }

    fn build_rule(
        &self,
        rule_data: &Mapping,
        schema: &RootSchema,
        policy: &str,
    ) -> Result<PolicyRule, ConfigError> {
        // Work on a copy so the source document is never aliased.
        let mut args = rule_data.clone();
        let rule_name = match args.remove("rule") {
            Some(Value::String(name)) => name,
            _ => {
                return Err(ConfigError::violation(
                    format!("policy '{policy}'"),
                    "rule entry is missing its discriminant",
                ))
            }
        };
        let rule_type = self.registry.get(&rule_name)?;

        // The repository rule with no explicit arguments is resolved later
        // from the policy's own name.
        if rule_type.deferrable() && args.is_empty() {
            return Ok(PolicyRule::DeferredRepo);
        }

        for field in schema.rule.fields_for(&rule_name) {
            if let Some(default) = &field.default {
                if !default.is_null() && args.get(field.name.as_str()).is_none() {
                    args.insert(Value::from(field.name.as_str()), default.clone());
                }
            }
        }

        let rule = rule_type
            .build(args)
            .map_err(|err| ConfigError::RuleConstruction {
                policy: policy.to_string(),
                rule: rule_name,
                message: err.to_string(),
            })?;
        Ok(PolicyRule::Resolved(rule))
    }

    /// Read the connection triple, expanding `$VAR`/`${VAR}` references in
    /// `user` and `password` from the process environment. Unresolved
    /// references stay literal; `server` is returned unexpanded.
    pub fn connection(&self) -> Result<ConnectionInfo, ConfigError> {
        let (doc, _) = self.load()?;
        Ok(ConnectionInfo {
            server: doc.config.server,
            user: expand_env(&doc.config.user),
            password: expand_env(&doc.config.password),
        })
    }
}

fn expand_env(value: &str) -> String {
    shellexpand::env_with_context_no_errors(value, |var| std::env::var(var).ok()).into_owned()
}
