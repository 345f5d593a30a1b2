use thiserror::Error;

/// Errors produced while loading cleanup configuration.
///
/// Every variant is fatal to the load in progress; the only non-fatal
/// diagnostic in this crate is the registry's duplicate-name warning.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document does not match the schema synthesized from the registry.
    #[error("invalid config at {path}: {expected}")]
    SchemaViolation { path: String, expected: String },

    /// A rule name absent from the registry. Schema validation restricts the
    /// discriminant to registered names, so this only surfaces on direct
    /// registry lookups.
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    /// A rule type rejected the supplied arguments.
    #[error("failed to initialize '{rule}' in {policy}: {message}")]
    RuleConstruction {
        policy: String,
        rule: String,
        message: String,
    },

    /// A script-supplied item is not a well-formed policy.
    #[error("policy '{0}' is not a valid cleanup policy, check it please")]
    MalformedPolicy(String),

    /// The external policy definition could not be located or loaded.
    #[error("failed to load policy source: {0}")]
    PolicySource(String),

    /// A connection flag required by the script path is absent or empty.
    #[error("{0} is required for script-defined policies")]
    MissingCredential(&'static str),
}

impl ConfigError {
    pub fn violation(path: impl Into<String>, expected: impl Into<String>) -> Self {
        ConfigError::SchemaViolation {
            path: path.into(),
            expected: expected.into(),
        }
    }
}
