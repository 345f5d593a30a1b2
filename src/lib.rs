pub mod config;
pub mod errors;
pub mod loaders;
pub mod observability;
pub mod policy;
pub mod rules;
pub mod schema;

pub use config::Config;
pub use errors::ConfigError;
pub use loaders::{ConnectionFlags, PolicySource, ScriptLoader, YamlConfigLoader};
pub use policy::{ConnectionInfo, Policy, PolicyRule};
pub use rules::{CleanupRule, RuleRegistry, RuleSpec};
