//! Configuration front-ends.
//!
//! Both loaders resolve to the same in-memory policy model: the YAML loader
//! validates untyped documents against the synthesized schema, the script
//! loader accepts already-constructed policies from an external source.

pub mod script;
pub mod yaml;

pub use script::{ConnectionFlags, PolicySource, ScriptLoader};
pub use yaml::YamlConfigLoader;
