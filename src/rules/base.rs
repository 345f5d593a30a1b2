//! The contract every pluggable rule type satisfies.

use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::schema::ConditionalField;

/// Declared scalar shape of a rule constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Str,
    /// Untyped or complex-shaped parameter; accepted unchecked.
    Any,
}

/// One constructor parameter of a rule type: the field-descriptor list built
/// from these drives schema synthesis, so adding a rule type never requires
/// hand-writing a validation schema.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    /// `Some` makes the field optional-with-default in documents.
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind) -> Self {
        ParamSpec {
            name,
            kind,
            default: None,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, default: impl Into<Value>) -> Self {
        ParamSpec {
            name,
            kind,
            default: Some(default.into()),
        }
    }
}

/// A rule instance with its constructor arguments bound.
///
/// Execution against the artifact repository lives outside this crate; the
/// executor downcasts through [`CleanupRule::as_any`] to reach the concrete
/// rule it understands.
pub trait CleanupRule: Debug + Send + Sync {
    /// The registered name of the rule type this instance belongs to.
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

/// Declared capability of a pluggable rule type.
///
/// Implementors are plain deserializable structs; [`RuleFactory`] adapts them
/// into the object-safe [`RuleType`] held by the registry.
pub trait RuleSpec: CleanupRule + DeserializeOwned + Sized + 'static {
    /// Unique, stable registration name.
    const NAME: &'static str;

    /// Constructor parameter descriptors, in declaration order.
    fn params() -> Vec<ParamSpec>;

    /// Hand-authored schema fields, bypassing synthesis from [`Self::params`].
    ///
    /// Escape hatch for rule types whose accepted shape a plain parameter
    /// list cannot express, such as union-typed or variable-length arguments.
    fn schema_override() -> Option<Vec<ConditionalField>> {
        None
    }

    /// True for the rule whose argument falls back to the owning policy's
    /// name when a document supplies no explicit arguments.
    fn defers_to_policy_name() -> bool {
        false
    }

    /// Semantic validation after the arguments are bound.
    fn validate(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Object-safe view of a rule type, as held by the registry.
pub trait RuleType: Send + Sync {
    fn name(&self) -> &'static str;
    fn params(&self) -> Vec<ParamSpec>;
    fn schema_override(&self) -> Option<Vec<ConditionalField>>;
    fn deferrable(&self) -> bool;

    /// Bind the given named arguments into a rule instance.
    ///
    /// Arguments arrive with the discriminant already removed and declared
    /// defaults already applied. Unknown fields and semantically invalid
    /// values are rejected here.
    fn build(&self, args: Mapping) -> anyhow::Result<Box<dyn CleanupRule>>;
}

/// Adapter turning any [`RuleSpec`] into a registrable [`RuleType`].
pub struct RuleFactory<R: RuleSpec> {
    _marker: PhantomData<R>,
}

impl<R: RuleSpec> RuleFactory<R> {
    pub fn new() -> Self {
        RuleFactory {
            _marker: PhantomData,
        }
    }
}

impl<R: RuleSpec> Default for RuleFactory<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RuleSpec> RuleType for RuleFactory<R> {
    fn name(&self) -> &'static str {
        R::NAME
    }

    fn params(&self) -> Vec<ParamSpec> {
        R::params()
    }

    fn schema_override(&self) -> Option<Vec<ConditionalField>> {
        R::schema_override()
    }

    fn deferrable(&self) -> bool {
        R::defers_to_policy_name()
    }

    fn build(&self, args: Mapping) -> anyhow::Result<Box<dyn CleanupRule>> {
        let rule: R = serde_yaml::from_value(Value::Mapping(args))?;
        rule.validate()?;
        Ok(Box::new(rule))
    }
}
