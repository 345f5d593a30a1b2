//! Script loader: policies arrive already constructed from an external
//! definition, and connection settings come from CLI flags instead of the
//! document.

use crate::errors::ConfigError;
use crate::policy::{ConnectionInfo, Policy};

/// External definition supplying already-built policies.
///
/// Locating or evaluating the definition may fail; that failure is reported
/// through the loader as a fatal configuration error.
pub trait PolicySource {
    fn policies(&self) -> anyhow::Result<Vec<Policy>>;
}

impl<F> PolicySource for F
where
    F: Fn() -> anyhow::Result<Vec<Policy>>,
{
    fn policies(&self) -> anyhow::Result<Vec<Policy>> {
        self()
    }
}

/// Connection flags supplied by the CLI collaborator.
pub trait ConnectionFlags {
    fn server(&self) -> &str;
    fn user(&self) -> &str;
    fn password(&self) -> &str;

    /// Print usage text to the operator.
    fn help(&self);
}

/// Loads policies from a [`PolicySource`], bypassing schema synthesis.
pub struct ScriptLoader<S> {
    source: S,
}

impl<S: PolicySource> ScriptLoader<S> {
    pub fn new(source: S) -> Self {
        ScriptLoader { source }
    }

    /// Pull policies from the external source, rejecting malformed items.
    ///
    /// The type system already guarantees each item is a [`Policy`]; what is
    /// left to check is that the supplied value is usable as one.
    pub fn policies(&self) -> Result<Vec<Policy>, ConfigError> {
        let policies = self
            .source
            .policies()
            .map_err(|err| ConfigError::PolicySource(err.to_string()))?;
        for policy in &policies {
            if policy.name.trim().is_empty() {
                return Err(ConfigError::MalformedPolicy(format!("{policy:?}")));
            }
        }
        Ok(policies)
    }

    /// Read the connection triple from the flag source.
    ///
    /// Each flag is checked independently so the operator learns exactly
    /// which one is missing; usage text is printed before the error returns.
    pub fn connection(&self, flags: &dyn ConnectionFlags) -> Result<ConnectionInfo, ConfigError> {
        if flags.server().is_empty() {
            flags.help();
            return Err(ConfigError::MissingCredential("--artifactory-server"));
        }
        if flags.user().is_empty() {
            flags.help();
            return Err(ConfigError::MissingCredential("--user"));
        }
        if flags.password().is_empty() {
            flags.help();
            return Err(ConfigError::MissingCredential("--password"));
        }
        Ok(ConnectionInfo {
            server: flags.server().to_string(),
            user: flags.user().to_string(),
            password: flags.password().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyRule;
    use crate::rules::builtin::{DeleteOlderThan, Repo};
    use std::cell::Cell;

    fn sample_policies() -> anyhow::Result<Vec<Policy>> {
        Ok(vec![
            Policy::new(
                "docker-local",
                vec![
                    PolicyRule::Resolved(Box::new(Repo::new("docker-local"))),
                    PolicyRule::Resolved(Box::new(DeleteOlderThan { days: 30 })),
                ],
            ),
            Policy::new("generic-local", vec![PolicyRule::DeferredRepo]),
        ])
    }

    struct TestFlags {
        server: &'static str,
        user: &'static str,
        password: &'static str,
        helped: Cell<bool>,
    }

    impl TestFlags {
        fn new(server: &'static str, user: &'static str, password: &'static str) -> Self {
            TestFlags {
                server,
                user,
                password,
                helped: Cell::new(false),
            }
        }
    }

    impl ConnectionFlags for TestFlags {
        fn server(&self) -> &str {
            self.server
        }

        fn user(&self) -> &str {
            self.user
        }

        fn password(&self) -> &str {
            self.password
        }

        fn help(&self) {
            self.helped.set(true);
        }
    }

    #[test]
    fn test_policies_pass_through_in_order() {
        let loader = ScriptLoader::new(sample_policies);
        let policies = loader.policies().unwrap();

        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0].name, "docker-local");
        assert_eq!(policies[0].rule_count(), 2);
        assert_eq!(policies[1].name, "generic-local");
    }

    #[test]
    fn test_source_failure_is_fatal() {
        let loader = ScriptLoader::new(|| -> anyhow::Result<Vec<Policy>> {
            anyhow::bail!("no module named 'policies'")
        });
        match loader.policies() {
            Err(ConfigError::PolicySource(message)) => {
                assert!(message.contains("policies"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("load unexpectedly succeeded"),
        }
    }

    #[test]
    fn test_malformed_policy_rejected() {
        let loader =
            ScriptLoader::new(|| -> anyhow::Result<Vec<Policy>> { Ok(vec![Policy::new("", vec![])]) });
        assert!(matches!(
            loader.policies(),
            Err(ConfigError::MalformedPolicy(_))
        ));
    }

    #[test]
    fn test_connection_from_flags() {
        let loader = ScriptLoader::new(sample_policies);
        let flags = TestFlags::new("https://repo.example.com", "admin", "secret");

        let connection = loader.connection(&flags).unwrap();
        assert_eq!(connection.server, "https://repo.example.com");
        assert_eq!(connection.user, "admin");
        assert_eq!(connection.password, "secret");
        assert!(!flags.helped.get());
    }

    #[test]
    fn test_each_missing_flag_identified() {
        let loader = ScriptLoader::new(sample_policies);

        let flags = TestFlags::new("", "admin", "secret");
        match loader.connection(&flags) {
            Err(ConfigError::MissingCredential(flag)) => {
                assert_eq!(flag, "--artifactory-server")
            }
            _ => panic!("expected missing server"),
        }
        assert!(flags.helped.get());

        let flags = TestFlags::new("s", "", "secret");
        match loader.connection(&flags) {
            Err(ConfigError::MissingCredential(flag)) => assert_eq!(flag, "--user"),
            _ => panic!("expected missing user"),
        }

        let flags = TestFlags::new("s", "admin", "");
        match loader.connection(&flags) {
            Err(ConfigError::MissingCredential(flag)) => assert_eq!(flag, "--password"),
            _ => panic!("expected missing password"),
        }
    }
}
