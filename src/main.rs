use clap::Parser;
use tracing::info;

use artifactory_cleanup::config::Config;
use artifactory_cleanup::loaders::YamlConfigLoader;
use artifactory_cleanup::observability::init_tracing;
use artifactory_cleanup::rules::RuleRegistry;
use artifactory_cleanup::{ConfigError, Policy};

fn main() {
    let config = Config::parse();
    init_tracing(&config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config.config_path.display(),
        "loading cleanup policies"
    );

    let mut registry = RuleRegistry::new();
    registry.register_builtins();

    let loader = YamlConfigLoader::new(&config.config_path, &registry);
    let mut policies = match loader.policies() {
        Ok(policies) => policies,
        Err(err) => fatal(err),
    };
    let connection = match loader.connection() {
        Ok(connection) => connection,
        Err(err) => fatal(err),
    };

    info!(
        server = %connection.server,
        user = %connection.user,
        policies = policies.len(),
        "configuration loaded"
    );

    for policy in &mut policies {
        policy.resolve_deferred();
        print_policy(policy);
    }
}

fn print_policy(policy: &Policy) {
    println!("{} ({} rules)", policy.name, policy.rule_count());
    for rule in &policy.rules {
        match rule {
            artifactory_cleanup::PolicyRule::Resolved(rule) => println!("  - {:?}", rule),
            artifactory_cleanup::PolicyRule::DeferredRepo => println!("  - Repo (deferred)"),
        }
    }
}

/// Print a human-readable diagnostic and terminate with a non-zero status.
fn fatal(err: ConfigError) -> ! {
    println!("{err}");
    std::process::exit(1);
}
