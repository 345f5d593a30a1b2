use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::loaders::ConnectionFlags;

/// Cleanup loader configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "artifactory-cleanup")]
#[command(about = "Declarative cleanup policies for artifact repositories")]
pub struct Config {
    /// Path to the cleanup policy YAML file
    #[arg(
        long = "config",
        default_value = "artifactory-cleanup.yaml",
        env = "ARTIFACTORY_CLEANUP_CONFIG"
    )]
    pub config_path: PathBuf,

    /// Artifactory server URL (script-defined policies only)
    #[arg(long = "artifactory-server", default_value = "", env = "ARTIFACTORY_SERVER")]
    pub artifactory_server: String,

    /// User to connect as (script-defined policies only)
    #[arg(long, default_value = "", env = "ARTIFACTORY_USER")]
    pub user: String,

    /// Password or API key (script-defined policies only)
    #[arg(long, default_value = "", env = "ARTIFACTORY_PASSWORD")]
    pub password: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,
}

impl ConnectionFlags for Config {
    fn server(&self) -> &str {
        &self.artifactory_server
    }

    fn user(&self) -> &str {
        &self.user
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn help(&self) {
        let _ = Config::command().print_help();
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            config_path: PathBuf::from("artifactory-cleanup.yaml"),
            artifactory_server: String::new(),
            user: String::new(),
            password: String::new(),
            log_level: "info".to_string(),
        }
    }
}
