use std::any::Any;

use anyhow::bail;
use serde::Deserialize;

use crate::rules::base::{CleanupRule, ParamKind, ParamSpec, RuleSpec};

/// Removes artifacts older than the given number of days.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteOlderThan {
    pub days: i64,
}

impl CleanupRule for DeleteOlderThan {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RuleSpec for DeleteOlderThan {
    const NAME: &'static str = "DeleteOlderThan";

    fn params() -> Vec<ParamSpec> {
        vec![ParamSpec::required("days", ParamKind::Int)]
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.days < 1 {
            bail!("days must be positive, got {}", self.days);
        }
        Ok(())
    }
}

/// Removes artifacts that have never been downloaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteWithoutDownloads {}

impl CleanupRule for DeleteWithoutDownloads {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RuleSpec for DeleteWithoutDownloads {
    const NAME: &'static str = "DeleteWithoutDownloads";

    fn params() -> Vec<ParamSpec> {
        Vec::new()
    }
}

/// Removes artifacts older than N days that have never been downloaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteOlderThanNDaysWithoutDownloads {
    pub days: i64,
}

impl CleanupRule for DeleteOlderThanNDaysWithoutDownloads {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RuleSpec for DeleteOlderThanNDaysWithoutDownloads {
    const NAME: &'static str = "DeleteOlderThanNDaysWithoutDownloads";

    fn params() -> Vec<ParamSpec> {
        vec![ParamSpec::required("days", ParamKind::Int)]
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.days < 1 {
            bail!("days must be positive, got {}", self.days);
        }
        Ok(())
    }
}

/// Removes folders left empty after artifact deletion.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteEmptyFolders {}

impl CleanupRule for DeleteEmptyFolders {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RuleSpec for DeleteEmptyFolders {
    const NAME: &'static str = "DeleteEmptyFolders";

    fn params() -> Vec<ParamSpec> {
        Vec::new()
    }
}
