//! Built-in cleanup rule types.

mod delete;
mod exclude;
mod keep;
mod repo;

pub use delete::{
    DeleteEmptyFolders, DeleteOlderThan, DeleteOlderThanNDaysWithoutDownloads,
    DeleteWithoutDownloads,
};
pub use exclude::ExcludePath;
pub use keep::KeepLatestNFiles;
pub use repo::{Repo, RepoByMask};
