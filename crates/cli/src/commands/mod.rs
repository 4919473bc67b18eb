pub mod add;
pub mod clear;
pub mod hook;
pub mod install;
pub mod jump;
pub mod list;
pub mod setup;
pub mod status;

use crate::config::Config;
use crate::error::CliError;
use crate::output::Output;
use crate::repo::GitRepo;
use crate::util::with_busy_retry;
use hop_storage::{ProjectRow, SqliteStore};

/// Shared command environment: resolved configuration plus the console.
/// Store and repository handles are opened per command, never ambiently.
pub struct Context {
    pub config: Config,
    pub output: Output,
}

impl Context {
    pub fn open_store(&self) -> Result<SqliteStore, CliError> {
        Ok(SqliteStore::open(self.config.database_path())?)
    }

    pub fn repo(&self) -> Result<GitRepo, CliError> {
        Ok(GitRepo::discover()?)
    }

    pub fn project(
        &self,
        store: &mut SqliteStore,
        repo: &GitRepo,
    ) -> Result<ProjectRow, CliError> {
        let path = repo.root().to_string_lossy().into_owned();
        let basename = repo.basename();
        Ok(with_busy_retry(|| {
            store.find_or_create_project(&path, &basename)
        })?)
    }
}
