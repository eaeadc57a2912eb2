use std::path::Path;

use log::debug;

use crate::{
    chart::{install_chart_repo, ChartError, ChartSource},
    checkout::{materialize, MaterializeError},
    git::{CredentialTable, FetchCache, GitRunner, SystemGit},
};

mod builder;

pub use builder::FabrikitBuilder;

/// Per-run context. Owns the fetch cache and the credential table; create it
/// once and share it by reference with everything that resolves components.
pub struct Fabrikit<R = SystemGit> {
    cache: FetchCache<R>,
}

impl Fabrikit {
    pub fn builder() -> FabrikitBuilder {
        FabrikitBuilder::default()
    }
}

impl<R: GitRunner> Fabrikit<R> {
    pub(crate) fn new(cache: FetchCache<R>) -> Self {
        Fabrikit { cache }
    }

    /// Access tokens used when cloning; register them before resolution
    /// starts.
    pub fn credentials(&self) -> &CredentialTable {
        self.cache.credentials()
    }

    pub fn cache(&self) -> &FetchCache<R> {
        &self.cache
    }

    /// Copies `repo` at `branch`/`commit` into `destination`, cloning it at
    /// most once per run
    pub async fn materialize(
        &self,
        repo: &str,
        commit: &str,
        branch: &str,
        destination: impl AsRef<Path>,
    ) -> Result<(), MaterializeError> {
        materialize(&self.cache, repo, commit, branch, destination.as_ref()).await
    }

    /// Installs the chart repository of a component below `physical_path`
    pub async fn install_chart_repo(
        &self,
        physical_path: impl AsRef<Path>,
        chart: &ChartSource,
    ) -> Result<(), ChartError> {
        install_chart_repo(&self.cache, physical_path.as_ref(), chart).await
    }

    /// Waits for outstanding clones and removes every clone directory of this
    /// run. Consumes the context, so no caller can read a removed clone.
    pub async fn cleanup(self) -> std::io::Result<()> {
        for dir in self.cache.into_clone_dirs().await {
            debug!("Removing clone {}", dir.display());
            let removed = match std::fs::remove_dir_all(&dir) {
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                otherwise => otherwise,
            };
            removed?;
        }
        Ok(())
    }
}
