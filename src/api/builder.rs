use std::{path::PathBuf, sync::Arc};

use crate::{
    git::{CredentialTable, FetchCache, GitRunner, SystemGit},
    Fabrikit,
};

#[derive(Default)]
pub struct FabrikitBuilder {
    scratch_directory: Option<PathBuf>,
    git_binary: Option<String>,
    access_tokens: Vec<(String, String)>,
}

impl FabrikitBuilder {
    /// Directory that receives the shared clones.
    ///
    /// Defaults to the system temp directory.
    pub fn scratch_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_directory = Some(path.into());
        self
    }

    /// Git executable used for clone and checkout.
    ///
    /// Defaults to `git` from the `PATH`.
    pub fn git_binary(mut self, binary: impl Into<String>) -> Self {
        self.git_binary = Some(binary.into());
        self
    }

    /// Registers an access token for a repository URL.
    pub fn access_token(mut self, repo: impl Into<String>, token: impl Into<String>) -> Self {
        self.access_tokens.push((repo.into(), token.into()));
        self
    }

    pub fn build(self) -> Fabrikit {
        let git = SystemGit::new(self.git_binary.clone().unwrap_or_else(|| "git".to_owned()));
        self.build_with_runner(Arc::new(git))
    }

    /// Like [`FabrikitBuilder::build`], but runs git through `runner`.
    pub fn build_with_runner<R: GitRunner>(self, runner: Arc<R>) -> Fabrikit<R> {
        let Self {
            scratch_directory,
            git_binary: _,
            access_tokens,
        } = self;

        let credentials = Arc::new(CredentialTable::new());
        credentials.extend(access_tokens);

        let scratch = scratch_directory.unwrap_or_else(std::env::temp_dir);

        Fabrikit::new(FetchCache::new(runner, credentials, scratch))
    }
}
