use std::{
    future::Future,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use super::{
    cache::FetchCache,
    credentials::CredentialTable,
    runner::{GitInvocation, GitRunner, RunnerError},
};

/// A cache over `git` with its own scratch directory, dropped with the
/// returned guard.
pub fn fake_cache(git: FakeGit) -> (Arc<FakeGit>, FetchCache<FakeGit>, tempfile::TempDir) {
    let scratch = tempfile::tempdir().unwrap();
    let git = Arc::new(git);
    let cache = FetchCache::new(
        git.clone(),
        Arc::new(CredentialTable::new()),
        scratch.path().to_path_buf(),
    );
    (git, cache, scratch)
}

/// Records invocations and fakes a clone by writing a file into the target
/// directory.
#[derive(Default)]
pub struct FakeGit {
    invocations: Mutex<Vec<GitInvocation>>,
    fail_clone: bool,
    fail_checkout: bool,
    panic_on_clone: bool,
}

impl FakeGit {
    pub fn failing_clone() -> Self {
        FakeGit {
            fail_clone: true,
            ..Default::default()
        }
    }

    /// Clones successfully, then rejects the commit.
    pub fn failing_checkout() -> Self {
        FakeGit {
            fail_checkout: true,
            ..Default::default()
        }
    }

    pub fn panicking() -> Self {
        FakeGit {
            panic_on_clone: true,
            ..Default::default()
        }
    }

    pub fn invocations(&self) -> Vec<GitInvocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.invocations()
            .iter()
            .filter(|invocation| invocation.operation() == operation)
            .count()
    }
}

impl GitRunner for FakeGit {
    fn run(
        &self,
        invocation: GitInvocation,
    ) -> impl Future<Output = Result<(), RunnerError>> + Send {
        self.invocations.lock().unwrap().push(invocation.clone());
        let (fail_clone, fail_checkout, panic_on_clone) =
            (self.fail_clone, self.fail_checkout, self.panic_on_clone);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let failure = |stderr: &str| RunnerError::Status {
                operation: invocation.operation().to_owned(),
                status: "exit status: 128".to_owned(),
                stderr: stderr.to_owned(),
            };
            match invocation.operation() {
                "clone" if panic_on_clone => panic!("clone worker crashed"),
                "clone" if fail_clone => Err(failure(
                    "fatal: could not read Username for 'https://TOK@github.com'",
                )),
                "clone" => {
                    let target = PathBuf::from(invocation.args.last().unwrap());
                    std::fs::create_dir_all(target.join("templates")).unwrap();
                    std::fs::write(target.join("README.md"), "hello").unwrap();
                    std::fs::write(target.join("templates/deployment.yaml"), "kind: Deployment")
                        .unwrap();
                    Ok(())
                }
                "checkout" if fail_checkout => Err(failure("fatal: reference is not a tree")),
                _ => Ok(()),
            }
        }
    }
}
