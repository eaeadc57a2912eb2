pub mod cache;
pub mod credentials;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{FetchCache, FetchError, FetchHandle, FetchResult, Identity};
pub use credentials::CredentialTable;
pub use runner::{GitInvocation, GitRunner, RunnerError, SystemGit};
