use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::{
    checkout::{materialize, MaterializeError},
    git::{FetchCache, GitRunner},
};

const CHART_REPOS_DIR: &str = "helm_repos";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Could not prepare chart repository directory {path}: {source}")]
    Prepare {
        path: String,
        source: std::io::Error,
    },
    #[error("Error while installing chart repository {repo} for {name}: {source}")]
    Install {
        name: String,
        repo: String,
        source: MaterializeError,
    },
}

/// Where a component's chart lives. An empty `repo` means the chart is part
/// of the component itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSource {
    pub name: String,
    pub repo: String,
    pub branch: String,
    pub commit: String,
}

pub fn chart_repo_path(physical_path: &Path, chart: &ChartSource) -> PathBuf {
    if chart.repo.is_empty() {
        physical_path.to_path_buf()
    } else {
        physical_path.join(CHART_REPOS_DIR).join(&chart.name)
    }
}

/// Replaces any previous checkout of the chart repository below
/// `physical_path` with a fresh copy from the fetch cache.
pub async fn install_chart_repo<R: GitRunner>(
    cache: &FetchCache<R>,
    physical_path: &Path,
    chart: &ChartSource,
) -> Result<(), ChartError> {
    if chart.repo.is_empty() {
        return Ok(());
    }

    let repo_path = chart_repo_path(physical_path, chart);
    let removed = match std::fs::remove_dir_all(&repo_path) {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        otherwise => otherwise,
    };
    removed.map_err(|source| ChartError::Prepare {
        path: repo_path.to_string_lossy().to_string(),
        source,
    })?;

    info!(
        "Installing chart repository {} for {} into {}",
        chart.repo,
        chart.name,
        repo_path.display()
    );
    materialize(cache, &chart.repo, &chart.commit, &chart.branch, &repo_path)
        .await
        .map_err(|source| ChartError::Install {
            name: chart.name.clone(),
            repo: chart.repo.clone(),
            source,
        })
}
