use log::{debug, info, warn};

use crate::{
    chart::ChartSource,
    cli::args::{CliArgs, Command},
    config::FabrikitConfig,
    git::GitRunner,
    Fabrikit,
};
use std::{error::Error, path::Path};

/// Builds the run context from configuration, with command line flags taking
/// precedence.
pub fn build_fabrikit(args: &CliArgs) -> Result<Fabrikit, Box<dyn Error>> {
    let config = FabrikitConfig::load(args.config.as_deref())?;

    let mut builder = Fabrikit::builder();
    if let Some(binary) = args.git_binary.clone().or(config.git_binary) {
        builder = builder.git_binary(binary);
    }
    if let Some(dir) = args.cache_directory.clone().or(config.cache_dir) {
        builder = builder.scratch_directory(dir);
    }
    for (repo, token) in config.access_tokens.into_iter().chain(args.tokens.clone()) {
        builder = builder.access_token(repo, token);
    }

    let fabrikit = builder.build();
    debug!("Registered {} access tokens", fabrikit.credentials().len());
    Ok(fabrikit)
}

pub async fn run_command<R: GitRunner>(
    fabrikit: &Fabrikit<R>,
    command: &Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Fetch {
            repo,
            destinations,
            branch,
            commit,
        } => do_fetch(fabrikit, repo, branch, commit, destinations).await,
        Command::Chart {
            name,
            repo,
            dir,
            branch,
            commit,
        } => {
            let chart = ChartSource {
                name: name.clone(),
                repo: repo.clone(),
                branch: branch.clone(),
                commit: commit.clone(),
            };
            do_chart(fabrikit, dir, &chart).await
        }
    }
}

/// Handler to fetch command
pub async fn do_fetch<R: GitRunner, P: AsRef<Path>>(
    fabrikit: &Fabrikit<R>,
    repo: &str,
    branch: &str,
    commit: &str,
    destinations: &[P],
) -> Result<(), Box<dyn Error>> {
    for destination in destinations {
        fabrikit
            .materialize(repo, commit, branch, destination.as_ref())
            .await?;
    }
    info!("Fetched {} into {} destinations", repo, destinations.len());
    Ok(())
}

/// Handler to chart command
pub async fn do_chart<R: GitRunner>(
    fabrikit: &Fabrikit<R>,
    component_dir: &Path,
    chart: &ChartSource,
) -> Result<(), Box<dyn Error>> {
    fabrikit.install_chart_repo(component_dir, chart).await?;
    Ok(())
}

/// Runs `command`, then cleans up. A failing command is reported in
/// preference to a failing cleanup.
pub async fn run_and_finish<R: GitRunner>(
    fabrikit: Fabrikit<R>,
    command: &Command,
    keep_clones: bool,
) -> Result<(), Box<dyn Error>> {
    let result = run_command(&fabrikit, command).await;
    let finished = finish(fabrikit, keep_clones).await;
    match (result, finished) {
        (Err(error), Err(cleanup_error)) => {
            warn!("Cleanup failed: {}", cleanup_error);
            Err(error)
        }
        (result, finished) => result.and(finished),
    }
}

/// Removes the shared clones unless the user asked to keep them
pub async fn finish<R: GitRunner>(
    fabrikit: Fabrikit<R>,
    keep_clones: bool,
) -> Result<(), Box<dyn Error>> {
    if keep_clones {
        info!("Keeping clones under {}", fabrikit.cache().scratch().display());
        return Ok(());
    }
    fabrikit.cleanup().await?;
    Ok(())
}
