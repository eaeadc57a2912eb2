use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Expands component trees into Kubernetes manifests.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Configuration file.
    /// Defaults to `$HOME/.fabrikit/config.toml`
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Access token for a repository, as REPO=TOKEN. May be repeated
    #[clap(long = "token", value_parser = parse_access_token)]
    pub tokens: Vec<(String, String)>,
    /// Git executable used for clone and checkout
    #[clap(long)]
    pub git_binary: Option<String>,
    /// Directory that receives the shared clones.
    /// Defaults to the system temp directory
    #[clap(long)]
    pub cache_directory: Option<PathBuf>,
    /// Leave the shared clones in place when the run ends
    #[clap(long)]
    pub keep_clones: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clones a repository once and copies it into every destination
    Fetch {
        repo: String,
        #[clap(required = true)]
        destinations: Vec<PathBuf>,
        #[clap(short, long, default_value = "")]
        branch: String,
        #[clap(short = 'C', long, default_value = "")]
        commit: String,
    },
    /// Installs the chart repository of a component
    Chart {
        name: String,
        repo: String,
        /// Component directory
        #[clap(short, long, default_value = ".")]
        dir: PathBuf,
        #[clap(short, long, default_value = "")]
        branch: String,
        #[clap(short = 'C', long, default_value = "")]
        commit: String,
    },
}

fn parse_access_token(value: &str) -> Result<(String, String), String> {
    match value.rsplit_once('=') {
        Some((repo, token)) if !repo.is_empty() && !token.is_empty() => {
            Ok((repo.to_owned(), token.to_owned()))
        }
        _ => Err(format!("expected REPO=TOKEN, got `{value}`")),
    }
}
