use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File, FileFormat};
use home::home_dir;
use log::debug;
use serde::Deserialize;

pub struct FabrikitConfig {
    pub cache_dir: Option<PathBuf>,
    pub git_binary: Option<String>,
    pub access_tokens: Vec<(String, String)>,
}

impl FabrikitConfig {
    /// Loads `file` (or `$HOME/.fabrikit/config.toml`) when present, then
    /// `FABRIKIT_*` environment variables on top.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let file = file.map(Path::to_path_buf).or_else(default_config_file);
        debug!("Loading configuration from {:?} and environment", file);
        let raw_config = RawConfig::load(file.as_deref(), None)?;

        Ok(Self {
            cache_dir: raw_config.cache.dir,
            git_binary: raw_config.git.binary,
            access_tokens: raw_config
                .access_tokens
                .into_iter()
                .map(|entry| (entry.repo, entry.token))
                .collect(),
        })
    }
}

fn default_config_file() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".fabrikit").join("config.toml"))
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    cache: CacheConfig,
    #[serde(default)]
    git: GitConfig,
    #[serde(default)]
    access_tokens: Vec<AccessToken>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct CacheConfig {
    dir: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct GitConfig {
    binary: Option<String>,
}

// A list rather than a table: repository URLs make poor configuration keys.
#[derive(Debug, Deserialize, PartialEq, Eq)]
struct AccessToken {
    repo: String,
    token: String,
}

impl RawConfig {
    fn load(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(
                File::from(file.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        builder
            .add_source(
                Environment::with_prefix("FABRIKIT")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
