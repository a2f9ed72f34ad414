use std::path::{Path, PathBuf};

use async_std::fs::File;
use async_std::prelude::*;
use kanri_store::StoreConfig;

use crate::Config;

async fn read_file_content(file_path: &str) -> eyre::Result<Option<String>> {
    let path = Path::new(file_path);

    if !path.exists() {
        return Ok(None);
    }

    let mut file = File::open(path).await?;
    let mut content = String::new();
    file.read_to_string(&mut content).await?;

    Ok(Some(content))
}

pub fn get_default_store_config<S>() -> Config<S>
where
    S: StoreConfig,
{
    Config {
        default_store_type: Some("rest".to_string()),
        store: S::default(),
    }
}

pub async fn get_config_from_path<S>(config_path: &str) -> eyre::Result<Config<S>>
where
    S: StoreConfig,
{
    let content = read_file_content(config_path)
        .await?
        .ok_or_else(|| eyre::eyre!("config path '{config_path}' was not found"))?;

    let config: Config<S> = toml::from_str(&content)?;

    Ok(config)
}

/// Default location of the user configuration file.
pub fn default_config_path() -> eyre::Result<PathBuf> {
    let dirs = directories_next::ProjectDirs::from("", "", "kanri")
        .ok_or_else(|| eyre::eyre!("could not determine a home directory for this system"))?;
    Ok(dirs.config_dir().join("config.toml"))
}
