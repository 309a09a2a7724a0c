use std::path::{Path, PathBuf};

use anyhow::Result;
use openvox_bootstrap_core::BootstrapConfig;

/// Environment variable naming a config file when `--config` is absent.
pub(crate) const CONFIG_ENV: &str = "OPENVOX_BOOTSTRAP_CONFIG";

/// Layers defaults, the config file, the environment and flags, in that
/// order.
pub(crate) fn load_config<F>(
    explicit: Option<&Path>,
    install_root: Option<&Path>,
    lookup: F,
) -> Result<BootstrapConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = explicit.map(Path::to_path_buf).or_else(|| {
        lookup(CONFIG_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    });

    let mut config = match config_path {
        Some(path) => BootstrapConfig::from_path(&path)?,
        None => BootstrapConfig::default(),
    };
    config.apply_env(&lookup);

    if let Some(root) = install_root {
        config.install_root = Some(root.to_path_buf());
    }
    Ok(config)
}
