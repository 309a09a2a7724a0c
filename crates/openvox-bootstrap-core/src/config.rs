use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Deserialize;

pub const DEFAULT_ARTIFACTS_SOURCE: &str = "https://artifacts.voxpupuli.org";
pub const DEFAULT_PUPPET_BIN: &str = "/opt/puppetlabs/bin/puppet";

/// Environment variable naming the task installation root.
pub const INSTALL_ROOT_ENV: &str = "PT__installdir";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub attempts: u32,
    pub delay_secs: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_secs: 5.0,
        }
    }
}

impl RetrySettings {
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Root under which the facts provider is installed.
    pub install_root: Option<PathBuf>,
    pub artifacts_source: String,
    pub puppet_bin: PathBuf,
    pub download_dir: PathBuf,
    pub package_retry: RetrySettings,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            install_root: None,
            artifacts_source: DEFAULT_ARTIFACTS_SOURCE.to_string(),
            puppet_bin: PathBuf::from(DEFAULT_PUPPET_BIN),
            download_dir: std::env::temp_dir(),
            package_retry: RetrySettings::default(),
        }
    }
}

impl BootstrapConfig {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let config: Self =
            toml::from_str(input).context("failed to parse openvox-bootstrap config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Applies environment overrides. `lookup` is `std::env::var` in
    /// production and a fixture map in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(INSTALL_ROOT_ENV).filter(|value| !value.trim().is_empty()) {
            self.install_root = Some(PathBuf::from(root));
        }
    }

    /// `<install_root>/facts/tasks/bash.sh`, or the relative path when no
    /// root is known.
    pub fn facts_provider_path(&self) -> PathBuf {
        let relative = Path::new("facts").join("tasks").join("bash.sh");
        match &self.install_root {
            Some(root) => root.join(relative),
            None => relative,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.artifacts_source.trim().is_empty() {
            return Err(anyhow!("artifacts_source must not be empty"));
        }
        if self.package_retry.attempts == 0 {
            return Err(anyhow!("package_retry.attempts must be at least 1"));
        }
        if Duration::try_from_secs_f64(self.package_retry.delay_secs).is_err() {
            return Err(anyhow!(
                "package_retry.delay_secs must be a non-negative number of seconds, got {}",
                self.package_retry.delay_secs
            ));
        }
        Ok(())
    }
}
