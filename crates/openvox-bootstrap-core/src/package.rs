use serde::Serialize;

use crate::context::PlatformContext;
use crate::family::Lineage;

/// Packages published without a CPU architecture.
pub const NOARCH_PACKAGES: &[&str] = &["openvox-server", "openvoxdb", "openvoxdb-termini"];

/// Packages whose artifacts live under another product's directory.
const ARTIFACT_PATH_ALIASES: &[(&str, &str)] = &[("openvoxdb-termini", "openvoxdb")];

pub fn is_noarch_package(name: &str) -> bool {
    NOARCH_PACKAGES.contains(&name)
}

/// Directory name an artifact is published under.
pub fn artifact_path_name(name: &str) -> &str {
    ARTIFACT_PATH_ALIASES
        .iter()
        .find(|(package, _)| *package == name)
        .map(|(_, path)| *path)
        .unwrap_or(name)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub version: Option<String>,
}

impl PackageSpec {
    /// Blank versions are treated as absent.
    pub fn new(name: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            name: name.into(),
            version: version
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        }
    }

    /// True when `name` points at a package file on disk rather than a
    /// repository package.
    pub fn is_local_file(&self) -> bool {
        self.name.contains('/') && (self.name.ends_with(".deb") || self.name.ends_with(".rpm"))
    }

    /// Renders the argument handed to `<manager> install -y`.
    ///
    /// Debian lineage pins with `name=version`, appending the
    /// `-1+<family><full_version>` revision unless the caller already gave a
    /// full package revision (a `-` in the version). RedHat lineage uses
    /// `name-version` and leaves release/arch selection to the manager.
    pub fn install_argument(&self, platform: &PlatformContext) -> String {
        let Some(version) = self.version.as_deref() else {
            return self.name.clone();
        };
        if self.is_local_file() {
            return self.name.clone();
        }

        match platform.family().lineage() {
            Lineage::Debian => {
                if version.contains('-') {
                    format!("{}={}", self.name, version)
                } else {
                    format!(
                        "{}={}-1+{}{}",
                        self.name,
                        version,
                        platform.family(),
                        platform.full_version()
                    )
                }
            }
            Lineage::RedHat => format!("{}-{}", self.name, version),
        }
    }
}
