use serde::Serialize;

use crate::context::PlatformContext;
use crate::family::Lineage;
use crate::package::artifact_path_name;

/// Resolved artifact filename and download URL for one package build.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub package_name: String,
    pub package_url: String,
}

impl ArtifactLocation {
    /// Builds the location under `<base_url>/<path>/<version>/`.
    ///
    /// Debian lineage: `<name>_<version>-1+<family><full>_<arch>.deb`,
    /// percent-encoded so the `+` survives as `%2B`.
    /// RedHat lineage: `<name>-<version>-1.<el|fc><major>.<arch>.rpm`.
    pub fn build(
        platform: &PlatformContext,
        package_arch: &str,
        base_url: &str,
        name: &str,
        version: &str,
    ) -> Self {
        let family = platform.family();
        let package_name = match family.lineage() {
            Lineage::Debian => urlencoding::encode(&format!(
                "{name}_{version}-1+{family}{}_{package_arch}.deb",
                platform.full_version()
            ))
            .into_owned(),
            Lineage::RedHat => format!(
                "{name}-{version}-1.{}{}.{package_arch}.rpm",
                family.rpm_dist_tag().unwrap_or_default(),
                platform.major_version()
            ),
        };

        let package_url = format!(
            "{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            artifact_path_name(name),
            version,
            package_name
        );

        Self {
            package_name,
            package_url,
        }
    }
}
