use openvox_bootstrap_core::{BootstrapError, OsFamily, PlatformContext};
use openvox_bootstrap_exec::{CommandRunner, Executor};

use crate::facts::FactsProvider;

/// Release reported by facts for pre-release and rolling distributions.
pub const RELEASE_NOT_APPLICABLE: &str = "n/a";

const CODENAME_VERSIONS: &[(&str, &str)] = &[
    ("buster", "10"),
    ("bullseye", "11"),
    ("bookworm", "12"),
    ("trixie", "13"),
    ("forky", "14"),
    ("focal", "20.04"),
    ("jammy", "22.04"),
    ("noble", "24.04"),
    ("plucky", "25.04"),
    ("questing", "25.10"),
];

pub fn codename_version(codename: &str) -> Option<&'static str> {
    let codename = codename.trim().to_ascii_lowercase();
    CODENAME_VERSIONS
        .iter()
        .find(|(name, _)| *name == codename)
        .map(|(_, version)| *version)
}

/// Resolves the platform identity once for this run.
///
/// The release reported by facts is used when present; `n/a` falls back to
/// the distribution codename.
pub fn resolve_platform<R: CommandRunner>(
    executor: &mut Executor<R>,
    provider: &FactsProvider,
) -> Result<PlatformContext, BootstrapError> {
    let name = provider.platform(executor)?;
    executor.logger().assigned("platform", &name);

    let Some(family) = OsFamily::from_platform_name(&name) else {
        return Err(executor.logger().fatal(BootstrapError::UnknownPlatform {
            platform: name,
            detail: String::new(),
        }));
    };

    let release = provider.release(executor)?;
    let full_version = if release.is_empty() || release == RELEASE_NOT_APPLICABLE {
        let facts = provider.facts(executor)?;
        let codename = facts
            .pointer("/os/distro/codename")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();
        executor.logger().assigned("os_codename", &codename);
        codename_version(&codename).map(str::to_string)
    } else {
        Some(release)
    };

    let Some(full_version) = full_version else {
        return Err(executor.logger().fatal(BootstrapError::UnknownPlatform {
            platform: name,
            detail: " (unable to determine the release version)".to_string(),
        }));
    };

    let platform = PlatformContext::new(name, family, full_version);
    let logger = executor.logger();
    logger.assigned("os_full_version", platform.full_version());
    logger.assigned("os_major_version", platform.major_version());
    logger.assigned("os_family", platform.family());
    Ok(platform)
}
