use openvox_bootstrap_core::{ArchitectureContext, ArtifactLocation, BootstrapError, PlatformContext};
use openvox_bootstrap_exec::{CommandRunner, Executor};
use openvox_bootstrap_platform::resolve_package_architecture;

/// Resolves the download location of one package build from an artifacts
/// server. `arch` is resolved for `name` when the caller has not done so.
pub fn resolve_artifact_location<R: CommandRunner>(
    executor: &mut Executor<R>,
    platform: &PlatformContext,
    arch: Option<&ArchitectureContext>,
    base_url: &str,
    name: &str,
    version: &str,
) -> Result<ArtifactLocation, BootstrapError> {
    let package_arch = match arch {
        Some(arch) => arch.package_arch.clone(),
        None => resolve_package_architecture(executor, name, platform.family())?.package_arch,
    };

    let location = ArtifactLocation::build(platform, &package_arch, base_url, name, version);
    let logger = executor.logger();
    logger.assigned("package_name", &location.package_name);
    logger.assigned("package_url", &location.package_url);
    Ok(location)
}
