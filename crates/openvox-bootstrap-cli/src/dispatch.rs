use std::path::Path;

use anyhow::{bail, Result};
use openvox_bootstrap_core::{
    ArtifactLocation, BootstrapConfig, PackageSpec, PlatformContext, ServiceState,
};
use openvox_bootstrap_exec::{CommandRunner, Executor};
use openvox_bootstrap_installer::{
    check_agent_version, download, ensure_service, install_package, resolve_artifact_location,
    stop_and_disable_service, verify_download, DownloadReport, PackageInstall, ServiceReport,
    VersionTest,
};
use openvox_bootstrap_platform::{resolve_platform, FactsProvider};
use serde::Serialize;

use crate::output::CommandOutcome;
use crate::{Commands, EnsureArg};

#[derive(Debug, Serialize)]
struct ArtifactInstallReport {
    platform: PlatformContext,
    location: ArtifactLocation,
    download: DownloadReport,
    install: PackageInstall,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<ServiceReport>,
}

pub(crate) fn run_command<R: CommandRunner>(
    command: Commands,
    config: &BootstrapConfig,
    executor: &mut Executor<R>,
) -> Result<CommandOutcome> {
    match command {
        Commands::Facts => {
            let platform = detect_platform(config, executor)?;
            Ok(CommandOutcome::succeeded(serde_json::to_value(platform)?))
        }
        Commands::ArtifactUrl {
            name,
            version,
            source,
        } => {
            let platform = detect_platform(config, executor)?;
            let source = source.as_deref().unwrap_or(&config.artifacts_source);
            let location =
                resolve_artifact_location(executor, &platform, None, source, &name, &version)?;
            Ok(CommandOutcome::succeeded(serde_json::to_value(location)?))
        }
        Commands::InstallPackage { name, version } => {
            let platform = detect_platform(config, executor)?;
            let spec = PackageSpec::new(name, version.as_deref());
            let install = install_package(executor, &platform, &spec, &config.package_retry)?;
            Ok(CommandOutcome::succeeded(serde_json::to_value(install)?))
        }
        Commands::InstallArtifact {
            name,
            version,
            source,
            sha256,
            stop_service,
        } => {
            let source = source.unwrap_or_else(|| config.artifacts_source.clone());
            let report = install_artifact(
                config,
                executor,
                &name,
                &version,
                &source,
                sha256.as_deref(),
                stop_service,
            )?;
            Ok(CommandOutcome::succeeded(serde_json::to_value(report)?))
        }
        Commands::Download {
            url,
            destination,
            sha256,
        } => {
            let report = fetch(executor, &url, &destination, sha256.as_deref())?;
            Ok(CommandOutcome::succeeded(serde_json::to_value(report)?))
        }
        Commands::StopService {
            package,
            puppet_bin,
        } => {
            let puppet_bin = puppet_bin.as_deref().unwrap_or(&config.puppet_bin);
            let report = stop_and_disable_service(executor, &package, puppet_bin)?;
            Ok(CommandOutcome::succeeded(serde_json::to_value(report)?))
        }
        Commands::Service {
            package,
            ensure,
            enable,
            puppet_bin,
        } => {
            let desired = ServiceState {
                running: ensure == EnsureArg::Running,
                enabled: enable,
            };
            let puppet_bin = puppet_bin.as_deref().unwrap_or(&config.puppet_bin);
            let report = ensure_service(executor, &package, puppet_bin, desired)?;
            Ok(CommandOutcome::succeeded(serde_json::to_value(report)?))
        }
        Commands::Check { version, test } => {
            let test = VersionTest::parse(&test)?;
            let check =
                check_agent_version(executor, &config.puppet_bin, version.as_deref(), test)?;
            Ok(CommandOutcome {
                success: check.valid,
                document: serde_json::to_value(check)?,
            })
        }
        Commands::Completions { .. } => {
            bail!("completions are written directly and have no result document")
        }
    }
}

fn detect_platform<R: CommandRunner>(
    config: &BootstrapConfig,
    executor: &mut Executor<R>,
) -> Result<PlatformContext> {
    let provider = FactsProvider::locate(config).map_err(|err| executor.logger().fatal(err))?;
    Ok(resolve_platform(executor, &provider)?)
}

fn fetch<R: CommandRunner>(
    executor: &mut Executor<R>,
    url: &str,
    destination: &Path,
    sha256: Option<&str>,
) -> Result<DownloadReport> {
    let report = download(executor, url, destination)?;
    let Some(expected) = sha256 else {
        return Ok(report);
    };
    let report = verify_download(report, expected).map_err(|err| executor.logger().fatal(err))?;
    executor
        .logger()
        .info(format!("Verified sha256 of {}", report.path.display()));
    Ok(report)
}

fn install_artifact<R: CommandRunner>(
    config: &BootstrapConfig,
    executor: &mut Executor<R>,
    name: &str,
    version: &str,
    source: &str,
    sha256: Option<&str>,
    stop_service: bool,
) -> Result<ArtifactInstallReport> {
    let platform = detect_platform(config, executor)?;
    let location = resolve_artifact_location(executor, &platform, None, source, name, version)?;

    let destination = config.download_dir.join(&location.package_name);
    let fetched = fetch(executor, &location.package_url, &destination, sha256)?;

    let spec = PackageSpec::new(fetched.path.display().to_string(), None);
    let install = install_package(executor, &platform, &spec, &config.package_retry)?;

    let service = if stop_service {
        Some(stop_and_disable_service(executor, name, &config.puppet_bin)?)
    } else {
        None
    };

    Ok(ArtifactInstallReport {
        platform,
        location,
        download: fetched,
        install,
        service,
    })
}
