use openvox_bootstrap_core::{
    BootstrapError, Lineage, OsFamily, PackageSpec, PlatformContext, RetrySettings,
};
use openvox_bootstrap_exec::{CommandRunner, Executor, Invocation, RetryPolicy, RetryState};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PackageManager {
    AptGet,
    Apt,
    Dnf,
    Yum,
    Zypper,
}

const DEBIAN_MANAGERS: &[PackageManager] = &[PackageManager::AptGet, PackageManager::Apt];
const REDHAT_MANAGERS: &[PackageManager] = &[
    PackageManager::Dnf,
    PackageManager::Yum,
    PackageManager::Zypper,
];

impl PackageManager {
    pub fn program(self) -> &'static str {
        match self {
            Self::AptGet => "apt-get",
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
        }
    }

    /// Managers to try for `family`, most preferred first.
    pub fn preference(family: OsFamily) -> &'static [PackageManager] {
        match family.lineage() {
            Lineage::Debian => DEBIAN_MANAGERS,
            Lineage::RedHat => REDHAT_MANAGERS,
        }
    }

    /// Output signature of a transient lock conflict worth retrying.
    pub fn lock_signature(self) -> &'static str {
        match self {
            Self::AptGet | Self::Apt => {
                "Could not get lock|Unable to acquire the dpkg frontend lock"
            }
            Self::Dnf | Self::Yum => "Existing lock|another copy is running",
            Self::Zypper => "System management is locked",
        }
    }

    pub fn install_invocation(self, argument: &str) -> Invocation {
        Invocation::new(self.program()).args(["install", "-y", argument])
    }
}

/// Picks the first manager from the family's preference list that is
/// installed.
pub fn select_package_manager<R: CommandRunner>(
    executor: &Executor<R>,
    family: OsFamily,
) -> Result<PackageManager, BootstrapError> {
    let candidates = PackageManager::preference(family);
    candidates
        .iter()
        .copied()
        .find(|manager| executor.exists(manager.program()))
        .ok_or_else(|| BootstrapError::NoPackageManagerAvailable {
            tried: candidates
                .iter()
                .map(|manager| manager.program().to_string())
                .collect(),
        })
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackageInstall {
    pub manager: PackageManager,
    pub argument: String,
    pub attempts: u32,
    pub output: String,
}

/// Installs `spec` with the platform's package manager, retrying only on the
/// manager's lock-contention signature.
pub fn install_package<R: CommandRunner>(
    executor: &mut Executor<R>,
    platform: &PlatformContext,
    spec: &PackageSpec,
    retry: &RetrySettings,
) -> Result<PackageInstall, BootstrapError> {
    let manager = select_package_manager(executor, platform.family())
        .map_err(|err| executor.logger().fatal(err))?;
    let argument = spec.install_argument(platform);
    executor.logger().assigned("package_manager", manager.program());

    let policy = RetryPolicy::from_settings(retry).retry_if(manager.lock_signature())?;
    let outcome = executor.with_retries_if(&policy, &manager.install_invocation(&argument));
    let attempts = outcome.attempts;
    // Only lock contention is retryable; any other failure is the manager's own.
    let result = match outcome.state {
        RetryState::Aborted => Err(BootstrapError::ExecutionFailure {
            command: outcome.command,
            status: outcome.result.status,
            output: outcome.result.output,
        }),
        _ => outcome.into_result(),
    }
    .map_err(|err| executor.logger().fatal(err))?;

    Ok(PackageInstall {
        manager,
        argument,
        attempts,
        output: result.output,
    })
}
