use std::path::Path;

use openvox_bootstrap_core::BootstrapError;
use openvox_bootstrap_exec::{CommandRunner, Executor, Invocation};
use semver::Version;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VersionTest {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl VersionTest {
    pub fn parse(value: &str) -> Result<Self, BootstrapError> {
        match value {
            "eq" => Ok(Self::Eq),
            "lt" => Ok(Self::Lt),
            "le" => Ok(Self::Le),
            "gt" => Ok(Self::Gt),
            "ge" => Ok(Self::Ge),
            other => Err(BootstrapError::InvalidVersion {
                value: other.to_string(),
                reason: "unknown test; expected one of eq, lt, le, gt, ge".to_string(),
            }),
        }
    }

    /// Whether `installed <test> requested` holds.
    pub fn holds(self, installed: &Version, requested: &Version) -> bool {
        match self {
            Self::Eq => installed == requested,
            Self::Lt => installed < requested,
            Self::Le => installed <= requested,
            Self::Gt => installed > requested,
            Self::Ge => installed >= requested,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VersionCheck {
    pub puppet_version: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<VersionTest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_version: Option<String>,
}

/// Parses `8`, `8.1` and `8.1.0` alike by padding missing components.
pub fn parse_lenient_version(value: &str) -> Result<Version, BootstrapError> {
    let value = value.trim();
    if let Ok(version) = Version::parse(value) {
        return Ok(version);
    }

    let components = value.split('.').collect::<Vec<_>>();
    let numeric = components
        .iter()
        .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()));
    if !numeric || components.len() > 3 {
        return Err(BootstrapError::InvalidVersion {
            value: value.to_string(),
            reason: "expected a dotted numeric version".to_string(),
        });
    }

    let mut padded = components;
    padded.resize(3, "0");
    Version::parse(&padded.join(".")).map_err(|err| BootstrapError::InvalidVersion {
        value: value.to_string(),
        reason: err.to_string(),
    })
}

/// Without a requested version the installed version is always valid.
pub fn evaluate_version(
    installed: &str,
    requested: Option<&str>,
    test: VersionTest,
) -> Result<VersionCheck, BootstrapError> {
    let installed_version = parse_lenient_version(installed)?;
    let Some(requested) = requested.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(VersionCheck {
            puppet_version: installed_version.to_string(),
            valid: true,
            test: None,
            test_version: None,
        });
    };

    let requested_version = parse_lenient_version(requested)?;
    Ok(VersionCheck {
        puppet_version: installed_version.to_string(),
        valid: test.holds(&installed_version, &requested_version),
        test: Some(test),
        test_version: Some(requested.to_string()),
    })
}

pub fn installed_agent_version<R: CommandRunner>(
    executor: &mut Executor<R>,
    puppet_bin: &Path,
) -> Result<String, BootstrapError> {
    let invocation = Invocation::new(puppet_bin.display().to_string()).arg("--version");
    let result = executor.query(&invocation);
    if !result.success() {
        return Err(executor.logger().fatal(BootstrapError::ExecutionFailure {
            command: invocation.to_string(),
            status: result.status,
            output: result.output,
        }));
    }
    let version = result.output.trim().to_string();
    executor.logger().assigned("puppet_version", &version);
    Ok(version)
}

pub fn check_agent_version<R: CommandRunner>(
    executor: &mut Executor<R>,
    puppet_bin: &Path,
    requested: Option<&str>,
    test: VersionTest,
) -> Result<VersionCheck, BootstrapError> {
    let installed = installed_agent_version(executor, puppet_bin)?;
    evaluate_version(&installed, requested, test)
}
