use serde::Serialize;

use crate::family::OsFamily;

/// Platform identity resolved once per run from the facts provider.
///
/// Fields are private so a context can only be produced by [`PlatformContext::new`]
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlatformContext {
    name: String,
    family: OsFamily,
    major_version: String,
    full_version: String,
}

impl PlatformContext {
    /// The major version is everything before the first `.` of `full_version`.
    pub fn new(name: impl Into<String>, family: OsFamily, full_version: impl Into<String>) -> Self {
        let full_version = full_version.into();
        let major_version = full_version
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            name: name.into(),
            family,
            major_version,
            full_version,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> OsFamily {
        self.family
    }

    pub fn major_version(&self) -> &str {
        &self.major_version
    }

    pub fn full_version(&self) -> &str {
        &self.full_version
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArchitectureContext {
    /// `None` when the package is architecture-independent and the kernel was
    /// never queried.
    pub cpu_arch: Option<String>,
    pub package_arch: String,
}

impl ArchitectureContext {
    pub fn noarch(family: OsFamily) -> Self {
        Self {
            cpu_arch: None,
            package_arch: family.noarch_token().to_string(),
        }
    }

    pub fn native(cpu_arch: impl Into<String>) -> Self {
        let cpu_arch = cpu_arch.into();
        Self {
            package_arch: cpu_arch.clone(),
            cpu_arch: Some(cpu_arch),
        }
    }
}
