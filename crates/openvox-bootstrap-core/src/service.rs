use serde::{Deserialize, Serialize};

/// Installed package name to the service it manages.
pub const SERVICE_MAPPINGS: &[(&str, &str)] = &[
    ("openvox-agent", "puppet"),
    ("openvox-server", "puppetserver"),
    ("openvoxdb", "puppetdb"),
];

pub fn service_for_package(package: &str) -> Option<&'static str> {
    SERVICE_MAPPINGS
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, service)| *service)
}

/// Desired state of a managed service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceState {
    pub running: bool,
    pub enabled: bool,
}

impl ServiceState {
    pub const STOPPED_AND_DISABLED: Self = Self {
        running: false,
        enabled: false,
    };

    pub const RUNNING_AND_ENABLED: Self = Self {
        running: true,
        enabled: true,
    };

    /// Single-line declarative resource for `apply -e`.
    pub fn manifest(self, service: &str) -> String {
        format!(
            "service {{ '{service}': ensure => {}, enable => {} }}",
            if self.running { "running" } else { "stopped" },
            self.enabled
        )
    }
}
