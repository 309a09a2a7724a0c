use serde::{Deserialize, Serialize};

/// Packaging lineage shared by several OS families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Lineage {
    Debian,
    RedHat,
}

/// Normalized OS family token.
///
/// Every package-manager, architecture and artifact naming decision keys off
/// this value rather than the raw platform name reported by facts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Debian,
    Ubuntu,
    El,
    Fedora,
}

impl OsFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Ubuntu => "ubuntu",
            Self::El => "el",
            Self::Fedora => "fedora",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "debian" => Some(Self::Debian),
            "ubuntu" => Some(Self::Ubuntu),
            "el" => Some(Self::El),
            "fedora" => Some(Self::Fedora),
            _ => None,
        }
    }

    /// Maps the platform name reported by facts (`Ubuntu`, `Rocky`, ...) to a
    /// family. Matching is case-insensitive.
    ///
    /// Amazon Linux is not mapped: its releases (`2`, `2023`) have no
    /// `el<major>` build on the artifacts server.
    pub fn from_platform_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debian" => Some(Self::Debian),
            "ubuntu" => Some(Self::Ubuntu),
            "redhat" | "rhel" | "centos" | "rocky" | "almalinux" | "oraclelinux"
            | "scientific" => Some(Self::El),
            "fedora" => Some(Self::Fedora),
            _ => None,
        }
    }

    pub fn lineage(self) -> Lineage {
        match self {
            Self::Debian | Self::Ubuntu => Lineage::Debian,
            Self::El | Self::Fedora => Lineage::RedHat,
        }
    }

    pub fn is_debian_like(self) -> bool {
        self.lineage() == Lineage::Debian
    }

    /// Distribution tag embedded in rpm release strings.
    pub fn rpm_dist_tag(self) -> Option<&'static str> {
        match self {
            Self::El => Some("el"),
            Self::Fedora => Some("fc"),
            Self::Debian | Self::Ubuntu => None,
        }
    }

    /// Architecture token used by architecture-independent packages.
    pub fn noarch_token(self) -> &'static str {
        match self.lineage() {
            Lineage::Debian => "all",
            Lineage::RedHat => "noarch",
        }
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
