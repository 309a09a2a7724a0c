mod artifact;
mod config;
mod context;
mod error;
mod family;
mod package;
mod service;

pub use artifact::ArtifactLocation;
pub use config::{
    BootstrapConfig, RetrySettings, DEFAULT_ARTIFACTS_SOURCE, DEFAULT_PUPPET_BIN, INSTALL_ROOT_ENV,
};
pub use context::{ArchitectureContext, PlatformContext};
pub use error::BootstrapError;
pub use family::{Lineage, OsFamily};
pub use package::{artifact_path_name, is_noarch_package, PackageSpec, NOARCH_PACKAGES};
pub use service::{service_for_package, ServiceState, SERVICE_MAPPINGS};
