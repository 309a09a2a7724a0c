mod artifacts;
mod check;
mod download;
mod package_manager;
mod service;

pub use artifacts::resolve_artifact_location;
pub use check::{
    check_agent_version, evaluate_version, installed_agent_version, parse_lenient_version,
    VersionCheck, VersionTest,
};
pub use download::{download, verify_download, DownloadReport, DownloadTool, DOWNLOAD_TOOLS};
pub use package_manager::{install_package, select_package_manager, PackageInstall, PackageManager};
pub use service::{ensure_service, stop_and_disable_service, ServiceReport};
