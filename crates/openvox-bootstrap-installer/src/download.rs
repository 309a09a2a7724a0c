use std::path::{Path, PathBuf};

use openvox_bootstrap_core::BootstrapError;
use openvox_bootstrap_exec::{CommandRunner, Executor, Invocation};
use openvox_bootstrap_security::{digest_matches, sha256_file_hex};
use serde::Serialize;

/// External download tools.
///
/// The two differ on HTTP failure: wget has already created the destination
/// and leaves it empty, while curl run with `--fail` never creates it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DownloadTool {
    Wget,
    Curl,
}

/// Preference order.
pub const DOWNLOAD_TOOLS: [DownloadTool; 2] = [DownloadTool::Wget, DownloadTool::Curl];

impl DownloadTool {
    pub fn program(self) -> &'static str {
        match self {
            Self::Wget => "wget",
            Self::Curl => "curl",
        }
    }

    /// Both invocations exit non-zero on an HTTP error status.
    pub fn invocation(self, url: &str, destination: &Path) -> Invocation {
        let destination = destination.display().to_string();
        match self {
            Self::Wget => Invocation::new("wget").args([url, "-O", destination.as_str()]),
            Self::Curl => Invocation::new("curl").args([
                "--fail",
                "--silent",
                "--show-error",
                "--location",
                url,
                "-o",
                destination.as_str(),
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DownloadReport {
    pub url: String,
    pub path: PathBuf,
    pub tool: DownloadTool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Fetches `url` to `destination` with the first available tool.
pub fn download<R: CommandRunner>(
    executor: &mut Executor<R>,
    url: &str,
    destination: &Path,
) -> Result<DownloadReport, BootstrapError> {
    let Some(tool) = DOWNLOAD_TOOLS
        .into_iter()
        .find(|tool| executor.exists(tool.program()))
    else {
        return Err(executor.logger().fatal(BootstrapError::NoDownloadToolAvailable {
            url: url.to_string(),
            tried: DOWNLOAD_TOOLS
                .iter()
                .map(|tool| tool.program().to_string())
                .collect(),
        }));
    };

    if let Some(parent) = destination.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| BootstrapError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let result = executor.exec_and_capture(&tool.invocation(url, destination));
    if !result.success() {
        return Err(executor.logger().fatal(BootstrapError::DownloadFailed {
            url: url.to_string(),
            tool: tool.program().to_string(),
            status: result.status,
            output: result.output,
        }));
    }

    Ok(DownloadReport {
        url: url.to_string(),
        path: destination.to_path_buf(),
        tool,
        sha256: None,
    })
}

/// Checks a downloaded file against `expected` and records its digest.
pub fn verify_download(
    mut report: DownloadReport,
    expected: &str,
) -> Result<DownloadReport, BootstrapError> {
    let actual = sha256_file_hex(&report.path).map_err(|source| BootstrapError::Io {
        path: report.path.clone(),
        source,
    })?;
    if !digest_matches(&actual, expected) {
        return Err(BootstrapError::ChecksumMismatch {
            path: report.path,
            expected: expected.trim().to_ascii_lowercase(),
            actual,
        });
    }
    report.sha256 = Some(actual);
    Ok(report)
}
