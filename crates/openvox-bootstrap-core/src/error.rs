use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the bootstrap engine.
///
/// Variants that wrap an external command keep its exit status and combined
/// output so the caller can report the underlying tool failure verbatim.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Unable to find the puppetlabs-facts bash task to infer the platform at '{}'", path.display())]
    MissingFactsProvider { path: PathBuf },

    #[error("Unhandled platform: '{platform}'{detail}")]
    UnknownPlatform { platform: String, detail: String },

    #[error("Facts from '{command}' are not valid JSON: {reason}")]
    InvalidFacts { command: String, reason: String },

    #[error("Neither {} are installed", render_alternatives(tried))]
    NoPackageManagerAvailable { tried: Vec<String> },

    #[error("'{command}' failed with status {status}:\n{output}")]
    ExecutionFailure {
        command: String,
        status: i32,
        output: String,
    },

    #[error("'{command}' failed with status {status} after {attempts} attempts:\n{output}")]
    RetryExhausted {
        command: String,
        attempts: u32,
        status: i32,
        output: String,
    },

    #[error("'{command}' failed with status {status} and output did not match /{pattern}/:\n{output}")]
    RetryAborted {
        command: String,
        pattern: String,
        status: i32,
        output: String,
    },

    #[error("Invalid retry pattern /{pattern}/: {reason}")]
    InvalidRetryPattern { pattern: String, reason: String },

    #[error("Download of {url} with {tool} failed with status {status}:\n{output}")]
    DownloadFailed {
        url: String,
        tool: String,
        status: i32,
        output: String,
    },

    #[error("Unable to download {url}: neither {} are installed", render_alternatives(tried))]
    NoDownloadToolAvailable { url: String, tried: Vec<String> },

    #[error("Checksum mismatch for '{}': expected {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Unknown service for package: '{package}'")]
    ServiceNotFound { package: String },

    #[error("Puppet executable not found at '{}'", path.display())]
    ControlBinaryNotFound { path: PathBuf },

    #[error("Invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BootstrapError {
    /// Stable machine-readable token for result documents.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFactsProvider { .. } => "openvox-bootstrap/missing-facts-provider",
            Self::UnknownPlatform { .. } => "openvox-bootstrap/unknown-platform",
            Self::InvalidFacts { .. } => "openvox-bootstrap/invalid-facts",
            Self::NoPackageManagerAvailable { .. } => {
                "openvox-bootstrap/no-package-manager-available"
            }
            Self::ExecutionFailure { .. } => "openvox-bootstrap/execution-failure",
            Self::RetryExhausted { .. } => "openvox-bootstrap/retry-exhausted",
            Self::RetryAborted { .. } => "openvox-bootstrap/retry-aborted",
            Self::InvalidRetryPattern { .. } => "openvox-bootstrap/invalid-retry-pattern",
            Self::DownloadFailed { .. } => "openvox-bootstrap/download-failed",
            Self::NoDownloadToolAvailable { .. } => "openvox-bootstrap/no-download-tool-available",
            Self::ChecksumMismatch { .. } => "openvox-bootstrap/checksum-mismatch",
            Self::ServiceNotFound { .. } => "openvox-bootstrap/service-not-found",
            Self::ControlBinaryNotFound { .. } => "openvox-bootstrap/control-binary-not-found",
            Self::InvalidVersion { .. } => "openvox-bootstrap/invalid-version",
            Self::Io { .. } => "openvox-bootstrap/io",
        }
    }

    /// Exit status of the external command behind this failure, if any.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            Self::ExecutionFailure { status, .. }
            | Self::RetryExhausted { status, .. }
            | Self::RetryAborted { status, .. }
            | Self::DownloadFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Combined output captured from the external command, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::ExecutionFailure { output, .. }
            | Self::RetryExhausted { output, .. }
            | Self::RetryAborted { output, .. }
            | Self::DownloadFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// `["apt", "apt-get"]` -> `apt nor apt-get`, `["dnf", "yum", "zypper"]` ->
/// `dnf, yum nor zypper`. Names are sorted so the message is stable.
fn render_alternatives(tried: &[String]) -> String {
    let mut names = tried.to_vec();
    names.sort();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} nor {}", rest.join(", "), last),
    }
}
