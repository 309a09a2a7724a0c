use std::path::PathBuf;

use openvox_bootstrap_core::{BootstrapConfig, BootstrapError};
use openvox_bootstrap_exec::{CommandRunner, Executor, Invocation};

/// The puppetlabs-facts bash task, run as `bash <script> [platform|release]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactsProvider {
    script: PathBuf,
}

impl FactsProvider {
    /// Locates the provider under the configured installation root.
    pub fn locate(config: &BootstrapConfig) -> Result<Self, BootstrapError> {
        Self::at(config.facts_provider_path())
    }

    pub fn at(script: impl Into<PathBuf>) -> Result<Self, BootstrapError> {
        let script = script.into();
        if !script.is_file() {
            return Err(BootstrapError::MissingFactsProvider { path: script });
        }
        Ok(Self { script })
    }

    pub fn platform<R: CommandRunner>(
        &self,
        executor: &mut Executor<R>,
    ) -> Result<String, BootstrapError> {
        self.query(executor, Some("platform"))
    }

    pub fn release<R: CommandRunner>(
        &self,
        executor: &mut Executor<R>,
    ) -> Result<String, BootstrapError> {
        self.query(executor, Some("release"))
    }

    /// The full structured facts document.
    pub fn facts<R: CommandRunner>(
        &self,
        executor: &mut Executor<R>,
    ) -> Result<serde_json::Value, BootstrapError> {
        let raw = self.query(executor, None)?;
        serde_json::from_str(&raw).map_err(|err| {
            executor.logger().fatal(BootstrapError::InvalidFacts {
                command: self.invocation(None).to_string(),
                reason: err.to_string(),
            })
        })
    }

    fn query<R: CommandRunner>(
        &self,
        executor: &mut Executor<R>,
        verb: Option<&str>,
    ) -> Result<String, BootstrapError> {
        let invocation = self.invocation(verb);
        let result = executor.query(&invocation);
        if !result.success() {
            return Err(executor.logger().fatal(BootstrapError::ExecutionFailure {
                command: invocation.to_string(),
                status: result.status,
                output: result.output,
            }));
        }
        Ok(result.output.trim().to_string())
    }

    fn invocation(&self, verb: Option<&str>) -> Invocation {
        let invocation = Invocation::new("bash").arg(self.script.display().to_string());
        match verb {
            Some(verb) => invocation.arg(verb),
            None => invocation,
        }
    }
}
