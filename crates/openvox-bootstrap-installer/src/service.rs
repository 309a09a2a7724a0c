use std::path::Path;

use openvox_bootstrap_core::{service_for_package, BootstrapError, ServiceState};
use openvox_bootstrap_exec::{CommandRunner, Executor, Invocation};
use serde::Serialize;

/// `--detailed-exitcodes`: 0 means no changes, 2 means changes applied.
const APPLY_SUCCESS_STATUSES: [i32; 2] = [0, 2];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServiceReport {
    pub package: String,
    pub service: String,
    pub desired: ServiceState,
    pub command: String,
    pub output: String,
    pub status: i32,
    pub successful: bool,
}

/// Drives the service managed by `package` to `desired` with the control
/// binary's declarative apply.
pub fn ensure_service<R: CommandRunner>(
    executor: &mut Executor<R>,
    package: &str,
    control_binary: &Path,
    desired: ServiceState,
) -> Result<ServiceReport, BootstrapError> {
    let Some(service) = service_for_package(package) else {
        return Err(executor.logger().fatal(BootstrapError::ServiceNotFound {
            package: package.to_string(),
        }));
    };

    let binary = control_binary.display().to_string();
    if !executor.exists(&binary) {
        return Err(executor.logger().fatal(BootstrapError::ControlBinaryNotFound {
            path: control_binary.to_path_buf(),
        }));
    }

    let invocation = Invocation::new(binary).args([
        "apply".to_string(),
        "--detailed-exitcodes".to_string(),
        "-e".to_string(),
        desired.manifest(service),
    ]);
    let result = executor.exec_and_capture(&invocation);
    if !APPLY_SUCCESS_STATUSES.contains(&result.status) {
        return Err(executor.logger().fatal(BootstrapError::ExecutionFailure {
            command: invocation.to_string(),
            status: result.status,
            output: result.output,
        }));
    }

    Ok(ServiceReport {
        package: package.to_string(),
        service: service.to_string(),
        desired,
        command: invocation.to_string(),
        output: result.output,
        status: result.status,
        successful: true,
    })
}

pub fn stop_and_disable_service<R: CommandRunner>(
    executor: &mut Executor<R>,
    package: &str,
    control_binary: &Path,
) -> Result<ServiceReport, BootstrapError> {
    ensure_service(
        executor,
        package,
        control_binary,
        ServiceState::STOPPED_AND_DISABLED,
    )
}
