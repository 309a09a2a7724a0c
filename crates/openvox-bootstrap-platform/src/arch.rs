use openvox_bootstrap_core::{is_noarch_package, ArchitectureContext, BootstrapError, OsFamily};
use openvox_bootstrap_exec::{CommandRunner, Executor, Invocation};

/// Debian-family packages use dpkg architecture names; everything else keeps
/// the kernel's spelling.
pub fn normalize_cpu_architecture(raw: &str, family: OsFamily) -> String {
    let raw = raw.trim();
    if !family.is_debian_like() {
        return raw.to_string();
    }
    match raw {
        "x86_64" => "amd64".to_string(),
        "aarch64" => "arm64".to_string(),
        other => other.to_string(),
    }
}

pub fn resolve_cpu_architecture<R: CommandRunner>(
    executor: &mut Executor<R>,
    family: OsFamily,
) -> Result<String, BootstrapError> {
    let invocation = Invocation::new("uname").arg("-m");
    let result = executor.query(&invocation);
    if !result.success() {
        return Err(executor.logger().fatal(BootstrapError::ExecutionFailure {
            command: invocation.to_string(),
            status: result.status,
            output: result.output,
        }));
    }

    let cpu_arch = normalize_cpu_architecture(&result.output, family);
    executor.logger().assigned("cpu_arch", &cpu_arch);
    Ok(cpu_arch)
}

/// Architecture-independent packages get `all`/`noarch` without querying the
/// kernel.
pub fn resolve_package_architecture<R: CommandRunner>(
    executor: &mut Executor<R>,
    package_name: &str,
    family: OsFamily,
) -> Result<ArchitectureContext, BootstrapError> {
    let context = if is_noarch_package(package_name) {
        ArchitectureContext::noarch(family)
    } else {
        ArchitectureContext::native(resolve_cpu_architecture(executor, family)?)
    };
    executor
        .logger()
        .assigned("package_arch", &context.package_arch);
    Ok(context)
}
