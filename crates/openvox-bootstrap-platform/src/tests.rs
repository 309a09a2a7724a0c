use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use openvox_bootstrap_core::{BootstrapConfig, BootstrapError, OsFamily};
use openvox_bootstrap_exec::{CommandResult, Executor, Level, LogBuffer, Logger, ScriptedRunner};

use super::*;

static TEST_ROOT_COUNTER: AtomicU64 = AtomicU64::new(0);

struct FactsFixture {
    name: &'static str,
    release: &'static str,
    codename: &'static str,
}

const UBUNTU_2404: FactsFixture = FactsFixture {
    name: "Ubuntu",
    release: "24.04",
    codename: "noble",
};

const DEBIAN_13: FactsFixture = FactsFixture {
    name: "Debian",
    release: "n/a",
    codename: "trixie",
};

const ROCKY_9: FactsFixture = FactsFixture {
    name: "Rocky",
    release: "9.5",
    codename: "Blue Onyx",
};

const UNKNOWN: FactsFixture = FactsFixture {
    name: "Unknown",
    release: "1000.99",
    codename: "Mysterious Onions",
};

fn test_install_root() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let sequence = TEST_ROOT_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "openvox-bootstrap-platform-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        sequence
    ))
}

fn write_facts_script(root: &Path) -> PathBuf {
    let dir = root.join("facts").join("tasks");
    std::fs::create_dir_all(&dir).expect("must create facts dir");
    let script = dir.join("bash.sh");
    std::fs::write(&script, "#!/bin/bash\n").expect("must write facts script");
    script
}

fn facts_runner(fixture: &FactsFixture) -> ScriptedRunner {
    let name = fixture.name.to_string();
    let release = fixture.release.to_string();
    let document = format!(
        "{{\"os\": {{\"name\": \"{}\", \"distro\": {{\"codename\": \"{}\"}}, \"release\": {{\"full\": \"{}\"}}}}}}",
        fixture.name, fixture.codename, fixture.release
    );
    ScriptedRunner::new().respond_with("bash", move |invocation| {
        match invocation.arg_list().get(1).map(String::as_str) {
            Some("platform") => CommandResult::new(format!("{name}\n"), 0),
            Some("release") => CommandResult::new(format!("{release}\n"), 0),
            _ => CommandResult::new(document.clone(), 0),
        }
    })
}

fn executor_for(runner: ScriptedRunner) -> (Executor<ScriptedRunner>, LogBuffer) {
    let (logger, buffer) = Logger::memory();
    (Executor::new(runner, logger), buffer)
}

fn resolve_fixture(fixture: &FactsFixture) -> (Result<openvox_bootstrap_core::PlatformContext, BootstrapError>, LogBuffer) {
    let root = test_install_root();
    let script = write_facts_script(&root);
    let provider = FactsProvider::at(&script).expect("provider must be found");
    let (mut executor, buffer) = executor_for(facts_runner(fixture));

    let result = resolve_platform(&mut executor, &provider);

    let _ = std::fs::remove_dir_all(&root);
    (result, buffer)
}

#[test]
fn resolves_ubuntu_platform() {
    let (result, buffer) = resolve_fixture(&UBUNTU_2404);
    let platform = result.expect("ubuntu must resolve");

    assert_eq!(platform.name(), "Ubuntu");
    assert_eq!(platform.family(), OsFamily::Ubuntu);
    assert_eq!(platform.major_version(), "24");
    assert_eq!(platform.full_version(), "24.04");

    let messages = buffer.messages(Level::Info);
    for expected in [
        "Assigned platform=Ubuntu",
        "Assigned os_full_version=24.04",
        "Assigned os_major_version=24",
        "Assigned os_family=ubuntu",
    ] {
        assert!(
            messages.iter().any(|message| message == expected),
            "missing '{expected}' in {messages:?}"
        );
    }
}

#[test]
fn resolves_pre_release_debian_from_codename() {
    let (result, buffer) = resolve_fixture(&DEBIAN_13);
    let platform = result.expect("debian must resolve");

    assert_eq!(platform.family(), OsFamily::Debian);
    assert_eq!(platform.full_version(), "13");
    assert_eq!(platform.major_version(), "13");
    assert!(buffer
        .messages(Level::Info)
        .contains(&"Assigned os_family=debian".to_string()));
}

#[test]
fn resolves_rocky_as_el() {
    let (result, _buffer) = resolve_fixture(&ROCKY_9);
    let platform = result.expect("rocky must resolve");

    assert_eq!(platform.family(), OsFamily::El);
    assert_eq!(platform.full_version(), "9.5");
    assert_eq!(platform.major_version(), "9");
}

#[test]
fn unknown_platform_fails() {
    let (result, buffer) = resolve_fixture(&UNKNOWN);
    let err = result.expect_err("unknown platform must fail");

    assert!(matches!(err, BootstrapError::UnknownPlatform { .. }));
    assert!(
        err.to_string().contains("Unhandled platform: 'Unknown'"),
        "unexpected error: {err}"
    );
    assert_eq!(buffer.messages(Level::Error), vec![err.to_string()]);
}

#[test]
fn unknown_codename_without_release_fails() {
    let fixture = FactsFixture {
        name: "Debian",
        release: "n/a",
        codename: "sid",
    };
    let (result, _buffer) = resolve_fixture(&fixture);
    let err = result.expect_err("unresolvable version must fail");

    assert!(matches!(err, BootstrapError::UnknownPlatform { .. }));
    assert!(err.to_string().contains("unable to determine the release version"));
}

#[test]
fn missing_facts_provider_fails() {
    let mut config = BootstrapConfig::default();
    config.install_root = Some(test_install_root());

    let err = FactsProvider::locate(&config).expect_err("missing provider must fail");
    assert!(matches!(err, BootstrapError::MissingFactsProvider { .. }));
    assert!(err
        .to_string()
        .contains("Unable to find the puppetlabs-facts"));
}

#[test]
fn facts_provider_is_found_under_install_root() {
    let root = test_install_root();
    let script = write_facts_script(&root);
    let mut config = BootstrapConfig::default();
    config.install_root = Some(root.clone());

    let provider = FactsProvider::locate(&config).expect("provider must be found");
    let (mut executor, _buffer) = executor_for(facts_runner(&UBUNTU_2404));
    provider
        .platform(&mut executor)
        .expect("platform must be queried");
    assert_eq!(
        executor.runner().calls()[0].arg_list(),
        [script.display().to_string(), "platform".to_string()]
    );

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn facts_provider_failure_surfaces_output() {
    let root = test_install_root();
    let script = write_facts_script(&root);
    let provider = FactsProvider::at(&script).expect("provider must be found");
    let (mut executor, _buffer) =
        executor_for(ScriptedRunner::new().respond("bash", "bash.sh: syntax error\n", 2));

    let err = provider
        .platform(&mut executor)
        .expect_err("failing provider must error");
    assert_eq!(err.exit_status(), Some(2));
    assert_eq!(err.output(), Some("bash.sh: syntax error\n"));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn malformed_facts_document_is_not_a_command_failure() {
    let root = test_install_root();
    let script = write_facts_script(&root);
    let provider = FactsProvider::at(&script).expect("provider must be found");
    let runner = ScriptedRunner::new().respond_with("bash", |invocation| {
        match invocation.arg_list().get(1).map(String::as_str) {
            Some("platform") => CommandResult::new("Debian\n", 0),
            Some("release") => CommandResult::new("n/a\n", 0),
            _ => CommandResult::new("facts: not json\n", 0),
        }
    });
    let (mut executor, buffer) = executor_for(runner);

    let err = resolve_platform(&mut executor, &provider).expect_err("bad facts must fail");

    assert!(matches!(err, BootstrapError::InvalidFacts { .. }));
    assert_eq!(err.kind(), "openvox-bootstrap/invalid-facts");
    assert_eq!(err.exit_status(), None);
    assert_eq!(err.output(), None);
    assert!(buffer.messages(Level::Error)[0].contains("are not valid JSON"));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn codename_table_lookups() {
    assert_eq!(codename_version("trixie"), Some("13"));
    assert_eq!(codename_version("Bookworm"), Some("12"));
    assert_eq!(codename_version("noble"), Some("24.04"));
    assert_eq!(codename_version("sid"), None);
}

#[test]
fn cpu_architecture_normalizes_for_debian_family() {
    assert_eq!(normalize_cpu_architecture("x86_64\n", OsFamily::Debian), "amd64");
    assert_eq!(normalize_cpu_architecture("aarch64", OsFamily::Ubuntu), "arm64");
    assert_eq!(normalize_cpu_architecture("amd64", OsFamily::Debian), "amd64");
    assert_eq!(normalize_cpu_architecture("x86_64", OsFamily::El), "x86_64");
    assert_eq!(normalize_cpu_architecture("aarch64", OsFamily::Fedora), "aarch64");
}

#[test]
fn resolve_cpu_architecture_queries_uname() {
    let (mut executor, buffer) =
        executor_for(ScriptedRunner::new().respond("uname", "aarch64\n", 0));

    let cpu_arch =
        resolve_cpu_architecture(&mut executor, OsFamily::Ubuntu).expect("arch must resolve");

    assert_eq!(cpu_arch, "arm64");
    assert_eq!(executor.runner().calls()[0].to_string(), "uname -m");
    assert!(buffer
        .messages(Level::Info)
        .contains(&"Assigned cpu_arch=arm64".to_string()));
}

#[test]
fn noarch_packages_skip_the_kernel_query() {
    let (mut executor, buffer) = executor_for(ScriptedRunner::new());

    let debian = resolve_package_architecture(&mut executor, "openvox-server", OsFamily::Debian)
        .expect("noarch must resolve");
    assert_eq!(debian.package_arch, "all");
    assert_eq!(debian.cpu_arch, None);

    let el = resolve_package_architecture(&mut executor, "openvoxdb", OsFamily::El)
        .expect("noarch must resolve");
    assert_eq!(el.package_arch, "noarch");

    assert!(executor.runner().calls().is_empty());
    assert!(buffer
        .messages(Level::Info)
        .contains(&"Assigned package_arch=noarch".to_string()));
}

#[test]
fn native_packages_use_cpu_architecture() {
    let (mut executor, buffer) =
        executor_for(ScriptedRunner::new().respond("uname", "x86_64\n", 0));

    let context = resolve_package_architecture(&mut executor, "openvox-agent", OsFamily::El)
        .expect("arch must resolve");

    assert_eq!(context.cpu_arch.as_deref(), Some("x86_64"));
    assert_eq!(context.package_arch, "x86_64");
    let messages = buffer.messages(Level::Info);
    assert!(messages.contains(&"Assigned cpu_arch=x86_64".to_string()));
    assert!(messages.contains(&"Assigned package_arch=x86_64".to_string()));
}

#[test]
fn failing_uname_is_an_execution_failure() {
    let (mut executor, _buffer) =
        executor_for(ScriptedRunner::new().respond("uname", "uname: broken\n", 1));

    let err = resolve_cpu_architecture(&mut executor, OsFamily::Debian)
        .expect_err("failing uname must error");
    assert!(matches!(err, BootstrapError::ExecutionFailure { status: 1, .. }));
}
