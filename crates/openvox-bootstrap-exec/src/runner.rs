use std::ffi::OsString;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Status reported for a program that could not be found, as a shell would.
pub(crate) const STATUS_NOT_FOUND: i32 = 127;
const STATUS_NOT_EXECUTABLE: i32 = 126;

/// One external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_list(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Merged stdout/stderr and exit status of one command run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub output: String,
    pub status: i32,
}

impl CommandResult {
    pub fn new(output: impl Into<String>, status: i32) -> Self {
        Self {
            output: output.into(),
            status,
        }
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }

    pub(crate) fn not_found(program: &str) -> Self {
        Self::new(format!("{program}: command not found\n"), STATUS_NOT_FOUND)
    }
}

/// Capability to run external commands and look up executables.
///
/// [`ProcessRunner`] talks to the real system; [`crate::ScriptedRunner`]
/// replays canned responses in tests.
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandResult;

    fn exists(&self, program: &str) -> bool;
}

/// Runs commands as child processes, blocking until each completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandResult {
        match run_merged(invocation) {
            Ok(result) => result,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                CommandResult::not_found(invocation.program())
            }
            Err(err) => CommandResult::new(
                format!("{}: {err}\n", invocation.program()),
                STATUS_NOT_EXECUTABLE,
            ),
        }
    }

    fn exists(&self, program: &str) -> bool {
        find_executable(program).is_some()
    }
}

fn run_merged(invocation: &Invocation) -> io::Result<CommandResult> {
    let (mut reader, writer) = io::pipe()?;
    let mut command = Command::new(invocation.program());
    command
        .args(invocation.arg_list())
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);
    let mut child = command.spawn()?;
    // Release the parent's copies of the write end so EOF arrives when the
    // child exits.
    drop(command);

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    let status = child.wait()?;

    Ok(CommandResult {
        output: String::from_utf8_lossy(&buffer).into_owned(),
        status: exit_code(status),
    })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Resolves `program` the way a shell would: paths containing `/` are checked
/// directly, bare names are searched on `PATH`.
pub fn find_executable(program: &str) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    if program.contains('/') {
        let path = PathBuf::from(program);
        return is_executable(&path).then_some(path);
    }

    let path_var = std::env::var_os("PATH").unwrap_or_else(OsString::new);
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

pub(crate) fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
