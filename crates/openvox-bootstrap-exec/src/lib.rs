mod executor;
mod log;
mod retry;
mod runner;
mod scripted;

pub use executor::Executor;
pub use log::{Level, LogBuffer, LogStyle, Logger};
pub use retry::{RetryOutcome, RetryPolicy, RetryState};
pub use runner::{find_executable, CommandResult, CommandRunner, Invocation, ProcessRunner};
pub use scripted::ScriptedRunner;
