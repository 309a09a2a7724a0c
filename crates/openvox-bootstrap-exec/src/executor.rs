use std::time::Duration;

use crate::log::Logger;
use crate::runner::{CommandResult, CommandRunner, Invocation};

/// Pairs a [`CommandRunner`] with a [`Logger`] and remembers the most recent
/// logged command result.
pub struct Executor<R: CommandRunner> {
    runner: R,
    logger: Logger,
    last: Option<CommandResult>,
    sleep: Box<dyn FnMut(Duration)>,
}

impl<R: CommandRunner> Executor<R> {
    pub fn new(runner: R, logger: Logger) -> Self {
        Self {
            runner,
            logger,
            last: None,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replaces the blocking sleep used between retry attempts.
    pub fn with_sleep<F>(mut self, sleep: F) -> Self
    where
        F: FnMut(Duration) + 'static,
    {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn exists(&self, program: &str) -> bool {
        self.runner.exists(program)
    }

    /// Runs `invocation`, logging `Executing: ...`, the command's combined
    /// output, and `Status: <code>`. The result is also kept as
    /// [`Executor::last_result`].
    pub fn exec_and_capture(&mut self, invocation: &Invocation) -> CommandResult {
        self.logger.info(format!("Executing: {invocation}"));
        let result = self.runner.run(invocation);
        self.logger.output(&result.output);
        self.logger.info(format!("Status: {}", result.status));
        self.last = Some(result.clone());
        result
    }

    /// Runs `invocation` without logging, for queries whose output is parsed.
    pub fn query(&mut self, invocation: &Invocation) -> CommandResult {
        self.runner.run(invocation)
    }

    pub fn last_result(&self) -> Option<&CommandResult> {
        self.last.as_ref()
    }

    pub(crate) fn pause(&mut self, delay: Duration) {
        (self.sleep)(delay);
    }
}
