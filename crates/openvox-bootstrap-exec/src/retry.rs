use std::time::Duration;

use openvox_bootstrap_core::{BootstrapError, RetrySettings};
use regex::Regex;

use crate::executor::Executor;
use crate::runner::{CommandResult, CommandRunner, Invocation};

/// Bounded retry loop parameters.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    required_pattern: Option<Regex>,
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            required_pattern: None,
        }
    }

    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(settings.attempts, settings.delay())
    }

    /// Only retry failures whose output matches `pattern`. An empty pattern
    /// retries on any non-zero status.
    pub fn retry_if(mut self, pattern: &str) -> Result<Self, BootstrapError> {
        if pattern.is_empty() {
            self.required_pattern = None;
            return Ok(self);
        }
        let regex = Regex::new(pattern).map_err(|err| BootstrapError::InvalidRetryPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;
        self.required_pattern = Some(regex);
        Ok(self)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn required_pattern(&self) -> Option<&str> {
        self.required_pattern.as_ref().map(Regex::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting,
    Retry,
    Succeeded,
    Aborted,
    Exhausted,
}

/// Terminal state of a retry loop together with the last attempt's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
    pub state: RetryState,
    pub attempts: u32,
    pub command: String,
    pub pattern: Option<String>,
    pub result: CommandResult,
}

impl RetryOutcome {
    /// Exit status of the last attempt made.
    pub fn status(&self) -> i32 {
        self.result.status
    }

    pub fn succeeded(&self) -> bool {
        self.state == RetryState::Succeeded
    }

    pub fn into_result(self) -> Result<CommandResult, BootstrapError> {
        match self.state {
            RetryState::Succeeded => Ok(self.result),
            RetryState::Aborted => Err(BootstrapError::RetryAborted {
                command: self.command,
                pattern: self.pattern.unwrap_or_default(),
                status: self.result.status,
                output: self.result.output,
            }),
            _ if self.attempts > 1 => Err(BootstrapError::RetryExhausted {
                command: self.command,
                attempts: self.attempts,
                status: self.result.status,
                output: self.result.output,
            }),
            _ => Err(BootstrapError::ExecutionFailure {
                command: self.command,
                status: self.result.status,
                output: self.result.output,
            }),
        }
    }
}

impl<R: CommandRunner> Executor<R> {
    /// Runs `invocation` until it succeeds, its failure output stops matching
    /// the policy's pattern, or the attempt budget is spent.
    pub fn with_retries_if(&mut self, policy: &RetryPolicy, invocation: &Invocation) -> RetryOutcome {
        let command = invocation.to_string();
        let max_attempts = policy.max_attempts();
        let mut attempt = 1;
        let mut state = RetryState::Attempting;
        let mut last = CommandResult::default();

        loop {
            state = match state {
                RetryState::Attempting => {
                    self.logger()
                        .info(format!("Attempt {attempt} of {max_attempts}: {command}"));
                    last = self.exec_and_capture(invocation);
                    if last.success() {
                        RetryState::Succeeded
                    } else if policy
                        .required_pattern
                        .as_ref()
                        .is_some_and(|pattern| !pattern.is_match(&last.output))
                    {
                        RetryState::Aborted
                    } else if attempt < max_attempts {
                        RetryState::Retry
                    } else {
                        RetryState::Exhausted
                    }
                }
                RetryState::Retry => {
                    self.logger().info(format!(
                        "Retrying in {} seconds...",
                        render_seconds(policy.delay())
                    ));
                    self.pause(policy.delay());
                    attempt += 1;
                    RetryState::Attempting
                }
                RetryState::Aborted => {
                    self.logger().info(format!(
                        "Command failed but output did not match /{}/. Aborting retries.",
                        policy.required_pattern().unwrap_or_default()
                    ));
                    break;
                }
                RetryState::Succeeded | RetryState::Exhausted => break,
            };
        }

        RetryOutcome {
            state,
            attempts: attempt,
            command,
            pattern: policy.required_pattern().map(str::to_string),
            result: last,
        }
    }
}

/// `5s` -> `5`, `100ms` -> `0.1`.
fn render_seconds(delay: Duration) -> String {
    format!("{}", delay.as_secs_f64())
}
