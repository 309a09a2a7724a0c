use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::runner::{find_executable, CommandResult, CommandRunner, Invocation};

type Handler = Box<dyn FnMut(&Invocation) -> CommandResult>;

/// [`CommandRunner`] that replays canned responses and records every call.
///
/// A program exists once a response is registered for it, unless it was
/// marked absent. Absolute paths not registered here fall back to the real
/// filesystem check. Unregistered programs behave as "command not found".
#[derive(Default)]
pub struct ScriptedRunner {
    handlers: BTreeMap<String, Handler>,
    absent: BTreeSet<String>,
    calls: Vec<Invocation>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every run of `program` yields `output` and `status`.
    pub fn respond(self, program: &str, output: &str, status: i32) -> Self {
        let result = CommandResult::new(output, status);
        self.respond_with(program, move |_| result.clone())
    }

    /// Runs of `program` yield `results` in order; the last one repeats.
    pub fn respond_sequence(self, program: &str, results: Vec<CommandResult>) -> Self {
        let mut queue = VecDeque::from(results);
        self.respond_with(program, move |_| {
            if queue.len() > 1 {
                queue.pop_front().unwrap_or_default()
            } else {
                queue.front().cloned().unwrap_or_default()
            }
        })
    }

    pub fn respond_with<F>(mut self, program: &str, handler: F) -> Self
    where
        F: FnMut(&Invocation) -> CommandResult + 'static,
    {
        self.handlers.insert(program.to_string(), Box::new(handler));
        self
    }

    /// Echoes `<program> given: <args>` with status 0.
    pub fn echo_args(self, program: &str) -> Self {
        let label = program.to_string();
        self.respond_with(program, move |invocation| {
            CommandResult::new(
                format!("{label} given: {}\n", invocation.arg_list().join(" ")),
                0,
            )
        })
    }

    /// Behave as if `program` is not installed.
    pub fn absent(mut self, program: &str) -> Self {
        self.absent.insert(program.to_string());
        self
    }

    pub fn calls(&self) -> &[Invocation] {
        &self.calls
    }

    pub fn calls_to(&self, program: &str) -> Vec<&Invocation> {
        self.calls
            .iter()
            .filter(|call| call.program() == program)
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandResult {
        self.calls.push(invocation.clone());
        if self.absent.contains(invocation.program()) {
            return CommandResult::not_found(invocation.program());
        }
        match self.handlers.get_mut(invocation.program()) {
            Some(handler) => handler(invocation),
            None => CommandResult::not_found(invocation.program()),
        }
    }

    fn exists(&self, program: &str) -> bool {
        if self.absent.contains(program) {
            return false;
        }
        if self.handlers.contains_key(program) {
            return true;
        }
        program.contains('/') && find_executable(program).is_some()
    }
}
