//! Test doubles shared by the unit tests

use crate::error::PrepareError;
use crate::resolvers::{Outcome, Resolver, SourceKind};
use crate::runner::{CommandOutput, CommandRunner};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

/// Command runner answering from a table of canned responses
///
/// Keys are full command lines ("dpkg -s git"). Commands without an entry
/// behave like a program that is not installed.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandOutput>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command: &str, success: bool, stdout: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandOutput {
                success,
                code: Some(if success { 0 } else { 1 }),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PrepareError> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.borrow_mut().push(line.clone());

        self.responses
            .get(&line)
            .cloned()
            .ok_or_else(|| PrepareError::Command {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "not scripted"),
            })
    }
}

impl CommandRunner for ScriptedRunner {
    fn capture(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PrepareError> {
        self.run(program, args)
    }

    fn stream(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PrepareError> {
        self.run(program, args)
    }
}

/// Shared record of resolver calls, in order
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Resolver with a fixed answer table that records every call
pub struct FakeResolver {
    name: &'static str,
    kind: SourceKind,
    outcomes: HashMap<String, Outcome>,
    failing_installs: Vec<String>,
    failing_finds: HashMap<String, fn() -> PrepareError>,
    bootstrap_error: Option<fn() -> PrepareError>,
    log: CallLog,
}

impl FakeResolver {
    pub fn new(name: &'static str, kind: SourceKind, log: &CallLog) -> Self {
        Self {
            name,
            kind,
            outcomes: HashMap::new(),
            failing_installs: Vec::new(),
            failing_finds: HashMap::new(),
            bootstrap_error: None,
            log: log.clone(),
        }
    }

    pub fn with(mut self, dependency: &str, outcome: Outcome) -> Self {
        self.outcomes.insert(dependency.to_string(), outcome);
        self
    }

    pub fn failing_install(mut self, dependency: &str) -> Self {
        self.failing_installs.push(dependency.to_string());
        self
    }

    pub fn failing_find(mut self, dependency: &str, error: fn() -> PrepareError) -> Self {
        self.failing_finds.insert(dependency.to_string(), error);
        self
    }

    pub fn failing_bootstrap(mut self, error: fn() -> PrepareError) -> Self {
        self.bootstrap_error = Some(error);
        self
    }
}

impl Resolver for FakeResolver {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn bootstrap(&self) -> Result<(), PrepareError> {
        self.log.borrow_mut().push(format!("{}.bootstrap", self.name));
        match self.bootstrap_error {
            Some(make_error) => Err(make_error()),
            None => Ok(()),
        }
    }

    fn find(&self, dependency: &str) -> Result<Outcome, PrepareError> {
        self.log
            .borrow_mut()
            .push(format!("{}.find({})", self.name, dependency));
        if let Some(make_error) = self.failing_finds.get(dependency) {
            return Err(make_error());
        }
        Ok(self
            .outcomes
            .get(dependency)
            .copied()
            .unwrap_or(Outcome::Unknown))
    }

    fn install(&self, dependency: &str) -> Result<(), PrepareError> {
        self.log
            .borrow_mut()
            .push(format!("{}.install({})", self.name, dependency));
        if !self.outcomes.contains_key(dependency) {
            return Err(crate::resolvers::not_in_catalog(self, dependency));
        }
        if self.failing_installs.iter().any(|d| d == dependency) {
            return Err(PrepareError::InstallFailed {
                dependency: dependency.to_string(),
                resolver: self.name.to_string(),
                reason: "exit status 1".to_string(),
            });
        }
        Ok(())
    }
}
