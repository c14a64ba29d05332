// src/exec/command.rs

use std::fmt;

use crate::errors::{Result, RunwatchError};

/// One configured command: an executable plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace. No quoting or escaping is
    /// interpreted. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The ordered command sequence run on every trigger. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    commands: Vec<CommandLine>,
}

impl CommandSpec {
    pub fn new(commands: Vec<CommandLine>) -> Self {
        Self { commands }
    }

    /// Parse one command per input line.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut commands = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let command = CommandLine::parse(line).ok_or_else(|| {
                RunwatchError::ConfigError(format!(
                    "command #{} is empty (got {:?})",
                    index + 1,
                    line
                ))
            })?;
            commands.push(command);
        }
        Ok(Self { commands })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandLine> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
