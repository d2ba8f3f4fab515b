//! Running shell commands.

use std::cell::{Cell, RefCell};
use std::io::{self, BufRead};
use std::process::{Command, Stdio};

use tracing::debug;

/// Result of one command.
///
/// A stream that was not asked to be captured is normally empty here,
/// having already gone straight to the terminal. Executors that cannot
/// stream live return it instead and the interpreter prints it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShellOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub trait ShellExecutor {
    /// Run `command` to completion.
    ///
    /// # Errors
    ///
    /// The command could not be started at all. A non-zero exit is not an
    /// error here.
    fn run(&self, command: &str, capture_stdout: bool, capture_stderr: bool)
        -> io::Result<ShellOutput>;

    /// Ask the user whether to run `command`; the prompt has already been
    /// shown.
    ///
    /// # Errors
    ///
    /// Reading the answer failed.
    fn confirm(&self, command: &str) -> io::Result<bool>;
}

/// Runs commands through `$SHELL -c`, falling back to `/bin/sh`.
#[derive(Debug, Default)]
pub struct SystemShell;

impl SystemShell {
    fn shell() -> String {
        match std::env::var("SHELL") {
            Ok(shell) if !shell.trim().is_empty() => shell,
            _ => "/bin/sh".to_string(),
        }
    }
}

fn stdio(capture: bool) -> Stdio {
    if capture {
        Stdio::piped()
    } else {
        Stdio::inherit()
    }
}

impl ShellExecutor for SystemShell {
    #[tracing::instrument(level = "debug", skip(self))]
    fn run(
        &self,
        command: &str,
        capture_stdout: bool,
        capture_stderr: bool,
    ) -> io::Result<ShellOutput> {
        let output = Command::new(Self::shell())
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(stdio(capture_stdout))
            .stderr(stdio(capture_stderr))
            .output()?;
        // Killed by a signal: no code.
        let code = output.status.code().unwrap_or(1);
        debug!(code, "command finished");
        Ok(ShellOutput {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn confirm(&self, _command: &str) -> io::Result<bool> {
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_lowercase().starts_with('y'))
    }
}

/// Scripted executor: every command succeeds with empty output unless a
/// response was registered for it.
#[derive(Debug)]
pub struct MockShell {
    responses: Vec<(String, ShellOutput)>,
    approve: Cell<bool>,
    ran: RefCell<Vec<String>>,
}

impl Default for MockShell {
    fn default() -> Self {
        MockShell {
            responses: Vec::new(),
            approve: Cell::new(true),
            ran: RefCell::new(Vec::new()),
        }
    }
}

impl MockShell {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn respond(
        mut self,
        command: impl Into<String>,
        code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        self.responses.push((
            command.into(),
            ShellOutput {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            },
        ));
        self
    }

    /// Answer every confirmation prompt with `approve`.
    #[must_use]
    pub fn approving(self, approve: bool) -> Self {
        self.approve.set(approve);
        self
    }

    /// Commands actually run, in order.
    pub fn commands(&self) -> Vec<String> {
        self.ran.borrow().clone()
    }
}

impl ShellExecutor for MockShell {
    fn run(
        &self,
        command: &str,
        _capture_stdout: bool,
        _capture_stderr: bool,
    ) -> io::Result<ShellOutput> {
        self.ran.borrow_mut().push(command.to_string());
        Ok(self
            .responses
            .iter()
            .find(|(cmd, _)| cmd == command)
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }

    fn confirm(&self, _command: &str) -> io::Result<bool> {
        Ok(self.approve.get())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_registered_response() {
        let shell = MockShell::new().respond("ls", 2, "a\n", "oops");
        let out = shell.run("ls", true, true).unwrap();
        assert_eq!(out.code, 2);
        assert_eq!(out.stdout, "a\n");
        assert_eq!(shell.run("pwd", false, false).unwrap(), ShellOutput::default());
        assert_eq!(shell.commands(), vec!["ls".to_string(), "pwd".to_string()]);
    }

    #[test]
    fn test_mock_confirmation() {
        assert!(MockShell::new().confirm("x").unwrap());
        assert!(!MockShell::new().approving(false).confirm("x").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_shell_captures_and_reports_code() {
        let out = SystemShell
            .run("printf hi; printf err >&2; exit 3", true, true)
            .unwrap();
        assert_eq!(out.code, 3);
        assert_eq!(out.stdout, "hi");
        assert_eq!(out.stderr, "err");
    }
}
