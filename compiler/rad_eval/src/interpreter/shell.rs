//! `$cmd` statements.

use rad_diagnostic::ErrorCode;
use rad_ir::ast::ShellStmt;
use tracing::{debug, info};

use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{other, shell_failed, EvalResult};
use crate::flow::Flow;
use crate::value::Value;

impl Interpreter<'_> {
    /// Run a shell command. Targets bind `code`, then captured stdout and
    /// stderr; a non-zero code with neither targets nor `catch:` fails.
    pub(super) fn exec_shell(&mut self, shell: &ShellStmt, env: &Environment) -> EvalResult<Flow> {
        let command = self.eval_expr(&shell.cmd, env)?.to_printable(false);

        if !shell.quiet {
            self.print.print_err(&format!("⚡️ {command}\n"));
        }
        if shell.confirm || self.config.confirm_shell {
            self.print.print("Run above command? [y/n] > ");
            let approved = self.shell.confirm(&command).map_err(|e| {
                other(ErrorCode::StdinRead, format!("Failed to read confirmation: {e}"))
            })?;
            if !approved {
                return Err(other(ErrorCode::GenericRuntime, "Command was not confirmed")
                    .with_span(shell.cmd.span));
            }
        }

        let capture_stdout = shell.targets.len() >= 2;
        let capture_stderr = shell.targets.len() >= 3;
        info!(%command, "running shell command");
        let output = self
            .shell
            .run(&command, capture_stdout, capture_stderr)
            .map_err(|e| {
                other(
                    ErrorCode::GenericRuntime,
                    format!("Failed to run command '{command}': {e}"),
                )
                .with_span(shell.cmd.span)
            })?;
        debug!(code = output.code, "shell command finished");

        if !capture_stdout && !output.stdout.is_empty() {
            self.print.print(&output.stdout);
        }
        if !capture_stderr && !output.stderr.is_empty() {
            self.print.print_err(&output.stderr);
        }

        let bound = [
            Value::Int(i64::from(output.code)),
            Value::str(output.stdout),
            Value::str(output.stderr),
        ];
        for (target, value) in shell.targets.iter().zip(bound) {
            env.define(&target.name, value);
        }

        if output.code == 0 {
            return Ok(Flow::Normal);
        }
        match &shell.catch {
            Some(block) => self.exec_block(block, env),
            None if shell.targets.is_empty() => {
                Err(shell_failed(&command, output.code).with_span(shell.cmd.span))
            }
            None => Ok(Flow::Normal),
        }
    }
}
