//! Command-line flags and the run configuration resolved from them.
//!
//! Flags for `rad` itself come before the script path; everything after the
//! path belongs to the script's own `args:` block.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rad_diagnostic::emitter::ColorMode;
use rad_eval::collab::{HttpError, MockResponse};
use rad_eval::InterpreterConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => ColorMode::Auto,
            ColorChoice::Always => ColorMode::Always,
            ColorChoice::Never => ColorMode::Never,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "rad", version, about = "Run Rad scripts")]
pub struct Cli {
    /// Print the documentation for an error code, e.g. RAD20028.
    #[arg(long, value_name = "CODE")]
    pub explain: Option<String>,

    /// Parse the script and report problems without running it.
    #[arg(long)]
    pub check: bool,

    /// Answer HTTP requests whose URL matches REGEX with the contents of FILE.
    #[arg(long = "mock-response", value_name = "REGEX:FILE")]
    pub mock_responses: Vec<String>,

    #[arg(long, value_enum, env = "RAD_COLOR", default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Diagnostics shown before the rest are summarized (0 = no limit).
    #[arg(long, default_value_t = 10)]
    pub error_limit: usize,

    /// Ask before running every shell command.
    #[arg(long)]
    pub confirm_shell: bool,

    /// Nested function calls allowed before the script fails.
    #[arg(long, default_value_t = 1000)]
    pub stack_depth: usize,

    /// The script, then its own arguments. Everything after the script
    /// path goes to the script, `--help` included.
    #[arg(
        value_name = "SCRIPT [ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present = "explain"
    )]
    pub command: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no script given")]
    MissingScript,
    #[error(transparent)]
    Mock(#[from] HttpError),
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Command {
    Explain(String),
    Run(RunConfig),
}

#[derive(Debug)]
pub struct RunConfig {
    pub script: PathBuf,
    pub script_args: Vec<String>,
    pub check_only: bool,
    pub color: ColorMode,
    pub mocks: Vec<MockResponse>,
    pub error_limit: usize,
    pub confirm_shell: bool,
    pub stack_depth: usize,
}

impl Cli {
    /// `no_color` is whether `NO_COLOR` is set; it overrides `--color`.
    pub fn resolve(self, no_color: bool) -> Result<Command, ConfigError> {
        if let Some(code) = self.explain {
            return Ok(Command::Explain(code));
        }
        let mut command = self.command.into_iter();
        let script = command.next().map(PathBuf::from).ok_or(ConfigError::MissingScript)?;
        let mocks = self
            .mock_responses
            .iter()
            .map(|spec| MockResponse::parse(spec))
            .collect::<Result<Vec<_>, _>>()?;
        let color = if no_color {
            ColorMode::Never
        } else {
            self.color.into()
        };
        Ok(Command::Run(RunConfig {
            script,
            script_args: command.collect(),
            check_only: self.check,
            color,
            mocks,
            error_limit: self.error_limit,
            confirm_shell: self.confirm_shell,
            stack_depth: self.stack_depth,
        }))
    }
}

impl RunConfig {
    /// Name shown in usage text and diagnostics.
    pub fn script_name(&self) -> String {
        self.script.file_name().map_or_else(
            || self.script.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    pub fn interpreter_config(&self, stdout_is_tty: bool) -> InterpreterConfig {
        InterpreterConfig {
            max_call_depth: self.stack_depth,
            color: self.color.should_use_colors(stdout_is_tty),
            confirm_shell: self.confirm_shell,
            script_name: self.script_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolve(args: &[&str], no_color: bool) -> Result<Command, ConfigError> {
        let cli = match Cli::try_parse_from(std::iter::once("rad").chain(args.iter().copied())) {
            Ok(cli) => cli,
            Err(err) => panic!("{err}"),
        };
        cli.resolve(no_color)
    }

    fn run_config(args: &[&str]) -> RunConfig {
        match resolve(args, false) {
            Ok(Command::Run(config)) => config,
            other => panic!("expected a run, got {other:?}"),
        }
    }

    #[test]
    fn test_script_args_follow_the_path() {
        let config = run_config(&["--stack-depth", "50", "deploy.rad", "prod", "--force", "-n", "3"]);
        assert_eq!(config.script, PathBuf::from("deploy.rad"));
        assert_eq!(config.script_args, vec!["prod", "--force", "-n", "3"]);
        assert_eq!(config.stack_depth, 50);
        assert_eq!(config.script_name(), "deploy.rad");
    }

    #[test]
    fn test_help_after_the_script_belongs_to_the_script() {
        let config = run_config(&["tool.rad", "--help"]);
        assert_eq!(config.script_args, vec!["--help"]);
    }

    #[test]
    fn test_no_color_wins() {
        let Ok(Command::Run(config)) = resolve(&["--color", "always", "a.rad"], true) else {
            panic!("expected a run");
        };
        assert_eq!(config.color, ColorMode::Never);
        assert!(!config.interpreter_config(true).color);
    }

    #[test]
    fn test_explain_needs_no_script() {
        assert!(matches!(
            resolve(&["--explain", "RAD20028"], false),
            Ok(Command::Explain(code)) if code == "RAD20028"
        ));
    }

    #[test]
    fn test_bad_mock_spec_is_rejected() {
        let result = resolve(&["--mock-response", "no-separator", "a.rad"], false);
        assert!(matches!(result, Err(ConfigError::Mock(_))));
    }

    #[test]
    fn test_interpreter_config_carries_limits() {
        let config = run_config(&["--confirm-shell", "--color", "never", "dir/tool.rad"]);
        let interp = config.interpreter_config(true);
        assert_eq!(interp.max_call_depth, 1000);
        assert!(interp.confirm_shell);
        assert!(!interp.color);
        assert_eq!(interp.script_name, "tool.rad");
    }
}
