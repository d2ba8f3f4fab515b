//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use rustc_hash::FxHashMap;

use super::{Interpreter, InterpreterConfig};
use crate::builtins::BuiltinRegistry;
use crate::collab::{HttpClient, ShellExecutor, SystemShell, UnavailableHttpClient};
use crate::defer::DeferStack;
use crate::diagnostics::CallStack;
use crate::environment::Environment;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// Unset collaborators default to the real ones: stdout/stderr printing,
/// the system shell, and an HTTP client that fails every request.
pub struct InterpreterBuilder<'r> {
    builtins: &'r BuiltinRegistry,
    config: InterpreterConfig,
    print_handler: Option<SharedPrintHandler>,
    http: Option<Box<dyn HttpClient>>,
    shell: Option<Box<dyn ShellExecutor>>,
    globals: Option<Environment>,
}

impl<'r> InterpreterBuilder<'r> {
    pub fn new(builtins: &'r BuiltinRegistry) -> Self {
        Self {
            builtins,
            config: InterpreterConfig::default(),
            print_handler: None,
            http: None,
            shell: None,
            globals: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Where script output goes. Tests pass a buffering handler.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn http_client(mut self, client: Box<dyn HttpClient>) -> Self {
        self.http = Some(client);
        self
    }

    #[must_use]
    pub fn shell(mut self, shell: Box<dyn ShellExecutor>) -> Self {
        self.shell = Some(shell);
        self
    }

    /// Run in an existing global environment instead of a fresh one.
    #[must_use]
    pub fn globals(mut self, env: Environment) -> Self {
        self.globals = Some(env);
        self
    }

    pub fn build(self) -> Interpreter<'r> {
        let call_stack = CallStack::new(self.config.max_call_depth);
        Interpreter {
            builtins: self.builtins,
            config: self.config,
            globals: self.globals.unwrap_or_default(),
            print: self.print_handler.unwrap_or_else(stdout_handler),
            http: self
                .http
                .unwrap_or_else(|| Box::new(UnavailableHttpClient)),
            shell: self.shell.unwrap_or_else(|| Box::new(SystemShell)),
            defers: DeferStack::default(),
            call_stack,
            json_fields: FxHashMap::default(),
        }
    }
}
