//! Where script output goes.
//!
//! Everything a script prints, including shell command echoes and HTTP mock
//! notices, goes through a [`PrintHandlerImpl`]: the process streams when
//! running for real, or in-memory buffers when tests capture it.
//!
//! Enum dispatch rather than a trait object; there are only three sinks.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Writes to the process's stdout and stderr.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn print(&self, msg: &str) {
        let mut out = std::io::stdout().lock();
        // A closed pipe is not a script error.
        let _ = out.write_all(msg.as_bytes());
        let _ = out.flush();
    }

    pub fn print_err(&self, msg: &str) {
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(msg.as_bytes());
        let _ = err.flush();
    }
}

/// Captures both streams in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    stdout: RefCell<String>,
    stderr: RefCell<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&self, msg: &str) {
        self.stdout.borrow_mut().push_str(msg);
    }

    pub fn print_err(&self, msg: &str) {
        self.stderr.borrow_mut().push_str(msg);
    }

    pub fn get_output(&self) -> String {
        self.stdout.borrow().clone()
    }

    pub fn get_error_output(&self) -> String {
        self.stderr.borrow().clone()
    }

    pub fn clear(&self) {
        self.stdout.borrow_mut().clear();
        self.stderr.borrow_mut().clear();
    }
}

pub enum PrintHandlerImpl {
    Stdout(StdoutPrintHandler),
    Buffer(BufferPrintHandler),
    /// Discards everything.
    Silent,
}

impl PrintHandlerImpl {
    /// Write to the output stream, no newline added.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.print(msg),
            Self::Buffer(h) => h.print(msg),
            Self::Silent => {}
        }
    }

    /// Write to the error stream, no newline added.
    pub fn print_err(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.print_err(msg),
            Self::Buffer(h) => h.print_err(msg),
            Self::Silent => {}
        }
    }

    /// Captured stdout; empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    /// Captured stderr; empty for handlers that don't capture.
    pub fn get_error_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_error_output(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

pub type SharedPrintHandler = Rc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Rc::new(PrintHandlerImpl::Stdout(StdoutPrintHandler))
}

pub fn buffer_handler() -> SharedPrintHandler {
    Rc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Rc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_separates_streams() {
        let handler = buffer_handler();
        handler.print("out\n");
        handler.print_err("err\n");
        handler.print("more");
        assert_eq!(handler.get_output(), "out\nmore");
        assert_eq!(handler.get_error_output(), "err\n");
    }

    #[test]
    fn test_buffer_clear() {
        let handler = buffer_handler();
        handler.print("x");
        handler.print_err("y");
        handler.clear();
        assert_eq!(handler.get_output(), "");
        assert_eq!(handler.get_error_output(), "");
    }

    #[test]
    fn test_silent_discards() {
        let handler = silent_handler();
        handler.print("x");
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn test_stdout_does_not_capture() {
        let handler = stdout_handler();
        assert_eq!(handler.get_output(), "");
        assert_eq!(handler.get_error_output(), "");
    }
}
