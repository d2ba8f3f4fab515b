//! Collaborators the interpreter reaches the outside world through.
//!
//! Each is a trait so tests can substitute a scripted implementation.

pub mod http;
pub mod shell;

pub use http::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, MockHttpClient, MockResponse,
    UnavailableHttpClient,
};
pub use shell::{MockShell, ShellExecutor, ShellOutput, SystemShell};
