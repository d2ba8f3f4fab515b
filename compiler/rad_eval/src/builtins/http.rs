//! `http_get` and friends. Requests go through the interpreter's
//! [`HttpClient`](crate::collab::HttpClient); the result is always a map, so
//! scripts check `success` rather than catching.

use rad_diagnostic::ErrorCode;
use tracing::warn;

use super::{map_arg, str_arg, CallCtx, Entry};
use crate::binder::BoundArgs;
use crate::collab::{HttpMethod, HttpRequest, HttpResponse};
use crate::errors::{other, EvalResult};
use crate::interpreter::Interpreter;
use crate::json;
use crate::value::{RadMap, Value};

pub(super) const ENTRIES: &[Entry] = &[
    (
        r"http_get(url: str, *, body: any?, json: any?, headers: map?) -> map",
        http_get,
    ),
    (
        r"http_post(url: str, *, body: any?, json: any?, headers: map?) -> map",
        http_post,
    ),
    (
        r"http_put(url: str, *, body: any?, json: any?, headers: map?) -> map",
        http_put,
    ),
    (
        r"http_patch(url: str, *, body: any?, json: any?, headers: map?) -> map",
        http_patch,
    ),
    (
        r"http_delete(url: str, *, body: any?, json: any?, headers: map?) -> map",
        http_delete,
    ),
];

fn http_get(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    request(interp, args, HttpMethod::Get)
}

fn http_post(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    request(interp, args, HttpMethod::Post)
}

fn http_put(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    request(interp, args, HttpMethod::Put)
}

fn http_patch(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    request(interp, args, HttpMethod::Patch)
}

fn http_delete(interp: &mut Interpreter<'_>, _: &CallCtx, args: &BoundArgs) -> EvalResult<Option<Value>> {
    request(interp, args, HttpMethod::Delete)
}

/// Header values may be strings or lists of strings; lists are joined
/// with `, `.
fn headers(args: &BoundArgs) -> EvalResult<Vec<(String, String)>> {
    if args.opt("headers").is_none() {
        return Ok(Vec::new());
    }
    let map = map_arg(args, "headers")?;
    let headers = map
        .entries()
        .into_iter()
        .map(|(key, value)| {
            let value = match &value {
                Value::List(items) => items
                    .borrow()
                    .iter()
                    .map(|v| v.to_printable(false))
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.to_printable(false),
            };
            (key.to_printable(false), value)
        })
        .collect();
    Ok(headers)
}

fn request(interp: &mut Interpreter<'_>, args: &BoundArgs, method: HttpMethod) -> EvalResult<Option<Value>> {
    let url = str_arg(args, "url")?.plain().into_owned();
    let mut headers = headers(args)?;
    let body = match (args.opt("body"), args.opt("json")) {
        (Some(_), Some(_)) => {
            return Err(other(
                ErrorCode::MutualExclArgs,
                "Cannot specify both 'body' and 'json' parameters",
            ));
        }
        (Some(body), None) => Some(body.to_printable(false)),
        (None, Some(value)) => {
            let text = json::to_string(value).map_err(|e| other(ErrorCode::ParseJson, e.to_string()))?;
            if args.opt("headers").is_none() {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
            }
            Some(text)
        }
        (None, None) => None,
    };

    let request = HttpRequest {
        method,
        url,
        headers,
        body,
    };
    let result = match interp.send_http(&request) {
        Ok(response) => response_map(&response),
        Err(err) => {
            warn!(%err, url = %request.url, "request failed");
            let map = RadMap::new();
            map.set_str("success", Value::Bool(false));
            map.set_str("error", Value::str(err.to_string()));
            map.set_str("duration_seconds", Value::Float(0.0));
            map
        }
    };
    Ok(Some(Value::Map(result)))
}

/// JSON bodies are decoded; anything else stays a string.
fn response_map(response: &HttpResponse) -> RadMap {
    let map = RadMap::new();
    let body = json::parse(&response.body).unwrap_or_else(|_| Value::str(response.body.clone()));
    map.set_str("body", body);
    map.set_str("duration_seconds", Value::Float(response.duration_seconds));
    map.set_str("status_code", Value::Int(i64::from(response.status)));
    map.set_str("success", Value::Bool(response.is_success()));
    map
}
