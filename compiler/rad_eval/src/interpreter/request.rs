//! JSON field declarations and the fetch step of `rad`/`request` blocks.

use rad_diagnostic::ErrorCode;
use rad_ir::ast::{DisplayBlock, Expr, Ident, JsonIndex, JsonKey, JsonPath};
use tracing::debug;

use super::Interpreter;
use crate::collab::{HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::environment::Environment;
use crate::errors::{json_extraction_failed, other, EvalResult};
use crate::json_fields::{self, FieldPath, Step};
use crate::value::Value;

impl Interpreter<'_> {
    /// Record the path and start the field as an empty list.
    pub(super) fn exec_json_field(&mut self, name: &Ident, path: &JsonPath, env: &Environment) -> EvalResult<()> {
        let mut steps = Vec::new();
        for segment in &path.segments {
            match &segment.key {
                JsonKey::Root => {}
                JsonKey::Name(key) => steps.push(Step::Key(key.clone())),
                JsonKey::AnyKey => steps.push(Step::AnyKey),
            }
            for index in &segment.indexes {
                let step = match index {
                    JsonIndex::Each => Step::Each,
                    JsonIndex::At(expr) => match self.eval_expr(expr, env)? {
                        Value::Int(i) => Step::At(i),
                        found => {
                            return Err(other(
                                ErrorCode::TypeMismatch,
                                format!("JSON path indexes must be ints, was {}", found.type_name()),
                            )
                            .with_span(expr.span))
                        }
                    },
                };
                steps.push(step);
            }
        }
        self.json_fields
            .insert(name.name.clone(), FieldPath::new(&name.name, steps));
        env.define(&name.name, Value::list(Vec::new()));
        Ok(())
    }

    /// GET `source`, then bind each field of the block to the column its
    /// path extracts.
    pub(super) fn fetch_json_fields(
        &mut self,
        block: &DisplayBlock,
        source: &Expr,
        env: &Environment,
    ) -> EvalResult<()> {
        let url = match self.eval_expr(source, env)? {
            Value::Str(s) => s.plain().into_owned(),
            found => {
                return Err(other(
                    ErrorCode::TypeMismatch,
                    format!(
                        "A {} block source must be a URL string. Got {}",
                        block.kind.keyword(),
                        found.type_name()
                    ),
                )
                .with_span(source.span))
            }
        };
        let paths = block
            .fields
            .iter()
            .map(|field| {
                self.json_fields.get(&field.name).cloned().ok_or_else(|| {
                    other(
                        ErrorCode::UndefinedVariable,
                        format!("Undefined JSON field \"{}\"", field.name),
                    )
                    .with_span(field.span)
                })
            })
            .collect::<EvalResult<Vec<_>>>()?;

        let request = HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        };
        let response = self.send_http(&request).map_err(|e| {
            other(ErrorCode::GenericRuntime, format!("Error requesting JSON: {e}")).with_span(source.span)
        })?;
        let data: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| {
            other(
                ErrorCode::ParseJson,
                format!("Received invalid JSON in response: {e}"),
            )
            .with_span(source.span)
        })?;

        let columns = json_fields::extract(&paths, &data)
            .map_err(|e| json_extraction_failed(&e).with_span(block.span))?;
        debug!(url = %request.url, fields = columns.len(), "extracted JSON fields");
        for (name, column) in columns {
            env.define(&name, column);
        }
        Ok(())
    }

    /// Send one request, noting on stderr when a mock answered it.
    pub(crate) fn send_http(&mut self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let response = self.http.send(request)?;
        if let Some(pattern) = &response.mocked_by {
            self.print.print_err(&format!(
                "Mocking response for url (matched \"{pattern}\"): {}\n",
                request.url
            ));
        }
        Ok(response)
    }
}
