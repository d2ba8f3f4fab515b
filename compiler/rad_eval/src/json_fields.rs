//! Extracting table columns from a JSON document.
//!
//! Every declared field is a path from the document root. The paths are
//! merged into a trie and the document is walked once: `[]` fans out over
//! an array, `*` over an object's keys in sorted order, and each node
//! captures one row per visit for the fields that end there. Sibling
//! captures are then merged into columns:
//!
//! - the same fields: rows are appended
//! - disjoint fields with equal row counts: columns sit side by side
//! - disjoint fields where one side has a single row: that row repeats
//!
//! Anything else cannot form a table and is an error.

use std::fmt;

use serde_json::Value as Json;
use tracing::trace;

use crate::json::from_json;
use crate::value::Value;

/// One step after the `json` root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Key(String),
    /// `*`
    AnyKey,
    /// `[]`
    Each,
    /// `[n]`; negative counts from the end.
    At(i64),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => write!(f, ".{key}"),
            Step::AnyKey => f.write_str(".*"),
            Step::Each => f.write_str("[]"),
            Step::At(index) => write!(f, "[{index}]"),
        }
    }
}

/// A named path, resolved from a `Name = json...` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    pub name: String,
    pub steps: Vec<Step>,
}

impl FieldPath {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        FieldPath {
            name: name.into(),
            steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("Key not found in JSON: {path}")]
    KeyNotFound { path: String },
    #[error("Expected array at {path}, got {found}")]
    ExpectedArray { path: String, found: &'static str },
    #[error("Expected map at {path}, got {found}")]
    ExpectedMap { path: String, found: &'static str },
    #[error("Index out of bounds at {path}: {index}")]
    IndexOutOfBounds { path: String, index: i64 },
    #[error("Cannot merge captures: {left} and {right}")]
    CannotMerge { left: String, right: String },
}

struct Node {
    step: Option<Step>,
    path: String,
    fields: Vec<String>,
    children: Vec<Node>,
}

impl Node {
    fn root() -> Self {
        Node {
            step: None,
            path: "json".to_string(),
            fields: Vec::new(),
            children: Vec::new(),
        }
    }

    fn insert(&mut self, field: &FieldPath) {
        let mut node = self;
        for step in &field.steps {
            let pos = match node.children.iter().position(|c| c.step.as_ref() == Some(step)) {
                Some(pos) => pos,
                None => {
                    node.children.push(Node {
                        step: Some(step.clone()),
                        path: format!("{}{step}", node.path),
                        fields: Vec::new(),
                        children: Vec::new(),
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[pos];
        }
        if !node.fields.contains(&field.name) {
            node.fields.push(field.name.clone());
        }
    }
}

/// Rows gathered under one trie node. Every column has the same length.
struct Capture {
    path: String,
    columns: Vec<(String, Vec<Json>)>,
}

impl Capture {
    fn empty(path: &str) -> Self {
        Capture {
            path: path.to_string(),
            columns: Vec::new(),
        }
    }

    fn rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    fn has(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    fn column_mut(&mut self, name: &str) -> Option<&mut Vec<Json>> {
        self.columns
            .iter_mut()
            .find_map(|(n, values)| (n == name).then_some(values))
    }

    /// Widen a single-row capture to `rows` rows.
    fn repeated(self, rows: usize) -> Vec<(String, Vec<Json>)> {
        self.columns
            .into_iter()
            .map(|(name, values)| {
                let value = values.into_iter().next().unwrap_or(Json::Null);
                (name, vec![value; rows])
            })
            .collect()
    }
}

fn merge(mut left: Capture, right: Capture) -> Result<Capture, ExtractError> {
    if left.columns.is_empty() {
        return Ok(right);
    }
    if right.columns.is_empty() {
        return Ok(left);
    }

    let same_fields = left.columns.len() == right.columns.len()
        && left.columns.iter().all(|(name, _)| right.has(name));
    if same_fields {
        for (name, values) in right.columns {
            if let Some(column) = left.column_mut(&name) {
                column.extend(values);
            }
        }
        return Ok(left);
    }

    let cannot_merge = |left: &Capture, right: &Capture| ExtractError::CannotMerge {
        left: left.path.clone(),
        right: right.path.clone(),
    };
    if left.columns.iter().any(|(name, _)| right.has(name)) {
        return Err(cannot_merge(&left, &right));
    }

    let (left_rows, right_rows) = (left.rows(), right.rows());
    if left_rows == right_rows {
        left.columns.extend(right.columns);
        Ok(left)
    } else if left_rows == 1 {
        let path = right.path;
        let mut columns = left.repeated(right_rows);
        columns.extend(right.columns);
        Ok(Capture { path, columns })
    } else if right_rows == 1 {
        let columns = right.repeated(left_rows);
        left.columns.extend(columns);
        Ok(left)
    } else {
        Err(cannot_merge(&left, &right))
    }
}

fn type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(n) if n.is_i64() || n.is_u64() => "int",
        Json::Number(_) => "float",
        Json::String(_) => "str",
        Json::Array(_) => "list",
        Json::Object(_) => "map",
    }
}

fn traverse(node: &Node, data: &Json, key: Option<&str>) -> Result<Capture, ExtractError> {
    let mut captured = Capture::empty(&node.path);
    for child in &node.children {
        let Some(step) = &child.step else { continue };
        let mut visit = |data: &Json, key: Option<&str>| -> Result<(), ExtractError> {
            let capture = traverse(child, data, key)?;
            let prev = std::mem::replace(&mut captured, Capture::empty(&node.path));
            captured = merge(prev, capture)?;
            Ok(())
        };
        match (step, data) {
            (Step::Each, Json::Array(items)) => {
                for item in items {
                    visit(item, None)?;
                }
            }
            (Step::At(index), Json::Array(items)) => {
                let resolved = if *index < 0 {
                    usize::try_from(index.unsigned_abs())
                        .ok()
                        .and_then(|back| items.len().checked_sub(back))
                } else {
                    usize::try_from(*index).ok()
                };
                let item = resolved.and_then(|i| items.get(i)).ok_or_else(|| {
                    ExtractError::IndexOutOfBounds {
                        path: child.path.clone(),
                        index: *index,
                    }
                })?;
                visit(item, None)?;
            }
            (Step::Each | Step::At(_), other) => {
                return Err(ExtractError::ExpectedArray {
                    path: child.path.clone(),
                    found: type_name(other),
                });
            }
            (Step::AnyKey, Json::Object(fields)) => {
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort();
                for k in keys {
                    if let Some(value) = fields.get(k) {
                        visit(value, Some(k.as_str()))?;
                    }
                }
            }
            // Nothing to iterate.
            (Step::AnyKey, _) => {}
            (Step::Key(k), Json::Object(fields)) => {
                let value = fields.get(k).ok_or_else(|| ExtractError::KeyNotFound {
                    path: child.path.clone(),
                })?;
                visit(value, Some(k.as_str()))?;
            }
            (Step::Key(_), other) => {
                return Err(ExtractError::ExpectedMap {
                    path: child.path.clone(),
                    found: type_name(other),
                });
            }
        }
    }

    if node.fields.is_empty() {
        return Ok(captured);
    }
    let here = match (&node.step, key) {
        (Some(Step::AnyKey), Some(key)) => Json::String(key.to_string()),
        _ => data.clone(),
    };
    let local = Capture {
        path: node.path.clone(),
        columns: node
            .fields
            .iter()
            .map(|name| (name.clone(), vec![here.clone()]))
            .collect(),
    };
    merge(captured, local)
}

/// Extract one column per field, in the order the fields are given. A field
/// whose path matched nothing gets an empty column.
///
/// # Errors
///
/// The document does not have the shape the paths describe, or the
/// captured rows cannot be combined into one table.
pub fn extract(fields: &[FieldPath], data: &Json) -> Result<Vec<(String, Value)>, ExtractError> {
    let mut root = Node::root();
    for field in fields {
        root.insert(field);
    }
    let capture = traverse(&root, data, None)?;
    trace!(rows = capture.rows(), columns = capture.columns.len(), "json extraction");

    Ok(fields
        .iter()
        .map(|field| {
            let column = capture
                .columns
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, values)| values.iter().cloned().map(from_json).collect())
                .unwrap_or_default();
            (field.name.clone(), Value::list(column))
        })
        .collect())
}
