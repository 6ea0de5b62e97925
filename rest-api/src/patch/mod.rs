//! RFC 6902 JSON Patch applied over `serde_json` values.
//!
//! [`apply`] is a pure function from a document and an operation list to a
//! new document; errors carry the zero-based index of the failing operation
//! so callers can point clients at the exact step. Test failures also carry
//! the value actually found at the path.

pub mod diff;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A single RFC 6902 operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    /// Insert or overwrite the value at `path`.
    Add { path: String, value: Value },
    /// Remove the value at `path`.
    Remove { path: String },
    /// Replace the existing value at `path`.
    Replace { path: String, value: Value },
    /// Move the value at `from` to `path`.
    Move { from: String, path: String },
    /// Copy the value at `from` to `path`.
    Copy { from: String, path: String },
    /// Assert that the value at `path` equals `value`.
    Test { path: String, value: Value },
}

/// Why a single operation failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatchErrorKind {
    /// The path (or `from` path) does not point at an existing value.
    #[error("target not found: {path}")]
    TargetNotFound {
        /// The unresolvable pointer.
        path: String,
    },
    /// A `test` operation found a different value.
    #[error("test failed at {path}")]
    TestFailed {
        /// The tested pointer.
        path: String,
        /// The value actually present.
        actual: Value,
    },
    /// The pointer is not valid RFC 6901 for this document.
    #[error("invalid pointer: {path}")]
    InvalidPointer {
        /// The malformed pointer.
        path: String,
    },
}

/// Failure of a patch, pinned to the operation that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("patch operation {operation} failed: {kind}")]
pub struct PatchError {
    /// Zero-based index into the operation list.
    pub operation: usize,
    /// What went wrong.
    pub kind: PatchErrorKind,
}

/// Apply a patch to a document, returning the patched copy.
///
/// The input document is untouched; a failing operation aborts the whole
/// patch.
pub fn apply(document: &Value, operations: &[PatchOperation]) -> Result<Value, PatchError> {
    let mut document = document.clone();
    for (index, operation) in operations.iter().enumerate() {
        apply_one(&mut document, operation)
            .map_err(|kind| PatchError { operation: index, kind })?;
    }
    Ok(document)
}

fn apply_one(document: &mut Value, operation: &PatchOperation) -> Result<(), PatchErrorKind> {
    match operation {
        PatchOperation::Add { path, value } => add(document, path, value.clone()),
        PatchOperation::Remove { path } => remove(document, path).map(|_| ()),
        PatchOperation::Replace { path, value } => {
            let target = resolve_mut(document, path)?;
            *target = value.clone();
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            let value = remove(document, from)?;
            add(document, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = resolve(document, from)?.clone();
            add(document, path, value)
        }
        PatchOperation::Test { path, value } => {
            let actual = resolve(document, path)?;
            if actual == value {
                Ok(())
            } else {
                Err(PatchErrorKind::TestFailed {
                    path: path.clone(),
                    actual: actual.clone(),
                })
            }
        }
    }
}

/// Split a pointer into unescaped reference tokens.
fn tokens(path: &str) -> Result<Vec<String>, PatchErrorKind> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(PatchErrorKind::InvalidPointer {
            path: path.to_owned(),
        });
    };
    rest.split('/')
        .map(|token| unescape(token, path))
        .collect()
}

fn unescape(token: &str, path: &str) -> Result<String, PatchErrorKind> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(PatchErrorKind::InvalidPointer {
                    path: path.to_owned(),
                });
            }
        }
    }
    Ok(out)
}

fn array_index(token: &str, len: usize, path: &str) -> Result<usize, PatchErrorKind> {
    // Leading zeros are not valid indices per RFC 6901.
    if token != "0" && token.starts_with('0') {
        return Err(PatchErrorKind::InvalidPointer {
            path: path.to_owned(),
        });
    }
    let index: usize = token.parse().map_err(|_| PatchErrorKind::InvalidPointer {
        path: path.to_owned(),
    })?;
    if index >= len {
        return Err(PatchErrorKind::TargetNotFound {
            path: path.to_owned(),
        });
    }
    Ok(index)
}

fn resolve<'a>(document: &'a Value, path: &str) -> Result<&'a Value, PatchErrorKind> {
    let mut current = document;
    for token in tokens(path)? {
        current = match current {
            Value::Object(entries) => {
                entries
                    .get(&token)
                    .ok_or_else(|| PatchErrorKind::TargetNotFound {
                        path: path.to_owned(),
                    })?
            }
            Value::Array(entries) => {
                let index = array_index(&token, entries.len(), path)?;
                &entries[index]
            }
            _ => {
                return Err(PatchErrorKind::TargetNotFound {
                    path: path.to_owned(),
                });
            }
        };
    }
    Ok(current)
}

fn resolve_mut<'a>(document: &'a mut Value, path: &str) -> Result<&'a mut Value, PatchErrorKind> {
    let mut current = document;
    for token in tokens(path)? {
        current = match current {
            Value::Object(entries) => {
                entries
                    .get_mut(&token)
                    .ok_or_else(|| PatchErrorKind::TargetNotFound {
                        path: path.to_owned(),
                    })?
            }
            Value::Array(entries) => {
                let index = array_index(&token, entries.len(), path)?;
                &mut entries[index]
            }
            _ => {
                return Err(PatchErrorKind::TargetNotFound {
                    path: path.to_owned(),
                });
            }
        };
    }
    Ok(current)
}

/// Resolve the parent of `path`, returning it with the final token.
fn resolve_parent<'a>(
    document: &'a mut Value,
    path: &str,
) -> Result<(&'a mut Value, String), PatchErrorKind> {
    let mut parts = tokens(path)?;
    let Some(last) = parts.pop() else {
        return Err(PatchErrorKind::InvalidPointer {
            path: path.to_owned(),
        });
    };

    let mut current = document;
    for token in parts {
        current = match current {
            Value::Object(entries) => {
                entries
                    .get_mut(&token)
                    .ok_or_else(|| PatchErrorKind::TargetNotFound {
                        path: path.to_owned(),
                    })?
            }
            Value::Array(entries) => {
                let index = array_index(&token, entries.len(), path)?;
                &mut entries[index]
            }
            _ => {
                return Err(PatchErrorKind::TargetNotFound {
                    path: path.to_owned(),
                });
            }
        };
    }
    Ok((current, last))
}

fn add(document: &mut Value, path: &str, value: Value) -> Result<(), PatchErrorKind> {
    if path.is_empty() {
        *document = value;
        return Ok(());
    }
    let (parent, token) = resolve_parent(document, path)?;
    match parent {
        Value::Object(entries) => {
            entries.insert(token, value);
            Ok(())
        }
        Value::Array(entries) => {
            if token == "-" {
                entries.push(value);
                return Ok(());
            }
            // Adding at len() appends, so allow one past the end.
            let index = array_index(&token, entries.len() + 1, path)?;
            entries.insert(index, value);
            Ok(())
        }
        _ => Err(PatchErrorKind::TargetNotFound {
            path: path.to_owned(),
        }),
    }
}

fn remove(document: &mut Value, path: &str) -> Result<Value, PatchErrorKind> {
    let (parent, token) = resolve_parent(document, path)?;
    match parent {
        Value::Object(entries) => {
            entries
                .remove(&token)
                .ok_or_else(|| PatchErrorKind::TargetNotFound {
                    path: path.to_owned(),
                })
        }
        Value::Array(entries) => {
            let index = array_index(&token, entries.len(), path)?;
            Ok(entries.remove(index))
        }
        _ => Err(PatchErrorKind::TargetNotFound {
            path: path.to_owned(),
        }),
    }
}
