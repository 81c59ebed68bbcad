//! Abstract Syntax Tree definitions
//!
//! The tree is produced by an external parser and handed over as JSON
//! (serde's externally tagged layout). The runtime only reads it.

mod display;
mod expr;
mod span;

pub use expr::*;
pub use span::*;

use crate::error::{Error, Result};
use serde::Deserialize;

/// Stack reserved for decoding; deeply nested sequences recurse once per level
const DECODE_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Decode a program (its root statement) from JSON.
///
/// Nesting depth is bounded only by `DECODE_STACK_SIZE`; a few thousand levels
/// of `Seq` fit comfortably.
pub fn from_json(source: &str) -> Result<ScopeStmt> {
    let mut de = serde_json::Deserializer::from_str(source);
    de.disable_recursion_limit();
    let decoded = stacker::grow(DECODE_STACK_SIZE, || ScopeStmt::deserialize(&mut de));
    let program = decoded.map_err(|e| decode_error(source, &e))?;
    de.end().map_err(|e| decode_error(source, &e))?;
    Ok(program)
}

/// Encode a program as pretty-printed JSON
pub fn to_json(program: &ScopeStmt) -> Result<String> {
    serde_json::to_string_pretty(program).map_err(|e| Error::decode(e.to_string(), None))
}

fn decode_error(source: &str, err: &serde_json::Error) -> Error {
    let span = (err.line() > 0).then(|| Span::at_line_col(source, err.line(), err.column()));
    Error::decode(err.to_string(), span)
}
