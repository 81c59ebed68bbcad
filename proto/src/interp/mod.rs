//! Tree-walking interpreter
//!
//! Evaluates a [`ScopeStmt`](crate::ast::ScopeStmt) program against a global
//! symbol table, with a fresh local table per function or method call.

mod env;
mod error;
mod eval;
mod primitive;
mod value;

pub use env::{DEFAULT_CAPACITY, Environment, ObjectRef};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{Interpreter, interpret};
pub use primitive::{ArrayOp, IntOp};
pub use value::{Array, Binding, Value};
