//! Runtime values and table bindings

use super::env::ObjectRef;
use super::error::{InterpResult, RuntimeError};
use crate::ast::FnDecl;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Runtime value.
///
/// Integers and null are plain data. Arrays and objects are shared
/// references: binding one to a second name aliases it.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit integer
    Int(i64),
    /// Absent value; the only false value for conditionals
    Null,
    /// Fixed-length integer array
    Array(Rc<Array>),
    /// Object instance (a symbol table of slots)
    Object(ObjectRef),
}

impl Value {
    /// Value produced by a comparison that holds.
    /// Only its non-nullness is meaningful.
    pub const TRUE: Value = Value::Int(0);

    /// Encode a comparison result
    pub fn from_bool(b: bool) -> Self {
        if b { Value::TRUE } else { Value::Null }
    }

    /// Truthiness for conditionals: anything but null
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null)
    }

    /// Whether a loop predicate continues: only integers do
    pub fn continues_loop(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Try to convert to i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer or a type error naming `what` was being checked
    pub fn expect_int(&self, what: &str) -> InterpResult<i64> {
        self.as_int()
            .ok_or_else(|| RuntimeError::type_error(what, "int", self.type_name()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Null => write!(f, "null"),
            Value::Array(array) => {
                write!(f, "[")?;
                for (i, v) in array.data.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => {
                let table = obj.borrow();
                let mut names: Vec<&str> = table.names().collect();
                names.sort_unstable();
                write!(f, "{{")?;
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    // Nested objects are not expanded; slots may form cycles.
                    match table.get(name) {
                        Some(Binding::Var(Value::Object(_))) => write!(f, "{name}: <object>")?,
                        Some(Binding::Var(v)) => write!(f, "{name}: {v}")?,
                        Some(Binding::Func(decl)) => {
                            write!(f, "{name}: <method/{}>", decl.arity())?
                        }
                        None => {}
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

/// Identity for arrays and objects, value equality for integers and null
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Fixed-length integer array with in-place element updates
#[derive(Debug)]
pub struct Array {
    data: RefCell<Box<[i64]>>,
}

impl Array {
    /// Array of `length` copies of `init`.
    /// Fails instead of aborting when `length` elements cannot be allocated.
    pub fn filled(length: usize, init: i64) -> InterpResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(length).map_err(|_| {
            RuntimeError::type_error("array length", "allocatable", &length.to_string())
        })?;
        data.resize(length, init);
        Ok(Array {
            data: RefCell::new(data.into_boxed_slice()),
        })
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: i64) -> InterpResult<i64> {
        let data = self.data.borrow();
        usize::try_from(index)
            .ok()
            .and_then(|i| data.get(i).copied())
            .ok_or_else(|| RuntimeError::index_out_of_bounds(index, data.len()))
    }

    pub fn set(&self, index: i64, value: i64) -> InterpResult<()> {
        let mut data = self.data.borrow_mut();
        let len = data.len();
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| data.get_mut(i))
            .ok_or_else(|| RuntimeError::index_out_of_bounds(index, len))?;
        *slot = value;
        Ok(())
    }
}

/// What a name is bound to in a symbol table
#[derive(Debug, Clone)]
pub enum Binding {
    /// Variable or slot holding a value; replaced wholesale on assignment
    Var(Value),
    /// Function or method: parameter names and body, no captured scope
    Func(Rc<FnDecl>),
}
