//! Runtime errors for the interpreter

use crate::util::format_suggestion_hint;
use std::fmt;

/// Runtime error during interpretation
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operand, receiver or argument has the wrong runtime type
    TypeError,
    /// Variable not bound in the local or global scope
    UndefinedVariable,
    /// Slot not bound in the receiver object
    UndefinedSlot,
    /// Global function or object method not found
    UndefinedFunction,
    /// Name is bound to a function where a variable was expected, or vice versa
    KindMismatch,
    /// Argument count mismatch
    ArityMismatch,
    /// Operator or primitive method not defined for the receiver type
    UnknownOperator,
    /// Method call on null
    NullReference,
    /// Index out of bounds
    IndexOutOfBounds,
    /// Division by zero
    DivisionByZero,
    /// Stack overflow (deep recursion)
    StackOverflow,
    /// Output stream failure
    IoError,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError { kind, message }
    }

    pub fn type_error(what: &str, expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("type error: {what} must be {expected}, got {got}"),
        )
    }

    pub fn undefined_variable(name: &str, suggestion: Option<&str>) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("variable not found: {name}{}", format_suggestion_hint(suggestion)),
        )
    }

    pub fn undefined_slot(name: &str, suggestion: Option<&str>) -> Self {
        Self::new(
            ErrorKind::UndefinedSlot,
            format!("slot not found in object: {name}{}", format_suggestion_hint(suggestion)),
        )
    }

    pub fn undefined_function(name: &str, suggestion: Option<&str>) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            format!("function not found: {name}{}", format_suggestion_hint(suggestion)),
        )
    }

    pub fn undefined_method(name: &str, suggestion: Option<&str>) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            format!("method not found in object: {name}{}", format_suggestion_hint(suggestion)),
        )
    }

    pub fn not_a_variable(name: &str) -> Self {
        Self::new(
            ErrorKind::KindMismatch,
            format!("{name} is a function, not a variable"),
        )
    }

    pub fn not_a_function(name: &str) -> Self {
        Self::new(
            ErrorKind::KindMismatch,
            format!("{name} is a variable, not a function"),
        )
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("{name} expects {expected} argument(s), got {got}"),
        )
    }

    pub fn unknown_operator(name: &str, receiver: &str) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("operator {name} not recognized for {receiver}"),
        )
    }

    pub fn null_reference(name: &str) -> Self {
        Self::new(
            ErrorKind::NullReference,
            format!("calling {name} from a null reference"),
        )
    }

    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfBounds,
            format!("index {index} out of bounds for length {len}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero".to_string())
    }

    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            format!("stack overflow: call depth exceeded {limit}"),
        )
    }

    pub fn io_error(msg: &str) -> Self {
        Self::new(ErrorKind::IoError, format!("IO error: {msg}"))
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
