//! Built-in operations exposed as pseudo-methods on integers and arrays

use super::error::{InterpResult, RuntimeError};
use super::value::{Array, Value};

/// Integer primitive: `x.op(y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl IntOp {
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name {
            "add" => IntOp::Add,
            "sub" => IntOp::Sub,
            "mul" => IntOp::Mul,
            "div" => IntOp::Div,
            "mod" => IntOp::Mod,
            "eq" => IntOp::Eq,
            "lt" => IntOp::Lt,
            "le" => IntOp::Le,
            "gt" => IntOp::Gt,
            "ge" => IntOp::Ge,
            _ => return None,
        };
        Some(op)
    }

    /// Apply to two integers. Arithmetic wraps on overflow; comparisons
    /// yield the true sentinel or null.
    pub fn apply(self, x: i64, y: i64) -> InterpResult<Value> {
        let result = match self {
            IntOp::Add => Value::Int(x.wrapping_add(y)),
            IntOp::Sub => Value::Int(x.wrapping_sub(y)),
            IntOp::Mul => Value::Int(x.wrapping_mul(y)),
            IntOp::Div => {
                if y == 0 {
                    return Err(RuntimeError::division_by_zero());
                }
                Value::Int(x.wrapping_div(y))
            }
            IntOp::Mod => {
                if y == 0 {
                    return Err(RuntimeError::division_by_zero());
                }
                Value::Int(x.wrapping_rem(y))
            }
            IntOp::Eq => Value::from_bool(x == y),
            IntOp::Lt => Value::from_bool(x < y),
            IntOp::Le => Value::from_bool(x <= y),
            IntOp::Gt => Value::from_bool(x > y),
            IntOp::Ge => Value::from_bool(x >= y),
        };
        Ok(result)
    }
}

/// Array primitive: `a.length()`, `a.get(i)`, `a.set(i, v)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOp {
    Length,
    Get,
    Set,
}

impl ArrayOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "length" => Some(ArrayOp::Length),
            "get" => Some(ArrayOp::Get),
            "set" => Some(ArrayOp::Set),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArrayOp::Length => "length",
            ArrayOp::Get => "get",
            ArrayOp::Set => "set",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            ArrayOp::Length => 0,
            ArrayOp::Get => 1,
            ArrayOp::Set => 2,
        }
    }

    /// What the argument at `position` is, for type errors
    pub fn operand_name(position: usize) -> &'static str {
        if position == 0 { "array index" } else { "array element" }
    }

    /// Apply to integer arguments whose count matches `arity`
    pub fn apply(self, array: &Array, args: &[i64]) -> InterpResult<Value> {
        match (self, args) {
            (ArrayOp::Length, &[]) => Ok(Value::Int(array.len() as i64)),
            (ArrayOp::Get, &[index]) => Ok(Value::Int(array.get(index)?)),
            (ArrayOp::Set, &[index, value]) => {
                array.set(index, value)?;
                Ok(Value::Null)
            }
            _ => Err(RuntimeError::arity_mismatch(self.name(), self.arity(), args.len())),
        }
    }
}

/// Build `array(length, init)`; a negative or unallocatable length is a type error
pub fn make_array(length: i64, init: i64) -> InterpResult<Value> {
    let length = usize::try_from(length)
        .map_err(|_| RuntimeError::type_error("array length", "non-negative", &length.to_string()))?;
    Ok(Value::Array(std::rc::Rc::new(Array::filled(length, init)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    fn int(op: IntOp, x: i64, y: i64) -> i64 {
        op.apply(x, y).unwrap().as_int().unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(int(IntOp::Add, 3, 4), 7);
        assert_eq!(int(IntOp::Sub, 3, 4), -1);
        assert_eq!(int(IntOp::Mul, 6, 7), 42);
        assert_eq!(int(IntOp::Div, 7, 2), 3);
        assert_eq!(int(IntOp::Mod, 7, 2), 1);
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(int(IntOp::Div, -7, 2), -3);
        assert_eq!(int(IntOp::Mod, -7, 2), -1);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(IntOp::Div.apply(1, 0).is_err());
        assert!(IntOp::Mod.apply(1, 0).is_err());
    }

    #[test]
    fn test_overflow_wraps() {
        assert_eq!(int(IntOp::Add, i64::MAX, 1), i64::MIN);
        assert_eq!(int(IntOp::Div, i64::MIN, -1), i64::MIN);
        assert_eq!(int(IntOp::Mod, i64::MIN, -1), 0);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(IntOp::Eq.apply(5, 5).unwrap(), Value::TRUE);
        assert_eq!(IntOp::Eq.apply(5, 6).unwrap(), Value::Null);
        assert!(IntOp::Lt.apply(1, 2).unwrap().is_truthy());
        assert!(!IntOp::Lt.apply(2, 2).unwrap().is_truthy());
        assert!(IntOp::Le.apply(2, 2).unwrap().is_truthy());
        assert!(IntOp::Gt.apply(3, 2).unwrap().is_truthy());
        assert!(!IntOp::Ge.apply(1, 2).unwrap().is_truthy());
    }

    #[test]
    fn test_int_op_names() {
        for name in ["add", "sub", "mul", "div", "mod", "eq", "lt", "le", "gt", "ge"] {
            assert!(IntOp::from_name(name).is_some(), "{name}");
        }
        assert!(IntOp::from_name("pow").is_none());
        assert!(IntOp::from_name("length").is_none());
    }

    #[test]
    fn test_array_ops() {
        let array = Array::filled(5, 9).unwrap();
        assert_eq!(ArrayOp::Length.apply(&array, &[]).unwrap(), Value::Int(5));
        assert_eq!(ArrayOp::Set.apply(&array, &[2, 42]).unwrap(), Value::Null);
        assert_eq!(ArrayOp::Get.apply(&array, &[2]).unwrap(), Value::Int(42));
        assert_eq!(ArrayOp::Get.apply(&array, &[0]).unwrap(), Value::Int(9));
    }

    #[test]
    fn test_array_op_wrong_argument_count() {
        let array = Array::filled(1, 0).unwrap();
        let err = ArrayOp::Get.apply(&array, &[]).unwrap_err();
        assert_eq!(err.message, "get expects 1 argument(s), got 0");
        assert!(ArrayOp::Length.apply(&array, &[1]).is_err());
    }

    #[test]
    fn test_array_op_out_of_bounds() {
        let array = Array::filled(1, 0).unwrap();
        assert!(ArrayOp::Get.apply(&array, &[1]).is_err());
        assert!(ArrayOp::Set.apply(&array, &[-1, 5]).is_err());
    }

    #[test]
    fn test_array_op_metadata() {
        assert_eq!(ArrayOp::from_name("set"), Some(ArrayOp::Set));
        assert_eq!(ArrayOp::Set.arity(), 2);
        assert_eq!(ArrayOp::Length.name(), "length");
        assert_eq!(ArrayOp::operand_name(0), "array index");
        assert_eq!(ArrayOp::operand_name(1), "array element");
        assert!(ArrayOp::from_name("add").is_none());
    }

    #[test]
    fn test_make_array() {
        let v = make_array(3, 1).unwrap();
        assert_eq!(v.to_string(), "[1, 1, 1]");
        assert_eq!(make_array(0, 1).unwrap().to_string(), "[]");
        let err = make_array(-1, 0).unwrap_err();
        assert_eq!(err.message, "type error: array length must be non-negative, got -1");
    }

    #[test]
    fn test_make_array_too_large() {
        let err = make_array(i64::MAX, 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(
            err.message,
            format!("type error: array length must be allocatable, got {}", i64::MAX)
        );
    }
}
