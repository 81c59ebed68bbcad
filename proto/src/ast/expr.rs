//! Expression and statement AST nodes

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Exp {
    /// Integer literal
    Int(i64),
    /// Null literal
    Null,

    /// Formatted print: each `~` in `format` is replaced by the next argument
    Printf { format: String, args: Vec<Exp> },

    /// Array construction: array(length, init)
    Array { length: Box<Exp>, init: Box<Exp> },

    /// Object construction: object(parent) { slots }
    Object { parent: Box<Exp>, slots: Vec<SlotStmt> },

    /// Slot read: receiver.name
    Slot { receiver: Box<Exp>, name: String },

    /// Slot write: receiver.name = value
    SetSlot {
        receiver: Box<Exp>,
        name: String,
        value: Box<Exp>,
    },

    /// Method or primitive call: receiver.name(args)
    CallSlot {
        receiver: Box<Exp>,
        name: String,
        args: Vec<Exp>,
    },

    /// Global function call: name(args)
    Call { name: String, args: Vec<Exp> },

    /// Variable assignment: name = value
    Set { name: String, value: Box<Exp> },

    /// Conditional: taken when `pred` is anything but null
    If {
        pred: Box<Exp>,
        conseq: Box<ScopeStmt>,
        alt: Box<ScopeStmt>,
    },

    /// Loop: runs while `pred` evaluates to an integer
    While { pred: Box<Exp>, body: Box<ScopeStmt> },

    /// Variable reference
    Ref(String),
}

/// Slot declaration inside an object literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlotStmt {
    /// var name = init
    Var { name: String, init: Exp },
    /// method name(params) { body }
    Method(Rc<FnDecl>),
}

/// Statement in a global or function scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScopeStmt {
    /// var name = init
    Var { name: String, init: Exp },
    /// defn name(params) { body }
    Fn(Rc<FnDecl>),
    /// first; second (value of the sequence is the value of `second`)
    Seq(Box<ScopeStmt>, Box<ScopeStmt>),
    /// Expression statement
    Exp(Exp),
}

/// Function or method declaration.
///
/// The declaration is shared with every binding created from it, so binding
/// a function never copies its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: ScopeStmt,
}

impl FnDecl {
    pub fn new(name: impl Into<String>, params: &[&str], body: ScopeStmt) -> Self {
        FnDecl {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body,
        }
    }

    /// Declared parameter count
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

// Convenience constructors for hosts that build trees directly.

impl Exp {
    /// Node kind, for tracing
    pub fn kind_name(&self) -> &'static str {
        match self {
            Exp::Int(_) => "int",
            Exp::Null => "null",
            Exp::Printf { .. } => "printf",
            Exp::Array { .. } => "array",
            Exp::Object { .. } => "object",
            Exp::Slot { .. } => "slot",
            Exp::SetSlot { .. } => "set-slot",
            Exp::CallSlot { .. } => "call-slot",
            Exp::Call { .. } => "call",
            Exp::Set { .. } => "set",
            Exp::If { .. } => "if",
            Exp::While { .. } => "while",
            Exp::Ref(_) => "ref",
        }
    }

    pub fn int(value: i64) -> Self {
        Exp::Int(value)
    }

    pub fn null() -> Self {
        Exp::Null
    }

    pub fn printf(format: impl Into<String>, args: Vec<Exp>) -> Self {
        Exp::Printf {
            format: format.into(),
            args,
        }
    }

    pub fn array(length: Exp, init: Exp) -> Self {
        Exp::Array {
            length: Box::new(length),
            init: Box::new(init),
        }
    }

    pub fn object(parent: Exp, slots: Vec<SlotStmt>) -> Self {
        Exp::Object {
            parent: Box::new(parent),
            slots,
        }
    }

    pub fn slot(receiver: Exp, name: impl Into<String>) -> Self {
        Exp::Slot {
            receiver: Box::new(receiver),
            name: name.into(),
        }
    }

    pub fn set_slot(receiver: Exp, name: impl Into<String>, value: Exp) -> Self {
        Exp::SetSlot {
            receiver: Box::new(receiver),
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn call_slot(receiver: Exp, name: impl Into<String>, args: Vec<Exp>) -> Self {
        Exp::CallSlot {
            receiver: Box::new(receiver),
            name: name.into(),
            args,
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Exp>) -> Self {
        Exp::Call {
            name: name.into(),
            args,
        }
    }

    pub fn set(name: impl Into<String>, value: Exp) -> Self {
        Exp::Set {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn cond(pred: Exp, conseq: ScopeStmt, alt: ScopeStmt) -> Self {
        Exp::If {
            pred: Box::new(pred),
            conseq: Box::new(conseq),
            alt: Box::new(alt),
        }
    }

    pub fn while_loop(pred: Exp, body: ScopeStmt) -> Self {
        Exp::While {
            pred: Box::new(pred),
            body: Box::new(body),
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Exp::Ref(name.into())
    }

    /// Binary primitive call, e.g. `Exp::op(x, "add", y)` for `x.add(y)`
    pub fn op(receiver: Exp, name: &str, arg: Exp) -> Self {
        Exp::call_slot(receiver, name, vec![arg])
    }
}

impl ScopeStmt {
    pub fn var(name: impl Into<String>, init: Exp) -> Self {
        ScopeStmt::Var {
            name: name.into(),
            init,
        }
    }

    pub fn defn(name: impl Into<String>, params: &[&str], body: ScopeStmt) -> Self {
        ScopeStmt::Fn(Rc::new(FnDecl::new(name, params, body)))
    }

    pub fn exp(exp: Exp) -> Self {
        ScopeStmt::Exp(exp)
    }

    /// Chain statements into right-nested sequences.
    /// An empty list yields the statement `null`.
    pub fn seq(stmts: impl IntoIterator<Item = ScopeStmt>) -> Self {
        let mut stmts: Vec<ScopeStmt> = stmts.into_iter().collect();
        let Some(mut acc) = stmts.pop() else {
            return ScopeStmt::Exp(Exp::Null);
        };
        while let Some(prev) = stmts.pop() {
            acc = ScopeStmt::Seq(Box::new(prev), Box::new(acc));
        }
        acc
    }
}

impl Drop for ScopeStmt {
    // Unlink nested sequences onto a worklist so dropping a long program
    // does not recurse once per statement.
    fn drop(&mut self) {
        let ScopeStmt::Seq(first, second) = self else {
            return;
        };
        let mut pending = Vec::new();
        take_sequence(first, &mut pending);
        take_sequence(second, &mut pending);
        while let Some(mut stmt) = pending.pop() {
            if let ScopeStmt::Seq(first, second) = &mut stmt {
                take_sequence(first, &mut pending);
                take_sequence(second, &mut pending);
            }
        }
    }
}

fn take_sequence(slot: &mut Box<ScopeStmt>, pending: &mut Vec<ScopeStmt>) {
    if matches!(**slot, ScopeStmt::Seq(..)) {
        pending.push(std::mem::replace(&mut **slot, ScopeStmt::Exp(Exp::Null)));
    }
}

impl SlotStmt {
    pub fn var(name: impl Into<String>, init: Exp) -> Self {
        SlotStmt::Var {
            name: name.into(),
            init,
        }
    }

    pub fn method(name: impl Into<String>, params: &[&str], body: ScopeStmt) -> Self {
        SlotStmt::Method(Rc::new(FnDecl::new(name, params, body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_right_nested() {
        let stmt = ScopeStmt::seq([
            ScopeStmt::exp(Exp::int(1)),
            ScopeStmt::exp(Exp::int(2)),
            ScopeStmt::exp(Exp::int(3)),
        ]);
        let ScopeStmt::Seq(first, rest) = &stmt else {
            panic!("expected a sequence");
        };
        assert_eq!(**first, ScopeStmt::exp(Exp::int(1)));
        assert!(matches!(**rest, ScopeStmt::Seq(_, _)));
    }

    #[test]
    fn test_drop_long_sequences() {
        let right = ScopeStmt::seq((0..200_000).map(|i| ScopeStmt::exp(Exp::int(i))));
        drop(right);

        let mut left = ScopeStmt::exp(Exp::int(0));
        for i in 1..200_000 {
            left = ScopeStmt::Seq(Box::new(left), Box::new(ScopeStmt::exp(Exp::int(i))));
        }
        drop(left);
    }

    #[test]
    fn test_seq_single_and_empty() {
        assert_eq!(
            ScopeStmt::seq([ScopeStmt::exp(Exp::int(7))]),
            ScopeStmt::exp(Exp::int(7))
        );
        assert_eq!(ScopeStmt::seq([]), ScopeStmt::exp(Exp::Null));
    }

    #[test]
    fn test_fn_decl_arity() {
        let decl = FnDecl::new("f", &["a", "b"], ScopeStmt::exp(Exp::var("a")));
        assert_eq!(decl.arity(), 2);
        assert_eq!(decl.params, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_op_builds_call_slot() {
        let e = Exp::op(Exp::int(3), "add", Exp::int(4));
        assert_eq!(
            e,
            Exp::CallSlot {
                receiver: Box::new(Exp::Int(3)),
                name: "add".to_string(),
                args: vec![Exp::Int(4)],
            }
        );
    }
}
