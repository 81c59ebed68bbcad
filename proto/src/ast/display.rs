//! Surface-syntax rendering of the AST (used by `proto dump`)

use super::{Exp, FnDecl, ScopeStmt, SlotStmt};
use std::fmt;

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Exp]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_decl(f: &mut fmt::Formatter<'_>, keyword: &str, decl: &FnDecl) -> fmt::Result {
    write!(f, "{keyword} {}({}) {{ {} }}", decl.name, decl.params.join(", "), decl.body)
}

/// Receivers that need parentheses to read unambiguously before `.name`
fn write_receiver(f: &mut fmt::Formatter<'_>, receiver: &Exp) -> fmt::Result {
    match receiver {
        Exp::Set { .. } | Exp::SetSlot { .. } | Exp::If { .. } | Exp::While { .. } | Exp::Object { .. } => {
            write!(f, "({receiver})")
        }
        Exp::Int(n) if *n < 0 => write!(f, "({n})"),
        _ => write!(f, "{receiver}"),
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exp::Int(n) => write!(f, "{n}"),
            Exp::Null => write!(f, "null"),
            Exp::Printf { format, args } => {
                write!(f, "printf({format:?}")?;
                for arg in args {
                    write!(f, ", {arg}")?;
                }
                write!(f, ")")
            }
            Exp::Array { length, init } => write!(f, "array({length}, {init})"),
            Exp::Object { parent, slots } => {
                write!(f, "object({parent}) {{")?;
                for (i, slot) in slots.iter().enumerate() {
                    write!(f, "{}{slot}", if i == 0 { " " } else { "; " })?;
                }
                write!(f, " }}")
            }
            Exp::Slot { receiver, name } => {
                write_receiver(f, receiver)?;
                write!(f, ".{name}")
            }
            Exp::SetSlot { receiver, name, value } => {
                write_receiver(f, receiver)?;
                write!(f, ".{name} = {value}")
            }
            Exp::CallSlot { receiver, name, args } => {
                write_receiver(f, receiver)?;
                write!(f, ".{name}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Exp::Call { name, args } => {
                write!(f, "{name}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Exp::Set { name, value } => write!(f, "{name} = {value}"),
            Exp::If { pred, conseq, alt } => {
                write!(f, "if {pred} {{ {conseq} }} else {{ {alt} }}")
            }
            Exp::While { pred, body } => write!(f, "while {pred} {{ {body} }}"),
            Exp::Ref(name) => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for SlotStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStmt::Var { name, init } => write!(f, "var {name} = {init}"),
            SlotStmt::Method(decl) => write_decl(f, "method", decl),
        }
    }
}

impl fmt::Display for ScopeStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Walk the right spine of a sequence without nesting calls
        let mut stmt = self;
        loop {
            match stmt {
                ScopeStmt::Seq(first, second) => {
                    write!(f, "{first}; ")?;
                    stmt = second.as_ref();
                }
                ScopeStmt::Var { name, init } => return write!(f, "var {name} = {init}"),
                ScopeStmt::Fn(decl) => return write_decl(f, "defn", decl),
                ScopeStmt::Exp(exp) => return write!(f, "{exp}"),
            }
        }
    }
}
