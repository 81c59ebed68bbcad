//! Expression evaluator and statement executor
//!
//! Every evaluation takes the global scope and an optional local scope. The
//! local scope exists only while a function or method body runs; at the top
//! level it is `None` and declarations land in the global scope.

use super::env::{Environment, ObjectRef};
use super::error::{InterpResult, RuntimeError};
use super::primitive::{self, ArrayOp, IntOp};
use super::value::{Binding, Value};
use crate::ast::{Exp, FnDecl, ScopeStmt, SlotStmt};
use crate::config::Config;
use crate::util::{SUGGESTION_THRESHOLD, find_similar_name};
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use tracing::{debug, trace};

/// Run a program against a fresh global scope, printing to stdout
pub fn interpret(program: &ScopeStmt) -> InterpResult<Value> {
    Interpreter::new().run(program)
}

/// The interpreter
pub struct Interpreter<W: Write = Stdout> {
    /// Sink for `printf` output
    out: W,
    config: Config,
    /// Active function and method calls
    depth: usize,
}

impl Interpreter<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Interpreter printing to `out` with the default configuration
    pub fn with_output(out: W) -> Self {
        Self::with_config(out, Config::default())
    }

    pub fn with_config(out: W, config: Config) -> Self {
        Interpreter {
            out,
            config,
            depth: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Empty global scope sized by the configuration
    pub fn global_scope(&self) -> Environment {
        Environment::with_capacity(self.config.global_capacity)
    }

    /// Run a whole program in a fresh global scope.
    /// Returns the value of the program's last statement.
    pub fn run(&mut self, program: &ScopeStmt) -> InterpResult<Value> {
        let mut globals = self.global_scope();
        self.run_in(&mut globals, program)
    }

    /// Run a program against an existing global scope.
    /// Bindings made before an error stay in `globals`.
    pub fn run_in(&mut self, globals: &mut Environment, program: &ScopeStmt) -> InterpResult<Value> {
        self.depth = 0;
        debug!(globals = globals.len(), "running program");
        self.eval_stmt(globals, None, program)
    }

    /// Evaluate an expression with automatic stack growth
    pub fn eval_exp(
        &mut self,
        genv: &mut Environment,
        env: Option<&mut Environment>,
        exp: &Exp,
    ) -> InterpResult<Value> {
        let (red_zone, grow_size) = (self.config.stack_red_zone, self.config.stack_grow_size);
        stacker::maybe_grow(red_zone, grow_size, || self.eval_exp_inner(genv, env, exp))
    }

    fn eval_exp_inner(
        &mut self,
        genv: &mut Environment,
        mut env: Option<&mut Environment>,
        exp: &Exp,
    ) -> InterpResult<Value> {
        trace!(kind = exp.kind_name(), "eval");
        match exp {
            Exp::Int(n) => Ok(Value::Int(*n)),
            Exp::Null => Ok(Value::Null),

            Exp::Printf { format, args } => {
                let expected = format.matches('~').count();
                if args.len() < expected {
                    return Err(RuntimeError::arity_mismatch("printf", expected, args.len()));
                }
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    let value = self.eval_exp(genv, env.as_deref_mut(), arg)?;
                    values.push(value.expect_int("printf argument")?);
                }
                self.print(format, &values)?;
                Ok(Value::Null)
            }

            Exp::Array { length, init } => {
                let length = self
                    .eval_exp(genv, env.as_deref_mut(), length)?
                    .expect_int("array length")?;
                let init = self.eval_exp(genv, env, init)?.expect_int("array initial value")?;
                primitive::make_array(length, init)
            }

            Exp::Object { parent, slots } => self.eval_object(genv, env, parent, slots),

            Exp::Slot { receiver, name } => {
                let obj = self.eval_receiver(genv, env, receiver, name)?;
                read_slot(&obj, name)
            }

            Exp::SetSlot {
                receiver,
                name,
                value,
            } => {
                let obj = self.eval_receiver(genv, env.as_deref_mut(), receiver, name)?;
                read_slot(&obj, name)?;
                let value = self.eval_exp(genv, env, value)?;
                obj.borrow_mut().put(name, Binding::Var(value));
                Ok(Value::Null)
            }

            Exp::CallSlot {
                receiver,
                name,
                args,
            } => {
                let target = self.eval_exp(genv, env.as_deref_mut(), receiver)?;
                self.call_slot(genv, env, target, name, args)
            }

            Exp::Call { name, args } => {
                let decl = match genv.get(name) {
                    Some(Binding::Func(decl)) => Rc::clone(decl),
                    Some(Binding::Var(_)) => return Err(RuntimeError::not_a_function(name)),
                    None => {
                        let hint = find_similar_name(name, genv.names(), SUGGESTION_THRESHOLD);
                        return Err(RuntimeError::undefined_function(name, hint));
                    }
                };
                debug!(function = %name, args = args.len(), depth = self.depth, "call");
                self.invoke(genv, env, &decl, args, None)
            }

            Exp::Set { name, value } => {
                let value = self.eval_exp(genv, env.as_deref_mut(), value)?;
                if let Some(local) = env.as_deref_mut().filter(|l| l.contains(name)) {
                    local.put(name, Binding::Var(value));
                } else if genv.contains(name) {
                    genv.put(name, Binding::Var(value));
                } else {
                    let hint = suggest_variable(name, env.as_deref(), genv);
                    return Err(RuntimeError::undefined_variable(name, hint));
                }
                Ok(Value::Null)
            }

            Exp::If { pred, conseq, alt } => {
                let pred = self.eval_exp(genv, env.as_deref_mut(), pred)?;
                let branch = if pred.is_truthy() { conseq } else { alt };
                self.eval_stmt(genv, env, branch)
            }

            Exp::While { pred, body } => {
                while self.eval_exp(genv, env.as_deref_mut(), pred)?.continues_loop() {
                    self.exec_stmt(genv, env.as_deref_mut(), body)?;
                }
                Ok(Value::Null)
            }

            Exp::Ref(name) => {
                let binding = env
                    .as_deref()
                    .and_then(|local| local.get(name))
                    .or_else(|| genv.get(name));
                match binding {
                    Some(Binding::Var(value)) => Ok(value.clone()),
                    Some(Binding::Func(_)) => Err(RuntimeError::not_a_variable(name)),
                    None => {
                        let hint = suggest_variable(name, env.as_deref(), genv);
                        Err(RuntimeError::undefined_variable(name, hint))
                    }
                }
            }
        }
    }

    /// Evaluate a statement with automatic stack growth.
    /// The value of a sequence is the value of its last statement;
    /// declarations yield null.
    pub fn eval_stmt(
        &mut self,
        genv: &mut Environment,
        env: Option<&mut Environment>,
        stmt: &ScopeStmt,
    ) -> InterpResult<Value> {
        let (red_zone, grow_size) = (self.config.stack_red_zone, self.config.stack_grow_size);
        stacker::maybe_grow(red_zone, grow_size, || self.eval_stmt_inner(genv, env, stmt))
    }

    fn eval_stmt_inner(
        &mut self,
        genv: &mut Environment,
        mut env: Option<&mut Environment>,
        stmt: &ScopeStmt,
    ) -> InterpResult<Value> {
        // Sequences nest to the right; walk the spine instead of recursing.
        let mut stmt = stmt;
        loop {
            match stmt {
                ScopeStmt::Seq(first, second) => {
                    self.exec_stmt(genv, env.as_deref_mut(), first)?;
                    stmt = second.as_ref();
                }
                ScopeStmt::Var { name, init } => {
                    let value = self.eval_exp(genv, env.as_deref_mut(), init)?;
                    trace!(name = %name, local = env.is_some(), "declare variable");
                    env.unwrap_or(genv).put(name, Binding::Var(value));
                    return Ok(Value::Null);
                }
                ScopeStmt::Fn(decl) => {
                    trace!(name = %decl.name, arity = decl.arity(), "declare function");
                    genv.put(&decl.name, Binding::Func(Rc::clone(decl)));
                    return Ok(Value::Null);
                }
                ScopeStmt::Exp(exp) => return self.eval_exp(genv, env, exp),
            }
        }
    }

    /// Execute a statement for its effects
    pub fn exec_stmt(
        &mut self,
        genv: &mut Environment,
        env: Option<&mut Environment>,
        stmt: &ScopeStmt,
    ) -> InterpResult<()> {
        self.eval_stmt(genv, env, stmt).map(drop)
    }

    /// Install one slot of an object under construction.
    /// Initializers see the enclosing scopes, not the object.
    pub fn exec_slot_stmt(
        &mut self,
        genv: &mut Environment,
        env: Option<&mut Environment>,
        obj: &mut Environment,
        slot: &SlotStmt,
    ) -> InterpResult<()> {
        match slot {
            SlotStmt::Var { name, init } => {
                let value = self.eval_exp(genv, env, init)?;
                obj.put(name, Binding::Var(value));
            }
            SlotStmt::Method(decl) => {
                obj.put(&decl.name, Binding::Func(Rc::clone(decl)));
            }
        }
        Ok(())
    }

    fn eval_object(
        &mut self,
        genv: &mut Environment,
        mut env: Option<&mut Environment>,
        parent: &Exp,
        slots: &[SlotStmt],
    ) -> InterpResult<Value> {
        let mut table = match self.eval_exp(genv, env.as_deref_mut(), parent)? {
            Value::Null => Environment::with_capacity(self.config.object_capacity),
            Value::Object(proto) => proto.borrow().clone(),
            other => {
                return Err(RuntimeError::type_error(
                    "object parent",
                    "object or null",
                    other.type_name(),
                ));
            }
        };
        debug!(inherited = table.len(), slots = slots.len(), "construct object");
        for slot in slots {
            self.exec_slot_stmt(genv, env.as_deref_mut(), &mut table, slot)?;
        }
        Ok(Value::Object(table.into_ref()))
    }

    fn eval_receiver(
        &mut self,
        genv: &mut Environment,
        env: Option<&mut Environment>,
        receiver: &Exp,
        name: &str,
    ) -> InterpResult<ObjectRef> {
        match self.eval_exp(genv, env, receiver)? {
            Value::Object(obj) => Ok(obj),
            other => Err(RuntimeError::type_error(
                &format!("receiver of slot {name}"),
                "object",
                other.type_name(),
            )),
        }
    }

    /// Dispatch `target.name(args)` on the receiver's runtime type
    fn call_slot(
        &mut self,
        genv: &mut Environment,
        mut env: Option<&mut Environment>,
        target: Value,
        name: &str,
        args: &[Exp],
    ) -> InterpResult<Value> {
        match target {
            Value::Int(x) => {
                let op = IntOp::from_name(name)
                    .ok_or_else(|| RuntimeError::unknown_operator(name, "int"))?;
                let [arg] = args else {
                    return Err(RuntimeError::arity_mismatch(name, 1, args.len()));
                };
                let y = self
                    .eval_exp(genv, env, arg)?
                    .expect_int(&format!("operand of {name}"))?;
                op.apply(x, y)
            }
            Value::Array(array) => {
                let op = ArrayOp::from_name(name)
                    .ok_or_else(|| RuntimeError::unknown_operator(name, "array"))?;
                if args.len() != op.arity() {
                    return Err(RuntimeError::arity_mismatch(name, op.arity(), args.len()));
                }
                let mut operands = Vec::with_capacity(args.len());
                for (position, arg) in args.iter().enumerate() {
                    let value = self.eval_exp(genv, env.as_deref_mut(), arg)?;
                    operands.push(value.expect_int(ArrayOp::operand_name(position))?);
                }
                op.apply(&array, &operands)
            }
            Value::Object(obj) => {
                let decl = {
                    let table = obj.borrow();
                    match table.get(name) {
                        Some(Binding::Func(decl)) => Rc::clone(decl),
                        Some(Binding::Var(_)) => return Err(RuntimeError::not_a_function(name)),
                        None => {
                            let hint =
                                find_similar_name(name, table.names(), SUGGESTION_THRESHOLD);
                            return Err(RuntimeError::undefined_method(name, hint));
                        }
                    }
                };
                debug!(method = %name, args = args.len(), depth = self.depth, "method call");
                self.invoke(genv, env, &decl, args, Some(obj))
            }
            Value::Null => Err(RuntimeError::null_reference(name)),
        }
    }

    /// Run a function or method body in a fresh local scope.
    /// Arguments are evaluated left to right in the caller's scopes; `this`
    /// is bound after the parameters.
    fn invoke(
        &mut self,
        genv: &mut Environment,
        mut env: Option<&mut Environment>,
        decl: &FnDecl,
        args: &[Exp],
        this: Option<ObjectRef>,
    ) -> InterpResult<Value> {
        if args.len() != decl.arity() {
            return Err(RuntimeError::arity_mismatch(&decl.name, decl.arity(), args.len()));
        }

        let mut local = Environment::with_capacity(self.config.local_capacity);
        for (param, arg) in decl.params.iter().zip(args) {
            let value = self.eval_exp(genv, env.as_deref_mut(), arg)?;
            local.put(param, Binding::Var(value));
        }
        if let Some(obj) = this {
            local.put("this", Binding::Var(Value::Object(obj)));
        }

        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::stack_overflow(self.config.max_call_depth));
        }
        self.depth += 1;
        let result = self.eval_stmt(genv, Some(&mut local), &decl.body);
        self.depth -= 1;
        result
    }

    /// Substitute `values` for the `~` placeholders and write the result
    fn print(&mut self, format: &str, values: &[i64]) -> InterpResult<()> {
        let mut line = String::with_capacity(format.len());
        let mut values = values.iter();
        for ch in format.chars() {
            if ch != '~' {
                line.push(ch);
            } else if let Some(value) = values.next() {
                line.push_str(&value.to_string());
            }
        }
        self.out
            .write_all(line.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| RuntimeError::io_error(&e.to_string()))
    }
}

/// Value of a variable slot; methods and missing slots are errors
fn read_slot(obj: &ObjectRef, name: &str) -> InterpResult<Value> {
    let table = obj.borrow();
    match table.get(name) {
        Some(Binding::Var(value)) => Ok(value.clone()),
        Some(Binding::Func(_)) => Err(RuntimeError::not_a_variable(name)),
        None => {
            let hint = find_similar_name(name, table.names(), SUGGESTION_THRESHOLD);
            Err(RuntimeError::undefined_slot(name, hint))
        }
    }
}

fn suggest_variable<'a>(
    name: &str,
    env: Option<&'a Environment>,
    genv: &'a Environment,
) -> Option<&'a str> {
    let locals = env.into_iter().flat_map(|local| local.names());
    find_similar_name(name, locals.chain(genv.names()), SUGGESTION_THRESHOLD)
}
