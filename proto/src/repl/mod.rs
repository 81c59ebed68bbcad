//! REPL (Read-Eval-Print Loop) over JSON-encoded statements
//!
//! Each input line is one serialized `ScopeStmt`. Statements run against a
//! global scope that persists across lines, so a function defined on one line
//! can be called on the next. Errors are reported and the session continues.

use crate::ast;
use crate::config::Config;
use crate::error::Result;
use crate::interp::{Binding, Environment, Interpreter, Value};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io::{Stdout, Write};
use std::path::PathBuf;

const PROMPT: &str = "proto> ";
const HISTORY_FILE: &str = ".proto_history";

/// Interpreter plus the global scope it keeps between inputs
pub struct Session<W: Write = Stdout> {
    interpreter: Interpreter<W>,
    globals: Environment,
}

impl Session<Stdout> {
    pub fn new(config: Config) -> Self {
        Self::with_output(std::io::stdout(), config)
    }
}

impl<W: Write> Session<W> {
    pub fn with_output(out: W, config: Config) -> Self {
        let interpreter = Interpreter::with_config(out, config);
        let globals = interpreter.global_scope();
        Session {
            interpreter,
            globals,
        }
    }

    /// Decode and run one statement.
    /// Bindings made before a runtime error are kept.
    pub fn eval(&mut self, input: &str) -> Result<Value> {
        let stmt = ast::from_json(input)?;
        Ok(self.interpreter.run_in(&mut self.globals, &stmt)?)
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Forget every global binding
    pub fn reset(&mut self) {
        self.globals.clear();
    }

    /// One line per global, sorted by name
    pub fn describe_globals(&self) -> Vec<String> {
        let mut names: Vec<&str> = self.globals.names().collect();
        names.sort_unstable();
        names
            .into_iter()
            .filter_map(|name| match self.globals.get(name)? {
                Binding::Var(value) => Some(format!("var {name} = {value}")),
                Binding::Func(decl) => Some(format!("defn {name}({})", decl.params.join(", "))),
            })
            .collect()
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }
}

/// Interactive REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new(config: Config) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;

        // Try to find history file in home directory
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(config),
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Proto REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Enter one JSON statement per line. Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.eval_input(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :). Returns true to quit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                print_help();
                false
            }
            ":globals" => {
                let lines = self.session.describe_globals();
                if lines.is_empty() {
                    println!("(no globals)");
                }
                for line in lines {
                    println!("{line}");
                }
                false
            }
            ":reset" => {
                self.session.reset();
                println!("Global scope cleared.");
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn eval_input(&mut self, input: &str) {
        match self.session.eval(input) {
            // Declarations and side-effecting expressions yield null
            Ok(Value::Null) => {}
            Ok(value) => println!("{value}"),
            Err(err) => eprintln!("{err}"),
        }
    }
}

fn print_help() {
    println!("Proto REPL Commands:");
    println!("  :help, :h, :?   Show this help");
    println!("  :quit, :q       Exit the REPL");
    println!("  :globals        List global variables and functions");
    println!("  :reset          Clear the global scope");
    println!();
    println!("Each line is a JSON statement, for example:");
    println!(r#"  {{"Var":{{"name":"x","init":{{"Int":41}}}}}}"#);
    println!(r#"  {{"Exp":{{"CallSlot":{{"receiver":{{"Ref":"x"}},"name":"add","args":[{{"Int":1}}]}}}}}}"#);
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
