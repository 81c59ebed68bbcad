//! Proto runtime library
//!
//! A tree-walking interpreter for a small prototype-based object language:
//! integers, null, fixed-length integer arrays, and objects created by
//! cloning a parent and adding slots. Programs arrive as an already-built
//! AST, either constructed in Rust or decoded from JSON.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod repl;
pub mod util;

pub use ast::Span;
pub use config::Config;
pub use error::{Error, Result};
pub use interp::{Interpreter, RuntimeError, Value, interpret};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
