//! Interpreter configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! max_call_depth = 10000
//! stack_red_zone = 131072
//! stack_grow_size = 4194304
//! global_capacity = 64
//! local_capacity = 8
//! object_capacity = 11
//! ```

use crate::ast::Span;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Nested function/method calls allowed before `StackOverflow`
    pub max_call_depth: usize,
    /// Remaining native stack that triggers growth
    pub stack_red_zone: usize,
    /// Size of each native stack extension
    pub stack_grow_size: usize,
    /// Initial bucket count of the global scope
    pub global_capacity: usize,
    /// Initial bucket count of each call's local scope
    pub local_capacity: usize,
    /// Initial bucket count of an object built without a parent
    pub object_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_call_depth: 10_000,
            stack_red_zone: 128 * 1024,
            stack_grow_size: 4 * 1024 * 1024,
            global_capacity: 64,
            local_capacity: 8,
            object_capacity: crate::interp::DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| {
            let span = e.span().map(Span::from);
            Error::config(e.message(), span)
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::io_error(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }
}
