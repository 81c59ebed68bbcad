//! Symbol tables for scopes and objects
//!
//! One table type serves two roles. As a *scope* it is either the single
//! global table of a run or a per-call local table that is dropped when the
//! call returns. As an *object* it is shared through [`ObjectRef`] and lives
//! as long as some value refers to it.

use super::value::Binding;
use rustc_hash::FxHasher;
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Shared reference to an object's table
pub type ObjectRef = Rc<RefCell<Environment>>;

/// Bucket count when no capacity hint is given
pub const DEFAULT_CAPACITY: usize = 11;

/// Average chain length that triggers a resize
const MAX_LOAD: usize = 2;

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    binding: Binding,
}

/// Name → binding table with separate chaining.
///
/// `clone` is a one-time snapshot: the copy owns its own chains, so later
/// `put`/`remove` on either table is invisible to the other. Bound arrays and
/// objects are shared by reference, not deep-copied.
#[derive(Debug, Clone)]
pub struct Environment {
    buckets: Vec<Vec<Entry>>,
    len: usize,
}

impl Environment {
    /// Create an empty table with the default bucket count
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty table with `capacity` buckets (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Environment {
            buckets: vec![Vec::new(); capacity.max(1)],
            len: 0,
        }
    }

    /// Wrap in Rc<RefCell<>> for use as an object
    pub fn into_ref(self) -> ObjectRef {
        Rc::new(RefCell::new(self))
    }

    fn bucket_index(&self, key: &str) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() % self.buckets.len() as u64) as usize
    }

    /// Bind `key`, replacing any existing binding. Returns the replaced one.
    pub fn put(&mut self, key: &str, binding: Binding) -> Option<Binding> {
        let idx = self.bucket_index(key);
        if let Some(entry) = self.buckets[idx].iter_mut().find(|e| e.key == key) {
            return Some(std::mem::replace(&mut entry.binding, binding));
        }
        self.buckets[idx].push(Entry {
            key: key.to_string(),
            binding,
        });
        self.len += 1;
        if self.len > self.buckets.len() * MAX_LOAD {
            self.grow();
        }
        None
    }

    /// Look up the current binding for `key`
    pub fn get(&self, key: &str) -> Option<&Binding> {
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.binding)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`; absent keys are not an error
    pub fn remove(&mut self, key: &str) -> Option<Binding> {
        let idx = self.bucket_index(key);
        let chain = &mut self.buckets[idx];
        let pos = chain.iter().position(|e| e.key == key)?;
        self.len -= 1;
        Some(chain.swap_remove(pos).binding)
    }

    /// Release every entry, keeping the bucket array
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bound names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|e| e.key.as_str()))
    }

    fn grow(&mut self) {
        let new_size = self.buckets.len() * 2 + 1;
        let old = std::mem::replace(&mut self.buckets, vec![Vec::new(); new_size]);
        for entry in old.into_iter().flatten() {
            let idx = self.bucket_index(&entry.key);
            self.buckets[idx].push(entry);
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::value::{Array, Value};

    fn var(n: i64) -> Binding {
        Binding::Var(Value::Int(n))
    }

    fn int_of(env: &Environment, key: &str) -> Option<i64> {
        match env.get(key) {
            Some(Binding::Var(v)) => v.as_int(),
            _ => None,
        }
    }

    #[test]
    fn test_put_and_get() {
        let mut env = Environment::new();
        env.put("x", var(42));
        assert_eq!(int_of(&env, "x"), Some(42));
        assert!(env.get("y").is_none());
    }

    #[test]
    fn test_put_overwrite_is_last_write_wins() {
        let mut env = Environment::new();
        assert!(env.put("x", var(1)).is_none());
        assert!(env.put("x", var(2)).is_some());
        assert_eq!(int_of(&env, "x"), Some(2));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut env = Environment::new();
        env.put("x", var(1));
        assert!(env.remove("x").is_some());
        assert!(env.get("x").is_none());
        assert!(env.remove("x").is_none());
        assert!(env.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut env = Environment::new();
        env.put("a", var(1));
        env.put("b", var(2));
        env.clear();
        assert!(env.is_empty());
        assert!(env.get("a").is_none());
        env.put("a", var(3));
        assert_eq!(int_of(&env, "a"), Some(3));
    }

    #[test]
    fn test_default() {
        let env = Environment::default();
        assert!(env.is_empty());
        assert_eq!(env.names().count(), 0);
    }

    #[test]
    fn test_zero_capacity_is_usable() {
        let mut env = Environment::with_capacity(0);
        env.put("x", var(1));
        assert_eq!(int_of(&env, "x"), Some(1));
    }

    #[test]
    fn test_collisions_with_single_bucket() {
        let mut env = Environment::with_capacity(1);
        env.put("a", var(1));
        env.put("b", var(2));
        env.remove("a");
        assert_eq!(int_of(&env, "b"), Some(2));
        assert!(env.get("a").is_none());
    }

    #[test]
    fn test_growth_keeps_all_bindings() {
        let mut env = Environment::with_capacity(2);
        for i in 0..1000 {
            env.put(&format!("var_{i}"), var(i));
        }
        assert_eq!(env.len(), 1000);
        for i in 0..1000 {
            assert_eq!(int_of(&env, &format!("var_{i}")), Some(i));
        }
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let mut parent = Environment::new();
        parent.put("x", var(1));

        let mut child = parent.clone();
        child.put("x", var(2));
        child.put("y", var(3));
        assert_eq!(int_of(&parent, "x"), Some(1));
        assert!(parent.get("y").is_none());

        parent.put("x", var(10));
        parent.remove("x");
        assert_eq!(int_of(&child, "x"), Some(2));
    }

    #[test]
    fn test_clone_shares_referenced_arrays() {
        let array = Rc::new(Array::filled(2, 0).unwrap());
        let mut parent = Environment::new();
        parent.put("a", Binding::Var(Value::Array(Rc::clone(&array))));
        let child = parent.clone();

        array.set(1, 7).unwrap();
        match child.get("a") {
            Some(Binding::Var(Value::Array(a))) => assert_eq!(a.get(1).unwrap(), 7),
            other => panic!("expected array binding, got {other:?}"),
        }
    }

    #[test]
    fn test_names() {
        let mut env = Environment::new();
        env.put("a", var(1));
        env.put("b", var(2));
        let mut names: Vec<&str> = env.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }
}
