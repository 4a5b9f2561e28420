//! Environment for variable bindings

use super::value::Object;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared reference to an environment.
///
/// Closures hold one of these, so a scope outlives the call that created it
/// for as long as any closure still points at it.
pub type EnvRef = Rc<RefCell<Environment>>;

/// Environment holding variable bindings
#[derive(Debug, Default)]
pub struct Environment {
    /// Variable bindings in this scope
    bindings: FxHashMap<String, Object>,
    /// Enclosing scope for lexical lookup
    outer: Option<EnvRef>,
}

impl Environment {
    /// Create a new global environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new environment enclosed by `outer`
    pub fn with_outer(outer: EnvRef) -> Self {
        Environment {
            bindings: FxHashMap::default(),
            outer: Some(outer),
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind a name in this scope only; outer scopes are never written
    pub fn bind(&mut self, name: impl Into<String>, value: Object) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a name here, then outward through the chain
    pub fn lookup(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.bindings.get(name) {
            Some(value.clone())
        } else if let Some(outer) = &self.outer {
            outer.borrow().lookup(name)
        } else {
            None
        }
    }

    /// Check if a name is bound anywhere in the chain
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
            || self
                .outer
                .as_ref()
                .is_some_and(|outer| outer.borrow().contains(name))
    }

    /// Bindings of this scope only
    pub fn bindings(&self) -> &FxHashMap<String, Object> {
        &self.bindings
    }

    pub fn outer(&self) -> Option<&EnvRef> {
        self.outer.as_ref()
    }
}

/// Create a fresh scope enclosed by `outer`; used for every function call
pub fn child_of(outer: &EnvRef) -> EnvRef {
    Environment::with_outer(Rc::clone(outer)).into_ref()
}
