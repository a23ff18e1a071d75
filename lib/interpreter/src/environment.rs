use std::{
    collections::HashMap,
    mem,
    ops::{Deref, DerefMut},
};

use crate::{value::Value, RuntimeError};

/// The chain of lexical scopes. `current` is the innermost scope, `enclosing` holds the
/// outer ones with the global scope at index 0.
#[derive(Debug, Default)]
pub struct Environment {
    current: HashMap<String, Value>,
    enclosing: Vec<HashMap<String, Value>>,
}

impl Environment {
    /// Enters a new innermost scope that lives as long as the returned guard.
    pub fn scope(&mut self) -> Scope<'_> {
        self.enclosing.push(mem::take(&mut self.current));
        log::debug!("Entered scope at depth {}", self.depth());
        Scope(self)
    }

    fn pop_scope(&mut self) {
        debug_assert!(!self.enclosing.is_empty(), "Tried to pop the global scope");
        self.current = self.enclosing.pop().unwrap_or_default();
        log::debug!("Left scope, back at depth {}", self.depth());
    }

    /// Number of scopes in the chain, 1 for the global scope only.
    pub fn depth(&self) -> usize {
        self.enclosing.len() + 1
    }

    /// Binds `name` in the innermost scope, shadowing or redefining any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        log::trace!("Defining {} = {:?} at depth {}", name, value, self.depth());
        self.current.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.scopes()
            .find_map(|values| values.get(name))
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }

    /// Overwrites the innermost existing binding of `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let scope = std::iter::once(&mut self.current)
            .chain(self.enclosing.iter_mut().rev())
            .find(|values| values.contains_key(name));

        match scope {
            Some(values) => {
                log::trace!("Assigning {} = {:?}", name, value);
                values.insert(name.to_string(), value);
                Ok(())
            }
            None => Err(RuntimeError::UndefinedVariable(name.to_string())),
        }
    }

    /// Innermost scope first.
    fn scopes(&self) -> impl Iterator<Item = &HashMap<String, Value>> {
        std::iter::once(&self.current).chain(self.enclosing.iter().rev())
    }
}

/// A block scope. Dropping it restores the enclosing scope, whether the block finished
/// normally or bailed out with an error.
pub struct Scope<'e>(&'e mut Environment);

impl Deref for Scope<'_> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.0.pop_scope();
    }
}
