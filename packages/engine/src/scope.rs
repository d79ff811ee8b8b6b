//! # Scopes
//!
//! Arena-style lifetime control for transient engine allocations.
//!
//! ## Rules
//!
//! 1. Every transient handle is allocated against a [`Scope`]
//! 2. Handles borrow the scope, so they cannot escape [`with_scope`]
//! 3. Dropping a scope releases its handles, newest first
//! 4. Nested scopes end before their parent resumes (LIFO)

use std::cell::RefCell;
use tracing::trace;

use crate::{ErrorRef, NativeEngine, RawHandle, StringRef};

/// Lifetime boundary for transient handles
pub struct Scope<'e> {
    engine: &'e dyn NativeEngine,
    depth: usize,
    allocations: RefCell<Vec<RawHandle>>,
}

impl<'e> Scope<'e> {
    fn open(engine: &'e dyn NativeEngine, depth: usize) -> Self {
        Self {
            engine,
            depth,
            allocations: RefCell::new(Vec::new()),
        }
    }

    pub fn engine(&self) -> &'e dyn NativeEngine {
        self.engine
    }

    /// Nesting level, 0 for the outermost scope
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of handles this scope will release on exit
    pub fn allocation_count(&self) -> usize {
        self.allocations.borrow().len()
    }

    /// Allocate a native string bound to this scope
    pub fn string<'s>(&'s self, value: &str) -> StringRef<'s> {
        let raw = self.engine.allocate_string(value);
        self.allocations.borrow_mut().push(raw);
        StringRef::new(raw)
    }

    /// Allocate an empty error output slot bound to this scope
    pub fn error_slot<'s>(&'s self) -> ErrorRef<'s> {
        let raw = self.engine.allocate_error();
        self.allocations.borrow_mut().push(raw);
        ErrorRef::new(raw)
    }

    /// Read the message written into an error slot, if any
    pub fn error_message(&self, error: ErrorRef<'_>) -> Option<String> {
        self.engine.error_message(error)
    }

    /// Run `f` in a child scope that is released before this call returns
    pub fn nest<R>(&self, f: impl FnOnce(&Scope<'e>) -> R) -> R {
        let inner = Scope::open(self.engine, self.depth + 1);
        f(&inner)
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        let allocations = std::mem::take(self.allocations.get_mut());
        let released = allocations.len();
        for raw in allocations.into_iter().rev() {
            self.engine.release(raw);
        }
        trace!(depth = self.depth, released, "Scope released");
    }
}

/// Run `f` inside a fresh scope.
///
/// Every handle allocated against the scope is released when `f` returns,
/// whether it returns normally, with an error value, or by unwinding.
pub fn with_scope<R>(engine: &dyn NativeEngine, f: impl FnOnce(&Scope<'_>) -> R) -> R {
    let scope = Scope::open(engine, 0);
    f(&scope)
}

/// Allocate a native string in `scope`
pub fn create_string_ref<'s>(scope: &'s Scope<'_>, value: &str) -> StringRef<'s> {
    scope.string(value)
}
