use super::error::ScopeError;
use super::namespace::Namespace;
use super::stack::{empty_scope, Scope};
use std::ops::{Deref, DerefMut};

/// A frame pushed by [`Scope::enter`].
///
/// Dropping the guard truncates the stack back to the depth it had before
/// the frame was pushed, so an early return through `?` cannot leak depth.
/// Frames pushed on top of the guard without their own guard are discarded
/// with it. [`ScopeGuard::pop`] only removes such frames; it never reaches
/// the guarded frame or anything below it. Code handed the bare `&mut Scope`
/// through deref must keep its own pops balanced.
pub struct ScopeGuard<'a, V> {
    scope: &'a mut Scope<V>,
    base_depth: usize,
}

impl<'a, V> ScopeGuard<'a, V> {
    pub(super) fn new(scope: &'a mut Scope<V>, base_depth: usize) -> Self {
        Self { scope, base_depth }
    }

    /// Close the frame and take its namespace and identifier
    pub fn exit(self) -> Result<(Namespace<V>, String), ScopeError> {
        if self.scope.depth() <= self.base_depth {
            return Err(ScopeError::EmptyScope { operation: "exit" });
        }
        self.scope.truncate(self.base_depth + 1);
        self.scope.pop()
    }

    /// Pop a frame pushed on top of the guarded one. Fails with
    /// `EmptyScope` once only the guarded frame is left.
    pub fn pop(&mut self) -> Result<(Namespace<V>, String), ScopeError> {
        if self.scope.depth() <= self.base_depth + 1 {
            return Err(empty_scope("pop"));
        }
        self.scope.pop()
    }

    /// Stack depth once this guard is gone
    pub fn base_depth(&self) -> usize {
        self.base_depth
    }
}

impl<V> Deref for ScopeGuard<'_, V> {
    type Target = Scope<V>;

    fn deref(&self) -> &Scope<V> {
        self.scope
    }
}

impl<V> DerefMut for ScopeGuard<'_, V> {
    fn deref_mut(&mut self) -> &mut Scope<V> {
        self.scope
    }
}

impl<V> Drop for ScopeGuard<'_, V> {
    fn drop(&mut self) {
        self.scope.truncate(self.base_depth);
    }
}
